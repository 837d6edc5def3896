// Driven port - User store (output port)

use async_trait::async_trait;

use crate::domain::{Email, NewUser, User, UserChanges, UserFilter, UserId};
use crate::error::StoreError;

/// Persistence for user rows.
///
/// Implementations assign ids and timestamps on `create` and bump
/// `updated_at` on `update`. No method wraps a read and a write in one
/// transaction; concurrent writers to the same row race and the last one
/// wins.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, StoreError>;

    /// First row with this email, if any. Emails are not guaranteed unique.
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, StoreError>;

    async fn find_many(&self, filter: UserFilter) -> Result<Vec<User>, StoreError>;

    async fn create(&self, user: NewUser) -> Result<User, StoreError>;

    /// Fails with [`StoreError::RowMissing`] when no row has `id`.
    async fn update(&self, id: &UserId, changes: UserChanges) -> Result<User, StoreError>;
}
