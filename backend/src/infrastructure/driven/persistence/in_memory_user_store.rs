use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use crate::application::ports::UserStore;
use crate::domain::{Email, NewUser, User, UserChanges, UserFilter, UserId};
use crate::error::StoreError;

/// In-memory user store for tests. Counts writes so callers can assert
/// that idempotent operations did not touch the store.
pub struct InMemoryUserStore {
    users: RwLock<Vec<User>>,
    writes: AtomicUsize,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(Vec::new()),
            writes: AtomicUsize::new(0),
        }
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<User>> {
        self.users.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Vec<User>> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.users.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, StoreError> {
        Ok(self.read().iter().find(|user| user.id() == id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, StoreError> {
        Ok(self.read().iter().find(|user| user.email() == email).cloned())
    }

    async fn find_many(&self, filter: UserFilter) -> Result<Vec<User>, StoreError> {
        Ok(self
            .read()
            .iter()
            .filter(|user| filter.available.map_or(true, |available| user.is_available() == available))
            .cloned()
            .collect())
    }

    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let now = Utc::now();
        let created = User::from_persistence(
            UserId::new(),
            user.name,
            user.email,
            user.rfid,
            user.available,
            user.entered_department,
            now,
            now,
        );
        self.write().push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: &UserId, changes: UserChanges) -> Result<User, StoreError> {
        let mut users = self.write();
        let user = users
            .iter_mut()
            .find(|user| user.id() == id)
            .ok_or(StoreError::RowMissing(*id))?;
        if changes.is_empty() {
            return Ok(user.clone());
        }

        *user = User::from_persistence(
            *user.id(),
            changes.name.unwrap_or_else(|| user.name().clone()),
            changes.email.unwrap_or_else(|| user.email().clone()),
            changes.rfid.unwrap_or_else(|| user.rfid().clone()),
            changes.available.unwrap_or(user.is_available()),
            user.entered_department(),
            user.created_at(),
            Utc::now(),
        );
        Ok(user.clone())
    }
}
