// Driven port - synthetic identities for badge-only registration

use crate::domain::{DisplayName, Email};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntheticIdentity {
    pub name: DisplayName,
    pub email: Email,
    pub entered_department: bool,
}

/// Produces a person name, an email derived from it and an independent
/// presence flag for users registered from a bare RFID tag. Errors carry
/// the validation message of the rejected value.
pub trait IdentityGenerator: Send + Sync {
    fn generate(&self) -> Result<SyntheticIdentity, String>;
}
