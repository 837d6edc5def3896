// Application ports - Driven ports (output ports implemented by infrastructure)

pub mod identity_generator;
pub mod user_store;

pub use identity_generator::{IdentityGenerator, SyntheticIdentity};
pub use user_store::UserStore;

#[cfg(test)]
pub use user_store::MockUserStore;
