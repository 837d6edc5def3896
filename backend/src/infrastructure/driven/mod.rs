pub mod identity;
pub mod persistence;

pub use identity::RandomIdentityGenerator;
pub use persistence::*;
