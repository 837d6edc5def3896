// Application layer - registry use cases
// Orchestrates domain logic, depends on domain layer only

pub mod ports;
pub mod user_directory;

pub use user_directory::{CreateOutcome, CreateUser, CreationStrategy, UpdateUser, UserDirectory};
