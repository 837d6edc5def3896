//! Wire types exchanged between the registry server and its clients.

pub mod protocol;

pub use protocol::*;
