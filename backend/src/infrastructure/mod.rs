// Infrastructure layer - external concerns (database, HTTP, identity generation)
// Implements interfaces defined in application layer

use std::sync::Arc;

use crate::application::UserDirectory;

pub mod driven;    // Output adapters (stores, generators)
pub mod driving;   // Input adapters (HTTP)

#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<UserDirectory>,
}

impl AppState {
    pub fn new(directory: UserDirectory) -> Self {
        Self {
            directory: Arc::new(directory),
        }
    }
}
