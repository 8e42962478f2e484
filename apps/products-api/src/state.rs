//! Application state management

use mongodb::{Client, Database};

/// Shared application state. The client is pooled and cheap to clone; it is
/// created once at startup and shut down after the server drains.
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub mongo_client: Client,
    pub db: Database,
}
