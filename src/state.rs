use std::sync::Arc;

use crate::auth::AuthKeys;
use crate::database::Database;
use crate::images::ImageHost;

/// Shared handles injected into every handler
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn Database>,
    pub images: Arc<dyn ImageHost>,
    pub auth: AuthKeys,
}

impl AppState {
    pub fn new(db: Arc<dyn Database>, images: Arc<dyn ImageHost>, auth: AuthKeys) -> Self {
        Self { db, images, auth }
    }

    pub fn db(&self) -> &dyn Database {
        self.db.as_ref()
    }
}
