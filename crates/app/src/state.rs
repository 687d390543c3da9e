//! Application state management

use std::sync::Arc;

use hostel_admin_core::{AdminSession, AppConfig, Database, Result, RosterEngine};
use tracing::info;

/// Roster engine writing through the local database
pub type Engine = RosterEngine<Arc<Database>>;

/// Main application state
pub struct AppState {
    pub config: AppConfig,
    pub db: Arc<Database>,
}

impl AppState {
    /// Open the configured database
    pub fn new(config: AppConfig) -> Result<Self> {
        let db_path = config.database_path()?;
        let db = Database::open(&db_path)?;
        info!(path = %db_path.display(), policy = ?config.lifecycle.policy, "Opened admin database");

        Ok(Self {
            config,
            db: Arc::new(db),
        })
    }

    /// Engine using the configured transition policy, loaded from the store
    pub async fn engine(&self) -> Result<Engine> {
        let mut engine = RosterEngine::new(self.db.clone(), self.config.lifecycle.policy);
        engine.refresh().await?;
        Ok(engine)
    }

    pub fn sign_in(&self, email: &str, password: &str) -> Result<AdminSession> {
        self.db.authenticate(email, password)
    }
}
