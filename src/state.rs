use std::sync::Arc;

use sqlx::PgPool;
use tracing::warn;

use crate::auth::{
    jwt::JwtKeys,
    repo::{PgUserStore, UserStore},
};
use crate::config::AppConfig;
use crate::memory::MemoryStore;
use crate::notes::repo::{NoteStore, PgNoteStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub keys: JwtKeys,
    pub users: Arc<dyn UserStore>,
    pub notes: Arc<dyn NoteStore>,
    /// Held so the pool can be closed on shutdown.
    pub db: Option<PgPool>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;

        match config.database_url.clone() {
            Some(url) => {
                let db = crate::db::connect(&url, config.max_connections).await?;
                let mut state = Self::from_parts(
                    config,
                    Arc::new(PgUserStore::new(db.clone())),
                    Arc::new(PgNoteStore::new(db.clone())),
                );
                state.db = Some(db);
                Ok(state)
            }
            None => {
                warn!("DATABASE_URL not set; using in-memory store, data will not persist");
                Ok(Self::in_memory(config, Arc::new(MemoryStore::default())))
            }
        }
    }

    pub fn from_parts(
        config: AppConfig,
        users: Arc<dyn UserStore>,
        notes: Arc<dyn NoteStore>,
    ) -> Self {
        let keys = JwtKeys::new(&config.jwt);
        Self {
            config: Arc::new(config),
            keys,
            users,
            notes,
            db: None,
        }
    }

    /// Both stores backed by the same in-process `store`.
    pub fn in_memory(config: AppConfig, store: Arc<MemoryStore>) -> Self {
        Self::from_parts(config, store.clone(), store)
    }
}
