use crate::cache::LookupCache;
use crate::seeding::seed_demo_data;

use dashmap::DashMap;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::{Duration, Instant};
use surrealdb::{
    Surreal,
    engine::local::{Db, Mem},
};

/// Lookup cache scope shared by every session over the persistent database.
pub const SHARED_LOOKUP_SCOPE: &str = "shared";

/// Idle demo sessions older than this are dropped.
pub const DEMO_SESSION_TTL: Duration = Duration::from_secs(3600);

#[derive(Clone)]
pub enum DbProvider {
    Single(SingleDbProvider),
    Demo(DemoDbProvider),
}

impl DbProvider {
    pub async fn get_db(&self, session_id: Option<&str>) -> surrealdb::Result<Surreal<Db>> {
        match self {
            DbProvider::Single(p) => p.get_db(session_id).await,
            DbProvider::Demo(p) => p.get_db(session_id).await,
        }
    }

    pub async fn check_health(&self) -> Value {
        match self {
            DbProvider::Single(p) => match p.db.version().await {
                Ok(version) => json!({
                    "status": "ok",
                    "mode": "persistent",
                    "db_version": version.to_string(),
                }),
                Err(e) => {
                    tracing::error!("Health check failed: {}", e);
                    json!({ "status": "error", "mode": "persistent" })
                }
            },
            DbProvider::Demo(p) => json!({
                "status": "ok",
                "mode": "demo",
                "active_sessions": p.active_sessions(),
            }),
        }
    }
}

#[derive(Clone)]
pub struct SingleDbProvider {
    pub db: Surreal<Db>,
}

impl SingleDbProvider {
    async fn get_db(&self, _session_id: Option<&str>) -> surrealdb::Result<Surreal<Db>> {
        Ok(self.db.clone())
    }
}

#[derive(Clone, Default)]
pub struct DemoDbProvider {
    // Map: SessionID -> (DB Instance, Last Access Time)
    sessions: Arc<DashMap<String, (Surreal<Db>, Instant)>>,
}

impl DemoDbProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }

    /// Drops sessions idle for longer than `ttl` and returns their ids.
    pub fn cleanup_old_sessions(&self, ttl: Duration) -> Vec<String> {
        let now = Instant::now();
        let mut expired = Vec::new();
        self.sessions.retain(|id, (_, last_access)| {
            let keep = now.duration_since(*last_access) < ttl;
            if !keep {
                expired.push(id.clone());
            }
            keep
        });
        expired
    }

    async fn get_db(&self, session_id: Option<&str>) -> surrealdb::Result<Surreal<Db>> {
        let id = session_id.unwrap_or("default");

        if let Some(mut entry) = self.sessions.get_mut(id) {
            entry.1 = Instant::now();
            return Ok(entry.0.clone());
        }

        // Create new in-memory DB
        let db = Surreal::new::<Mem>(()).await?;
        db.use_ns("autolog").use_db("demo").await?;

        if let Err(e) = seed_demo_data(&db).await {
            tracing::error!("Failed to seed demo data for session {}: {:?}", id, e);
            return Err(e);
        }

        self.sessions
            .insert(id.to_string(), (db.clone(), Instant::now()));
        Ok(db)
    }
}

pub struct AppState {
    pub db_provider: Arc<DbProvider>,
    pub lookups: LookupCache,
    pub is_demo_mode: bool,
}

impl AppState {
    pub fn new(db_provider: DbProvider) -> Self {
        let is_demo_mode = matches!(db_provider, DbProvider::Demo(_));
        Self {
            db_provider: Arc::new(db_provider),
            lookups: LookupCache::new(),
            is_demo_mode,
        }
    }

    /// Lookups are cached per database: one scope for the persistent store,
    /// one per session in demo mode.
    pub fn lookup_scope<'a>(&self, session_id: &'a str) -> &'a str {
        if self.is_demo_mode {
            session_id
        } else {
            SHARED_LOOKUP_SCOPE
        }
    }

    /// Expires idle demo sessions along with their cached lookups.
    pub fn sweep_demo_sessions(&self) -> usize {
        let DbProvider::Demo(provider) = self.db_provider.as_ref() else {
            return 0;
        };
        let expired = provider.cleanup_old_sessions(DEMO_SESSION_TTL);
        for id in &expired {
            self.lookups.clear_scope(id);
        }
        expired.len()
    }
}
