#![allow(dead_code)]

use autolog::middleware::SessionId;
use autolog::state::{AppState, DbProvider, SingleDbProvider};
use std::sync::Arc;
use surrealdb::{
    Surreal,
    engine::local::{Db, Mem},
};

/// Create a fresh in-memory test database with schema
pub async fn setup_test_db() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(())
        .await
        .expect("Failed to create in-memory DB");
    db.use_ns("test")
        .use_db("test")
        .await
        .expect("Failed to use namespace/database");

    // Setup schema using the same function as production
    autolog::db::setup_database(&db).await;

    db
}

/// Application state backed by a fresh in-memory database
pub async fn setup_test_state() -> Arc<AppState> {
    let db = setup_test_db().await;
    Arc::new(AppState::new(DbProvider::Single(SingleDbProvider { db })))
}

pub fn session() -> SessionId {
    SessionId("test-session".to_string())
}
