pub mod helpers;

use surrealdb::{Surreal, engine::local::Db};
use tracing::{error, info};

pub const MAINTENANCE_TABLE: &str = "maintenance";
pub const FUEL_TABLE: &str = "fuel";

pub async fn setup_database(db: &Surreal<Db>) {
    let schema = r#"
        DEFINE TABLE IF NOT EXISTS maintenance SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS idx_maintenance_date ON maintenance FIELDS date;
        DEFINE INDEX IF NOT EXISTS idx_maintenance_type ON maintenance FIELDS service_type;
        DEFINE TABLE IF NOT EXISTS fuel SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS idx_fuel_date ON fuel FIELDS date;
    "#;

    match db.query(schema).await.and_then(|response| response.check()) {
        Ok(_) => info!("Database schema ready"),
        Err(e) => error!("Failed to set up database schema: {}", e),
    }
}
