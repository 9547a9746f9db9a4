use surrealdb::{Surreal, engine::local::Db};

use crate::{
    db::{FUEL_TABLE, MAINTENANCE_TABLE},
    error::{AppError, Result},
    models::{FuelRecord, MaintenanceRecord},
};

// Helper to execute a query and extract maintenance records
pub async fn query_maintenance_records(
    db: &Surreal<Db>,
    query: &str,
) -> Result<Vec<MaintenanceRecord>> {
    let mut result = db.query(query).await?;
    let records: Vec<MaintenanceRecord> = result.take(0)?;
    Ok(records)
}

// Helper to execute a query and extract fuel records
pub async fn query_fuel_records(db: &Surreal<Db>, query: &str) -> Result<Vec<FuelRecord>> {
    let mut result = db.query(query).await?;
    let records: Vec<FuelRecord> = result.take(0)?;
    Ok(records)
}

pub async fn all_maintenance_records(db: &Surreal<Db>) -> Result<Vec<MaintenanceRecord>> {
    query_maintenance_records(db, "SELECT * FROM maintenance ORDER BY date DESC").await
}

pub async fn all_fuel_records(db: &Surreal<Db>) -> Result<Vec<FuelRecord>> {
    query_fuel_records(db, "SELECT * FROM fuel ORDER BY date DESC").await
}

pub async fn get_maintenance_record_by_id(db: &Surreal<Db>, id: &str) -> Result<MaintenanceRecord> {
    let record: Option<MaintenanceRecord> = db.select((MAINTENANCE_TABLE, id)).await?;
    record.ok_or(AppError::MaintenanceRecordNotFound)
}

pub async fn get_fuel_record_by_id(db: &Surreal<Db>, id: &str) -> Result<FuelRecord> {
    let record: Option<FuelRecord> = db.select((FUEL_TABLE, id)).await?;
    record.ok_or(AppError::FuelRecordNotFound)
}

/// Highest odometer reading across both tables, if any was recorded.
pub async fn latest_odometer(db: &Surreal<Db>) -> Result<Option<i32>> {
    let fuel = all_fuel_records(db).await?;
    let maintenance = all_maintenance_records(db).await?;
    Ok(fuel
        .iter()
        .map(|r| r.odometer)
        .chain(maintenance.iter().filter_map(|r| r.odometer))
        .max())
}
