use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use surrealdb::sql::Thing;

use crate::dates::Period;

fn serialize_thing_as_string<S>(thing: &Thing, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&thing.id.to_string())
}

// Custom deserializer to handle both int and decimal from database
fn deserialize_flexible_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FlexibleDecimal {
        Int(i64),
        Decimal(Decimal),
    }

    match FlexibleDecimal::deserialize(deserializer)? {
        FlexibleDecimal::Int(i) => Ok(Decimal::from(i)),
        FlexibleDecimal::Decimal(d) => Ok(d),
    }
}

fn deserialize_optional_flexible_decimal<'de, D>(
    deserializer: D,
) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FlexibleDecimal {
        Int(i64),
        Decimal(Decimal),
    }

    let opt: Option<FlexibleDecimal> = Option::deserialize(deserializer)?;
    match opt {
        Some(FlexibleDecimal::Int(i)) => Ok(Some(Decimal::from(i))),
        Some(FlexibleDecimal::Decimal(d)) => Ok(Some(d)),
        None => Ok(None),
    }
}

// Distinguishes a missing field (None) from an explicit null (Some(None))
fn deserialize_optional_field<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Some(Option::<T>::deserialize(deserializer)?))
}

/// A single logged service event. `date` is stored as ISO `YYYY-MM-DD`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MaintenanceRecord {
    #[serde(serialize_with = "serialize_thing_as_string")]
    pub id: Thing,
    pub service_type: String,
    pub date: String,
    #[serde(default, deserialize_with = "deserialize_optional_flexible_decimal")]
    pub cost: Option<Decimal>,
    #[serde(default)]
    pub odometer: Option<i32>,
    #[serde(default)]
    pub workshop: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MaintenanceRecordRow {
    pub service_type: String,
    pub date: String,
    pub cost: Option<Decimal>,
    pub odometer: Option<i32>,
    pub workshop: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Default)]
pub struct MaintenanceRecordUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    // Optional columns are always written; null clears them
    pub cost: Option<Decimal>,
    pub odometer: Option<i32>,
    pub workshop: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateMaintenanceRecordRequest {
    pub service_type: String,
    pub date: String,
    pub cost: Option<Decimal>,
    pub odometer: Option<i32>,
    pub workshop: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMaintenanceRecordRequest {
    pub service_type: Option<String>,
    pub date: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_field")]
    pub cost: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "deserialize_optional_field")]
    pub odometer: Option<Option<i32>>,
    #[serde(default, deserialize_with = "deserialize_optional_field")]
    pub workshop: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_optional_field")]
    pub notes: Option<Option<String>>,
}

/// A single logged fuel purchase. `date` is stored as ISO `YYYY-MM-DD`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FuelRecord {
    #[serde(serialize_with = "serialize_thing_as_string")]
    pub id: Thing,
    pub station: String,
    #[serde(deserialize_with = "deserialize_flexible_decimal")]
    pub liters: Decimal,
    pub fuel_type: String,
    #[serde(deserialize_with = "deserialize_flexible_decimal")]
    pub total_cost: Decimal,
    pub odometer: i32,
    pub date: String,
}

#[derive(Debug, Serialize)]
pub struct FuelRecordRow {
    pub station: String,
    pub liters: Decimal,
    pub fuel_type: String,
    pub total_cost: Decimal,
    pub odometer: i32,
    pub date: String,
}

#[derive(Debug, Serialize, Default)]
pub struct FuelRecordUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub station: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub liters: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuel_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_cost: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub odometer: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateFuelRecordRequest {
    pub station: String,
    pub liters: Decimal,
    pub fuel_type: String,
    pub total_cost: Decimal,
    pub odometer: i32,
    pub date: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateFuelRecordRequest {
    pub station: Option<String>,
    pub liters: Option<Decimal>,
    pub fuel_type: Option<String>,
    pub total_cost: Option<Decimal>,
    pub odometer: Option<i32>,
    pub date: Option<String>,
}

/// Either a named period relative to today or an explicit range.
/// Neither means "all records".
#[derive(Debug, Deserialize, Default)]
pub struct PeriodQuery {
    pub period: Option<Period>,
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RecurringEvent {
    pub id: String,
    pub date: String,
    pub cost: Option<Decimal>,
    pub odometer: Option<i32>,
}

/// Same-type services clustered closer than the type's usual interval.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RecurringProblem {
    pub service_type: String,
    pub count: usize,
    pub within_months: u32,
    pub events: Vec<RecurringEvent>,
    pub reason: String,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RecurringProblemsResponse {
    pub problems: Vec<RecurringProblem>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FuelEconomy {
    pub total_distance: i32,
    pub total_liters: Decimal,
    pub avg_km_per_liter: Decimal,
    pub odometer_inconsistent: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FuelSummary {
    pub start: Option<String>,
    pub end: Option<String>,
    pub fill_ups: usize,
    pub total_spent: Decimal,
    pub avg_price_per_liter: Option<Decimal>,
    pub cost_per_km: Option<Decimal>,
    #[serde(flatten)]
    pub economy: FuelEconomy,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MaintenanceSummary {
    pub start: Option<String>,
    pub end: Option<String>,
    pub services: usize,
    pub total_spent: Decimal,
    pub recurring_problems: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Workshop {
    pub name: String,
    pub address: String,
    pub city: String,
    pub phone: String,
    pub services: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct WorkshopQuery {
    pub q: Option<String>,
}
