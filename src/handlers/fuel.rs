use crate::middleware::SessionId;
use axum::{
    Json,
    extract::{Extension, Path, Query},
};
use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    cache::LookupKind,
    calculations::{
        calculate_cost_per_km, calculate_fuel_economy, calculate_price_per_liter,
        calculate_total_spent, normalize_decimal,
    },
    db::{
        FUEL_TABLE,
        helpers::{all_fuel_records, get_fuel_record_by_id, latest_odometer},
    },
    error::{AppError, Result},
    handlers::{filter_by_range, requested_range},
    models::{
        CreateFuelRecordRequest, FuelRecord, FuelRecordRow, FuelRecordUpdate, FuelSummary,
        PeriodQuery, UpdateFuelRecordRequest,
    },
    state::AppState,
    validation,
};

pub async fn get_fuel_records(
    Extension(state): Extension<Arc<AppState>>,
    session: SessionId,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<Vec<FuelRecord>>> {
    info!("Fetching fuel records for session {}", session.0);
    let range = requested_range(&query)?;
    let db = state.db_provider.get_db(Some(&session.0)).await?;

    let records = filter_by_range(all_fuel_records(&db).await?, range.as_ref(), |r| {
        r.date.as_str()
    });

    info!("Retrieved {} fuel records", records.len());
    Ok(Json(records))
}

pub async fn create_fuel_record(
    Extension(state): Extension<Arc<AppState>>,
    session: SessionId,
    Json(payload): Json<CreateFuelRecordRequest>,
) -> Result<Json<FuelRecord>> {
    info!(
        "Creating fuel record at {} with odometer {}",
        payload.station, payload.odometer
    );

    let station = validation::normalize_label("station", &payload.station)?;
    let fuel_type = validation::normalize_label("fuel_type", &payload.fuel_type)?;
    let date = validation::normalize_date(&payload.date)?;
    validation::validate_liters(&payload.liters)?;
    validation::validate_monetary_value("total_cost", &payload.total_cost)?;
    validation::validate_odometer(payload.odometer)?;

    let db = state.db_provider.get_db(Some(&session.0)).await?;

    // Accepted as entered; a lower reading shows up later as an inconsistent summary
    if let Some(latest) = latest_odometer(&db).await?
        && payload.odometer < latest
    {
        warn!(
            "Fuel record odometer {} is below the latest known reading {}",
            payload.odometer, latest
        );
    }

    let row = FuelRecordRow {
        station,
        liters: normalize_decimal(payload.liters),
        fuel_type,
        total_cost: normalize_decimal(payload.total_cost),
        odometer: payload.odometer,
        date,
    };

    let record: Option<FuelRecord> = db.create(FUEL_TABLE).content(row).await?;
    let record = record.ok_or_else(|| {
        AppError::Database(Box::new(surrealdb::Error::Api(
            surrealdb::error::Api::Query("Failed to create fuel record".to_string()),
        )))
    })?;

    state
        .lookups
        .invalidate(state.lookup_scope(&session.0), LookupKind::FUEL);

    info!("Fuel record created successfully: id={}", record.id.id);
    Ok(Json(record))
}

pub async fn update_fuel_record(
    Extension(state): Extension<Arc<AppState>>,
    session: SessionId,
    Path(id): Path<String>,
    Json(payload): Json<UpdateFuelRecordRequest>,
) -> Result<Json<FuelRecord>> {
    info!("Updating fuel record: id={}", id);
    let db = state.db_provider.get_db(Some(&session.0)).await?;

    // Fail with 404 before validating the payload
    get_fuel_record_by_id(&db, &id).await?;

    let mut update = FuelRecordUpdate::default();
    if let Some(text) = payload.station.as_deref() {
        update.station = Some(validation::normalize_label("station", text)?);
    }
    if let Some(text) = payload.fuel_type.as_deref() {
        update.fuel_type = Some(validation::normalize_label("fuel_type", text)?);
    }
    if let Some(text) = payload.date.as_deref() {
        update.date = Some(validation::normalize_date(text)?);
    }
    if let Some(liters) = payload.liters {
        validation::validate_liters(&liters)?;
        update.liters = Some(normalize_decimal(liters));
    }
    if let Some(total_cost) = payload.total_cost {
        validation::validate_monetary_value("total_cost", &total_cost)?;
        update.total_cost = Some(normalize_decimal(total_cost));
    }
    if let Some(km) = payload.odometer {
        validation::validate_odometer(km)?;
        update.odometer = Some(km);
    }

    let updated: Option<FuelRecord> = db.update((FUEL_TABLE, id.as_str())).merge(update).await?;
    let updated = updated.ok_or(AppError::FuelRecordNotFound)?;

    state
        .lookups
        .invalidate(state.lookup_scope(&session.0), LookupKind::FUEL);

    info!("Fuel record updated successfully: id={}", id);
    Ok(Json(updated))
}

pub async fn delete_fuel_record(
    Extension(state): Extension<Arc<AppState>>,
    session: SessionId,
    Path(id): Path<String>,
) -> Result<Json<FuelRecord>> {
    info!("Deleting fuel record: id={}", id);
    let db = state.db_provider.get_db(Some(&session.0)).await?;

    let deleted: Option<FuelRecord> = db.delete((FUEL_TABLE, id.as_str())).await?;
    let deleted = deleted.ok_or_else(|| {
        warn!("Attempted to delete missing fuel record: id={}", id);
        AppError::FuelRecordNotFound
    })?;

    state
        .lookups
        .invalidate(state.lookup_scope(&session.0), LookupKind::FUEL);

    info!("Fuel record deleted successfully: id={}", id);
    Ok(Json(deleted))
}

pub async fn get_fuel_summary(
    Extension(state): Extension<Arc<AppState>>,
    session: SessionId,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<FuelSummary>> {
    info!("Calculating fuel summary");
    let range = requested_range(&query)?;
    let db = state.db_provider.get_db(Some(&session.0)).await?;

    let records = filter_by_range(all_fuel_records(&db).await?, range.as_ref(), |r| {
        r.date.as_str()
    });

    let economy = calculate_fuel_economy(&records);
    if economy.odometer_inconsistent {
        warn!(
            "Odometer went backwards across the selected fuel records ({} km)",
            economy.total_distance
        );
    }

    let total_spent = calculate_total_spent(&records);
    let (start, end) = range.unzip();
    let summary = FuelSummary {
        start,
        end,
        fill_ups: records.len(),
        avg_price_per_liter: calculate_price_per_liter(&total_spent, &economy.total_liters),
        cost_per_km: calculate_cost_per_km(&total_spent, economy.total_distance),
        total_spent,
        economy,
    };

    info!(
        "Fuel summary: {} fill-ups, {} km/l",
        summary.fill_ups, summary.economy.avg_km_per_liter
    );
    Ok(Json(summary))
}
