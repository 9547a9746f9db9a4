use crate::middleware::SessionId;
use axum::{
    Json,
    extract::{Extension, Path, Query},
};
use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    cache::LookupKind,
    calculations::{calculate_maintenance_spent, normalize_decimal},
    dates,
    db::{
        MAINTENANCE_TABLE,
        helpers::{all_maintenance_records, get_maintenance_record_by_id},
    },
    error::{AppError, Result},
    handlers::{filter_by_range, requested_range},
    models::{
        CreateMaintenanceRecordRequest, MaintenanceRecord, MaintenanceRecordRow,
        MaintenanceRecordUpdate, MaintenanceSummary, PeriodQuery, RecurringProblemsResponse,
        UpdateMaintenanceRecordRequest,
    },
    recurring::find_recurring_problems,
    state::AppState,
    validation,
};

pub async fn get_maintenance_records(
    Extension(state): Extension<Arc<AppState>>,
    session: SessionId,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<Vec<MaintenanceRecord>>> {
    info!("Fetching maintenance records for session {}", session.0);
    let range = requested_range(&query)?;
    let db = state.db_provider.get_db(Some(&session.0)).await?;

    let records = filter_by_range(all_maintenance_records(&db).await?, range.as_ref(), |r| {
        r.date.as_str()
    });

    info!("Retrieved {} maintenance records", records.len());
    Ok(Json(records))
}

pub async fn create_maintenance_record(
    Extension(state): Extension<Arc<AppState>>,
    session: SessionId,
    Json(payload): Json<CreateMaintenanceRecordRequest>,
) -> Result<Json<MaintenanceRecord>> {
    info!("Creating maintenance record: {}", payload.service_type);

    let service_type = validation::normalize_label("service_type", &payload.service_type)?;
    let date = validation::normalize_date(&payload.date)?;
    if let Some(cost) = &payload.cost {
        validation::validate_monetary_value("cost", cost)?;
    }
    if let Some(km) = payload.odometer {
        validation::validate_odometer(km)?;
    }

    let row = MaintenanceRecordRow {
        service_type,
        date,
        cost: payload.cost.map(normalize_decimal),
        odometer: payload.odometer,
        workshop: validation::sanitize_notes(payload.workshop),
        notes: validation::sanitize_notes(payload.notes),
    };

    let db = state.db_provider.get_db(Some(&session.0)).await?;
    let record: Option<MaintenanceRecord> = db.create(MAINTENANCE_TABLE).content(row).await?;
    let record = record.ok_or_else(|| {
        AppError::Database(Box::new(surrealdb::Error::Api(
            surrealdb::error::Api::Query("Failed to create maintenance record".to_string()),
        )))
    })?;

    state
        .lookups
        .invalidate(state.lookup_scope(&session.0), LookupKind::MAINTENANCE);

    info!(
        "Maintenance record created successfully: id={}, {} on {}",
        record.id.id,
        record.service_type,
        dates::format_localized(&record.date)
    );
    Ok(Json(record))
}

pub async fn update_maintenance_record(
    Extension(state): Extension<Arc<AppState>>,
    session: SessionId,
    Path(id): Path<String>,
    Json(payload): Json<UpdateMaintenanceRecordRequest>,
) -> Result<Json<MaintenanceRecord>> {
    info!("Updating maintenance record: id={}", id);
    let db = state.db_provider.get_db(Some(&session.0)).await?;

    let existing = get_maintenance_record_by_id(&db, &id).await?;

    let service_type = match payload.service_type.as_deref() {
        Some(text) => validation::normalize_label("service_type", text)?,
        None => existing.service_type,
    };
    let date = match payload.date.as_deref() {
        Some(text) => validation::normalize_date(text)?,
        None => existing.date,
    };
    // An outer Some means the field was sent; an inner None clears the column
    let cost = match payload.cost {
        Some(inner) => inner,
        None => existing.cost,
    };
    if let Some(cost) = &cost {
        validation::validate_monetary_value("cost", cost)?;
    }
    let odometer = match payload.odometer {
        Some(inner) => inner,
        None => existing.odometer,
    };
    if let Some(km) = odometer {
        validation::validate_odometer(km)?;
    }
    let workshop = match payload.workshop {
        Some(inner) => validation::sanitize_notes(inner),
        None => existing.workshop,
    };
    let notes = match payload.notes {
        Some(inner) => validation::sanitize_notes(inner),
        None => existing.notes,
    };

    let update = MaintenanceRecordUpdate {
        service_type: Some(service_type),
        date: Some(date),
        cost: cost.map(normalize_decimal),
        odometer,
        workshop,
        notes,
    };

    let updated: Option<MaintenanceRecord> = db
        .update((MAINTENANCE_TABLE, id.as_str()))
        .merge(update)
        .await?;
    let updated = updated.ok_or(AppError::MaintenanceRecordNotFound)?;

    state
        .lookups
        .invalidate(state.lookup_scope(&session.0), LookupKind::MAINTENANCE);

    info!("Maintenance record updated successfully: id={}", id);
    Ok(Json(updated))
}

pub async fn delete_maintenance_record(
    Extension(state): Extension<Arc<AppState>>,
    session: SessionId,
    Path(id): Path<String>,
) -> Result<Json<MaintenanceRecord>> {
    info!("Deleting maintenance record: id={}", id);
    let db = state.db_provider.get_db(Some(&session.0)).await?;

    let deleted: Option<MaintenanceRecord> = db.delete((MAINTENANCE_TABLE, id.as_str())).await?;
    let deleted = deleted.ok_or_else(|| {
        warn!("Attempted to delete missing maintenance record: id={}", id);
        AppError::MaintenanceRecordNotFound
    })?;

    state
        .lookups
        .invalidate(state.lookup_scope(&session.0), LookupKind::MAINTENANCE);

    info!("Maintenance record deleted successfully: id={}", id);
    Ok(Json(deleted))
}

/// Recomputed from the full history on every call.
pub async fn get_recurring_problems(
    Extension(state): Extension<Arc<AppState>>,
    session: SessionId,
) -> Result<Json<RecurringProblemsResponse>> {
    info!("Detecting recurring maintenance problems");
    let db = state.db_provider.get_db(Some(&session.0)).await?;

    let records = all_maintenance_records(&db).await?;
    let problems = find_recurring_problems(&records);

    info!(
        "Found {} recurring problems across {} records",
        problems.len(),
        records.len()
    );
    Ok(Json(RecurringProblemsResponse { problems }))
}

pub async fn get_maintenance_summary(
    Extension(state): Extension<Arc<AppState>>,
    session: SessionId,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<MaintenanceSummary>> {
    info!("Summarizing maintenance records");
    let range = requested_range(&query)?;
    let db = state.db_provider.get_db(Some(&session.0)).await?;

    let records = filter_by_range(all_maintenance_records(&db).await?, range.as_ref(), |r| {
        r.date.as_str()
    });

    let (start, end) = range.unzip();
    Ok(Json(MaintenanceSummary {
        start,
        end,
        services: records.len(),
        total_spent: calculate_maintenance_spent(&records),
        recurring_problems: find_recurring_problems(&records).len(),
    }))
}
