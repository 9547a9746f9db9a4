use crate::middleware::SessionId;
use axum::{
    Json,
    extract::{Extension, Path},
};
use std::sync::Arc;
use tracing::info;

use crate::{
    cache::LookupKind,
    db::helpers::{all_fuel_records, all_maintenance_records},
    error::Result,
    recurring::known_service_types,
    state::AppState,
    workshops::workshop_names,
};

const COMMON_FUEL_TYPES: &[&str] = &["Diesel", "Etanol", "GNV", "Gasolina", "Gasolina Aditivada"];

/// Picker values for `kind`, memoized per database until the backing records change.
pub async fn get_lookup(
    Extension(state): Extension<Arc<AppState>>,
    session: SessionId,
    Path(kind): Path<LookupKind>,
) -> Result<Json<Vec<String>>> {
    let scope = state.lookup_scope(&session.0);
    if let Some(cached) = state.lookups.get(scope, kind) {
        return Ok(Json(cached.as_ref().clone()));
    }

    info!("Building {:?} lookup for scope {}", kind, scope);
    let generation = state.lookups.generation(scope, kind);
    let db = state.db_provider.get_db(Some(&session.0)).await?;

    let values: Vec<String> = match kind {
        LookupKind::ServiceTypes => known_service_types()
            .map(String::from)
            .chain(
                all_maintenance_records(&db)
                    .await?
                    .into_iter()
                    .map(|r| r.service_type),
            )
            .collect(),
        LookupKind::Stations => all_fuel_records(&db)
            .await?
            .into_iter()
            .map(|r| r.station)
            .collect(),
        LookupKind::FuelTypes => COMMON_FUEL_TYPES
            .iter()
            .map(|s| s.to_string())
            .chain(all_fuel_records(&db).await?.into_iter().map(|r| r.fuel_type))
            .collect(),
        LookupKind::Workshops => workshop_names(),
    };

    let list = state.lookups.insert(scope, kind, generation, values);
    Ok(Json(list.as_ref().clone()))
}

pub async fn clear_lookups(
    Extension(state): Extension<Arc<AppState>>,
    session: SessionId,
) -> Json<serde_json::Value> {
    let scope = state.lookup_scope(&session.0);
    info!("Clearing lookup cache for scope {}", scope);
    state.lookups.clear_scope(scope);
    Json(serde_json::json!({ "message": "Lookup cache cleared" }))
}
