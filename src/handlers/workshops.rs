use axum::{Json, extract::Query};
use tracing::info;

use crate::{
    models::{Workshop, WorkshopQuery},
    workshops::search_workshops,
};

pub async fn list_workshops(Query(query): Query<WorkshopQuery>) -> Json<Vec<Workshop>> {
    let needle = query.q.unwrap_or_default();
    let workshops = search_workshops(&needle);
    info!("Workshop search {:?} matched {}", needle, workshops.len());
    Json(workshops)
}
