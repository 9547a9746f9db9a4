use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};
use serde_json::json;
use std::sync::Arc;

use crate::state::AppState;

pub async fn health_check(Extension(state): Extension<Arc<AppState>>) -> impl IntoResponse {
    let mut health = state.db_provider.check_health().await;
    let healthy = health["status"] == "ok";

    if let Some(body) = health.as_object_mut() {
        body.insert("cached_lookups".to_string(), json!(state.lookups.len()));
    }

    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status_code, Json(health))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::LookupKind;
    use crate::state::{DbProvider, DemoDbProvider, SingleDbProvider};
    use http_body_util::BodyExt;
    use surrealdb::{Surreal, engine::local::Mem};

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_check_persistent_mode() {
        let db = Surreal::new::<Mem>(()).await.unwrap();
        let state = Arc::new(AppState::new(DbProvider::Single(SingleDbProvider { db })));
        assert!(!state.is_demo_mode);

        let response = health_check(Extension(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["mode"], "persistent");
        assert!(body.get("db_version").is_some());
        assert_eq!(body["cached_lookups"], 0);
    }

    #[tokio::test]
    async fn test_health_check_demo_mode() {
        let state = Arc::new(AppState::new(DbProvider::Demo(DemoDbProvider::new())));
        assert!(state.is_demo_mode);
        let generation = state.lookups.generation("s1", LookupKind::Stations);
        state.lookups.insert(
            "s1",
            LookupKind::Stations,
            generation,
            vec!["Shell".to_string()],
        );

        let response = health_check(Extension(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["mode"], "demo");
        assert_eq!(body["active_sessions"], 0);
        assert_eq!(body["cached_lookups"], 1);
    }
}
