//! Store-backed liveness endpoint.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use bookstore_db::Probe;
use serde_json::json;

/// Shared liveness probe injected into the health route.
pub type SharedProbe = Arc<dyn Probe>;

/// Router exposing `GET /health`.
pub fn routes(probe: SharedProbe) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .with_state(probe)
}

/// Healthy only when the store answers a ping.
async fn health_check(State(probe): State<SharedProbe>) -> impl IntoResponse {
    match probe.ping().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "message": "healthy" }))),
        Err(err) => {
            tracing::warn!(error = %err, "health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "message": "Unhealthy", "error": err.to_string() })),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::Request,
    };
    use bookstore_db::DbError;
    use serde_json::Value;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tower::ServiceExt;

    /// Store that becomes reachable once `online` is flipped.
    #[derive(Default)]
    struct SwitchableStore {
        online: AtomicBool,
    }

    #[async_trait]
    impl Probe for SwitchableStore {
        async fn ping(&self) -> bookstore_db::Result<()> {
            if self.online.load(Ordering::SeqCst) {
                Ok(())
            } else {
                Err(DbError::Store(sqlx::Error::PoolTimedOut))
            }
        }
    }

    async fn get_health(router: Router) -> (StatusCode, Value) {
        let response = router
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn reports_unhealthy_until_store_is_reachable() {
        let store = Arc::new(SwitchableStore::default());
        let router = routes(store.clone());

        let (status, body) = get_health(router.clone()).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["message"], "Unhealthy");
        assert!(body["error"].as_str().unwrap().contains("store error"));

        store.online.store(true, Ordering::SeqCst);

        let (status, body) = get_health(router).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "healthy" }));
    }
}
