//! Router builder for the bookstore HTTP server

use axum::{extract::Request, http::HeaderValue, routing::get, Router};
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use utoipa::openapi::{InfoBuilder, OpenApiBuilder};
use uuid::Uuid;

use bookstore_kernel::ModuleRegistry;

/// Versioned prefix every module is mounted under.
pub const API_PREFIX: &str = "/api/v1";

/// Builder for constructing the main HTTP router.
///
/// Routes must be added before middleware: axum layers only wrap the routes
/// that exist when `layer` is called.
pub struct RouterBuilder {
    router: Router,
}

impl RouterBuilder {
    /// Create a new router builder
    pub fn new() -> Self {
        Self {
            router: Router::new(),
        }
    }

    /// Add a route to the router
    pub fn route(mut self, path: &str, route: axum::routing::MethodRouter) -> Self {
        self.router = self.router.route(path, route);
        self
    }

    /// Merge a fully-built router (state already applied)
    pub fn merge(mut self, other: Router) -> Self {
        self.router = self.router.merge(other);
        self
    }

    /// Mount a module's router under `/api/v1/{module_name}`
    pub fn mount_module(mut self, module_name: &str, module_router: Router) -> Self {
        let api_path = format!("{}/{}", API_PREFIX, module_name);
        self.router = self.router.nest(&api_path, module_router);
        self
    }

    /// Add tracing middleware
    pub fn with_tracing(mut self) -> Self {
        self.router = self.router.layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(true))
                .on_request(DefaultOnRequest::new().level(tracing::Level::INFO))
                .on_response(DefaultOnResponse::new().level(tracing::Level::INFO)),
        );
        self
    }

    /// Add CORS middleware allowing every origin, method and header.
    ///
    /// Intended for local development only.
    pub fn with_cors(mut self) -> Self {
        self.router = self.router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
                .max_age(Duration::from_secs(12 * 60 * 60)),
        );
        self
    }

    /// Add request ID middleware: generate `x-request-id` and echo it back
    pub fn with_request_id(mut self) -> Self {
        self.router = self
            .router
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7));
        self
    }

    /// Serve the OpenAPI document assembled from every module's fragment at
    /// `/docs/openapi.json`
    pub fn with_openapi(mut self, registry: &ModuleRegistry) -> Self {
        let openapi_spec = build_openapi(registry);

        self.router = self.router.route(
            "/docs/openapi.json",
            get(move || async move { axum::Json(openapi_spec.clone()) }),
        );

        self
    }

    /// Build the final router
    pub fn build(self) -> Router {
        self.router
    }
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Merge module OpenAPI fragments into one document.
pub fn build_openapi(registry: &ModuleRegistry) -> serde_json::Value {
    let base = OpenApiBuilder::new()
        .info(
            InfoBuilder::new()
                .title("Bookstore API")
                .version(env!("CARGO_PKG_VERSION"))
                .description(Some("Book inventory service"))
                .build(),
        )
        .build();

    let mut openapi_spec = serde_json::to_value(&base).unwrap_or_else(|_| serde_json::json!({}));
    openapi_spec["paths"] = serde_json::json!({});
    openapi_spec["components"] = serde_json::json!({ "schemas": {} });

    // Add common error response schema
    openapi_spec["components"]["schemas"]["ErrorResponse"] = serde_json::json!({
        "type": "object",
        "properties": {
            "error": { "type": "string" },
            "code": { "type": "string" },
            "trace_id": { "type": "string" },
            "timestamp": { "type": "string" }
        },
        "required": ["error", "code", "trace_id", "timestamp"]
    });

    openapi_spec["paths"]["/health"] = serde_json::json!({
        "get": {
            "summary": "Store liveness check",
            "responses": {
                "200": { "description": "Store answered a ping" },
                "503": { "description": "Store unreachable" }
            }
        }
    });

    for module in registry.modules() {
        let Some(module_spec) = module.openapi() else {
            continue;
        };

        // Prefix module paths with /api/v1/{module_name}
        if let Some(paths) = module_spec.get("paths").and_then(|p| p.as_object()) {
            for (path, path_item) in paths {
                let prefixed_path = match path.as_str() {
                    "/" => format!("{}/{}", API_PREFIX, module.name()),
                    other => format!("{}/{}{}", API_PREFIX, module.name(), other),
                };
                openapi_spec["paths"][prefixed_path] = path_item.clone();
            }
        }

        if let Some(schemas) = module_spec
            .get("components")
            .and_then(|c| c.get("schemas"))
            .and_then(|s| s.as_object())
        {
            for (schema_name, schema_def) in schemas {
                openapi_spec["components"]["schemas"][schema_name] = schema_def.clone();
            }
        }
    }

    openapi_spec
}

/// Request ID generator producing time-ordered UUIDs
#[derive(Clone, Copy, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let request_id = Uuid::now_v7().to_string().parse::<HeaderValue>().ok()?;
        Some(RequestId::new(request_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use bookstore_kernel::Module;
    use std::sync::Arc;
    use tower::ServiceExt;

    struct ShelfModule;

    #[async_trait]
    impl Module for ShelfModule {
        fn name(&self) -> &'static str {
            "shelves"
        }

        fn routes(&self) -> Router {
            Router::new()
                .route("/", get(|| async { "all shelves" }))
                .route("/{id}", get(|| async { "one shelf" }))
        }

        fn openapi(&self) -> Option<serde_json::Value> {
            Some(serde_json::json!({
                "paths": {
                    "/": { "get": { "summary": "List shelves" } },
                    "/{id}": { "get": { "summary": "Get shelf" } }
                },
                "components": { "schemas": { "Shelf": { "type": "object" } } }
            }))
        }
    }

    fn registry() -> ModuleRegistry {
        let mut registry = ModuleRegistry::new();
        registry.register(Arc::new(ShelfModule));
        registry
    }

    async fn send_get(router: Router, uri: &str) -> axum::response::Response {
        router
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_module_mounting() {
        let router = RouterBuilder::new()
            .mount_module("shelves", ShelfModule.routes())
            .build();

        let response = send_get(router.clone(), "/api/v1/shelves").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"all shelves");

        let response = send_get(router, "/api/v1/shelves/7").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_middleware_chain_sets_request_id() {
        let router = RouterBuilder::new()
            .route("/ping", get(|| async { "pong" }))
            .with_tracing()
            .with_cors()
            .with_request_id()
            .build();

        let response = send_get(router, "/ping").await;
        assert_eq!(response.status(), StatusCode::OK);
        let request_id = response.headers().get("x-request-id").unwrap();
        assert!(Uuid::parse_str(request_id.to_str().unwrap()).is_ok());
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let router = RouterBuilder::new()
            .route("/ping", get(|| async { "pong" }))
            .with_cors()
            .build();

        let response = router
            .oneshot(
                Request::get("/ping")
                    .header("origin", "http://localhost:3001")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn test_openapi_document_merges_modules() {
        let registry = registry();
        let spec = build_openapi(&registry);

        assert_eq!(spec["info"]["title"], "Bookstore API");
        assert!(spec["paths"].get("/health").is_some());
        assert!(spec["paths"].get("/api/v1/shelves").is_some());
        assert!(spec["paths"].get("/api/v1/shelves/{id}").is_some());
        assert!(spec["components"]["schemas"].get("Shelf").is_some());
        assert!(spec["components"]["schemas"].get("ErrorResponse").is_some());

        let router = RouterBuilder::new().with_openapi(&registry).build();
        let response = send_get(router, "/docs/openapi.json").await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
