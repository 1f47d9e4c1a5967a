//! Router assembly and the middleware stack.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware::{self, Next},
    response::Response,
    routing::get,
};
use launchpad_telemetry::{set_request_context, with_request_context};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::Span;

use crate::http::errors::ApiError;
use crate::http::{health, posts, users};
use crate::state::ApiState;

const HEADER_REQUEST_ID: &str = "x-request-id";

pub(crate) fn build_router(state: Arc<ApiState>) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request| {
            let method = request.method().clone();
            let uri_path = request.uri().path();
            let request_id = header_request_id(request);

            let span = tracing::info_span!(
                "http.request",
                method = %method,
                route = %uri_path,
                request_id = tracing::field::Empty,
                status_code = tracing::field::Empty,
                latency_ms = tracing::field::Empty
            );
            set_request_context(&span, request_id, uri_path.to_string());
            span
        })
        .on_request(|request: &Request, span: &Span| {
            if let Some(matched) = request.extensions().get::<MatchedPath>() {
                let request_id = header_request_id(request);
                set_request_context(span, request_id, matched.as_str().to_string());
            }
        })
        .on_response(|response: &Response, latency: Duration, span: &Span| {
            span.record("status_code", response.status().as_u16());
            let latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
            span.record("latency_ms", latency_ms);
        });

    Router::new()
        .route("/health", get(health::health))
        .route(
            "/api/users",
            get(users::list_users).post(users::create_user),
        )
        .route("/api/users/{id}", get(users::get_user))
        .route(
            "/api/posts",
            get(posts::list_posts).post(posts::create_post),
        )
        .route("/api/posts/{id}", get(posts::get_post))
        .fallback(fallback)
        .layer(
            ServiceBuilder::new()
                .layer(launchpad_telemetry::set_request_id_layer())
                .layer(launchpad_telemetry::propagate_request_id_layer())
                .layer(trace_layer)
                .layer(middleware::from_fn(request_context))
                .layer(cors_layer()),
        )
        .with_state(state)
}

/// Permissive CORS for the browser frontend served from another origin.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Keep the request identifier reachable from error-reporting code without
/// threading it through every handler.
async fn request_context(request: Request, next: Next) -> Response {
    let request_id = header_request_id(&request);
    let route = request.uri().path().to_string();
    with_request_context(request_id, route, next.run(request)).await
}

async fn fallback() -> ApiError {
    ApiError::not_found("resource not found")
}

fn header_request_id<B>(request: &axum::http::Request<B>) -> String {
    request
        .headers()
        .get(HEADER_REQUEST_ID)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
