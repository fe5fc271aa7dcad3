use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::{Request, State};
use axum::http::{Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use serde::Serialize;
use serde_json::Value;
use store::{MongoPointSource, PointSource, StoreConfig};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Clone)]
struct AppState {
    points: Arc<dyn PointSource>,
}

/// The only error shape clients ever see. Detail stays in the server log.
#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let port = env::var("POINTS_PORT").unwrap_or_else(|_| "5001".to_string());
    let addr: SocketAddr = format!("0.0.0.0:{port}")
        .parse()
        .expect("invalid POINTS_PORT");

    let state = AppState {
        points: Arc::new(MongoPointSource::new(StoreConfig::from_env())),
    };
    let app = points_router(state);

    info!("points api listening on http://{addr}");
    axum::serve(tokio::net::TcpListener::bind(addr).await.unwrap(), app)
        .await
        .unwrap();
}

fn points_router(state: AppState) -> Router {
    // Origins are mirrored rather than wildcarded so the permissive policy
    // stays valid alongside credentialed requests.
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods([Method::GET])
        .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION])
        .allow_credentials(true);

    Router::new()
        .route("/api/get/points", get(get_points))
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(middleware::from_fn(preflight_no_content))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> Response {
    (StatusCode::OK, "ok").into_response()
}

async fn get_points(State(state): State<AppState>) -> Response {
    match state.points.fetch_all().await {
        Ok(collections) => {
            let documents: Vec<Value> = collections.iter().map(|c| c.to_value()).collect();
            (StatusCode::OK, Json(documents)).into_response()
        }
        Err(err) => {
            error!("point lookup failed: {err}");
            let body = ErrorBody {
                code: "points_unavailable",
                message: "point data is unavailable".to_string(),
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}

/// The CORS layer answers preflights with 200; successful preflights are
/// rewritten to 204 so they carry an explicitly empty body.
async fn preflight_no_content(request: Request, next: Next) -> Response {
    let is_preflight = request.method() == Method::OPTIONS;
    let mut response = next.run(request).await;
    if is_preflight && response.status() == StatusCode::OK {
        *response.status_mut() = StatusCode::NO_CONTENT;
    }
    response
}
