use std::env;
use std::net::SocketAddr;

use axum::Router;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use client::PointsClient;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use viewer::{Settings, ViewerQuery, page, render_map_page};

#[derive(Clone)]
struct AppState {
    points: PointsClient,
    settings: Settings,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let settings = Settings::load();
    let port = env::var("VIEWER_PORT").unwrap_or_else(|_| "8080".to_string());
    let addr: SocketAddr = format!("0.0.0.0:{port}")
        .parse()
        .expect("invalid VIEWER_PORT");

    let state = AppState {
        points: PointsClient::new(&settings.api_base_url),
        settings,
    };
    let app = viewer_router(state);

    info!("map viewer listening on http://{addr}");
    axum::serve(tokio::net::TcpListener::bind(addr).await.unwrap(), app)
        .await
        .unwrap();
}

fn viewer_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(map_page))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> Response {
    (StatusCode::OK, "ok").into_response()
}

/// A bootstrap failure never becomes an error status: the page loads with
/// no map content, optionally carrying the banner instead.
async fn map_page(State(state): State<AppState>, Query(query): Query<ViewerQuery>) -> Response {
    match render_map_page(&state.points, &query, &state.settings).await {
        Ok(body) => Html(body).into_response(),
        Err(err) => {
            error!("map bootstrap failed: {err}");
            let shell = if state.settings.show_error_banner {
                page::error_banner_shell("The map is unavailable right now.")
            } else {
                page::empty_shell()
            };
            Html(shell).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AppState, viewer_router};
    use axum::body::Body;
    use axum::http::StatusCode;
    use client::PointsClient;
    use http_body_util::BodyExt;
    use serde_json::json;
    use tower::ServiceExt;
    use viewer::Settings;

    fn spawn_server(status: u16, body: String) -> String {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("bind mock server");
        let addr = server.server_addr().to_ip().expect("ip address");
        std::thread::spawn(move || {
            for request in server.incoming_requests() {
                let header = tiny_http::Header::from_bytes(
                    &b"Content-Type"[..],
                    &b"application/json"[..],
                )
                .expect("header");
                let response = tiny_http::Response::from_string(body.clone())
                    .with_status_code(status)
                    .with_header(header);
                let _ = request.respond(response);
            }
        });
        format!("http://{addr}")
    }

    fn state(base: &str, show_error_banner: bool) -> AppState {
        let settings = Settings {
            show_error_banner,
            ..Settings::default()
        };
        AppState {
            points: PointsClient::new(base),
            settings,
        }
    }

    async fn page_body(base: &str, show_error_banner: bool) -> (StatusCode, String) {
        let request = axum::http::Request::builder()
            .uri("/")
            .body(Body::empty())
            .expect("request");
        let response = viewer_router(state(base, show_error_banner))
            .oneshot(request)
            .await
            .expect("response");
        let status = response.status();
        let bytes = response.into_body().collect().await.expect("body").to_bytes();
        (status, String::from_utf8(bytes.to_vec()).expect("utf8 body"))
    }

    #[tokio::test]
    async fn serves_the_rendered_page() {
        let document = json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [-72.5, 7.88]},
                "properties": {
                    "name": "Mina El Diamante",
                    "description": "Frente principal",
                    "image": null,
                    "type": "Mina",
                    "zona": "Norte"
                }
            }]
        });
        let base = spawn_server(200, json!([document]).to_string());

        let (status, body) = page_body(&base, false).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("PAGE_DATA"));
        assert!(body.contains("Mina El Diamante"));
    }

    #[tokio::test]
    async fn failed_bootstrap_serves_the_blank_shell() {
        let base = spawn_server(
            500,
            r#"{"code":"points_unavailable","message":"down"}"#.to_string(),
        );

        let (status, body) = page_body(&base, false).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#"<div id="map""#));
        assert!(!body.contains("PAGE_DATA"));
        assert!(!body.contains(r#"<div class="error-banner">"#));
    }

    #[tokio::test]
    async fn failed_bootstrap_serves_the_banner_when_enabled() {
        let base = spawn_server(500, "{}".to_string());

        let (status, body) = page_body(&base, true).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#"<div class="error-banner">"#));
        assert!(body.contains("The map is unavailable right now."));
    }
}
