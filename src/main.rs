use std::net::SocketAddr;

use axum::{
    routing::{get, post},
    Router,
};
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use mapcam_backend::{api, assets, openapi, overlay::OverlayError};

fn warm_assets() -> Result<(), OverlayError> {
    assets::load_image_cached(assets::MAP_ASSET)?;
    assets::load_image_cached(assets::ICON_ASSET)?;
    assets::font_set()?;
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let host = std::env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("BACKEND_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);

    // decode the bundle up front so the first request does not pay for it
    match warm_assets() {
        Ok(()) => info!("assets preloaded"),
        Err(e) => tracing::warn!("asset preload failed, requests will retry: {e}"),
    }

    let openapi = openapi::ApiDoc::openapi();

    let app = Router::new()
        // Swagger UI + OpenAPI schema
        .merge(
            SwaggerUi::new("/docs")
                .url("/openapi.json", openapi)
        )

        // API
        .route("/compose", post(api::compose))
        .route("/health", get(api::health));

    let addr: SocketAddr = format!("{host}:{port}").parse().expect("bind addr");
    info!("Starting mapcam-backend on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
