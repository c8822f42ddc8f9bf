//! Actix-Web server for a materialized dashboard.
//!
//! Everything served is computed before the server starts; handlers only
//! read shared state.

use actix_web::{App, HttpResponse, HttpServer, middleware, web};
use serde::{Deserialize, Serialize};

use crate::{Dashboard, DashboardError, page};

/// Default bind address when `BIND_ADDR` is unset.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1";
/// Default port when `PORT` is unset or invalid.
pub const DEFAULT_PORT: u16 = 8080;

/// Shared application state.
pub struct AppState {
    /// The dashboard being served.
    pub dashboard: Dashboard,
    /// The rendered page.
    pub page: String,
}

impl AppState {
    /// Renders the page for `dashboard` up front.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Json`] if a figure fails to serialize.
    pub fn new(dashboard: Dashboard) -> Result<Self, DashboardError> {
        let page = page::render(&dashboard)?;
        Ok(Self { dashboard, page })
    }
}

/// `GET /api/health` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiHealth {
    /// Always `true` while the server is answering.
    pub healthy: bool,
    /// Crate version.
    pub version: String,
}

/// `GET /`
pub async fn index(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(state.page.clone())
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/figures/main`
pub async fn main_figure(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.dashboard.main())
}

/// `GET /api/figures/grid`
pub async fn grid(state: web::Data<AppState>) -> HttpResponse {
    match state.dashboard.grid() {
        Some(grid) => HttpResponse::Ok().json(grid),
        None => HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("Map source '{}' has no grid", state.dashboard.source_id())
        })),
    }
}

/// Registers the dashboard routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index)).service(
        web::scope("/api")
            .route("/health", web::get().to(health))
            .route("/figures/main", web::get().to(main_figure))
            .route("/figures/grid", web::get().to(grid)),
    );
}

/// Reads `BIND_ADDR` and `PORT`, falling back to `127.0.0.1:8080`.
#[must_use]
pub fn bind_address() -> (String, u16) {
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);
    (bind_addr, port)
}

/// Serves `dashboard` until the process is stopped.
///
/// # Errors
///
/// Returns [`DashboardError`] if the page cannot be rendered or the
/// server cannot bind.
pub async fn serve(dashboard: Dashboard) -> Result<(), DashboardError> {
    let state = web::Data::new(AppState::new(dashboard)?);
    let (bind_addr, port) = bind_address();

    log::info!("Serving '{}' on http://{bind_addr}:{port}", state.dashboard.source_id());

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await?;

    Ok(())
}
