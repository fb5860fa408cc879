//! IMS server library
//!
//! Inventory management backend: items, the stock movements recorded against
//! them and a daily summary, served as hypermedia JSON over HTTP.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod links;
pub mod middleware_helpers;
pub mod migrator;
pub mod openapi;
pub mod repositories;
pub mod services;
pub mod tracing;

use axum::{
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use sea_orm::DatabaseConnection;
use serde_json::json;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::links::LinkBuilder;
use crate::repositories::{ItemActionRepository, ItemRepository};
use crate::services::{ItemActionService, ItemService, ItemSummaryService};

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    services: AppServices,
    links: LinkBuilder,
}

#[derive(Clone)]
struct AppServices {
    items: ItemService,
    item_actions: ItemActionService,
    item_summary: ItemSummaryService,
}

impl AppState {
    /// Wires the sea-orm stores into the services.
    pub fn new(db: Arc<DatabaseConnection>, config: config::AppConfig) -> Self {
        let item_store = Arc::new(ItemRepository::new(db.clone()));
        let action_store = Arc::new(ItemActionRepository::new(db.clone()));

        let services = AppServices {
            items: ItemService::new(item_store.clone()),
            item_actions: ItemActionService::new(item_store, action_store.clone()),
            item_summary: ItemSummaryService::new(action_store),
        };
        let links = LinkBuilder::new(config.link_base());

        Self {
            db,
            config,
            services,
            links,
        }
    }

    pub fn item_service(&self) -> &ItemService {
        &self.services.items
    }

    pub fn item_action_service(&self) -> &ItemActionService {
        &self.services.item_actions
    }

    pub fn item_summary_service(&self) -> &ItemSummaryService {
        &self.services.item_summary
    }

    pub fn links(&self) -> &LinkBuilder {
        &self.links
    }
}

/// Routes served under `/api`
pub fn api_routes() -> Router<AppState> {
    use handlers::{item_actions, item_summary, items};

    Router::new()
        .route("/items", get(items::list_items).post(items::create_item))
        // Static segment wins over `:item_id`
        .route("/items/summary", get(item_summary::get_item_summary))
        .route(
            "/items/:item_id",
            get(items::get_item)
                .put(items::replace_item)
                .delete(items::delete_item),
        )
        .route(
            "/items/:item_id/itemActions",
            get(item_actions::list_item_actions).post(item_actions::create_item_action),
        )
        .route(
            "/items/:item_id/itemActions/:action_id",
            get(item_actions::get_item_action)
                .put(item_actions::replace_item_action)
                .delete(item_actions::delete_item_action),
        )
        .route("/status", get(api_status))
}

/// Full application router with middleware and docs
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes())
        .merge(openapi::swagger_ui())
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(crate::tracing::RequestSpanMaker))
        .layer(axum::middleware::from_fn(request_logging_middleware))
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id_middleware,
        ))
        .with_state(state)
}

fn cors_layer(cfg: &config::AppConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
        .expose_headers([
            header::LOCATION,
            header::HeaderName::from_static(middleware_helpers::request_id::REQUEST_ID_HEADER),
        ]);

    match HeaderValue::from_str(&cfg.cors_allowed_origin) {
        Ok(origin) => layer.allow_origin(origin),
        Err(e) => {
            ::tracing::warn!(
                origin = %cfg.cors_allowed_origin,
                error = %e,
                "Ignoring invalid CORS origin"
            );
            layer
        }
    }
}

async fn api_status(State(state): State<AppState>) -> Json<serde_json::Value> {
    let version = env!("CARGO_PKG_VERSION");
    let git = option_env!("GIT_HASH").unwrap_or("unknown");
    let build_time = option_env!("BUILD_TIME").unwrap_or("unknown");

    Json(json!({
        "status": "ok",
        "version": version,
        "git": git,
        "build_time": build_time,
        "service": "ims-server",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "environment": state.config.environment,
    }))
}

async fn health_check(State(state): State<AppState>) -> Response {
    let db_healthy = db::check_connection(&state.db).await.is_ok();
    let status = if db_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let body = json!({
        "status": if db_healthy { "healthy" } else { "unhealthy" },
        "checks": {
            "database": if db_healthy { "healthy" } else { "unhealthy" },
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (status, Json(body)).into_response()
}

// Request logging middleware
async fn request_logging_middleware(
    request: axum::http::Request<axum::body::Body>,
    next: axum::middleware::Next,
) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = std::time::Instant::now();

    ::tracing::debug!(method = %method, uri = %uri, "Incoming request");

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    ::tracing::info!(
        method = %method,
        uri = %uri,
        status = status.as_u16(),
        elapsed_ms = duration.as_millis() as u64,
        "Request completed"
    );

    response
}
