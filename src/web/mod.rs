pub mod extract;

use std::{sync::Arc, time::Instant};

use anyhow::{Context, Result};
use axum::{
    extract::{Request, State},
    http::{header, Method, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Json, Router,
};
use log::info;
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use crate::{
    config::Config,
    db::Db,
    error::AppError,
    schemas::{
        CreatePropertyRequest, Message, PropertiesListResponse, PropertyResponse,
        UpdatePropertyRequest,
    },
    services::properties,
};
use extract::{PropertyId, ValidJson, ValidQuery};

pub const DEFAULT_LIMIT: u32 = 100;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Db,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub skip: u32,
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/property", get(list_properties).post(create_property))
        .route("/property/", get(list_properties).post(create_property))
        .route(
            "/property/:id",
            get(get_property)
                .patch(update_property)
                .delete(delete_property),
        )
        .layer(middleware::from_fn(log_requests))
        .layer(cors())
        .with_state(state)
}

pub async fn start_http_server(
    state: AppState,
    mut shutdown_rx: tokio::sync::broadcast::Receiver<()>,
) -> Result<()> {
    let bind_addr = state.config.bind_address();

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind http listener on {bind_addr}"))?;
    info!("Listening on {}", bind_addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
        })
        .await
        .context("HTTP server crashed")
}

async fn log_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(req).await;
    info!(
        "{} {} -> {} ({:?})",
        method,
        path,
        response.status().as_u16(),
        start.elapsed()
    );
    response
}

/// Any origin may call the API with a JSON body.
fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_headers([header::CONTENT_TYPE])
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
}

async fn root() -> Json<Message> {
    Json(Message::new("Hello World!"))
}

async fn create_property(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<CreatePropertyRequest>,
) -> Result<(StatusCode, Json<PropertyResponse>), AppError> {
    let property = properties::add_property(&state.db, body).await?;
    Ok((StatusCode::CREATED, Json(property.into())))
}

async fn list_properties(
    State(state): State<AppState>,
    ValidQuery(ListParams { limit, skip }): ValidQuery<ListParams>,
) -> Result<Json<PropertiesListResponse>, AppError> {
    let found = properties::get_all_properties(&state.db, limit, skip).await?;
    Ok(Json(found.into()))
}

async fn get_property(
    State(state): State<AppState>,
    PropertyId(id): PropertyId,
) -> Result<Json<PropertyResponse>, AppError> {
    let property = properties::get_property_by_id(&state.db, id).await?;
    Ok(Json(property.into()))
}

async fn update_property(
    State(state): State<AppState>,
    PropertyId(id): PropertyId,
    ValidJson(body): ValidJson<UpdatePropertyRequest>,
) -> Result<Json<PropertyResponse>, AppError> {
    let property = properties::update_property(&state.db, id, body).await?;
    Ok(Json(property.into()))
}

async fn delete_property(
    State(state): State<AppState>,
    PropertyId(id): PropertyId,
) -> Result<Json<Message>, AppError> {
    properties::delete_property(&state.db, id).await?;
    Ok(Json(Message::new("Property deleted")))
}
