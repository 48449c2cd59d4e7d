//! Storefront API routes consumed by the single-page front end.
//!
//! Endpoints:
//! - `GET /products`                              — catalog listing, optional `?search=` name filter
//! - `GET /products/{product_id}`                 — product detail
//! - `GET /products/{product_id}/recommendations` — similar products for the current shopper
//!
//! Shopper identity is resolved upstream by the auth gateway and attached
//! as the `x-shopper-id` header before requests reach these routes. When
//! `auth.gateway_secret` is configured, requests must also carry a matching
//! `x-gateway-token` header.

use std::future::IntoFuture;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tower_http::services::ServeDir;
use tracing::{error, info, warn};
use uuid::Uuid;

use shopfront_core::domain::product::{Product, ProductId};
use shopfront_core::domain::shopper::ShopperId;
use shopfront_core::recommend::{RecommendationEngine, ScoredProduct};
use shopfront_db::repositories::{ProductRepository, SqlOrderRepository, SqlProductRepository};
use shopfront_db::DbPool;

#[derive(Clone)]
pub struct ApiState {
    products: Arc<SqlProductRepository>,
    engine: Arc<RecommendationEngine>,
    gateway_secret: Option<SecretString>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct CatalogQuery {
    pub search: Option<String>,
}

type ApiFailure = (StatusCode, Json<ApiError>);

pub fn router(
    db_pool: DbPool,
    gateway_secret: Option<SecretString>,
    static_dir: Option<PathBuf>,
) -> Router {
    let products = Arc::new(SqlProductRepository::new(db_pool.clone()));
    let orders = Arc::new(SqlOrderRepository::new(db_pool));
    let engine = Arc::new(RecommendationEngine::new(products.clone(), orders));

    let router = Router::new()
        .route("/products", get(list_products))
        .route("/products/{product_id}", get(get_product))
        .route("/products/{product_id}/recommendations", get(recommendations))
        .with_state(ApiState { products, engine, gateway_secret });

    match static_dir {
        Some(static_dir) => router.fallback_service(ServeDir::new(static_dir)),
        None => router,
    }
}

/// Serves the router until ctrl-c, then drains in-flight connections for at
/// most `shutdown_grace`.
pub async fn serve(
    bind_address: &str,
    port: u16,
    router: Router,
    shutdown_grace: Duration,
) -> anyhow::Result<()> {
    let address = format!("{bind_address}:{port}");
    let listener = tokio::net::TcpListener::bind(&address).await?;

    info!(
        event_name = "storefront.api.start",
        correlation_id = "bootstrap",
        bind_address = %address,
        "storefront API listening"
    );

    let (drain_tx, drain_rx) = tokio::sync::oneshot::channel::<()>();
    let shutdown = async move {
        let _ = tokio::signal::ctrl_c().await;
        info!(
            event_name = "storefront.api.stopping",
            correlation_id = "shutdown",
            "shutdown signal received, draining connections"
        );
        let _ = drain_tx.send(());
    };

    let server = axum::serve(listener, router).with_graceful_shutdown(shutdown).into_future();
    let drain_watchdog = async {
        let _ = drain_rx.await;
        tokio::time::sleep(shutdown_grace).await;
    };

    tokio::select! {
        result = server => result?,
        _ = drain_watchdog => {
            warn!(
                event_name = "storefront.api.drain_timeout",
                correlation_id = "shutdown",
                "graceful shutdown window elapsed, exiting"
            );
        }
    }

    Ok(())
}

async fn list_products(
    State(state): State<ApiState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<Vec<Product>>, ApiFailure> {
    let mut products = state.products.list_all().await.map_err(internal_error)?;

    if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let needle = search.to_lowercase();
        products.retain(|product| product.name.to_lowercase().contains(&needle));
    }

    Ok(Json(products))
}

async fn get_product(
    Path(product_id): Path<String>,
    State(state): State<ApiState>,
) -> Result<Json<Product>, ApiFailure> {
    let id = ProductId(product_id);
    let product = state.products.find_by_id(&id).await.map_err(internal_error)?;

    match product {
        Some(product) => Ok(Json(product)),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(ApiError { error: format!("product `{id}` was not found in the catalog") }),
        )),
    }
}

async fn recommendations(
    Path(product_id): Path<String>,
    State(state): State<ApiState>,
    headers: HeaderMap,
) -> Result<Json<Vec<ScoredProduct>>, ApiFailure> {
    let correlation_id = Uuid::new_v4();
    verify_gateway_token(&state, &headers, correlation_id)?;

    let reference = ProductId(product_id);
    let shopper = shopper_identity(&headers);

    match state.engine.recommend(&reference, shopper.as_ref()).await {
        Ok(recommendations) => {
            info!(
                event_name = "storefront.recommendations.served",
                correlation_id = %correlation_id,
                product_id = %reference,
                result_count = recommendations.len(),
                "recommendations computed"
            );
            Ok(Json(recommendations))
        }
        Err(error) if error.is_not_found() => Err((
            StatusCode::NOT_FOUND,
            Json(ApiError { error: error.to_string() }),
        )),
        Err(recommendation_error) => {
            error!(
                event_name = "storefront.recommendations.failed",
                correlation_id = %correlation_id,
                product_id = %reference,
                error = %recommendation_error,
                "recommendation computation failed"
            );
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError { error: recommendation_error.to_string() }),
            ))
        }
    }
}

fn shopper_identity(headers: &HeaderMap) -> Option<ShopperId> {
    headers
        .get("x-shopper-id")
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| ShopperId(value.to_owned()))
}

fn verify_gateway_token(
    state: &ApiState,
    headers: &HeaderMap,
    correlation_id: Uuid,
) -> Result<(), ApiFailure> {
    let Some(secret) = &state.gateway_secret else {
        return Ok(());
    };

    let presented = headers.get("x-gateway-token").and_then(|value| value.to_str().ok());
    if presented == Some(secret.expose_secret()) {
        return Ok(());
    }

    warn!(
        event_name = "storefront.api.gateway_token_rejected",
        correlation_id = %correlation_id,
        "request rejected: missing or invalid gateway token"
    );
    Err((
        StatusCode::UNAUTHORIZED,
        Json(ApiError { error: "missing or invalid gateway token".to_string() }),
    ))
}

fn internal_error(error: impl std::fmt::Display) -> ApiFailure {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(ApiError { error: error.to_string() }))
}
