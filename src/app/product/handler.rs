//! 产品处理器

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::info;

use super::{
    model::{parse_id, Product, ProductPayload},
    store::SharedProductStore,
};
use crate::core::error::AppError;

#[derive(Clone)]
pub struct AppState {
    pub store: SharedProductStore,
}

impl AppState {
    pub fn new(store: SharedProductStore) -> Self {
        Self { store }
    }
}

pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, AppError> {
    let products = state.store.find_all().await?;
    Ok(Json(products))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, AppError> {
    let id = parse_id(&id)?;
    let product = state.store.find_by_id(id).await?;
    Ok(Json(product))
}

pub async fn create_product(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let payload = ProductPayload::decode(&body)?;
    let product = state.store.insert(payload).await?;

    info!("Created product: {} ({})", product.name, product.id);

    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Product>, AppError> {
    let id = parse_id(&id)?;
    // 先确认记录存在，再解码请求体
    let mut product = state.store.find_by_id(id).await?;
    let payload = ProductPayload::decode(&body)?;

    product.apply(payload);
    state.store.save(&product).await?;

    info!("Updated product: {} ({})", product.name, product.id);

    Ok(Json(product))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;
    let product = state.store.find_by_id(id).await?;
    state.store.delete(product.id).await?;

    info!("Deleted product: {}", product.id);

    Ok(StatusCode::NO_CONTENT)
}
