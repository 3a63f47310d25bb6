//! Cart read and mutation endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use common::ProductId;
use domain::{
    Cart, CartEvent, CartOperation, CartOutcome, CartService, LineItem, Money, ProductCatalog,
    TracingNotifier, UpdateProductAmount,
};
use kv_store::KvStore;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<C: ProductCatalog, S: KvStore> {
    pub cart_service: CartService<C, S, TracingNotifier>,
}

// -- Request types --

#[derive(Deserialize)]
pub struct UpdateAmountRequest {
    pub amount: i64,
}

// -- Response types --

#[derive(Serialize)]
pub struct CartResponse {
    pub items: Vec<LineItemResponse>,
    pub item_count: usize,
    pub total_quantity: u64,
    pub subtotal: Money,
}

#[derive(Serialize)]
pub struct LineItemResponse {
    pub id: ProductId,
    pub title: String,
    pub price: Money,
    pub image: String,
    pub amount: u32,
    pub subtotal: Money,
}

#[derive(Serialize)]
pub struct CartOutcomeResponse {
    pub event: CartEvent,
    pub cart: CartResponse,
}

impl From<&LineItem> for LineItemResponse {
    fn from(item: &LineItem) -> Self {
        Self {
            id: item.id,
            title: item.title.clone(),
            price: item.price,
            image: item.image.clone(),
            amount: item.amount,
            subtotal: item.subtotal(),
        }
    }
}

impl From<&Cart> for CartResponse {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items().iter().map(LineItemResponse::from).collect(),
            item_count: cart.len(),
            total_quantity: cart.total_quantity(),
            subtotal: cart.subtotal(),
        }
    }
}

impl From<CartOutcome> for CartOutcomeResponse {
    fn from(outcome: CartOutcome) -> Self {
        Self {
            cart: CartResponse::from(&outcome.cart),
            event: outcome.event,
        }
    }
}

// -- Handlers --

/// GET /cart: return the current cart.
#[tracing::instrument(skip(state))]
pub async fn get<C: ProductCatalog + 'static, S: KvStore + 'static>(
    State(state): State<Arc<AppState<C, S>>>,
) -> Json<CartResponse> {
    let cart = state.cart_service.cart().await;
    Json(CartResponse::from(&cart))
}

/// POST /cart/items/{product_id}: add one unit of a product.
#[tracing::instrument(skip(state))]
pub async fn add<C: ProductCatalog + 'static, S: KvStore + 'static>(
    State(state): State<Arc<AppState<C, S>>>,
    Path(product_id): Path<String>,
) -> Result<Json<CartOutcomeResponse>, ApiError> {
    let product_id = parse_product_id(&product_id)?;

    let outcome = state
        .cart_service
        .add_product(product_id)
        .await
        .map_err(|e| ApiError::cart(CartOperation::AddProduct, e))?;

    Ok(Json(outcome.into()))
}

/// PUT /cart/items/{product_id}: set the amount of a product in the cart.
#[tracing::instrument(skip(state, req))]
pub async fn update_amount<C: ProductCatalog + 'static, S: KvStore + 'static>(
    State(state): State<Arc<AppState<C, S>>>,
    Path(product_id): Path<String>,
    Json(req): Json<UpdateAmountRequest>,
) -> Result<Json<CartOutcomeResponse>, ApiError> {
    let product_id = parse_product_id(&product_id)?;

    let outcome = state
        .cart_service
        .update_product_amount(UpdateProductAmount::new(product_id, req.amount))
        .await
        .map_err(|e| ApiError::cart(CartOperation::UpdateProductAmount, e))?;

    Ok(Json(outcome.into()))
}

/// DELETE /cart/items/{product_id}: remove a product from the cart.
#[tracing::instrument(skip(state))]
pub async fn remove<C: ProductCatalog + 'static, S: KvStore + 'static>(
    State(state): State<Arc<AppState<C, S>>>,
    Path(product_id): Path<String>,
) -> Result<Json<CartOutcomeResponse>, ApiError> {
    let product_id = parse_product_id(&product_id)?;

    let outcome = state
        .cart_service
        .remove_product(product_id)
        .await
        .map_err(|e| ApiError::cart(CartOperation::RemoveProduct, e))?;

    Ok(Json(outcome.into()))
}

fn parse_product_id(id: &str) -> Result<ProductId, ApiError> {
    id.parse()
        .map_err(|e| ApiError::BadRequest(format!("Invalid product ID {id:?}: {e}")))
}
