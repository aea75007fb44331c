//! Inventory endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        inventory::{AdjustQuantity, InventoryItem, InventoryItemInput, QuantityResponse},
        student::SearchQuery,
    },
};

use super::{ApiPath, AuthenticatedUser, ValidatedJson};

/// List inventory items alphabetically
#[utoipa::path(
    get,
    path = "/inventory",
    tag = "inventory",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Inventory items", body = Vec<InventoryItem>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_items(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<InventoryItem>>> {
    let items = state.services.inventory.list().await?;
    Ok(Json(items))
}

/// Search items by name or description
#[utoipa::path(
    get,
    path = "/inventory/search",
    tag = "inventory",
    security(("bearer_auth" = [])),
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching items", body = Vec<InventoryItem>),
        (status = 400, description = "Search term is required")
    )
)]
pub async fn search_items(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<InventoryItem>>> {
    let items = state.services.inventory.search(query.term()).await?;
    Ok(Json(items))
}

/// Get inventory item by ID
#[utoipa::path(
    get,
    path = "/inventory/{id}",
    tag = "inventory",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Item details", body = InventoryItem),
        (status = 404, description = "Item not found")
    )
)]
pub async fn get_item(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<Json<InventoryItem>> {
    let item = state.services.inventory.get_by_id(id).await?;
    Ok(Json(item))
}

/// Create an inventory item
#[utoipa::path(
    post,
    path = "/inventory",
    tag = "inventory",
    security(("bearer_auth" = [])),
    request_body = InventoryItemInput,
    responses(
        (status = 201, description = "Item created", body = InventoryItem),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_item(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    ValidatedJson(data): ValidatedJson<InventoryItemInput>,
) -> AppResult<(StatusCode, Json<InventoryItem>)> {
    let item = state.services.inventory.create(&data).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Replace an inventory item's fields
#[utoipa::path(
    put,
    path = "/inventory/{id}",
    tag = "inventory",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Item ID")),
    request_body = InventoryItemInput,
    responses(
        (status = 200, description = "Item updated", body = InventoryItem),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Item not found")
    )
)]
pub async fn update_item(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    ApiPath(id): ApiPath<i32>,
    ValidatedJson(data): ValidatedJson<InventoryItemInput>,
) -> AppResult<Json<InventoryItem>> {
    let item = state.services.inventory.update(id, &data).await?;
    Ok(Json(item))
}

/// Increment or decrement the available quantity
#[utoipa::path(
    patch,
    path = "/inventory/{id}/quantity",
    tag = "inventory",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Item ID")),
    request_body = AdjustQuantity,
    responses(
        (status = 200, description = "Quantity updated", body = QuantityResponse),
        (status = 400, description = "Invalid input or insufficient quantity"),
        (status = 404, description = "Item not found")
    )
)]
pub async fn adjust_quantity(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    ApiPath(id): ApiPath<i32>,
    ValidatedJson(adjust): ValidatedJson<AdjustQuantity>,
) -> AppResult<Json<QuantityResponse>> {
    let available_quantity = state.services.inventory.adjust_quantity(id, &adjust).await?;
    Ok(Json(QuantityResponse {
        id,
        available_quantity,
    }))
}

/// Delete an inventory item
#[utoipa::path(
    delete,
    path = "/inventory/{id}",
    tag = "inventory",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Item ID")),
    responses(
        (status = 204, description = "Item deleted"),
        (status = 404, description = "Item not found"),
        (status = 409, description = "Item has active loans")
    )
)]
pub async fn delete_item(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<StatusCode> {
    state.services.inventory.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
