use crate::{
    errors::ServiceError,
    handlers::common::{created_response, no_content_response, success_response},
    services::ItemPayload,
    AppState,
};
use axum::{
    extract::{Path, State},
    response::{Json, Response},
};

#[utoipa::path(
    get,
    path = "/api/items",
    responses(
        (status = 200, description = "All items under `_embedded.itemList`", body = [crate::entities::item::Model])
    ),
    tag = "items"
)]
pub async fn list_items(State(state): State<AppState>) -> Result<Response, ServiceError> {
    let items = state.item_service().list_items().await?;
    Ok(success_response(state.links().item_collection(items)))
}

#[utoipa::path(
    get,
    path = "/api/items/{item_id}",
    params(
        ("item_id" = i64, Path, description = "Item ID")
    ),
    responses(
        (status = 200, description = "Item with `_links`", body = crate::entities::item::Model),
        (status = 404, description = "Item not found", body = crate::errors::ErrorResponse)
    ),
    tag = "items"
)]
pub async fn get_item(
    State(state): State<AppState>,
    Path(item_id): Path<i64>,
) -> Result<Response, ServiceError> {
    let item = state.item_service().get_item(item_id).await?;
    Ok(success_response(state.links().item_model(item)))
}

#[utoipa::path(
    post,
    path = "/api/items",
    request_body = ItemPayload,
    responses(
        (status = 201, description = "Item created; `Location` holds its self link", body = crate::entities::item::Model),
        (status = 409, description = "Item code already in use", body = crate::errors::ErrorResponse)
    ),
    tag = "items"
)]
pub async fn create_item(
    State(state): State<AppState>,
    Json(payload): Json<ItemPayload>,
) -> Result<Response, ServiceError> {
    let item = state.item_service().create_item(payload).await?;
    let model = state.links().item_model(item);
    Ok(created_response(model.self_href(), &model))
}

#[utoipa::path(
    put,
    path = "/api/items/{item_id}",
    params(
        ("item_id" = i64, Path, description = "Item ID")
    ),
    request_body = ItemPayload,
    responses(
        (status = 201, description = "Item replaced or created under the given id", body = crate::entities::item::Model),
        (status = 400, description = "Null body or invalid id", body = crate::errors::ErrorResponse),
        (status = 409, description = "Rejected by a store constraint", body = crate::errors::ErrorResponse)
    ),
    tag = "items"
)]
pub async fn replace_item(
    State(state): State<AppState>,
    Path(item_id): Path<i64>,
    Json(payload): Json<Option<ItemPayload>>,
) -> Result<Response, ServiceError> {
    let item = state.item_service().replace_item(item_id, payload).await?;
    let model = state.links().item_model(item);
    Ok(created_response(model.self_href(), &model))
}

#[utoipa::path(
    delete,
    path = "/api/items/{item_id}",
    params(
        ("item_id" = i64, Path, description = "Item ID")
    ),
    responses(
        (status = 204, description = "Item removed, or there was nothing to remove"),
        (status = 409, description = "Item still has actions", body = crate::errors::ErrorResponse)
    ),
    tag = "items"
)]
pub async fn delete_item(
    State(state): State<AppState>,
    Path(item_id): Path<i64>,
) -> Result<Response, ServiceError> {
    state.item_service().delete_item(item_id).await?;
    Ok(no_content_response())
}
