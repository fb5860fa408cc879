use crate::{
    errors::ServiceError,
    handlers::common::{created_response, no_content_response, success_response},
    services::{ItemActionPayload, ItemActionView},
    AppState,
};
use axum::{
    extract::{Path, State},
    response::{Json, Response},
};

#[utoipa::path(
    get,
    path = "/api/items/{item_id}/itemActions",
    params(
        ("item_id" = i64, Path, description = "Item ID")
    ),
    responses(
        (status = 200, description = "Actions of the item under `_embedded.itemActionList`", body = [ItemActionView]),
        (status = 404, description = "Item not found", body = crate::errors::ErrorResponse)
    ),
    tag = "item-actions"
)]
pub async fn list_item_actions(
    State(state): State<AppState>,
    Path(item_id): Path<i64>,
) -> Result<Response, ServiceError> {
    let actions = state.item_action_service().list_actions(item_id).await?;
    let views = actions.into_iter().map(ItemActionView::from).collect();
    Ok(success_response(
        state.links().item_action_collection(item_id, views),
    ))
}

#[utoipa::path(
    get,
    path = "/api/items/{item_id}/itemActions/{action_id}",
    params(
        ("item_id" = i64, Path, description = "Item ID"),
        ("action_id" = i64, Path, description = "Item action ID")
    ),
    responses(
        (status = 200, description = "Action with `_links`", body = ItemActionView),
        (status = 404, description = "Action not found for this item", body = crate::errors::ErrorResponse)
    ),
    tag = "item-actions"
)]
pub async fn get_item_action(
    State(state): State<AppState>,
    Path((item_id, action_id)): Path<(i64, i64)>,
) -> Result<Response, ServiceError> {
    let details = state
        .item_action_service()
        .get_action(item_id, action_id)
        .await?;
    Ok(success_response(
        state.links().item_action_model(details.into()),
    ))
}

#[utoipa::path(
    post,
    path = "/api/items/{item_id}/itemActions",
    params(
        ("item_id" = i64, Path, description = "Item ID")
    ),
    request_body = ItemActionPayload,
    responses(
        (status = 201, description = "Action recorded; `Location` holds its self link", body = ItemActionView),
        (status = 404, description = "Item not found", body = crate::errors::ErrorResponse)
    ),
    tag = "item-actions"
)]
pub async fn create_item_action(
    State(state): State<AppState>,
    Path(item_id): Path<i64>,
    Json(payload): Json<ItemActionPayload>,
) -> Result<Response, ServiceError> {
    let details = state
        .item_action_service()
        .create_action(item_id, payload)
        .await?;
    let model = state.links().item_action_model(details.into());
    Ok(created_response(model.self_href(), &model))
}

#[utoipa::path(
    put,
    path = "/api/items/{item_id}/itemActions/{action_id}",
    params(
        ("item_id" = i64, Path, description = "Item ID"),
        ("action_id" = i64, Path, description = "Item action ID")
    ),
    request_body = ItemActionPayload,
    responses(
        (status = 201, description = "Action replaced or created under the given id", body = ItemActionView),
        (status = 404, description = "Item not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Action id belongs to another item", body = crate::errors::ErrorResponse)
    ),
    tag = "item-actions"
)]
pub async fn replace_item_action(
    State(state): State<AppState>,
    Path((item_id, action_id)): Path<(i64, i64)>,
    Json(payload): Json<ItemActionPayload>,
) -> Result<Response, ServiceError> {
    let details = state
        .item_action_service()
        .replace_action(item_id, action_id, payload)
        .await?;
    let model = state.links().item_action_model(details.into());
    Ok(created_response(model.self_href(), &model))
}

#[utoipa::path(
    delete,
    path = "/api/items/{item_id}/itemActions/{action_id}",
    params(
        ("item_id" = i64, Path, description = "Item ID"),
        ("action_id" = i64, Path, description = "Item action ID")
    ),
    responses(
        (status = 204, description = "Action removed, or there was nothing to remove"),
        (status = 404, description = "Item not found", body = crate::errors::ErrorResponse)
    ),
    tag = "item-actions"
)]
pub async fn delete_item_action(
    State(state): State<AppState>,
    Path((item_id, action_id)): Path<(i64, i64)>,
) -> Result<Response, ServiceError> {
    state
        .item_action_service()
        .delete_action(item_id, action_id)
        .await?;
    Ok(no_content_response())
}
