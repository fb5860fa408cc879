use crate::{
    errors::ServiceError, handlers::common::success_response, services::ItemSummary, AppState,
};
use axum::{extract::State, response::Response};

#[utoipa::path(
    get,
    path = "/api/items/summary",
    responses(
        (status = 200, description = "Today's profit and movement counts", body = ItemSummary)
    ),
    tag = "items"
)]
pub async fn get_item_summary(State(state): State<AppState>) -> Result<Response, ServiceError> {
    let summary = state.item_summary_service().get_summary().await?;
    Ok(success_response(state.links().summary_model(summary)))
}
