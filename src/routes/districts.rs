use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::products::DistrictList,
    error::AppResult,
    response::ApiResponse,
    services::catalog_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_districts))
}

#[utoipa::path(
    get,
    path = "/api/v1/districts",
    responses(
        (status = 200, description = "List active delivery districts", body = ApiResponse<DistrictList>)
    ),
    tag = "Catalog"
)]
pub async fn list_districts(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<DistrictList>>> {
    let resp = catalog_service::list_districts(&state).await?;
    Ok(Json(resp))
}
