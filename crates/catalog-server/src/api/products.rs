use axum::{extract::State, Extension, Json};
use catalog_core::ProductRecord;
use catalog_store::ProductStore;

use crate::middleware::RequestId;

use super::{map_store_error, ApiError, ApiResponse, AppState, ResponseMeta};

pub(super) async fn list_products<S: ProductStore>(
    State(state): State<AppState<S>>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<ProductRecord>>>, ApiError> {
    let data = state
        .store
        .list_products()
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
