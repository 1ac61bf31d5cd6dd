//! Product resource handlers.
//!
//! Each handler maps one HTTP verb onto one [`ProductClient`] call. Status
//! codes and bodies are decided by the client; handlers only extract input.
//!
//! [`ProductClient`]: crate::clients::ProductClient

use super::AppState;
use crate::clients::ApiResponse;
use crate::model::ProductInput;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/products",
            get(list_products)
                .post(create_product)
                .fallback(method_not_allowed),
        )
        .route(
            "/v1/products/:id",
            get(get_product)
                .put(update_product)
                .delete(delete_product)
                .fallback(method_not_allowed),
        )
}

async fn list_products(State(state): State<AppState>) -> ApiResponse {
    state.products.list().await
}

async fn get_product(State(state): State<AppState>, Path(id): Path<String>) -> ApiResponse {
    state.products.get(id).await
}

async fn create_product(
    State(state): State<AppState>,
    body: Result<Json<ProductInput>, JsonRejection>,
) -> Response {
    match body {
        Ok(Json(input)) => state.products.create(input).await.into_response(),
        Err(rejection) => bad_body(rejection),
    }
}

async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<ProductInput>, JsonRejection>,
) -> Response {
    match body {
        Ok(Json(input)) => state.products.update(id, input).await.into_response(),
        Err(rejection) => bad_body(rejection),
    }
}

async fn delete_product(State(state): State<AppState>, Path(id): Path<String>) -> ApiResponse {
    state.products.delete(id).await
}

/// Unmatched paths under `/api`.
pub async fn api_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Resource not found" })),
    )
        .into_response()
}

async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method not allowed" })),
    )
        .into_response()
}

fn bad_body(rejection: JsonRejection) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": rejection.body_text() })),
    )
        .into_response()
}
