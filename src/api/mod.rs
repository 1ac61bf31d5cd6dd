//! HTTP surface of the catalog.
//!
//! - `/api/v1/products[/:id]` - product CRUD, guarded by [`auth::require_auth_token`]
//! - any other path - the home page from [`home::home_page`]

pub mod auth;
pub mod home;
pub mod routes;

use crate::clients::ProductClient;
use axum::{middleware, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub products: ProductClient,
}

/// Builds the full application router.
pub fn build_app(state: AppState, auth_token: impl Into<Arc<str>>) -> Router {
    let auth_token: Arc<str> = auth_token.into();
    let api = routes::product_routes()
        .fallback(routes::api_not_found)
        .layer(middleware::from_fn_with_state(
            auth_token,
            auth::require_auth_token,
        ));

    Router::new()
        .nest("/api", api)
        .fallback(home::home_page)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
