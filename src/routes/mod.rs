use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod bot;
pub mod categories;
pub mod districts;
pub mod doc;
pub mod health;
pub mod orders;
pub mod params;
pub mod products;
pub mod promo;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/categories", categories::router())
        .nest("/products", products::router())
        .nest("/districts", districts::router())
        .nest("/promo", promo::router())
        .nest("/orders", orders::router())
        .nest("/bot", bot::router())
        .nest("/admin", admin::router())
}
