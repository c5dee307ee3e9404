use axum::{Router, routing::get};

use crate::state::AppState;

pub mod auth;
pub mod cart;
pub mod categories;
pub mod doc;
pub mod health;
pub mod home;
pub mod orders;
pub mod pages;
pub mod params;
pub mod products;

/// Area/controller/action routes. Paths are registered lowercase; requests
/// are lowercased before they get here. A missing action means `index`, and
/// a bare `/customer` means the home controller.
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", get(home::index))
        .route("/customer", get(home::index))
        .route("/health", get(health::health_check))
        .nest("/customer/home", home::router())
        .nest("/customer/cart", cart::router())
        .nest("/admin/product", products::router())
        .nest("/admin/category", categories::router())
        .nest("/admin/order", orders::router())
        .nest("/identity/account", auth::router())
}
