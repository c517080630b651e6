//! 产品路由

use axum::{routing::get, Router};

use super::handler::{
    create_product, delete_product, get_product, list_products, update_product, AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}
