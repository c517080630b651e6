//! 产品资源：模型、存储、处理器与路由

pub mod handler;
pub mod model;
pub mod routes;
pub mod store;

pub use handler::AppState;
pub use model::{Product, ProductPayload};
pub use store::{MemoryProductStore, ProductStore, SharedProductStore};
