//! # 产品 CRUD 服务
//!
//! 基于 Axum 的单资源 REST 服务，`products` 表通过 `ProductStore`
//! 映射到 PostgreSQL：
//! - app: 产品模型、存储抽象、处理器与路由
//! - core: 错误处理与中间件
//! - infrastructure: 配置、日志、数据库连接

pub mod app;
pub mod core;
pub mod infrastructure;

use axum::{extract::DefaultBodyLimit, middleware, Router};
use tower_http::trace::TraceLayer;

use crate::app::product::{routes::routes, AppState, SharedProductStore};
use crate::core::middleware::request_logging_middleware;

/// 组装完整的应用路由
///
/// 请求体不设大小上限，任何形状正确的产品都会被接受。
pub fn create_app(store: SharedProductStore) -> Router {
    routes()
        .layer(DefaultBodyLimit::disable())
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState::new(store))
}
