//! 核心中间件模块

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{info, Instrument};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// 请求日志中间件
///
/// 为每个请求分配 request id，写入响应头并记录方法、路径、状态码和耗时。
pub async fn request_logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();
    let request_id = Uuid::new_v4().to_string();

    let span = tracing::info_span!("request", id = %request_id);
    let mut response = next.run(req).instrument(span.clone()).await;
    let status = response.status();
    let duration = start.elapsed();

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    span.in_scope(|| {
        info!(
            "{} {} - {} - {}ms",
            method,
            uri,
            status,
            duration.as_millis()
        );
    });

    response
}
