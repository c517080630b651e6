//! 产品数据模型

use serde::{Deserialize, Serialize};

use crate::core::error::AppError;

/// 产品实体，与 `products` 表一一对应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "database", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub quantity: i64,
}

/// 创建/更新请求体
///
/// 三个字段都必须出现；`id` 等未知字段会被忽略。
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProductPayload {
    pub name: String,
    pub price: f64,
    pub quantity: i64,
}

impl ProductPayload {
    /// 解码请求体，任何格式错误都归为 `InvalidPayload`
    pub fn decode(body: &[u8]) -> Result<Self, AppError> {
        serde_json::from_slice(body).map_err(|e| {
            tracing::debug!("Rejected product payload: {}", e);
            AppError::InvalidPayload
        })
    }
}

impl Product {
    /// 用请求体覆盖可变字段，`id` 保持不变
    pub fn apply(&mut self, payload: ProductPayload) {
        self.name = payload.name;
        self.price = payload.price;
        self.quantity = payload.quantity;
    }
}

/// 解析路径中的产品 ID
///
/// 无法解析的 ID 不可能对应任何记录，直接视为不存在。
pub fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.parse::<i64>().map_err(|_| AppError::NotFound)
}
