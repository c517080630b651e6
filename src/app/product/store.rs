//! 产品存储抽象

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::model::{Product, ProductPayload};
use crate::core::error::StoreError;

/// 处理器共享的存储句柄
pub type SharedProductStore = Arc<dyn ProductStore>;

/// 产品数据映射层
///
/// 每个方法对应一次存储往返。
#[async_trait]
pub trait ProductStore: Send + Sync + 'static {
    async fn find_all(&self) -> Result<Vec<Product>, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Product, StoreError>;

    /// 插入新记录，返回带有存储分配 ID 的产品
    async fn insert(&self, payload: ProductPayload) -> Result<Product, StoreError>;

    /// 按 `product.id` 覆盖 name/price/quantity
    async fn save(&self, product: &Product) -> Result<(), StoreError>;

    async fn delete(&self, id: i64) -> Result<(), StoreError>;
}

/// 内存存储，用于测试或无数据库运行
#[derive(Default)]
pub struct MemoryProductStore {
    inner: RwLock<MemoryTable>,
}

#[derive(Default)]
struct MemoryTable {
    rows: BTreeMap<i64, Product>,
    last_id: i64,
}

impl MemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedProductStore {
        Arc::new(Self::new())
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn find_all(&self) -> Result<Vec<Product>, StoreError> {
        let table = self.inner.read().await;
        Ok(table.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Product, StoreError> {
        let table = self.inner.read().await;
        table.rows.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn insert(&self, payload: ProductPayload) -> Result<Product, StoreError> {
        let mut table = self.inner.write().await;
        // 与 BIGSERIAL 一致：从 1 开始，删除后不复用
        table.last_id += 1;
        let product = Product {
            id: table.last_id,
            name: payload.name,
            price: payload.price,
            quantity: payload.quantity,
        };
        table.rows.insert(product.id, product.clone());
        Ok(product)
    }

    async fn save(&self, product: &Product) -> Result<(), StoreError> {
        let mut table = self.inner.write().await;
        match table.rows.get_mut(&product.id) {
            Some(row) => {
                *row = product.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let mut table = self.inner.write().await;
        table
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}
