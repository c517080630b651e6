//! 数据库基础设施

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::sync::Arc;
use tracing::info;

use super::config::{ConfigError, DatabaseConfig};
use crate::app::product::{Product, ProductPayload, ProductStore, SharedProductStore};
use crate::core::error::StoreError;

/// 数据库初始化错误
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),
    #[error("failed to migrate database: {0}")]
    Migrate(#[source] sqlx::Error),
}

pub struct DatabaseManager {
    pool: PgPool,
}

impl DatabaseManager {
    /// 建立连接池并确保表结构存在
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        info!("Connecting to database: {}", config.display_target());

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(config.connect_options()?)
            .await
            .map_err(DatabaseError::Connect)?;

        let manager = Self { pool };
        manager.migrate().await.map_err(DatabaseError::Migrate)?;

        info!("Database connected and migrated");
        Ok(manager)
    }

    /// 创建 products 表（幂等）
    pub async fn migrate(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS products (
                id BIGSERIAL PRIMARY KEY,
                name TEXT NOT NULL,
                price DOUBLE PRECISION NOT NULL,
                quantity BIGINT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub fn product_store(&self) -> SharedProductStore {
        Arc::new(PgProductStore::new(self.pool.clone()))
    }
}

/// PostgreSQL 产品存储
#[derive(Clone)]
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn find_all(&self) -> Result<Vec<Product>, StoreError> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, name, price, quantity FROM products ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    async fn find_by_id(&self, id: i64) -> Result<Product, StoreError> {
        sqlx::query_as::<_, Product>(
            "SELECT id, name, price, quantity FROM products WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)
    }

    async fn insert(&self, payload: ProductPayload) -> Result<Product, StoreError> {
        let product = sqlx::query_as::<_, Product>(
            "INSERT INTO products (name, price, quantity) VALUES ($1, $2, $3) \
             RETURNING id, name, price, quantity",
        )
        .bind(&payload.name)
        .bind(payload.price)
        .bind(payload.quantity)
        .fetch_one(&self.pool)
        .await?;

        Ok(product)
    }

    async fn save(&self, product: &Product) -> Result<(), StoreError> {
        let result =
            sqlx::query("UPDATE products SET name = $1, price = $2, quantity = $3 WHERE id = $4")
                .bind(&product.name)
                .bind(product.price)
                .bind(product.quantity)
                .bind(product.id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
