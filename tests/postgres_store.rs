//! 需要 PostgreSQL：设置 TEST_DATABASE_URL 后运行，否则跳过

#![cfg(feature = "database")]

use product_crud_server::{
    app::product::{ProductPayload, ProductStore},
    core::error::StoreError,
    infrastructure::{config::DatabaseConfig, database::DatabaseManager},
};

async fn test_manager() -> Option<DatabaseManager> {
    let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return None;
    };

    let config = DatabaseConfig {
        url: Some(url),
        max_connections: 2,
        ..DatabaseConfig::default()
    };
    Some(
        DatabaseManager::connect(&config)
            .await
            .expect("Failed to connect to test database"),
    )
}

#[tokio::test]
async fn test_migrate_is_idempotent() {
    let Some(manager) = test_manager().await else {
        return;
    };
    manager.migrate().await.unwrap();
    manager.migrate().await.unwrap();
}

#[tokio::test]
async fn test_pg_store_round_trip() {
    let Some(manager) = test_manager().await else {
        return;
    };
    let store = manager.product_store();

    let mut product = store
        .insert(ProductPayload {
            name: "Laptop".to_string(),
            price: 1500.5,
            quantity: 10,
        })
        .await
        .unwrap();
    assert!(product.id > 0);
    assert_eq!(store.find_by_id(product.id).await.unwrap(), product);

    product.name = "Gaming Laptop".to_string();
    product.quantity = 5;
    store.save(&product).await.unwrap();
    assert_eq!(store.find_by_id(product.id).await.unwrap().name, "Gaming Laptop");

    let all = store.find_all().await.unwrap();
    assert!(all.iter().any(|p| p.id == product.id));

    store.delete(product.id).await.unwrap();
    assert!(matches!(
        store.find_by_id(product.id).await,
        Err(StoreError::NotFound)
    ));
    assert!(matches!(
        store.delete(product.id).await,
        Err(StoreError::NotFound)
    ));
}
