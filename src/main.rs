use anyhow::Context;
use product_crud_server::{
    create_app,
    infrastructure::{config::load_config, database::DatabaseManager, logger::Logger},
};
use tokio::{net::TcpListener, signal};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config().context("failed to load configuration")?;

    Logger::init(&config.logging.level);

    info!("Starting product server...");

    // 数据库不可用时直接退出
    let database = DatabaseManager::connect(&config.database)
        .await
        .map_err(|e| {
            error!("{}", e);
            e
        })?;

    let app = create_app(database.product_store());

    let listener = TcpListener::bind(config.http.addr())
        .await
        .with_context(|| format!("failed to bind {}", config.http.addr()))?;
    let addr = listener.local_addr()?;

    info!("Server running on http://{}", addr);
    info!("   GET    /products       - List products");
    info!("   POST   /products       - Create product");
    info!("   GET    /products/:id   - Get product by ID");
    info!("   PUT    /products/:id   - Update product");
    info!("   DELETE /products/:id   - Delete product");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!("Failed to listen for ctrl+c: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
