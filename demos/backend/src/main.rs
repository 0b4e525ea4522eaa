use tracing::info;

use backend::Store;
use clubinho_observe::{LoggerConfig, logger_init};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1) Logger
    logger_init(&LoggerConfig::default())?;
    info!("logger initialized");

    // 2) Seeded store + routes
    let store = Store::seeded();
    let app = backend::router(store);

    // 3) Serve until Ctrl+C
    let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
    info!("clubinho demo backend on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    info!("shutting down...");
    Ok(())
}
