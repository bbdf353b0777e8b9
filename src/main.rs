use std::sync::Arc;

use anyhow::Result;
use log::{error, info};
use tokio::sync::broadcast;

use property_api::{
    config::{self, Config},
    db::Db,
    logger::setup_logger,
    web::{self, AppState},
};

#[tokio::main]
async fn main() -> Result<()> {
    let config: Arc<Config> = Arc::new(config::read_config()?);

    // Initialize logger
    setup_logger(config.log_level())?;

    let db = Db::connect(&config)?;

    let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {:?}", err);
            std::future::pending::<()>().await;
        }
        info!("Shutting down");
        let _ = shutdown_tx.send(());
    });

    if let Err(err) = web::start_http_server(AppState { config, db }, shutdown_rx).await {
        error!("Error: {:?}", err);
        return Err(err);
    }

    Ok(())
}
