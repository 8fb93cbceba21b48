use anyhow::Result;
use clap::Args;
use price_outlier_core::OutlierService;
use price_outlier_data::PriceFileStore;
use price_outlier_web_api::{ApiServer, AppState};

use super::{load_config, ConfigArgs};

/// Arguments for the server command.
#[derive(Args, Debug, Clone)]
pub struct ServerArgs {
    /// Server address (defaults to server.host:server.port from config)
    #[arg(short, long)]
    pub addr: Option<String>,

    #[command(flatten)]
    pub config: ConfigArgs,
}

pub async fn run_server(args: &ServerArgs) -> Result<()> {
    let config = load_config(&args.config)?;
    let addr = args.addr.clone().unwrap_or_else(|| config.server.addr());

    tracing::info!("Serving price files from {}", config.data.root_dir.display());
    let state = AppState::new(
        OutlierService::new(&config.analysis),
        PriceFileStore::new(&config.data.root_dir),
    );

    ApiServer::new(state).serve(&addr).await
}
