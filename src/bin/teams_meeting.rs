//! Teams demo: fetch a token, create an online meeting and print its join URL.

use anyhow::{Context, Result};
use graphcal::{config, demo, logging, AppError, Config, GraphClient};
use tracing::info;

#[tokio::main]
async fn main() {
    config::load_dotenv();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            std::process::exit(1);
        }
    };

    logging::init(&config.logging.level);
    info!("Starting teams-meeting v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&config).await {
        eprintln!("Failed to create Teams meeting: {:#}", e);
        if let Some(hint) = e.downcast_ref::<AppError>().and_then(AppError::hint) {
            eprintln!("{}", hint);
        }
        std::process::exit(1);
    }
}

async fn run(config: &Config) -> Result<()> {
    let graph = GraphClient::connect(config)
        .await
        .context("Failed to obtain an access token")?;

    demo::run_teams_demo(&graph, &mut std::io::stdout())
        .await
        .context("Online meeting creation failed")?;

    Ok(())
}
