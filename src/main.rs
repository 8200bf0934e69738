//! Outlook calendar demo: list upcoming events, then create, update and
//! delete one event through Microsoft Graph.

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
            eprintln!("\nPlease set the following environment variables:");
            eprintln!("  AZURE_TENANT_ID=<your-tenant-id>");
            eprintln!("  AZURE_CLIENT_ID=<your-azure-ad-client-id>");
            eprintln!("  AZURE_CLIENT_SECRET=<your-client-secret>");
            eprintln!("or provide a token directly:");
            eprintln!("  {}=<bearer-token>", config::ACCESS_TOKEN_VAR);
            std::process::exit(1);
        }
    };

    logging::init(&config.logging.level);
    info!("Starting graphcal v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&config).await {
        eprintln!("Calendar demo failed: {:#}", e);
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

    let mut stdout = std::io::stdout();
    demo::run_calendar_demo(&graph, &config.calendar, &mut stdout)
        .await
        .context("Calendar sequence aborted")?;

    Ok(())
}
