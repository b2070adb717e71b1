use std::io;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::debug;

use renta_cli::app::{self, RentaApp};
use renta_cli::cli::{self, Cli};
use renta_cli::config::RentaConfig;
use renta_cli::logging;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = RentaConfig::resolve(cli.config.as_deref())?;
    config.apply_overrides(cli.overrides());

    logging::init_logging(&config.logging.level);
    if let Some(path) = &config.logging.file {
        logging::enable_file_logging(path)?;
    }

    let store_config = config.store_config();
    debug!("connecting to {} backend", store_config.backend);
    let registry = app::build_registry();
    let store = registry
        .create(&store_config)
        .await
        .with_context(|| format!("opening {} store", store_config.backend))?;

    let mut app = RentaApp::new(store);
    app.load().await;

    let ok = cli::run(&mut app, cli.command, &mut io::stdout().lock()).await?;
    Ok(if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
