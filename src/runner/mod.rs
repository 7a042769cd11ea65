pub mod controller;
pub mod cycle;
pub mod events;
pub mod executor;
pub mod provision;
pub mod state;
pub mod steps;

#[cfg(test)]
pub(crate) mod testing;

use crate::loader::{DataLoader, ProcessLoader};
use crate::platform::{PlatformApi, PlatformClient};
use crate::utils::config::Config;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;

pub use controller::LoadTestController;
pub use events::*;
pub use state::*;

/// Run a full load test against the configured platform and write the report.
///
/// Fails only if the platform client or loader cannot be set up, or the
/// report cannot be written; workflow failures end up in the report.
pub async fn run_load_test(config: &Config) -> Result<PathBuf> {
    config.validate()?;

    let client = PlatformClient::initialize(
        &config.host,
        &config.username,
        &config.password,
        config.request_timeout,
    )
    .await
    .with_context(|| format!("Failed to initialize platform client for {}", config.host))?;
    log::info!("Platform client ready for {}", client.host());

    let loader = ProcessLoader::new(&config.loader_program, config.loader_args.clone())?;
    log::info!("Using loader {}", loader.program().display());

    let api: Arc<dyn PlatformApi> = Arc::new(client);
    let loader: Arc<dyn DataLoader> = Arc::new(loader);

    let (emitter, receiver) = EventEmitter::new();
    let listener = tokio::spawn(ConsoleEventListener::listen(receiver));

    let controller = LoadTestController::new(config, api, loader, emitter);
    let report = controller.run(config.cycles, config.concurrency).await;

    // Closing the channel lets the listener flush and exit
    drop(controller);
    if let Err(e) = listener.await {
        log::warn!("console listener failed: {}", e);
    }

    crate::report::json::write(&report, &config.output_dir, &config.report_prefix)
}
