use super::state::{Account, StepKind, StepResult};
use crate::error::StepError;
use crate::loader::DataLoader;
use crate::platform::PlatformApi;
use chrono::Utc;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

/// Runs the timed upload and download steps for an account.
///
/// Failures are returned inside the `StepResult`, never raised.
#[derive(Clone)]
pub struct StepRunner {
    api: Arc<dyn PlatformApi>,
    loader: Arc<dyn DataLoader>,
    source_file: PathBuf,
}

impl StepRunner {
    pub fn new(api: Arc<dyn PlatformApi>, loader: Arc<dyn DataLoader>, source_file: PathBuf) -> Self {
        Self {
            api,
            loader,
            source_file,
        }
    }

    pub async fn run(&self, kind: StepKind, account: &Account) -> StepResult {
        match kind {
            StepKind::Upload => self.run_upload(account).await,
            StepKind::Download => self.run_download(account).await,
        }
    }

    pub async fn run_upload(&self, account: &Account) -> StepResult {
        timed(
            StepKind::Upload,
            self.loader
                .upload(&self.source_file, &account.username, &account.password),
        )
        .await
    }

    pub async fn run_download(&self, account: &Account) -> StepResult {
        timed(StepKind::Download, async {
            self.api
                .get_device_data_for_user(&account.id)
                .await
                .map(|_| ())
                .map_err(|e| StepError::Download(e.to_string()))
        })
        .await
    }
}

async fn timed<F>(kind: StepKind, step: F) -> StepResult
where
    F: Future<Output = Result<(), StepError>>,
{
    let started = Utc::now();
    let outcome = step.await;
    let finished = Utc::now();

    let result = StepResult::new(kind, started, finished, outcome.err().map(|e| e.to_string()));
    match &result.error {
        None => log::debug!("{} took {}ms", kind, result.elapsed_ms),
        Some(err) => log::warn!("{} failed after {}ms: {}", kind, result.elapsed_ms, err),
    }
    result
}
