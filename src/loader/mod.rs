pub mod process;

use crate::error::StepError;
use async_trait::async_trait;
use std::path::Path;

pub use process::ProcessLoader;

/// Pushes a dataset file into the platform on behalf of one account
#[async_trait]
pub trait DataLoader: Send + Sync {
    async fn upload(&self, file: &Path, username: &str, password: &str) -> Result<(), StepError>;
}
