use super::DataLoader;
use crate::error::StepError;
use crate::utils::binary_resolver;
use anyhow::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// Runs an external loader CLI, e.g. `node ibf_loader.js -f <file> -u <user> -p <pw>`
#[derive(Debug, Clone)]
pub struct ProcessLoader {
    program: PathBuf,
    args: Vec<String>,
}

impl ProcessLoader {
    /// `program` is resolved on PATH unless it already names a file.
    /// `args` go before the `-f/-u/-p` flags (usually the loader script).
    pub fn new(program: &str, args: Vec<String>) -> Result<Self> {
        let program = binary_resolver::find_binary(program)?;
        Ok(Self { program, args })
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

#[async_trait]
impl DataLoader for ProcessLoader {
    async fn upload(&self, file: &Path, username: &str, password: &str) -> Result<(), StepError> {
        log::debug!(
            "Running {} {:?} -f {} -u {}",
            self.program.display(),
            self.args,
            file.display(),
            username
        );

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg("-f")
            .arg(file)
            .args(["-u", username, "-p", password])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| StepError::Launch(format!("{}: {}", self.program.display(), e)))?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let diagnostic = if stderr.is_empty() {
            String::from_utf8_lossy(&output.stdout).trim().to_string()
        } else {
            stderr
        };

        Err(StepError::Exit {
            code: output.status.code(),
            output: diagnostic,
        })
    }
}
