use anyhow::Result;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_LOADER_SCRIPT: &str = "./node_modules/tidepool-uploader/lib/insulet/cli/ibf_loader.js";
pub const DEFAULT_EMAIL_SUFFIX: &str = "+skipit@tidepool.ninja";
pub const DEFAULT_REPORT_PREFIX: &str = "load_test_";

/// Load test configuration, scoped to one run
#[derive(Debug, Clone)]
pub struct Config {
    /// Platform API base URL
    pub host: String,

    /// Operator credentials used to log the platform client in
    pub username: String,
    pub password: String,

    /// Simulated users per cycle
    pub concurrency: usize,

    /// Number of sequential cycles
    pub cycles: u32,

    /// Loader interpreter and its leading arguments (the script path)
    pub loader_program: String,
    pub loader_args: Vec<String>,

    /// Dataset uploaded by every simulated user
    pub source_file: PathBuf,

    /// Appended to the random username to form the signup email
    pub email_suffix: String,

    pub output_dir: PathBuf,
    pub report_prefix: String,

    /// Per-request timeout for platform calls
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: String::new(),
            username: String::new(),
            password: String::new(),
            concurrency: 5,
            cycles: 1,
            loader_program: "node".to_string(),
            loader_args: vec![DEFAULT_LOADER_SCRIPT.to_string()],
            source_file: PathBuf::new(),
            email_suffix: DEFAULT_EMAIL_SUFFIX.to_string(),
            output_dir: PathBuf::from("."),
            report_prefix: DEFAULT_REPORT_PREFIX.to_string(),
            request_timeout: Duration::from_secs(60),
        }
    }
}

impl Config {
    /// Reject settings that would make the run meaningless
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            anyhow::bail!("Platform host is not set (use --host or API_URL)");
        }
        if self.concurrency == 0 {
            anyhow::bail!("Number of simultaneous users must be at least 1");
        }
        if self.cycles == 0 {
            anyhow::bail!("Number of cycles must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Config {
        Config {
            host: "http://localhost:8009".to_string(),
            ..Config::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.concurrency, 5);
        assert_eq!(config.cycles, 1);
        assert_eq!(config.loader_args, vec![DEFAULT_LOADER_SCRIPT.to_string()]);
    }

    #[test]
    fn test_validate() {
        assert!(valid().validate().is_ok());
        assert!(Config::default().validate().is_err());
        assert!(Config {
            concurrency: 0,
            ..valid()
        }
        .validate()
        .is_err());
        assert!(Config { cycles: 0, ..valid() }.validate().is_err());
    }
}
