use thiserror::Error;

/// Failures raised by the platform API client
#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{operation} returned {status}: {body}")]
    Status {
        operation: &'static str,
        status: u16,
        body: String,
    },

    #[error("{0} response was missing the session token")]
    MissingToken(&'static str),
}

/// Account or profile creation failed; the workflow never got an account
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProvisioningError {
    #[error("signup failed: {0}")]
    Signup(String),

    #[error("profile update failed for {userid}: {reason}")]
    Profile { userid: String, reason: String },
}

/// An upload or download step failed
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StepError {
    #[error("loader could not be launched: {0}")]
    Launch(String),

    #[error("loader exited with {code:?}: {output}")]
    Exit { code: Option<i32>, output: String },

    #[error("download failed: {0}")]
    Download(String),
}

/// At least one workflow in a cycle failed
#[derive(Error, Debug, Clone, PartialEq)]
#[error("run {run_number}: {failed} of {total} workflows failed")]
pub struct RunError {
    pub run_number: u32,
    pub failed: usize,
    pub total: usize,
}

pub type PlatformResult<T> = std::result::Result<T, PlatformError>;
