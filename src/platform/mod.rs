pub mod client;

use crate::error::PlatformResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use client::PlatformClient;

/// Signup payload for a new platform user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewUser {
    pub username: String,
    pub emails: Vec<String>,
    pub password: String,
}

/// Options passed through to signup; the load test never sets any
#[derive(Debug, Clone, Default, Serialize)]
pub struct SignupOptions {}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SignupDetails {
    pub userid: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PatientInfo {
    pub birthday: String,
    pub diagnosis_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub full_name: String,
    pub patient: PatientInfo,
}

impl Profile {
    /// Minimal patient profile with placeholder dates
    pub fn placeholder(full_name: &str) -> Self {
        Self {
            full_name: full_name.to_string(),
            patient: PatientInfo {
                birthday: "1900-01-01".to_string(),
                diagnosis_date: "1900-01-01".to_string(),
            },
        }
    }
}

/// Operations the load test consumes from the remote platform
#[async_trait]
pub trait PlatformApi: Send + Sync {
    async fn signup(&self, user: &NewUser, opts: &SignupOptions) -> PlatformResult<SignupDetails>;

    async fn add_or_update_profile(&self, userid: &str, profile: &Profile) -> PlatformResult<()>;

    async fn get_device_data_for_user(&self, userid: &str) -> PlatformResult<serde_json::Value>;
}
