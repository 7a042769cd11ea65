//! In-memory collaborators with scripted failures

use crate::error::{PlatformError, PlatformResult, StepError};
use crate::loader::DataLoader;
use crate::platform::{NewUser, PlatformApi, Profile, SignupDetails, SignupOptions};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Hands out user ids `user-1`, `user-2`, ... in signup order
#[derive(Default)]
pub struct FakePlatform {
    pub fail_signup: bool,
    pub fail_profile: bool,
    /// User ids whose downloads fail
    pub fail_downloads_for: Vec<String>,
    pub delay: Option<Duration>,
    pub next_id: AtomicUsize,
    pub profiles: Mutex<Vec<(String, Profile)>>,
    pub downloads: Mutex<Vec<String>>,
}

impl FakePlatform {
    pub fn profiles(&self) -> Vec<(String, Profile)> {
        self.profiles.lock().unwrap().clone()
    }

    pub fn downloads(&self) -> Vec<String> {
        self.downloads.lock().unwrap().clone()
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl PlatformApi for FakePlatform {
    async fn signup(&self, _user: &NewUser, _opts: &SignupOptions) -> PlatformResult<SignupDetails> {
        self.pause().await;
        if self.fail_signup {
            return Err(PlatformError::Status {
                operation: "signup",
                status: 409,
                body: "duplicate email".to_string(),
            });
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(SignupDetails {
            userid: format!("user-{}", id),
        })
    }

    async fn add_or_update_profile(&self, userid: &str, profile: &Profile) -> PlatformResult<()> {
        self.pause().await;
        if self.fail_profile {
            return Err(PlatformError::Status {
                operation: "addOrUpdateProfile",
                status: 400,
                body: "profile rejected".to_string(),
            });
        }
        self.profiles
            .lock()
            .unwrap()
            .push((userid.to_string(), profile.clone()));
        Ok(())
    }

    async fn get_device_data_for_user(&self, userid: &str) -> PlatformResult<serde_json::Value> {
        self.pause().await;
        self.downloads.lock().unwrap().push(userid.to_string());
        if self.fail_downloads_for.iter().any(|id| id == userid) {
            return Err(PlatformError::Status {
                operation: "getDeviceDataForUser",
                status: 500,
                body: "boom".to_string(),
            });
        }
        Ok(serde_json::json!([]))
    }
}

#[derive(Default)]
pub struct FakeLoader {
    /// Fail every account's Nth upload (1-based)
    pub fail_on_attempt: Option<usize>,
    pub delay: Option<Duration>,
    pub calls: Mutex<HashMap<String, usize>>,
}

impl FakeLoader {
    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }
}

#[async_trait]
impl DataLoader for FakeLoader {
    async fn upload(&self, _file: &Path, username: &str, _password: &str) -> Result<(), StepError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let attempt = {
            let mut calls = self.calls.lock().unwrap();
            let count = calls.entry(username.to_string()).or_insert(0);
            *count += 1;
            *count
        };
        if self.fail_on_attempt == Some(attempt) {
            return Err(StepError::Exit {
                code: Some(1),
                output: "upload rejected".to_string(),
            });
        }
        Ok(())
    }
}
