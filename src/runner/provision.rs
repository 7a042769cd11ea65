use super::state::Account;
use crate::error::ProvisioningError;
use crate::platform::{NewUser, PlatformApi, Profile, SignupOptions};
use rand::Rng;
use std::sync::Arc;

const USERNAME_LENGTH: usize = 6;
const PASSWORD_LENGTH: usize = 8;

// Alphabetic, minus characters that are easy to misread
const READABLE_ALPHABET: &[u8] = b"abcdefghijkmnpqrstuvwxyzABCDEFGHJKLMNPQRSTUVWXYZ";

/// Creates throwaway accounts on the platform
#[derive(Clone)]
pub struct AccountProvisioner {
    api: Arc<dyn PlatformApi>,
    email_suffix: String,
}

impl AccountProvisioner {
    pub fn new(api: Arc<dyn PlatformApi>, email_suffix: &str) -> Self {
        Self {
            api,
            email_suffix: email_suffix.to_string(),
        }
    }

    /// Sign up a random user and give it a placeholder profile
    pub async fn provision(&self) -> Result<Account, ProvisioningError> {
        let username = format!("{}{}", random_username(), self.email_suffix);
        let password = random_password();
        let profile = Profile::placeholder(&username);

        let new_user = NewUser {
            username: username.clone(),
            emails: vec![username.clone()],
            password: password.clone(),
        };

        log::debug!("Signing up {}", username);
        let details = self
            .api
            .signup(&new_user, &SignupOptions::default())
            .await
            .map_err(|e| ProvisioningError::Signup(e.to_string()))?;

        self.api
            .add_or_update_profile(&details.userid, &profile)
            .await
            .map_err(|e| ProvisioningError::Profile {
                userid: details.userid.clone(),
                reason: e.to_string(),
            })?;

        Ok(Account {
            id: details.userid,
            username,
            password,
        })
    }
}

fn random_username() -> String {
    let mut rng = rand::thread_rng();
    (0..USERNAME_LENGTH)
        .map(|_| READABLE_ALPHABET[rng.gen_range(0..READABLE_ALPHABET.len())] as char)
        .collect()
}

fn random_password() -> String {
    let mut rng = rand::thread_rng();
    (0..PASSWORD_LENGTH)
        .map(|_| rng.sample(rand::distributions::Alphanumeric) as char)
        .collect()
}
