use super::{NewUser, PlatformApi, Profile, SignupDetails, SignupOptions};
use crate::error::{PlatformError, PlatformResult};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

const SESSION_TOKEN_HEADER: &str = "x-tidepool-session-token";

/// HTTP client for the platform REST API.
///
/// Logs in once with the operator credentials. Each account created through
/// `signup` gets its own session, which is used for that account's profile
/// and data calls.
#[derive(Debug, Clone)]
pub struct PlatformClient {
    client: Client,
    host: String,
    token: String,
    /// Session tokens of signed-up accounts, keyed by user id
    sessions: Arc<RwLock<HashMap<String, String>>>,
}

impl PlatformClient {
    /// Log in with the operator credentials and return a ready client
    pub async fn initialize(
        host: &str,
        username: &str,
        password: &str,
        timeout: Duration,
    ) -> PlatformResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        let host = host.trim_end_matches('/').to_string();

        log::debug!("Logging in to {} as {}", host, username);
        let res = client
            .post(format!("{}/auth/login", host))
            .basic_auth(username, Some(password))
            .send()
            .await?;
        let res = check_status("login", res).await?;
        let token = session_token(&res).ok_or(PlatformError::MissingToken("login"))?;

        Ok(Self {
            client,
            host,
            token,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        req.header(SESSION_TOKEN_HEADER, &self.token)
    }

    /// Authenticate as `userid` when its session is known, else as the operator
    async fn authed_as(&self, userid: &str, req: RequestBuilder) -> RequestBuilder {
        match self.sessions.read().await.get(userid) {
            Some(token) => req.header(SESSION_TOKEN_HEADER, token),
            None => self.authed(req),
        }
    }
}

fn session_token(res: &Response) -> Option<String> {
    res.headers()
        .get(SESSION_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn check_status(operation: &'static str, res: Response) -> PlatformResult<Response> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let body = res.text().await.unwrap_or_default();
    Err(PlatformError::Status {
        operation,
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl PlatformApi for PlatformClient {
    async fn signup(&self, user: &NewUser, _opts: &SignupOptions) -> PlatformResult<SignupDetails> {
        let res = self
            .authed(self.client.post(format!("{}/auth/user", self.host)))
            .json(user)
            .send()
            .await?;
        let res = check_status("signup", res).await?;
        let token = session_token(&res);
        let details = res.json::<SignupDetails>().await?;

        match token {
            Some(token) => {
                self.sessions
                    .write()
                    .await
                    .insert(details.userid.clone(), token);
            }
            None => log::debug!("signup for {} returned no session token", details.userid),
        }
        Ok(details)
    }

    async fn add_or_update_profile(&self, userid: &str, profile: &Profile) -> PlatformResult<()> {
        let req = self
            .client
            .put(format!("{}/metadata/{}/profile", self.host, userid));
        let res = self
            .authed_as(userid, req)
            .await
            .json(profile)
            .send()
            .await?;
        check_status("addOrUpdateProfile", res).await?;
        Ok(())
    }

    async fn get_device_data_for_user(&self, userid: &str) -> PlatformResult<serde_json::Value> {
        let req = self.client.get(format!("{}/data/{}", self.host, userid));
        let res = self
            .authed_as(userid, req)
            .await
            .send()
            .await?;
        let res = check_status("getDeviceDataForUser", res).await?;
        Ok(res.json().await?)
    }
}
