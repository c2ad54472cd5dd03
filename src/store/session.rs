//! Session handling against the store's auth endpoint.
//!
//! Signs in with email and password, caches the resulting session as JSON in
//! the platform state directory, and resolves the cached session on later
//! invocations. Protected commands run with the session's access token when
//! one is cached and fall back to the anon key otherwise.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ResolvedStoreConfig;
use crate::error::{LeadbookError, Result};

/// A signed-in session as returned by the auth endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

/// The authenticated user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Auth client plus the on-disk session cache.
#[derive(Debug, Clone)]
pub struct SessionProvider {
    base: Url,
    anon_key: String,
    client: Client,
    cache_path: PathBuf,
}

impl SessionProvider {
    /// Creates a provider for the resolved configuration, caching the session
    /// at the default platform path.
    pub fn new(config: &ResolvedStoreConfig) -> Result<Self> {
        Self::with_cache_path(config, default_cache_path())
    }

    /// Creates a provider with an explicit cache path (used in tests).
    pub fn with_cache_path(config: &ResolvedStoreConfig, cache_path: PathBuf) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LeadbookError::auth(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            base: config.url.clone(),
            anon_key: config.anon_key.clone(),
            client,
            cache_path,
        })
    }

    fn auth_url(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|e| LeadbookError::config(format!("Invalid store URL: {e}")))
    }

    /// Signs in with email and password and caches the session.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let url = self.auth_url("auth/v1/token")?;
        let response = self
            .client
            .post(url)
            .query(&[("grant_type", "password")])
            .header("apikey", &self.anon_key)
            .json(&SignInRequest { email, password })
            .send()
            .await
            .map_err(|e| LeadbookError::auth(format!("Request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LeadbookError::auth(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(Self::error_from_response(status, &body));
        }

        let session: Session = serde_json::from_str(&body)
            .map_err(|e| LeadbookError::auth(format!("Failed to parse session: {e}")))?;
        self.store_session(&session)?;
        Ok(session)
    }

    /// Returns the cached session, if any.
    pub fn current_session(&self) -> Result<Option<Session>> {
        if !self.cache_path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.cache_path)
            .map_err(|e| LeadbookError::auth(format!("Failed to read session cache: {e}")))?;
        let session = serde_json::from_str(&content)
            .map_err(|e| LeadbookError::auth(format!("Invalid session cache: {e}")))?;
        Ok(Some(session))
    }

    /// Fetches the user for the given session from the auth endpoint.
    pub async fn current_user(&self, session: &Session) -> Result<User> {
        let url = self.auth_url("auth/v1/user")?;
        let response = self
            .client
            .get(url)
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", session.access_token))
            .send()
            .await
            .map_err(|e| LeadbookError::auth(format!("Request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LeadbookError::auth(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(Self::error_from_response(status, &body));
        }
        serde_json::from_str(&body)
            .map_err(|e| LeadbookError::auth(format!("Failed to parse user: {e}")))
    }

    /// Signs out the session at the endpoint and clears the cache.
    ///
    /// The cache is cleared even when the remote call fails, so a stale token
    /// never outlives an explicit logout.
    pub async fn sign_out(&self, session: &Session) -> Result<()> {
        let url = self.auth_url("auth/v1/logout")?;
        let result = self
            .client
            .post(url)
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", session.access_token))
            .send()
            .await;

        self.clear_session()?;

        match result {
            Ok(response) if !response.status().is_success() => {
                debug!("Remote sign-out returned {}", response.status());
                Ok(())
            }
            Ok(_) => Ok(()),
            Err(e) => {
                debug!("Remote sign-out failed: {e}");
                Ok(())
            }
        }
    }

    /// Removes the cached session.
    pub fn clear_session(&self) -> Result<()> {
        if self.cache_path.exists() {
            std::fs::remove_file(&self.cache_path)
                .map_err(|e| LeadbookError::auth(format!("Failed to clear session cache: {e}")))?;
        }
        Ok(())
    }

    fn store_session(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.cache_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                LeadbookError::auth(format!("Failed to create session cache directory: {e}"))
            })?;
        }
        let content = serde_json::to_string(session)
            .map_err(|e| LeadbookError::auth(format!("Failed to encode session: {e}")))?;
        std::fs::write(&self.cache_path, content)
            .map_err(|e| LeadbookError::auth(format!("Failed to write session cache: {e}")))
    }

    fn error_from_response(status: StatusCode, body: &str) -> LeadbookError {
        let message = serde_json::from_str::<AuthErrorBody>(body)
            .ok()
            .and_then(|e| e.message())
            .unwrap_or_else(|| body.to_string());

        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
            LeadbookError::auth(message)
        } else {
            LeadbookError::store(message)
        }
    }
}

/// Returns the default session cache path.
///
/// Uses the XDG state directory on Linux, falling back to the config
/// directory, then the temp directory.
pub fn default_cache_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        return state_dir.join("leadbook").join("session.json");
    }
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("leadbook").join("session.json");
    }
    std::env::temp_dir().join("leadbook-session.json")
}

#[derive(Debug, Serialize)]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Auth endpoint errors come in a few shapes; accept the common ones.
#[derive(Debug, Deserialize)]
struct AuthErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
}

impl AuthErrorBody {
    fn message(self) -> Option<String> {
        self.message.or(self.error_description).or(self.msg)
    }
}
