//! HTTP adapter for the account service.
//!
//! Implements the `AccountClient` port over JSON/HTTP with `reqwest`.
//!
//! # Endpoints
//!
//! | Operation     | Request                                  |
//! |---------------|------------------------------------------|
//! | `register`    | `POST   {base}/auth/register`            |
//! | `login`       | `POST   {base}/auth/login`               |
//! | `get_profile` | `GET    {base}/users/{username}`         |
//! | `update_data` | `PATCH  {base}/users/{username}/data`    |
//! | `list_users`  | `GET    {base}/users?limit=N&sort=desc`  |
//!
//! Authenticated calls send `Authorization: Bearer <token>`. Error bodies
//! are `{ "msg": ... }` (or `{ "message": ... }`). Response envelopes also
//! accept the `usuario`/`usuarios` keys used by the reference service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::foundation::SessionToken;
use crate::domain::{Profile, ProfilePatch};
use crate::ports::{AccountClient, AccountError, Credentials, ListUsersQuery, LoginGrant};

/// Configuration for the HTTP account client.
#[derive(Debug, Clone)]
pub struct HttpAccountConfig {
    /// Base URL of the account API (e.g. "http://localhost:3000/api").
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl HttpAccountConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Errors constructing the HTTP client.
#[derive(Debug, Error)]
pub enum HttpClientError {
    #[error("Invalid account service URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Failed to create HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

#[derive(Serialize)]
struct CredentialsBody<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginBody {
    token: String,
    #[serde(default, alias = "usuario")]
    user: Option<Profile>,
}

#[derive(Deserialize)]
struct ProfileBody {
    #[serde(alias = "usuario")]
    user: Profile,
}

#[derive(Deserialize)]
struct UsersBody {
    #[serde(default, alias = "usuarios")]
    users: Vec<Profile>,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default, alias = "message")]
    msg: Option<String>,
}

/// Account service client over HTTP.
pub struct ReqwestAccountClient {
    base_url: Url,
    client: Client,
}

impl ReqwestAccountClient {
    /// Creates a client for the given configuration.
    pub fn new(config: HttpAccountConfig) -> Result<Self, HttpClientError> {
        let base_url =
            Url::parse(&config.base_url).map_err(|e| HttpClientError::InvalidBaseUrl {
                url: config.base_url.clone(),
                reason: e.to_string(),
            })?;

        if base_url.cannot_be_a_base() {
            return Err(HttpClientError::InvalidBaseUrl {
                url: config.base_url,
                reason: "URL cannot carry a path".to_string(),
            });
        }

        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self { base_url, client })
    }

    /// Builds an endpoint URL, percent-encoding each path segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Sends a request and maps transport and status failures.
    async fn send(&self, request: RequestBuilder) -> Result<Response, AccountError> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                AccountError::network("Request timed out")
            } else if e.is_connect() {
                AccountError::network(format!("Connection failed: {}", e))
            } else {
                AccountError::network(e.to_string())
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::debug!(status = status.as_u16(), "Account service rejected request");
        Err(error_from_body(status.as_u16(), &body))
    }

    async fn parse<T: for<'de> Deserialize<'de>>(response: Response) -> Result<T, AccountError> {
        response
            .json::<T>()
            .await
            .map_err(|e| AccountError::network(format!("Failed to parse response: {}", e)))
    }
}

/// Builds an `AccountError` from a failed response status and body.
fn error_from_body(status: u16, body: &str) -> AccountError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.msg)
        .filter(|m| !m.is_empty());
    AccountError::from_status(status, message)
}

#[async_trait]
impl AccountClient for ReqwestAccountClient {
    async fn register(&self, credentials: &Credentials) -> Result<(), AccountError> {
        let body = CredentialsBody {
            username: &credentials.username,
            password: credentials.password.expose(),
        };
        let request = self
            .client
            .post(self.endpoint(&["auth", "register"]))
            .json(&body);

        self.send(request).await?;
        Ok(())
    }

    async fn login(&self, credentials: &Credentials) -> Result<LoginGrant, AccountError> {
        let body = CredentialsBody {
            username: &credentials.username,
            password: credentials.password.expose(),
        };
        let request = self.client.post(self.endpoint(&["auth", "login"])).json(&body);

        let response = self.send(request).await?;
        let login: LoginBody = Self::parse(response).await?;
        let token = SessionToken::new(login.token)
            .map_err(|_| AccountError::network("Login response carried an empty token"))?;

        Ok(LoginGrant {
            token,
            profile: login.user,
        })
    }

    async fn get_profile(
        &self,
        username: &str,
        token: &SessionToken,
    ) -> Result<Profile, AccountError> {
        let request = self
            .client
            .get(self.endpoint(&["users", username]))
            .bearer_auth(token.expose());

        let response = self.send(request).await?;
        let body: ProfileBody = Self::parse(response).await?;
        Ok(body.user)
    }

    async fn update_data(
        &self,
        username: &str,
        patch: &ProfilePatch,
        token: &SessionToken,
    ) -> Result<Profile, AccountError> {
        let request = self
            .client
            .patch(self.endpoint(&["users", username, "data"]))
            .bearer_auth(token.expose())
            .json(patch);

        let response = self.send(request).await?;
        let body: ProfileBody = Self::parse(response).await?;
        Ok(body.user)
    }

    async fn list_users(
        &self,
        query: &ListUsersQuery,
        token: &SessionToken,
    ) -> Result<Vec<Profile>, AccountError> {
        let mut params = vec![("limit", query.limit.to_string())];
        if query.sort_descending_by_score {
            params.push(("sort", "desc".to_string()));
        }

        let request = self
            .client
            .get(self.endpoint(&["users"]))
            .query(&params)
            .bearer_auth(token.expose());

        let response = self.send(request).await?;
        let body: UsersBody = Self::parse(response).await?;
        Ok(body.users)
    }
}
