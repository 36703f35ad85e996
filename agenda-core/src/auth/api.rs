//! Backend endpoints used by the session store.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::auth::state::User;
use crate::config::AgendaConfig;
use crate::error::{AgendaError, AgendaResult};

/// Header the backend reads the session token from.
pub const TOKEN_HEADER: &str = "x-token";

#[derive(Clone, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct RegisterData {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Successful answer from any of the auth endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub ok: bool,
    pub uid: String,
    pub name: String,
    pub token: String,
}

impl AuthResponse {
    /// The user profile carried by this response; `email` and `password` are never echoed back.
    pub fn user(&self) -> User {
        User {
            name: Some(self.name.clone()),
            uid: Some(self.uid.clone()),
            ..User::default()
        }
    }
}

#[derive(Debug, Deserialize)]
struct FieldError {
    msg: String,
}

/// Failure body: either `{ok:false, msg}` or a field validation map.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    errors: Option<BTreeMap<String, FieldError>>,
}

impl ErrorResponse {
    fn into_message(self) -> Option<String> {
        self.msg
            .or_else(|| self.errors?.into_values().next().map(|e| e.msg))
    }
}

/// The REST surface the session store depends on.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// POST /auth
    async fn login(&self, credentials: &LoginCredentials) -> AgendaResult<AuthResponse>;

    /// POST /auth/new
    async fn register(&self, data: &RegisterData) -> AgendaResult<AuthResponse>;

    /// GET /auth/renew
    async fn renew(&self, token: &str) -> AgendaResult<AuthResponse>;
}

/// HTTP client for the auth backend
pub struct HttpAuthApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpAuthApi {
    pub fn new(base_url: &str, timeout: Duration) -> AgendaResult<Self> {
        url::Url::parse(base_url)
            .map_err(|e| AgendaError::Config(format!("Invalid api_url '{base_url}': {e}")))?;

        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(HttpAuthApi {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &AgendaConfig) -> AgendaResult<Self> {
        Self::new(&config.api_url, config.request_timeout())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn parse(resp: reqwest::Response) -> AgendaResult<AuthResponse> {
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await?;
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .ok()
                .and_then(ErrorResponse::into_message)
                .ok_or_else(|| {
                    AgendaError::InvalidResponse(format!("HTTP {status} without an error message"))
                })?;

            warn!(status = status.as_u16(), %message, "Backend rejected auth request");
            return Err(AgendaError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let body: AuthResponse = resp
            .json()
            .await
            .map_err(|e| AgendaError::InvalidResponse(e.to_string()))?;

        if !body.ok {
            return Err(AgendaError::InvalidResponse(
                "Backend answered ok=false with a success status".into(),
            ));
        }

        Ok(body)
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, credentials: &LoginCredentials) -> AgendaResult<AuthResponse> {
        debug!(email = %credentials.email, "POST /auth");
        let resp = self
            .http
            .post(self.url("/auth"))
            .json(credentials)
            .send()
            .await?;

        Self::parse(resp).await
    }

    async fn register(&self, data: &RegisterData) -> AgendaResult<AuthResponse> {
        debug!(email = %data.email, "POST /auth/new");
        let resp = self
            .http
            .post(self.url("/auth/new"))
            .json(data)
            .send()
            .await?;

        Self::parse(resp).await
    }

    async fn renew(&self, token: &str) -> AgendaResult<AuthResponse> {
        debug!("GET /auth/renew");
        let resp = self
            .http
            .get(self.url("/auth/renew"))
            .header(TOKEN_HEADER, token)
            .send()
            .await?;

        Self::parse(resp).await
    }
}
