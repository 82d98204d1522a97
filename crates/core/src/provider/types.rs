//! Types shared by file providers.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One file record returned by a provider search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCandidate {
    /// Provider-unique file identifier.
    pub ident: String,
    /// Raw filename.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    #[serde(default)]
    pub pos_votes: u32,
    #[serde(default)]
    pub neg_votes: u32,
    /// Thumbnail URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
    /// Password-protected files can never be streamed.
    #[serde(default)]
    pub protected: bool,
}

/// Per-file detail record used for enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDetails {
    pub ident: String,
    pub filename: String,
    pub size: u64,
    #[serde(default)]
    pub pos_votes: u32,
    #[serde(default)]
    pub neg_votes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Preview strip image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stripe: Option<String>,
    /// Stream bitrate in bits per second.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default)]
    pub protected: bool,
}

/// User credentials for the provider.
///
/// Clients may store the salted password instead of the plain one; when
/// both are present the salted form wins.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub login: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salted_password: Option<String>,
}

impl Credentials {
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: Some(password.into()),
            salted_password: None,
        }
    }

    pub fn salted(login: impl Into<String>, salted_password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: None,
            salted_password: Some(salted_password.into()),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field(
                "salted_password",
                &self.salted_password.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// Session token returned by a successful login.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(pub String);

impl SessionToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

/// Errors that can occur talking to a provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Provider connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Provider API error: {0}")]
    Api(String),

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),
}

impl ProviderError {
    pub fn is_authentication(&self) -> bool {
        matches!(self, ProviderError::Authentication(_))
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProviderError::Timeout
        } else if e.is_connect() {
            ProviderError::ConnectionFailed(e.to_string())
        } else {
            ProviderError::Api(e.to_string())
        }
    }
}

/// Trait for file-hosting search backends.
#[async_trait]
pub trait FileProvider: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    /// Derive the stored form of a password, so clients can keep that
    /// instead of the plain one.
    async fn salted_password(&self, login: &str, password: &str) -> Result<String, ProviderError>;

    /// Exchange credentials for a session token.
    async fn login(&self, credentials: &Credentials) -> Result<SessionToken, ProviderError>;

    /// Run one free-text search.
    async fn search(
        &self,
        query: &str,
        token: &SessionToken,
    ) -> Result<Vec<RawCandidate>, ProviderError>;

    /// Fetch the detail record for a file; `None` when the provider has none.
    async fn file_details(
        &self,
        ident: &str,
        token: &SessionToken,
    ) -> Result<Option<FileDetails>, ProviderError>;

    /// Resolve a playable link for a file.
    async fn file_link(&self, ident: &str, token: &SessionToken) -> Result<String, ProviderError>;

    /// Public web page of a file, when the provider has one.
    fn file_page_url(&self, _ident: &str) -> Option<String> {
        None
    }
}
