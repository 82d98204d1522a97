//! Webshare.cz provider implementation.
//!
//! Every endpoint is a form-encoded POST answering with a small XML document
//! whose `<status>` element is `OK` on success.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use sha1::{Digest, Sha1};
use tracing::{debug, warn};

use crate::config::ProviderConfig;
use crate::metrics;

use super::{Credentials, FileDetails, FileProvider, ProviderError, RawCandidate, SessionToken};

const STATUS_OK: &str = "OK";

/// Base of the public file pages.
const FILE_PAGE_BASE: &str = "https://webshare.cz/#/file";

#[derive(Debug, Deserialize)]
struct SaltResponse {
    status: String,
    #[serde(default)]
    salt: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    status: String,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    status: String,
    #[serde(rename = "file", default)]
    files: Vec<XmlFile>,
    #[serde(default)]
    message: Option<String>,
}

/// A `<file>` entry in search results. Numbers arrive as text and are
/// parsed leniently.
#[derive(Debug, Deserialize)]
struct XmlFile {
    ident: String,
    name: String,
    #[serde(default)]
    size: Option<String>,
    #[serde(default)]
    positive_votes: Option<String>,
    #[serde(default)]
    negative_votes: Option<String>,
    #[serde(default)]
    img: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FileInfoResponse {
    status: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    size: Option<String>,
    #[serde(default)]
    positive_votes: Option<String>,
    #[serde(default)]
    negative_votes: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    stripe: Option<String>,
    #[serde(default)]
    bitrate: Option<String>,
    #[serde(default)]
    width: Option<String>,
    #[serde(default)]
    height: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FileLinkResponse {
    status: String,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

fn number<T: std::str::FromStr>(value: &Option<String>) -> Option<T> {
    value.as_deref().and_then(|v| v.trim().parse().ok())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn is_protected(password: &Option<String>) -> bool {
    password.as_deref().map(str::trim) == Some("1")
}

impl From<XmlFile> for RawCandidate {
    fn from(file: XmlFile) -> Self {
        RawCandidate {
            size: number(&file.size).unwrap_or(0),
            pos_votes: number(&file.positive_votes).unwrap_or(0),
            neg_votes: number(&file.negative_votes).unwrap_or(0),
            protected: is_protected(&file.password),
            img: non_empty(file.img),
            ident: file.ident,
            name: file.name,
        }
    }
}

fn parse_xml<T: DeserializeOwned>(body: &str) -> Result<T, ProviderError> {
    quick_xml::de::from_str(body).map_err(|e| ProviderError::MalformedResponse(e.to_string()))
}

/// Webshare's password salting: SHA-1 hex digest of the MD5-crypt hash.
pub fn salt_password(password: &str, salt: &str) -> Result<String, ProviderError> {
    let crypted = pwhash::md5_crypt::hash_with(format!("$1${}", salt).as_str(), password)
        .map_err(|e| ProviderError::Authentication(format!("Cannot salt password: {}", e)))?;
    Ok(format!("{:x}", Sha1::digest(crypted.as_bytes())))
}

/// Webshare.cz API client.
pub struct WebshareClient {
    client: Client,
    base_url: String,
    search_limit: u32,
}

impl WebshareClient {
    /// Create a client for the configured API base URL.
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProviderError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            search_limit: config.search_limit,
        })
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/{}/", self.base_url, name)
    }

    /// POST a form and return the response body.
    async fn post_form(&self, name: &str, form: &[(&str, &str)]) -> Result<String, ProviderError> {
        let result = self.send_form(name, form).await;
        metrics::record_external("webshare", name, &result);
        result
    }

    async fn send_form(&self, name: &str, form: &[(&str, &str)]) -> Result<String, ProviderError> {
        let response = self
            .client
            .post(self.endpoint(name))
            .header(reqwest::header::ACCEPT, "text/xml; charset=UTF-8")
            .form(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        Ok(response.text().await?)
    }

    /// Fetch the salt for a login name.
    pub async fn salt(&self, login: &str) -> Result<String, ProviderError> {
        let body = self
            .post_form("salt", &[("username_or_email", login)])
            .await?;
        let response: SaltResponse = parse_xml(&body)?;
        match (response.status.as_str(), non_empty(response.salt)) {
            (STATUS_OK, Some(salt)) => Ok(salt),
            _ => Err(ProviderError::Authentication(format!(
                "No salt for user {}",
                login
            ))),
        }
    }
}

#[async_trait]
impl FileProvider for WebshareClient {
    fn name(&self) -> &str {
        "webshare"
    }

    async fn salted_password(&self, login: &str, password: &str) -> Result<String, ProviderError> {
        let salt = self.salt(login).await?;
        salt_password(password, &salt)
    }

    async fn login(&self, credentials: &Credentials) -> Result<SessionToken, ProviderError> {
        let salted = match (&credentials.salted_password, &credentials.password) {
            (Some(salted), _) => salted.clone(),
            (None, Some(password)) => self.salted_password(&credentials.login, password).await?,
            (None, None) => {
                return Err(ProviderError::Authentication(
                    "No password supplied".to_string(),
                ))
            }
        };

        debug!(login = %credentials.login, "Logging in to Webshare");
        let body = self
            .post_form(
                "login",
                &[
                    ("username_or_email", credentials.login.as_str()),
                    ("password", salted.as_str()),
                    ("keep_logged_in", "1"),
                ],
            )
            .await?;
        let response: LoginResponse = parse_xml(&body)?;

        match (response.status.as_str(), non_empty(response.token)) {
            (STATUS_OK, Some(token)) => Ok(SessionToken(token)),
            _ => Err(ProviderError::Authentication(
                response
                    .message
                    .unwrap_or_else(|| "Invalid login credentials".to_string()),
            )),
        }
    }

    async fn search(
        &self,
        query: &str,
        token: &SessionToken,
    ) -> Result<Vec<RawCandidate>, ProviderError> {
        debug!(query = %query, "Searching Webshare");
        let limit = self.search_limit.to_string();
        let body = self
            .post_form(
                "search",
                &[
                    ("what", query),
                    ("category", "video"),
                    ("limit", limit.as_str()),
                    ("wst", token.as_str()),
                ],
            )
            .await?;
        let response: SearchResponse = parse_xml(&body)?;

        if response.status != STATUS_OK {
            return Err(ProviderError::Api(
                response
                    .message
                    .unwrap_or_else(|| format!("Search status {}", response.status)),
            ));
        }

        Ok(response.files.into_iter().map(RawCandidate::from).collect())
    }

    async fn file_details(
        &self,
        ident: &str,
        token: &SessionToken,
    ) -> Result<Option<FileDetails>, ProviderError> {
        let body = self
            .post_form("file_info", &[("ident", ident), ("wst", token.as_str())])
            .await?;
        let response: FileInfoResponse = parse_xml(&body)?;

        if response.status != STATUS_OK {
            debug!(ident = %ident, status = %response.status, "File info status not OK");
            return Ok(None);
        }

        let size = number(&response.size);
        let (Some(filename), Some(size)) = (non_empty(response.name), size) else {
            warn!(ident = %ident, "File info missing name or size");
            return Ok(None);
        };

        Ok(Some(FileDetails {
            ident: ident.to_string(),
            filename,
            size,
            pos_votes: number(&response.positive_votes).unwrap_or(0),
            neg_votes: number(&response.negative_votes).unwrap_or(0),
            description: non_empty(response.description),
            stripe: non_empty(response.stripe),
            bitrate: number(&response.bitrate).filter(|b| *b > 0),
            width: number(&response.width).filter(|w| *w > 0),
            height: number(&response.height).filter(|h| *h > 0),
            protected: is_protected(&response.password),
        }))
    }

    async fn file_link(&self, ident: &str, token: &SessionToken) -> Result<String, ProviderError> {
        let body = self
            .post_form(
                "file_link",
                &[
                    ("ident", ident),
                    ("download_type", "video_stream"),
                    ("force_https", "1"),
                    ("wst", token.as_str()),
                ],
            )
            .await?;
        let response: FileLinkResponse = parse_xml(&body)?;

        match (response.status.as_str(), non_empty(response.link)) {
            (STATUS_OK, Some(link)) => Ok(link),
            _ => Err(ProviderError::Api(
                response
                    .message
                    .unwrap_or_else(|| format!("No link for {}", ident)),
            )),
        }
    }

    fn file_page_url(&self, ident: &str) -> Option<String> {
        Some(format!("{}/{}", FILE_PAGE_BASE, ident))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_response() {
        let body = r#"<?xml version="1.0" encoding="UTF-8"?>
<response>
  <status>OK</status>
  <total>2</total>
  <file>
    <ident>abc123</ident>
    <name>Miracle.man.2024.CZ.1080p.mkv</name>
    <type>mkv</type>
    <img>https://img.example/abc.jpg</img>
    <size>3200000000</size>
    <positive_votes>12</positive_votes>
    <negative_votes>1</negative_votes>
    <password>0</password>
  </file>
  <file>
    <ident>def456</ident>
    <name>Locked.avi</name>
    <img></img>
    <size>700000000</size>
    <positive_votes>0</positive_votes>
    <negative_votes>0</negative_votes>
    <password>1</password>
  </file>
</response>"#;
        let response: SearchResponse = parse_xml(body).unwrap();
        assert_eq!(response.status, "OK");
        let files: Vec<RawCandidate> = response.files.into_iter().map(RawCandidate::from).collect();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].ident, "abc123");
        assert_eq!(files[0].size, 3_200_000_000);
        assert_eq!(files[0].pos_votes, 12);
        assert_eq!(files[0].img.as_deref(), Some("https://img.example/abc.jpg"));
        assert!(!files[0].protected);
        assert!(files[1].protected);
        assert_eq!(files[1].img, None);
    }

    #[test]
    fn test_parse_empty_search_response() {
        let body = "<response><status>OK</status><total>0</total></response>";
        let response: SearchResponse = parse_xml(body).unwrap();
        assert!(response.files.is_empty());
    }

    #[test]
    fn test_parse_file_info_optional_fields() {
        let body = r#"<response>
  <status>OK</status>
  <name>Show.S01E02.mkv</name>
  <size>1500000000</size>
  <positive_votes>3</positive_votes>
  <negative_votes>0</negative_votes>
  <bitrate>4500000</bitrate>
  <width>1920</width>
  <height>1080</height>
</response>"#;
        let response: FileInfoResponse = parse_xml(body).unwrap();
        assert_eq!(number::<u64>(&response.bitrate), Some(4_500_000));
        assert_eq!(number::<u32>(&response.height), Some(1080));
        assert!(response.description.is_none());
        assert!(non_empty(response.stripe).is_none());
    }

    #[test]
    fn test_parse_file_info_stripe() {
        let body = r#"<response>
  <status>OK</status>
  <name>Pelisky.1999.CZ.avi</name>
  <size>700000000</size>
  <description>Czech classic</description>
  <stripe>https://img.example/stripe/pel.jpg</stripe>
</response>"#;
        let response: FileInfoResponse = parse_xml(body).unwrap();
        assert_eq!(
            non_empty(response.stripe).as_deref(),
            Some("https://img.example/stripe/pel.jpg")
        );
        assert_eq!(response.description.as_deref(), Some("Czech classic"));
    }

    #[test]
    fn test_file_page_url() {
        let client = WebshareClient::new(&ProviderConfig::default()).unwrap();
        assert_eq!(
            client.file_page_url("Ab3x").as_deref(),
            Some("https://webshare.cz/#/file/Ab3x")
        );
    }

    #[test]
    fn test_fatal_status_document() {
        let body = "<response><status>FATAL</status><code>LOGIN_FATAL_1</code><message>Bad login</message></response>";
        let response: LoginResponse = parse_xml(body).unwrap();
        assert_eq!(response.status, "FATAL");
        assert!(response.token.is_none());
        assert_eq!(response.message.as_deref(), Some("Bad login"));
    }

    #[test]
    fn test_malformed_xml() {
        let result: Result<SearchResponse, _> = parse_xml("not xml at all");
        assert!(matches!(result, Err(ProviderError::MalformedResponse(_))));
    }

    #[test]
    fn test_salt_password_is_sha1_hex() {
        let salted = salt_password("secret", "abcdefgh").unwrap();
        assert_eq!(salted.len(), 40);
        assert!(salted.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(salted, salt_password("secret", "abcdefgh").unwrap());
        assert_ne!(salted, salt_password("secret", "hgfedcba").unwrap());
    }

    #[test]
    fn test_client_trims_base_url() {
        let config = ProviderConfig {
            base_url: "https://webshare.cz/api/".to_string(),
            ..ProviderConfig::default()
        };
        let client = WebshareClient::new(&config).unwrap();
        assert_eq!(client.endpoint("search"), "https://webshare.cz/api/search/");
    }
}
