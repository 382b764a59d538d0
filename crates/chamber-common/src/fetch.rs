/// Fetching of the member data document from a local file or an HTTP endpoint.
use std::path::PathBuf;
use std::time::Duration;

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::CommonError;

/// Where the member data document lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Url(String),
}

impl DataSource {
    /// `http://` and `https://` locations are URLs, anything else is a file path.
    pub fn parse(location: &str) -> Result<Self, CommonError> {
        let location = location.trim();
        if location.is_empty() {
            return Err(CommonError::InvalidSource("data source must not be empty".to_string()));
        }
        let lower = location.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Ok(Self::Url(location.to_string()))
        } else {
            Ok(Self::File(PathBuf::from(location)))
        }
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

/// Raw bytes of a fetched document plus their sha256 fingerprint.
#[derive(Debug, Clone)]
pub struct Document {
    pub bytes: Vec<u8>,
    pub fingerprint: String,
}

impl Document {
    pub fn new(bytes: Vec<u8>) -> Self {
        let fingerprint = format!("{:x}", Sha256::digest(&bytes));
        Self { bytes, fingerprint }
    }
}

#[derive(Clone)]
pub struct Fetcher {
    http: reqwest::Client,
    timeout: Duration,
}

impl Fetcher {
    pub fn new(timeout: Duration) -> Result<Self, CommonError> {
        let http = reqwest::Client::builder()
            .user_agent("chamber-directory")
            .build()?;
        Ok(Self { http, timeout })
    }

    pub async fn fetch(&self, source: &DataSource) -> Result<Document, CommonError> {
        let bytes = match source {
            DataSource::File(path) => tokio::fs::read(path).await.map_err(|e| CommonError::Io {
                path: path.display().to_string(),
                source: e,
            })?,
            DataSource::Url(url) => {
                let resp = self
                    .http
                    .get(url)
                    .timeout(self.timeout)
                    .send()
                    .await?
                    .error_for_status()?;
                resp.bytes().await?.to_vec()
            }
        };
        debug!(source = %source, bytes = bytes.len(), "fetched data document");
        Ok(Document::new(bytes))
    }
}
