//! Where the workbook and mapping bytes come from.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::{Client, Url};

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// A command-line location: a file on disk or an HTTP(S) resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Local(PathBuf),
    Remote(Url),
}

impl Location {
    /// Interprets a raw argument.
    ///
    /// Backslashes (left over from shell escaping) are removed and
    /// percent-encoded sequences decoded before the value is classified.
    /// `http`/`https` URLs are remote, `file` URLs and anything else local.
    pub fn parse(raw: &str) -> Self {
        let unescaped: String = raw.chars().filter(|c| *c != '\\').collect();
        let decoded = match urlencoding::decode(&unescaped) {
            Ok(decoded) => decoded.into_owned(),
            Err(_) => unescaped,
        };

        match Url::parse(&decoded) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Location::Remote(url),
            Ok(url) if url.scheme() == "file" => match url.to_file_path() {
                Ok(path) => Location::Local(path),
                Err(()) => Location::Local(PathBuf::from(decoded)),
            },
            _ => Location::Local(PathBuf::from(decoded)),
        }
    }

    /// Reads the complete content.
    pub async fn fetch(&self, client: &Client) -> Result<Vec<u8>, String> {
        match self {
            Location::Local(path) => tokio::fs::read(path)
                .await
                .map_err(|e| format!("can't read {}: {}", path.display(), e)),
            Location::Remote(url) => {
                tracing::debug!(%url, "downloading");
                let response = client
                    .get(url.clone())
                    .send()
                    .await
                    .and_then(|response| response.error_for_status())
                    .map_err(|e| format!("can't download {}: {}", url, e))?;
                let bytes = response
                    .bytes()
                    .await
                    .map_err(|e| format!("can't download {}: {}", url, e))?;
                Ok(bytes.to_vec())
            }
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Local(path) => write!(f, "{}", path.display()),
            Location::Remote(url) => write!(f, "{}", url),
        }
    }
}

/// Fetches the workbook and the mapping file concurrently.
///
/// The first failure wins; nothing is returned unless both succeed.
pub async fn load_inputs(
    workbook: &Location,
    mapping: &Location,
) -> Result<(Vec<u8>, Vec<u8>), String> {
    let client = Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .map_err(|e| format!("can't create HTTP client: {}", e))?;

    tokio::try_join!(workbook.fetch(&client), mapping.fetch(&client))
}
