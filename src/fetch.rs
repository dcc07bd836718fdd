//! Data sources for the user document and the external profile.
//!
//! The controller talks to two small traits so the network edge stays
//! swappable: tests plug in in-memory fakes, the CLI picks file- or
//! HTTP-backed sources. The HTTP implementations live behind the `remote`
//! feature.

use crate::document::{ExternalProfile, UserDocument};
use crate::error::{Error, Result};

/// Produces the user document on demand.
pub trait DocumentSource {
    fn fetch_document(&self) -> Result<UserDocument>;
}

/// Produces the external account record for a username.
pub trait ProfileSource: Send + Sync {
    fn fetch_profile(&self, username: &str) -> Result<ExternalProfile>;
}

impl<T: DocumentSource + ?Sized> DocumentSource for Box<T> {
    fn fetch_document(&self) -> Result<UserDocument> {
        (**self).fetch_document()
    }
}

impl<T: ProfileSource + ?Sized> ProfileSource for Box<T> {
    fn fetch_profile(&self, username: &str) -> Result<ExternalProfile> {
        (**self).fetch_profile(username)
    }
}

/// Reads the user document from a local JSON file.
pub struct FileDocumentSource {
    path: std::path::PathBuf,
}

impl FileDocumentSource {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DocumentSource for FileDocumentSource {
    fn fetch_document(&self) -> Result<UserDocument> {
        let body = std::fs::read_to_string(&self.path)
            .map_err(|err| Error::DocumentFetch(format!("{}: {err}", self.path.display())))?;
        serde_json::from_str(&body)
            .map_err(|err| Error::DocumentFetch(format!("malformed user document: {err}")))
    }
}

/// A profile source for sessions without a remote backend; always degrades.
pub struct NullProfileSource;

impl ProfileSource for NullProfileSource {
    fn fetch_profile(&self, _username: &str) -> Result<ExternalProfile> {
        Err(Error::ProfileFetch("no profile source configured".into()))
    }
}

#[cfg(feature = "remote")]
pub use self::http::{HttpDocumentSource, HttpProfileSource};

#[cfg(feature = "remote")]
mod http {
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    use reqwest::blocking::Client;
    use url::Url;

    use super::{DocumentSource, ProfileSource};
    use crate::document::{ExternalProfile, UserDocument};
    use crate::error::{Error, Result};
    use crate::PageConfig;

    fn build_client(config: &PageConfig) -> Result<Client> {
        Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|err| Error::Initialization(format!("Failed to build HTTP client: {err}")))
    }

    fn now_millis() -> u128 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis()
    }

    /// Fetches `user.json` over HTTP with a cache-busting query parameter.
    pub struct HttpDocumentSource {
        client: Client,
        url: Url,
        user_agent: String,
    }

    impl HttpDocumentSource {
        pub fn new(config: &PageConfig, url: &str) -> Result<Self> {
            let url = Url::parse(url)
                .map_err(|err| Error::Config(format!("invalid document URL {url}: {err}")))?;
            Ok(Self {
                client: build_client(config)?,
                url,
                user_agent: config.user_agent.clone(),
            })
        }
    }

    impl DocumentSource for HttpDocumentSource {
        fn fetch_document(&self) -> Result<UserDocument> {
            let mut url = self.url.clone();
            url.query_pairs_mut()
                .append_pair("t", &now_millis().to_string());

            let response = self
                .client
                .get(url)
                .header("User-Agent", self.user_agent.clone())
                .send()
                .map_err(|err| Error::DocumentFetch(format!("HTTP GET failed: {err}")))?;
            if !response.status().is_success() {
                return Err(Error::DocumentFetch(format!("HTTP {}", response.status())));
            }
            let body = response
                .text()
                .map_err(|err| Error::DocumentFetch(format!("Failed to read response body: {err}")))?;
            serde_json::from_str(&body)
                .map_err(|err| Error::DocumentFetch(format!("malformed user document: {err}")))
        }
    }

    /// Fetches the external profile from a GitHub-style users API.
    pub struct HttpProfileSource {
        client: Client,
        base: Url,
        user_agent: String,
    }

    impl HttpProfileSource {
        pub fn new(config: &PageConfig) -> Result<Self> {
            let base = Url::parse(&config.profile_api_base).map_err(|err| {
                Error::Config(format!(
                    "invalid profile API base {}: {err}",
                    config.profile_api_base
                ))
            })?;
            Ok(Self {
                client: build_client(config)?,
                base,
                user_agent: config.user_agent.clone(),
            })
        }
    }

    impl ProfileSource for HttpProfileSource {
        fn fetch_profile(&self, username: &str) -> Result<ExternalProfile> {
            let mut endpoint = self.base.clone();
            endpoint
                .path_segments_mut()
                .map_err(|()| Error::Config("profile API base cannot be a base URL".into()))?
                .pop_if_empty()
                .push(username);

            let response = self
                .client
                .get(endpoint)
                .header("User-Agent", self.user_agent.clone())
                .send()
                .map_err(|err| Error::ProfileFetch(format!("HTTP GET failed: {err}")))?;
            if !response.status().is_success() {
                return Err(Error::ProfileFetch(format!("HTTP {}", response.status())));
            }
            let body = response
                .text()
                .map_err(|err| Error::ProfileFetch(format!("Failed to read response body: {err}")))?;
            serde_json::from_str(&body)
                .map_err(|err| Error::ProfileFetch(format!("malformed profile record: {err}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_source_reports_missing_files_as_document_fetch() {
        let source = FileDocumentSource::new("/definitely/not/here/user.json");
        match source.fetch_document() {
            Err(Error::DocumentFetch(_)) => {}
            other => panic!("expected DocumentFetch error, got {other:?}"),
        }
    }

    #[test]
    fn null_profile_source_always_degrades() {
        let source = NullProfileSource;
        assert!(matches!(
            source.fetch_profile("octocat"),
            Err(Error::ProfileFetch(_))
        ));
    }
}
