//! HTTP access to the Artifactory REST API.
//!
//! The collector only ever issues `GET` requests against fixed resource paths
//! below the configured base URI. Authentication, TLS verification, and the
//! request timeout are all fixed at construction time; the pipeline itself
//! enforces no timeout of its own.

use crate::Result;
use crate::error::Error;
use bytes::Bytes;
use core::time::Duration;
use std::sync::Arc;
use url::Url;

const LOG_TARGET: &str = "    client";

/// How a request authenticates against Artifactory.
#[derive(Debug, Clone, Default)]
pub enum Credentials {
    /// No authentication; only works against anonymously readable instances.
    #[default]
    Anonymous,

    /// HTTP basic authentication.
    Basic {
        username: String,
        password: Option<String>,
    },

    /// Bearer token authentication using an Artifactory access token.
    Token(String),
}

/// A thin wrapper around [`reqwest::Client`] bound to one Artifactory
/// instance.
#[derive(Debug, Clone)]
pub struct Client {
    http: Arc<reqwest::Client>,
    base_url: Url,
    credentials: Credentials,
}

impl Client {
    /// Create a client for the Artifactory instance at `base_url`.
    ///
    /// `ssl_verify = false` disables certificate validation for instances
    /// running with self-signed certificates. `timeout` bounds every request
    /// issued through this client, including connection setup.
    pub fn new(base_url: Url, credentials: Credentials, ssl_verify: bool, timeout: Duration) -> Result<Self> {
        // Url::join treats a path without a trailing slash as a file and
        // would drop the last segment, so normalize here.
        let base_url = if base_url.path().ends_with('/') {
            base_url
        } else {
            let mut url = base_url;
            url.set_path(&format!("{}/", url.path()));
            url
        };

        let http = reqwest::Client::builder()
            .user_agent(concat!("artifactory-exporter/", env!("CARGO_PKG_VERSION")))
            .danger_accept_invalid_certs(!ssl_verify)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http: Arc::new(http),
            base_url,
            credentials,
        })
    }

    /// Fetch `path` relative to the base URI and return the raw response body.
    ///
    /// Any network failure or non-success status is a transport-level error;
    /// interpretation of the body is left entirely to the caller.
    pub async fn fetch(&self, path: &str) -> Result<Bytes> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| Error::Config(format!("cannot resolve '{path}' against '{}': {e}", self.base_url)))?;

        log::debug!(target: LOG_TARGET, "Fetching {url}");

        let request = self.http.get(url.clone());
        let request = match &self.credentials {
            Credentials::Anonymous => request,
            Credentials::Basic { username, password } => request.basic_auth(username, password.as_deref()),
            Credentials::Token(token) => request.bearer_auth(token),
        };

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                status,
                url: url.to_string(),
            });
        }

        Ok(response.bytes().await?)
    }
}
