//! Error types shared across the exporter.

/// Errors produced while scraping and translating Artifactory storage data.
///
/// The variants are deliberately coarse: each one corresponds to a distinct
/// failure policy in the collection pipeline (abort the scrape, skip a single
/// metric, or abort the repository list).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The HTTP request to Artifactory failed. Propagated unchanged from the
    /// client; aborts the scrape.
    #[error("storage endpoint request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Artifactory answered with a non-success status code.
    #[error("unexpected status {status} from '{url}'")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    /// The response body was not valid JSON for the storage-info schema.
    /// Aborts the scrape and bumps the parse-failure counter.
    #[error("could not deserialize storage info: {0}")]
    Deserialize(#[from] serde_json::Error),

    /// A display string did not contain a parseable number once grouping
    /// punctuation was stripped.
    #[error("'{0}' does not contain a valid number")]
    Format(String),

    /// A size string carried none of the recognized byte-unit suffixes.
    #[error("could not convert '{0}' to bytes")]
    UnknownUnit(String),

    /// Invalid command-line or credential configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Metric registration or encoding failed.
    #[error(transparent)]
    Metrics(#[from] prometheus::Error),

    /// The scrape listener could not be set up.
    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}
