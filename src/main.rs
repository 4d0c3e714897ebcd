//! A Prometheus exporter for JFrog Artifactory storage metrics.
//!
//! # Overview
//!
//! `artifactory-exporter` polls the Artifactory storage-management API
//! (`api/storageinfo`) and republishes the storage summary as Prometheus
//! gauges: aggregate binary/artifact counts and sizes, filestore capacity,
//! and a per-repository breakdown labeled with the repository name, type, and
//! package type. One scrape of the exporter performs one poll of Artifactory;
//! no state is kept between scrapes.
//!
//! # Quick Start
//!
//! ```bash
//! export ARTIFACTORY_USERNAME=admin
//! export ARTIFACTORY_PASSWORD=secret
//! artifactory-exporter --artifactory-url http://artifactory:8081/artifactory
//! ```
//!
//! Then point Prometheus at `http://<host>:9531/metrics`.
//!
//! # Authentication
//!
//! Either basic authentication (`--username` / `--password`) or an access
//! token (`--access-token`), never both. All credentials can be supplied
//! through the environment to keep them out of process listings.
//!
//! # TLS
//!
//! `--no-ssl-verify` disables certificate validation for instances running
//! with self-signed certificates.

use artifactory_exporter::client::{Client, Credentials};
use artifactory_exporter::collector::StorageCollector;
use artifactory_exporter::error::Error;
use artifactory_exporter::metrics::parse_failure_counter;
use artifactory_exporter::{Result, server};
use clap::{Parser, ValueEnum};
use core::net::SocketAddr;
use core::time::Duration;
use url::Url;

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    /// Only error messages
    Error,
    /// Warning and error messages
    Warn,
    /// Info, warning, and error messages
    Info,
    /// Debug and above messages
    Debug,
    /// All messages including trace
    Trace,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Base URL of the Artifactory instance
    #[arg(long, value_name = "URL", env = "ARTIFACTORY_URL")]
    artifactory_url: Url,

    /// User name for basic authentication
    #[arg(long, value_name = "NAME", env = "ARTIFACTORY_USERNAME")]
    username: Option<String>,

    /// Password for basic authentication
    #[arg(long, value_name = "PASSWORD", env = "ARTIFACTORY_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Artifactory access token, mutually exclusive with basic authentication
    #[arg(long, value_name = "TOKEN", env = "ARTIFACTORY_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    /// Skip TLS certificate verification
    #[arg(long)]
    no_ssl_verify: bool,

    /// Timeout for requests to Artifactory, in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = 5)]
    timeout: u64,

    /// Address for the exporter to listen on
    #[arg(long, value_name = "ADDR", default_value = "0.0.0.0:9531")]
    listen_address: SocketAddr,

    /// Path under which the metrics are served
    #[arg(long, value_name = "PATH", default_value = "/metrics")]
    metrics_path: String,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log_level: LogLevel,
}

impl Args {
    /// Turn the credential flags into a validated [`Credentials`] value.
    fn credentials(&self) -> Result<Credentials> {
        match (&self.username, &self.password, &self.access_token) {
            (Some(_), _, Some(_)) | (None, Some(_), Some(_)) => {
                Err(Error::Config("access token and basic authentication are mutually exclusive".into()))
            }
            (None, Some(_), None) => Err(Error::Config("a password requires a username".into())),
            (None, None, Some(token)) => Ok(Credentials::Token(token.clone())),
            (Some(username), password, None) => Ok(Credentials::Basic {
                username: username.clone(),
                password: password.clone(),
            }),
            (None, None, None) => Ok(Credentials::Anonymous),
        }
    }
}

/// Initialize logger based on log level
fn init_logging(log_level: LogLevel) {
    let level = match log_level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    };

    let env = env_logger::Env::default().filter_or("RUST_LOG", level);

    env_logger::Builder::from_env(env)
        .format_module_path(false)
        .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.log_level);

    if !args.metrics_path.starts_with('/') {
        return Err(Error::Config(format!("metrics path '{}' must start with '/'", args.metrics_path)));
    }

    let client = Client::new(
        args.artifactory_url.clone(),
        args.credentials()?,
        !args.no_ssl_verify,
        Duration::from_secs(args.timeout),
    )?;

    let failures = parse_failure_counter()?;
    let collector = StorageCollector::new(client, failures.clone());

    server::serve(args.listen_address, &args.metrics_path, collector, failures).await
}
