//! The storage scrape pipeline: fetch, extract, and emit.

use super::storage_info::{FileStoreSummary, RepositoryEntry, StorageInfo};
use super::units::{parse_byte_size, parse_numeric};
use crate::Result;
use crate::client::Client;
use crate::error::Error;
use crate::metrics::{MetricKind, MetricSink, Observation};
use prometheus::IntCounter;

const LOG_TARGET: &str = "   storage";

/// Resource path of the storage-management endpoint, relative to the
/// configured base URI.
const STORAGE_INFO_PATH: &str = "api/storageinfo";

/// The aggregate pseudo-repository row present in the repository list.
const TOTAL_ROW: &str = "TOTAL";

/// One normalized, non-aggregate repository row. Constructed fresh each
/// scrape and discarded after emission.
#[derive(Debug, Clone, PartialEq)]
pub struct RepoSummary {
    pub name: String,
    pub repo_type: String,
    pub package_type: String,
    pub folders_count: f64,
    pub files_count: f64,
    pub items_count: f64,
    pub used_space: f64,
    pub percentage: f64,
}

impl RepoSummary {
    /// The five gauge values emitted for every repository.
    fn observations(&self) -> [(MetricKind, f64); 5] {
        [
            (MetricKind::RepoUsedSpace, self.used_space),
            (MetricKind::RepoFolderCount, self.folders_count),
            (MetricKind::RepoItemCount, self.items_count),
            (MetricKind::RepoFileCount, self.files_count),
            (MetricKind::RepoPercentage, self.percentage),
        ]
    }

    fn labels(&self) -> [String; 3] {
        [self.name.clone(), self.repo_type.clone(), self.package_type.clone()]
    }
}

/// Scrapes the Artifactory storage endpoint and turns the response into
/// gauge observations.
///
/// The collector holds no mutable state of its own; `failures` is the shared
/// parse-failure counter handle, safe under concurrent scrapes.
#[derive(Debug, Clone)]
pub struct StorageCollector {
    client: Client,
    failures: IntCounter,
}

impl StorageCollector {
    #[must_use]
    pub const fn new(client: Client, failures: IntCounter) -> Self {
        Self { client, failures }
    }

    /// Run one full scrape cycle, writing every successfully derived gauge
    /// into `sink`.
    ///
    /// Fetch and deserialize failures abort the scrape. Once the document is
    /// decoded, individual malformed scalar fields only cost their own metric
    /// (plus a counter increment when the field is empty), and a malformed
    /// repository row drops the whole repository list while leaving the
    /// already-emitted scalars intact.
    pub async fn collect(&self, sink: &mut impl MetricSink) -> Result<()> {
        let summary = self.fetch_storage_info().await?.summary();

        let binaries = &summary.binaries_summary;
        self.export_count(MetricKind::BinariesCount, &binaries.binaries_count, sink);
        self.export_size(MetricKind::BinariesSize, &binaries.binaries_size, sink);
        self.export_count(MetricKind::ArtifactsCount, &binaries.artifacts_count, sink);
        self.export_size(MetricKind::ArtifactsSize, &binaries.artifacts_size, sink);
        self.export_count(MetricKind::ItemsCount, &binaries.items_count, sink);
        self.export_count(MetricKind::Optimization, &binaries.optimization, sink);

        let filestore = &summary.file_store_summary;
        self.export_filestore(MetricKind::FilestoreTotal, &filestore.total_space, filestore, sink);
        self.export_filestore(MetricKind::FilestoreUsed, &filestore.used_space, filestore, sink);
        self.export_filestore(MetricKind::FilestoreFree, &filestore.free_space, filestore, sink);

        let summaries = self.build_summaries(&summary.repositories_summary_list);
        Self::export_repositories(&summaries, sink);

        Ok(())
    }

    /// Fetch the storage-info resource and deserialize it.
    ///
    /// Transport failures propagate unchanged; a body that fails to decode
    /// bumps the parse-failure counter.
    pub async fn fetch_storage_info(&self) -> Result<StorageInfo> {
        let body = self.client.fetch(STORAGE_INFO_PATH).await?;

        match serde_json::from_slice(&body) {
            Ok(info) => Ok(info),
            Err(e) => {
                self.failures.inc();
                Err(Error::Deserialize(e))
            }
        }
    }

    /// Emit one unlabeled gauge from a plain-number display string.
    ///
    /// An empty field bumps the failure counter and emits nothing; a
    /// non-empty field that fails to parse is silently skipped.
    fn export_count(&self, kind: MetricKind, raw: &str, sink: &mut impl MetricSink) {
        if raw.is_empty() {
            self.failures.inc();
            return;
        }
        if let Ok(value) = parse_numeric(raw) {
            sink.write(Observation::unlabeled(kind, value));
        }
    }

    /// Emit one unlabeled gauge from a byte-size display string. Same
    /// empty-field and skip policy as [`Self::export_count`].
    fn export_size(&self, kind: MetricKind, raw: &str, sink: &mut impl MetricSink) {
        if raw.is_empty() {
            self.failures.inc();
            return;
        }
        if let Ok(value) = parse_byte_size(raw) {
            sink.write(Observation::unlabeled(kind, value));
        }
    }

    /// Emit one filestore gauge labeled with the storage type and directory.
    fn export_filestore(
        &self,
        kind: MetricKind,
        raw: &str,
        filestore: &FileStoreSummary,
        sink: &mut impl MetricSink,
    ) {
        if raw.is_empty() {
            self.failures.inc();
            return;
        }
        if let Ok(value) = parse_byte_size(raw) {
            sink.write(Observation::labeled(
                kind,
                value,
                [filestore.storage_type.clone(), filestore.storage_directory.clone()],
            ));
        }
    }

    /// Normalize the per-repository rows, skipping the `TOTAL` aggregate and
    /// preserving source order.
    ///
    /// A used-space or percentage value that fails to parse aborts the whole
    /// list: the counter is bumped once and no records are returned. Partial
    /// repository data would be indistinguishable from repositories having
    /// been deleted, so none is better than some.
    pub fn build_summaries(&self, repositories: &[RepositoryEntry]) -> Vec<RepoSummary> {
        let mut summaries = Vec::with_capacity(repositories.len());

        for repo in repositories {
            if repo.repo_key == TOTAL_ROW {
                continue;
            }

            let used_space = match parse_byte_size(&repo.used_space) {
                Ok(value) => value,
                Err(e) => {
                    log::debug!(target: LOG_TARGET, "Bad usedSpace for repo '{}': {e}", repo.repo_key);
                    self.failures.inc();
                    return Vec::new();
                }
            };

            let percentage = match parse_numeric(&repo.percentage) {
                Ok(value) => value,
                Err(e) => {
                    log::debug!(target: LOG_TARGET, "Bad percentage for repo '{}': {e}", repo.repo_key);
                    self.failures.inc();
                    return Vec::new();
                }
            };

            summaries.push(RepoSummary {
                name: repo.repo_key.clone(),
                repo_type: repo.repo_type.to_lowercase(),
                package_type: repo.package_type.to_lowercase(),
                folders_count: repo.folders_count as f64,
                files_count: repo.files_count as f64,
                items_count: repo.items_count as f64,
                used_space,
                percentage,
            });
        }

        summaries
    }

    /// Write the five per-repository gauges for every summary, labeled with
    /// (name, type, package type).
    pub fn export_repositories(summaries: &[RepoSummary], sink: &mut impl MetricSink) {
        for summary in summaries {
            for (kind, value) in summary.observations() {
                sink.write(Observation::labeled(kind, value, summary.labels()));
            }
        }
    }
}
