//! Metric descriptors and the observation sink boundary.
//!
//! The collection pipeline never touches a Prometheus registry directly: it
//! produces [`Observation`] values and hands them to a [`MetricSink`]. The
//! [`registry`] module provides the sink used when serving scrapes; tests use
//! a plain `Vec<Observation>`.

mod registry;

pub use registry::{ScrapeMetrics, parse_failure_counter};

use strum::EnumIter;

/// Every gauge the storage collector can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter)]
pub enum MetricKind {
    BinariesCount,
    BinariesSize,
    ArtifactsCount,
    ArtifactsSize,
    ItemsCount,
    Optimization,
    FilestoreTotal,
    FilestoreUsed,
    FilestoreFree,
    RepoUsedSpace,
    RepoFolderCount,
    RepoFileCount,
    RepoItemCount,
    RepoPercentage,
}

/// Static description of one metric: its fully-qualified name, help text, and
/// label names. Supplied here rather than by the collector so that the
/// pipeline stays independent of naming conventions.
#[derive(Debug, Clone, Copy)]
pub struct Descriptor {
    pub name: &'static str,
    pub help: &'static str,
    pub labels: &'static [&'static str],
}

const FILESTORE_LABELS: &[&str] = &["storage_type", "storage_dir"];
const REPO_LABELS: &[&str] = &["name", "type", "package_type"];

impl MetricKind {
    /// The descriptor table for all storage metrics.
    #[must_use]
    pub const fn descriptor(self) -> Descriptor {
        match self {
            Self::BinariesCount => Descriptor {
                name: "artifactory_storage_binaries_count",
                help: "Total number of binaries stored in Artifactory.",
                labels: &[],
            },
            Self::BinariesSize => Descriptor {
                name: "artifactory_storage_binaries_size_bytes",
                help: "Total size of stored binaries in bytes.",
                labels: &[],
            },
            Self::ArtifactsCount => Descriptor {
                name: "artifactory_storage_artifacts_count",
                help: "Total number of artifacts stored in Artifactory.",
                labels: &[],
            },
            Self::ArtifactsSize => Descriptor {
                name: "artifactory_storage_artifacts_size_bytes",
                help: "Total size of stored artifacts in bytes.",
                labels: &[],
            },
            Self::ItemsCount => Descriptor {
                name: "artifactory_storage_items_count",
                help: "Total number of items stored in Artifactory.",
                labels: &[],
            },
            Self::Optimization => Descriptor {
                name: "artifactory_storage_optimization",
                help: "Storage optimization percentage.",
                labels: &[],
            },
            Self::FilestoreTotal => Descriptor {
                name: "artifactory_storage_filestore_bytes",
                help: "Total space of the Artifactory filestore in bytes.",
                labels: FILESTORE_LABELS,
            },
            Self::FilestoreUsed => Descriptor {
                name: "artifactory_storage_filestore_used_bytes",
                help: "Used space of the Artifactory filestore in bytes.",
                labels: FILESTORE_LABELS,
            },
            Self::FilestoreFree => Descriptor {
                name: "artifactory_storage_filestore_free_bytes",
                help: "Free space of the Artifactory filestore in bytes.",
                labels: FILESTORE_LABELS,
            },
            Self::RepoUsedSpace => Descriptor {
                name: "artifactory_storage_repo_used_bytes",
                help: "Used space of a repository in bytes.",
                labels: REPO_LABELS,
            },
            Self::RepoFolderCount => Descriptor {
                name: "artifactory_storage_repo_folder_count",
                help: "Number of folders in a repository.",
                labels: REPO_LABELS,
            },
            Self::RepoFileCount => Descriptor {
                name: "artifactory_storage_repo_files_count",
                help: "Number of files in a repository.",
                labels: REPO_LABELS,
            },
            Self::RepoItemCount => Descriptor {
                name: "artifactory_storage_repo_items_count",
                help: "Number of items in a repository.",
                labels: REPO_LABELS,
            },
            Self::RepoPercentage => Descriptor {
                name: "artifactory_storage_repo_percentage",
                help: "Percentage of total used space occupied by a repository.",
                labels: REPO_LABELS,
            },
        }
    }
}

/// One gauge sample bound for the metrics registry. Exists only long enough
/// to be handed to a sink.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub kind: MetricKind,
    pub value: f64,
    pub labels: Vec<String>,
}

impl Observation {
    /// An observation for a metric with no labels.
    #[must_use]
    pub const fn unlabeled(kind: MetricKind, value: f64) -> Self {
        Self {
            kind,
            value,
            labels: Vec::new(),
        }
    }

    /// An observation carrying label values matching the kind's descriptor.
    #[must_use]
    pub fn labeled(kind: MetricKind, value: f64, labels: impl IntoIterator<Item = String>) -> Self {
        Self {
            kind,
            value,
            labels: labels.into_iter().collect(),
        }
    }
}

/// Destination for gauge observations produced during a scrape.
pub trait MetricSink {
    fn write(&mut self, observation: Observation);
}

/// Collects observations into a vector; used by tests and anywhere the raw
/// samples are wanted before registry translation.
impl MetricSink for Vec<Observation> {
    fn write(&mut self, observation: Observation) {
        self.push(observation);
    }
}
