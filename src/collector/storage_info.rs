//! Serde model of the Artifactory `api/storageinfo` document.
//!
//! Artifactory duplicates the summary sections: once nested under
//! `storageSummary` and once at the document root. Both shapes share one
//! schema here and both decode, but [`StorageInfo::summary`] normalizes to
//! the nested section, which is the one the product keeps current.
//!
//! Numeric quantities arrive as display strings. Absent fields decode to the
//! empty string rather than to zero, so a missing value surfaces downstream
//! as a parse failure instead of silently emitting `0`.

use serde::Deserialize;

/// Aggregate counts and sizes across all binaries.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinariesSummary {
    #[serde(default)]
    pub binaries_count: String,
    #[serde(default)]
    pub binaries_size: String,
    #[serde(default)]
    pub artifacts_size: String,
    #[serde(default)]
    pub optimization: String,
    #[serde(default)]
    pub items_count: String,
    #[serde(default)]
    pub artifacts_count: String,
}

/// Capacity of the backing filestore.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileStoreSummary {
    #[serde(default)]
    pub storage_type: String,
    #[serde(default)]
    pub storage_directory: String,
    #[serde(default)]
    pub total_space: String,
    #[serde(default)]
    pub used_space: String,
    #[serde(default)]
    pub free_space: String,
}

/// One row of the per-repository breakdown. The list also carries an
/// aggregate pseudo-repository whose `repoKey` is the literal `"TOTAL"`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryEntry {
    #[serde(default)]
    pub repo_key: String,
    #[serde(default)]
    pub repo_type: String,
    #[serde(default)]
    pub folders_count: i64,
    #[serde(default)]
    pub files_count: i64,
    #[serde(default)]
    pub used_space: String,
    #[serde(default)]
    pub items_count: i64,
    #[serde(default)]
    pub package_type: String,
    #[serde(default)]
    pub percentage: String,
}

/// The three summary sections of the storage-info document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageSummary {
    #[serde(default)]
    pub binaries_summary: BinariesSummary,
    #[serde(default)]
    pub file_store_summary: FileStoreSummary,
    #[serde(default)]
    pub repositories_summary_list: Vec<RepositoryEntry>,
}

/// The full storage-info response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageInfo {
    #[serde(default)]
    storage_summary: StorageSummary,

    // Legacy duplicates of the summary sections at the document root. They
    // must decode for compatibility but are superseded by storage_summary,
    // so nothing ever reads them.
    #[serde(default)]
    #[allow(dead_code)]
    binaries_summary: BinariesSummary,
    #[serde(default)]
    #[allow(dead_code)]
    file_store_summary: FileStoreSummary,
    #[serde(default)]
    #[allow(dead_code)]
    repositories_summary_list: Vec<RepositoryEntry>,
}

impl StorageInfo {
    /// The canonical summary: the nested `storageSummary` section.
    #[must_use]
    pub fn summary(self) -> StorageSummary {
        self.storage_summary
    }
}
