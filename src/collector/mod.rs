//! The storage collection pipeline.
//!
//! One scrape runs `fetch → deserialize → normalize → emit`: the raw JSON
//! storage summary is fetched from Artifactory, display strings are converted
//! to numeric gauge values, and per-repository breakdowns are fanned out into
//! labeled series. Nothing is carried between scrapes except the shared
//! parse-failure counter.

mod storage;
mod storage_info;
mod units;

pub use storage::{RepoSummary, StorageCollector};
pub use storage_info::{BinariesSummary, FileStoreSummary, RepositoryEntry, StorageInfo, StorageSummary};
pub use units::{parse_byte_size, parse_numeric};
