//! Read-only interface to the brief store: a directory where one YAML file is
//! one campaign. The watch loop only ever lists and reads here; external
//! tooling owns the files.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use briefwatch_core::{BriefError, CampaignBrief};

use crate::StoreError;

/// A brief file as seen by one listing pass.
#[derive(Debug, Clone)]
pub struct BriefEntry {
    pub campaign_id: String,
    pub path: PathBuf,
    pub modified: SystemTime,
}

/// List all brief files in `dir`, sorted by campaign id.
///
/// The campaign id is the file stem; only `.yaml`/`.yml` files count. Files
/// that vanish mid-scan are skipped — the store tolerates concurrent writers.
/// The whole listing is bounded by `timeout_secs`.
///
/// # Errors
///
/// Returns [`StoreError::Unavailable`] when the directory cannot be read and
/// [`StoreError::Timeout`] when the scan exceeds the bound.
pub async fn list_briefs(dir: &Path, timeout_secs: u64) -> Result<Vec<BriefEntry>, StoreError> {
    with_timeout(dir, timeout_secs, scan_dir(dir)).await
}

/// Read and parse one brief file into a validated [`CampaignBrief`].
///
/// # Errors
///
/// Returns [`StoreError::Unavailable`]/[`StoreError::Timeout`] for I/O
/// trouble, [`StoreError::Parse`] when the YAML does not deserialize, and
/// [`StoreError::InvalidBrief`] when it deserializes but violates a domain
/// rule.
pub async fn read_brief(
    entry: &BriefEntry,
    default_min_variants: u32,
    timeout_secs: u64,
) -> Result<CampaignBrief, StoreError> {
    with_timeout(
        &entry.path,
        timeout_secs,
        read_inner(entry, default_min_variants),
    )
    .await
}

/// Bound a store operation; on timeout the store is treated as transiently
/// unavailable for this cycle rather than failing the process.
pub(crate) async fn with_timeout<T, F>(
    path: &Path,
    timeout_secs: u64,
    operation: F,
) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    match tokio::time::timeout(Duration::from_secs(timeout_secs), operation).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Timeout {
            path: path.display().to_string(),
            timeout_secs,
        }),
    }
}

async fn scan_dir(dir: &Path) -> Result<Vec<BriefEntry>, StoreError> {
    let unavailable = |source: std::io::Error| StoreError::Unavailable {
        path: dir.display().to_string(),
        source,
    };

    let mut read_dir = tokio::fs::read_dir(dir).await.map_err(unavailable)?;
    let mut entries = Vec::new();

    while let Some(entry) = read_dir.next_entry().await.map_err(unavailable)? {
        let path = entry.path();
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if !matches!(ext, "yaml" | "yml") {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let metadata = match entry.metadata().await {
            Ok(m) => m,
            Err(e) => {
                // The file may have been removed between listing and stat.
                tracing::warn!(path = %path.display(), error = %e, "brief store: skipping unreadable entry");
                continue;
            }
        };
        if !metadata.is_file() {
            continue;
        }
        let Ok(modified) = metadata.modified() else {
            tracing::warn!(path = %path.display(), "brief store: no modification time; skipping");
            continue;
        };
        entries.push(BriefEntry {
            campaign_id: stem.to_string(),
            path,
            modified,
        });
    }

    entries.sort_by(|a, b| a.campaign_id.cmp(&b.campaign_id));
    entries.dedup_by(|curr, prev| {
        if curr.campaign_id == prev.campaign_id {
            tracing::warn!(
                campaign = %curr.campaign_id,
                path = %curr.path.display(),
                "brief store: duplicate brief file for campaign; ignoring"
            );
            true
        } else {
            false
        }
    });
    Ok(entries)
}

async fn read_inner(
    entry: &BriefEntry,
    default_min_variants: u32,
) -> Result<CampaignBrief, StoreError> {
    let path = entry.path.display().to_string();
    let content = tokio::fs::read_to_string(&entry.path)
        .await
        .map_err(|source| StoreError::Unavailable {
            path: path.clone(),
            source,
        })?;

    briefwatch_core::parse_brief(&content, &entry.campaign_id, default_min_variants).map_err(
        |e| match e {
            BriefError::Yaml(source) => StoreError::Parse { path, source },
            BriefError::Validation(reason) => StoreError::InvalidBrief { path, reason },
        },
    )
}

#[cfg(test)]
#[path = "brief_store_test.rs"]
mod tests;
