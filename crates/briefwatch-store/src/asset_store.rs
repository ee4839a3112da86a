//! Read-only interface to the asset store.
//!
//! Layout convention, agreed with the generation pipeline:
//! `<asset_dir>/<campaign_id>/<product_id>/<aspect_ratio>__<region>[__variant].<ext>`.
//! Anything after a second `__` in the file stem is a variant discriminator and
//! does not contribute to coverage identity. Files that do not follow the
//! convention are skipped with a debug log.

use std::path::Path;

use chrono::{DateTime, Utc};

use briefwatch_core::AssetRecord;

use crate::brief_store::with_timeout;
use crate::StoreError;

/// Scan the asset store for all assets belonging to `campaign_id`.
///
/// A missing campaign directory yields an empty listing — zero assets is a
/// normal insufficiency, not an error. Records written concurrently by the
/// generation pipeline are picked up this cycle or the next, never causing a
/// failure. The whole scan is bounded by `timeout_secs`.
///
/// # Errors
///
/// Returns [`StoreError::Unavailable`] when the asset root cannot be read and
/// [`StoreError::Timeout`] when the scan exceeds the bound.
pub async fn scan_assets(
    root: &Path,
    campaign_id: &str,
    timeout_secs: u64,
) -> Result<Vec<AssetRecord>, StoreError> {
    with_timeout(root, timeout_secs, scan_campaign(root, campaign_id)).await
}

async fn scan_campaign(root: &Path, campaign_id: &str) -> Result<Vec<AssetRecord>, StoreError> {
    if let Err(source) = tokio::fs::metadata(root).await {
        return Err(StoreError::Unavailable {
            path: root.display().to_string(),
            source,
        });
    }

    let campaign_dir = root.join(campaign_id);
    let mut products = match tokio::fs::read_dir(&campaign_dir).await {
        Ok(rd) => rd,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(StoreError::Unavailable {
                path: campaign_dir.display().to_string(),
                source,
            })
        }
    };

    let unavailable = |source: std::io::Error| StoreError::Unavailable {
        path: campaign_dir.display().to_string(),
        source,
    };

    let mut records = Vec::new();
    while let Some(product_entry) = products.next_entry().await.map_err(unavailable)? {
        let Ok(file_type) = product_entry.file_type().await else {
            continue;
        };
        if !file_type.is_dir() {
            tracing::debug!(
                path = %product_entry.path().display(),
                "asset store: stray file at campaign level; skipping"
            );
            continue;
        }
        let Some(product_id) = product_entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        scan_product(
            campaign_id,
            &product_id,
            &product_entry.path(),
            &mut records,
        )
        .await?;
    }

    records.sort_by(|a, b| a.triple().cmp(&b.triple()));
    Ok(records)
}

async fn scan_product(
    campaign_id: &str,
    product_id: &str,
    product_dir: &Path,
    records: &mut Vec<AssetRecord>,
) -> Result<(), StoreError> {
    let unavailable = |source: std::io::Error| StoreError::Unavailable {
        path: product_dir.display().to_string(),
        source,
    };

    let mut files = tokio::fs::read_dir(product_dir).await.map_err(unavailable)?;
    while let Some(file_entry) = files.next_entry().await.map_err(unavailable)? {
        let path = file_entry.path();
        let Ok(metadata) = file_entry.metadata().await else {
            continue;
        };
        if !metadata.is_file() {
            continue;
        }
        if path.extension().and_then(|e| e.to_str()).is_none() {
            tracing::debug!(path = %path.display(), "asset store: file without extension; skipping");
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let Some((aspect_ratio, region)) = parse_asset_stem(stem) else {
            tracing::debug!(
                path = %path.display(),
                "asset store: file name does not follow ratio__region convention; skipping"
            );
            continue;
        };
        let Ok(modified) = metadata.modified() else {
            continue;
        };
        records.push(AssetRecord {
            campaign_id: campaign_id.to_string(),
            product_id: product_id.to_string(),
            aspect_ratio,
            region,
            created_at: DateTime::<Utc>::from(modified),
        });
    }
    Ok(())
}

/// Split a file stem into `(aspect_ratio, region)` per the naming convention.
fn parse_asset_stem(stem: &str) -> Option<(String, String)> {
    let mut parts = stem.split("__");
    let ratio = parts.next()?;
    let region = parts.next()?;
    if ratio.is_empty() || region.is_empty() {
        return None;
    }
    Some((ratio.to_string(), region.to_string()))
}

#[cfg(test)]
#[path = "asset_store_test.rs"]
mod tests;
