use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One generated creative file, identified by its (product, aspect ratio, region)
/// triple within a campaign. Never authored directly — derived by scanning the
/// asset store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub campaign_id: String,
    pub product_id: String,
    pub aspect_ratio: String,
    pub region: String,
    pub created_at: DateTime<Utc>,
}

impl AssetRecord {
    /// The coverage identity of this asset. Two files with the same triple count
    /// as one variant.
    #[must_use]
    pub fn triple(&self) -> (&str, &str, &str) {
        (&self.product_id, &self.aspect_ratio, &self.region)
    }
}
