use serde::{Deserialize, Serialize};

/// Outcome of one sufficiency evaluation of a campaign.
///
/// Computed fresh on every pass; persisted only in logs and the audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SufficiencyVerdict {
    pub campaign_id: String,
    pub is_sufficient: bool,
    /// Distinct (product, aspect ratio, region) triples observed in the asset store.
    pub observed_count: usize,
    /// Products × aspect ratios × regions required by the brief.
    pub expected_count: usize,
    /// One entry per missing triple, in a stable order: products as authored,
    /// then aspect ratios, then regions.
    pub reasons: Vec<String>,
}

impl SufficiencyVerdict {
    #[must_use]
    pub fn missing_count(&self) -> usize {
        self.reasons.len()
    }
}
