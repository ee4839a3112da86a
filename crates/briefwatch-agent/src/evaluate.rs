//! Sufficiency evaluation: a pure mapping from (brief, observed assets) to a
//! verdict. No I/O of its own — callers hand in whatever the stores returned.

use std::collections::HashSet;

use briefwatch_core::{AssetRecord, CampaignBrief, SufficiencyVerdict};

use crate::EvalError;

/// Evaluate a campaign's asset coverage against its brief.
///
/// `observed_count` is the number of distinct (product, aspect ratio, region)
/// triples in the listing; duplicate files for one triple count once. A
/// campaign is sufficient when the observed count reaches both the brief's
/// cross product and its minimum variant threshold.
///
/// `reasons` names every missing triple, products in authored order, then
/// aspect ratios, then regions — repeated evaluations of unchanged input
/// produce byte-identical output, which the notifier's deduplication relies
/// on.
///
/// # Errors
///
/// Returns [`EvalError::InvalidBrief`] when the brief has an empty product,
/// aspect-ratio, or region set. Store-side validation rejects those briefs
/// before they get here; the guard keeps the evaluator total on its own.
pub fn evaluate(
    brief: &CampaignBrief,
    assets: &[AssetRecord],
) -> Result<SufficiencyVerdict, EvalError> {
    let invalid = |reason: &str| EvalError::InvalidBrief {
        campaign_id: brief.campaign_id.clone(),
        reason: reason.to_string(),
    };
    if brief.products.is_empty() {
        return Err(invalid("products must not be empty"));
    }
    if brief.required_aspect_ratios.is_empty() {
        return Err(invalid("required_aspect_ratios must not be empty"));
    }
    if brief.target_regions.is_empty() {
        return Err(invalid("target_regions must not be empty"));
    }

    let observed: HashSet<(&str, &str, &str)> = assets
        .iter()
        .filter(|a| a.campaign_id == brief.campaign_id)
        .map(AssetRecord::triple)
        .collect();

    let expected_count = brief.expected_count();
    let observed_count = observed.len();

    let mut reasons = Vec::new();
    for product in &brief.products {
        for ratio in &brief.required_aspect_ratios {
            for region in &brief.target_regions {
                if !observed.contains(&(product.as_str(), ratio.as_str(), region.as_str())) {
                    reasons.push(format!("{product}/{ratio}/{region} missing"));
                }
            }
        }
    }

    let threshold = usize::try_from(brief.min_variants_threshold).unwrap_or(usize::MAX);
    let is_sufficient = observed_count >= expected_count && observed_count >= threshold;

    Ok(SufficiencyVerdict {
        campaign_id: brief.campaign_id.clone(),
        is_sufficient,
        observed_count,
        expected_count,
        reasons,
    })
}

#[cfg(test)]
#[path = "evaluate_test.rs"]
mod tests;
