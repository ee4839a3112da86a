use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::BriefError;

/// A campaign's required creative outputs, parsed and validated from a brief file.
///
/// Immutable once built: a changed brief file produces a fresh parse and a fresh
/// evaluation pass, never an in-place mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignBrief {
    pub campaign_id: String,
    /// Ordered as authored; drives the outer loop of reason ordering.
    pub products: Vec<String>,
    /// Deduplicated and sorted at validation time.
    pub target_regions: Vec<String>,
    /// Deduplicated and sorted at validation time.
    pub required_aspect_ratios: Vec<String>,
    pub min_variants_threshold: u32,
}

impl CampaignBrief {
    /// Number of distinct (product, aspect ratio, region) variants the brief requires.
    #[must_use]
    pub fn expected_count(&self) -> usize {
        self.products.len() * self.required_aspect_ratios.len() * self.target_regions.len()
    }
}

/// On-disk shape of a brief file. Missing `products`, `target_regions`, or
/// `required_aspect_ratios` is a YAML-level parse failure.
#[derive(Debug, Deserialize)]
struct BriefFile {
    #[serde(default)]
    campaign_id: Option<String>,
    products: Vec<String>,
    target_regions: Vec<String>,
    required_aspect_ratios: Vec<String>,
    #[serde(default)]
    min_variants_threshold: Option<u32>,
}

/// Parse and validate a brief file's contents.
///
/// `file_id` is the campaign id derived from the file name (stem); a
/// `campaign_id` field inside the file must match it. When the brief omits
/// `min_variants_threshold`, `default_min_variants` is used.
///
/// # Errors
///
/// Returns [`BriefError::Yaml`] when the content does not deserialize, and
/// [`BriefError::Validation`] when it deserializes but violates a domain rule
/// (empty product list, invalid id, zero threshold, ...).
pub fn parse_brief(
    content: &str,
    file_id: &str,
    default_min_variants: u32,
) -> Result<CampaignBrief, BriefError> {
    let raw: BriefFile = serde_yaml::from_str(content)?;
    build_brief(raw, file_id, default_min_variants)
}

fn build_brief(
    raw: BriefFile,
    file_id: &str,
    default_min_variants: u32,
) -> Result<CampaignBrief, BriefError> {
    let campaign_id = match raw.campaign_id {
        Some(declared) => {
            if declared != file_id {
                return Err(BriefError::Validation(format!(
                    "campaign_id '{declared}' does not match brief file name '{file_id}'"
                )));
            }
            declared
        }
        None => file_id.to_string(),
    };

    if !is_valid_campaign_id(&campaign_id) {
        return Err(BriefError::Validation(format!(
            "campaign id '{campaign_id}' must be a non-empty slug of lowercase letters, digits, and dashes"
        )));
    }

    let products = validate_products(raw.products)?;
    let required_aspect_ratios = normalize_set("required_aspect_ratios", raw.required_aspect_ratios)?;
    let target_regions = normalize_set("target_regions", raw.target_regions)?;

    let min_variants_threshold = raw.min_variants_threshold.unwrap_or(default_min_variants);
    if min_variants_threshold == 0 {
        return Err(BriefError::Validation(
            "min_variants_threshold must be at least 1".to_string(),
        ));
    }

    Ok(CampaignBrief {
        campaign_id,
        products,
        target_regions,
        required_aspect_ratios,
        min_variants_threshold,
    })
}

/// Campaign ids are slugs: lowercase ASCII letters, digits, and interior dashes.
#[must_use]
pub fn is_valid_campaign_id(s: &str) -> bool {
    !s.is_empty()
        && !s.starts_with('-')
        && !s.ends_with('-')
        && s.chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Products keep their authored order; duplicates and empty entries are rejected.
fn validate_products(values: Vec<String>) -> Result<Vec<String>, BriefError> {
    let mut seen = HashSet::new();
    let mut products = Vec::with_capacity(values.len());
    for value in values {
        let value = value.trim().to_string();
        if value.is_empty() {
            return Err(BriefError::Validation(
                "products entries must be non-empty".to_string(),
            ));
        }
        if !seen.insert(value.clone()) {
            return Err(BriefError::Validation(format!(
                "duplicate product: '{value}'"
            )));
        }
        products.push(value);
    }
    if products.is_empty() {
        return Err(BriefError::Validation(
            "products must not be empty".to_string(),
        ));
    }
    Ok(products)
}

/// Set-valued fields: trim entries, reject empties, deduplicate, and sort so
/// repeated evaluations iterate in a stable order.
fn normalize_set(field: &str, values: Vec<String>) -> Result<Vec<String>, BriefError> {
    let mut out = Vec::with_capacity(values.len());
    for value in values {
        let value = value.trim().to_string();
        if value.is_empty() {
            return Err(BriefError::Validation(format!(
                "{field} entries must be non-empty"
            )));
        }
        out.push(value);
    }
    out.sort();
    out.dedup();
    if out.is_empty() {
        return Err(BriefError::Validation(format!("{field} must not be empty")));
    }
    Ok(out)
}
