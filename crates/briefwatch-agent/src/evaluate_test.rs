use chrono::Utc;

use super::*;

fn brief(
    products: &[&str],
    ratios: &[&str],
    regions: &[&str],
    threshold: u32,
) -> CampaignBrief {
    CampaignBrief {
        campaign_id: "summer".to_string(),
        products: products.iter().map(ToString::to_string).collect(),
        target_regions: regions.iter().map(ToString::to_string).collect(),
        required_aspect_ratios: ratios.iter().map(ToString::to_string).collect(),
        min_variants_threshold: threshold,
    }
}

fn asset(product: &str, ratio: &str, region: &str) -> AssetRecord {
    AssetRecord {
        campaign_id: "summer".to_string(),
        product_id: product.to_string(),
        aspect_ratio: ratio.to_string(),
        region: region.to_string(),
        created_at: Utc::now(),
    }
}

#[test]
fn one_present_of_four_required_lists_three_missing() {
    // products A,B × ratios square,story × region US, threshold 4.
    let brief = brief(&["A", "B"], &["square", "story"], &["US"], 4);
    let assets = vec![asset("A", "square", "US")];

    let verdict = evaluate(&brief, &assets).unwrap();
    assert!(!verdict.is_sufficient);
    assert_eq!(verdict.observed_count, 1);
    assert_eq!(verdict.expected_count, 4);
    assert_eq!(
        verdict.reasons,
        vec![
            "A/story/US missing",
            "B/square/US missing",
            "B/story/US missing",
        ]
    );
}

#[test]
fn missing_reason_count_is_expected_minus_observed() {
    let brief = brief(&["a", "b", "c"], &["square"], &["US", "DE"], 1);
    let assets = vec![asset("a", "square", "US"), asset("b", "square", "DE")];

    let verdict = evaluate(&brief, &assets).unwrap();
    assert_eq!(verdict.expected_count, 6);
    assert_eq!(verdict.observed_count, 2);
    assert_eq!(verdict.reasons.len(), 4);
    assert!(!verdict.is_sufficient);
}

#[test]
fn fully_satisfied_brief_is_sufficient_with_no_reasons() {
    let brief = brief(&["a"], &["square", "story"], &["US"], 2);
    let assets = vec![asset("a", "square", "US"), asset("a", "story", "US")];

    let verdict = evaluate(&brief, &assets).unwrap();
    assert!(verdict.is_sufficient);
    assert_eq!(verdict.observed_count, 2);
    assert!(verdict.reasons.is_empty());
}

#[test]
fn evaluation_is_idempotent() {
    let brief = brief(&["b", "a"], &["square", "story"], &["US", "DE"], 1);
    let assets = vec![asset("a", "story", "DE")];

    let first = evaluate(&brief, &assets).unwrap();
    let second = evaluate(&brief, &assets).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.reasons, second.reasons);
}

#[test]
fn products_keep_authored_order_in_reasons() {
    let brief = brief(&["zeta", "alpha"], &["square"], &["US"], 1);
    let verdict = evaluate(&brief, &[]).unwrap();
    assert_eq!(
        verdict.reasons,
        vec!["zeta/square/US missing", "alpha/square/US missing"]
    );
}

#[test]
fn duplicate_triples_count_once() {
    let brief = brief(&["a"], &["square"], &["US"], 2);
    let assets = vec![asset("a", "square", "US"), asset("a", "square", "US")];

    let verdict = evaluate(&brief, &assets).unwrap();
    assert_eq!(verdict.observed_count, 1);
    assert!(!verdict.is_sufficient);
}

#[test]
fn threshold_binds_even_with_full_coverage() {
    let brief = brief(&["a"], &["square"], &["US"], 3);
    let assets = vec![asset("a", "square", "US")];

    let verdict = evaluate(&brief, &assets).unwrap();
    assert_eq!(verdict.observed_count, 1);
    assert_eq!(verdict.expected_count, 1);
    assert!(verdict.reasons.is_empty());
    assert!(!verdict.is_sufficient, "below min_variants_threshold");
}

#[test]
fn foreign_campaign_assets_are_ignored() {
    let brief = brief(&["a"], &["square"], &["US"], 1);
    let mut foreign = asset("a", "square", "US");
    foreign.campaign_id = "winter".to_string();

    let verdict = evaluate(&brief, &[foreign]).unwrap();
    assert_eq!(verdict.observed_count, 0);
    assert!(!verdict.is_sufficient);
}

#[test]
fn empty_products_is_invalid_brief() {
    let brief = brief(&[], &["square"], &["US"], 1);
    let err = evaluate(&brief, &[]).unwrap_err();
    assert!(
        matches!(err, EvalError::InvalidBrief { ref reason, .. } if reason.contains("products")),
        "got: {err:?}"
    );
}

#[test]
fn empty_ratios_is_invalid_brief() {
    let brief = brief(&["a"], &[], &["US"], 1);
    let err = evaluate(&brief, &[]).unwrap_err();
    assert!(
        matches!(err, EvalError::InvalidBrief { ref reason, .. } if reason.contains("aspect_ratios")),
        "got: {err:?}"
    );
}

#[test]
fn empty_regions_is_invalid_brief() {
    let brief = brief(&["a"], &["square"], &[], 1);
    let err = evaluate(&brief, &[]).unwrap_err();
    assert!(
        matches!(err, EvalError::InvalidBrief { ref reason, .. } if reason.contains("target_regions")),
        "got: {err:?}"
    );
}
