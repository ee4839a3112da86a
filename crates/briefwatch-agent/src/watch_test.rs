use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use briefwatch_core::{AppConfig, Environment, SinkKind};

use crate::audit::AuditLog;
use crate::render::{Notification, NotificationKind};
use crate::test_sinks::RecordingSink;

use super::*;

struct Fixture {
    brief_dir: TempDir,
    asset_dir: TempDir,
    agent: Agent,
    delivered: Arc<Mutex<Vec<Notification>>>,
}

fn fixture() -> Fixture {
    fixture_with(|_| {})
}

fn fixture_with(tweak: impl FnOnce(&mut AppConfig)) -> Fixture {
    let brief_dir = TempDir::new().unwrap();
    let asset_dir = TempDir::new().unwrap();
    let mut config = AppConfig {
        env: Environment::Test,
        log_level: "debug".to_string(),
        brief_dir: brief_dir.path().to_path_buf(),
        asset_dir: asset_dir.path().to_path_buf(),
        interval_secs: 1,
        suppression_window_secs: 60,
        max_reasons_per_message: 5,
        default_min_variants: 1,
        store_timeout_secs: 5,
        sinks: vec![SinkKind::Console],
        alert_log_path: None,
        webhook_url: None,
        webhook_timeout_secs: 5,
        audit_log_path: brief_dir.path().join("audit.jsonl"),
    };
    tweak(&mut config);

    let (sink, delivered) = RecordingSink::new();
    let notifier = Notifier::new(
        vec![Box::new(sink)],
        AuditLog::new(config.audit_log_path.clone()),
        Duration::from_secs(config.suppression_window_secs),
    );
    let agent = Agent::new(Arc::new(config), notifier, WatchState::new());
    Fixture {
        brief_dir,
        asset_dir,
        agent,
        delivered,
    }
}

/// Brief requiring products a,b × ratios square,story × region US = 4 variants.
const TWO_PRODUCT_BRIEF: &str = "\
products: [a, b]
target_regions: [US]
required_aspect_ratios: [square, story]
min_variants_threshold: 4
";

fn write_brief(dir: &Path, id: &str, content: &str) {
    fs::write(dir.join(format!("{id}.yaml")), content).unwrap();
}

fn write_asset(root: &Path, campaign: &str, product: &str, file: &str) {
    let dir = root.join(campaign).join(product);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(file), b"").unwrap();
}

fn bump_mtime(path: &Path) {
    let file = fs::File::options().write(true).open(path).unwrap();
    file.set_modified(SystemTime::now() + Duration::from_secs(5))
        .unwrap();
}

fn kinds(delivered: &Arc<Mutex<Vec<Notification>>>) -> Vec<NotificationKind> {
    delivered.lock().unwrap().iter().map(|n| n.kind).collect()
}

#[tokio::test]
async fn insufficient_campaign_alerts_once_within_window() {
    let mut fx = fixture();
    write_brief(fx.brief_dir.path(), "summer", TWO_PRODUCT_BRIEF);
    write_asset(fx.asset_dir.path(), "summer", "a", "square__US.png");

    let summary = fx.agent.run_once().await.unwrap();
    assert_eq!(summary.evaluated, 1);
    assert_eq!(summary.insufficient, 1);
    assert_eq!(summary.verdicts[0].observed_count, 1);
    assert_eq!(summary.verdicts[0].expected_count, 4);

    // Unchanged state on the next pass: re-evaluated, but not re-alerted.
    let summary = fx.agent.run_once().await.unwrap();
    assert_eq!(summary.evaluated, 1);
    assert_eq!(summary.insufficient, 1);
    assert_eq!(kinds(&fx.delivered), vec![NotificationKind::Insufficient]);
}

#[tokio::test]
async fn malformed_brief_reports_once_until_changed() {
    let mut fx = fixture();
    write_brief(
        fx.brief_dir.path(),
        "broken",
        "target_regions: [US]\nrequired_aspect_ratios: [square]\n",
    );

    let summary = fx.agent.run_once().await.unwrap();
    assert_eq!(summary.needs_attention.len(), 1);
    assert_eq!(summary.needs_attention[0].0, "broken");
    assert_eq!(summary.insufficient, 0, "no insufficiency for a parse failure");
    assert_eq!(kinds(&fx.delivered), vec![NotificationKind::NeedsAttention]);

    // Unchanged file: excluded from evaluation, no repeat notification.
    let summary = fx.agent.run_once().await.unwrap();
    assert!(summary.needs_attention.is_empty());
    assert_eq!(fx.delivered.lock().unwrap().len(), 1);

    // Fixing the brief (mtime advances) brings the campaign back.
    write_brief(
        fx.brief_dir.path(),
        "broken",
        "products: [a]\ntarget_regions: [US]\nrequired_aspect_ratios: [square]\n",
    );
    bump_mtime(&fx.brief_dir.path().join("broken.yaml"));
    let summary = fx.agent.run_once().await.unwrap();
    assert_eq!(summary.evaluated, 1);
    assert_eq!(summary.insufficient, 1);
    assert_eq!(
        kinds(&fx.delivered),
        vec![
            NotificationKind::NeedsAttention,
            NotificationKind::Insufficient
        ]
    );
}

#[tokio::test]
async fn resolution_transition_emits_single_notice() {
    let mut fx = fixture();
    write_brief(
        fx.brief_dir.path(),
        "summer",
        "products: [a]\ntarget_regions: [US]\nrequired_aspect_ratios: [square, story]\n",
    );
    write_asset(fx.asset_dir.path(), "summer", "a", "square__US.png");

    let summary = fx.agent.run_once().await.unwrap();
    assert_eq!(summary.insufficient, 1);

    write_asset(fx.asset_dir.path(), "summer", "a", "story__US.png");
    let summary = fx.agent.run_once().await.unwrap();
    assert_eq!(summary.insufficient, 0);
    assert_eq!(summary.resolved, 1);

    // Steady-state sufficiency is silent.
    let summary = fx.agent.run_once().await.unwrap();
    assert_eq!(summary.resolved, 0);
    assert_eq!(
        kinds(&fx.delivered),
        vec![NotificationKind::Insufficient, NotificationKind::Resolved]
    );
}

#[tokio::test]
async fn sufficient_from_the_start_is_silent() {
    let mut fx = fixture();
    write_brief(
        fx.brief_dir.path(),
        "summer",
        "products: [a]\ntarget_regions: [US]\nrequired_aspect_ratios: [square]\n",
    );
    write_asset(fx.asset_dir.path(), "summer", "a", "square__US.png");

    let summary = fx.agent.run_once().await.unwrap();
    assert_eq!(summary.evaluated, 1);
    assert!(summary.all_sufficient());
    fx.agent.run_once().await.unwrap();
    assert!(fx.delivered.lock().unwrap().is_empty());
}

#[tokio::test]
async fn deleted_brief_is_pruned_from_state() {
    let mut fx = fixture();
    write_brief(fx.brief_dir.path(), "summer", TWO_PRODUCT_BRIEF);

    fx.agent.run_once().await.unwrap();
    assert_eq!(fx.agent.state().campaign_count(), 1);

    fs::remove_file(fx.brief_dir.path().join("summer.yaml")).unwrap();
    let summary = fx.agent.run_once().await.unwrap();
    assert_eq!(summary.campaigns_seen, 0);
    assert_eq!(fx.agent.state().campaign_count(), 0);
}

#[tokio::test]
async fn campaigns_are_processed_in_id_order() {
    let mut fx = fixture();
    write_brief(
        fx.brief_dir.path(),
        "zeta",
        "products: [a]\ntarget_regions: [US]\nrequired_aspect_ratios: [square]\n",
    );
    write_brief(
        fx.brief_dir.path(),
        "alpha",
        "products: [a]\ntarget_regions: [US]\nrequired_aspect_ratios: [square]\n",
    );

    let summary = fx.agent.run_once().await.unwrap();
    let ids: Vec<&str> = summary
        .verdicts
        .iter()
        .map(|v| v.campaign_id.as_str())
        .collect();
    assert_eq!(ids, vec!["alpha", "zeta"]);
}

#[tokio::test]
async fn missing_brief_dir_is_store_error() {
    let mut fx = fixture_with(|config| {
        config.brief_dir = config.brief_dir.join("does-not-exist");
    });
    let err = fx.agent.run_once().await.unwrap_err();
    assert!(matches!(err, StoreError::Unavailable { .. }), "got: {err:?}");
}

#[tokio::test]
async fn unavailable_asset_store_skips_campaign_without_alerting() {
    let mut fx = fixture_with(|config| {
        config.asset_dir = config.asset_dir.join("does-not-exist");
    });
    write_brief(fx.brief_dir.path(), "summer", TWO_PRODUCT_BRIEF);

    let summary = fx.agent.run_once().await.unwrap();
    assert_eq!(summary.skipped_unavailable, 1);
    assert_eq!(summary.evaluated, 0);
    assert!(fx.delivered.lock().unwrap().is_empty());
    // Not recorded as seen: the campaign is retried from scratch next cycle.
    assert_eq!(fx.agent.state().campaign_count(), 0);
}

#[tokio::test]
async fn default_threshold_applies_when_brief_omits_it() {
    let mut fx = fixture_with(|config| {
        config.default_min_variants = 2;
    });
    write_brief(
        fx.brief_dir.path(),
        "summer",
        "products: [a]\ntarget_regions: [US]\nrequired_aspect_ratios: [square]\n",
    );
    write_asset(fx.asset_dir.path(), "summer", "a", "square__US.png");

    // Full coverage (1 of 1) but below the configured default threshold of 2.
    let summary = fx.agent.run_once().await.unwrap();
    assert_eq!(summary.insufficient, 1);
}
