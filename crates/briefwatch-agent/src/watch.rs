//! The watch loop: periodic discovery and evaluation of campaigns.
//!
//! One agent task owns [`WatchState`] and the notifier's deduplication cache;
//! polling ticks and external change triggers merge into a single evaluation
//! queue, so no campaign is ever evaluated by two passes at once.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use tokio::sync::{mpsc, watch};
use uuid::Uuid;

use briefwatch_core::{AppConfig, SufficiencyVerdict};
use briefwatch_store::{BriefEntry, StoreError};

use crate::evaluate::evaluate;
use crate::notify::Notifier;
use crate::render;

#[derive(Debug, Clone)]
struct CampaignStatus {
    modified: SystemTime,
    /// The brief was rejected at this modification time; skip it until the
    /// file changes.
    rejected: bool,
    last_sufficient: Option<bool>,
}

/// Per-process memory of what the loop has seen.
///
/// Owned by the agent and mutated only between campaign evaluations, never
/// mid-campaign. Emptied only on process restart — a restart re-evaluates
/// every campaign currently in the brief store.
#[derive(Debug, Default)]
pub struct WatchState {
    campaigns: BTreeMap<String, CampaignStatus>,
}

impl WatchState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn campaign_count(&self) -> usize {
        self.campaigns.len()
    }

    /// Drop state for campaigns whose brief file is gone, so a re-created
    /// file is treated as new.
    fn prune(&mut self, live: &BTreeSet<String>) -> usize {
        let before = self.campaigns.len();
        self.campaigns.retain(|id, _| live.contains(id));
        before - self.campaigns.len()
    }
}

/// Counters and verdicts from one evaluation pass.
#[derive(Debug)]
pub struct PassSummary {
    pub run_id: Uuid,
    pub campaigns_seen: usize,
    pub evaluated: usize,
    pub insufficient: usize,
    pub resolved: usize,
    /// `(campaign_id, detail)` for briefs that could not be evaluated.
    pub needs_attention: Vec<(String, String)>,
    /// Campaigns skipped because a store was transiently unavailable.
    pub skipped_unavailable: usize,
    pub verdicts: Vec<SufficiencyVerdict>,
}

impl PassSummary {
    fn new(run_id: Uuid) -> Self {
        Self {
            run_id,
            campaigns_seen: 0,
            evaluated: 0,
            insufficient: 0,
            resolved: 0,
            needs_attention: Vec::new(),
            skipped_unavailable: 0,
            verdicts: Vec::new(),
        }
    }

    #[must_use]
    pub fn all_sufficient(&self) -> bool {
        self.insufficient == 0 && self.needs_attention.is_empty()
    }
}

/// The campaign monitoring agent: drives evaluation passes over the brief
/// store and hands verdicts to the notifier.
pub struct Agent {
    config: Arc<AppConfig>,
    notifier: Notifier,
    state: WatchState,
}

impl Agent {
    #[must_use]
    pub fn new(config: Arc<AppConfig>, notifier: Notifier, state: WatchState) -> Self {
        Self {
            config,
            notifier,
            state,
        }
    }

    #[must_use]
    pub fn state(&self) -> &WatchState {
        &self.state
    }

    /// Run one evaluation pass over every campaign in the brief store.
    ///
    /// Campaigns are processed in lexicographic id order so logs and fixtures
    /// are reproducible. Per-campaign trouble (unreadable brief, unavailable
    /// asset store) is contained to that campaign; only a failure to list the
    /// brief store itself surfaces as an error, and the caller retries on the
    /// next interval.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the brief store cannot be listed.
    pub async fn run_once(&mut self) -> Result<PassSummary, StoreError> {
        self.run_pass(None).await
    }

    async fn run_pass(
        &mut self,
        stop: Option<&watch::Receiver<bool>>,
    ) -> Result<PassSummary, StoreError> {
        let run_id = Uuid::new_v4();
        self.notifier.purge_expired();

        let entries = briefwatch_store::list_briefs(
            &self.config.brief_dir,
            self.config.store_timeout_secs,
        )
        .await?;

        let live: BTreeSet<String> = entries.iter().map(|e| e.campaign_id.clone()).collect();
        let pruned = self.state.prune(&live);
        if pruned > 0 {
            tracing::info!(pruned, "agent: campaigns removed from brief store");
        }

        let mut summary = PassSummary::new(run_id);
        summary.campaigns_seen = entries.len();

        for entry in &entries {
            if stop.is_some_and(|s| *s.borrow()) {
                tracing::info!(run_id = %run_id, "agent: stop requested; ending pass after current campaign");
                break;
            }
            self.process_campaign(run_id, entry, &mut summary).await;
        }

        tracing::info!(
            run_id = %run_id,
            campaigns = summary.campaigns_seen,
            evaluated = summary.evaluated,
            insufficient = summary.insufficient,
            resolved = summary.resolved,
            needs_attention = summary.needs_attention.len(),
            "agent: evaluation pass complete"
        );
        Ok(summary)
    }

    async fn process_campaign(
        &mut self,
        run_id: Uuid,
        entry: &BriefEntry,
        summary: &mut PassSummary,
    ) {
        let id = &entry.campaign_id;
        let previous = self.state.campaigns.get(id).cloned();
        let changed = previous
            .as_ref()
            .is_none_or(|s| entry.modified > s.modified);

        // A rejected brief is excluded until its file changes.
        if !changed && previous.as_ref().is_some_and(|s| s.rejected) {
            tracing::debug!(campaign = %id, "agent: brief still rejected; waiting for change");
            return;
        }

        let brief = match briefwatch_store::read_brief(
            entry,
            self.config.default_min_variants,
            self.config.store_timeout_secs,
        )
        .await
        {
            Ok(brief) => brief,
            Err(e) if e.is_brief_content_error() => {
                self.reject_brief(run_id, entry, &e.to_string(), &previous, summary)
                    .await;
                return;
            }
            Err(e) => {
                tracing::warn!(
                    campaign = %id,
                    error = %e,
                    "agent: brief unreadable; retrying next cycle"
                );
                summary.skipped_unavailable += 1;
                return;
            }
        };

        let assets = match briefwatch_store::scan_assets(
            &self.config.asset_dir,
            id,
            self.config.store_timeout_secs,
        )
        .await
        {
            Ok(assets) => assets,
            Err(e) => {
                tracing::warn!(
                    campaign = %id,
                    error = %e,
                    "agent: asset store unavailable; retrying next cycle"
                );
                summary.skipped_unavailable += 1;
                return;
            }
        };

        let verdict = match evaluate(&brief, &assets) {
            Ok(verdict) => verdict,
            Err(e) => {
                self.reject_brief(run_id, entry, &e.to_string(), &previous, summary)
                    .await;
                return;
            }
        };

        summary.evaluated += 1;
        let was_sufficient = previous.and_then(|s| s.last_sufficient);

        if verdict.is_sufficient {
            if was_sufficient == Some(false) {
                let notification = render::render_resolved(&verdict);
                self.notifier.notify(run_id, &notification).await;
                summary.resolved += 1;
                tracing::info!(campaign = %id, "agent: campaign recovered");
            }
        } else {
            summary.insufficient += 1;
            let notification =
                render::render_insufficient(&verdict, self.config.max_reasons_per_message);
            self.notifier.notify(run_id, &notification).await;
            tracing::info!(
                campaign = %id,
                observed = verdict.observed_count,
                expected = verdict.expected_count,
                missing = verdict.missing_count(),
                "agent: campaign below required coverage"
            );
        }

        self.state.campaigns.insert(
            id.clone(),
            CampaignStatus {
                modified: entry.modified,
                rejected: false,
                last_sufficient: Some(verdict.is_sufficient),
            },
        );
        summary.verdicts.push(verdict);
    }

    async fn reject_brief(
        &mut self,
        run_id: Uuid,
        entry: &BriefEntry,
        detail: &str,
        previous: &Option<CampaignStatus>,
        summary: &mut PassSummary,
    ) {
        let id = &entry.campaign_id;
        tracing::warn!(campaign = %id, detail, "agent: brief rejected");
        let notification = render::render_needs_attention(id, detail);
        self.notifier.notify(run_id, &notification).await;
        summary
            .needs_attention
            .push((id.clone(), detail.to_string()));
        self.state.campaigns.insert(
            id.clone(),
            CampaignStatus {
                modified: entry.modified,
                rejected: true,
                last_sufficient: previous.as_ref().and_then(|s| s.last_sufficient),
            },
        );
    }

    /// Drive the watch loop until `stop` turns true.
    ///
    /// Each iteration runs one pass, then waits for whichever comes first: the
    /// next polling tick, a change trigger, or the stop signal. Triggers give
    /// an immediate re-scan; polling is the liveness fallback, so every
    /// campaign in the brief store is evaluated at least once per interval
    /// even if triggers are never delivered. The in-flight campaign finishes
    /// before stop is honored.
    ///
    /// Returns the final state so a caller can inspect or reuse it.
    pub async fn run(
        mut self,
        mut stop: watch::Receiver<bool>,
        mut trigger: mpsc::Receiver<()>,
    ) -> WatchState {
        let interval = Duration::from_secs(self.config.interval_secs);
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        ticker.tick().await; // first tick completes immediately

        loop {
            if *stop.borrow() {
                break;
            }
            if let Err(e) = self.run_pass(Some(&stop)).await {
                tracing::warn!(error = %e, "agent: brief store unavailable; will retry next interval");
            }
            if *stop.borrow() {
                break;
            }
            tokio::select! {
                _ = ticker.tick() => {}
                Some(()) = trigger.recv() => {
                    // Coalesce a burst of triggers into one extra pass.
                    while trigger.try_recv().is_ok() {}
                    tracing::debug!("agent: change trigger received; evaluating now");
                }
                // A dropped stop sender must not spin the loop; Err disables the branch.
                Ok(()) = stop.changed() => {}
            }
        }

        tracing::info!("agent: watch loop stopped");
        self.state
    }
}

#[cfg(test)]
#[path = "watch_test.rs"]
mod tests;
