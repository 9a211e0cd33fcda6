// Analytics orchestration: fetch both alert sets, aggregate, publish.
// Each call gets a monotonically increasing sequence number; a result is
// published to the retained "current" slot only if no newer call was issued
// while it was in flight, so a late-arriving stale response never overwrites
// a newer one. On total fetch failure the retained result is left untouched.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::alert_repo::{AlertRepo, TotalFetchFailure};
use crate::analytics;
use crate::models::{AlertAnalytics, Period};

pub struct AnalyticsService {
    alert_repo: AlertRepo,
    issued: AtomicU64,
    current: RwLock<Option<CurrentAnalytics>>,
}

/// Last published result and the invocation that produced it.
#[derive(Debug, Clone)]
pub struct CurrentAnalytics {
    pub seq: u64,
    pub period: Period,
    pub analytics: AlertAnalytics,
}

impl AnalyticsService {
    pub fn new(alert_repo: AlertRepo) -> Self {
        Self {
            alert_repo,
            issued: AtomicU64::new(0),
            current: RwLock::new(None),
        }
    }

    /// Fetches both alert sets, aggregates for `period` at the current
    /// instant, and returns the fresh result. Suspends until both
    /// sub-fetches settle; partial failure degrades to the surviving set.
    pub async fn get_analytics(&self, period: Period) -> Result<AlertAnalytics, TotalFetchFailure> {
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;

        let batch = self.alert_repo.fetch_all().await?;
        if batch.skipped > 0 {
            warn!(
                skipped = batch.skipped,
                "dropped malformed alert records from the alert source"
            );
        }

        let analytics = analytics::aggregate(&batch.records, period, Utc::now());
        debug!(
            seq,
            period = period.as_str(),
            records = batch.records.len(),
            "alert analytics computed"
        );

        if self.issued.load(Ordering::SeqCst) == seq {
            let mut current = self.current.write().await;
            // Re-check under the lock; a concurrent call may have published.
            if current.as_ref().is_none_or(|c| c.seq < seq) {
                *current = Some(CurrentAnalytics {
                    seq,
                    period,
                    analytics: analytics.clone(),
                });
            }
        } else {
            debug!(seq, "discarding stale analytics response");
        }

        Ok(analytics)
    }

    /// Last successfully published result, if any. Survives failed refreshes
    /// so the caller can keep displaying it next to an error indicator.
    pub async fn current(&self) -> Option<CurrentAnalytics> {
        self.current.read().await.clone()
    }
}
