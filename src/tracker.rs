use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::db::HistoryStore;
use crate::detector;
use crate::error::Result;
use crate::fetcher::PageFetcher;
use crate::notifier::{format_event, Notifier};
use crate::parser::{self, ProductSnapshot};
use crate::types::{DetectionPolicy, ObservationRecord, PriceEvent};

/// Drives the poll cadence for one product page: fetch → parse → query →
/// detect → persist → notify → sleep. Collaborators are injected at
/// construction; the loop owns them for the process lifetime.
///
/// Strictly sequential: one in-flight cycle at a time, and a fixed delay is
/// applied after each cycle completes, so the actual cadence drifts by the
/// cycle duration.
pub struct PriceTracker<F, S, N> {
    fetcher: F,
    store: S,
    notifier: N,
    policy: DetectionPolicy,
    poll_interval: Duration,
    shutdown: watch::Receiver<bool>,
    /// Wall clock may step backwards; capture times are clamped against the
    /// previous stamp so per-product order stays non-decreasing.
    last_captured_at: Option<DateTime<Utc>>,
}

impl<F, S, N> PriceTracker<F, S, N>
where
    F: PageFetcher,
    S: HistoryStore,
    N: Notifier,
{
    pub fn new(
        fetcher: F,
        store: S,
        notifier: N,
        policy: DetectionPolicy,
        poll_interval: Duration,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            fetcher,
            store,
            notifier,
            policy,
            poll_interval,
            shutdown,
            last_captured_at: None,
        }
    }

    /// Runs until the shutdown signal fires. Cycle-scoped failures are
    /// logged and the loop continues on the next tick; only shutdown ends
    /// the loop.
    pub async fn run(mut self) {
        info!(
            policy = %self.policy,
            interval_secs = self.poll_interval.as_secs(),
            "tracker started",
        );

        loop {
            if *self.shutdown.borrow() {
                break;
            }

            if let Err(e) = self.cycle().await {
                error!("poll cycle failed: {e}");
            }

            tokio::select! {
                _ = tokio::time::sleep(self.poll_interval) => {}
                _ = self.shutdown.changed() => break,
            }
        }

        info!("tracker stopped");
    }

    /// One full poll cycle. Persist happens before notify; a delivery
    /// failure is logged at warn and never fails the cycle.
    async fn cycle(&mut self) -> Result<PriceEvent> {
        let html = self.fetcher.fetch().await?;
        let snapshot = parser::parse_product_page(&html)?;
        let record = self.stamp(snapshot);

        let context = match self.policy {
            DetectionPolicy::Latest => self.store.latest(&record.product_name).await?,
            DetectionPolicy::Maximum => self.store.extreme_max(&record.product_name).await?,
        };
        let event = detector::detect(self.policy, &record, context.as_ref());

        self.store.append(&record).await?;

        if let Some(text) = format_event(&record.product_name, &event) {
            if let Err(e) = self.notifier.send(&text).await {
                warn!("notification delivery failed: {e}");
            }
        }

        info!(
            product = %record.product_name,
            price = record.new_price,
            event = %event,
            "cycle complete",
        );

        Ok(event)
    }

    fn stamp(&mut self, snapshot: ProductSnapshot) -> ObservationRecord {
        let mut captured_at = Utc::now();
        if let Some(last) = self.last_captured_at {
            if captured_at < last {
                captured_at = last;
            }
        }
        self.last_captured_at = Some(captured_at);

        ObservationRecord {
            product_name: snapshot.product_name,
            old_price: snapshot.old_price,
            new_price: snapshot.new_price,
            installment_price: snapshot.installment_price,
            captured_at,
        }
    }
}
