use crate::changes::parse_changes;
use crate::notify::{render_message, Notifier};
use crate::source::ChangeSource;
use crate::status::StatusLine;
use crate::watermark::WatermarkStore;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone)]
pub struct PollerConfig {
    pub interval: Duration,
    pub delivery_pause: Duration,
    pub max_changes: u32,
    pub signature: bool,
}

impl From<&crate::config::Config> for PollerConfig {
    fn from(config: &crate::config::Config) -> Self {
        Self {
            interval: config.poll.interval,
            delivery_pause: config.poll.delivery_pause,
            max_changes: config.poll.max_changes,
            signature: config.poll.signature,
        }
    }
}

/// What one poll cycle did. Every variant is terminal to its cycle only; the
/// loop never propagates an error across a cycle boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Nothing new upstream.
    Idle,
    /// A batch was parsed and delivery was attempted for every change.
    Delivered {
        delivered: usize,
        failed: usize,
        watermark: u64,
    },
    /// Shutdown flipped mid-batch: remaining deliveries were abandoned and
    /// the watermark was left untouched, so a restart re-delivers them.
    Interrupted { delivered: usize, failed: usize },
    /// The upstream invocation failed; treated like an empty batch.
    SourceFailed,
    /// A malformed header aborted the batch; the watermark did not move.
    ParseFailed,
}

/// Ties watermark, source, parser and notifier together on a timer.
///
/// One cycle runs to completion before the next begins; the watermark file
/// is the only shared state and this task is its only writer.
pub struct Poller<S: ChangeSource, N: Notifier> {
    source: S,
    notifier: N,
    store: WatermarkStore,
    config: PollerConfig,
}

impl<S: ChangeSource, N: Notifier> Poller<S, N> {
    pub fn new(source: S, notifier: N, store: WatermarkStore, config: PollerConfig) -> Self {
        Self {
            source,
            notifier,
            store,
            config,
        }
    }

    /// Runs poll cycles forever, pausing `interval` between them, until the
    /// shutdown flag flips. Shutdown is also honored between deliveries
    /// inside a batch so a stop request is never stuck behind a long batch.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let status = StatusLine::new();
        let mut tick = 0usize;

        info!(
            watermark = self.store.read(),
            interval_ms = self.config.interval.as_millis() as u64,
            "Poller started"
        );

        loop {
            let outcome = self.poll_once(&shutdown).await;
            debug!(?outcome, "Cycle complete");

            tick = (tick % 3) + 1;
            status.set_status(&format!("p4relay running{}", ".".repeat(tick)));

            tokio::select! {
                _ = sleep(self.config.interval) => {}
                changed = shutdown.changed() => {
                    // A closed channel means the controlling task is gone;
                    // stop rather than spinning on the dead receiver.
                    if changed.is_err() {
                        info!("Shutdown channel closed, poller stopping");
                        return;
                    }
                }
            }
            if *shutdown.borrow() {
                info!("Shutdown requested, poller stopping");
                return;
            }
        }
    }

    /// One fetch → parse → deliver → persist cycle.
    pub async fn poll_once(&self, shutdown: &watch::Receiver<bool>) -> CycleOutcome {
        let watermark = self.store.read();

        let raw = match self
            .source
            .fetch(watermark, self.config.max_changes)
            .await
        {
            Ok(raw) => raw,
            Err(e) => {
                // Not the same as "no changes", but handled the same way so
                // a flaky server cannot take the loop down.
                warn!(error = %e, watermark, "Upstream fetch failed, skipping cycle");
                return CycleOutcome::SourceFailed;
            }
        };

        if raw.is_empty() {
            return CycleOutcome::Idle;
        }

        let batch = match parse_changes(&raw) {
            Ok(batch) => batch,
            Err(e) => {
                // No partial advance: delivering a valid prefix and moving
                // the watermark could permanently skip the malformed entry's
                // neighbors.
                error!(error = %e, watermark, "Batch rejected, watermark unchanged");
                return CycleOutcome::ParseFailed;
            }
        };

        let Some(newest) = batch.newest else {
            return CycleOutcome::Idle;
        };

        info!(
            count = batch.changes.len(),
            newest, "New changes detected"
        );

        let mut delivered = 0usize;
        let mut failed = 0usize;
        let mut abandoned = false;

        // Upstream emits newest first; chat history should read oldest
        // first. Batches are small and bounded, so buffer-and-reverse.
        for (i, change) in batch.changes.iter().rev().enumerate() {
            if *shutdown.borrow() {
                info!("Shutdown requested mid-batch, abandoning remaining deliveries");
                abandoned = true;
                break;
            }
            if i > 0 {
                sleep(self.config.delivery_pause).await;
            }

            let message = render_message(change, self.config.signature);
            match self.notifier.deliver(&message).await {
                Ok(()) => {
                    debug!(number = change.number, "Notification sent");
                    delivered += 1;
                }
                Err(e) => {
                    // One failed message must not block the rest of the
                    // batch; chat is not the system of record.
                    warn!(number = change.number, error = %e, "Delivery failed");
                    failed += 1;
                }
            }
        }

        // A batch cut short by shutdown has not had every delivery
        // attempted; leave the watermark so the restart picks it back up.
        if abandoned {
            info!(newest, "Watermark not advanced for interrupted batch");
            return CycleOutcome::Interrupted { delivered, failed };
        }

        // The watermark tracks what was parsed, not what was delivered;
        // advancing it here bounds re-delivery instead of retrying forever.
        if let Err(e) = self.store.write(newest) {
            error!(
                error = %e,
                newest,
                "WATERMARK NOT PERSISTED; this batch will be re-fetched and re-delivered next cycle"
            );
        }

        CycleOutcome::Delivered {
            delivered,
            failed,
            watermark: newest,
        }
    }
}
