//! Jittered delivery scheduling.
//!
//! A two-state machine: `Idle`, or armed with one pending single-shot fire.
//! Each arm draws a fresh delay, fires once, and re-arms. Cancellation bumps
//! a generation counter, so a sleeping fire wakes, finds itself stale, and
//! exits without delivering; a fire that already passed its staleness check
//! runs to completion and only the re-arm is suppressed.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::generator::random_int;
use crate::service::InboxService;

/// A pending deadline this far in the past counts as a lost timer on
/// visibility resume.
const STALE_SLACK_MS: i64 = 1_000;

/// Jitter bounds for the delay between deliveries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerDelay {
    pub min_seconds: u64,
    pub max_seconds: u64,
}

impl SchedulerDelay {
    pub fn from_config(config: &burnbox_storage::InboxConfig) -> Self {
        Self {
            min_seconds: config.min_delay_seconds,
            max_seconds: config.max_delay_seconds,
        }
    }
}

struct SchedulerState {
    /// Bumped on every arm and cancel; a fire whose generation no longer
    /// matches is stale and does nothing.
    generation: u64,
    /// Epoch-millis deadline of the pending fire; `None` while idle or
    /// mid-delivery.
    deadline_ms: Option<i64>,
}

struct SchedulerInner {
    service: Arc<InboxService>,
    state: Mutex<SchedulerState>,
    delay: SchedulerDelay,
}

/// Drives periodic synthetic deliveries through the service.
#[derive(Clone)]
pub struct DeliveryScheduler {
    inner: Arc<SchedulerInner>,
}

impl DeliveryScheduler {
    pub fn new(service: Arc<InboxService>, delay: SchedulerDelay) -> Self {
        Self {
            inner: Arc::new(SchedulerInner {
                service,
                state: Mutex::new(SchedulerState {
                    generation: 0,
                    deadline_ms: None,
                }),
                delay,
            }),
        }
    }

    /// Schedule the next delivery after a fresh jittered delay. Arming while
    /// already armed replaces the pending fire.
    pub fn arm(&self) {
        let delay_seconds = random_int(
            self.inner.delay.min_seconds as u32,
            self.inner.delay.max_seconds as u32,
        ) as u64;
        let deadline_ms = chrono::Utc::now().timestamp_millis() + (delay_seconds as i64) * 1_000;

        let generation = {
            let mut state = self.inner.state.lock();
            state.generation += 1;
            state.deadline_ms = Some(deadline_ms);
            state.generation
        };
        debug!(delay_seconds, generation, "Delivery armed");

        let inner = self.inner.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(delay_seconds)).await;
            fire(inner, generation).await;
        });
    }

    /// Return to idle. Idempotent: cancelling twice, or while idle, is a
    /// no-op. A delivery that has already begun still runs to completion;
    /// only its re-arm is suppressed.
    pub fn cancel(&self) {
        let mut state = self.inner.state.lock();
        state.generation += 1;
        if state.deadline_ms.take().is_some() {
            info!("Delivery schedule cancelled");
        }
    }

    pub fn is_armed(&self) -> bool {
        self.inner.state.lock().deadline_ms.is_some()
    }

    /// Best-effort re-arm when the app regains visibility: arms when idle,
    /// or when the pending deadline passed without firing (a timer lost
    /// while hidden).
    pub fn on_visibility_resume(&self) {
        let needs_arm = {
            let state = self.inner.state.lock();
            match state.deadline_ms {
                None => true,
                Some(deadline_ms) => {
                    chrono::Utc::now().timestamp_millis() > deadline_ms + STALE_SLACK_MS
                }
            }
        };
        if needs_arm {
            debug!("Re-arming delivery schedule on visibility resume");
            self.arm();
        }
    }
}

async fn fire(inner: Arc<SchedulerInner>, generation: u64) {
    {
        let mut state = inner.state.lock();
        if state.generation != generation || state.deadline_ms.is_none() {
            debug!(generation, "Stale delivery fire skipped");
            return;
        }
        state.deadline_ms = None;
    }

    // From here the delivery runs to completion even if a cancel races.
    let record = inner.service.deliver_message().await;
    debug!(id = %record.id, "Scheduled delivery completed");

    let still_current = inner.state.lock().generation == generation;
    if still_current {
        DeliveryScheduler {
            inner: inner.clone(),
        }
        .arm();
    }
}
