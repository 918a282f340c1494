//! Background timers tied to the authenticated session.
//!
//! Two independent loops run while a user is signed in: a full task
//! reload and the review carousel rotation. Both are best-effort, log
//! their own failures, and stop when the session's cancellation token
//! fires.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn, Instrument};

use crate::config::TimerConfig;
use crate::controller::MutationController;
use crate::reviews::ReviewCarousel;

/// Spawn the periodic full reload of the task list.
///
/// The first reload happens one `period` after spawning.
#[must_use]
pub fn spawn_resync_task(
    controller: Arc<MutationController>,
    period: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(
        async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    () = cancel.cancelled() => {
                        debug!("resync task shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        if let Err(err) = controller.reload().await {
                            warn!(%err, "auto-refresh failed");
                        }
                    }
                }
            }
        }
        .instrument(info_span!("resync")),
    )
}

/// Spawn the periodic review rotation.
///
/// The first rotation happens one `period` after spawning.
#[must_use]
pub fn spawn_rotation_task(
    carousel: Arc<ReviewCarousel>,
    period: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(
        async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    () = cancel.cancelled() => {
                        debug!("rotation task shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        if let Some(index) = carousel.rotate().await {
                            debug!(index, "review rotated");
                        }
                    }
                }
            }
        }
        .instrument(info_span!("review_rotation")),
    )
}

/// Running timers of one signed-in session.
pub struct SessionTimers {
    cancel: CancellationToken,
    handles: Vec<JoinHandle<()>>,
}

impl SessionTimers {
    /// Start both timers with the configured periods.
    #[must_use]
    pub fn start(
        controller: Arc<MutationController>,
        carousel: Arc<ReviewCarousel>,
        timers: &TimerConfig,
    ) -> Self {
        let cancel = CancellationToken::new();
        let handles = vec![
            spawn_resync_task(controller, timers.resync_period(), cancel.clone()),
            spawn_rotation_task(carousel, timers.rotation_period(), cancel.clone()),
        ];
        info!(
            resync_seconds = timers.resync_seconds,
            rotation_seconds = timers.rotation_seconds,
            "session timers started"
        );
        Self { cancel, handles }
    }

    /// Token cancelled by [`stop`](Self::stop).
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Whether every timer task has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handles.iter().all(JoinHandle::is_finished)
    }

    /// Cancel both timers and wait for them to exit.
    pub async fn stop(mut self) {
        self.cancel.cancel();
        for handle in std::mem::take(&mut self.handles) {
            if let Err(err) = handle.await {
                warn!(%err, "session timer task failed");
            }
        }
        info!("session timers stopped");
    }
}

impl Drop for SessionTimers {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
