//! Automatic commitment status transitions.
//!
//! A periodic sweep walks non-terminal commitments and applies monotonic,
//! idempotent transitions: scheduled patrols start, running patrols
//! complete, and long-overrun patrols land in overdue. Every update is
//! conditional on the stored status still matching, so the sweep and a
//! concurrent manual edit cannot race destructively.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, FixedOffset, Utc};
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::model::CommitmentStatus;
use crate::store::PatrolStore;

/// Fixed civil-time offset for schedule comparisons (IST, UTC+5:30).
pub const CIVIL_OFFSET_SECONDS: i32 = 5 * 3600 + 30 * 60;

/// Seconds between sweeps.
pub const SWEEP_INTERVAL_SECS: u64 = 60;

/// A scheduled patrol starts when now is within this many minutes of its
/// start time.
pub const START_GRACE_MINUTES: i64 = 5;

/// An in-progress patrol becomes overdue this many minutes past its end.
pub const OVERDUE_GRACE_MINUTES: i64 = 30;

pub fn civil_offset() -> FixedOffset {
    FixedOffset::east_opt(CIVIL_OFFSET_SECONDS).expect("civil offset is within bounds")
}

/// Transition counts from one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepCounts {
    pub started: usize,
    pub completed: usize,
    pub overdue: usize,
}

/// Runs one sweep against the store at the given instant.
///
/// Each transition is an independent conditional update; a commitment whose
/// status changed underneath the sweep is left alone. The overdue check
/// runs before the completion check so a patrol found long after its window
/// lands in overdue rather than quietly completing.
pub fn sweep_at<S: PatrolStore>(
    store: &S,
    now: DateTime<Utc>,
) -> Result<SweepCounts, StoreError> {
    let offset = civil_offset();
    let civil_now = now.with_timezone(&offset);
    let mut counts = SweepCounts::default();

    for commitment in store.commitments_with_status(CommitmentStatus::Scheduled)? {
        let start = commitment.window.start.with_timezone(&offset);
        if (civil_now - start).abs() <= Duration::minutes(START_GRACE_MINUTES)
            && store.transition_commitment(
                &commitment.id,
                CommitmentStatus::Scheduled,
                CommitmentStatus::InProgress,
            )?
        {
            info!(commitment = %commitment.id, title = %commitment.title, "auto-started patrol");
            counts.started += 1;
        }
    }

    for commitment in store.commitments_with_status(CommitmentStatus::InProgress)? {
        let end = commitment.window.end.with_timezone(&offset);
        if civil_now >= end + Duration::minutes(OVERDUE_GRACE_MINUTES) {
            if store.transition_commitment(
                &commitment.id,
                CommitmentStatus::InProgress,
                CommitmentStatus::Overdue,
            )? {
                warn!(commitment = %commitment.id, title = %commitment.title, "patrol overdue");
                counts.overdue += 1;
            }
        } else if civil_now >= end
            && store.transition_commitment(
                &commitment.id,
                CommitmentStatus::InProgress,
                CommitmentStatus::Completed,
            )?
        {
            info!(commitment = %commitment.id, title = %commitment.title, "auto-completed patrol");
            counts.completed += 1;
        }
    }

    debug!(
        started = counts.started,
        completed = counts.completed,
        overdue = counts.overdue,
        "status sweep finished"
    );
    Ok(counts)
}

/// Handle to the background sweep task.
///
/// Owned by the composition root: start at startup, call [`stop`] at
/// shutdown. Dropping the handle without stopping detaches the task.
///
/// [`stop`]: LifecycleHandle::stop
pub struct LifecycleHandle {
    running: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl LifecycleHandle {
    /// Signals the sweep loop to exit and waits for it.
    pub fn stop(self) {
        self.running.store(false, Ordering::Relaxed);
        let _ = self.handle.join();
    }
}

/// Spawns the periodic status sweep on its own thread.
pub fn start<S>(store: Arc<S>) -> LifecycleHandle
where
    S: PatrolStore + Send + Sync + 'static,
{
    let running = Arc::new(AtomicBool::new(true));
    let flag = Arc::clone(&running);

    let handle = thread::spawn(move || {
        info!("patrol status sweep started");
        while flag.load(Ordering::Relaxed) {
            if let Err(err) = sweep_at(store.as_ref(), Utc::now()) {
                warn!(%err, "status sweep failed");
            }
            // Sleep in one-second steps so stop() stays prompt.
            for _ in 0..SWEEP_INTERVAL_SECS {
                if !flag.load(Ordering::Relaxed) {
                    break;
                }
                thread::sleep(StdDuration::from_secs(1));
            }
        }
    });

    LifecycleHandle { running, handle }
}
