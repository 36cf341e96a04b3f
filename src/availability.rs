//! Officer free-slot computation via interval subtraction.
//!
//! Subtracts an officer's busy commitments from a scheduling window,
//! producing the disjoint, chronologically ordered free slots the engine
//! assigns into. Slots shorter than [`MIN_SLOT_MINUTES`] are unusable and
//! dropped.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::model::{Officer, PatrolCommitment, TimeSlot, TimeWindow};
use crate::store::PatrolStore;

/// Minimum usable free slot length in minutes.
pub const MIN_SLOT_MINUTES: i64 = 30;

/// Availability result for one officer over a window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfficerAvailability {
    pub is_available: bool,
    pub available_slots: Vec<TimeSlot>,
    pub conflicting_commitments: Vec<PatrolCommitment>,
}

/// Computes the free slots left in `window` after subtracting the busy
/// commitments.
///
/// Commitments that do not block (terminal statuses) or do not intersect
/// the window are ignored. The sweep walks commitments sorted by start,
/// emitting the gap before each one and advancing the cursor to the
/// furthest end seen.
pub fn free_slots(window: TimeWindow, commitments: &[PatrolCommitment]) -> Vec<TimeSlot> {
    let mut busy: Vec<TimeWindow> = commitments
        .iter()
        .filter(|c| c.status.blocks_officer() && c.window.overlaps(&window))
        .map(|c| c.window)
        .collect();
    busy.sort_by_key(|w| w.start);

    let mut slots = Vec::new();
    let mut cursor = window.start;
    for interval in busy {
        if cursor < interval.start {
            slots.push(TimeWindow::new(cursor, interval.start));
        }
        cursor = cursor.max(interval.end);
    }
    if cursor < window.end {
        slots.push(TimeWindow::new(cursor, window.end));
    }

    slots.retain(|s| s.duration() >= Duration::minutes(MIN_SLOT_MINUTES));
    slots
}

/// Removes a committed sub-interval from a slot list, splitting or
/// shrinking any slot it intersects. Fragments below the minimum usable
/// length are dropped.
pub fn carve(slots: &mut Vec<TimeSlot>, used: TimeWindow) {
    let minimum = Duration::minutes(MIN_SLOT_MINUTES);
    let mut remaining = Vec::with_capacity(slots.len() + 1);

    for slot in slots.drain(..) {
        if !slot.overlaps(&used) {
            remaining.push(slot);
            continue;
        }
        if slot.start < used.start {
            let head = TimeWindow::new(slot.start, used.start);
            if head.duration() >= minimum {
                remaining.push(head);
            }
        }
        if used.end < slot.end {
            let tail = TimeWindow::new(used.end, slot.end);
            if tail.duration() >= minimum {
                remaining.push(tail);
            }
        }
    }

    *slots = remaining;
}

/// Availability for one officer over `window`.
///
/// The officer id is not validated here: an id with no blocking
/// commitments, including an unknown one, reports the whole window as
/// free. Callers that need existence checks go through
/// [`PatrolStore::officer`] first.
pub fn officer_availability<S: PatrolStore>(
    store: &S,
    officer_id: &str,
    window: TimeWindow,
) -> Result<OfficerAvailability, EngineError> {
    validate_window(window)?;

    let commitments = store.blocking_commitments(officer_id, window)?;
    let slots = free_slots(window, &commitments);

    Ok(OfficerAvailability {
        is_available: !slots.is_empty(),
        available_slots: slots,
        conflicting_commitments: commitments,
    })
}

/// Availability for every candidate officer over `window`.
pub fn all_officer_availability<S: PatrolStore>(
    store: &S,
    window: TimeWindow,
) -> Result<Vec<(Officer, OfficerAvailability)>, EngineError> {
    validate_window(window)?;

    let mut results = Vec::new();
    for officer in store.candidate_officers()? {
        let availability = officer_availability(store, &officer.id, window)?;
        results.push((officer, availability));
    }
    Ok(results)
}

pub(crate) fn validate_window(window: TimeWindow) -> Result<(), EngineError> {
    if window.start >= window.end {
        return Err(EngineError::InvalidParameter(
            "window start must precede window end".to_string(),
        ));
    }
    Ok(())
}
