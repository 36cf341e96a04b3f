//! Double-booking detection for proposed patrol windows.

use serde::{Deserialize, Serialize};

use crate::availability::validate_window;
use crate::error::EngineError;
use crate::model::{PatrolCommitment, TimeWindow};
use crate::store::PatrolStore;

/// Conflicts found for a single officer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfficerConflict {
    pub officer_id: String,
    pub officer_name: String,
    pub overlapping_commitments: Vec<PatrolCommitment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictReport {
    pub has_conflicts: bool,
    pub conflicts: Vec<OfficerConflict>,
}

/// Checks a proposed window against each officer's scheduled and
/// in-progress commitments.
///
/// Overlap is half-open: a commitment ending exactly when the proposed
/// window starts does not conflict. `exclude_commitment_id` skips the
/// commitment being edited so updates don't conflict with themselves.
pub fn check_conflicts<S: PatrolStore>(
    store: &S,
    officer_ids: &[String],
    window: TimeWindow,
    exclude_commitment_id: Option<&str>,
) -> Result<ConflictReport, EngineError> {
    validate_window(window)?;

    let mut conflicts = Vec::new();
    for officer_id in officer_ids {
        let overlapping: Vec<PatrolCommitment> = store
            .blocking_commitments(officer_id, window)?
            .into_iter()
            .filter(|c| exclude_commitment_id != Some(c.id.as_str()))
            .collect();

        if overlapping.is_empty() {
            continue;
        }

        let officer_name = store
            .officer(officer_id)?
            .map(|o| o.name)
            .unwrap_or_else(|| "Unknown Officer".to_string());

        conflicts.push(OfficerConflict {
            officer_id: officer_id.clone(),
            officer_name,
            overlapping_commitments: overlapping,
        });
    }

    Ok(ConflictReport {
        has_conflicts: !conflicts.is_empty(),
        conflicts,
    })
}
