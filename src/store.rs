//! Persistence collaborator seam.
//!
//! Concrete applications implement [`PatrolStore`] over their database; the
//! engine, availability and lifecycle code only touch these typed
//! operations, never raw query strings. [`crate::memory::InMemoryStore`] is
//! the in-process implementation used by the test suite.

use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::model::{
    CommitmentStatus, Incident, Officer, PatrolCommitment, Route, TimeWindow,
};

pub trait PatrolStore {
    /// Routes currently eligible for assignment.
    fn active_routes(&self) -> Result<Vec<Route>, StoreError>;

    /// Incidents with an open status (reported or investigating).
    fn open_incidents(&self) -> Result<Vec<Incident>, StoreError>;

    /// Officers eligible for assignment: role `officer`, active or on-duty.
    fn candidate_officers(&self) -> Result<Vec<Officer>, StoreError>;

    fn officer(&self, officer_id: &str) -> Result<Option<Officer>, StoreError>;

    /// Scheduled or in-progress commitments for one officer that overlap
    /// `window`, ordered by start time.
    fn blocking_commitments(
        &self,
        officer_id: &str,
        window: TimeWindow,
    ) -> Result<Vec<PatrolCommitment>, StoreError>;

    /// Number of commitments the officer completed since `since`.
    fn completed_since(
        &self,
        officer_id: &str,
        since: DateTime<Utc>,
    ) -> Result<usize, StoreError>;

    /// Inserts a synthesized route unless one with the same name exists.
    ///
    /// The name acts as the uniqueness guard that keeps concurrent synthesis
    /// runs idempotent. Returns whether a new route was written.
    fn upsert_route(&self, route: &Route) -> Result<bool, StoreError>;

    fn insert_commitment(&self, commitment: &PatrolCommitment) -> Result<(), StoreError>;

    /// All commitments currently in `status`.
    fn commitments_with_status(
        &self,
        status: CommitmentStatus,
    ) -> Result<Vec<PatrolCommitment>, StoreError>;

    /// Conditionally transitions a commitment: the update applies only when
    /// the stored status still equals `expected`. Returns whether it did.
    fn transition_commitment(
        &self,
        commitment_id: &str,
        expected: CommitmentStatus,
        next: CommitmentStatus,
    ) -> Result<bool, StoreError>;
}
