//! In-process [`PatrolStore`] implementation.
//!
//! Reference adapter for embedding and the backing store for the test
//! suite. All collections live behind one lock; a scheduling run only takes
//! short read or write sections, never holds the lock across computation.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::error::StoreError;
use crate::model::{
    CommitmentStatus, Incident, Officer, PatrolCommitment, Route, TimeWindow,
};
use crate::store::PatrolStore;

#[derive(Debug, Default)]
struct State {
    routes: Vec<Route>,
    incidents: Vec<Incident>,
    officers: Vec<Officer>,
    commitments: Vec<PatrolCommitment>,
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_route(&self, route: Route) {
        self.state.write().routes.push(route);
    }

    pub fn add_incident(&self, incident: Incident) {
        self.state.write().incidents.push(incident);
    }

    pub fn add_officer(&self, officer: Officer) {
        self.state.write().officers.push(officer);
    }

    pub fn add_commitment(&self, commitment: PatrolCommitment) {
        self.state.write().commitments.push(commitment);
    }

    pub fn routes(&self) -> Vec<Route> {
        self.state.read().routes.clone()
    }

    pub fn commitments(&self) -> Vec<PatrolCommitment> {
        self.state.read().commitments.clone()
    }

    pub fn commitment(&self, commitment_id: &str) -> Option<PatrolCommitment> {
        self.state
            .read()
            .commitments
            .iter()
            .find(|c| c.id == commitment_id)
            .cloned()
    }
}

impl PatrolStore for InMemoryStore {
    fn active_routes(&self) -> Result<Vec<Route>, StoreError> {
        Ok(self
            .state
            .read()
            .routes
            .iter()
            .filter(|r| r.active)
            .cloned()
            .collect())
    }

    fn open_incidents(&self) -> Result<Vec<Incident>, StoreError> {
        Ok(self
            .state
            .read()
            .incidents
            .iter()
            .filter(|i| i.status.is_open())
            .cloned()
            .collect())
    }

    fn candidate_officers(&self) -> Result<Vec<Officer>, StoreError> {
        Ok(self
            .state
            .read()
            .officers
            .iter()
            .filter(|o| o.role == "officer" && o.status.is_available())
            .cloned()
            .collect())
    }

    fn officer(&self, officer_id: &str) -> Result<Option<Officer>, StoreError> {
        Ok(self
            .state
            .read()
            .officers
            .iter()
            .find(|o| o.id == officer_id)
            .cloned())
    }

    fn blocking_commitments(
        &self,
        officer_id: &str,
        window: TimeWindow,
    ) -> Result<Vec<PatrolCommitment>, StoreError> {
        let mut found: Vec<PatrolCommitment> = self
            .state
            .read()
            .commitments
            .iter()
            .filter(|c| {
                c.status.blocks_officer()
                    && c.window.overlaps(&window)
                    && c.officer_ids.iter().any(|id| id == officer_id)
            })
            .cloned()
            .collect();
        found.sort_by_key(|c| c.window.start);
        Ok(found)
    }

    fn completed_since(
        &self,
        officer_id: &str,
        since: DateTime<Utc>,
    ) -> Result<usize, StoreError> {
        Ok(self
            .state
            .read()
            .commitments
            .iter()
            .filter(|c| {
                c.status == CommitmentStatus::Completed
                    && c.created_at >= since
                    && c.officer_ids.iter().any(|id| id == officer_id)
            })
            .count())
    }

    fn upsert_route(&self, route: &Route) -> Result<bool, StoreError> {
        let mut state = self.state.write();
        if state.routes.iter().any(|r| r.name == route.name) {
            return Ok(false);
        }
        state.routes.push(route.clone());
        Ok(true)
    }

    fn insert_commitment(&self, commitment: &PatrolCommitment) -> Result<(), StoreError> {
        self.state.write().commitments.push(commitment.clone());
        Ok(())
    }

    fn commitments_with_status(
        &self,
        status: CommitmentStatus,
    ) -> Result<Vec<PatrolCommitment>, StoreError> {
        Ok(self
            .state
            .read()
            .commitments
            .iter()
            .filter(|c| c.status == status)
            .cloned()
            .collect())
    }

    fn transition_commitment(
        &self,
        commitment_id: &str,
        expected: CommitmentStatus,
        next: CommitmentStatus,
    ) -> Result<bool, StoreError> {
        let mut state = self.state.write();
        let commitment = state
            .commitments
            .iter_mut()
            .find(|c| c.id == commitment_id)
            .ok_or_else(|| StoreError::NotFound(format!("commitment {commitment_id}")))?;

        if commitment.status != expected {
            return Ok(false);
        }
        commitment.status = next;
        Ok(true)
    }
}
