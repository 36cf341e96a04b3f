//! Typed domain records shared across the engine.
//!
//! These mirror the persisted documents the engine reads and writes.
//! Optional document fields are explicit `Option`s, never untyped maps.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Geographic point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Half-open time interval [start, end).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Inclusive start.
    pub start: DateTime<Utc>,
    /// Exclusive end.
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant < self.end
    }

    /// Half-open overlap test: touching boundaries do not overlap.
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// A contiguous free interval for one officer within a scheduling window.
///
/// Recomputed per run, never persisted.
pub type TimeSlot = TimeWindow;

/// Incident criticality tier driving scoring weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Scoring weight for this tier.
    pub fn weight(self) -> f64 {
        match self {
            Severity::Low => 1.0,
            Severity::Medium => 2.0,
            Severity::High => 3.0,
            Severity::Critical => 4.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncidentStatus {
    Reported,
    Investigating,
    Resolved,
    Closed,
}

impl IncidentStatus {
    /// Open incidents drive scoring and coverage synthesis.
    pub fn is_open(self) -> bool {
        matches!(self, IncidentStatus::Reported | IncidentStatus::Investigating)
    }

    /// Scoring weight for this status.
    pub fn weight(self) -> f64 {
        match self {
            IncidentStatus::Reported => 1.5,
            IncidentStatus::Investigating => 2.0,
            IncidentStatus::Resolved => 0.5,
            IncidentStatus::Closed => 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OfficerStatus {
    Active,
    OnDuty,
    OffDuty,
    Suspended,
}

impl OfficerStatus {
    pub fn is_available(self) -> bool {
        matches!(self, OfficerStatus::Active | OfficerStatus::OnDuty)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommitmentStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
    Overdue,
}

impl CommitmentStatus {
    /// Whether a commitment in this status occupies the officer's time.
    pub fn blocks_officer(self) -> bool {
        matches!(self, CommitmentStatus::Scheduled | CommitmentStatus::InProgress)
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            CommitmentStatus::Completed | CommitmentStatus::Cancelled | CommitmentStatus::Overdue
        )
    }
}

/// Operational priority tag on a materialized commitment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitmentPriority {
    Low,
    Medium,
    High,
    Urgent,
}

/// Verification steps an officer must complete at a checkpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRequirements {
    pub scan_qr_code: bool,
    pub take_photo: bool,
    pub write_report: bool,
    pub signature: bool,
}

/// Named waypoint on a route, exclusively owned by it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub name: String,
    pub coordinates: Option<Coordinates>,
    /// Arrival threshold in meters.
    pub geofence_radius_m: f64,
    /// Expected dwell time in minutes.
    pub dwell_minutes: i64,
    /// Position within the route; checkpoints are strictly ordered.
    pub order: u32,
    pub requirements: CompletionRequirements,
}

/// Patrol route with its ordered checkpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub id: String,
    pub name: String,
    pub checkpoints: Vec<Checkpoint>,
    /// Planned duration in minutes; derived from checkpoint count when absent.
    pub estimated_duration_minutes: Option<i64>,
    pub active: bool,
    /// Severity tag carried by synthesized incident-response routes.
    pub incident_severity: Option<Severity>,
    /// Source incident for synthesized routes.
    pub incident_id: Option<String>,
}

/// Officer record; lifecycle is managed externally, the engine only reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Officer {
    pub id: String,
    pub name: String,
    pub role: String,
    pub status: OfficerStatus,
}

/// Reported incident; read-only input that may trigger route synthesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    pub id: String,
    pub title: String,
    /// Free-form area name, used for coverage matching when set.
    pub area: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub severity: Severity,
    pub status: IncidentStatus,
    pub created_at: DateTime<Utc>,
}

/// A patrol commitment binding officers to a route over a time window.
///
/// The scheduled/in-progress set forms the busy intervals for availability
/// and conflict checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatrolCommitment {
    pub id: String,
    pub title: String,
    pub route_id: String,
    pub officer_ids: Vec<String>,
    pub window: TimeWindow,
    pub status: CommitmentStatus,
    pub priority: CommitmentPriority,
    /// Set when two or more officers patrol the route jointly.
    pub coordinated: bool,
    pub created_at: DateTime<Utc>,
}
