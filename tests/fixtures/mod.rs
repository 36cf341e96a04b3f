//! Test fixtures for patrol-planner.
//!
//! Provides realistic test data including:
//! - Real Ahmedabad-area locations (city landmarks)
//! - Builders for routes, officers, incidents and commitments

pub mod ahmedabad_locations;

#[allow(unused_imports)]
pub use ahmedabad_locations::*;

use chrono::{DateTime, TimeZone, Utc};
use patrol_planner::model::{
    Checkpoint, CommitmentPriority, CommitmentStatus, CompletionRequirements, Coordinates,
    Incident, IncidentStatus, Officer, OfficerStatus, PatrolCommitment, Route, Severity,
    TimeWindow,
};

/// Fixed fixture date: 2025-06-01, times in UTC.
pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, hour, minute, 0).unwrap()
}

pub fn window(start_hour: u32, end_hour: u32) -> TimeWindow {
    TimeWindow::new(at(start_hour, 0), at(end_hour, 0))
}

/// Builder for test routes with sensible defaults.
#[derive(Clone, Debug)]
pub struct RouteFixture {
    route: Route,
}

impl RouteFixture {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            route: Route {
                id: id.to_string(),
                name: name.to_string(),
                checkpoints: Vec::new(),
                estimated_duration_minutes: None,
                active: true,
                incident_severity: None,
                incident_id: None,
            },
        }
    }

    pub fn checkpoint(mut self, name: &str, lat: f64, lon: f64) -> Self {
        let order = self.route.checkpoints.len() as u32 + 1;
        self.route.checkpoints.push(Checkpoint {
            name: name.to_string(),
            coordinates: Some(Coordinates::new(lat, lon)),
            geofence_radius_m: 50.0,
            dwell_minutes: 5,
            order,
            requirements: CompletionRequirements::default(),
        });
        self
    }

    pub fn unlocated_checkpoint(mut self, name: &str) -> Self {
        let order = self.route.checkpoints.len() as u32 + 1;
        self.route.checkpoints.push(Checkpoint {
            name: name.to_string(),
            coordinates: None,
            geofence_radius_m: 50.0,
            dwell_minutes: 5,
            order,
            requirements: CompletionRequirements::default(),
        });
        self
    }

    pub fn duration_minutes(mut self, minutes: i64) -> Self {
        self.route.estimated_duration_minutes = Some(minutes);
        self
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.route.incident_severity = Some(severity);
        self
    }

    pub fn inactive(mut self) -> Self {
        self.route.active = false;
        self
    }

    pub fn build(self) -> Route {
        self.route
    }
}

/// Builder for test incidents with sensible defaults.
#[derive(Clone, Debug)]
pub struct IncidentFixture {
    incident: Incident,
}

impl IncidentFixture {
    pub fn new(id: &str, area: &str) -> Self {
        Self {
            incident: Incident {
                id: id.to_string(),
                title: format!("Incident at {area}"),
                area: Some(area.to_string()),
                coordinates: None,
                severity: Severity::Medium,
                status: IncidentStatus::Reported,
                created_at: at(7, 0),
            },
        }
    }

    pub fn located(mut self, lat: f64, lon: f64) -> Self {
        self.incident.coordinates = Some(Coordinates::new(lat, lon));
        self
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.incident.severity = severity;
        self
    }

    pub fn status(mut self, status: IncidentStatus) -> Self {
        self.incident.status = status;
        self
    }

    pub fn created_at(mut self, created: DateTime<Utc>) -> Self {
        self.incident.created_at = created;
        self
    }

    pub fn build(self) -> Incident {
        self.incident
    }
}

pub fn officer(id: &str, name: &str) -> Officer {
    Officer {
        id: id.to_string(),
        name: name.to_string(),
        role: "officer".to_string(),
        status: OfficerStatus::Active,
    }
}

pub fn off_duty_officer(id: &str, name: &str) -> Officer {
    Officer {
        id: id.to_string(),
        name: name.to_string(),
        role: "officer".to_string(),
        status: OfficerStatus::OffDuty,
    }
}

pub fn commitment(
    id: &str,
    officer_id: &str,
    window: TimeWindow,
    status: CommitmentStatus,
) -> PatrolCommitment {
    PatrolCommitment {
        id: id.to_string(),
        title: format!("Patrol {id}"),
        route_id: "route-existing".to_string(),
        officer_ids: vec![officer_id.to_string()],
        window,
        status,
        priority: CommitmentPriority::Medium,
        coordinated: false,
        created_at: window.start,
    }
}
