//! Multi-factor route scoring.
//!
//! Three independent scorers feed the engine's weighted sum: incident
//! proximity, route efficiency, and a time-of-day multiplier. Each scorer
//! coerces non-finite values to zero rather than failing the run.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::geo;
use crate::model::{Incident, Route};

/// Radius within which an incident counts toward a checkpoint, in km.
pub const INCIDENT_PROXIMITY_KM: f64 = 2.0;

/// Incident age cutoff for priority scoring.
pub const INCIDENT_LOOKBACK_HOURS: i64 = 24;

/// Dwell assumption per checkpoint when a route carries no duration estimate.
pub const DEFAULT_CHECKPOINT_MINUTES: i64 = 15;

/// Fixed priority when a checkpoint name exactly matches an incident area.
pub const EXACT_MATCH_PRIORITY: f64 = 10.0;

pub const NIGHT_MULTIPLIER: f64 = 1.5;
pub const EVENING_MULTIPLIER: f64 = 1.2;
pub const DAY_MULTIPLIER: f64 = 1.0;

/// Weighted-sum factors for the composite route score.
#[derive(Debug, Clone, Copy)]
pub struct ScoringWeights {
    pub incident_priority: f64,
    pub route_efficiency: f64,
    pub time_of_day: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            incident_priority: 0.35,
            route_efficiency: 0.25,
            time_of_day: 0.15,
        }
    }
}

/// Incident pressure around a route's checkpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PriorityScore {
    pub priority: f64,
    pub incident_count: usize,
    pub average_priority: f64,
}

impl PriorityScore {
    /// The fixed override used when a checkpoint name matches an incident
    /// area exactly.
    pub fn exact_match() -> Self {
        Self {
            priority: EXACT_MATCH_PRIORITY,
            incident_count: 1,
            average_priority: EXACT_MATCH_PRIORITY,
        }
    }
}

/// Length, density and throughput metrics for a route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyScore {
    pub distance_km: f64,
    pub checkpoint_density: f64,
    pub duration_minutes: i64,
    pub efficiency: f64,
}

/// Scores a route by open incidents reported near its checkpoints in the
/// lookback window ending at `reference`.
///
/// A (checkpoint, incident) pair counts when both carry coordinates and lie
/// within [`INCIDENT_PROXIMITY_KM`], or, lacking coordinates on either side,
/// when the checkpoint name matches the incident area as a case-insensitive
/// substring. Each hit contributes severity weight times status weight.
///
/// Fails soft: a non-finite accumulation is logged and zeroed, never
/// surfaced to the caller.
pub fn incident_priority(
    route: &Route,
    incidents: &[Incident],
    reference: DateTime<Utc>,
) -> PriorityScore {
    let cutoff = reference - Duration::hours(INCIDENT_LOOKBACK_HOURS);

    let mut total = 0.0;
    let mut count = 0usize;

    for checkpoint in &route.checkpoints {
        for incident in incidents {
            if !incident.status.is_open() || incident.created_at < cutoff {
                continue;
            }

            let nearby = match (checkpoint.coordinates, incident.coordinates) {
                (Some(cp), Some(inc)) => {
                    geo::distance_between(&cp, &inc) <= INCIDENT_PROXIMITY_KM
                }
                // No geometry on one side: fall back to a name match,
                // treated as distance zero.
                _ => area_contains(&checkpoint.name, incident.area.as_deref()),
            };

            if nearby {
                total += incident.severity.weight() * incident.status.weight();
                count += 1;
            }
        }
    }

    if !total.is_finite() {
        warn!(route = %route.name, "non-finite incident priority, zeroing");
        return PriorityScore::default();
    }

    PriorityScore {
        priority: total,
        incident_count: count,
        average_priority: if count > 0 { total / count as f64 } else { 0.0 },
    }
}

/// Evaluates route length, checkpoint density and patrol throughput.
///
/// Routes with fewer than two checkpoints score zero efficiency with the
/// default single-checkpoint duration. Legs missing coordinates contribute
/// zero distance.
pub fn route_efficiency(route: &Route) -> EfficiencyScore {
    let count = route.checkpoints.len();
    if count < 2 {
        return EfficiencyScore {
            distance_km: 0.0,
            checkpoint_density: 0.0,
            duration_minutes: DEFAULT_CHECKPOINT_MINUTES,
            efficiency: 0.0,
        };
    }

    let mut distance = 0.0;
    for leg in route.checkpoints.windows(2) {
        if let (Some(from), Some(to)) = (leg[0].coordinates, leg[1].coordinates) {
            let km = geo::distance_between(&from, &to);
            if km.is_finite() {
                distance += km;
            }
        }
    }

    let density = count as f64 / distance.max(1.0);
    let duration = route
        .estimated_duration_minutes
        .unwrap_or(count as i64 * DEFAULT_CHECKPOINT_MINUTES);
    let efficiency = density * (60.0 / duration.max(1) as f64);

    EfficiencyScore {
        distance_km: finite_or_zero(distance),
        checkpoint_density: finite_or_zero(density),
        duration_minutes: duration,
        efficiency: finite_or_zero(efficiency),
    }
}

/// Time-of-day priority multiplier for a civil-time hour.
///
/// Night [22:00, 06:00) scores highest, evening [18:00, 22:00) next, the
/// rest of the day is neutral.
pub fn time_multiplier(hour: u32) -> f64 {
    if hour >= 22 || hour < 6 {
        NIGHT_MULTIPLIER
    } else if hour >= 18 {
        EVENING_MULTIPLIER
    } else {
        DAY_MULTIPLIER
    }
}

/// Whether a checkpoint name and an incident area match as case-insensitive
/// substrings (either direction).
pub(crate) fn area_contains(checkpoint_name: &str, area: Option<&str>) -> bool {
    let Some(area) = area else {
        return false;
    };
    let area = area.trim().to_lowercase();
    if area.is_empty() {
        return false;
    }
    let name = checkpoint_name.trim().to_lowercase();
    name.contains(&area) || area.contains(&name)
}

/// Whether a checkpoint name equals an incident area, case-insensitively.
pub(crate) fn area_matches_exactly(checkpoint_name: &str, area: Option<&str>) -> bool {
    match area {
        Some(area) => {
            !area.trim().is_empty()
                && checkpoint_name.trim().eq_ignore_ascii_case(area.trim())
        }
        None => false,
    }
}

pub(crate) fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}
