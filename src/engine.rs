//! Patrol assignment engine.
//!
//! One run reads a point-in-time snapshot and produces ranked, greedily
//! matched assignments: collect, synthesize coverage, score, rank, assign,
//! optionally materialize, report. Scoring is parallel across routes; seat
//! selection and slot carving stay sequential so one officer is never
//! booked twice in a run.

use std::cmp::Reverse;
use std::collections::HashSet;

use chrono::{Duration, Timelike, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::availability::{carve, free_slots, validate_window};
use crate::coverage;
use crate::error::EngineError;
use crate::model::{
    CommitmentPriority, CommitmentStatus, Incident, Officer, PatrolCommitment, Route,
    Severity, TimeSlot, TimeWindow,
};
use crate::lifecycle::civil_offset;
use crate::scoring::{
    self, EfficiencyScore, PriorityScore, ScoringWeights, area_matches_exactly,
    finite_or_zero,
};
use crate::store::PatrolStore;

pub const MIN_MAX_ROUTES: u32 = 1;
pub const MAX_MAX_ROUTES: u32 = 10;

/// Fraction of top-ranked routes eligible for a second officer.
pub const COORDINATED_SHARE: f64 = 0.3;

/// Score penalty per workload point when choosing an officer.
pub const WORKLOAD_PENALTY: f64 = 0.1;

/// Score penalty per assignment an officer already received this run.
pub const ASSIGNED_COUNT_PENALTY: f64 = 0.1;

pub const ACTIVE_COMMITMENT_WEIGHT: f64 = 2.0;
pub const RECENT_COMPLETION_WEIGHT: f64 = 0.1;
pub const RECENT_COMPLETION_DAYS: i64 = 7;

/// Tunable knobs for a scheduling run.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    pub weights: ScoringWeights,
    pub coordinated_share: f64,
    pub workload_penalty: f64,
    pub assigned_count_penalty: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            coordinated_share: COORDINATED_SHARE,
            workload_penalty: WORKLOAD_PENALTY,
            assigned_count_penalty: ASSIGNED_COUNT_PENALTY,
        }
    }
}

/// Parameters of one scheduling run.
#[derive(Debug, Clone)]
pub struct ScheduleRequest {
    pub window: TimeWindow,
    /// Upper bound on routes considered for assignment, 1 through 10.
    pub max_routes: u32,
    /// Explicit candidate officer ids; empty means every active officer.
    pub officer_ids: Vec<String>,
    /// Synthesize response routes for uncovered incidents (write side
    /// effect).
    pub create_missing_routes: bool,
    /// Materialize assignments into patrol commitments.
    pub auto_create: bool,
}

impl ScheduleRequest {
    pub fn new(window: TimeWindow) -> Self {
        Self {
            window,
            max_routes: 5,
            officer_ids: Vec::new(),
            create_missing_routes: false,
            auto_create: false,
        }
    }

    pub fn with_max_routes(mut self, max_routes: u32) -> Self {
        self.max_routes = max_routes;
        self
    }

    pub fn with_officers(mut self, officer_ids: Vec<String>) -> Self {
        self.officer_ids = officer_ids;
        self
    }

    pub fn create_missing_routes(mut self, enabled: bool) -> Self {
        self.create_missing_routes = enabled;
        self
    }

    pub fn auto_create(mut self, enabled: bool) -> Self {
        self.auto_create = enabled;
        self
    }
}

/// One officer matched to one route for a concrete window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub route_id: String,
    pub route_name: String,
    pub officer_id: String,
    pub officer_name: String,
    /// Selection score after workload and fairness penalties.
    pub score: f64,
    pub incident_priority: PriorityScore,
    pub efficiency: EfficiencyScore,
    pub time_multiplier: f64,
    pub window: TimeWindow,
    /// True when the route received two officers this run.
    pub coordinated: bool,
    /// Officer workload snapshot at selection time.
    pub workload_score: f64,
    /// Blocking commitments the officer already held in the window.
    pub active_commitments: usize,
    /// Commitments the officer completed in the recent-completion window.
    pub recent_completions: usize,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub total_assignments: usize,
    pub total_routes: usize,
    pub total_officers: usize,
    /// Percentage of candidate routes that received at least one officer.
    pub coverage_pct: f64,
    /// Percentage of candidate officers that received at least one route.
    pub utilization_pct: f64,
    pub average_score: f64,
    pub coordinated_patrols: usize,
}

/// Outcome of a scheduling run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleReport {
    pub assignments: Vec<Assignment>,
    pub newly_created_routes: Vec<Route>,
    pub created_commitments: Vec<PatrolCommitment>,
    pub summary: ScheduleSummary,
}

/// A scored route awaiting ranking.
#[derive(Debug, Clone)]
struct RouteScore {
    route: Route,
    score: f64,
    incident_priority: PriorityScore,
    efficiency: EfficiencyScore,
    time_multiplier: f64,
}

/// Mutable per-officer state threaded through seat selection.
struct OfficerState {
    officer: Officer,
    slots: Vec<TimeSlot>,
    workload_score: f64,
    active_commitments: usize,
    recent_completions: usize,
    assigned: usize,
}

/// Generates ranked patrol assignments for the requested window.
///
/// Fails fast on invalid parameters and on an empty officer pool; an empty
/// route catalog is an empty success. Individual route scoring failures are
/// logged and skipped without aborting the run.
pub fn generate_assignments<S: PatrolStore>(
    store: &S,
    request: &ScheduleRequest,
    config: &EngineConfig,
) -> Result<ScheduleReport, EngineError> {
    validate_request(request)?;

    // Collect the snapshot. The officer pool is checked before any write so
    // a failed run leaves no side effects behind.
    let officers = resolve_officers(store, request)?;
    if officers.is_empty() {
        return Err(EngineError::NoOfficersAvailable);
    }

    let mut routes = store.active_routes()?;
    let incidents = store.open_incidents()?;

    let newly_created_routes = if request.create_missing_routes {
        coverage::ensure_coverage(store, &mut routes, &incidents)?
    } else {
        Vec::new()
    };

    if routes.is_empty() {
        debug!("no active routes; returning empty schedule");
        return Ok(empty_report(newly_created_routes, officers.len()));
    }

    // Score every route in parallel over the snapshot.
    let civil_hour = request
        .window
        .start
        .with_timezone(&civil_offset())
        .hour();
    let time_mult = scoring::time_multiplier(civil_hour);
    let reference = request.window.start;

    let mut scored: Vec<RouteScore> = routes
        .par_iter()
        .filter_map(|route| score_route(route, &incidents, reference, time_mult, &config.weights))
        .collect();

    // Rank: score descending, then a stable pass by severity tag so that
    // severity is the authoritative order and score only breaks ties
    // within a tier.
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.sort_by_key(|s| Reverse(s.route.incident_severity.unwrap_or(Severity::Medium)));

    let candidates: Vec<RouteScore> = scored
        .into_iter()
        .take(request.max_routes as usize)
        .collect();
    let coordinated_limit =
        (candidates.len() as f64 * config.coordinated_share).ceil() as usize;

    let mut officer_states = officer_states(store, &officers, request.window)?;
    let assignments = assign_seats(
        &candidates,
        &mut officer_states,
        coordinated_limit,
        config,
    );

    let created_commitments = if request.auto_create {
        materialize(store, &assignments)?
    } else {
        Vec::new()
    };

    let summary = summarize(&assignments, routes.len(), officers.len(), candidates.len());
    info!(
        assignments = summary.total_assignments,
        routes = summary.total_routes,
        officers = summary.total_officers,
        coverage_pct = summary.coverage_pct,
        coordinated = summary.coordinated_patrols,
        "scheduling run finished"
    );

    Ok(ScheduleReport {
        assignments,
        newly_created_routes,
        created_commitments,
        summary,
    })
}

fn validate_request(request: &ScheduleRequest) -> Result<(), EngineError> {
    if !(MIN_MAX_ROUTES..=MAX_MAX_ROUTES).contains(&request.max_routes) {
        return Err(EngineError::InvalidParameter(format!(
            "maximum routes must be between {MIN_MAX_ROUTES} and {MAX_MAX_ROUTES}, got {}",
            request.max_routes
        )));
    }
    validate_window(request.window)
}

fn resolve_officers<S: PatrolStore>(
    store: &S,
    request: &ScheduleRequest,
) -> Result<Vec<Officer>, EngineError> {
    if request.officer_ids.is_empty() {
        return Ok(store.candidate_officers()?);
    }

    let mut officers = Vec::with_capacity(request.officer_ids.len());
    for id in &request.officer_ids {
        match store.officer(id)? {
            Some(officer) => officers.push(officer),
            None => {
                return Err(EngineError::InvalidParameter(format!(
                    "unknown officer: {id}"
                )));
            }
        }
    }
    Ok(officers)
}

/// Scores one route, or skips it (logged) when the result is unusable.
fn score_route(
    route: &Route,
    incidents: &[Incident],
    reference: chrono::DateTime<Utc>,
    time_multiplier: f64,
    weights: &ScoringWeights,
) -> Option<RouteScore> {
    // An exact checkpoint/area name match short-circuits the proximity
    // scorer to a fixed priority. Both paths are intentional product
    // behavior.
    let exact_match = incidents.iter().any(|incident| {
        incident.status.is_open()
            && route
                .checkpoints
                .iter()
                .any(|cp| area_matches_exactly(&cp.name, incident.area.as_deref()))
    });

    let incident_priority = if exact_match {
        PriorityScore::exact_match()
    } else {
        scoring::incident_priority(route, incidents, reference)
    };
    let efficiency = scoring::route_efficiency(route);

    let score = finite_or_zero(incident_priority.priority) * weights.incident_priority
        + finite_or_zero(efficiency.efficiency) * weights.route_efficiency
        + finite_or_zero(time_multiplier) * weights.time_of_day;

    if !score.is_finite() {
        warn!(route = %route.name, "route scoring produced a non-finite result, skipping");
        return None;
    }

    Some(RouteScore {
        route: route.clone(),
        score,
        incident_priority,
        efficiency,
        time_multiplier,
    })
}

fn officer_states<S: PatrolStore>(
    store: &S,
    officers: &[Officer],
    window: TimeWindow,
) -> Result<Vec<OfficerState>, EngineError> {
    let since = window.start - Duration::days(RECENT_COMPLETION_DAYS);

    let mut states = Vec::with_capacity(officers.len());
    for officer in officers {
        let blocking = store.blocking_commitments(&officer.id, window)?;
        let recent = store.completed_since(&officer.id, since)?;
        let workload_score = ACTIVE_COMMITMENT_WEIGHT * blocking.len() as f64
            + RECENT_COMPLETION_WEIGHT * recent as f64;

        states.push(OfficerState {
            officer: officer.clone(),
            slots: free_slots(window, &blocking),
            workload_score,
            active_commitments: blocking.len(),
            recent_completions: recent,
            assigned: 0,
        });
    }
    Ok(states)
}

/// Greedy seat assignment over the ranked candidate routes.
///
/// Routes ranked inside `coordinated_limit` may take two officers. Each
/// seat picks the (officer, slot) pair with the highest penalized score
/// among slots long enough for the route; the chosen sub-interval is carved
/// out before the next seat is considered.
fn assign_seats(
    candidates: &[RouteScore],
    officer_states: &mut [OfficerState],
    coordinated_limit: usize,
    config: &EngineConfig,
) -> Vec<Assignment> {
    let mut assignments = Vec::new();

    for (rank, candidate) in candidates.iter().enumerate() {
        let seats = if rank < coordinated_limit { 2 } else { 1 };
        let duration = Duration::minutes(candidate.efficiency.duration_minutes.max(1));

        let mut taken: Vec<usize> = Vec::new();
        let mut route_assignments: Vec<Assignment> = Vec::new();

        for _ in 0..seats {
            let mut best: Option<(usize, f64)> = None;
            for (index, state) in officer_states.iter().enumerate() {
                if taken.contains(&index) {
                    continue;
                }
                if !state.slots.iter().any(|s| s.duration() >= duration) {
                    continue;
                }

                let adjusted = candidate.score
                    * (1.0
                        - state.workload_score * config.workload_penalty
                        - state.assigned as f64 * config.assigned_count_penalty);
                if best.map(|(_, score)| adjusted > score).unwrap_or(true) {
                    best = Some((index, adjusted));
                }
            }

            let Some((index, adjusted)) = best else {
                break;
            };

            let state = &mut officer_states[index];
            // Earliest fitting slot; slots are chronological.
            let Some(slot) = state
                .slots
                .iter()
                .find(|s| s.duration() >= duration)
                .copied()
            else {
                break;
            };

            let used = TimeWindow::new(slot.start, slot.start + duration);
            carve(&mut state.slots, used);
            state.assigned += 1;
            taken.push(index);

            route_assignments.push(Assignment {
                route_id: candidate.route.id.clone(),
                route_name: candidate.route.name.clone(),
                officer_id: state.officer.id.clone(),
                officer_name: state.officer.name.clone(),
                score: adjusted,
                incident_priority: candidate.incident_priority,
                efficiency: candidate.efficiency,
                time_multiplier: candidate.time_multiplier,
                window: used,
                coordinated: false,
                workload_score: state.workload_score,
                active_commitments: state.active_commitments,
                recent_completions: state.recent_completions,
            });
        }

        let coordinated = route_assignments.len() > 1;
        for mut assignment in route_assignments {
            assignment.coordinated = coordinated;
            assignments.push(assignment);
        }
    }

    assignments
}

/// Writes one combined commitment per assigned route.
fn materialize<S: PatrolStore>(
    store: &S,
    assignments: &[Assignment],
) -> Result<Vec<PatrolCommitment>, EngineError> {
    let mut groups: Vec<(String, Vec<&Assignment>)> = Vec::new();
    for assignment in assignments {
        match groups.iter_mut().find(|(id, _)| *id == assignment.route_id) {
            Some((_, members)) => members.push(assignment),
            None => groups.push((assignment.route_id.clone(), vec![assignment])),
        }
    }

    let mut created = Vec::with_capacity(groups.len());
    for (route_id, members) in groups {
        let start = members
            .iter()
            .map(|a| a.window.start)
            .min()
            .unwrap_or_default();
        let end = members
            .iter()
            .map(|a| a.window.end)
            .max()
            .unwrap_or_default();
        let coordinated = members.len() > 1;
        let nearby_incidents: usize = members
            .iter()
            .map(|a| a.incident_priority.incident_count)
            .sum();

        let route_name = members
            .first()
            .map(|a| a.route_name.as_str())
            .unwrap_or_default();
        let title = if coordinated {
            format!("AI Patrol - {route_name} (Team Patrol)")
        } else {
            format!("AI Patrol - {route_name}")
        };

        let commitment = PatrolCommitment {
            id: format!("patrol-{route_id}-{}", start.timestamp()),
            title,
            route_id,
            officer_ids: members.iter().map(|a| a.officer_id.clone()).collect(),
            window: TimeWindow::new(start, end),
            status: CommitmentStatus::Scheduled,
            priority: if nearby_incidents > 0 {
                CommitmentPriority::High
            } else {
                CommitmentPriority::Medium
            },
            coordinated,
            created_at: Utc::now(),
        };

        store.insert_commitment(&commitment)?;
        created.push(commitment);
    }

    Ok(created)
}

fn summarize(
    assignments: &[Assignment],
    total_routes: usize,
    total_officers: usize,
    candidate_routes: usize,
) -> ScheduleSummary {
    let assigned_routes: HashSet<&str> =
        assignments.iter().map(|a| a.route_id.as_str()).collect();
    let assigned_officers: HashSet<&str> =
        assignments.iter().map(|a| a.officer_id.as_str()).collect();

    let coverage_pct = if candidate_routes > 0 {
        assigned_routes.len() as f64 / candidate_routes as f64 * 100.0
    } else {
        0.0
    };
    let utilization_pct = if total_officers > 0 {
        assigned_officers.len() as f64 / total_officers as f64 * 100.0
    } else {
        0.0
    };
    let average_score = if assignments.is_empty() {
        0.0
    } else {
        assignments.iter().map(|a| a.score).sum::<f64>() / assignments.len() as f64
    };
    let coordinated_patrols = assigned_routes
        .iter()
        .filter(|route_id| {
            assignments
                .iter()
                .filter(|a| a.route_id == **route_id)
                .count()
                > 1
        })
        .count();

    ScheduleSummary {
        total_assignments: assignments.len(),
        total_routes,
        total_officers,
        coverage_pct,
        utilization_pct,
        average_score,
        coordinated_patrols,
    }
}

fn empty_report(newly_created_routes: Vec<Route>, total_officers: usize) -> ScheduleReport {
    ScheduleReport {
        assignments: Vec::new(),
        newly_created_routes,
        created_commitments: Vec::new(),
        summary: ScheduleSummary {
            total_officers,
            ..ScheduleSummary::default()
        },
    }
}
