//! patrol-planner core engine
//!
//! Scores patrol routes against open incidents, computes officer
//! availability through interval subtraction, synthesizes response routes
//! for uncovered incident areas, and greedily matches officers to routes
//! with load balancing and conflict avoidance. Persistence, auth and any
//! HTTP surface are external collaborators behind [`store::PatrolStore`].

pub mod availability;
pub mod conflict;
pub mod coverage;
pub mod engine;
pub mod error;
pub mod geo;
pub mod lifecycle;
pub mod memory;
pub mod model;
pub mod scoring;
pub mod store;
