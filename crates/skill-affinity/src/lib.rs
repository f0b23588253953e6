//! Weighted affinity scoring between an organization's desired traits and a
//! candidate's self-rated traits.
//!
//! [`affinity`] holds the scoring engine. The remaining modules are the
//! collaborators around it: [`intake`] builds and imports rated sets,
//! [`ranking`] scores candidate pools, [`report`] renders results and
//! [`router`] exposes everything over HTTP.

pub mod affinity;
pub mod config;
pub mod error;
pub mod intake;
pub mod ranking;
pub mod report;
pub mod router;
pub mod telemetry;

pub use affinity::{
    compute_affinity, AffinityEngine, AffinityLevel, AffinityResult, AttributeWeight,
    RatedAttributeSet,
};
