//! Headless match harness for SKIRMISH.
//!
//! Stands in for the external collaborators the adjudicator normally hangs
//! off of: a hecs world of flying craft, kinematic integration, sphere
//! overlap contact detection, and scripted weapon fire. Drives a
//! `MatchAdjudicator` once per fixed tick, which makes whole-match
//! adjudication deterministic and testable without a game engine.

pub mod components;
pub mod engine;
pub mod error;
pub mod scenario;
pub mod systems;
pub mod world_setup;

pub use engine::{HarnessConfig, MatchHarness};
pub use error::{Result, SimError};
pub use scenario::Scenario;

#[cfg(test)]
mod tests;
