//! Match adjudication for SKIRMISH: the combat ledger and the collision
//! attribution engine.
//!
//! The crate is completely headless and driven by an external fixed-interval
//! tick: the host simulation owns combatant geometry and control, reports
//! weapon/physics events, and feeds per-tick [`arena::ArenaSnapshot`]s. All
//! scoring and ram-attribution state lives in a per-match
//! [`adjudicator::MatchAdjudicator`] context object.

pub mod adjudicator;
pub mod arena;
pub mod collision;
pub mod cpa;
pub mod ledger;
pub mod pairs;
pub mod reconcile;
pub mod report;

pub use adjudicator::MatchAdjudicator;
pub use arena::{ArenaSnapshot, CombatantState};
