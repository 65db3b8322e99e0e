//! Enumeration types used throughout the adjudicator.

use serde::{Deserialize, Serialize};

/// Life status of a combatant, with the kill classification folded in.
/// Terminal once non-Alive: no further damage registrations are accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AliveState {
    #[default]
    Alive,
    /// Died within the head-shot window of its first and only attacker.
    CleanKill,
    /// Died within the head-shot window, earlier attackers long gone.
    HeadShot,
    /// Died within the head-shot window, but an earlier attacker had
    /// softened it up recently.
    KillSteal,
    /// Died outside the head-shot window of the last attacker.
    AssistedKill,
    /// Died without being damaged by anyone (or by GM order).
    Dead,
}

impl AliveState {
    /// Special kills get a callout in the result report.
    pub fn is_special_kill(self) -> bool {
        matches!(
            self,
            AliveState::CleanKill | AliveState::HeadShot | AliveState::KillSteal
        )
    }
}

/// Damage category of the most recent damage a combatant took.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageFrom {
    /// Never damaged by anyone.
    #[default]
    None,
    Guns,
    Rockets,
    Missiles,
    Ramming,
    /// Died undamaged — flying into the ground counts as this.
    Incompetence,
}

/// Reason the GM (rather than another combatant) ordered a kill.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GmKillReason {
    /// Not a GM kill.
    #[default]
    None,
    /// Direct GM intervention.
    Gm,
    /// Exceeded the out-of-ammo kill time.
    OutOfAmmo,
    /// Stayed landed beyond the allowed time.
    LandedTooLong,
}

impl GmKillReason {
    pub fn is_gm_kill(self) -> bool {
        self != GmKillReason::None
    }
}

/// Lifecycle of a tracked combatant pair in the collision engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionPhase {
    /// No imminent closest approach.
    #[default]
    Idle,
    /// Close enough, soon enough, to possibly collide.
    PotentialCollision,
    /// A physics contact was matched to this pair; settlement pending.
    Confirmed,
}

/// Top-level match state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    #[default]
    Pending,
    Running,
    Ended,
}
