//! The pairwise collision model: one shared record per unordered pair.
//!
//! The original shape for this kind of tracking is a nested map of mirrored
//! per-direction entries that must be kept in sync by hand. Keying an
//! adjacency map by a canonicalized (sorted) pair and storing a single record
//! makes the symmetry invariant structural: a lookup from either side lands
//! on the same data.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use skirmish_core::enums::CollisionPhase;

/// Canonical unordered pair of combatant ids (`first < second`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PairKey {
    first: String,
    second: String,
}

impl PairKey {
    /// Build a canonical key. A self-pair is structurally impossible and
    /// yields `None`.
    pub fn new(a: &str, b: &str) -> Option<Self> {
        match a.cmp(b) {
            std::cmp::Ordering::Less => Some(Self {
                first: a.to_string(),
                second: b.to_string(),
            }),
            std::cmp::Ordering::Greater => Some(Self {
                first: b.to_string(),
                second: a.to_string(),
            }),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn first(&self) -> &str {
        &self.first
    }

    pub fn second(&self) -> &str {
        &self.second
    }

    pub fn contains(&self, id: &str) -> bool {
        self.first == id || self.second == id
    }

    /// Side index of `id` within this pair (0 = first, 1 = second).
    pub fn side_of(&self, id: &str) -> Option<usize> {
        if self.first == id {
            Some(0)
        } else if self.second == id {
            Some(1)
        } else {
            None
        }
    }

    /// The other member of the pair.
    pub fn other(&self, id: &str) -> Option<&str> {
        match self.side_of(id)? {
            0 => Some(&self.second),
            _ => Some(&self.first),
        }
    }
}

/// Per-side data within a pair record, indexed by the key's side order.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SideData {
    /// Part count snapshotted when the potential collision was first flagged.
    pub part_count: u32,
    /// Radius snapshotted at the same moment.
    pub radius: f64,
    /// Approach angle (velocity vs. the other side's center of mass, degrees)
    /// snapshotted at the same moment. Used for head-on detection.
    pub angle_to_com_deg: f64,
    /// Part count snapshotted at collision confirmation.
    pub part_count_just_prior: u32,
    /// Sticky: this side expressed ramming intent between potential-collision
    /// detection and confirmation.
    pub ram_intent: bool,
}

/// Shared state for one unordered combatant pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairRecord {
    /// Bumped whenever collision state is cleared; scheduled settlements
    /// carry the generation they were created under and no-op on mismatch.
    pub generation: u64,
    /// Predicted time to closest approach (seconds; horizon = not imminent).
    pub time_to_cpa: f64,
    /// When the prediction was last refreshed.
    pub last_update_time: f64,
    pub potential_collision: bool,
    pub potential_collision_detection_time: f64,
    pub collision_detected: bool,
    pub collision_detected_time: f64,
    /// Squared separation at confirmation; orders settlement batches.
    pub sqr_distance: f64,
    pub sides: [SideData; 2],
}

impl PairRecord {
    pub fn new(now: f64) -> Self {
        Self {
            generation: 0,
            // Zero forces a prediction on the next refresh pass.
            time_to_cpa: 0.0,
            last_update_time: now,
            potential_collision: false,
            potential_collision_detection_time: -1.0,
            collision_detected: false,
            collision_detected_time: -1.0,
            sqr_distance: 0.0,
            sides: [SideData::default(); 2],
        }
    }

    pub fn phase(&self) -> CollisionPhase {
        if self.collision_detected {
            CollisionPhase::Confirmed
        } else if self.potential_collision {
            CollisionPhase::PotentialCollision
        } else {
            CollisionPhase::Idle
        }
    }

    /// Reset collision tracking and invalidate any scheduled settlement.
    pub fn clear_collision_state(&mut self) {
        self.potential_collision = false;
        self.collision_detected = false;
        self.potential_collision_detection_time = -1.0;
        self.collision_detected_time = -1.0;
        self.sqr_distance = 0.0;
        for side in &mut self.sides {
            side.ram_intent = false;
        }
        self.generation += 1;
    }
}

/// Adjacency map over all tracked pairs. Ordered so per-tick iteration (and
/// therefore event emission) is deterministic.
#[derive(Debug, Clone, Default)]
pub struct PairMap {
    pairs: BTreeMap<PairKey, PairRecord>,
}

impl PairMap {
    pub fn clear(&mut self) {
        self.pairs.clear();
    }

    /// Add pair records between `id` and every id in `others`.
    pub fn insert_combatant<'a>(
        &mut self,
        id: &str,
        others: impl Iterator<Item = &'a str>,
        now: f64,
    ) {
        for other in others {
            if let Some(key) = PairKey::new(id, other) {
                self.pairs.entry(key).or_insert_with(|| PairRecord::new(now));
            }
        }
    }

    /// Drop every pair involving `id`.
    pub fn remove_combatant(&mut self, id: &str) {
        self.pairs.retain(|key, _| !key.contains(id));
    }

    pub fn get(&self, a: &str, b: &str) -> Option<&PairRecord> {
        self.pairs.get(&PairKey::new(a, b)?)
    }

    pub fn get_mut(&mut self, a: &str, b: &str) -> Option<&mut PairRecord> {
        self.pairs.get_mut(&PairKey::new(a, b)?)
    }

    pub fn record(&self, key: &PairKey) -> Option<&PairRecord> {
        self.pairs.get(key)
    }

    pub fn record_mut(&mut self, key: &PairKey) -> Option<&mut PairRecord> {
        self.pairs.get_mut(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PairKey, &PairRecord)> {
        self.pairs.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&PairKey, &mut PairRecord)> {
        self.pairs.iter_mut()
    }

    pub fn keys_involving(&self, id: &str) -> Vec<PairKey> {
        self.pairs
            .keys()
            .filter(|key| key.contains(id))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
