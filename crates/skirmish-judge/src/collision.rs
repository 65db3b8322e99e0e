//! The collision attribution engine.
//!
//! Drives the pairwise collision model once per tick through four strictly
//! ordered phases: refresh CPA predictions, flag potential collisions, match
//! queued physics contacts to flagged pairs, and settle confirmed collisions
//! after a delay long enough for secondary destruction to finish. Settlement
//! continuations and combatant removals are explicit scheduled entries that
//! re-validate before acting, so a cleared pair or a reset match makes them
//! no-op instead of misfiring.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use skirmish_core::config::MatchConfig;
use skirmish_core::events::MatchEvent;

use crate::arena::ArenaSnapshot;
use crate::cpa;
use crate::ledger::CombatLedger;
use crate::pairs::{PairKey, PairMap};

/// A queued physics contact, held until the confirmation phase of the tick.
#[derive(Debug, Clone)]
struct ContactReport {
    owner: String,
    time: f64,
}

/// A settlement continuation scheduled at confirmation time.
#[derive(Debug, Clone)]
struct PendingSettlement {
    key: PairKey,
    /// Generation of the pair when scheduled; a mismatch means the pair was
    /// cleared in the meantime and the settlement is stale.
    generation: u64,
    due: f64,
}

/// Deferred cleanup for a combatant that left while a collision was in flight.
#[derive(Debug, Clone)]
struct PendingRemoval {
    id: String,
    due: f64,
}

#[derive(Debug, Default)]
pub struct CollisionEngine {
    config: MatchConfig,
    pairs: PairMap,
    tracked: HashSet<String>,
    contacts: Vec<ContactReport>,
    settlements: Vec<PendingSettlement>,
    removals: Vec<PendingRemoval>,
}

impl CollisionEngine {
    pub fn new(config: MatchConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Reset for a new match: track everyone in the snapshot, drop all
    /// in-flight contacts, settlements, and removals.
    pub fn configure(&mut self, arena: &ArenaSnapshot) {
        self.pairs.clear();
        self.tracked = arena.ids().map(str::to_string).collect();
        self.contacts.clear();
        self.settlements.clear();
        self.removals.clear();
        let ids: Vec<&str> = arena.ids().collect();
        for id in &ids {
            self.pairs
                .insert_combatant(id, ids.iter().copied().filter(|o| o != id), arena.time);
        }
    }

    /// Start tracking a combatant that joined mid-match.
    pub fn add_combatant(&mut self, id: &str, now: f64) -> bool {
        if !self.tracked.insert(id.to_string()) {
            return false;
        }
        let others: Vec<String> = self
            .tracked
            .iter()
            .filter(|o| o.as_str() != id)
            .cloned()
            .collect();
        self.pairs
            .insert_combatant(id, others.iter().map(String::as_str), now);
        true
    }

    /// Stop tracking a combatant. Pair records are dropped immediately when
    /// idle; while a potential or confirmed collision is in flight the
    /// cleanup is deferred so settlement can still credit the leaver.
    pub fn remove_combatant(&mut self, id: &str, now: f64) -> bool {
        if !self.tracked.remove(id) {
            return false;
        }
        let in_flight = self.pairs.keys_involving(id).iter().any(|key| {
            self.pairs
                .record(key)
                .map(|rec| rec.potential_collision || rec.collision_detected)
                .unwrap_or(false)
        });
        if in_flight {
            self.removals.push(PendingRemoval {
                id: id.to_string(),
                due: now + self.config.potential_stale_after() + self.config.settling_delay,
            });
        } else {
            self.pairs.remove_combatant(id);
        }
        true
    }

    /// Queue a physics contact (already resolved to a ledger name) for the
    /// confirmation phase of the next tick.
    pub fn report_contact(&mut self, owner: &str, time: f64) {
        self.contacts.push(ContactReport {
            owner: owner.to_string(),
            time,
        });
    }

    pub fn pairs(&self) -> &PairMap {
        &self.pairs
    }

    /// One fixed simulation step. Phase order is a hard guarantee: every
    /// prediction refreshes before any flagging, and all flagging completes
    /// before any confirmation or settlement runs.
    pub fn tick(
        &mut self,
        now: f64,
        arena: &ArenaSnapshot,
        ledger: &mut CombatLedger,
        events: &mut Vec<MatchEvent>,
    ) {
        self.refresh_predictions(now, arena);
        self.flag_potential_collisions(now, arena, events);
        self.process_contacts(now, arena, events);
        self.settle_due(now, arena, ledger, events);
        self.process_removals(now);
    }

    /// Phase 1: adaptive CPA polling. A pair is re-predicted only once half
    /// of its previously predicted time-to-CPA has elapsed; missing
    /// combatants are forced to the horizon so they stop being polled
    /// without vanishing from in-flight attribution.
    fn refresh_predictions(&mut self, now: f64, arena: &ArenaSnapshot) {
        let horizon = self.config.cpa_horizon;
        for (key, rec) in self.pairs.iter_mut() {
            if now - rec.last_update_time < rec.time_to_cpa / 2.0 {
                continue;
            }
            rec.time_to_cpa = match (arena.state(key.first()), arena.state(key.second())) {
                (Some(a), Some(b)) => cpa::time_to_cpa(
                    a.position.to_dvec3(),
                    a.velocity.to_dvec3(),
                    b.position.to_dvec3(),
                    b.velocity.to_dvec3(),
                    horizon,
                ),
                _ => horizon,
            };
            rec.last_update_time = now;
        }
    }

    /// Phase 2: flag pairs whose predicted approach is imminent and whose
    /// current separation is inside the margin. Snapshots are taken on the
    /// first flag only; ramming intent accumulates stickily while flagged.
    fn flag_potential_collisions(
        &mut self,
        now: f64,
        arena: &ArenaSnapshot,
        events: &mut Vec<MatchEvent>,
    ) {
        let config = &self.config;
        for (key, rec) in self.pairs.iter_mut() {
            if rec.collision_detected {
                continue;
            }
            // Stale flags clear regardless of whether both sides still
            // exist; a continuously re-triggering pair never goes stale.
            if rec.potential_collision
                && now - rec.potential_collision_detection_time > config.potential_stale_after()
            {
                rec.clear_collision_state();
                continue;
            }
            let (Some(a), Some(b)) = (arena.state(key.first()), arena.state(key.second())) else {
                // Partner gone: the flag stays for the destroyed-partner
                // inference in phase 3 until the stale timer clears it.
                continue;
            };

            let triggered = rec.time_to_cpa < config.potential_window && {
                let threshold = config.potential_margin * (a.radius + b.radius);
                a.position.sqr_range_to(&b.position) < threshold * threshold
            };

            if triggered {
                if !rec.potential_collision {
                    rec.potential_collision = true;
                    rec.sides[0].part_count = a.part_count;
                    rec.sides[0].radius = a.radius;
                    rec.sides[0].angle_to_com_deg = cpa::approach_angle_deg(
                        a.velocity.to_dvec3(),
                        a.position.to_dvec3(),
                        b.position.to_dvec3(),
                    );
                    rec.sides[1].part_count = b.part_count;
                    rec.sides[1].radius = b.radius;
                    rec.sides[1].angle_to_com_deg = cpa::approach_angle_deg(
                        b.velocity.to_dvec3(),
                        b.position.to_dvec3(),
                        a.position.to_dvec3(),
                    );
                    events.push(MatchEvent::PotentialCollision {
                        a: key.first().to_string(),
                        b: key.second().to_string(),
                    });
                    debug!(a = key.first(), b = key.second(), "potential collision");
                }
                rec.potential_collision_detection_time = now;
            }

            if rec.potential_collision {
                rec.sides[0].ram_intent |= a.ram_intent;
                rec.sides[1].ram_intent |= b.ram_intent;
            }
        }
    }

    /// Phase 3: match queued physics contacts against flagged pairs.
    fn process_contacts(&mut self, now: f64, arena: &ArenaSnapshot, events: &mut Vec<MatchEvent>) {
        let contacts = std::mem::take(&mut self.contacts);
        for contact in contacts {
            self.match_contact(&contact, now, arena, events);
        }
    }

    fn match_contact(
        &mut self,
        contact: &ContactReport,
        now: f64,
        arena: &ArenaSnapshot,
        events: &mut Vec<MatchEvent>,
    ) {
        let owner = contact.owner.as_str();
        let keys = self.pairs.keys_involving(owner);
        let flagged: Vec<PairKey> = keys
            .into_iter()
            .filter(|key| {
                self.pairs
                    .record(key)
                    .map(|rec| rec.potential_collision && !rec.collision_detected)
                    .unwrap_or(false)
            })
            .collect();
        if flagged.is_empty() {
            return;
        }

        let owner_state = arena.state(owner);

        // Living flagged partners within the confirmation margin.
        let mut matched = Vec::new();
        // Flagged partners destroyed since flagging.
        let mut destroyed = Vec::new();
        for key in &flagged {
            let Some(partner) = key.other(owner) else { continue };
            match (owner_state, arena.state(partner)) {
                (Some(own), Some(other)) => {
                    let rec = self.pairs.record(key).unwrap();
                    let combined = rec.sides[0].radius + rec.sides[1].radius;
                    let threshold = self.config.confirm_margin * combined;
                    let sqr_sep = own.position.sqr_range_to(&other.position);
                    if sqr_sep < threshold * threshold {
                        matched.push((key.clone(), sqr_sep));
                    }
                }
                _ => destroyed.push(key.clone()),
            }
        }

        if !matched.is_empty() {
            // Multiple matches are a rare multi-body pile-up; confirm all.
            for (key, sqr_sep) in matched {
                self.confirm_pair(&key, sqr_sep, contact.time, now, arena, events);
            }
        } else if !destroyed.is_empty() {
            // Nothing living matched, but a flagged partner has been
            // destroyed since flagging: credit the destroyed partner.
            for key in destroyed {
                let rec = self.pairs.record(&key).unwrap();
                let combined = rec.sides[0].radius + rec.sides[1].radius;
                let assumed = self.config.confirm_margin * combined;
                self.confirm_pair(&key, assumed * assumed, contact.time, now, arena, events);
            }
        } else {
            // The contact was with something outside the tracked set
            // (debris, terrain): clear the flags without awarding a ram.
            for key in &flagged {
                if let Some(rec) = self.pairs.record_mut(key) {
                    rec.clear_collision_state();
                }
            }
            debug!(owner, "contact matched nothing tracked, flags cleared");
        }
    }

    fn confirm_pair(
        &mut self,
        key: &PairKey,
        sqr_distance: f64,
        contact_time: f64,
        now: f64,
        arena: &ArenaSnapshot,
        events: &mut Vec<MatchEvent>,
    ) {
        let Some(rec) = self.pairs.record_mut(key) else { return };
        rec.collision_detected = true;
        rec.collision_detected_time = contact_time;
        rec.sqr_distance = sqr_distance;
        // Part counts at the moment of contact; a side already destroyed
        // falls back to its flag-time snapshot.
        rec.sides[0].part_count_just_prior = arena
            .state(key.first())
            .map(|s| s.part_count)
            .unwrap_or(rec.sides[0].part_count);
        rec.sides[1].part_count_just_prior = arena
            .state(key.second())
            .map(|s| s.part_count)
            .unwrap_or(rec.sides[1].part_count);
        self.settlements.push(PendingSettlement {
            key: key.clone(),
            generation: rec.generation,
            due: now + self.config.settling_delay,
        });
        events.push(MatchEvent::CollisionConfirmed {
            a: key.first().to_string(),
            b: key.second().to_string(),
        });
        debug!(a = key.first(), b = key.second(), "collision confirmed");
    }

    /// Phase 4: settle every due confirmation as one batch and attribute
    /// part losses to the correct rammer.
    fn settle_due(
        &mut self,
        now: f64,
        arena: &ArenaSnapshot,
        ledger: &mut CombatLedger,
        events: &mut Vec<MatchEvent>,
    ) {
        if self.settlements.is_empty() {
            return;
        }
        let (due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.settlements)
            .into_iter()
            .partition(|s| s.due <= now);
        self.settlements = pending;
        if due.is_empty() {
            return;
        }

        // Validate against staleness: the pair must still exist, still be
        // confirmed, and be the same generation the timer was created under.
        let mut batch: Vec<PendingSettlement> = Vec::new();
        for settlement in due {
            match self.pairs.record(&settlement.key) {
                Some(rec)
                    if rec.collision_detected && rec.generation == settlement.generation =>
                {
                    batch.push(settlement)
                }
                _ => debug!(
                    a = settlement.key.first(),
                    b = settlement.key.second(),
                    "stale settlement skipped"
                ),
            }
        }
        if batch.is_empty() {
            return;
        }

        let current_count = |id: &str| arena.state(id).map(|s| s.part_count).unwrap_or(0);

        // Raw per-pair losses, for the spurious-claim filter.
        let raw_loss = |key: &PairKey, side: usize| -> u32 {
            let rec = self.pairs.record(key).unwrap();
            let id = if side == 0 { key.first() } else { key.second() };
            rec.sides[side]
                .part_count_just_prior
                .saturating_sub(current_count(id))
        };

        // When one combatant has several candidate collisions in the batch,
        // partners that lost nothing while another candidate lost parts are
        // spurious proximity matches and their claims are discarded.
        let mut involved: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, settlement) in batch.iter().enumerate() {
            involved
                .entry(settlement.key.first().to_string())
                .or_default()
                .push(idx);
            involved
                .entry(settlement.key.second().to_string())
                .or_default()
                .push(idx);
        }
        let mut discarded: HashSet<usize> = HashSet::new();
        for (id, indices) in &involved {
            if indices.len() < 2 {
                continue;
            }
            let partner_losses: Vec<(usize, u32)> = indices
                .iter()
                .map(|&idx| {
                    let key = &batch[idx].key;
                    let partner_side = if key.first() == id { 1 } else { 0 };
                    (idx, raw_loss(key, partner_side))
                })
                .collect();
            if partner_losses.iter().any(|&(_, loss)| loss > 0) {
                for &(idx, loss) in &partner_losses {
                    if loss == 0 {
                        discarded.insert(idx);
                    }
                }
            }
        }

        // Ascending separation at confirmation: the closest, least-ambiguous
        // candidate consumes the lost-part count first.
        let mut order: Vec<usize> = (0..batch.len()).filter(|i| !discarded.contains(i)).collect();
        order.sort_by(|&x, &y| {
            let dx = self.pairs.record(&batch[x].key).unwrap().sqr_distance;
            let dy = self.pairs.record(&batch[y].key).unwrap().sqr_distance;
            dx.partial_cmp(&dy).unwrap_or(std::cmp::Ordering::Equal)
        });

        // Losses already consumed by an earlier pair in the batch must not be
        // double-counted: once a combatant's pair settles, its baseline drops
        // to the live count.
        let mut baseline: HashMap<String, u32> = HashMap::new();
        for idx in order {
            let key = batch[idx].key.clone();
            let rec = self.pairs.record(&key).unwrap().clone();
            let first = key.first().to_string();
            let second = key.second().to_string();

            let prior_first = *baseline
                .entry(first.clone())
                .or_insert(rec.sides[0].part_count_just_prior);
            let prior_second = *baseline
                .entry(second.clone())
                .or_insert(rec.sides[1].part_count_just_prior);
            let loss_first = prior_first.saturating_sub(current_count(&first));
            let loss_second = prior_second.saturating_sub(current_count(&second));

            let contact_time = rec.collision_detected_time;
            let tolerance = self.config.head_on_tolerance_deg;
            let angle_first = rec.sides[0].angle_to_com_deg;
            let angle_second = rec.sides[1].angle_to_com_deg;

            let rammer_side = match (rec.sides[0].ram_intent, rec.sides[1].ram_intent) {
                (true, false) => Some(0),
                (false, true) => Some(1),
                // Both or neither declared intent: decide by approach angle.
                _ if angle_first <= tolerance && angle_second <= tolerance => None,
                _ if angle_first <= angle_second => Some(0),
                _ => Some(1),
            };

            match rammer_side {
                None => {
                    // Mutual head-on: both sides are credited against each
                    // other with the other side's losses.
                    ledger.register_ram(&first, &second, contact_time, loss_second);
                    ledger.register_ram(&second, &first, contact_time, loss_first);
                    events.push(MatchEvent::RamAttributed {
                        rammer: first.clone(),
                        rammed: second.clone(),
                        parts_lost: loss_second,
                        head_on: true,
                    });
                    events.push(MatchEvent::RamAttributed {
                        rammer: second.clone(),
                        rammed: first.clone(),
                        parts_lost: loss_first,
                        head_on: true,
                    });
                }
                Some(side) => {
                    let (rammer, rammed, parts_lost) = if side == 0 {
                        (first.clone(), second.clone(), loss_second)
                    } else {
                        (second.clone(), first.clone(), loss_first)
                    };
                    ledger.register_ram(&rammer, &rammed, contact_time, parts_lost);
                    events.push(MatchEvent::RamAttributed {
                        rammer,
                        rammed,
                        parts_lost,
                        head_on: false,
                    });
                }
            }

            baseline.insert(first.clone(), current_count(&first));
            baseline.insert(second.clone(), current_count(&second));
            if let Some(rec) = self.pairs.record_mut(&key) {
                rec.clear_collision_state();
            }
        }

        // Discarded claims still clear, so they are not re-settled later.
        for idx in discarded {
            if let Some(rec) = self.pairs.record_mut(&batch[idx].key) {
                rec.clear_collision_state();
            }
            warn!(
                a = batch[idx].key.first(),
                b = batch[idx].key.second(),
                "spurious collision claim discarded"
            );
        }
    }

    /// Deferred cleanup of combatants that left while attribution was in
    /// flight. By the time the entry is due, settlement has either fired or
    /// gone stale, so the pairs can go.
    fn process_removals(&mut self, now: f64) {
        if self.removals.is_empty() {
            return;
        }
        let (due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.removals)
            .into_iter()
            .partition(|r| r.due <= now);
        self.removals = pending;
        for removal in due {
            // Re-joining under the same name cancels the deferred cleanup.
            if self.tracked.contains(&removal.id) {
                continue;
            }
            // Re-validate before acting: a confirmation that arrived while
            // this entry was pending still needs its settlement.
            let still_confirmed = self.pairs.keys_involving(&removal.id).iter().any(|key| {
                self.pairs
                    .record(key)
                    .map(|rec| rec.collision_detected)
                    .unwrap_or(false)
            });
            if still_confirmed {
                self.removals.push(PendingRemoval {
                    id: removal.id,
                    due: now + self.config.settling_delay,
                });
            } else {
                self.pairs.remove_combatant(&removal.id);
            }
        }
    }
}
