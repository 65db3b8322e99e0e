//! Match result rendering.
//!
//! Produces the flat, line-oriented, colon-delimited report external tooling
//! parses. Field order and separators are a contract: tournament scrapers
//! key on the line prefixes, so any change here breaks them.

use std::collections::BTreeMap;

use skirmish_core::enums::{AliveState, DamageFrom, GmKillReason};
use skirmish_core::scoring::ScoringData;

use crate::arena::ArenaSnapshot;
use crate::ledger::CombatLedger;

/// Render the result report from the ledger and the final arena state.
pub fn render(ledger: &CombatLedger, final_arena: &ArenaSnapshot) -> Vec<String> {
    let mut lines = Vec::new();

    // Sorted views keep the output deterministic regardless of map order.
    let scores: BTreeMap<&str, &ScoringData> = ledger
        .scores()
        .iter()
        .map(|(name, data)| (name.as_str(), data))
        .collect();

    let alive: Vec<&str> = scores
        .iter()
        .filter(|(name, data)| data.is_alive() && final_arena.contains(name))
        .map(|(name, _)| *name)
        .collect();
    let missing: Vec<&str> = scores
        .iter()
        .filter(|(name, data)| data.is_alive() && !final_arena.contains(name))
        .map(|(name, _)| *name)
        .collect();

    lines.push(outcome_line(&scores, &alive));

    for name in &alive {
        lines.push(format!("ALIVE:{name}"));
    }

    let mut dead: Vec<(&str, &ScoringData)> = scores
        .iter()
        .filter(|(_, data)| !data.is_alive())
        .map(|(name, data)| (*name, *data))
        .collect();
    dead.sort_by_key(|(_, data)| data.death_order);
    for (name, data) in &dead {
        lines.push(format!(
            "DEAD:{}:{:.1}:{}",
            data.death_order, data.death_time, name
        ));
    }

    for name in &missing {
        lines.push(format!("MIA:{name}"));
    }

    // Per-victim attacker breakdowns, one category per line.
    for (name, data) in &scores {
        push_count_line(&mut lines, "WHOSHOTME", name, &data.hit_counts);
        push_amount_line(&mut lines, "WHODAMAGEDMEWITHGUNS", name, &data.damage_from_guns);
        push_count_line(
            &mut lines,
            "WHOSTRUCKMEWITHROCKETS",
            name,
            &data.rocket_strike_counts,
        );
        push_count_line(
            &mut lines,
            "WHOPARTSHITMEWITHROCKETS",
            name,
            &data.rocket_part_damage_counts,
        );
        push_amount_line(
            &mut lines,
            "WHODAMAGEDMEWITHROCKETS",
            name,
            &data.damage_from_rockets,
        );
        push_count_line(
            &mut lines,
            "WHOSTRUCKMEWITHMISSILES",
            name,
            &data.missile_hit_counts,
        );
        push_count_line(
            &mut lines,
            "WHOPARTSHITMEWITHMISSILES",
            name,
            &data.missile_part_damage_counts,
        );
        push_amount_line(
            &mut lines,
            "WHODAMAGEDMEWITHMISSILES",
            name,
            &data.damage_from_missiles,
        );
        push_count_line(&mut lines, "WHORAMMEDME", name, &data.ramming_part_loss_counts);
        push_amount_line(
            &mut lines,
            "WHODAMAGEDMEWITHBATTLEDAMAGE",
            name,
            &data.battle_damage_from,
        );
    }

    for (name, data) in &scores {
        if data.gm_kill_reason.is_gm_kill() {
            lines.push(format!(
                "GMKILL:{}:{}",
                name,
                gm_reason_tag(data.gm_kill_reason)
            ));
        }
    }

    // Special-kill callouts, tagged by the final damage category.
    for (name, data) in &scores {
        match data.alive_state {
            AliveState::CleanKill => lines.push(format!(
                "{}:{}:{}",
                clean_kill_tag(data.last_damage_was_from),
                name,
                data.last_person_who_damaged_me
            )),
            AliveState::HeadShot => lines.push(format!(
                "HEADSHOT:{}:{}",
                name, data.last_person_who_damaged_me
            )),
            AliveState::KillSteal => lines.push(format!(
                "KILLSTEAL:{}:{}",
                name, data.last_person_who_damaged_me
            )),
            _ => {}
        }
    }

    for (name, data) in &scores {
        lines.push(format!("HP:{}:{:.1}", name, data.remaining_health));
    }

    for (name, data) in &scores {
        lines.push(format!(
            "ACCURACY:{}:{}/{}:{}/{}",
            name,
            data.hits_landed,
            data.shots_fired,
            data.rocket_strikes_landed,
            data.rockets_fired
        ));
    }

    lines
}

/// Overall outcome: everyone dead, a single surviving team, or a draw
/// between several.
fn outcome_line(scores: &BTreeMap<&str, &ScoringData>, alive: &[&str]) -> String {
    if alive.is_empty() {
        return "RESULT:MUTUALANNIHILATION".to_string();
    }
    let mut teams: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for name in alive {
        let team = scores.get(name).map(|d| d.team.as_str()).unwrap_or("");
        teams.entry(team).or_default().push(name);
    }
    if teams.len() == 1 {
        let (team, members) = teams.iter().next().unwrap();
        format!("RESULT:WIN:{}:{}", team, members.join(";"))
    } else {
        let parts: Vec<String> = teams
            .iter()
            .map(|(team, members)| format!("{}={}", team, members.join(";")))
            .collect();
        format!("RESULT:DRAW:{}", parts.join(":"))
    }
}

fn push_count_line(
    lines: &mut Vec<String>,
    prefix: &str,
    victim: &str,
    counts: &std::collections::HashMap<String, u32>,
) {
    if counts.is_empty() {
        return;
    }
    let sorted: BTreeMap<&str, u32> = counts.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    let entries: Vec<String> = sorted
        .iter()
        .map(|(attacker, count)| format!("{count}:{attacker}"))
        .collect();
    lines.push(format!("{}:{}:{}", prefix, victim, entries.join(";")));
}

fn push_amount_line(
    lines: &mut Vec<String>,
    prefix: &str,
    victim: &str,
    amounts: &std::collections::HashMap<String, f64>,
) {
    if amounts.is_empty() {
        return;
    }
    let sorted: BTreeMap<&str, f64> = amounts.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    let entries: Vec<String> = sorted
        .iter()
        .map(|(attacker, amount)| format!("{amount:.1}:{attacker}"))
        .collect();
    lines.push(format!("{}:{}:{}", prefix, victim, entries.join(";")));
}

fn clean_kill_tag(category: DamageFrom) -> &'static str {
    match category {
        DamageFrom::Rockets => "CLEANFRAG",
        DamageFrom::Missiles => "CLEANMISSILEKILL",
        DamageFrom::Ramming => "CLEANRAM",
        _ => "CLEANKILL",
    }
}

fn gm_reason_tag(reason: GmKillReason) -> &'static str {
    match reason {
        GmKillReason::Gm => "GM",
        GmKillReason::OutOfAmmo => "OutOfAmmo",
        GmKillReason::LandedTooLong => "LandedTooLong",
        GmKillReason::None => "",
    }
}
