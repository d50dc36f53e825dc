//! Action interpreter: applies one authored action to the roster.
//!
//! RULES:
//!   - Effects are deterministic; nothing here reads a clock or an RNG.
//!   - A failed action changes nothing. The caller logs it and moves on.
//!   - Each applied action is visible to the next one in the same round.
//!
//! Movement is teleport-to-last-waypoint: intermediate waypoints are kept
//! in the data for presentation but are not simulated.
//! Abilities are observational only: no mana is spent, no effect applied.

use crate::{
    error::{BattleError, BattleResult},
    event::BattleEvent,
    model::{ActionKind, BattleAction, Roster},
    types::{Position, SoldierId},
};

/// Apply `action` to `roster`, appending the resulting events.
pub fn apply_action(
    roster: &mut Roster,
    action: &BattleAction,
    events: &mut Vec<BattleEvent>,
) -> BattleResult<()> {
    match action.kind()? {
        ActionKind::Movement { path, .. } => {
            apply_movement(roster, action.soldier_id, path, events)
        }
        ActionKind::Attack { target_id, damage_dealt, .. } => {
            apply_attack(roster, action.soldier_id, target_id, damage_dealt, events)
        }
        ActionKind::Ability { ability, target_position, .. } => {
            apply_ability(action.soldier_id, ability, target_position, events);
            Ok(())
        }
    }
}

fn apply_movement(
    roster: &mut Roster,
    soldier_id: SoldierId,
    path: &[Position],
    events: &mut Vec<BattleEvent>,
) -> BattleResult<()> {
    let Some(&destination) = path.last() else {
        return Err(BattleError::invalid_action("invalid movement path"));
    };
    let soldier = roster.get_alive_mut(soldier_id).ok_or_else(|| {
        BattleError::invalid_action(format!("soldier {soldier_id} cannot move: not found or defeated"))
    })?;

    soldier.position = destination;
    log::debug!("{soldier_id} moved to {destination}");
    events.push(BattleEvent::SoldierMoved { soldier_id, position: destination });
    Ok(())
}

fn apply_attack(
    roster: &mut Roster,
    attacker_id: SoldierId,
    target_id: SoldierId,
    damage_dealt: i32,
    events: &mut Vec<BattleEvent>,
) -> BattleResult<()> {
    let target = roster
        .get_alive_mut(target_id)
        .ok_or_else(|| BattleError::invalid_action(format!("target {target_id} not found")))?;

    // No clamp: health below zero is the defeat signal and stays visible.
    let health = target.stats.health.checked_sub(damage_dealt).ok_or_else(|| {
        BattleError::invalid_action(format!(
            "damage {damage_dealt} to {target_id} overflows health {}",
            target.stats.health
        ))
    })?;
    target.stats.health = health;
    events.push(BattleEvent::SoldierStatsChanged {
        soldier_id: target_id,
        stats:      target.stats,
    });
    events.push(BattleEvent::DamageEffect { soldier_id: target_id });

    if target.is_defeated() {
        target.alive = false;
        log::info!("{target_id} has been defeated!");
        events.push(BattleEvent::SoldierDefeated { soldier_id: target_id });
    }

    // A defeated attacker has no visual left to refresh.
    if let Some(attacker) = roster.get(attacker_id).filter(|s| s.alive) {
        events.push(BattleEvent::SoldierStatsChanged {
            soldier_id: attacker_id,
            stats:      attacker.stats,
        });
    }
    Ok(())
}

fn apply_ability(
    caster_id: SoldierId,
    ability: &str,
    target_position: Position,
    events: &mut Vec<BattleEvent>,
) {
    log::info!("{caster_id} cast {ability} at {target_position}");
    events.push(BattleEvent::AbilityCast {
        caster_id,
        ability: ability.to_string(),
        target_position,
    });
}
