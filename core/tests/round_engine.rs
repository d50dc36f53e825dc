//! Round engine tests.
//!
//! Tests cover: attack arithmetic and defeat, movement to the last
//! waypoint, skipped actions, terminal no-op, in-round ordering and
//! snapshot indexing.

use battle_replay_core::{
    engine::{RoundEngine, RoundOutcome},
    event::BattleEvent,
    model::{BattleAction, Camp, GameRound, Roster, SoldierData, SoldierStats},
    types::Position,
};

fn soldier(id: i32, health: i32) -> SoldierData {
    let camp = if id % 2 == 0 { Camp::Red } else { Camp::Blue };
    SoldierData::new(id, "knight", camp, Position::default(), SoldierStats::new(health, 5, 10))
}

fn build(healths: &[i32], rounds: Vec<GameRound>) -> RoundEngine {
    let roster = Roster::from_soldiers(
        healths.iter().enumerate().map(|(i, &h)| soldier(i as i32, h)),
    )
    .expect("roster");
    RoundEngine::new(roster, rounds)
}

fn health(engine: &RoundEngine, id: i32) -> i32 {
    engine.roster().get(id).expect("soldier").stats.health
}

#[test]
fn attack_subtracts_damage_without_clamping() {
    let mut engine = build(
        &[10, 10],
        vec![GameRound::new(1, vec![BattleAction::attack(0, 1, 15)])],
    );

    let outcome = engine.advance_one_round();

    assert_eq!(health(&engine, 1), -5, "health must be H - D with no clamp");
    assert!(!engine.roster().is_alive(1));
    assert_eq!(engine.current_round_index(), 1);
    let RoundOutcome::Advanced { events, skipped, .. } = outcome else {
        panic!("expected an advance");
    };
    assert_eq!(skipped, 0);
    assert!(events.contains(&BattleEvent::SoldierDefeated { soldier_id: 1 }));
    assert!(events.contains(&BattleEvent::DamageEffect { soldier_id: 1 }));
    assert_eq!(events.last(), Some(&BattleEvent::RoundProcessed { round_number: 1 }));
}

#[test]
fn exact_lethal_damage_defeats_and_partial_damage_does_not() {
    let mut engine = build(
        &[10, 10],
        vec![GameRound::new(
            1,
            vec![BattleAction::attack(0, 1, 10), BattleAction::attack(1, 0, 9)],
        )],
    );
    engine.advance_one_round();

    assert_eq!(health(&engine, 1), 0);
    assert!(!engine.roster().is_alive(1), "health == 0 is a defeat");
    assert_eq!(health(&engine, 0), 1);
    assert!(engine.roster().is_alive(0));
}

/// newStats is carried in the document but health follows damage only.
#[test]
fn conflicting_new_stats_are_ignored() {
    let mut attack = BattleAction::attack(0, 1, 4);
    attack.new_stats = Some(SoldierStats::new(99, 1, 1));
    let mut engine = build(&[10, 10], vec![GameRound::new(1, vec![attack])]);

    engine.advance_one_round();

    let target = engine.roster().get(1).unwrap();
    assert_eq!(target.stats, SoldierStats::new(6, 5, 10), "health must be exactly H - D");
}

#[test]
fn overflowing_damage_skips_the_action_and_the_round_completes() {
    let mut engine = build(
        &[10, 10],
        vec![GameRound::new(
            1,
            vec![BattleAction::attack(0, 1, i32::MIN), BattleAction::attack(1, 0, 2)],
        )],
    );

    let outcome = engine.advance_one_round();

    assert!(matches!(outcome, RoundOutcome::Advanced { skipped: 1, .. }));
    assert_eq!(health(&engine, 1), 10, "rejected attack must leave the target untouched");
    assert_eq!(health(&engine, 0), 8);
    assert_eq!(engine.current_round_index(), 1);
}

#[test]
fn movement_lands_on_last_waypoint() {
    let p1 = Position::new(1.0, 0.0, 1.0);
    let p2 = Position::new(2.0, 0.0, 2.0);
    let p3 = Position::new(3.0, 1.0, 5.0);
    let mut engine = build(
        &[10],
        vec![GameRound::new(1, vec![BattleAction::movement(0, vec![p1, p2, p3])])],
    );

    let outcome = engine.advance_one_round();

    assert_eq!(engine.roster().get(0).unwrap().position, p3);
    let RoundOutcome::Advanced { events, .. } = outcome else {
        panic!("expected an advance");
    };
    assert_eq!(events[0], BattleEvent::SoldierMoved { soldier_id: 0, position: p3 });
}

/// An unknown action is skipped; the rest of the round still applies.
#[test]
fn unknown_action_type_is_skipped() {
    let mut engine = build(
        &[10, 10],
        vec![GameRound::new(
            1,
            vec![
                BattleAction::untyped("teleport", 0),
                BattleAction::attack(0, 1, 4),
                BattleAction::movement(1, vec![]),
                BattleAction::attack(0, 42, 4),
            ],
        )],
    );

    let outcome = engine.advance_one_round();

    assert!(matches!(outcome, RoundOutcome::Advanced { skipped: 3, .. }));
    assert_eq!(health(&engine, 1), 6, "attack after the skipped action must apply");
    assert_eq!(engine.current_round_index(), 1);
}

#[test]
fn actions_see_effects_of_earlier_actions_in_the_round() {
    let mut engine = build(
        &[10, 10],
        vec![GameRound::new(
            1,
            vec![
                BattleAction::attack(0, 1, 10),
                BattleAction::movement(1, vec![Position::new(9.0, 0.0, 9.0)]),
                BattleAction::attack(0, 1, 1),
            ],
        )],
    );

    let outcome = engine.advance_one_round();

    assert!(matches!(outcome, RoundOutcome::Advanced { skipped: 2, .. }));
    assert_eq!(engine.roster().get(1).unwrap().position, Position::default());
    assert_eq!(health(&engine, 1), 0);
}

#[test]
fn ability_is_reported_but_changes_nothing() {
    let mut engine = build(
        &[10],
        vec![GameRound::new(1, vec![BattleAction::ability(0, "heal", Position::new(1.0, 0.0, 1.0))])],
    );
    let before = engine.roster().clone();

    let outcome = engine.advance_one_round();

    assert_eq!(engine.roster(), &before);
    let RoundOutcome::Advanced { events, .. } = outcome else {
        panic!("expected an advance");
    };
    assert!(matches!(&events[0], BattleEvent::AbilityCast { caster_id: 0, ability, .. } if ability == "heal"));
}

#[test]
fn advancing_at_end_is_a_no_op() {
    let mut engine = build(&[10, 10], vec![GameRound::new(1, vec![BattleAction::attack(0, 1, 3)])]);
    engine.advance_one_round();
    let roster = engine.roster().clone();

    assert_eq!(engine.advance_one_round(), RoundOutcome::AtEnd);
    assert_eq!(engine.advance_one_round(), RoundOutcome::AtEnd);
    assert_eq!(engine.current_round_index(), 1);
    assert_eq!(engine.roster(), &roster);
    assert_eq!(engine.snapshots().len(), 2);
}

#[test]
fn snapshots_track_round_boundaries() {
    let mut engine = build(
        &[10, 10],
        vec![
            GameRound::new(1, vec![BattleAction::attack(0, 1, 3)]),
            GameRound::new(2, vec![BattleAction::attack(1, 0, 2)]),
        ],
    );
    engine.advance_one_round();
    engine.advance_one_round();

    assert_eq!(engine.snapshots().len(), 3);
    assert_eq!(engine.snapshots().get(1).unwrap().get(1).unwrap().stats.health, 7);
    assert_eq!(engine.snapshots().get(2).unwrap().get(0).unwrap().stats.health, 8);

    // Back one, forward again: the store stays indexed by round.
    engine.rewind_to(1).expect("rewind");
    assert_eq!(health(&engine, 0), 10);
    engine.advance_one_round();
    assert_eq!(engine.snapshots().len(), 3, "replaying a round must not append");
    assert_eq!(health(&engine, 0), 8);
}

#[test]
fn rewind_past_captured_snapshots_fails() {
    let mut engine = build(&[10], vec![]);
    assert!(engine.rewind_to(3).is_err());
    assert_eq!(engine.current_round_index(), 0);
}
