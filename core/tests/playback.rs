//! Playback controller tests.
//!
//! Tests cover: forward/backward stepping, full-respawn on step back,
//! control enablement, auto-play timing and self-stop, and the
//! forward-to-end then back-to-start restore law.

use battle_replay_core::{
    engine::RoundEngine,
    event::BattleEvent,
    model::{BattleAction, Camp, GameRound, Roster, SoldierData, SoldierStats},
    observer::{BattleObserver, EventLog},
    playback::{PlaybackController, PlaybackControls, StepOutcome},
    types::{Position, SoldierId},
};
use std::time::Duration;

const INTERVAL: Duration = Duration::from_millis(500);

fn two_soldiers() -> Roster {
    Roster::from_soldiers([
        SoldierData::new(0, "knight", Camp::Red, Position::default(), SoldierStats::new(10, 4, 0)),
        SoldierData::new(1, "archer", Camp::Blue, Position::new(3.0, 0.0, 3.0), SoldierStats::new(10, 3, 2)),
    ])
    .expect("roster")
}

fn scripted_rounds() -> Vec<GameRound> {
    vec![
        GameRound::new(1, vec![BattleAction::movement(1, vec![Position::new(2.0, 0.0, 2.0)])]),
        GameRound::new(2, vec![BattleAction::attack(0, 1, 4), BattleAction::attack(1, 0, 3)]),
        GameRound::new(3, vec![BattleAction::ability(1, "smoke", Position::new(0.0, 0.0, 0.0))]),
        GameRound::new(4, vec![BattleAction::attack(0, 1, 7)]),
    ]
}

fn build(rounds: Vec<GameRound>) -> PlaybackController<EventLog> {
    let engine = RoundEngine::new(two_soldiers(), rounds);
    PlaybackController::new(engine, EventLog::new(), INTERVAL)
}

/// The two-soldier attack scenario, forward then back.
#[test]
fn lethal_attack_then_step_back_restores_health() {
    let mut controller = build(vec![GameRound::new(1, vec![BattleAction::attack(0, 1, 15)])]);

    assert_eq!(controller.step_forward(), StepOutcome::Advanced { round_number: 1, skipped: 0 });
    let target = controller.engine().roster().get(1).unwrap();
    assert_eq!(target.stats.health, -5);
    assert!(!target.alive);
    assert!(controller
        .observer()
        .events()
        .contains(&BattleEvent::SoldierDefeated { soldier_id: 1 }));
    assert_eq!(controller.current_round_index(), 1);

    assert_eq!(controller.step_backward(), StepOutcome::SteppedBack { round_index: 0 });
    let target = controller.engine().roster().get(1).unwrap();
    assert_eq!(target.stats.health, 10);
    assert!(target.alive);
    assert_eq!(controller.current_round_index(), 0);
}

#[test]
fn forward_to_end_then_back_to_start_restores_initial_roster() {
    let mut controller = build(scripted_rounds());
    let initial = controller.engine().roster().clone();

    assert_eq!(controller.run_to_end(), 4);
    assert_ne!(controller.engine().roster(), &initial);

    let mut backs = 0;
    while let StepOutcome::SteppedBack { .. } = controller.step_backward() {
        backs += 1;
    }

    assert_eq!(backs, 4);
    assert_eq!(controller.current_round_index(), 0);
    assert_eq!(controller.engine().roster(), &initial, "roster differs from initial state");
}

#[test]
fn stepping_at_boundaries_changes_nothing() {
    let mut controller = build(scripted_rounds());
    assert_eq!(controller.step_backward(), StepOutcome::AtBoundary);

    controller.run_to_end();
    let roster = controller.engine().roster().clone();
    let event_count = controller.observer().events().len();

    assert_eq!(controller.step_forward(), StepOutcome::AtBoundary);
    assert_eq!(controller.current_round_index(), 4);
    assert_eq!(controller.engine().roster(), &roster);
    assert_eq!(controller.observer().events().len(), event_count, "no events at terminal");
}

#[test]
fn step_back_clears_and_respawns_alive_soldiers() {
    let mut controller = build(vec![
        GameRound::new(1, vec![BattleAction::attack(0, 1, 3)]),
        GameRound::new(2, vec![BattleAction::attack(0, 1, 30)]),
    ]);
    controller.run_to_end();
    controller.observer_mut().clear();

    controller.step_backward();

    assert_eq!(
        controller.observer().events(),
        &[
            BattleEvent::RosterCleared,
            BattleEvent::SoldierSpawned { soldier_id: 0 },
            BattleEvent::SoldierSpawned { soldier_id: 1 },
        ]
    );
}

#[test]
fn start_spawns_initial_roster() {
    let mut controller = build(scripted_rounds());
    controller.start();
    assert_eq!(
        controller.observer().events(),
        &[
            BattleEvent::SoldierSpawned { soldier_id: 0 },
            BattleEvent::SoldierSpawned { soldier_id: 1 },
        ]
    );
}

#[test]
fn controls_follow_cursor() {
    let mut controller = build(scripted_rounds());
    assert_eq!(
        controller.controls(),
        PlaybackControls { forward_enabled: true, backward_enabled: false, auto_playing: false }
    );

    controller.step_forward();
    assert_eq!(
        controller.controls(),
        PlaybackControls { forward_enabled: true, backward_enabled: true, auto_playing: false }
    );

    controller.run_to_end();
    assert_eq!(
        controller.controls(),
        PlaybackControls { forward_enabled: false, backward_enabled: true, auto_playing: false }
    );
}

#[test]
fn auto_play_advances_per_interval_and_blocks_manual_steps() {
    let mut controller = build(scripted_rounds());

    assert!(controller.toggle_auto_play(INTERVAL));
    assert_eq!(controller.current_round_index(), 1, "auto-play steps immediately");
    assert_eq!(
        controller.controls(),
        PlaybackControls { forward_enabled: false, backward_enabled: false, auto_playing: true }
    );
    assert_eq!(controller.step_forward(), StepOutcome::Blocked);
    assert_eq!(controller.step_backward(), StepOutcome::Blocked);

    assert_eq!(controller.tick(Duration::from_millis(300)), 0);
    assert_eq!(controller.tick(Duration::from_millis(200)), 1);
    assert_eq!(controller.current_round_index(), 2);

    assert!(!controller.toggle_auto_play(INTERVAL));
    assert_eq!(controller.tick(INTERVAL * 4), 0, "ticks after toggle-off must not advance");
    assert_eq!(controller.current_round_index(), 2);
    assert!(controller.controls().forward_enabled);
}

#[test]
fn auto_play_stops_itself_at_last_round() {
    let mut controller = build(scripted_rounds());
    controller.toggle_auto_play(INTERVAL);

    let advanced = controller.tick(INTERVAL * 10);

    assert_eq!(advanced, 3);
    assert_eq!(controller.current_round_index(), 4);
    assert!(!controller.is_auto_playing(), "auto-play must self-disable at the end");
    assert!(controller.controls().backward_enabled);
}

#[test]
fn auto_play_at_end_does_not_start() {
    let mut controller = build(scripted_rounds());
    controller.run_to_end();

    assert!(!controller.toggle_auto_play(INTERVAL));
    assert!(!controller.is_auto_playing());
}

/// A presentation-style sink that only implements the callbacks it uses.
#[derive(Default)]
struct HealthBars {
    visible:   Vec<SoldierId>,
    refreshed: Vec<SoldierId>,
    rounds:    Vec<i32>,
}

impl BattleObserver for HealthBars {
    fn on_soldier_spawned(&mut self, id: SoldierId) {
        self.visible.push(id);
    }

    fn on_soldier_defeated(&mut self, id: SoldierId) {
        self.visible.retain(|&v| v != id);
    }

    fn on_soldier_stats_changed(&mut self, id: SoldierId) {
        self.refreshed.push(id);
    }

    fn on_round_processed(&mut self, round_number: i32) {
        self.rounds.push(round_number);
    }

    fn on_roster_cleared(&mut self) {
        self.visible.clear();
    }
}

#[test]
fn callbacks_reach_a_custom_observer() {
    let engine = RoundEngine::new(two_soldiers(), scripted_rounds());
    let mut controller = PlaybackController::new(engine, HealthBars::default(), INTERVAL);
    controller.start();
    controller.run_to_end();

    let bars = controller.observer();
    assert_eq!(bars.rounds, vec![1, 2, 3, 4]);
    assert_eq!(bars.visible, vec![0], "defeated soldier must be removed");
    assert_eq!(bars.refreshed, vec![1, 0, 0, 1, 1, 0]);

    controller.step_backward();
    assert_eq!(controller.observer().visible, vec![0, 1]);
}
