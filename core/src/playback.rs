//! Playback controller: the only mutating entry point after load.
//!
//! Owns the round engine (and through it the snapshot store), the
//! presentation observer and the auto-play timer. All calls are
//! serialized by `&mut self`; the host drives auto-play by calling
//! [`PlaybackController::tick`] with elapsed time.
//!
//! Control rules:
//!   - forward enabled  iff not auto-playing and idx < total
//!   - backward enabled iff not auto-playing and idx > 0
//!   - auto-play stops itself on reaching the last round

use crate::{
    clock::AutoPlayTimer,
    engine::{RoundEngine, RoundOutcome},
    event::BattleEvent,
    observer::BattleObserver,
    types::RoundNumber,
};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Advanced {
        round_number: RoundNumber,
        skipped:      usize,
    },
    SteppedBack {
        round_index: usize,
    },
    /// Already at the first or last round. Nothing changed.
    AtBoundary,
    /// Manual stepping is disabled while auto-play runs.
    Blocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackControls {
    pub forward_enabled:  bool,
    pub backward_enabled: bool,
    pub auto_playing:     bool,
}

pub struct PlaybackController<O: BattleObserver> {
    engine:   RoundEngine,
    observer: O,
    timer:    AutoPlayTimer,
}

impl<O: BattleObserver> PlaybackController<O> {
    pub fn new(engine: RoundEngine, observer: O, interval: Duration) -> Self {
        Self {
            engine,
            observer,
            timer: AutoPlayTimer::new(interval),
        }
    }

    /// Announce the initial roster to the presentation layer.
    pub fn start(&mut self) {
        self.spawn_all();
    }

    pub fn step_forward(&mut self) -> StepOutcome {
        if self.timer.is_running() {
            return StepOutcome::Blocked;
        }
        self.advance()
    }

    pub fn step_backward(&mut self) -> StepOutcome {
        if self.timer.is_running() {
            return StepOutcome::Blocked;
        }
        let idx = self.engine.current_round_index();
        if idx == 0 {
            return StepOutcome::AtBoundary;
        }

        if let Err(e) = self.engine.rewind_to(idx - 1) {
            // Unreachable while the engine captures on every advance.
            log::error!("playback: cannot restore round index {}: {e}", idx - 1);
            return StepOutcome::AtBoundary;
        }

        self.observer.on_event(&BattleEvent::RosterCleared);
        self.spawn_all();
        StepOutcome::SteppedBack { round_index: idx - 1 }
    }

    /// Flip auto-play. Turning it on advances one round immediately, then
    /// one per `interval` of ticked time. Returns the new state.
    pub fn toggle_auto_play(&mut self, interval: Duration) -> bool {
        if self.timer.is_running() {
            self.timer.stop();
            log::info!("playback: auto-play stopped at round index {}", self.engine.current_round_index());
            return false;
        }

        if self.engine.is_at_end() {
            log::debug!("playback: auto-play requested at last round, ignoring");
            return false;
        }

        self.timer.start(interval);
        log::info!("playback: auto-play started, interval {interval:?}");
        self.advance();
        self.finish_auto_play_if_done();
        self.timer.is_running()
    }

    /// Feed elapsed time to auto-play. Returns the rounds advanced.
    pub fn tick(&mut self, elapsed: Duration) -> usize {
        let fires = self.timer.advance(elapsed);
        let mut advanced = 0;
        for _ in 0..fires {
            if !self.timer.is_running() {
                break;
            }
            if matches!(self.advance(), StepOutcome::Advanced { .. }) {
                advanced += 1;
            }
            self.finish_auto_play_if_done();
        }
        advanced
    }

    /// Step forward until the last round. Returns the rounds advanced.
    pub fn run_to_end(&mut self) -> usize {
        let mut advanced = 0;
        while let StepOutcome::Advanced { .. } = self.step_forward() {
            advanced += 1;
        }
        advanced
    }

    pub fn controls(&self) -> PlaybackControls {
        let auto_playing = self.timer.is_running();
        let idx = self.engine.current_round_index();
        PlaybackControls {
            forward_enabled:  !auto_playing && idx < self.engine.total_rounds(),
            backward_enabled: !auto_playing && idx > 0,
            auto_playing,
        }
    }

    pub fn is_auto_playing(&self) -> bool {
        self.timer.is_running()
    }

    pub fn current_round_index(&self) -> usize {
        self.engine.current_round_index()
    }

    pub fn engine(&self) -> &RoundEngine {
        &self.engine
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    fn advance(&mut self) -> StepOutcome {
        match self.engine.advance_one_round() {
            RoundOutcome::AtEnd => StepOutcome::AtBoundary,
            RoundOutcome::Advanced { round_number, events, skipped } => {
                for event in &events {
                    self.observer.on_event(event);
                }
                StepOutcome::Advanced { round_number, skipped }
            }
        }
    }

    fn finish_auto_play_if_done(&mut self) {
        if self.timer.is_running() && self.engine.is_at_end() {
            self.timer.stop();
            log::info!("playback: auto-play reached the last round");
        }
    }

    fn spawn_all(&mut self) {
        for soldier in self.engine.roster().alive() {
            self.observer.on_event(&BattleEvent::SoldierSpawned { soldier_id: soldier.id });
        }
    }
}
