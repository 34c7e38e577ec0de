//! Fixed timestep simulation tick
//!
//! One call per rendered frame. Physics is frame-based; the wall clock in
//! `TickInput::now_ms` only feeds the round timer.

use serde::{Deserialize, Serialize};

use super::block::Direction;
use super::mirror::MirrorReading;
use super::state::{
    DelayedEffect, EffectKind, FailureReason, GameEvent, GameState, Round, RoundPhase, Session,
    Side,
};
use crate::error::SimError;
use crate::tuning::Tuning;

/// Keys sampled for one player this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Edge-triggered: hand control to the next block
    pub cycle: bool,
}

impl SideInput {
    /// Directions currently held
    pub fn held(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL.into_iter().filter(|dir| match dir {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        })
    }
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    /// Wall-clock time of this frame (ms)
    pub now_ms: f64,
    pub primary: SideInput,
    pub secondary: SideInput,
    /// Edge-triggered start/continue/restart
    pub confirm: bool,
    /// Edge-triggered back-to-menu
    pub abandon: bool,
}

impl TickInput {
    pub fn side(&self, side: Side) -> &SideInput {
        match side {
            Side::Primary => &self.primary,
            Side::Secondary => &self.secondary,
        }
    }
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) -> Result<(), SimError> {
    if input.abandon {
        state.abandon();
        return Ok(());
    }

    // Menu: confirm starts a new run
    if state.round.is_none() {
        if input.confirm {
            state.new_game()?;
        }
        return Ok(());
    }

    let GameState {
        tuning,
        catalog,
        session,
        round,
        events,
    } = state;
    let Some(current) = round.as_mut() else {
        return Ok(());
    };

    match current.phase {
        RoundPhase::BeforeStart => {
            if input.confirm {
                current.phase = RoundPhase::Playing;
                current.start_ms = Some(input.now_ms);
                current.elapsed_ms = 0.0;
                log::info!("Level {} started", current.level);
                events.push(GameEvent::RoundStarted {
                    level: current.level,
                });
            }
        }
        RoundPhase::Playing => play_frame(current, session, tuning, events, input),
        RoundPhase::Completed => {
            if input.confirm {
                if session.is_final_level() {
                    current.phase = RoundPhase::AllLevelsComplete;
                    log::info!("Run finished in {:.0} ms", session.times.total_ms());
                } else {
                    session.advance()?;
                    *round = Some(Round::new(session, catalog, tuning)?);
                    log::info!("Advanced to level {}", session.level);
                }
            }
        }
        RoundPhase::GameOver { .. } => {
            run_pending_effect(current, events);
            if input.confirm {
                *round = Some(Round::new(session, catalog, tuning)?);
                log::info!("Level {} restarted", session.level);
            }
        }
        RoundPhase::AllLevelsComplete => {}
    }

    Ok(())
}

/// One frame of active play, in order: discrete input, held input,
/// integration, contacts, missions, mirror, then the round decision
fn play_frame(
    round: &mut Round,
    session: &mut Session,
    tuning: &Tuning,
    events: &mut Vec<GameEvent>,
    input: &TickInput,
) {
    let arena = &mut round.arena;

    for side in Side::BOTH {
        if input.side(side).cycle {
            if let Ok(index) = arena.blocks.get_mut(side).activate_next() {
                events.push(GameEvent::ActiveBlockChanged { side, index });
            }
        }
    }

    for side in Side::BOTH {
        let blocks = arena.blocks.get_mut(side);
        for direction in input.side(side).held() {
            blocks.steer(direction);
        }
    }

    for side in Side::BOTH {
        arena.blocks.get_mut(side).tick_all();
    }

    let collision = arena.find_collision();
    if collision.is_none() {
        for progress in arena.advance_missions() {
            events.push(GameEvent::MissionCompleted {
                block: progress.block,
                kind: progress.kind,
            });
        }
    }

    let reading = MirrorReading::evaluate(&arena.blocks, tuning);
    if reading.urgent != round.mirror.urgent {
        log::debug!("Mirror urgency {} at {:.1}", reading.urgent, reading.value);
        events.push(GameEvent::UrgencyChanged {
            urgent: reading.urgent,
        });
    }
    round.mirror = reading;

    if let Some(start) = round.start_ms {
        round.elapsed_ms = (input.now_ms - start).max(0.0);
    }

    let failure = collision
        .map(|c| c.reason)
        .or_else(|| reading.diverged.then_some(FailureReason::MirrorDivergence));

    if let Some(reason) = failure {
        fail_round(round, reason, tuning, events);
    } else if round.arena.remaining_missions() == 0 {
        complete_round(round, session, events);
    }
}

fn fail_round(
    round: &mut Round,
    reason: FailureReason,
    tuning: &Tuning,
    events: &mut Vec<GameEvent>,
) {
    round.phase = RoundPhase::GameOver { reason };
    for side in Side::BOTH {
        round.arena.blocks.get_mut(side).disable_all();
    }
    round.pending = Some(DelayedEffect {
        kind: EffectKind::TransformToCircles,
        ticks_remaining: tuning.circle_delay_ticks,
    });
    log::info!("Level {} lost: {:?}", round.level, reason);
    events.push(GameEvent::RoundFailed { reason });
}

fn complete_round(round: &mut Round, session: &mut Session, events: &mut Vec<GameEvent>) {
    round.phase = RoundPhase::Completed;
    for side in Side::BOTH {
        round.arena.blocks.get_mut(side).disable_all();
    }

    let elapsed_ms = round.elapsed_ms;
    session.times.record(round.level, elapsed_ms);
    let beat_par = session
        .times
        .beat_par(round.level, round.par_ms)
        .unwrap_or(false);
    log::info!(
        "Level {} complete in {:.0} ms (par {} ms)",
        round.level,
        elapsed_ms,
        round.par_ms
    );
    events.push(GameEvent::RoundCompleted {
        level: round.level,
        elapsed_ms,
        beat_par,
    });

    if session.is_final_level() {
        session.finished = true;
        events.push(GameEvent::AllLevelsCompleted {
            total_ms: session.times.total_ms(),
        });
    }
}

/// Count down the game-over effect and fire it when due
fn run_pending_effect(round: &mut Round, events: &mut Vec<GameEvent>) {
    let Some(effect) = round.pending.as_mut() else {
        return;
    };
    effect.ticks_remaining = effect.ticks_remaining.saturating_sub(1);
    if effect.ticks_remaining > 0 {
        return;
    }

    match effect.kind {
        EffectKind::TransformToCircles => {
            for side in Side::BOTH {
                round.arena.blocks.get_mut(side).transform_all();
            }
            events.push(GameEvent::BlocksTransformed);
        }
    }
    round.pending = None;
}
