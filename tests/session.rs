//! Full sessions driven through the public API

use mirror_blocks::Tuning;
use mirror_blocks::sim::{
    FailureReason, FrameView, GameEvent, GameState, Level, LevelCatalog, RoundPhase, SideInput,
    TickInput, VisualFrame, tick,
};

const FRAME_MS: f64 = 16.0;

/// One block with a tree checkpoint a few cells toward the mirror
fn corridor(par_ms: u64) -> Level {
    let mut row = vec![0u8; 24];
    row[1] = 1;
    row[5] = 5;
    Level::from_codes(&[row], [&[1], &[], &[]], par_ms).unwrap()
}

/// Two blocks spawned overlapping each other
fn crowded() -> Level {
    let mut row = vec![0u8; 24];
    row[1] = 1;
    row[2] = 2;
    Level::from_codes(&[row], [&[1], &[1], &[]], 1000).unwrap()
}

fn press_confirm(now_ms: f64) -> TickInput {
    TickInput {
        now_ms,
        confirm: true,
        ..Default::default()
    }
}

fn toward_mirror(now_ms: f64) -> TickInput {
    TickInput {
        now_ms,
        primary: SideInput {
            right: true,
            ..Default::default()
        },
        secondary: SideInput {
            left: true,
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Steer both sides toward the mirror until the round ends. Returns the
/// wall-clock time of the final frame and every event raised.
fn play_round(state: &mut GameState, start_ms: f64) -> (f64, Vec<GameEvent>) {
    tick(state, &press_confirm(start_ms)).unwrap();
    let mut now = start_ms;
    let mut events = state.drain_events();
    for _ in 0..600 {
        if state.phase() != Some(RoundPhase::Playing) {
            break;
        }
        now += FRAME_MS;
        tick(state, &toward_mirror(now)).unwrap();
        events.extend(state.drain_events());
    }
    (now, events)
}

#[test]
fn two_level_run_records_every_time() {
    let catalog = LevelCatalog::new(vec![corridor(60_000), corridor(100)]);
    let mut state = GameState::new(Tuning::default(), catalog).unwrap();

    let (end_1, events) = play_round(&mut state, 1000.0);
    assert_eq!(state.phase(), Some(RoundPhase::Completed));
    let elapsed_1 = end_1 - 1000.0;
    assert_eq!(state.session.times.get(1), Some(elapsed_1));
    assert!(events.contains(&GameEvent::RoundCompleted {
        level: 1,
        elapsed_ms: elapsed_1,
        beat_par: true
    }));
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, GameEvent::MissionCompleted { .. }))
            .count(),
        1
    );

    // Continue: level index advances by one, level 1 time untouched
    tick(&mut state, &press_confirm(end_1 + 500.0)).unwrap();
    assert_eq!(state.session.level, 2);
    assert_eq!(state.phase(), Some(RoundPhase::BeforeStart));

    let (end_2, events) = play_round(&mut state, 10_000.0);
    let elapsed_2 = end_2 - 10_000.0;
    assert_eq!(state.session.times.get(1), Some(elapsed_1));
    assert_eq!(state.session.times.get(2), Some(elapsed_2));
    assert!(state.session.finished);
    assert!(events.contains(&GameEvent::RoundCompleted {
        level: 2,
        elapsed_ms: elapsed_2,
        beat_par: false
    }));
    assert_eq!(
        events.last(),
        Some(&GameEvent::AllLevelsCompleted {
            total_ms: elapsed_1 + elapsed_2
        })
    );

    tick(&mut state, &press_confirm(end_2 + 500.0)).unwrap();
    let summary = FrameView::capture(&state);
    assert_eq!(summary.phase, Some(RoundPhase::AllLevelsComplete));
    assert_eq!(summary.times, vec![(1, elapsed_1), (2, elapsed_2)]);
    assert!(summary.blocks.iter().all(|b| !b.visible));
}

#[test]
fn collision_restart_and_abandon() {
    let catalog = LevelCatalog::new(vec![crowded()]);
    let mut state = GameState::new(Tuning::default(), catalog).unwrap();

    tick(&mut state, &press_confirm(0.0)).unwrap();
    tick(&mut state, &TickInput::default()).unwrap();
    assert_eq!(
        state.phase(),
        Some(RoundPhase::GameOver {
            reason: FailureReason::BlockCollision
        })
    );
    let view = FrameView::capture(&state);
    assert_eq!(view.failure, Some(FailureReason::BlockCollision));

    // Restart the same level before the circle effect fires
    tick(&mut state, &press_confirm(100.0)).unwrap();
    assert_eq!(state.phase(), Some(RoundPhase::BeforeStart));
    assert_eq!(state.session.level, 1);

    // Lose again, let the effect fire, then back out
    tick(&mut state, &press_confirm(200.0)).unwrap();
    tick(&mut state, &TickInput::default()).unwrap();
    for _ in 0..state.tuning.circle_delay_ticks {
        tick(&mut state, &TickInput::default()).unwrap();
    }
    let view = FrameView::capture(&state);
    assert!(view.blocks.iter().all(|b| b.frame == VisualFrame::Circle));

    tick(
        &mut state,
        &TickInput {
            abandon: true,
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(state.phase(), None);
    assert!(state.drain_events().contains(&GameEvent::Abandoned));
}

#[test]
fn standard_catalog_starts_mirrored() {
    let mut state = GameState::standard().unwrap();
    tick(&mut state, &press_confirm(0.0)).unwrap();
    for i in 1..=30 {
        tick(&mut state, &TickInput {
            now_ms: i as f64 * FRAME_MS,
            ..Default::default()
        })
        .unwrap();
    }

    let view = FrameView::capture(&state);
    assert_eq!(view.phase, Some(RoundPhase::Playing));
    assert_eq!(view.mirror.map(|m| m.value), Some(0.0));
    assert_eq!(view.clock, "00:00");
    assert_eq!(view.blocks.len(), 6);
}
