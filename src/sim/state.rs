//! Game state and core simulation types
//!
//! Everything the per-frame tick reads or writes lives here: the decoded
//! arena, the current round, and the session carried across rounds.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::block::BlockCollection;
use super::level::LevelCatalog;
use super::mirror::MirrorReading;
use super::rect::Rect;
use crate::error::SimError;
use crate::records::LevelTimes;
use crate::tuning::Tuning;

/// One half of the play field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Left side, player 1 (the "real" blocks)
    Primary,
    /// Right side, player 2 (the mirror images)
    Secondary,
}

impl Side {
    pub const BOTH: [Side; 2] = [Self::Primary, Self::Secondary];
}

/// A value held once per side
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SidePair<T> {
    pub primary: T,
    pub secondary: T,
}

impl<T> SidePair<T> {
    pub fn new(primary: T, secondary: T) -> Self {
        Self { primary, secondary }
    }

    pub fn get(&self, side: Side) -> &T {
        match side {
            Side::Primary => &self.primary,
            Side::Secondary => &self.secondary,
        }
    }

    pub fn get_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Primary => &mut self.primary,
            Side::Secondary => &mut self.secondary,
        }
    }
}

/// Checkpoint pictures, visited in mission order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CheckpointKind {
    Tree,
    Rocket,
    Potato,
}

impl CheckpointKind {
    /// Mission/layout code (1..=3)
    pub fn code(self) -> u8 {
        match self {
            Self::Tree => 1,
            Self::Rocket => 2,
            Self::Potato => 3,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Tree),
            2 => Some(Self::Rocket),
            3 => Some(Self::Potato),
            _ => None,
        }
    }
}

/// A static obstacle; touching it fails the round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hazard {
    pub pos: Vec2,
    pub size: Vec2,
    pub side: Side,
}

impl Hazard {
    pub fn bounds(&self) -> Rect {
        Rect::centered(self.pos, self.size)
    }
}

/// A mission target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: CheckpointKind,
    pub side: Side,
}

impl Checkpoint {
    pub fn bounds(&self) -> Rect {
        Rect::centered(self.pos, self.size)
    }
}

/// Entities of a decoded level. Index `i` on the primary side and index `i`
/// on the secondary side are mirror images of the same logical entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena {
    pub blocks: SidePair<BlockCollection>,
    pub hazards: SidePair<Vec<Hazard>>,
    pub checkpoints: SidePair<Vec<Checkpoint>>,
}

impl Arena {
    pub fn empty() -> Self {
        Self {
            blocks: SidePair::new(
                BlockCollection::new(Side::Primary),
                BlockCollection::new(Side::Secondary),
            ),
            hazards: SidePair::default(),
            checkpoints: SidePair::default(),
        }
    }

    /// Missions still open across both sides
    pub fn remaining_missions(&self) -> usize {
        self.blocks.primary.remaining_missions() + self.blocks.secondary.remaining_missions()
    }

    /// Check the index pairing between sides
    pub fn check_pairing(&self) -> Result<(), SimError> {
        if self.blocks.primary.len() != self.blocks.secondary.len()
            || self.hazards.primary.len() != self.hazards.secondary.len()
            || self.checkpoints.primary.len() != self.checkpoints.secondary.len()
        {
            return Err(SimError::UnpairedEntities);
        }
        Ok(())
    }
}

/// Why a round was lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureReason {
    /// A block touched a hazard
    Hazard,
    /// Two blocks on the same side touched
    BlockCollision,
    /// The sides stopped mirroring each other
    MirrorDivergence,
}

/// Lifecycle of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Level shown, waiting for the start input
    BeforeStart,
    /// Active play
    Playing,
    /// Every mission fulfilled
    Completed,
    /// Round lost
    GameOver { reason: FailureReason },
    /// Last level completed, run summary
    AllLevelsComplete,
}

/// Background music mode hint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MusicMode {
    Normal,
    Fast,
}

/// Discrete events for the presentation layer (sounds, HUD effects)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RoundStarted { level: usize },
    ActiveBlockChanged { side: Side, index: usize },
    /// Both mirror instances of block `block` reached a `kind` checkpoint
    MissionCompleted { block: usize, kind: CheckpointKind },
    /// Divergence crossed the urgency threshold in either direction
    UrgencyChanged { urgent: bool },
    RoundFailed { reason: FailureReason },
    RoundCompleted {
        level: usize,
        elapsed_ms: f64,
        beat_par: bool,
    },
    AllLevelsCompleted { total_ms: f64 },
    /// Delayed game-over penalty fired
    BlocksTransformed,
    /// Round torn down by the player backing out
    Abandoned,
}

/// A timed effect scheduled by the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    TransformToCircles,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayedEffect {
    pub kind: EffectKind,
    pub ticks_remaining: u32,
}

/// One attempt at a single level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    /// 1-based catalog index
    pub level: usize,
    pub par_ms: u64,
    pub phase: RoundPhase,
    pub arena: Arena,
    /// Wall-clock start (ms), set on the start input
    pub start_ms: Option<f64>,
    /// Wall-clock time since start (ms), display only
    pub elapsed_ms: f64,
    pub mirror: MirrorReading,
    pub pending: Option<DelayedEffect>,
}

impl Round {
    /// Decode the session's current level into a fresh round
    pub fn new(
        session: &Session,
        catalog: &LevelCatalog,
        tuning: &Tuning,
    ) -> Result<Self, SimError> {
        let level = catalog.get(session.level)?;
        let arena = level.decode(tuning)?;
        Ok(Self {
            level: session.level,
            par_ms: level.par_ms,
            phase: RoundPhase::BeforeStart,
            mirror: MirrorReading::at_rest(tuning),
            arena,
            start_ms: None,
            elapsed_ms: 0.0,
            pending: None,
        })
    }

    pub fn failure(&self) -> Option<FailureReason> {
        match self.phase {
            RoundPhase::GameOver { reason } => Some(reason),
            _ => None,
        }
    }

    /// Drop any scheduled effect
    pub fn cancel_pending(&mut self) {
        self.pending = None;
    }
}

/// State carried from round to round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Current level (1-based)
    pub level: usize,
    pub level_count: usize,
    pub times: LevelTimes,
    /// Set once the final level is completed, cleared on any level change
    pub finished: bool,
}

impl Session {
    pub fn new(level_count: usize) -> Self {
        Self {
            level: 1,
            level_count,
            times: LevelTimes::new(),
            finished: false,
        }
    }

    /// Jump to a level (1-based)
    pub fn select(&mut self, level: usize) -> Result<(), SimError> {
        if level == 0 || level > self.level_count {
            return Err(SimError::LevelIndexOutOfRange {
                index: level,
                count: self.level_count,
            });
        }
        self.level = level;
        self.finished = false;
        Ok(())
    }

    pub fn is_final_level(&self) -> bool {
        self.level >= self.level_count
    }

    /// Move on to the next level
    pub fn advance(&mut self) -> Result<(), SimError> {
        self.select(self.level + 1)
    }
}

/// Complete game state: configuration, catalog, session and the live round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub tuning: Tuning,
    pub catalog: LevelCatalog,
    pub session: Session,
    /// None while the player is in the menu
    pub round: Option<Round>,
    /// Events raised since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Start a fresh run at level 1, waiting for the start input
    pub fn new(tuning: Tuning, catalog: LevelCatalog) -> Result<Self, SimError> {
        let session = Session::new(catalog.len());
        let round = Round::new(&session, &catalog, &tuning)?;
        Ok(Self {
            tuning,
            catalog,
            session,
            round: Some(round),
            events: Vec::new(),
        })
    }

    /// Standard three-level game with default tuning
    pub fn standard() -> Result<Self, SimError> {
        Self::new(Tuning::default(), LevelCatalog::standard()?)
    }

    pub fn phase(&self) -> Option<RoundPhase> {
        self.round.as_ref().map(|r| r.phase)
    }

    /// Discard the current round and session and start again at level 1
    pub fn new_game(&mut self) -> Result<(), SimError> {
        self.session = Session::new(self.catalog.len());
        self.round = Some(Round::new(&self.session, &self.catalog, &self.tuning)?);
        log::info!("New game started ({} levels)", self.catalog.len());
        Ok(())
    }

    /// Play a specific level next, keeping the recorded times
    pub fn select_level(&mut self, level: usize) -> Result<(), SimError> {
        self.session.select(level)?;
        self.round = Some(Round::new(&self.session, &self.catalog, &self.tuning)?);
        Ok(())
    }

    /// Back out to the menu: tear down the round and cancel scheduled effects
    pub fn abandon(&mut self) {
        if let Some(mut round) = self.round.take() {
            round.cancel_pending();
            log::info!("Round on level {} abandoned", round.level);
            self.events.push(GameEvent::Abandoned);
        }
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkpoint_codes() {
        for code in 1..=3 {
            let kind = CheckpointKind::from_code(code).unwrap();
            assert_eq!(kind.code(), code);
        }
        assert_eq!(CheckpointKind::from_code(0), None);
        assert_eq!(CheckpointKind::from_code(4), None);
    }

    #[test]
    fn test_session_selection() {
        let mut session = Session::new(3);
        assert_eq!(session.level, 1);
        assert!(!session.is_final_level());
        session.advance().unwrap();
        session.advance().unwrap();
        assert!(session.is_final_level());
        assert_eq!(
            session.advance(),
            Err(SimError::LevelIndexOutOfRange { index: 4, count: 3 })
        );
        assert_eq!(session.level, 3);
        assert!(session.select(0).is_err());
    }

    #[test]
    fn test_new_state_waits_for_start() {
        let state = GameState::standard().unwrap();
        assert_eq!(state.phase(), Some(RoundPhase::BeforeStart));
        let round = state.round.as_ref().unwrap();
        assert_eq!(round.level, 1);
        assert_eq!(round.par_ms, 27_000);
        assert!(round.arena.check_pairing().is_ok());
    }

    #[test]
    fn test_abandon_tears_down_round() {
        let mut state = GameState::standard().unwrap();
        if let Some(round) = state.round.as_mut() {
            round.pending = Some(DelayedEffect {
                kind: EffectKind::TransformToCircles,
                ticks_remaining: 10,
            });
        }
        state.abandon();
        assert!(state.round.is_none());
        assert_eq!(state.drain_events(), vec![GameEvent::Abandoned]);

        // Abandoning again is a no-op
        state.abandon();
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_select_level_out_of_range() {
        let mut state = GameState::standard().unwrap();
        assert!(matches!(
            state.select_level(9),
            Err(SimError::LevelIndexOutOfRange { index: 9, count: 3 })
        ));
        state.select_level(3).unwrap();
        assert_eq!(state.round.as_ref().unwrap().par_ms, 245_000);
    }
}
