//! Keyboard mapping for the two players
//!
//! Player 1 steers the primary side with W/A/S/D and cycles blocks with
//! Space; player 2 steers the secondary side with the arrow keys and cycles
//! with Enter. Space and Enter also confirm (start, continue, restart), and
//! Backspace or Escape backs out to the menu.
//!
//! Keys are identified by `KeyboardEvent.code`, so the layout is physical.

use crate::sim::block::Direction;
use crate::sim::state::Side;
use crate::sim::tick::{SideInput, TickInput};

/// What a physical key does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Steer(Side, Direction),
    /// Cycle that side's active block; also confirms
    Cycle(Side),
    Back,
}

impl Key {
    pub fn from_code(code: &str) -> Option<Self> {
        use Direction::*;
        use Side::*;
        Some(match code {
            "KeyW" => Self::Steer(Primary, Up),
            "KeyS" => Self::Steer(Primary, Down),
            "KeyA" => Self::Steer(Primary, Left),
            "KeyD" => Self::Steer(Primary, Right),
            "Space" => Self::Cycle(Primary),
            "ArrowUp" => Self::Steer(Secondary, Up),
            "ArrowDown" => Self::Steer(Secondary, Down),
            "ArrowLeft" => Self::Steer(Secondary, Left),
            "ArrowRight" => Self::Steer(Secondary, Right),
            "Enter" | "NumpadEnter" => Self::Cycle(Secondary),
            "Backspace" | "Escape" => Self::Back,
            _ => return None,
        })
    }
}

/// Held keys plus edge-triggered actions waiting for the next tick
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    primary: SideInput,
    secondary: SideInput,
    confirm: bool,
    abandon: bool,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    fn side_mut(&mut self, side: Side) -> &mut SideInput {
        match side {
            Side::Primary => &mut self.primary,
            Side::Secondary => &mut self.secondary,
        }
    }

    /// Handle a key press. Returns true if the key is mapped, so the caller
    /// can suppress the browser default (page scrolling, back navigation).
    pub fn key_down(&mut self, code: &str, repeat: bool) -> bool {
        let Some(key) = Key::from_code(code) else {
            return false;
        };
        match key {
            Key::Steer(side, direction) => set_held(self.side_mut(side), direction, true),
            // Auto-repeat must not fire the edge actions again
            Key::Cycle(side) if !repeat => {
                self.side_mut(side).cycle = true;
                self.confirm = true;
            }
            Key::Back if !repeat => self.abandon = true,
            Key::Cycle(_) | Key::Back => {}
        }
        true
    }

    pub fn key_up(&mut self, code: &str) -> bool {
        match Key::from_code(code) {
            Some(Key::Steer(side, direction)) => {
                set_held(self.side_mut(side), direction, false);
                true
            }
            Some(_) => true,
            None => false,
        }
    }

    /// Drop every held key (window lost focus; key-up events will not arrive)
    pub fn release_all(&mut self) {
        *self = Self::default();
    }

    /// Sample the input for one tick, consuming pending edge actions
    pub fn take_input(&mut self, now_ms: f64) -> TickInput {
        let input = TickInput {
            now_ms,
            primary: self.primary,
            secondary: self.secondary,
            confirm: self.confirm,
            abandon: self.abandon,
        };
        self.primary.cycle = false;
        self.secondary.cycle = false;
        self.confirm = false;
        self.abandon = false;
        input
    }
}

fn set_held(input: &mut SideInput, direction: Direction, held: bool) {
    match direction {
        Direction::Up => input.up = held,
        Direction::Down => input.down = held,
        Direction::Left => input.left = held,
        Direction::Right => input.right = held,
    }
}
