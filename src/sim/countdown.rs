//! The countdown the player is trying to survive
//!
//! Two sources decrement it: one-second ticks and collision penalties. Once it
//! reaches zero the game is over and stays over until `reset`.

use serde::{Deserialize, Serialize};

/// Outcome of a decrement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountdownChange {
    /// Seconds actually removed
    pub applied: i32,
    /// This decrement ended the game
    pub became_game_over: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    remaining_secs: i32,
    game_over: bool,
}

impl Countdown {
    pub fn new(start_secs: i32) -> Self {
        let mut countdown = Self {
            remaining_secs: start_secs,
            game_over: false,
        };
        countdown.check_expired();
        countdown
    }

    /// Remaining seconds, never below zero
    pub fn remaining(&self) -> i32 {
        self.remaining_secs
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// One second of real time has passed
    pub fn tick_second(&mut self) -> CountdownChange {
        self.decrement(1)
    }

    /// Remove a collision penalty
    pub fn apply_penalty(&mut self, secs: i32) -> CountdownChange {
        self.decrement(secs.max(0))
    }

    pub fn reset(&mut self, start_secs: i32) {
        *self = Self::new(start_secs);
    }

    fn decrement(&mut self, secs: i32) -> CountdownChange {
        if self.game_over || secs == 0 {
            return CountdownChange::default();
        }
        let before = self.remaining_secs;
        self.remaining_secs = before.saturating_sub(secs);
        let became_game_over = self.check_expired();
        CountdownChange {
            applied: before - self.remaining_secs,
            became_game_over,
        }
    }

    /// Clamp at zero and latch game over; true only on the transition
    fn check_expired(&mut self) -> bool {
        if self.remaining_secs > 0 || self.game_over {
            return false;
        }
        self.remaining_secs = 0;
        self.game_over = true;
        true
    }
}
