//! Wall-clock to simulation-time conversion
//!
//! Frames arrive with arbitrary gaps; the simulation only ever advances in
//! fixed `SIM_DT_MS` steps. Leftover time carries over to the next frame.
//! The one-second countdown cadence counts completed steps, so it never
//! drifts against the simulation.

use crate::consts::{MAX_FRAME_MS, MAX_SUBSTEPS, SIM_DT_MS, SIM_HZ};

#[derive(Debug, Clone, Default)]
pub struct FrameDriver {
    accumulator_ms: f32,
    steps_this_second: u32,
}

impl FrameDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a frame's elapsed wall-clock time; returns how many fixed steps to run
    pub fn advance(&mut self, elapsed_ms: f32) -> usize {
        let elapsed = if elapsed_ms.is_finite() {
            elapsed_ms.clamp(0.0, MAX_FRAME_MS)
        } else {
            0.0
        };
        self.accumulator_ms += elapsed;

        let mut steps = 0;
        while self.accumulator_ms >= SIM_DT_MS && steps < MAX_SUBSTEPS {
            self.accumulator_ms -= SIM_DT_MS;
            steps += 1;
        }
        if steps == MAX_SUBSTEPS && self.accumulator_ms >= SIM_DT_MS {
            log::debug!("Dropping {:.1} ms of backlog", self.accumulator_ms);
            self.accumulator_ms %= SIM_DT_MS;
        }
        steps
    }

    /// Record one completed fixed step; true when it closes a whole second
    pub fn complete_step(&mut self) -> bool {
        self.steps_this_second += 1;
        if self.steps_this_second >= SIM_HZ {
            self.steps_this_second = 0;
            true
        } else {
            false
        }
    }

    /// Time waiting for the next fixed step
    pub fn pending_ms(&self) -> f32 {
        self.accumulator_ms
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
