//! Coarse round timer: whole-second decrements driven by frame time

use serde::{Deserialize, Serialize};

/// What a call to [`Countdown::advance`] produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CountdownStep {
    /// Whole seconds consumed this call
    pub ticks: u32,
    /// Reached zero during this call
    pub expired: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Countdown {
    remaining: u32,
    /// Seconds accumulated toward the next decrement
    carry: f32,
    armed: bool,
}

impl Countdown {
    pub fn new(seconds: u32) -> Self {
        Self {
            remaining: seconds,
            carry: 0.0,
            armed: false,
        }
    }

    #[inline]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.armed
    }

    /// Arm the timer. A second start while running is refused so two
    /// timers can never decrement the same round.
    pub fn start(&mut self) -> bool {
        if self.armed {
            log::warn!("Countdown already running, ignoring start");
            return false;
        }
        if self.remaining == 0 {
            return false;
        }
        self.armed = true;
        true
    }

    /// Disarm. The partial second is discarded.
    pub fn stop(&mut self) {
        self.armed = false;
        self.carry = 0.0;
    }

    pub fn reset(&mut self, seconds: u32) {
        self.stop();
        self.remaining = seconds;
    }

    /// Accumulate `dt` seconds while armed
    pub fn advance(&mut self, dt: f32) -> CountdownStep {
        let mut step = CountdownStep::default();
        if !self.armed || dt <= 0.0 {
            return step;
        }

        self.carry += dt;
        while self.carry >= 1.0 && self.remaining > 0 {
            self.carry -= 1.0;
            self.remaining -= 1;
            step.ticks += 1;
        }

        if self.remaining == 0 {
            self.stop();
            step.expired = true;
        }
        step
    }
}
