//! Game balance parameters
//!
//! Every number the run controller consults lives here. Defaults come from
//! [`crate::consts`]; a partial JSON document can override any subset.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Tunable gameplay parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Speed ===
    /// Starting forward speed (pixels/s)
    pub base_speed: f32,
    /// Speed cap (pixels/s)
    pub max_speed: f32,
    /// Speed gained per millisecond while running
    pub speed_ramp_rate: f32,

    // === Jump ===
    /// Gravity at base speed (pixels/s²)
    pub gravity_base: f32,
    /// Jump impulse magnitude at base speed (pixels/s)
    pub jump_base: f32,

    // === Slide ===
    /// Minimum slide window refreshed each frame a slide key is held
    pub slide_min_ms: f64,
    /// Swipe slide duration at base speed
    pub base_touch_ms: f64,
    /// Swipe slide floor
    pub min_touch_ms: f64,
    /// Speed factor exponent for swipe slides
    pub touch_slide_exponent: f64,

    // === Spawning ===
    pub min_gap_ms: f64,
    pub max_gap_ms: f64,
    /// Milliseconds of gap removed per pixel/s above base speed
    pub gap_shrink_factor: f64,
    pub first_spawn_delay_ms: f64,

    // === Gestures ===
    pub swipe_threshold: f32,
    pub horizontal_tolerance: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            base_speed: BASE_SPEED,
            max_speed: MAX_SPEED,
            speed_ramp_rate: SPEED_RAMP_RATE,

            gravity_base: GRAVITY_BASE,
            jump_base: JUMP_BASE,

            slide_min_ms: SLIDE_MIN_MS,
            base_touch_ms: BASE_TOUCH_MS,
            min_touch_ms: MIN_TOUCH_MS,
            touch_slide_exponent: TOUCH_SLIDE_EXPONENT,

            min_gap_ms: MIN_GAP_MS,
            max_gap_ms: MAX_GAP_MS,
            gap_shrink_factor: GAP_SHRINK_FACTOR,
            first_spawn_delay_ms: FIRST_SPAWN_DELAY_MS,

            swipe_threshold: SWIPE_THRESHOLD,
            horizontal_tolerance: HORIZONTAL_TOLERANCE,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override; missing keys keep defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    /// Repair values that would break the controller's invariants
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if !(self.base_speed > 0.0) {
            log::warn!("base_speed {} is not positive, using {}", self.base_speed, defaults.base_speed);
            self.base_speed = defaults.base_speed;
        }
        if self.max_speed < self.base_speed {
            log::warn!("max_speed {} below base_speed, raising to {}", self.max_speed, self.base_speed);
            self.max_speed = self.base_speed;
        }
        if self.speed_ramp_rate < 0.0 {
            log::warn!("speed_ramp_rate {} is negative, clamping to 0", self.speed_ramp_rate);
            self.speed_ramp_rate = 0.0;
        }
        if !(self.min_gap_ms > 0.0) {
            log::warn!("min_gap_ms {} is not positive, using {}", self.min_gap_ms, defaults.min_gap_ms);
            self.min_gap_ms = defaults.min_gap_ms;
        }
        if !(self.max_gap_ms > 0.0) {
            log::warn!("max_gap_ms {} is not positive, using {}", self.max_gap_ms, defaults.max_gap_ms);
            self.max_gap_ms = defaults.max_gap_ms;
        }
        if self.min_gap_ms > self.max_gap_ms {
            log::warn!("min_gap_ms > max_gap_ms, swapping");
            std::mem::swap(&mut self.min_gap_ms, &mut self.max_gap_ms);
        }
        if self.min_touch_ms > self.base_touch_ms {
            log::warn!("min_touch_ms {} above base_touch_ms, clamping", self.min_touch_ms);
            self.min_touch_ms = self.base_touch_ms;
        }
        if self.slide_min_ms < 0.0 {
            log::warn!("slide_min_ms {} is negative, using {}", self.slide_min_ms, defaults.slide_min_ms);
            self.slide_min_ms = defaults.slide_min_ms;
        }

        self
    }

    /// Current speed relative to base, clamped to [1, max/base]
    pub fn speed_factor(&self, speed: f32) -> f32 {
        let max_factor = self.max_speed / self.base_speed;
        (speed / self.base_speed).clamp(1.0, max_factor.max(1.0))
    }

    /// Gravity scales linearly with the speed factor
    pub fn gravity(&self, speed: f32) -> f32 {
        self.gravity_base * self.speed_factor(speed)
    }

    /// Jump velocity (negative = upward) scales with the square root of the
    /// speed factor, so apex height stays constant while airtime shrinks
    pub fn jump_velocity(&self, speed: f32) -> f32 {
        -self.jump_base * self.speed_factor(speed).sqrt()
    }

    /// Swipe slide duration: shrinks gently with speed, floored
    pub fn touch_slide_ms(&self, speed: f32) -> f64 {
        let factor = self.speed_factor(speed) as f64;
        (self.base_touch_ms * factor.powf(self.touch_slide_exponent))
            .clamp(self.min_touch_ms, self.base_touch_ms)
    }

    /// Milliseconds until the next obstacle after a spawn at `speed`
    pub fn spawn_gap_ms(&self, speed: f32) -> f64 {
        let over = (speed - self.base_speed) as f64;
        (self.max_gap_ms - over * self.gap_shrink_factor).clamp(self.min_gap_ms, self.max_gap_ms)
    }
}
