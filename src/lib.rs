//! Dash Runner - A single-screen endless runner
//!
//! Core modules:
//! - `sim`: Run state controller (speed ramp, jump/slide windows, spawning, game over)
//! - `platform`: Pointer gesture and keyboard translation
//! - `game`: Host-side frame driver tying input, controller and physics together
//! - `renderer`: WebGPU rendering pipeline
//! - `tuning`: Data-driven game balance

pub mod game;
pub mod platform;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use game::Game;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions (pixels, y grows downward)
    pub const PLAYFIELD_WIDTH: f32 = 960.0;
    pub const PLAYFIELD_HEIGHT: f32 = 540.0;
    /// Top surface of the ground strip
    pub const GROUND_Y: f32 = 460.0;

    /// Player anchor (bottom-center of the body)
    pub const PLAYER_X: f32 = 160.0;

    /// Obstacles appear this far past the right edge
    pub const SPAWN_MARGIN: f32 = 120.0;
    /// Obstacles left of this x are disposed
    pub const DISPOSE_X: f32 = -200.0;

    /// Forward speed (pixels/s)
    pub const BASE_SPEED: f32 = 360.0;
    pub const MAX_SPEED: f32 = 900.0;
    /// Speed gained per millisecond of running
    pub const SPEED_RAMP_RATE: f32 = 0.006;

    /// Gravity at base speed (pixels/s², downward)
    pub const GRAVITY_BASE: f32 = 2200.0;
    /// Jump impulse at base speed (pixels/s, applied upward)
    pub const JUMP_BASE: f32 = 820.0;

    /// Minimum slide window while a slide key is held
    pub const SLIDE_MIN_MS: f64 = 220.0;
    /// Swipe-down slide duration at base speed
    pub const BASE_TOUCH_MS: f64 = 520.0;
    /// Swipe-down slide never gets shorter than this
    pub const MIN_TOUCH_MS: f64 = 320.0;
    /// Exponent applied to the speed factor for swipe slides
    pub const TOUCH_SLIDE_EXPONENT: f64 = -0.3;

    /// Spawn cadence bounds (ms between obstacles)
    pub const MIN_GAP_MS: f64 = 650.0;
    pub const MAX_GAP_MS: f64 = 1500.0;
    /// Gap shrink per pixel/s above base speed
    pub const GAP_SHRINK_FACTOR: f64 = 1.4;
    /// Delay before the first obstacle of a run
    pub const FIRST_SPAWN_DELAY_MS: f64 = 900.0;

    /// Vertical drag needed to register a swipe
    pub const SWIPE_THRESHOLD: f32 = 55.0;
    /// Horizontal drift beyond this (when it dominates) cancels the swipe
    pub const HORIZONTAL_TOLERANCE: f32 = 80.0;

    /// Longest frame the host will simulate in one step (ms)
    pub const MAX_FRAME_DT_MS: f64 = 100.0;
}

/// Pack an 0xRRGGBB color into normalized RGBA
#[inline]
pub fn rgb_to_rgba(color: u32, alpha: f32) -> [f32; 4] {
    let r = ((color >> 16) & 0xff) as f32 / 255.0;
    let g = ((color >> 8) & 0xff) as f32 / 255.0;
    let b = (color & 0xff) as f32 / 255.0;
    [r, g, b, alpha]
}

/// CSS hex string for an 0xRRGGBB color
pub fn css_color(color: u32) -> String {
    format!("#{:06x}", color & 0xff_ffff)
}
