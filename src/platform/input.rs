//! Pointer gestures and keyboard state to per-frame commands
//!
//! Pure translation: nothing here knows whether a run is active. The
//! controller decides what a command means in the current phase.

use glam::Vec2;

use crate::sim::TickInput;
use crate::tuning::Tuning;

/// A command produced by a discrete input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputCommand {
    /// Start or restart a run
    Start,
    Jump,
    Slide,
}

/// Tracks one pointer drag and classifies it as at most one command
#[derive(Debug, Clone)]
pub struct GestureTracker {
    /// Where the current drag began (None while released)
    origin: Option<Vec2>,
    /// A command already fired for this drag
    fired: bool,
    threshold: f32,
    tolerance: f32,
}

impl GestureTracker {
    pub fn new(threshold: f32, tolerance: f32) -> Self {
        Self {
            origin: None,
            fired: false,
            threshold,
            tolerance,
        }
    }

    /// Begin a drag; a press alone always asks to start the run
    pub fn pointer_down(&mut self, pos: Vec2) -> InputCommand {
        self.origin = Some(pos);
        self.fired = false;
        InputCommand::Start
    }

    pub fn pointer_move(&mut self, pos: Vec2, pressed: bool) -> Option<InputCommand> {
        if !pressed || self.fired {
            return None;
        }
        let origin = self.origin?;
        let delta = pos - origin;
        let command = self.classify(delta.x, delta.y)?;
        self.fired = true;
        Some(command)
    }

    pub fn pointer_up(&mut self) {
        self.origin = None;
        self.fired = false;
    }

    /// Classify a drag displacement (screen y grows downward)
    pub fn classify(&self, dx: f32, dy: f32) -> Option<InputCommand> {
        if dx.abs() > self.tolerance && dx.abs() > dy.abs() {
            return None;
        }
        if dy > self.threshold {
            Some(InputCommand::Slide)
        } else if dy < -self.threshold {
            Some(InputCommand::Jump)
        } else {
            None
        }
    }
}

/// Logical keys the game listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Space, ArrowUp, W
    Jump,
    /// Enter
    Start,
    /// ArrowDown
    SlidePrimary,
    /// S
    SlideAlt,
    /// I - toggles demo mode
    ToggleIdle,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom(key: &str) -> Option<Self> {
        match key {
            " " | "Spacebar" | "ArrowUp" | "w" | "W" => Some(Key::Jump),
            "Enter" => Some(Key::Start),
            "ArrowDown" => Some(Key::SlidePrimary),
            "s" | "S" => Some(Key::SlideAlt),
            "i" | "I" => Some(Key::ToggleIdle),
            _ => None,
        }
    }
}

/// Input gathered between frames
#[derive(Debug, Clone)]
pub struct InputState {
    gestures: GestureTracker,
    /// Jump key currently down (edge detection)
    jump_down: bool,
    slide_primary: bool,
    slide_alt: bool,
    /// One-shot commands since the last frame
    pending: TickInput,
    pub idle_mode: bool,
}

impl InputState {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            gestures: GestureTracker::new(tuning.swipe_threshold, tuning.horizontal_tolerance),
            jump_down: false,
            slide_primary: false,
            slide_alt: false,
            pending: TickInput::default(),
            idle_mode: false,
        }
    }

    /// Key-down event; returns true if the key is one of ours
    pub fn key_down(&mut self, key: &str) -> bool {
        let Some(key) = Key::from_dom(key) else {
            return false;
        };
        match key {
            Key::Jump => {
                // Auto-repeat sends more key-downs while held
                if !self.jump_down {
                    self.jump_down = true;
                    self.queue(InputCommand::Jump);
                }
            }
            Key::Start => self.queue(InputCommand::Start),
            Key::SlidePrimary => self.slide_primary = true,
            Key::SlideAlt => self.slide_alt = true,
            Key::ToggleIdle => {
                self.idle_mode = !self.idle_mode;
                log::info!("Idle mode: {}", self.idle_mode);
            }
        }
        true
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        let Some(key) = Key::from_dom(key) else {
            return false;
        };
        match key {
            Key::Jump => self.jump_down = false,
            Key::SlidePrimary => self.slide_primary = false,
            Key::SlideAlt => self.slide_alt = false,
            Key::Start | Key::ToggleIdle => {}
        }
        true
    }

    /// Forget held keys and any drag in progress (focus lost)
    pub fn release_all(&mut self) {
        self.jump_down = false;
        self.slide_primary = false;
        self.slide_alt = false;
        self.gestures.pointer_up();
    }

    pub fn pointer_down(&mut self, pos: Vec2) {
        let command = self.gestures.pointer_down(pos);
        self.queue(command);
    }

    pub fn pointer_move(&mut self, pos: Vec2, pressed: bool) {
        if let Some(command) = self.gestures.pointer_move(pos, pressed) {
            self.queue(command);
        }
    }

    pub fn pointer_up(&mut self) {
        self.gestures.pointer_up();
    }

    pub fn slide_held(&self) -> bool {
        self.slide_primary || self.slide_alt
    }

    fn queue(&mut self, command: InputCommand) {
        match command {
            InputCommand::Start => self.pending.start = true,
            InputCommand::Jump => self.pending.jump = true,
            InputCommand::Slide => self.pending.touch_slide = true,
        }
    }

    /// Drain one-shot commands into this frame's input; held state carries over
    pub fn take_tick_input(&mut self) -> TickInput {
        let mut input = std::mem::take(&mut self.pending);
        input.slide_held = self.slide_held();
        input.idle_mode = self.idle_mode;
        input
    }
}
