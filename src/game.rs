//! Host-side frame driver
//!
//! Owns the controller state, the physics world standing in for the engine,
//! and the input gathered between frames. Hosts call [`Game::update`] once per
//! animation frame with the frame timestamp.

use crate::consts::MAX_FRAME_DT_MS;
use crate::platform::InputState;
use crate::sim::{ArcadeWorld, GameState, RunPhase, tick};
use crate::tuning::Tuning;

pub struct Game {
    pub state: GameState,
    pub world: ArcadeWorld,
    pub input: InputState,
    /// Timestamp of the previous frame (ms)
    last_time: Option<f64>,
}

impl Game {
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let mut world = ArcadeWorld::default();
        let state = GameState::new(tuning, seed, &mut world);
        let input = InputState::new(&state.tuning);
        Self {
            state,
            world,
            input,
            last_time: None,
        }
    }

    /// Run one frame at host timestamp `time` (ms)
    pub fn update(&mut self, time: f64) {
        let dt = match self.last_time {
            Some(last) => time - last,
            None => 0.0,
        };
        self.last_time = Some(time);
        self.frame(time, dt);
    }

    /// Run one frame: controller first, then physics, then overlap events
    pub fn frame(&mut self, now: f64, dt: f64) {
        // Tab switches and debugger pauses produce huge gaps
        let dt = dt.clamp(0.0, MAX_FRAME_DT_MS);

        let input = self.input.take_tick_input();
        tick(&mut self.state, &mut self.world, &input, now, dt);

        if let Some(obstacle) = self.world.step(dt) {
            log::debug!("Runner hit obstacle {:?}", obstacle);
            self.state.on_overlap(&mut self.world);
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.state.run.phase
    }

    pub fn score(&self) -> u64 {
        self.state.run.display_score()
    }
}
