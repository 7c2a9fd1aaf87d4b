//! Run state and core simulation types
//!
//! A [`GameState`] is the single owned context for one runner scene. Nothing
//! here is global: several scenes can coexist, each with its own stage.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::assets;
use super::collision::{Aabb, Hitbox};
use super::spawn::SpawnScheduler;
use super::stage::{Layer, SpriteId, Stage};
use crate::consts::*;
use crate::tuning::Tuning;

/// Lifecycle of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Start overlay shown, waiting for the first input
    NotStarted,
    /// Active gameplay
    Running,
    /// Run ended; simulation frozen until restart
    GameOver,
}

/// Continuous run parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    /// Forward speed (pixels/s), never decreases within a run
    pub speed: f32,
    /// Distance proxy, advances only while running
    pub score: f64,
    pub phase: RunPhase,
}

impl RunState {
    pub fn new(base_speed: f32) -> Self {
        Self {
            speed: base_speed,
            score: 0.0,
            phase: RunPhase::NotStarted,
        }
    }

    pub fn over(&self) -> bool {
        self.phase == RunPhase::GameOver
    }

    pub fn running(&self) -> bool {
        self.phase == RunPhase::Running
    }

    /// Score as shown on the HUD
    pub fn display_score(&self) -> u64 {
        self.score.max(0.0).floor() as u64
    }
}

/// Named collision profiles for the runner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitboxProfile {
    Standing,
    Sliding,
}

impl HitboxProfile {
    pub fn hitbox(&self) -> Hitbox {
        match self {
            HitboxProfile::Standing => Hitbox::new(34.0, 56.0),
            HitboxProfile::Sliding => Hitbox::new(46.0, 28.0).with_offset(6.0, 0.0),
        }
    }
}

/// Discrete runner state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Stage body backing the runner
    pub sprite: SpriteId,
    pub sliding: bool,
    /// Slide ends at or after this timestamp (ms)
    pub slide_end_time: f64,
    /// Mirrors the stage's ground contact, refreshed every frame
    pub grounded: bool,
    /// Mirrors the stage body's vertical velocity (negative = upward)
    pub vertical_velocity: f32,
    pub profile: HitboxProfile,
}

impl PlayerState {
    pub fn new(sprite: SpriteId) -> Self {
        Self {
            sprite,
            sliding: false,
            slide_end_time: 0.0,
            grounded: true,
            vertical_velocity: 0.0,
            profile: HitboxProfile::Standing,
        }
    }

    /// Initial grounded standing pose
    pub fn home() -> Vec2 {
        Vec2::new(PLAYER_X, GROUND_Y)
    }

    pub fn hitbox(&self) -> Hitbox {
        self.profile.hitbox()
    }
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Sits on the ground; jump over it
    Low,
    /// Hangs at head height; slide under it
    High,
}

impl ObstacleKind {
    pub fn hitbox(&self) -> Hitbox {
        match self {
            ObstacleKind::Low => Hitbox::new(36.0, 44.0),
            ObstacleKind::High => Hitbox::new(56.0, 30.0),
        }
    }

    /// Anchor height (bottom edge) for this kind
    pub fn base_y(&self) -> f32 {
        match self {
            ObstacleKind::Low => GROUND_Y,
            ObstacleKind::High => GROUND_Y - 40.0,
        }
    }
}

/// An obstacle entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub sprite: SpriteId,
    pub kind: ObstacleKind,
    /// Bottom-center anchor
    pub pos: Vec2,
    pub hitbox: Hitbox,
}

impl Obstacle {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_anchor(self.pos, &self.hitbox)
    }
}

/// The owned context of one runner scene
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    /// Seed the scene was created with
    pub seed: u64,
    pub rng: Pcg32,
    pub run: RunState,
    pub player: PlayerState,
    /// Active obstacles, order irrelevant
    pub obstacles: Vec<Obstacle>,
    pub scheduler: SpawnScheduler,
    /// Completed runs in this scene
    pub runs: u32,
}

impl GameState {
    /// Build the scene: generate textures, create ground and runner, show the
    /// start overlay
    pub fn new<S: Stage>(tuning: Tuning, seed: u64, stage: &mut S) -> Self {
        let tuning = tuning.sanitized();

        for spec in assets::textures() {
            stage.generate_texture(&spec);
        }
        stage.create_sprite(
            assets::GROUND_TEXTURE,
            Vec2::new(PLAYFIELD_WIDTH / 2.0, PLAYFIELD_HEIGHT),
            Layer::Scenery,
        );

        let sprite = stage.create_sprite(assets::RUNNER_TEXTURE, PlayerState::home(), Layer::Player);
        stage.set_hitbox(sprite, HitboxProfile::Standing.hitbox());
        stage.set_gravity(tuning.gravity(tuning.base_speed));
        stage.show_overlay(&assets::start_overlay());

        let run = RunState::new(tuning.base_speed);
        stage.set_score_text(&assets::score_text(run.display_score()), &assets::score_style());

        log::info!("Runner scene created with seed {}", seed);

        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            run,
            player: PlayerState::new(sprite),
            obstacles: Vec::new(),
            scheduler: SpawnScheduler::default(),
            runs: 0,
            tuning,
        }
    }

    /// Switch the runner's collision profile (no-op if unchanged)
    pub fn set_profile<S: Stage>(&mut self, stage: &mut S, profile: HitboxProfile) {
        if self.player.profile != profile {
            self.player.profile = profile;
            stage.set_hitbox(self.player.sprite, profile.hitbox());
        }
    }

    /// Pull ground contact and vertical velocity from the stage
    pub fn sync_player<S: Stage>(&mut self, stage: &S) {
        self.player.grounded = stage.is_grounded(self.player.sprite);
        self.player.vertical_velocity = stage.velocity_y(self.player.sprite);
    }

    /// Destroy every obstacle sprite
    pub fn clear_obstacles<S: Stage>(&mut self, stage: &mut S) {
        for obstacle in self.obstacles.drain(..) {
            stage.destroy_sprite(obstacle.sprite);
        }
    }
}
