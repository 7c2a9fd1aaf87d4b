//! Run simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering and
//! platform dependencies:
//! - Frame-driven, single writer: one `tick` per rendered frame
//! - Seeded RNG only
//! - Engine capabilities reached only through the `Stage` trait

pub mod assets;
pub mod collision;
pub mod spawn;
pub mod stage;
pub mod state;
pub mod tick;
pub mod world;

pub use collision::{Aabb, Hitbox};
pub use spawn::{SPAWN_X, SpawnScheduler};
pub use stage::{Layer, Overlay, PanelStyle, SpriteId, Stage, TextAlign, TextStyle, TextureSpec};
pub use state::{GameState, HitboxProfile, Obstacle, ObstacleKind, PlayerState, RunPhase, RunState};
pub use tick::{TickInput, tick};
pub use world::{ArcadeWorld, DrawRect, Sprite};
