//! Obstacle cadence, movement and disposal

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::assets::OBSTACLE_TEXTURE;
use super::state::{GameState, Obstacle, ObstacleKind};
use super::stage::{Layer, Stage};
use crate::consts::{DISPOSE_X, PLAYFIELD_WIDTH, SPAWN_MARGIN};

/// When the next obstacle is due
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SpawnScheduler {
    /// Timestamp (ms) of the next spawn
    pub next_spawn_at: f64,
}

impl SpawnScheduler {
    pub fn due(&self, now: f64) -> bool {
        now >= self.next_spawn_at
    }

    pub fn schedule(&mut self, now: f64, gap_ms: f64) {
        self.next_spawn_at = now + gap_ms;
    }
}

/// X coordinate where new obstacles appear
pub const SPAWN_X: f32 = PLAYFIELD_WIDTH + SPAWN_MARGIN;

impl GameState {
    /// Spawn one obstacle if the scheduler is due, then reschedule.
    /// Returns the kind spawned.
    pub fn spawn_if_due<S: Stage>(&mut self, stage: &mut S, now: f64) -> Option<ObstacleKind> {
        if !self.scheduler.due(now) {
            return None;
        }

        let kind = if self.rng.random_bool(0.5) {
            ObstacleKind::Low
        } else {
            ObstacleKind::High
        };
        self.spawn_obstacle(stage, kind);

        let gap = self.tuning.spawn_gap_ms(self.run.speed);
        self.scheduler.schedule(now, gap);
        log::debug!("Spawned {:?} obstacle, next in {:.0}ms", kind, gap);

        Some(kind)
    }

    /// Place an obstacle of `kind` just past the right edge
    pub fn spawn_obstacle<S: Stage>(&mut self, stage: &mut S, kind: ObstacleKind) {
        let pos = Vec2::new(SPAWN_X, kind.base_y());
        let hitbox = kind.hitbox();
        let sprite = stage.create_sprite(OBSTACLE_TEXTURE, pos, Layer::Obstacle);
        stage.set_hitbox(sprite, hitbox);
        self.obstacles.push(Obstacle {
            sprite,
            kind,
            pos,
            hitbox,
        });
    }

    /// Scroll every obstacle left by `speed * dt` and dispose of the ones past
    /// the cutoff. Returns how many were disposed.
    pub fn scroll_obstacles<S: Stage>(&mut self, stage: &mut S, dt: f64) -> usize {
        let shift = (self.run.speed as f64 * dt / 1000.0) as f32;
        for obstacle in &mut self.obstacles {
            obstacle.pos.x -= shift;
            stage.set_sprite_x(obstacle.sprite, obstacle.pos.x);
        }

        let before = self.obstacles.len();
        self.obstacles.retain(|o| {
            if o.pos.x < DISPOSE_X {
                stage.destroy_sprite(o.sprite);
                false
            } else {
                true
            }
        });
        let disposed = before - self.obstacles.len();
        if disposed > 0 {
            log::debug!("Disposed {} obstacle(s)", disposed);
        }
        disposed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::stage::testing::FakeStage;
    use crate::tuning::Tuning;

    fn scene() -> (GameState, FakeStage) {
        let mut stage = FakeStage::new();
        let state = GameState::new(Tuning::default(), 7, &mut stage);
        (state, stage)
    }

    #[test]
    fn test_not_due_before_deadline() {
        let (mut state, mut stage) = scene();
        state.scheduler.schedule(0.0, 1000.0);
        assert!(state.spawn_if_due(&mut stage, 999.0).is_none());
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_spawn_places_obstacle_past_right_edge() {
        let (mut state, mut stage) = scene();
        state.scheduler.schedule(0.0, 500.0);

        let kind = state.spawn_if_due(&mut stage, 500.0).unwrap();

        assert_eq!(state.obstacles.len(), 1);
        let obs = &state.obstacles[0];
        assert_eq!(obs.kind, kind);
        assert!((obs.pos.x - (PLAYFIELD_WIDTH + 120.0)).abs() < 1e-6);
        assert!((obs.pos.y - kind.base_y()).abs() < 1e-6);
        assert_eq!(stage.sprite(obs.sprite).hitbox, Some(kind.hitbox()));
        assert_eq!(stage.count(Layer::Obstacle), 1);
    }

    #[test]
    fn test_spawn_reschedules_with_speed_scaled_gap() {
        let (mut state, mut stage) = scene();
        state.run.speed = 460.0;
        state.spawn_if_due(&mut stage, 2000.0);
        assert!((state.scheduler.next_spawn_at - (2000.0 + 1360.0)).abs() < 1e-6);
    }

    #[test]
    fn test_both_kinds_appear() {
        let (mut state, mut stage) = scene();
        let mut low = 0;
        let mut high = 0;
        for i in 0..200 {
            state.scheduler.next_spawn_at = 0.0;
            match state.spawn_if_due(&mut stage, i as f64) {
                Some(ObstacleKind::Low) => low += 1,
                Some(ObstacleKind::High) => high += 1,
                None => unreachable!(),
            }
        }
        assert!(low > 50, "low={}", low);
        assert!(high > 50, "high={}", high);
    }

    #[test]
    fn test_scroll_moves_by_speed_times_dt() {
        let (mut state, mut stage) = scene();
        state.spawn_obstacle(&mut stage, ObstacleKind::Low);

        state.scroll_obstacles(&mut stage, 1000.0);

        let expected = PLAYFIELD_WIDTH + 120.0 - 360.0;
        assert!((state.obstacles[0].pos.x - expected).abs() < 1e-3);
        assert!((stage.sprite(state.obstacles[0].sprite).pos.x - expected).abs() < 1e-3);
    }

    #[test]
    fn test_scroll_disposes_past_cutoff() {
        let (mut state, mut stage) = scene();
        state.spawn_obstacle(&mut stage, ObstacleKind::High);
        state.spawn_obstacle(&mut stage, ObstacleKind::Low);
        state.obstacles[0].pos.x = DISPOSE_X + 1.0;
        let gone = state.obstacles[0].sprite;

        let disposed = state.scroll_obstacles(&mut stage, 100.0);

        assert_eq!(disposed, 1);
        assert_eq!(state.obstacles.len(), 1);
        assert!(stage.destroyed.contains(&gone));
        assert_eq!(stage.count(Layer::Obstacle), 1);
    }
}
