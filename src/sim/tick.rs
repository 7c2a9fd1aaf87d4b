//! Per-frame run controller
//!
//! One [`tick`] per rendered frame. Input arrives as a [`TickInput`] collected
//! by the host before the frame; overlap events arrive through [`GameState::on_overlap`]
//! after the stage steps its physics.

use super::assets;
use super::collision::Aabb;
use super::state::{GameState, HitboxProfile, ObstacleKind, PlayerState, RunPhase};
use super::stage::Stage;

/// Input commands for a single frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Start or restart (pointer down, start key)
    pub start: bool,
    /// Jump key pressed this frame, or swipe up
    pub jump: bool,
    /// A slide key is currently held
    pub slide_held: bool,
    /// Swipe down this frame
    pub touch_slide: bool,
    /// Idle/demo mode - the controller plays itself
    pub idle_mode: bool,
}

/// Advance the scene by one frame
pub fn tick<S: Stage>(state: &mut GameState, stage: &mut S, input: &TickInput, now: f64, dt: f64) {
    match state.run.phase {
        RunPhase::NotStarted | RunPhase::GameOver => {
            if input.start || input.jump || input.idle_mode {
                state.start_run(stage, now);
            }
            return;
        }
        RunPhase::Running => {}
    }

    state.sync_player(stage);

    let mut input = input.clone();
    if input.idle_mode {
        autopilot(state, &mut input);
    }

    if input.jump {
        state.try_jump(stage);
    }
    if input.slide_held {
        let duration = state.tuning.slide_min_ms;
        state.start_slide_for(stage, now, duration);
    }
    if input.touch_slide {
        let duration = state.tuning.touch_slide_ms(state.run.speed);
        state.start_slide_for(stage, now, duration);
    }
    state.maybe_end_slide(stage, now, input.slide_held);

    state.advance(stage, now, dt);
    state.spawn_if_due(stage, now);
    state.scroll_obstacles(stage, dt);

    stage.set_score_text(
        &assets::score_text(state.run.display_score()),
        &assets::score_style(),
    );
}

impl GameState {
    /// Ramp speed, rescale gravity and accumulate score. Inert unless running.
    pub fn advance<S: Stage>(&mut self, stage: &mut S, _now: f64, dt: f64) {
        if !self.run.running() {
            return;
        }

        let ramped = self.run.speed as f64 + dt * self.tuning.speed_ramp_rate as f64;
        self.run.speed = (ramped as f32).min(self.tuning.max_speed);

        stage.set_gravity(self.tuning.gravity(self.run.speed));

        self.run.score += dt * self.run.speed as f64 / 1000.0;
    }

    /// Launch upward if grounded; ends a slide first. Returns whether the
    /// jump happened.
    pub fn try_jump<S: Stage>(&mut self, stage: &mut S) -> bool {
        if !self.run.running() {
            return false;
        }
        self.sync_player(stage);
        if !self.player.grounded {
            return false;
        }

        if self.player.sliding {
            self.end_slide(stage);
        }

        let vy = self.tuning.jump_velocity(self.run.speed);
        stage.set_velocity_y(self.player.sprite, vy);
        self.player.vertical_velocity = vy;
        self.player.grounded = false;
        true
    }

    /// Enter (or extend) a slide lasting at least until `now + duration_ms`.
    /// Repeated calls only ever push the end time later.
    pub fn start_slide_for<S: Stage>(&mut self, stage: &mut S, now: f64, duration_ms: f64) -> bool {
        if !self.run.running() {
            return false;
        }
        self.sync_player(stage);
        if !self.player.grounded {
            return false;
        }

        if !self.player.sliding {
            self.player.sliding = true;
            self.set_profile(stage, HitboxProfile::Sliding);
        }
        self.player.slide_end_time = self.player.slide_end_time.max(now + duration_ms);
        true
    }

    /// Stand back up once the slide window has elapsed and no key holds it
    pub fn maybe_end_slide<S: Stage>(&mut self, stage: &mut S, now: f64, held: bool) {
        if self.player.sliding && !held && now >= self.player.slide_end_time {
            self.end_slide(stage);
        }
    }

    fn end_slide<S: Stage>(&mut self, stage: &mut S) {
        self.player.sliding = false;
        self.set_profile(stage, HitboxProfile::Standing);
    }

    /// Overlap between the runner and an obstacle
    pub fn on_overlap<S: Stage>(&mut self, stage: &mut S) {
        self.trigger_game_over(stage);
    }

    /// End the run. Only the first call of a run takes effect.
    pub fn trigger_game_over<S: Stage>(&mut self, stage: &mut S) -> bool {
        if !self.run.running() {
            return false;
        }

        self.run.phase = RunPhase::GameOver;
        self.runs += 1;
        stage.set_paused(true);
        stage.show_overlay(&assets::game_over_overlay(self.run.display_score()));

        log::info!(
            "Game over: score {} at speed {:.0} (run {})",
            self.run.display_score(),
            self.run.speed,
            self.runs
        );
        true
    }

    /// Begin a fresh run: used for the first start and every restart
    pub fn start_run<S: Stage>(&mut self, stage: &mut S, now: f64) {
        let restart = self.run.over();

        self.run.speed = self.tuning.base_speed;
        self.run.score = 0.0;
        self.run.phase = RunPhase::Running;

        self.clear_obstacles(stage);

        let sprite = self.player.sprite;
        self.player = PlayerState::new(sprite);
        stage.place_body(sprite, PlayerState::home());
        stage.set_hitbox(sprite, HitboxProfile::Standing.hitbox());
        stage.set_gravity(self.tuning.gravity(self.run.speed));

        self.scheduler.schedule(now, self.tuning.first_spawn_delay_ms);

        stage.hide_overlay();
        stage.set_paused(false);
        stage.set_score_text(&assets::score_text(0), &assets::score_style());

        if restart {
            log::info!("Run restarted");
        } else {
            log::info!("Run started");
        }
    }
}

/// Demo player: jump low obstacles so the apex lines up with them, hold a
/// slide while a high obstacle is close
fn autopilot(state: &GameState, input: &mut TickInput) {
    let runner = Aabb::from_anchor(PlayerState::home(), &HitboxProfile::Standing.hitbox());
    let speed = state.run.speed;

    let next = state
        .obstacles
        .iter()
        .filter(|o| o.bounds().max.x > runner.min.x)
        .min_by(|a, b| {
            a.pos
                .x
                .partial_cmp(&b.pos.x)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    let Some(obstacle) = next else {
        return;
    };

    let bounds = obstacle.bounds();
    let gap = bounds.min.x - runner.max.x;

    match obstacle.kind {
        ObstacleKind::Low => {
            let apex_time = -state.tuning.jump_velocity(speed) / state.tuning.gravity(speed);
            let crossing_time = (bounds.width() + runner.width()) / speed;
            if gap > 0.0 && gap <= speed * (apex_time - crossing_time / 2.0) {
                input.jump = true;
            }
        }
        ObstacleKind::High => {
            if gap <= speed * 0.25 {
                input.slide_held = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::stage::testing::FakeStage;
    use crate::sim::stage::Layer;
    use crate::tuning::Tuning;

    const FRAME: f64 = 1000.0 / 60.0;

    fn scene() -> (GameState, FakeStage) {
        let mut stage = FakeStage::new();
        let state = GameState::new(Tuning::default(), 12345, &mut stage);
        (state, stage)
    }

    fn running() -> (GameState, FakeStage) {
        let (mut state, mut stage) = scene();
        state.start_run(&mut stage, 0.0);
        (state, stage)
    }

    #[test]
    fn test_tick_not_started_to_running() {
        let (mut state, mut stage) = scene();

        tick(&mut state, &mut stage, &TickInput::default(), 0.0, FRAME);
        assert_eq!(state.run.phase, RunPhase::NotStarted);

        let input = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &mut stage, &input, FRAME, FRAME);
        assert_eq!(state.run.phase, RunPhase::Running);
        assert!(stage.overlay.is_none());
        assert!(!stage.paused);
    }

    #[test]
    fn test_advance_inert_before_start() {
        let (mut state, mut stage) = scene();
        for i in 0..10 {
            state.advance(&mut stage, i as f64 * FRAME, FRAME);
        }
        assert_eq!(state.run.score, 0.0);
        assert!((state.run.speed - BASE_SPEED).abs() < f32::EPSILON);
    }

    #[test]
    fn test_advance_inert_after_game_over() {
        let (mut state, mut stage) = running();
        state.advance(&mut stage, FRAME, FRAME);
        state.trigger_game_over(&mut stage);
        let (speed, score) = (state.run.speed, state.run.score);

        for i in 0..10 {
            state.advance(&mut stage, i as f64 * FRAME, FRAME);
        }
        assert_eq!(state.run.speed, speed);
        assert_eq!(state.run.score, score);
    }

    #[test]
    fn test_score_matches_exact_sum_over_one_second() {
        let (mut state, mut stage) = running();
        let dt = 16.67;
        let mut expected = 0.0;
        let mut speed = BASE_SPEED;
        let mut elapsed = 0.0;

        for _ in 0..60 {
            speed = ((speed as f64 + dt * SPEED_RAMP_RATE as f64) as f32).min(MAX_SPEED);
            expected += dt * speed as f64 / 1000.0;
            elapsed += dt;
            state.advance(&mut stage, elapsed, dt);
        }

        assert!((state.run.score - expected).abs() < 1e-9, "{} vs {}", state.run.score, expected);
        // Roughly one second at base speed
        assert!(state.run.score > 355.0 && state.run.score < 370.0);
    }

    #[test]
    fn test_speed_monotonic_and_capped() {
        let (mut state, mut stage) = running();
        let mut last = state.run.speed;
        for i in 0..10_000 {
            state.advance(&mut stage, i as f64 * 50.0, 50.0);
            assert!(state.run.speed >= last);
            assert!(state.run.speed <= MAX_SPEED);
            last = state.run.speed;
        }
        assert!((state.run.speed - MAX_SPEED).abs() < f32::EPSILON);
    }

    #[test]
    fn test_advance_scales_gravity() {
        let (mut state, mut stage) = running();
        state.run.speed = 720.0;
        state.advance(&mut stage, 0.0, 0.0);
        assert!((stage.gravity - GRAVITY_BASE * 2.0).abs() < 1e-2);
    }

    #[test]
    fn test_jump_when_grounded() {
        let (mut state, mut stage) = running();
        assert!(state.try_jump(&mut stage));
        let vy = stage.sprite(state.player.sprite).vy;
        assert!((vy - (-JUMP_BASE)).abs() < 1e-3);
        assert!(!state.player.grounded);
    }

    #[test]
    fn test_jump_velocity_scales_with_sqrt_speed_factor() {
        let (mut state, mut stage) = running();
        state.run.speed = 720.0;
        state.try_jump(&mut stage);
        let vy = stage.sprite(state.player.sprite).vy;
        assert!((vy - (-JUMP_BASE * 2.0_f32.sqrt())).abs() < 1e-2);
    }

    #[test]
    fn test_jump_while_airborne_is_noop() {
        let (mut state, mut stage) = running();
        let sprite = state.player.sprite;
        stage.set_grounded(sprite, false);
        stage.set_velocity_y(sprite, -120.0);
        let hitbox_before = stage.sprite(sprite).hitbox;

        assert!(!state.try_jump(&mut stage));
        assert!((stage.sprite(sprite).vy - (-120.0)).abs() < f32::EPSILON);
        assert_eq!(stage.sprite(sprite).hitbox, hitbox_before);
        assert_eq!(state.player.profile, HitboxProfile::Standing);
    }

    #[test]
    fn test_double_jump_rejected() {
        let (mut state, mut stage) = running();
        assert!(state.try_jump(&mut stage));
        assert!(!state.try_jump(&mut stage));
    }

    #[test]
    fn test_jump_ends_slide() {
        let (mut state, mut stage) = running();
        state.start_slide_for(&mut stage, 0.0, 500.0);
        assert!(state.player.sliding);

        assert!(state.try_jump(&mut stage));
        assert!(!state.player.sliding);
        assert_eq!(state.player.profile, HitboxProfile::Standing);
        assert_eq!(
            stage.sprite(state.player.sprite).hitbox,
            Some(HitboxProfile::Standing.hitbox())
        );
    }

    #[test]
    fn test_slide_switches_profile() {
        let (mut state, mut stage) = running();
        assert!(state.start_slide_for(&mut stage, 100.0, 300.0));
        assert!(state.player.sliding);
        assert!((state.player.slide_end_time - 400.0).abs() < 1e-9);
        assert_eq!(
            stage.sprite(state.player.sprite).hitbox,
            Some(HitboxProfile::Sliding.hitbox())
        );
    }

    #[test]
    fn test_slide_requires_ground() {
        let (mut state, mut stage) = running();
        stage.set_grounded(state.player.sprite, false);
        assert!(!state.start_slide_for(&mut stage, 0.0, 300.0));
        assert!(!state.player.sliding);
        assert_eq!(state.player.profile, HitboxProfile::Standing);
    }

    #[test]
    fn test_slide_extension_never_shortens() {
        let (mut state, mut stage) = running();
        state.start_slide_for(&mut stage, 1000.0, 500.0);
        state.start_slide_for(&mut stage, 1000.0, 200.0);
        assert!((state.player.slide_end_time - 1500.0).abs() < 1e-9);

        state.start_slide_for(&mut stage, 1400.0, 300.0);
        assert!((state.player.slide_end_time - 1700.0).abs() < 1e-9);
    }

    #[test]
    fn test_slide_ends_after_window() {
        let (mut state, mut stage) = running();
        state.start_slide_for(&mut stage, 0.0, 300.0);

        state.maybe_end_slide(&mut stage, 299.0, false);
        assert!(state.player.sliding);

        state.maybe_end_slide(&mut stage, 300.0, false);
        assert!(!state.player.sliding);
        assert_eq!(state.player.profile, HitboxProfile::Standing);
    }

    #[test]
    fn test_held_slide_does_not_end() {
        let (mut state, mut stage) = running();
        state.start_slide_for(&mut stage, 0.0, 300.0);
        state.maybe_end_slide(&mut stage, 5000.0, true);
        assert!(state.player.sliding);
    }

    #[test]
    fn test_held_slide_key_through_ticks() {
        let (mut state, mut stage) = running();
        let held = TickInput {
            slide_held: true,
            ..Default::default()
        };
        let mut now = 0.0;
        for _ in 0..60 {
            now += FRAME;
            tick(&mut state, &mut stage, &held, now, FRAME);
            assert!(state.player.sliding);
        }

        // Released: the keyboard minimum still applies
        now += FRAME;
        tick(&mut state, &mut stage, &TickInput::default(), now, FRAME);
        assert!(state.player.sliding);

        now += SLIDE_MIN_MS;
        tick(&mut state, &mut stage, &TickInput::default(), now, FRAME);
        assert!(!state.player.sliding);
    }

    #[test]
    fn test_touch_slide_uses_speed_scaled_duration() {
        let (mut state, mut stage) = running();
        let input = TickInput {
            touch_slide: true,
            ..Default::default()
        };
        let expected = 1000.0 + state.tuning.touch_slide_ms(state.run.speed);
        tick(&mut state, &mut stage, &input, 1000.0, FRAME);
        assert!((state.player.slide_end_time - expected).abs() < 1e-6);
    }

    #[test]
    fn test_game_over_idempotent() {
        let (mut state, mut stage) = running();
        assert!(state.trigger_game_over(&mut stage));
        assert!(!state.trigger_game_over(&mut stage));
        assert_eq!(stage.overlays_shown, 2); // start + one game over
        assert_eq!(state.runs, 1);
        assert!(stage.paused);
    }

    #[test]
    fn test_no_game_over_before_start() {
        let (mut state, mut stage) = scene();
        assert!(!state.trigger_game_over(&mut stage));
        assert_eq!(state.run.phase, RunPhase::NotStarted);
    }

    #[test]
    fn test_game_over_freezes_obstacles() {
        let (mut state, mut stage) = running();
        state.spawn_obstacle(&mut stage, ObstacleKind::Low);
        state.on_overlap(&mut stage);
        let x = state.obstacles[0].pos.x;

        for i in 1..30 {
            tick(&mut state, &mut stage, &TickInput::default(), i as f64 * FRAME, FRAME);
        }
        assert_eq!(state.obstacles[0].pos.x, x);
        assert_eq!(state.obstacles.len(), 1);
    }

    #[test]
    fn test_input_ignored_after_game_over() {
        let (mut state, mut stage) = running();
        state.trigger_game_over(&mut stage);
        assert!(!state.try_jump(&mut stage));
        assert!(!state.start_slide_for(&mut stage, 0.0, 300.0));
    }

    #[test]
    fn test_restart_resets_run() {
        let (mut state, mut stage) = running();
        let sprite = state.player.sprite;
        state.run.speed = 700.0;
        state.run.score = 9000.0;
        state.spawn_obstacle(&mut stage, ObstacleKind::Low);
        state.spawn_obstacle(&mut stage, ObstacleKind::High);
        state.start_slide_for(&mut stage, 0.0, 400.0);
        stage.set_velocity_y(sprite, 50.0);
        state.trigger_game_over(&mut stage);

        let input = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &mut stage, &input, 5000.0, FRAME);

        assert_eq!(state.run.phase, RunPhase::Running);
        assert_eq!(state.run.score, 0.0);
        assert!((state.run.speed - BASE_SPEED).abs() < f32::EPSILON);
        assert!(state.obstacles.is_empty());
        assert_eq!(stage.count(Layer::Obstacle), 0);
        assert_eq!(state.player.profile, HitboxProfile::Standing);
        assert!(!state.player.sliding);
        assert!(state.player.grounded);
        assert_eq!(state.player.vertical_velocity, 0.0);
        assert_eq!(stage.sprite(sprite).vy, 0.0);
        assert_eq!(stage.sprite(sprite).pos, PlayerState::home());
        assert_eq!(stage.sprite(sprite).hitbox, Some(HitboxProfile::Standing.hitbox()));
        assert!((state.scheduler.next_spawn_at - (5000.0 + FIRST_SPAWN_DELAY_MS)).abs() < 1e-9);
        assert!(!stage.paused);
        assert!(stage.overlay.is_none());
    }

    #[test]
    fn test_first_obstacle_after_delay() {
        let (mut state, mut stage) = running();
        let mut now = 0.0;
        while now + FRAME < FIRST_SPAWN_DELAY_MS {
            now += FRAME;
            tick(&mut state, &mut stage, &TickInput::default(), now, FRAME);
        }
        assert!(state.obstacles.is_empty());

        now += FRAME;
        tick(&mut state, &mut stage, &TickInput::default(), now, FRAME);
        assert_eq!(state.obstacles.len(), 1);
    }

    #[test]
    fn test_score_text_follows_score() {
        let (mut state, mut stage) = running();
        let mut now = 0.0;
        for _ in 0..120 {
            now += FRAME;
            tick(&mut state, &mut stage, &TickInput::default(), now, FRAME);
        }
        assert_eq!(stage.score_text, state.run.display_score().to_string());
        assert!(state.run.display_score() > 0);
    }

    #[test]
    fn test_autopilot_jumps_low_obstacle() {
        let (mut state, mut stage) = running();
        state.spawn_obstacle(&mut stage, ObstacleKind::Low);
        state.obstacles[0].pos.x = PLAYER_X + 120.0;

        let mut input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        autopilot(&state, &mut input);
        assert!(input.jump);
        assert!(!input.slide_held);
    }

    #[test]
    fn test_autopilot_slides_under_high_obstacle() {
        let (mut state, mut stage) = running();
        state.spawn_obstacle(&mut stage, ObstacleKind::High);
        state.obstacles[0].pos.x = PLAYER_X + 60.0;

        let mut input = TickInput::default();
        autopilot(&state, &mut input);
        assert!(input.slide_held);
        assert!(!input.jump);
    }

    #[test]
    fn test_autopilot_waits_for_distant_obstacle() {
        let (mut state, mut stage) = running();
        state.spawn_obstacle(&mut stage, ObstacleKind::Low);

        let mut input = TickInput::default();
        autopilot(&state, &mut input);
        assert_eq!(input, TickInput::default());
    }

    #[test]
    fn test_idle_mode_starts_run() {
        let (mut state, mut stage) = scene();
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        tick(&mut state, &mut stage, &input, 0.0, FRAME);
        assert_eq!(state.run.phase, RunPhase::Running);
    }
}
