//! Minimal arcade physics world implementing [`Stage`]
//!
//! Player bodies fall under gravity and rest on a flat ground line; obstacle
//! bodies never move on their own. [`ArcadeWorld::step`] integrates one frame
//! and reports the first obstacle the player overlaps. Obstacle boxes are
//! swept over the x-range they crossed since the previous step, so a long
//! frame cannot carry an obstacle through the runner.

use std::collections::{BTreeMap, HashMap};

use glam::Vec2;

use super::collision::{Aabb, Hitbox};
use super::stage::{Layer, Overlay, SpriteId, Stage, TextStyle, TextureSpec};
use crate::consts::GROUND_Y;

/// A sprite and its (optional) body
#[derive(Debug, Clone)]
pub struct Sprite {
    pub texture: String,
    /// Bottom-center anchor
    pub pos: Vec2,
    pub layer: Layer,
    pub hitbox: Option<Hitbox>,
    /// Vertical velocity (pixels/s, negative = upward)
    pub vel_y: f32,
    /// Anchor x at the end of the previous step
    pub prev_x: f32,
}

impl Sprite {
    /// Collision rectangle, if the sprite has a body
    pub fn bounds(&self) -> Option<Aabb> {
        self.hitbox.as_ref().map(|hb| Aabb::from_anchor(self.pos, hb))
    }

    /// Collision rectangle stretched over the x-range crossed this step
    pub fn swept_bounds(&self) -> Option<Aabb> {
        let hitbox = self.hitbox.as_ref()?;
        let now = Aabb::from_anchor(self.pos, hitbox);
        let before = Aabb::from_anchor(Vec2::new(self.prev_x, self.pos.y), hitbox);
        Some(Aabb::new(now.min.min(before.min), now.max.max(before.max)))
    }
}

/// A filled rectangle ready for a renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawRect {
    pub min: Vec2,
    pub max: Vec2,
    /// 0xRRGGBB
    pub color: u32,
    pub alpha: f32,
    pub corner_radius: f32,
}

/// In-process stage: sprite registry, gravity, ground contact, overlap
#[derive(Debug, Clone)]
pub struct ArcadeWorld {
    textures: HashMap<String, TextureSpec>,
    /// Ordered by id for deterministic iteration
    sprites: BTreeMap<SpriteId, Sprite>,
    gravity: f32,
    ground_y: f32,
    paused: bool,
    overlay: Option<Overlay>,
    score_text: String,
    score_style: TextStyle,
    next_id: u32,
}

impl Default for ArcadeWorld {
    fn default() -> Self {
        Self::new(GROUND_Y)
    }
}

impl ArcadeWorld {
    pub fn new(ground_y: f32) -> Self {
        Self {
            textures: HashMap::new(),
            sprites: BTreeMap::new(),
            gravity: 0.0,
            ground_y,
            paused: false,
            overlay: None,
            score_text: String::new(),
            score_style: TextStyle::default(),
            next_id: 1,
        }
    }

    /// Integrate player bodies over `dt` milliseconds and return the first
    /// obstacle overlapping a player. Nothing moves while paused.
    pub fn step(&mut self, dt: f64) -> Option<SpriteId> {
        if self.paused {
            return None;
        }

        let dt_s = (dt / 1000.0) as f32;
        let gravity = self.gravity;
        let ground_y = self.ground_y;
        for sprite in self.sprites.values_mut().filter(|s| s.layer == Layer::Player) {
            sprite.vel_y += gravity * dt_s;
            sprite.pos.y += sprite.vel_y * dt_s;
            if sprite.pos.y >= ground_y {
                sprite.pos.y = ground_y;
                sprite.vel_y = 0.0;
            }
        }

        let hit = self.first_overlap();
        for sprite in self.sprites.values_mut() {
            sprite.prev_x = sprite.pos.x;
        }
        hit
    }

    /// First obstacle (by id) whose swept hitbox overlaps any player hitbox
    pub fn first_overlap(&self) -> Option<SpriteId> {
        let players: Vec<Aabb> = self
            .sprites
            .values()
            .filter(|s| s.layer == Layer::Player)
            .filter_map(Sprite::bounds)
            .collect();

        self.sprites
            .iter()
            .filter(|(_, s)| s.layer == Layer::Obstacle)
            .find(|(_, s)| {
                s.swept_bounds()
                    .is_some_and(|b| players.iter().any(|p| p.overlaps(&b)))
            })
            .map(|(id, _)| *id)
    }

    /// Rectangles to draw, back to front: scenery, obstacles, players.
    /// Bodies draw at their hitbox; scenery at its texture size.
    pub fn draw_list(&self) -> Vec<DrawRect> {
        let mut rects: Vec<(u8, DrawRect)> = self
            .sprites
            .values()
            .filter_map(|sprite| {
                let texture = self.textures.get(&sprite.texture)?;
                let bounds = sprite.bounds().unwrap_or_else(|| {
                    Aabb::from_anchor(sprite.pos, &Hitbox::new(texture.width, texture.height))
                });
                let depth = match sprite.layer {
                    Layer::Scenery => 0,
                    Layer::Obstacle => 1,
                    Layer::Player => 2,
                };
                Some((
                    depth,
                    DrawRect {
                        min: bounds.min,
                        max: bounds.max,
                        color: texture.color,
                        alpha: 1.0,
                        corner_radius: texture.corner_radius,
                    },
                ))
            })
            .collect();
        rects.sort_by_key(|(depth, _)| *depth);
        rects.into_iter().map(|(_, rect)| rect).collect()
    }

    pub fn sprite(&self, id: SpriteId) -> Option<&Sprite> {
        self.sprites.get(&id)
    }

    pub fn sprite_count(&self, layer: Layer) -> usize {
        self.sprites.values().filter(|s| s.layer == layer).count()
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    pub fn score_text(&self) -> &str {
        &self.score_text
    }

    pub fn score_style(&self) -> &TextStyle {
        &self.score_style
    }
}

impl Stage for ArcadeWorld {
    fn generate_texture(&mut self, spec: &TextureSpec) {
        self.textures.insert(spec.name.clone(), spec.clone());
    }

    fn create_sprite(&mut self, texture: &str, pos: Vec2, layer: Layer) -> SpriteId {
        let id = SpriteId(self.next_id);
        self.next_id += 1;
        self.sprites.insert(
            id,
            Sprite {
                texture: texture.to_string(),
                pos,
                layer,
                hitbox: None,
                vel_y: 0.0,
                prev_x: pos.x,
            },
        );
        id
    }

    fn set_hitbox(&mut self, id: SpriteId, hitbox: Hitbox) {
        if let Some(sprite) = self.sprites.get_mut(&id) {
            sprite.hitbox = Some(hitbox);
        }
    }

    fn set_sprite_x(&mut self, id: SpriteId, x: f32) {
        if let Some(sprite) = self.sprites.get_mut(&id) {
            sprite.pos.x = x;
        }
    }

    fn destroy_sprite(&mut self, id: SpriteId) {
        self.sprites.remove(&id);
    }

    fn is_grounded(&self, id: SpriteId) -> bool {
        self.sprites
            .get(&id)
            .is_some_and(|s| s.pos.y >= self.ground_y && s.vel_y >= 0.0)
    }

    fn velocity_y(&self, id: SpriteId) -> f32 {
        self.sprites.get(&id).map_or(0.0, |s| s.vel_y)
    }

    fn set_velocity_y(&mut self, id: SpriteId, vy: f32) {
        if let Some(sprite) = self.sprites.get_mut(&id) {
            sprite.vel_y = vy;
        }
    }

    fn place_body(&mut self, id: SpriteId, pos: Vec2) {
        if let Some(sprite) = self.sprites.get_mut(&id) {
            sprite.pos = pos;
            sprite.prev_x = pos.x;
            sprite.vel_y = 0.0;
        }
    }

    fn set_gravity(&mut self, gravity: f32) {
        self.gravity = gravity;
    }

    fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    fn show_overlay(&mut self, overlay: &Overlay) {
        self.overlay = Some(overlay.clone());
    }

    fn hide_overlay(&mut self) {
        self.overlay = None;
    }

    fn set_score_text(&mut self, text: &str, style: &TextStyle) {
        if self.score_text != text {
            self.score_text = text.to_string();
        }
        if &self.score_style != style {
            self.score_style = style.clone();
        }
    }
}
