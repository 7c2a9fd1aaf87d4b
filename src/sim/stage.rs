//! Capability boundary between the run controller and whatever draws,
//! simulates and collides sprites.
//!
//! The controller never owns sprites or bodies; it asks a [`Stage`] to create,
//! move and destroy them, and queries it for ground contact. [`super::world::ArcadeWorld`]
//! is the in-crate implementation; tests use [`testing::FakeStage`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Hitbox;

/// Handle to a sprite owned by the stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpriteId(pub u32);

/// How the stage should treat a sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Layer {
    /// Static decoration, no body
    Scenery,
    /// Gravity-driven body resting on the ground
    Player,
    /// Immovable body the player must not overlap
    Obstacle,
}

/// A generated solid-color image registered under a name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureSpec {
    pub name: String,
    pub width: f32,
    pub height: f32,
    /// 0xRRGGBB
    pub color: u32,
    /// 0 for a plain rectangle
    pub corner_radius: f32,
}

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

impl TextAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

/// Recognized text drawing options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextStyle {
    pub font_family: String,
    /// Pixels
    pub font_size: f32,
    /// 0xRRGGBB
    pub color: u32,
    pub align: TextAlign,
    /// Extra pixels between lines
    pub line_spacing: f32,
    /// Wrap lines longer than this many pixels
    pub wrap_width: Option<f32>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "system-ui, sans-serif".to_string(),
            font_size: 20.0,
            color: 0xffffff,
            align: TextAlign::Center,
            line_spacing: 0.0,
            wrap_width: None,
        }
    }
}

impl TextStyle {
    pub fn sized(font_size: f32) -> Self {
        Self {
            font_size,
            ..Self::default()
        }
    }

    pub fn color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }

    pub fn align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    pub fn line_spacing(mut self, spacing: f32) -> Self {
        self.line_spacing = spacing;
        self
    }

    pub fn wrap(mut self, width: f32) -> Self {
        self.wrap_width = Some(width);
        self
    }
}

/// Backing rectangle behind overlay text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelStyle {
    /// Center of the panel in playfield coordinates
    pub center: Vec2,
    pub size: Vec2,
    /// 0xRRGGBB
    pub color: u32,
    pub alpha: f32,
    pub corner_radius: f32,
}

/// Title/body/hint card shown before a run and after game over
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overlay {
    pub title: String,
    pub body: String,
    pub hint: String,
    pub panel: PanelStyle,
    pub title_style: TextStyle,
    pub body_style: TextStyle,
    pub hint_style: TextStyle,
}

/// Everything the run controller needs from a rendering/physics runtime
pub trait Stage {
    /// Register a generated image under `spec.name`
    fn generate_texture(&mut self, spec: &TextureSpec);

    /// Create a sprite anchored (bottom-center) at `pos`
    fn create_sprite(&mut self, texture: &str, pos: Vec2, layer: Layer) -> SpriteId;

    /// Replace a sprite's collision box
    fn set_hitbox(&mut self, id: SpriteId, hitbox: Hitbox);

    fn set_sprite_x(&mut self, id: SpriteId, x: f32);

    /// Release a sprite; unknown ids are ignored
    fn destroy_sprite(&mut self, id: SpriteId);

    /// Whether a body is resting on the ground
    fn is_grounded(&self, id: SpriteId) -> bool;

    fn velocity_y(&self, id: SpriteId) -> f32;

    fn set_velocity_y(&mut self, id: SpriteId, vy: f32);

    /// Teleport a body and zero its velocity
    fn place_body(&mut self, id: SpriteId, pos: Vec2);

    /// Downward acceleration applied to player bodies (pixels/s²)
    fn set_gravity(&mut self, gravity: f32);

    /// Freeze or resume physics integration
    fn set_paused(&mut self, paused: bool);

    /// Show an overlay, destroying any overlay already on screen
    fn show_overlay(&mut self, overlay: &Overlay);

    fn hide_overlay(&mut self);

    fn set_score_text(&mut self, text: &str, style: &TextStyle);
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_style_builder() {
        let style = TextStyle::sized(32.0)
            .color(0xffcc00)
            .align(TextAlign::Left)
            .line_spacing(6.0)
            .wrap(400.0);
        assert!((style.font_size - 32.0).abs() < 1e-6);
        assert_eq!(style.color, 0xffcc00);
        assert_eq!(style.align, TextAlign::Left);
        assert_eq!(style.wrap_width, Some(400.0));
    }

    #[test]
    fn test_text_style_rejects_unknown_options() {
        let ok: Result<TextStyle, _> = serde_json::from_str(r#"{ "font_size": 18.0, "align": "right" }"#);
        let ok = ok.unwrap();
        assert_eq!(ok.align, TextAlign::Right);
        assert_eq!(ok.font_family, TextStyle::default().font_family);

        let bad: Result<TextStyle, _> = serde_json::from_str(r#"{ "stroke": "red" }"#);
        assert!(bad.is_err());
    }
}
