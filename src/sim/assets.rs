//! Generated textures, overlay cards and HUD text styles

use glam::Vec2;

use super::stage::{Overlay, PanelStyle, TextAlign, TextStyle, TextureSpec};
use crate::consts::{GROUND_Y, PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};

pub const RUNNER_TEXTURE: &str = "runner";
pub const OBSTACLE_TEXTURE: &str = "obstacle";
pub const GROUND_TEXTURE: &str = "ground";

/// Colors (0xRRGGBB)
pub mod colors {
    pub const RUNNER: u32 = 0x4fd1c5;
    pub const OBSTACLE: u32 = 0xf56565;
    pub const GROUND: u32 = 0x2d3748;
    pub const PANEL: u32 = 0x0b0f1a;
    pub const TITLE: u32 = 0xf7fafc;
    pub const BODY: u32 = 0xcbd5e0;
    pub const HINT: u32 = 0xf6e05e;
}

/// The three images generated at scene creation
pub fn textures() -> [TextureSpec; 3] {
    [
        TextureSpec {
            name: RUNNER_TEXTURE.to_string(),
            width: 34.0,
            height: 56.0,
            color: colors::RUNNER,
            corner_radius: 8.0,
        },
        TextureSpec {
            name: OBSTACLE_TEXTURE.to_string(),
            width: 36.0,
            height: 44.0,
            color: colors::OBSTACLE,
            corner_radius: 6.0,
        },
        TextureSpec {
            name: GROUND_TEXTURE.to_string(),
            width: PLAYFIELD_WIDTH,
            height: PLAYFIELD_HEIGHT - GROUND_Y,
            color: colors::GROUND,
            corner_radius: 0.0,
        },
    ]
}

fn card(title: &str, body: String, hint: &str) -> Overlay {
    let panel_width = 520.0;
    Overlay {
        title: title.to_string(),
        body,
        hint: hint.to_string(),
        panel: PanelStyle {
            center: Vec2::new(PLAYFIELD_WIDTH / 2.0, GROUND_Y / 2.0),
            size: Vec2::new(panel_width, 240.0),
            color: colors::PANEL,
            alpha: 0.82,
            corner_radius: 16.0,
        },
        title_style: TextStyle::sized(40.0).color(colors::TITLE),
        body_style: TextStyle::sized(18.0)
            .color(colors::BODY)
            .line_spacing(6.0)
            .wrap(panel_width - 48.0),
        hint_style: TextStyle::sized(16.0).color(colors::HINT),
    }
}

pub fn start_overlay() -> Overlay {
    card(
        "Dash Runner",
        "Jump: Space / Up / W or swipe up\nSlide: Down / S or swipe down".to_string(),
        "Press Space or tap to start",
    )
}

pub fn game_over_overlay(score: u64) -> Overlay {
    card(
        "Game Over",
        format!("Score: {}", score),
        "Press Space or tap to restart",
    )
}

pub fn score_text(score: u64) -> String {
    score.to_string()
}

pub fn score_style() -> TextStyle {
    TextStyle::sized(24.0)
        .color(colors::TITLE)
        .align(TextAlign::Right)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_texture_names_unique() {
        let specs = textures();
        assert_eq!(specs[0].name, RUNNER_TEXTURE);
        assert_eq!(specs[1].name, OBSTACLE_TEXTURE);
        assert_eq!(specs[2].name, GROUND_TEXTURE);
        assert_eq!(specs[2].corner_radius, 0.0);
    }

    #[test]
    fn test_game_over_overlay_reports_score() {
        let overlay = game_over_overlay(1234);
        assert_eq!(overlay.title, "Game Over");
        assert!(overlay.body.contains("1234"));
    }
}
