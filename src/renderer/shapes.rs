//! Shape generation for 2D primitives
//!
//! Everything is produced in playfield coordinates; the pipeline maps to NDC.

use glam::Vec2;
use std::f32::consts::FRAC_PI_2;

use super::vertex::{BACKGROUND, Vertex};
use crate::consts::{PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};
use crate::rgb_to_rgba;
use crate::sim::{ArcadeWorld, DrawRect};

/// Segments per rounded corner
const CORNER_SEGMENTS: u32 = 6;

fn push_quad(vertices: &mut Vec<Vertex>, min: Vec2, max: Vec2, color: [f32; 4]) {
    vertices.push(Vertex::new(min.x, min.y, color));
    vertices.push(Vertex::new(max.x, min.y, color));
    vertices.push(Vertex::new(min.x, max.y, color));

    vertices.push(Vertex::new(min.x, max.y, color));
    vertices.push(Vertex::new(max.x, min.y, color));
    vertices.push(Vertex::new(max.x, max.y, color));
}

/// Generate vertices for an axis-aligned rectangle
pub fn rect(min: Vec2, max: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(6);
    push_quad(&mut vertices, min, max, color);
    vertices
}

/// Generate vertices for a rectangle with rounded corners
pub fn rounded_rect(min: Vec2, max: Vec2, radius: f32, color: [f32; 4]) -> Vec<Vertex> {
    let size = max - min;
    let r = radius.min(size.x / 2.0).min(size.y / 2.0);
    if r <= 0.0 {
        return rect(min, max, color);
    }

    let mut vertices = Vec::with_capacity((18 + 4 * CORNER_SEGMENTS * 3) as usize);

    // Cross: one tall middle band plus left and right strips
    push_quad(&mut vertices, Vec2::new(min.x + r, min.y), Vec2::new(max.x - r, max.y), color);
    push_quad(&mut vertices, Vec2::new(min.x, min.y + r), Vec2::new(min.x + r, max.y - r), color);
    push_quad(&mut vertices, Vec2::new(max.x - r, min.y + r), Vec2::new(max.x, max.y - r), color);

    // Corner fans: (center, start angle)
    let corners = [
        (Vec2::new(max.x - r, max.y - r), 0.0),
        (Vec2::new(min.x + r, max.y - r), FRAC_PI_2),
        (Vec2::new(min.x + r, min.y + r), 2.0 * FRAC_PI_2),
        (Vec2::new(max.x - r, min.y + r), 3.0 * FRAC_PI_2),
    ];
    for (center, start) in corners {
        for i in 0..CORNER_SEGMENTS {
            let theta1 = start + (i as f32 / CORNER_SEGMENTS as f32) * FRAC_PI_2;
            let theta2 = start + ((i + 1) as f32 / CORNER_SEGMENTS as f32) * FRAC_PI_2;
            vertices.push(Vertex::new(center.x, center.y, color));
            vertices.push(Vertex::new(
                center.x + r * theta1.cos(),
                center.y + r * theta1.sin(),
                color,
            ));
            vertices.push(Vertex::new(
                center.x + r * theta2.cos(),
                center.y + r * theta2.sin(),
                color,
            ));
        }
    }

    vertices
}

fn draw_rect(rect: &DrawRect) -> Vec<Vertex> {
    rounded_rect(
        rect.min,
        rect.max,
        rect.corner_radius,
        rgb_to_rgba(rect.color, rect.alpha),
    )
}

/// Every shape for one frame: sky, world sprites, then the overlay panel
pub fn scene(world: &ArcadeWorld) -> Vec<Vertex> {
    let sky = [
        BACKGROUND.r as f32,
        BACKGROUND.g as f32,
        BACKGROUND.b as f32,
        1.0,
    ];
    let mut vertices = rect(Vec2::ZERO, Vec2::new(PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT), sky);

    for item in world.draw_list() {
        vertices.extend(draw_rect(&item));
    }

    if let Some(overlay) = world.overlay() {
        let panel = &overlay.panel;
        let half = panel.size / 2.0;
        vertices.extend(rounded_rect(
            panel.center - half,
            panel.center + half,
            panel.corner_radius,
            rgb_to_rgba(panel.color, panel.alpha),
        ));
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{GameState, Stage};
    use crate::tuning::Tuning;

    #[test]
    fn test_rect_is_two_triangles() {
        let v = rect(Vec2::ZERO, Vec2::new(10.0, 5.0), [1.0; 4]);
        assert_eq!(v.len(), 6);
        assert!(v.iter().all(|v| v.position[0] >= 0.0 && v.position[0] <= 10.0));
        assert!(v.iter().all(|v| v.position[1] >= 0.0 && v.position[1] <= 5.0));
    }

    #[test]
    fn test_rounded_rect_stays_inside_bounds() {
        let min = Vec2::new(10.0, 20.0);
        let max = Vec2::new(60.0, 50.0);
        let v = rounded_rect(min, max, 8.0, [1.0; 4]);
        assert_eq!(v.len(), (18 + 4 * CORNER_SEGMENTS * 3) as usize);
        for vert in &v {
            assert!(vert.position[0] >= min.x - 1e-3 && vert.position[0] <= max.x + 1e-3);
            assert!(vert.position[1] >= min.y - 1e-3 && vert.position[1] <= max.y + 1e-3);
        }
    }

    #[test]
    fn test_zero_radius_falls_back_to_rect() {
        let v = rounded_rect(Vec2::ZERO, Vec2::ONE, 0.0, [1.0; 4]);
        assert_eq!(v.len(), 6);
    }

    #[test]
    fn test_scene_includes_overlay_panel_only_while_shown() {
        let mut world = ArcadeWorld::default();
        let _state = GameState::new(Tuning::default(), 1, &mut world);
        let with_overlay = scene(&world).len();

        world.hide_overlay();
        let without = scene(&world).len();
        assert!(with_overlay > without);
    }
}
