//! WebGPU rendering module
//!
//! Flat-colored triangles built from the physics world's draw list.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderState, playfield_to_ndc, viewport_to_playfield};
pub use vertex::Vertex;
