//! Platform abstraction layer
//!
//! Turns raw host events (DOM keys, pointer positions in playfield space)
//! into the per-frame [`crate::sim::TickInput`].

pub mod input;

pub use input::{GestureTracker, InputCommand, InputState, Key};
