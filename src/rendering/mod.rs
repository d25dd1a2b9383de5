//! # Rendering Module
//!
//! Text rendering of game frames for terminal play.

pub mod display;

pub use display::*;
