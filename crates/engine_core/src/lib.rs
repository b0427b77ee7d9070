//! Core simulation types for Lobshot.
//!
//! This crate provides the foundational types used across the simulation:
//! - 2D transform and spatial components
//! - Fixed-tick simulation clock
//! - Sampled curve type for trajectory shaping
//! - Common component types for the ECS

pub mod components;
pub mod curve;
pub mod time;
pub mod transform;

pub use components::*;
pub use curve::*;
pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::Vec2;
pub use hecs::{Entity, World};
