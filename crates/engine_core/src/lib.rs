//! Core engine types and utilities for SkyStrike.
//!
//! This crate provides the foundational types used across the simulation:
//! - Transform and spatial components
//! - The clamped simulation clock
//! - Common component types for ECS storage

pub mod components;
pub mod time;
pub mod transform;

pub use components::*;
pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Quat, Vec2, Vec3};
pub use hecs::{Entity, World};
