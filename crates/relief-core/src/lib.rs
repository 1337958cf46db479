//! Relief Core - Foundational types for the Relief terrain viewer
//!
//! This crate provides the types that all other Relief crates depend on:
//! - `Vec3`, `Color` - Spatial and color types
//! - Error types and Result alias

mod error;
mod types;

pub use error::{ReliefError, Result};
pub use types::{mat4_mul, Color, Vec3};
