//! Isometric tile generation library
//!
//! Rasterizes floor, wall and door tiles, packs them into an indexed sprite sheet,
//! paints floor and wall layers from declarative zones, and patches the result into
//! a tile-map document.

pub mod canvas;
pub mod catalog;
pub mod config;
pub mod document;
pub mod error;
pub mod layout;
pub mod pipeline;
pub mod seeds;
pub mod shapes;
pub mod spritesheet;
pub mod texture;
pub mod tilemap;

pub use error::{Error, Result};
