//! Core types for Reef: grid coordinates, entities, and the world model.
//!
//! This crate holds the spatial truth of the simulation. It knows nothing
//! about time: scheduling, behaviors and kind transformations live in
//! `reef-simulation`, which mutates a [`WorldModel`] only through the methods
//! defined here.

/// Frame lists keyed by asset name, and the image-list loader.
pub mod assets;
/// Line-oriented world description loader.
pub mod bootstrap;
/// Entity kinds, entities, and background cells.
pub mod entity;
/// Error types used throughout the crate.
pub mod error;
/// Immutable grid coordinate.
pub mod point;
/// The grid world: background, occupancy, and the live entity arena.
pub mod world;

/// Re-export asset types.
pub use assets::{Frame, ImageList, ImageStore};
/// Re-export bootstrap types.
pub use bootstrap::{Diagnostic, LoadReport, load_world};
/// Re-export entity types.
pub use entity::{Background, Entity, EntityKind};
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export the grid coordinate.
pub use point::Point;
/// Re-export world model types.
pub use world::{EntityKey, WorldModel};
