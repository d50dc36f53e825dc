//! Deterministic replay of pre-recorded tactical battles.
//!
//! Load a battle document, spawn its roster against a soldier catalog,
//! then drive [`playback::PlaybackController`] forward, backward or on
//! auto-play. Terrain comes from [`map::MapGrid`] through
//! [`voxel::VoxelGenerator`], independently of the battle.

pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod interpreter;
pub mod map;
pub mod model;
pub mod observer;
pub mod playback;
pub mod rng;
pub mod snapshot;
pub mod store;
pub mod types;
pub mod voxel;
