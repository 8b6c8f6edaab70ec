//! Top-down arena shooter: a single local player roams a walled world,
//! shoots xp dots and wandering enemies, and levels up.
//!
//! The simulation core (`compute`, `camera`, `spatial`) is pure and has no
//! terminal dependency; `display` turns a state snapshot into crossterm
//! commands.

pub mod camera;
pub mod compute;
pub mod config;
pub mod constants;
pub mod display;
pub mod entities;
pub mod error;
pub mod input;
pub mod spatial;
pub mod status;
