//! Zone and grid editor for excavation site plans.
//!
//! Zones are labeled rectangles in the pixel space of a reference image.
//! [`editor::ZoneEditor`] owns the authoritative [`store::ZoneStore`] and
//! turns pointer, keyboard and [`command::Command`] input into mutations,
//! which are written back through [`persist::ZonePersistence`] after a
//! debounce window.

pub mod app;
pub mod command;
pub mod config;
pub mod debounce;
pub mod editor;
pub mod error;
pub mod grid;
pub mod persist;
pub mod render;
pub mod store;
pub mod view;
pub mod zone;

pub use error::{Result, ZoneError};
