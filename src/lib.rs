//! gridcore
//!
//! Rendering-window engine for large data grids, plus a terminal viewer
//! built on it.
//!
//! The engine is the pure core: [`view_state`] holds the row height cache,
//! the visible-window computation and column layout; [`state`] holds
//! selection, sorting, the row query pipeline and the [`state::GridController`]
//! that ties them together. [`view`] and [`source`] are the impure shell that
//! reads input and drives a terminal.

pub mod config;
pub mod logging;
pub mod model;
pub mod source;
pub mod state;
pub mod view;
pub mod view_state;
