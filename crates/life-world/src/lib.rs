//! Game of Life engine.
//!
//! This module implements the sparse grid, its generation rule, and the turn loop that
//! drives it across wall-clock time.

pub mod grid;
pub mod pattern;
pub mod pacing;
pub mod simulation;

pub use grid::Grid;
pub use pacing::{shared_sink, AdvanceSignal, ScreenClearer, SharedSink, Spinner};
pub use simulation::{RunConfig, RunReport, Simulation};
