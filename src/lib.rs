//! Falling sand cellular automaton on a fixed-size grid.
//!
//! [`World`] owns the grid and advances it one [`World::tick`] at a time.
//! Between ticks callers read and paint cells with the bounds-checked
//! [`World::get_block`] and [`World::set_block`]. [`Simulation`] adds a
//! fixed-step clock so a frame loop can drive the world at its own rate.

pub mod block;
pub mod brush;
pub mod clock;
pub mod config;
pub mod error;
pub mod grid;
pub mod processed;
pub mod rng;
pub mod world;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use block::{BlockType, Capabilities};
pub use brush::Brush;
pub use clock::{Simulation, StepClock};
pub use config::SimConfig;
pub use error::{ConfigError, ParseBlockError, ParseGridError};
pub use grid::{Cell, Direction, Grid};
pub use processed::ProcessedSet;
pub use rng::{RandomSource, SeededRandom, SequenceRandom};
pub use world::{TickSummary, World};
