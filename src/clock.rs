//! Fixed-step driving of the tick engine, decoupled from the frame rate.

use crate::config::SimConfig;
use crate::rng::{RandomSource, SeededRandom};
use crate::world::{TickSummary, World};

/// Accumulates frame time and reports when a simulation step is due.
#[derive(Debug, Clone)]
pub struct StepClock {
    threshold: f32,
    elapsed: f32,
}

impl StepClock {
    /// `step` is the nominal step length in seconds; a step is due once
    /// `step * tolerance` seconds have accumulated.
    pub fn new(step: f32, tolerance: f32) -> Self {
        Self {
            threshold: step * tolerance,
            elapsed: 0.0,
        }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(config.step_seconds(), config.step_tolerance)
    }

    /// Add `dt` seconds. Returns `true` when a step is due, resetting the
    /// accumulator to zero. At most one step is reported per call.
    pub fn advance(&mut self, dt: f32) -> bool {
        self.elapsed += dt.max(0.0);
        if self.elapsed >= self.threshold {
            self.elapsed = 0.0;
            true
        } else {
            false
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

/// A world paired with the clock that decides when it ticks.
pub struct Simulation<R = SeededRandom> {
    world: World<R>,
    clock: StepClock,
}

impl Simulation<SeededRandom> {
    pub fn from_config(config: &SimConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => SeededRandom::new(seed),
            None => SeededRandom::from_entropy(),
        };
        let world = World::with_random(config.width, config.height, rng);
        Self::new(world, StepClock::from_config(config))
    }
}

impl<R: RandomSource> Simulation<R> {
    pub fn new(world: World<R>, clock: StepClock) -> Self {
        Self { world, clock }
    }

    pub fn world(&self) -> &World<R> {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World<R> {
        &mut self.world
    }

    /// Feed one frame's elapsed time. Ticks the world at most once and returns
    /// the tick's summary if it ran.
    pub fn update(&mut self, dt: f32) -> Option<TickSummary> {
        if self.clock.advance(dt) {
            Some(self.world.tick())
        } else {
            None
        }
    }
}
