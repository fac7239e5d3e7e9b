//! Randomness consumed by the tick engine.
//!
//! The engine only ever asks for one fair coin flip at a time, so the seam is a
//! small trait that production code backs with `rand` and tests back with a
//! scripted sequence.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of unbiased random values.
pub trait RandomSource {
    /// One fair coin flip.
    fn next_bool(&mut self) -> bool;

    /// Uniform float in `[0, 1)`.
    fn next_f32(&mut self) -> f32 {
        // 24 bits of coin flips fill an f32 mantissa exactly.
        let mut bits = 0u32;
        for _ in 0..24 {
            bits = (bits << 1) | self.next_bool() as u32;
        }
        bits as f32 / (1u32 << 24) as f32
    }
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
    fn next_bool(&mut self) -> bool {
        (**self).next_bool()
    }

    fn next_f32(&mut self) -> f32 {
        (**self).next_f32()
    }
}

/// Production generator backed by [`StdRng`].
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    /// Deterministic generator: the same seed always yields the same flips.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_bool(&mut self) -> bool {
        self.rng.gen()
    }

    fn next_f32(&mut self) -> f32 {
        self.rng.gen()
    }
}

/// Replays a fixed list of coin flips and counts how many were drawn.
///
/// Once the script runs out every further flip is `false`.
#[derive(Debug, Clone, Default)]
pub struct SequenceRandom {
    script: VecDeque<bool>,
    draws: usize,
}

impl SequenceRandom {
    pub fn new(script: impl IntoIterator<Item = bool>) -> Self {
        Self {
            script: script.into_iter().collect(),
            draws: 0,
        }
    }

    /// Number of flips drawn so far, including ones past the end of the script.
    pub fn draws(&self) -> usize {
        self.draws
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl RandomSource for SequenceRandom {
    fn next_bool(&mut self) -> bool {
        self.draws += 1;
        self.script.pop_front().unwrap_or(false)
    }
}

/// Browser generator, as used by the canvas front end.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsRandom;

#[cfg(target_arch = "wasm32")]
impl RandomSource for JsRandom {
    fn next_bool(&mut self) -> bool {
        js_sys::Math::random() < 0.5
    }

    fn next_f32(&mut self) -> f32 {
        js_sys::Math::random() as f32
    }
}
