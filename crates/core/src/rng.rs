//! RNG module - deterministic shape selection
//!
//! Spawned shapes come from a "7-bag": each bag holds every shape once, shuffled, and
//! is drawn empty before the next one is generated. All controllers draw from the same
//! bag, so the sequence only depends on the seed and the order of spawns.
//!
//! The generator is a small LCG so runs are reproducible from a `u32` seed.

use crate::types::ShapeKind;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Random value in `[0, max)`. `max` must be non-zero.
    pub fn next_range(&mut self, max: u32) -> u32 {
        debug_assert!(max > 0);
        // High bits only.
        (self.next_u32() >> 16) % max.max(1)
    }

    /// Fisher-Yates shuffle
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }
}

/// Shared 7-bag of spawn shapes
#[derive(Debug, Clone)]
pub struct ShapeBag {
    bag: [ShapeKind; 7],
    next: usize,
    rng: SimpleRng,
}

impl ShapeBag {
    pub fn new(seed: u32) -> Self {
        let mut bag = Self {
            bag: ShapeKind::ALL,
            next: 0,
            rng: SimpleRng::new(seed),
        };
        bag.refill();
        bag
    }

    fn refill(&mut self) {
        self.bag = ShapeKind::ALL;
        self.rng.shuffle(&mut self.bag);
        self.next = 0;
    }

    /// Shapes still waiting in the current bag.
    pub fn remaining(&self) -> &[ShapeKind] {
        &self.bag[self.next..]
    }

    pub fn draw(&mut self) -> ShapeKind {
        if self.next >= self.bag.len() {
            self.refill();
        }
        let shape = self.bag[self.next];
        self.next += 1;
        shape
    }
}

impl Default for ShapeBag {
    fn default() -> Self {
        Self::new(1)
    }
}
