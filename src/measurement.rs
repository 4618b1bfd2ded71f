//! Derives simulated per-line ADC current readings from line enablement.

use crate::lines::{LineRegisters, UnitLineCategory};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Tolerance band around nominal current, strictly inside the ±20% ICD ceiling.
const TOLERANCE_FRACTION: f32 = 0.15;

/// Samples per-line currents from a category's nominal draw plus bounded noise.
///
/// Stateless across calls except for RNG stream advancement: each energised line
/// draws an independent sample, so two calls against the same register state are
/// not expected to return identical vectors.
#[derive(Debug)]
pub struct MeasurementEngine {
    rng: StdRng,
}

impl MeasurementEngine {
    pub fn new(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }

    /// Produce the measurement vector for `category`, `category.width()` entries
    /// long, zero for cleared bits and a noisy nominal-centred sample for set bits.
    pub fn measure(&mut self, category: UnitLineCategory, registers: &LineRegisters) -> Vec<f32> {
        let mask = registers.get(category);
        let nominal = category.nominal_current_a();
        let spread = nominal * TOLERANCE_FRACTION;

        (0..category.width())
            .map(|bit| {
                if mask & (1 << bit) != 0 {
                    nominal + self.rng.gen_range(-spread..=spread)
                } else {
                    0.0
                }
            })
            .collect()
    }
}
