//! Ambient cooling passes
//!
//! Two cooling paths share the field with the fire sources: a global
//! Newtonian relaxation applied once per tick after every source updates,
//! and a per-cell exponential spot cooler for tracked locations. The spot
//! cooler uses the same exponential form as the terminal cool-down branch
//! of a burned-out fire source, so tracked and untracked cells relax with
//! compatible physics.

use crate::error::ModelError;
use crate::field::{ThermalField, AMBIENT_TEMPERATURE};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Newtonian relaxation fraction per tick for the global pass
pub const DEFAULT_COOLING_CONSTANT: f32 = 0.001;

/// Signed exponent constant of the spot cooler (1/tick)
pub const DEFAULT_SPOT_COOLING_CONSTANT: f32 = -0.013;

/// Newton's law of cooling applied element-wise across the whole field:
/// `T += k · (ambient − T)`. Monotone relaxation toward ambient, applied
/// once per tick after all fire sources update. Cells are independent, so
/// this is the one pass allowed to run data-parallel.
pub fn passive_cooling(field: &mut ThermalField, cooling_constant: f32) {
    field.temperature_mut().par_iter_mut().for_each(|temp| {
        *temp += cooling_constant * (AMBIENT_TEMPERATURE - *temp);
    });
}

/// Exponential spot cooler for one tracked cell
///
/// Skips the cell while it hosts active combustion; otherwise, when the
/// cell sits above the field mean, applies
/// `T = ambient + (T − ambient) · exp(K · t)` with an internal clock as the
/// time variable, clamped at ambient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotCooler {
    x: usize,
    y: usize,
    cooling_constant: f32,
    /// Time variable of the decay exponent, advances once per cooled tick
    elapsed: u32,
}

impl SpotCooler {
    /// Track `(x, y)` with the default cooling constant
    ///
    /// # Errors
    /// Returns `ModelError::OutOfBounds` when the location lies outside the
    /// field.
    pub fn new(x: usize, y: usize, field: &ThermalField) -> Result<Self, ModelError> {
        Self::with_cooling_constant(x, y, DEFAULT_SPOT_COOLING_CONSTANT, field)
    }

    /// Track `(x, y)` with an explicit signed cooling constant
    ///
    /// # Errors
    /// Returns `ModelError::OutOfBounds` when the location lies outside the
    /// field.
    pub fn with_cooling_constant(
        x: usize,
        y: usize,
        cooling_constant: f32,
        field: &ThermalField,
    ) -> Result<Self, ModelError> {
        if !field.in_bounds(x, y) {
            return Err(ModelError::OutOfBounds {
                x,
                y,
                width: field.width(),
                height: field.height(),
            });
        }
        Ok(SpotCooler {
            x,
            y,
            cooling_constant,
            elapsed: 1,
        })
    }

    /// One cooling tick; a no-op while the cell burns or sits at or below
    /// the field mean
    pub fn update(&mut self, field: &mut ThermalField) {
        if field.fire_at(self.x, self.y) == 1 {
            return;
        }
        let temp = field.temperature_at(self.x, self.y);
        if temp <= field.mean_temperature() {
            return;
        }

        let cooled = AMBIENT_TEMPERATURE
            + (temp - AMBIENT_TEMPERATURE) * (self.cooling_constant * self.elapsed as f32).exp();
        field.set_temperature_at(self.x, self.y, cooled.max(AMBIENT_TEMPERATURE));
        self.elapsed += 1;
    }

    /// Tracked location
    pub fn position(&self) -> (usize, usize) {
        (self.x, self.y)
    }

    /// Current value of the decay time variable
    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }
}
