//! Shared thermal state for the base grid
//!
//! One authoritative temperature value and one fire indicator per cell.
//! Every fire source and the passive-cooling pass mutate the same field in
//! place; readers get slices, writers go through checked setters. Update
//! order within a tick is observable, so mutation stays single-threaded.

use crate::error::ModelError;
use serde::{Deserialize, Serialize};

/// Ambient temperature of the habitat interior (°C)
pub const AMBIENT_TEMPERATURE: f32 = 25.0;

/// 2D temperature and fire-indicator grid, row-major `[y * width + x]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThermalField {
    width: usize,
    height: usize,
    /// Temperature per cell (°C)
    temperature: Vec<f32>,
    /// 1 where a cell hosts active combustion, 0 otherwise
    fire: Vec<u8>,
}

impl ThermalField {
    /// Create a field with every cell at ambient temperature and no fire
    pub fn new(width: usize, height: usize) -> Self {
        ThermalField {
            width,
            height,
            temperature: vec![AMBIENT_TEMPERATURE; width * height],
            fire: vec![0; width * height],
        }
    }

    /// Restore the ambient state in place
    pub fn reset(&mut self) {
        self.temperature.fill(AMBIENT_TEMPERATURE);
        self.fire.fill(0);
    }

    /// Field width in cells
    pub fn width(&self) -> usize {
        self.width
    }

    /// Field height in cells
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.temperature.len()
    }

    /// True for a zero-area field
    pub fn is_empty(&self) -> bool {
        self.temperature.is_empty()
    }

    /// Whether `(x, y)` lies inside the field shape
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        assert!(
            self.in_bounds(x, y),
            "location ({x}, {y}) outside {}x{} field",
            self.width,
            self.height
        );
        y * self.width + x
    }

    /// Temperature at a cell (°C)
    ///
    /// Panics on out-of-bounds coordinates.
    pub fn temperature_at(&self, x: usize, y: usize) -> f32 {
        self.temperature[self.index(x, y)]
    }

    /// Overwrite the temperature at a cell (°C)
    ///
    /// Panics on out-of-bounds coordinates.
    pub fn set_temperature_at(&mut self, x: usize, y: usize, value: f32) {
        debug_assert!(
            value.is_finite(),
            "non-finite temperature {value} written at ({x}, {y})"
        );
        let idx = self.index(x, y);
        self.temperature[idx] = value;
    }

    /// Fire indicator at a cell
    ///
    /// Panics on out-of-bounds coordinates.
    pub fn fire_at(&self, x: usize, y: usize) -> u8 {
        self.fire[self.index(x, y)]
    }

    /// Overwrite the fire indicator at a cell
    ///
    /// Panics on out-of-bounds coordinates.
    pub fn set_fire_at(&mut self, x: usize, y: usize, value: u8) {
        debug_assert!(value <= 1, "fire indicator {value} written at ({x}, {y})");
        let idx = self.index(x, y);
        self.fire[idx] = value;
    }

    /// Read-only view of the temperature grid
    pub fn temperature(&self) -> &[f32] {
        &self.temperature
    }

    /// Read-only view of the fire-indicator grid
    pub fn fire_map(&self) -> &[u8] {
        &self.fire
    }

    /// Mutable temperature cells for element-wise passes
    pub(crate) fn temperature_mut(&mut self) -> &mut [f32] {
        &mut self.temperature
    }

    /// Replace the whole temperature grid
    ///
    /// # Errors
    /// Returns `ModelError::ShapeMismatch` when the replacement length does
    /// not match the field shape.
    pub fn set_temperature(&mut self, values: Vec<f32>) -> Result<(), ModelError> {
        if values.len() != self.temperature.len() {
            return Err(ModelError::ShapeMismatch {
                expected: self.temperature.len(),
                got: values.len(),
            });
        }
        self.temperature = values;
        Ok(())
    }

    /// Replace the whole fire-indicator grid
    ///
    /// # Errors
    /// Returns `ModelError::ShapeMismatch` when the replacement length does
    /// not match the field shape.
    pub fn set_fire_map(&mut self, values: Vec<u8>) -> Result<(), ModelError> {
        if values.len() != self.fire.len() {
            return Err(ModelError::ShapeMismatch {
                expected: self.fire.len(),
                got: values.len(),
            });
        }
        self.fire = values;
        Ok(())
    }

    /// Mean temperature over all cells (°C)
    pub fn mean_temperature(&self) -> f32 {
        if self.temperature.is_empty() {
            return 0.0;
        }
        self.temperature.iter().sum::<f32>() / self.temperature.len() as f32
    }

    /// Hottest cell temperature (°C)
    pub fn max_temperature(&self) -> f32 {
        self.temperature.iter().copied().fold(f32::MIN, f32::max)
    }
}
