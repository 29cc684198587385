//! Per-source combustion state machine
//!
//! Each deployed fire source sits at a fixed cell and couples to the shared
//! thermal field every tick: it reads its own cell, advances its combustion
//! age while the cell stays above the ignition threshold, releases heat
//! along its fitted curve, heats its own cell through a Froude-scaled plume
//! correlation, and radiates to neighboring cells with inverse-square
//! falloff. Suppression enters through the same correlation with the sign
//! flipped.

use crate::error::ModelError;
use crate::field::{ThermalField, AMBIENT_TEMPERATURE};
use crate::fire::curve::{CombustionPhase, HeatReleaseCurve, PhaseTimes};
use crate::fire::Vec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Margin above the ignition threshold required for sustained combustion (°C)
pub const IGNITION_MARGIN: f32 = 10.0;

/// Fuel mass of a freshly deployed source (kg)
pub const INITIAL_FUEL_MASS: f32 = 100.0;

/// Specific heat of the cellulosic fuel package (J/(kg·K))
const SPECIFIC_HEAT: f32 = 1870.0;

/// Whether a source is actively combusting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceStatus {
    /// Sustained combustion this tick
    Burning,
    /// Below threshold, out of fuel, or past burnout
    Idle,
}

/// One fire source at a fixed grid cell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FireSource {
    x: usize,
    y: usize,
    curve: HeatReleaseCurve,
    /// Cell temperature above which this material ignites (°C)
    ignition_temperature: f32,
    /// Maximum Euclidean distance heat propagates per tick (cells)
    influence_radius: f32,
    /// Exponent constant of the terminal cool-down branch (1/tick)
    cooling_rate: f32,

    status: SourceStatus,
    /// Current heat-release rate (kW)
    heat_release: f32,
    heat_history: Vec<f32>,
    /// Ticks of sustained combustion
    age: u32,
    /// Cached own-cell temperature (°C)
    local_temperature: f32,
    temperature_history: Vec<f32>,
    /// Plume temperature rise produced by the current heat output (°C)
    plume_rise: f32,
    /// Remaining fuel mass (kg)
    remaining_fuel: f32,
    /// Fuel consumption rate (kg/tick)
    consumption_rate: f32,
}

/// Froude-scaled plume temperature rise above a fire
///
/// `ΔT = 9.1 · q*^(2/3) · (T_ref / (g · ρ² · cp²))^(1/3)` with `q*` the
/// dimensionless heat input and `T_ref` the current field mean.
fn plume_temperature_rise(scaled_heat: f32, reference_temp: f32) -> f32 {
    const GRAVITY: f32 = 9.81; // m/s²
    const AIR_DENSITY: f32 = 1.225; // kg/m³
    9.1 * scaled_heat.powf(2.0 / 3.0)
        * (reference_temp / (GRAVITY * AIR_DENSITY.powi(2) * SPECIFIC_HEAT.powi(2))).powf(1.0 / 3.0)
}

fn cell_distance(ax: usize, ay: usize, bx: usize, by: usize) -> f32 {
    Vec2::new(ax as f32 - bx as f32, ay as f32 - by as f32).norm()
}

impl FireSource {
    /// Deploy a fire source at `(x, y)`
    ///
    /// # Errors
    /// Returns `ModelError::OutOfBounds` when the location lies outside the
    /// field, and `ModelError::DegeneratePhaseTimes` for timings that would
    /// divide by zero in the curve fit or the consumption rate.
    pub fn new(
        x: usize,
        y: usize,
        times: PhaseTimes,
        ignition_temperature: f32,
        influence_radius: f32,
        cooling_rate: f32,
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
        let curve = HeatReleaseCurve::new(times)?;

        Ok(FireSource {
            x,
            y,
            curve,
            ignition_temperature,
            influence_radius,
            cooling_rate,
            status: SourceStatus::Idle,
            heat_release: 0.0,
            heat_history: Vec::new(),
            age: 0,
            local_temperature: 0.0,
            temperature_history: Vec::new(),
            plume_rise: 0.0,
            remaining_fuel: INITIAL_FUEL_MASS,
            consumption_rate: INITIAL_FUEL_MASS / (times.end - times.onset),
        })
    }

    /// One tick of the combustion state machine against the shared field
    pub fn update(&mut self, field: &mut ThermalField) {
        self.local_temperature = field.temperature_at(self.x, self.y);

        if self.local_temperature > self.ignition_temperature + IGNITION_MARGIN
            && self.remaining_fuel > 0.0
        {
            if self.status == SourceStatus::Idle {
                debug!(x = self.x, y = self.y, "fire source ignited");
            }
            self.status = SourceStatus::Burning;
            self.age += 1;
            field.set_fire_at(self.x, self.y, 1);

            self.heat_release = match self.curve.phase_at(self.age) {
                CombustionPhase::Dormant => 0.0,
                CombustionPhase::Growth | CombustionPhase::FullyDeveloped => {
                    self.curve.heat_at(self.age)
                }
                CombustionPhase::Decay => {
                    let heat = self.curve.heat_at(self.age);
                    // Exact-zero crossing at age == end consumes the last
                    // of the fuel before the burnout branch is reached
                    if heat == 0.0 {
                        self.consume_fuel();
                    }
                    heat
                }
                CombustionPhase::Burnout => {
                    field.set_fire_at(self.x, self.y, 0);
                    self.status = SourceStatus::Idle;
                    debug!(x = self.x, y = self.y, age = self.age, "fire source burned out");
                    0.0
                }
            };

            if self.heat_release > 0.0 {
                field.set_fire_at(self.x, self.y, 1);
                self.consume_fuel();
            }
        } else {
            self.heat_release = 0.0;
            self.status = SourceStatus::Idle;
            field.set_fire_at(self.x, self.y, 0);
        }

        self.update_own_cell(field);
        self.radiate_to_neighbors(field);
        self.heat_history.push(self.heat_release);
    }

    fn consume_fuel(&mut self) {
        let age = self.age as f32;
        if age <= self.curve.times().end {
            self.remaining_fuel = (INITIAL_FUEL_MASS
                - self.consumption_rate * (age - self.curve.times().onset))
                .max(0.0);
        } else {
            self.remaining_fuel = 0.0;
        }
    }

    /// Own-cell temperature update: plume heating while fuel remains,
    /// terminal exponential cool-down once the fuel is spent
    fn update_own_cell(&mut self, field: &mut ThermalField) {
        let mean = field.mean_temperature();

        self.plume_rise = if self.remaining_fuel > 0.0 {
            plume_temperature_rise(0.7 * self.heat_release / 1000.0, mean)
        } else {
            0.0
        };

        let age = self.age as f32;
        if age >= self.curve.times().decay_start
            && self.local_temperature > mean
            && self.remaining_fuel == 0.0
        {
            self.local_temperature = AMBIENT_TEMPERATURE
                + (self.local_temperature - AMBIENT_TEMPERATURE) * (-self.cooling_rate * age).exp();
        } else {
            self.local_temperature += self.plume_rise;
        }

        self.temperature_history.push(self.local_temperature);
        field.set_temperature_at(self.x, self.y, self.local_temperature);
    }

    /// Inverse-square radiative propagation to cells inside the influence
    /// radius. The clamp floor is the live field mean recomputed after each
    /// write, so a pass never leaves a visited cell below the running mean;
    /// visit order is row-major and observable.
    fn radiate_to_neighbors(&self, field: &mut ThermalField) {
        for cy in 0..field.height() {
            for cx in 0..field.width() {
                let temp = field.temperature_at(cx, cy);
                if temp <= 0.0 {
                    continue;
                }
                let dist = cell_distance(cx, cy, self.x, self.y);
                if dist <= 0.0 || dist >= self.influence_radius {
                    continue;
                }
                field.set_temperature_at(cx, cy, temp + (self.plume_rise * 0.7) / (dist * dist));
                let mean = field.mean_temperature();
                if field.temperature_at(cx, cy) < mean {
                    field.set_temperature_at(cx, cy, mean);
                }
            }
        }
    }

    /// Agent-applied suppression at this source and within `radius` of it
    ///
    /// Reduces the local temperature by the plume correlation evaluated at
    /// `strength · 30`, clamped at ambient; a clamp forces the source idle
    /// and clears its indicator. Every cell inside the radius (own cell
    /// included, no per-cell fire gating) receives the same reduction with
    /// the mean recomputed from the live field, clamped at ambient. Fuel
    /// mass is untouched.
    pub fn suppress(&mut self, strength: f32, field: &mut ThermalField, radius: f32) {
        let mean = field.mean_temperature();
        self.local_temperature -= plume_temperature_rise(0.7 * strength * 30.0, mean);

        if self.local_temperature < AMBIENT_TEMPERATURE {
            self.local_temperature = AMBIENT_TEMPERATURE;
            self.status = SourceStatus::Idle;
            field.set_fire_at(self.x, self.y, 0);
            debug!(x = self.x, y = self.y, "fire source suppressed to ambient");
        }

        // Independent of the temperature clamp
        if self.heat_release < 0.0 {
            self.heat_release = 0.0;
            self.status = SourceStatus::Idle;
            field.set_fire_at(self.x, self.y, 0);
        }

        for cy in 0..field.height() {
            for cx in 0..field.width() {
                let temp = field.temperature_at(cx, cy);
                if temp <= 0.0 {
                    continue;
                }
                let dist = cell_distance(cx, cy, self.x, self.y);
                if dist >= radius {
                    continue;
                }
                let live_mean = field.mean_temperature();
                let cooled = temp - plume_temperature_rise(0.7 * strength * 30.0, live_mean);
                field.set_temperature_at(cx, cy, cooled.max(AMBIENT_TEMPERATURE));
            }
        }
    }

    /// Grid location
    pub fn position(&self) -> (usize, usize) {
        (self.x, self.y)
    }

    /// Combustion status
    pub fn status(&self) -> SourceStatus {
        self.status
    }

    /// True while the source sustains combustion
    pub fn is_burning(&self) -> bool {
        self.status == SourceStatus::Burning
    }

    /// Current heat-release rate (kW)
    pub fn heat_release(&self) -> f32 {
        self.heat_release
    }

    /// Heat-release rate per tick since deployment (kW)
    pub fn heat_history(&self) -> &[f32] {
        &self.heat_history
    }

    /// Own-cell temperature per tick since deployment (°C)
    pub fn temperature_history(&self) -> &[f32] {
        &self.temperature_history
    }

    /// Ticks of sustained combustion
    pub fn age(&self) -> u32 {
        self.age
    }

    /// Remaining fuel mass (kg)
    pub fn remaining_fuel(&self) -> f32 {
        self.remaining_fuel
    }

    /// Ignition temperature threshold (°C)
    pub fn ignition_temperature(&self) -> f32 {
        self.ignition_temperature
    }

    /// Influence radius of radiative propagation (cells)
    pub fn influence_radius(&self) -> f32 {
        self.influence_radius
    }

    /// Fitted heat-release curve
    pub fn curve(&self) -> &HeatReleaseCurve {
        &self.curve
    }
}
