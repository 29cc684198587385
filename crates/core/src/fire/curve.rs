//! Analytical heat-release curve
//!
//! A t-squared fire: quadratic growth from an onset time up to a level-off
//! plateau, then quadratic decay to an end time. Coefficients are fitted in
//! closed form from the phase timings at construction.

use crate::error::ModelError;
use serde::{Deserialize, Serialize};

/// Heat-release rate of the reference fire at `time_to_peak` (kW)
pub const REFERENCE_HEAT: f32 = 1000.0;

/// Phase timings of one fire source, in ticks from first sustained ignition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseTimes {
    /// Ignition onset; no heat is released before this age
    pub onset: f32,
    /// Age at which the curve crosses the 1 MW reference output
    pub time_to_peak: f32,
    /// Age at which growth levels off into the fully-developed plateau
    pub level_off: f32,
    /// Age at which decay begins
    pub decay_start: f32,
    /// Age at which the fire burns out
    pub end: f32,
    /// Characteristic growth time of the fitted curve (recorded with the
    /// deployment configuration; the closed-form fit does not consume it)
    pub growth_time_constant: f32,
}

impl Default for PhaseTimes {
    fn default() -> Self {
        PhaseTimes {
            onset: 10.0,
            time_to_peak: 85.0,
            level_off: 180.0,
            decay_start: 190.0,
            end: 460.0,
            growth_time_constant: 30.0,
        }
    }
}

/// Combustion phase of a source at a given combustion age
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombustionPhase {
    /// Ignited but not yet releasing heat
    Dormant,
    /// Quadratic growth toward the plateau
    Growth,
    /// Fully-developed plateau at peak heat release
    FullyDeveloped,
    /// Quadratic decay toward burnout
    Decay,
    /// Past the end time, no heat release
    Burnout,
}

/// Piecewise heat-release curve with precomputed coefficients
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatReleaseCurve {
    times: PhaseTimes,
    /// Plateau heat-release rate (kW)
    peak_heat: f32,
    /// Growth coefficient (kW/tick²)
    growth_coeff: f32,
    /// Decay coefficient (kW/tick²)
    decay_coeff: f32,
}

impl HeatReleaseCurve {
    /// Fit the curve coefficients from phase timings
    ///
    /// # Errors
    /// Returns `ModelError::DegeneratePhaseTimes` when any timing ordering
    /// would divide by zero in a derived coefficient.
    pub fn new(times: PhaseTimes) -> Result<Self, ModelError> {
        if times.time_to_peak <= times.onset {
            return Err(ModelError::DegeneratePhaseTimes(format!(
                "time_to_peak {} must exceed onset {}",
                times.time_to_peak, times.onset
            )));
        }
        if times.level_off <= times.onset {
            return Err(ModelError::DegeneratePhaseTimes(format!(
                "level_off {} must exceed onset {}",
                times.level_off, times.onset
            )));
        }
        if times.decay_start < times.level_off {
            return Err(ModelError::DegeneratePhaseTimes(format!(
                "decay_start {} must not precede level_off {}",
                times.decay_start, times.level_off
            )));
        }
        if times.end <= times.decay_start {
            return Err(ModelError::DegeneratePhaseTimes(format!(
                "end {} must exceed decay_start {}",
                times.end, times.decay_start
            )));
        }

        let growth_span = times.time_to_peak - times.onset;
        let peak_heat = REFERENCE_HEAT * ((times.level_off - times.onset) / growth_span).powi(2);
        let growth_coeff = REFERENCE_HEAT / growth_span.powi(2);
        let decay_coeff = peak_heat / (times.end - times.decay_start).powi(2);

        Ok(HeatReleaseCurve {
            times,
            peak_heat,
            growth_coeff,
            decay_coeff,
        })
    }

    /// Phase timings the curve was fitted from
    pub fn times(&self) -> &PhaseTimes {
        &self.times
    }

    /// Plateau heat-release rate (kW)
    pub fn peak_heat(&self) -> f32 {
        self.peak_heat
    }

    /// Classify a combustion age into its phase
    pub fn phase_at(&self, age: u32) -> CombustionPhase {
        let t = age as f32;
        if t <= self.times.onset {
            CombustionPhase::Dormant
        } else if t <= self.times.level_off {
            CombustionPhase::Growth
        } else if t <= self.times.decay_start {
            CombustionPhase::FullyDeveloped
        } else if t <= self.times.end {
            CombustionPhase::Decay
        } else {
            CombustionPhase::Burnout
        }
    }

    /// Heat-release rate at a combustion age (kW)
    ///
    /// Reaches exactly 0.0 at `age == end` for integral end times; the
    /// fuel-consumption trigger in the decay branch relies on that boundary.
    pub fn heat_at(&self, age: u32) -> f32 {
        let t = age as f32;
        match self.phase_at(age) {
            CombustionPhase::Dormant | CombustionPhase::Burnout => 0.0,
            CombustionPhase::Growth => self.growth_coeff * (t - self.times.onset).powi(2),
            CombustionPhase::FullyDeveloped => {
                self.growth_coeff * (self.times.level_off - self.times.onset).powi(2)
            }
            CombustionPhase::Decay => self.decay_coeff * (self.times.end - t).powi(2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn reference_curve() -> HeatReleaseCurve {
        HeatReleaseCurve::new(PhaseTimes::default()).unwrap()
    }

    #[test]
    fn test_derived_coefficients() {
        let curve = reference_curve();
        // onset=10, time_to_peak=85, level_off=180, decay_start=190, end=460
        assert_relative_eq!(curve.peak_heat(), 1000.0 * (170.0_f32 / 75.0).powi(2));
        assert_relative_eq!(curve.growth_coeff, 1000.0 / 5625.0);
        assert_relative_eq!(curve.decay_coeff, curve.peak_heat() / 72900.0);
    }

    #[test]
    fn test_reference_output_at_time_to_peak() {
        let curve = reference_curve();
        assert_relative_eq!(curve.heat_at(85), REFERENCE_HEAT, epsilon = 1e-2);
    }

    #[test]
    fn test_curve_shape_over_full_lifetime() {
        let curve = reference_curve();

        for age in 0..=10 {
            assert_eq!(curve.heat_at(age), 0.0, "dormant at age {age}");
        }
        let mut prev = 0.0;
        for age in 11..=180 {
            let heat = curve.heat_at(age);
            assert!(heat > prev, "growth not strict at age {age}");
            prev = heat;
        }
        for age in 181..=190 {
            assert_relative_eq!(curve.heat_at(age), curve.peak_heat());
        }
        let mut prev = curve.peak_heat();
        for age in 191..=460 {
            let heat = curve.heat_at(age);
            assert!(heat < prev, "decay not strict at age {age}");
            prev = heat;
        }
        for age in 461..=470 {
            assert_eq!(curve.heat_at(age), 0.0, "burnout at age {age}");
        }
    }

    #[test]
    fn test_decay_reaches_exact_zero_at_end() {
        let curve = reference_curve();
        assert_eq!(curve.phase_at(460), CombustionPhase::Decay);
        assert_eq!(curve.heat_at(460), 0.0);
    }

    #[test]
    fn test_phase_boundaries() {
        let curve = reference_curve();
        assert_eq!(curve.phase_at(0), CombustionPhase::Dormant);
        assert_eq!(curve.phase_at(10), CombustionPhase::Dormant);
        assert_eq!(curve.phase_at(11), CombustionPhase::Growth);
        assert_eq!(curve.phase_at(180), CombustionPhase::Growth);
        assert_eq!(curve.phase_at(181), CombustionPhase::FullyDeveloped);
        assert_eq!(curve.phase_at(190), CombustionPhase::FullyDeveloped);
        assert_eq!(curve.phase_at(191), CombustionPhase::Decay);
        assert_eq!(curve.phase_at(461), CombustionPhase::Burnout);
    }

    #[test]
    fn test_degenerate_timings_fail_at_construction() {
        let degenerate = PhaseTimes {
            time_to_peak: 10.0,
            ..PhaseTimes::default()
        };
        assert!(matches!(
            HeatReleaseCurve::new(degenerate),
            Err(ModelError::DegeneratePhaseTimes(_))
        ));

        let inverted_decay = PhaseTimes {
            decay_start: 460.0,
            end: 460.0,
            ..PhaseTimes::default()
        };
        assert!(matches!(
            HeatReleaseCurve::new(inverted_decay),
            Err(ModelError::DegeneratePhaseTimes(_))
        ));

        let plateau_before_growth = PhaseTimes {
            level_off: 200.0,
            decay_start: 190.0,
            ..PhaseTimes::default()
        };
        assert!(HeatReleaseCurve::new(plateau_before_growth).is_err());
    }
}
