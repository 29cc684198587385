//! Fire source modeling: heat-release curves and per-source combustion state

pub mod curve;
pub mod source;

pub use curve::{CombustionPhase, HeatReleaseCurve, PhaseTimes};
pub use source::{FireSource, SourceStatus};

/// 2D vector used for cell distances and agent positions
pub type Vec2 = nalgebra::Vector2<f32>;
