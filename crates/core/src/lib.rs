//! Lunar-Base Fire Simulation Core Library
//!
//! Simulates fire ignition, growth, decay, and suppression across a 2D grid
//! representing a lunar-base interior, coordinated with mobile agents that
//! extinguish fires. Implements:
//! - A shared thermal field (temperature + fire indicator per cell)
//! - Per-source combustion state machines with t-squared growth/decay curves
//! - Froude-scaled radiative heating of neighboring cells
//! - Passive Newtonian cooling and per-cell spot cooling
//! - Agent-applied suppression at a point and radius

pub mod cooling;
pub mod error;
pub mod field;
pub mod fire;
pub mod scenario;

// Re-export core types
pub use cooling::{passive_cooling, SpotCooler, DEFAULT_COOLING_CONSTANT};
pub use error::ModelError;
pub use field::{ThermalField, AMBIENT_TEMPERATURE};
pub use fire::{CombustionPhase, FireSource, HeatReleaseCurve, PhaseTimes, SourceStatus, Vec2};
pub use scenario::{Deployment, Experiment, Material};
