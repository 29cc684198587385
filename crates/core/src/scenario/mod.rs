//! Experiment orchestration
//!
//! Owns one thermal field plus an ordered list of fire sources and drives
//! the tick loop: every source updates in insertion order, then the global
//! passive-cooling pass runs once. Later sources observe earlier sources'
//! writes within the same tick; that ordering is part of the observable
//! behavior and is fixed here.

use crate::cooling::{passive_cooling, DEFAULT_COOLING_CONSTANT};
use crate::error::ModelError;
use crate::field::ThermalField;
use crate::fire::{FireSource, PhaseTimes, Vec2};
use rand::seq::index::sample;
use rand::seq::IndexedRandom;
use rand::Rng;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Radius of radiative influence for deployed materials (cells)
pub const DEFAULT_INFLUENCE_RADIUS: f32 = 8.0;

/// Terminal cool-down exponent constant for deployed materials (1/tick)
pub const DEFAULT_DECAY_COOLING_RATE: f32 = 0.00001;

/// Temperature offset applied to a cell on artificial ignition (°C)
pub const IGNITION_BOOST: f32 = 50.0;

/// Combustible materials found in the base, with ignition thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Material {
    Wood,
    Plastic,
    /// Almost never burns
    Metal,
}

impl Material {
    /// Every deployable material
    pub const ALL: [Material; 3] = [Material::Wood, Material::Plastic, Material::Metal];

    /// Cell temperature above which the material ignites (°C)
    pub fn ignition_temperature(self) -> f32 {
        match self {
            Material::Wood => 50.0,
            Material::Plastic => 70.0,
            Material::Metal => 40.0,
        }
    }
}

/// One fire-source placement request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Deployment {
    pub x: usize,
    pub y: usize,
    /// Ignition temperature threshold of the placed material (°C)
    pub ignition_temperature: f32,
}

/// Fire-propagation experiment over one shared field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Experiment {
    field: ThermalField,
    /// Update order is insertion order, fixed for the lifetime of the run
    sources: Vec<FireSource>,
    /// Indices of sources burning as of the last completed tick
    burning: FxHashSet<usize>,
    cooling_constant: f32,
    tick: u64,
}

impl Experiment {
    /// Create an experiment over a fresh ambient field
    pub fn new(width: usize, height: usize) -> Self {
        info!(width, height, "creating fire experiment");
        Experiment {
            field: ThermalField::new(width, height),
            sources: Vec::new(),
            burning: FxHashSet::default(),
            cooling_constant: DEFAULT_COOLING_CONSTANT,
            tick: 0,
        }
    }

    /// Override the passive-cooling constant
    pub fn set_cooling_constant(&mut self, cooling_constant: f32) {
        self.cooling_constant = cooling_constant;
    }

    /// Place a fire source with the default influence radius and terminal
    /// cooling rate, returning its index
    ///
    /// # Errors
    /// Returns `ModelError::OutOfBounds` for a location outside the field
    /// and `ModelError::DegeneratePhaseTimes` for unusable timings.
    pub fn deploy(
        &mut self,
        deployment: Deployment,
        times: PhaseTimes,
    ) -> Result<usize, ModelError> {
        let source = FireSource::new(
            deployment.x,
            deployment.y,
            times,
            deployment.ignition_temperature,
            DEFAULT_INFLUENCE_RADIUS,
            DEFAULT_DECAY_COOLING_RATE,
            &self.field,
        )?;
        self.deploy_source(source)
    }

    /// Place an explicitly configured fire source, returning its index
    ///
    /// # Errors
    /// Returns `ModelError::OutOfBounds` when the source location lies
    /// outside this experiment's field.
    pub fn deploy_source(&mut self, source: FireSource) -> Result<usize, ModelError> {
        let (x, y) = source.position();
        if !self.field.in_bounds(x, y) {
            return Err(ModelError::OutOfBounds {
                x,
                y,
                width: self.field.width(),
                height: self.field.height(),
            });
        }
        self.sources.push(source);
        Ok(self.sources.len() - 1)
    }

    /// Scatter material points across the field at random cells
    ///
    /// # Errors
    /// Propagates deployment errors; generated locations are always in
    /// bounds, so failures indicate a zero-area field.
    pub fn deploy_random_materials(
        &mut self,
        count: usize,
        rng: &mut impl Rng,
    ) -> Result<(), ModelError> {
        for _ in 0..count {
            let x = rng.random_range(0..self.field.width());
            let y = rng.random_range(0..self.field.height());
            let material = Material::ALL
                .choose(rng)
                .copied()
                .unwrap_or(Material::Wood);
            self.deploy(
                Deployment {
                    x,
                    y,
                    ignition_temperature: material.ignition_temperature(),
                },
                PhaseTimes::default(),
            )?;
        }
        info!(count, total = self.sources.len(), "deployed material points");
        Ok(())
    }

    /// Artificially heat a source's cell past its ignition threshold and
    /// set its fire indicator; unknown indices are ignored
    pub fn ignite(&mut self, index: usize) {
        if let Some(source) = self.sources.get(index) {
            let (x, y) = source.position();
            let target = source.ignition_temperature() + IGNITION_BOOST;
            self.field.set_temperature_at(x, y, target);
            self.field.set_fire_at(x, y, 1);
            info!(index, x, y, target, "ignited fire source");
        }
    }

    /// Ignite up to `count` distinct randomly chosen sources
    pub fn ignite_random(&mut self, count: usize, rng: &mut impl Rng) {
        let amount = count.min(self.sources.len());
        let picks: Vec<usize> = sample(rng, self.sources.len(), amount).iter().collect();
        for index in picks {
            self.ignite(index);
        }
    }

    /// One simulation tick: every source in insertion order, then the
    /// global passive-cooling pass
    pub fn step(&mut self) {
        for source in &mut self.sources {
            source.update(&mut self.field);
        }
        passive_cooling(&mut self.field, self.cooling_constant);

        self.burning.clear();
        for (index, source) in self.sources.iter().enumerate() {
            if source.is_burning() {
                self.burning.insert(index);
            }
        }

        self.tick += 1;
        debug!(
            tick = self.tick,
            burning = self.burning.len(),
            max_temperature = self.field.max_temperature(),
            "completed tick"
        );
    }

    /// Agent-driven suppression: every burning source within `radius` of
    /// the agent position receives a suppression call of the given power
    pub fn extinguish_near(&mut self, agent: Vec2, radius: f32, power: f32) {
        for (index, source) in self.sources.iter_mut().enumerate() {
            if !source.is_burning() {
                continue;
            }
            let (x, y) = source.position();
            let dist = (Vec2::new(x as f32, y as f32) - agent).norm();
            if dist <= radius {
                debug!(index, x, y, power, "suppressing fire source");
                source.suppress(power, &mut self.field, radius);
                if !source.is_burning() {
                    self.burning.remove(&index);
                }
            }
        }
    }

    /// Step until the hottest cell drops to `threshold` or `max_ticks`
    /// elapse; returns the number of ticks executed
    pub fn run_until_cool(&mut self, threshold: f32, max_ticks: u64) -> u64 {
        let mut executed = 0;
        while executed < max_ticks && self.field.max_temperature() > threshold {
            self.step();
            executed += 1;
        }
        executed
    }

    /// The shared field
    pub fn field(&self) -> &ThermalField {
        &self.field
    }

    /// Mutable access to the shared field, for scenario setup
    pub fn field_mut(&mut self) -> &mut ThermalField {
        &mut self.field
    }

    /// Deployed sources in update order
    pub fn sources(&self) -> &[FireSource] {
        &self.sources
    }

    /// One deployed source by index
    pub fn source(&self, index: usize) -> Option<&FireSource> {
        self.sources.get(index)
    }

    /// Indices of sources burning as of the last completed tick
    pub fn burning(&self) -> &FxHashSet<usize> {
        &self.burning
    }

    /// Completed tick count
    pub fn tick(&self) -> u64 {
        self.tick
    }
}
