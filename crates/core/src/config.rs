//! Engine tuning: grid scale, target footprint and speed, pool sizing.

use serde::{Deserialize, Serialize};

use crate::types::ConfigError;

mod defaults {
    pub fn node_radius() -> f32 {
        0.5
    }
    pub fn target_radius() -> f32 {
        0.5
    }
    pub fn target_speed() -> f32 {
        10.0
    }
    pub fn sensor_scale() -> f32 {
        1.1
    }
    pub fn enabled() -> bool {
        true
    }
    pub fn node_pool() -> usize {
        256
    }
    pub fn marker_pool() -> usize {
        256
    }
    pub fn sensor_pool() -> usize {
        64
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PerimeterConfig {
    /// Half the side length of one grid cell (world units).
    #[serde(default = "defaults::node_radius")]
    pub node_radius: f32,

    /// Physical radius of the fleeing target (world units).
    #[serde(default = "defaults::target_radius")]
    pub target_radius: f32,

    /// Target speed. Scaled by `target_radius / node_radius` into cost units per second.
    #[serde(default = "defaults::target_speed")]
    pub target_speed: f32,

    /// Sensor zone radius as a multiple of the node diameter.
    #[serde(default = "defaults::sensor_scale")]
    pub sensor_scale: f32,

    /// Maintain active/inactive visual markers for presentation.
    #[serde(default = "defaults::enabled")]
    pub show_potential_area: bool,

    /// Seed for random location picks.
    #[serde(default)]
    pub seed: u64,

    #[serde(default)]
    pub pool: PoolCapacities,
}

impl Default for PerimeterConfig {
    fn default() -> Self {
        Self {
            node_radius: defaults::node_radius(),
            target_radius: defaults::target_radius(),
            target_speed: defaults::target_speed(),
            sensor_scale: defaults::sensor_scale(),
            show_potential_area: true,
            seed: 0,
            pool: PoolCapacities::default(),
        }
    }
}

impl PerimeterConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_positive(self.node_radius) {
            return Err(ConfigError::NonPositiveNodeRadius);
        }
        if !is_positive(self.target_radius) {
            return Err(ConfigError::NonPositiveTargetRadius);
        }
        if self.target_speed.is_nan() || self.target_speed < 0.0 {
            return Err(ConfigError::NegativeTargetSpeed);
        }
        if !is_positive(self.sensor_scale) {
            return Err(ConfigError::NonPositiveSensorScale);
        }
        Ok(())
    }

    pub fn node_diameter(&self) -> f32 {
        self.node_radius * 2.0
    }

    /// Movement potential gained per second of elapsed time.
    pub fn expansion_rate(&self) -> f32 {
        self.target_radius / self.node_radius * self.target_speed
    }

    /// Potential granted at start so the origin area covers the target footprint.
    pub fn initial_potential(&self) -> Option<f32> {
        (self.node_radius < self.target_radius)
            .then(|| self.target_radius / self.node_radius * 5.0)
    }

    pub fn sensor_radius(&self) -> f32 {
        self.node_diameter() * self.sensor_scale
    }
}

fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

/// Pre-sized slot counts. Exceeding one is logged, never fatal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolCapacities {
    #[serde(default = "defaults::node_pool")]
    pub nodes: usize,
    #[serde(default = "defaults::marker_pool")]
    pub markers: usize,
    #[serde(default = "defaults::sensor_pool")]
    pub sensors: usize,
}

impl Default for PoolCapacities {
    fn default() -> Self {
        Self {
            nodes: defaults::node_pool(),
            markers: defaults::marker_pool(),
            sensors: defaults::sensor_pool(),
        }
    }
}
