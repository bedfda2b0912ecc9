use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_GRID_CELL_SIZE, DEFAULT_INFLUENCE_CUTOFF, DEFAULT_MAX_LIGHTS,
    DEFAULT_MAX_LOCAL_RADIUS, MAX_HARDWARE_LIGHTS,
};
use crate::error::ConfigError;
use crate::light::LightSpec;

/// Engine-level lighting configuration, loaded from RON.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightingConfig {
    /// Number of hardware light slots the device exposes.
    #[serde(default = "default_max_lights")]
    pub max_lights: usize,
    /// Attenuation factor below which a LOCAL light no longer counts as near.
    #[serde(default = "default_influence_cutoff")]
    pub influence_cutoff: f32,
    /// Radius for unattenuated LOCAL lights; clamp for computed radii.
    #[serde(default = "default_max_local_radius")]
    pub max_local_radius: f32,
    /// Edge length of a spatial grid cell.
    #[serde(default = "default_grid_cell_size")]
    pub grid_cell_size: f32,
}

fn default_max_lights() -> usize {
    DEFAULT_MAX_LIGHTS
}

fn default_influence_cutoff() -> f32 {
    DEFAULT_INFLUENCE_CUTOFF
}

fn default_max_local_radius() -> f32 {
    DEFAULT_MAX_LOCAL_RADIUS
}

fn default_grid_cell_size() -> f32 {
    DEFAULT_GRID_CELL_SIZE
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            max_lights: default_max_lights(),
            influence_cutoff: default_influence_cutoff(),
            max_local_radius: default_max_local_radius(),
            grid_cell_size: default_grid_cell_size(),
        }
    }
}

impl LightingConfig {
    /// Config with every default except the slot count.
    pub fn with_max_lights(max_lights: usize) -> Self {
        Self {
            max_lights,
            ..Default::default()
        }
    }

    /// Parse and validate a config from a RON string. Missing fields take
    /// their defaults.
    pub fn from_ron_str(ron_str: &str) -> Result<Self, ConfigError> {
        let options = ron::Options::default();
        let config: LightingConfig = options
            .from_str(ron_str)
            .map_err(|e| ConfigError::ConfigParseError(e.to_string()))?;
        if let Err(e) = config.validate() {
            log::warn!("Rejected lighting config: {e}");
            return Err(e);
        }
        log::info!(
            "Lighting config: {} hardware slots, cutoff {}, grid cell {}",
            config.max_lights,
            config.influence_cutoff,
            config.grid_cell_size
        );
        Ok(config)
    }

    /// Reject values the multiplexer and spatial grid cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_lights == 0 || self.max_lights > MAX_HARDWARE_LIGHTS {
            return Err(ConfigError::InvalidMaxLights {
                max: MAX_HARDWARE_LIGHTS,
                actual: self.max_lights,
            });
        }
        if !(self.influence_cutoff > 0.0 && self.influence_cutoff < 1.0) {
            return Err(ConfigError::InvalidInfluenceCutoff(self.influence_cutoff));
        }
        if !(self.max_local_radius > 0.0) {
            return Err(ConfigError::NonPositive {
                field: "max_local_radius",
                value: self.max_local_radius,
            });
        }
        if !(self.grid_cell_size > 0.0) {
            return Err(ConfigError::NonPositive {
                field: "grid_cell_size",
                value: self.grid_cell_size,
            });
        }
        Ok(())
    }
}

/// Parse a RON list of declared lights, as attached to a world body.
pub fn load_light_list(ron_str: &str) -> Result<Vec<LightSpec>, ConfigError> {
    let options = ron::Options::default();
    options
        .from_str(ron_str)
        .map_err(|e| ConfigError::LightListParseError(e.to_string()))
}
