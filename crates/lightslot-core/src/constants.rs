//! Single source of truth for shared constants.
//! Config values default to these; the device backends and the
//! allocator never hard-code a slot count.

/// Default number of hardware light slots (fixed-function lighting guarantees 8).
pub const DEFAULT_MAX_LIGHTS: usize = 8;

/// Upper bound accepted for `LightingConfig::max_lights`.
pub const MAX_HARDWARE_LIGHTS: usize = 32;

/// Attenuation coefficients of an unattenuated light: (constant, linear, quadratic).
/// Any other value marks the light as attenuated (positional).
pub const DEFAULT_ATTENUATION: [f32; 3] = [1.0, 0.0, 0.0];

/// Default attenuation factor below which a LOCAL light stops influencing a point.
pub const DEFAULT_INFLUENCE_CUTOFF: f32 = 1.0 / 256.0;

/// Default radius for LOCAL lights that are not attenuated, and the clamp
/// applied to computed influence radii.
pub const DEFAULT_MAX_LOCAL_RADIUS: f32 = 1000.0;

/// Default edge length of a spatial grid cell in world units.
pub const DEFAULT_GRID_CELL_SIZE: f32 = 64.0;

/// Homogeneous w written with the position of a positional (attenuated) light.
pub const POSITIONAL_W: f32 = 1.0;

/// Homogeneous w written with the direction of a directional light.
pub const DIRECTIONAL_W: f32 = 0.0;
