pub mod config;
pub mod constants;
pub mod error;
pub mod light;
pub mod types;

pub use config::{load_light_list, LightingConfig};
pub use error::{ConfigError, LightError};
pub use light::{LightDescriptor, LightSpec};
pub use types::{AttenuationTerm, ColorChannel, LightId, Scope, SlotTarget, ATTENUATION_TERMS};
