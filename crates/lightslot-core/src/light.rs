use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_ATTENUATION, DIRECTIONAL_W, POSITIONAL_W};
use crate::types::{ColorChannel, Scope};

/// Properties of a logical light, as declared by world content and as
/// last programmed into a hardware slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightDescriptor {
    /// Diffuse RGBA.
    #[serde(default = "default_diffuse")]
    pub diffuse: Vec4,
    /// Specular RGBA.
    #[serde(default = "default_specular")]
    pub specular: Vec4,
    /// Ambient RGBA.
    #[serde(default = "default_ambient")]
    pub ambient: Vec4,
    /// Position of a positional light, or direction toward a directional one.
    #[serde(default = "default_position")]
    pub position: Vec3,
    /// (constant, linear, quadratic) attenuation coefficients.
    #[serde(default = "default_attenuation")]
    pub attenuation: Vec3,
    /// Whether the light should shine once it holds a slot.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_diffuse() -> Vec4 {
    Vec4::ONE
}

fn default_specular() -> Vec4 {
    Vec4::ONE
}

fn default_ambient() -> Vec4 {
    Vec4::new(0.0, 0.0, 0.0, 1.0)
}

fn default_position() -> Vec3 {
    Vec3::Z
}

fn default_attenuation() -> Vec3 {
    Vec3::from_array(DEFAULT_ATTENUATION)
}

fn default_enabled() -> bool {
    true
}

impl Default for LightDescriptor {
    fn default() -> Self {
        Self {
            diffuse: default_diffuse(),
            specular: default_specular(),
            ambient: default_ambient(),
            position: default_position(),
            attenuation: default_attenuation(),
            enabled: default_enabled(),
        }
    }
}

impl LightDescriptor {
    /// A light is attenuated (and therefore positional) when any coefficient
    /// differs from the unattenuated default.
    pub fn is_attenuated(&self) -> bool {
        self.attenuation != default_attenuation()
    }

    /// Position plus the derived homogeneous flag, as written to the device.
    /// The flag tracks attenuation, so it must be resent when either changes.
    pub fn homogeneous_position(&self) -> Vec4 {
        let w = if self.is_attenuated() {
            POSITIONAL_W
        } else {
            DIRECTIONAL_W
        };
        self.position.extend(w)
    }

    pub fn color(&self, channel: ColorChannel) -> Vec4 {
        match channel {
            ColorChannel::Diffuse => self.diffuse,
            ColorChannel::Specular => self.specular,
            ColorChannel::Ambient => self.ambient,
        }
    }

    pub fn set_color(&mut self, channel: ColorChannel, rgba: Vec4) {
        match channel {
            ColorChannel::Diffuse => self.diffuse = rgba,
            ColorChannel::Specular => self.specular = rgba,
            ColorChannel::Ambient => self.ambient = rgba,
        }
    }

    /// Distance beyond which this light contributes less than `cutoff` of its
    /// intensity, clamped to `max_radius`. Unattenuated lights reach
    /// `max_radius`.
    ///
    /// Solves `c + l*d + q*d^2 = 1 / cutoff` for the largest root.
    pub fn influence_radius(&self, cutoff: f32, max_radius: f32) -> f32 {
        if !self.is_attenuated() {
            return max_radius;
        }
        let [c, l, q] = self.attenuation.to_array();
        let target = 1.0 / cutoff;
        if c >= target {
            // Too dim to matter even at the light itself.
            return 0.0;
        }
        let radius = if q > 0.0 {
            let disc = l * l + 4.0 * q * (target - c);
            (-l + disc.sqrt()) / (2.0 * q)
        } else if l > 0.0 {
            (target - c) / l
        } else {
            max_radius
        };
        if radius.is_nan() {
            max_radius
        } else {
            radius.clamp(0.0, max_radius)
        }
    }
}

/// One entry of a declared light list: a descriptor plus its scope.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightSpec {
    pub light: LightDescriptor,
    /// LOCAL lights only get a slot while near the camera.
    #[serde(default)]
    pub islocal: bool,
}

impl LightSpec {
    pub fn scope(&self) -> Scope {
        Scope::from_global(!self.islocal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_directional() {
        let light = LightDescriptor::default();
        assert!(!light.is_attenuated());
        assert_eq!(light.homogeneous_position(), Vec4::new(0.0, 0.0, 1.0, 0.0));
    }

    #[test]
    fn test_any_coefficient_marks_attenuated() {
        for att in [
            Vec3::new(0.5, 0.0, 0.0),
            Vec3::new(1.0, 0.1, 0.0),
            Vec3::new(1.0, 0.0, 0.01),
        ] {
            let light = LightDescriptor {
                attenuation: att,
                ..Default::default()
            };
            assert!(light.is_attenuated(), "{att:?} should be attenuated");
            assert_eq!(light.homogeneous_position().w, POSITIONAL_W);
        }
    }

    #[test]
    fn test_color_accessors() {
        let mut light = LightDescriptor::default();
        let red = Vec4::new(1.0, 0.0, 0.0, 1.0);
        light.set_color(ColorChannel::Specular, red);
        assert_eq!(light.color(ColorChannel::Specular), red);
        assert_eq!(light.color(ColorChannel::Diffuse), Vec4::ONE);
    }

    #[test]
    fn test_influence_radius_quadratic() {
        let light = LightDescriptor {
            attenuation: Vec3::new(1.0, 0.0, 0.01),
            ..Default::default()
        };
        // 1 + 0.01 d^2 = 100  =>  d = sqrt(9900)
        let r = light.influence_radius(0.01, 1000.0);
        assert!((r - 9900f32.sqrt()).abs() < 1e-2, "got {r}");
    }

    #[test]
    fn test_influence_radius_linear() {
        let light = LightDescriptor {
            attenuation: Vec3::new(1.0, 0.5, 0.0),
            ..Default::default()
        };
        // 1 + 0.5 d = 4  =>  d = 6
        let r = light.influence_radius(0.25, 1000.0);
        assert!((r - 6.0).abs() < 1e-4, "got {r}");
    }

    #[test]
    fn test_influence_radius_clamps() {
        let unattenuated = LightDescriptor::default();
        assert_eq!(unattenuated.influence_radius(0.01, 250.0), 250.0);

        let far = LightDescriptor {
            attenuation: Vec3::new(1.0, 0.0, 1e-9),
            ..Default::default()
        };
        assert_eq!(far.influence_radius(0.01, 250.0), 250.0);

        let dim = LightDescriptor {
            attenuation: Vec3::new(500.0, 0.0, 0.0),
            ..Default::default()
        };
        assert_eq!(dim.influence_radius(0.01, 250.0), 0.0);
    }

    #[test]
    fn test_light_spec_scope() {
        let spec = LightSpec {
            light: LightDescriptor::default(),
            islocal: true,
        };
        assert_eq!(spec.scope(), Scope::Local);
    }
}
