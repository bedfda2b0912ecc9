pub mod grid;
pub mod group;

pub use grid::LightGrid;
pub use group::LightGroup;

use lightslot_core::LightingConfig;
use lightslot_render::{LightDevice, LightManager};

/// Manager whose LOCAL relevance comes from a `LightGrid` sized by `config`.
pub fn grid_light_manager<D: LightDevice>(
    config: LightingConfig,
    device: D,
) -> LightManager<D, LightGrid> {
    let grid = LightGrid::new(config.grid_cell_size);
    LightManager::with_spatial(config, device, grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use lightslot_core::{LightDescriptor, Scope};
    use lightslot_render::{LightState, RecordingDevice};

    #[test]
    fn test_fly_through_rotates_local_lights() {
        let config = LightingConfig {
            grid_cell_size: 10.0,
            ..LightingConfig::with_max_lights(2)
        };
        let mut m = grid_light_manager(config, RecordingDevice::new());
        assert_eq!(m.spatial().cell_size(), 10.0);

        // Linear falloff reaching 1/256 at 25.5 units.
        let lamp = |x: f32| LightDescriptor {
            position: Vec3::new(x, 0.0, 0.0),
            attenuation: Vec3::new(1.0, 10.0, 0.0),
            ..Default::default()
        };
        let (west, _) = m.create(&lamp(0.0), Scope::Local);
        let (east, _) = m.create(&lamp(200.0), Scope::Local);

        m.update_frame(Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(m.state(west), Ok(LightState::Allocated(0)));
        assert_eq!(m.state(east), Ok(LightState::Unallocated));

        let stats = m.update_frame(Vec3::new(195.0, 0.0, 0.0));
        assert_eq!(stats.released, 1);
        assert_eq!(m.state(west), Ok(LightState::Unallocated));
        assert_eq!(m.state(east), Ok(LightState::Allocated(0)));
        assert!(m.check_invariants().is_ok());
    }
}
