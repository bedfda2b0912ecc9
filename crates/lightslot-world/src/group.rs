use glam::Vec3;
use lightslot_core::{LightError, LightId, LightSpec};
use lightslot_render::{LightDevice, LightManager, SpatialIndex};

/// Lights owned by one world body (a star, a planet's city lights).
///
/// The body keeps its handles here and drives them as a unit: they follow
/// the body around, switch on and off together, and die with it.
#[derive(Debug, Default)]
pub struct LightGroup {
    lights: Vec<LightId>,
}

impl LightGroup {
    /// Create one light per spec, each with its own scope.
    pub fn spawn<D: LightDevice, S: SpatialIndex>(
        manager: &mut LightManager<D, S>,
        specs: &[LightSpec],
    ) -> Self {
        let lights = specs
            .iter()
            .map(|spec| manager.create(&spec.light, spec.scope()).0)
            .collect();
        Self { lights }
    }

    pub fn lights(&self) -> &[LightId] {
        &self.lights
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    /// Move every light to the body's position.
    pub fn set_position<D: LightDevice, S: SpatialIndex>(
        &self,
        manager: &mut LightManager<D, S>,
        position: Vec3,
    ) -> Result<(), LightError> {
        for &id in &self.lights {
            manager.set_position(id, position)?;
        }
        Ok(())
    }

    /// Enable every light. Returns how many obtained a slot right away.
    pub fn enable_all<D: LightDevice, S: SpatialIndex>(
        &self,
        manager: &mut LightManager<D, S>,
    ) -> Result<usize, LightError> {
        let mut allocated = 0;
        for &id in &self.lights {
            if manager.enable(id)?.is_some() {
                allocated += 1;
            }
        }
        Ok(allocated)
    }

    pub fn disable_all<D: LightDevice, S: SpatialIndex>(
        &self,
        manager: &mut LightManager<D, S>,
    ) -> Result<(), LightError> {
        for &id in &self.lights {
            manager.disable(id)?;
        }
        Ok(())
    }

    /// Kill every light and forget the handles.
    pub fn kill_all<D: LightDevice, S: SpatialIndex>(&mut self, manager: &mut LightManager<D, S>) {
        for id in self.lights.drain(..) {
            manager.kill(id);
        }
    }
}
