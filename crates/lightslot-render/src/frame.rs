use glam::Vec3;
use lightslot_core::SlotTarget;

use crate::device::LightDevice;
use crate::manager::LightManager;
use crate::spatial::SpatialIndex;

/// What one frame pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// LOCAL lights that lost their slot for falling out of relevance.
    pub released: u32,
    /// Lights that gained a slot this frame.
    pub allocated: u32,
    /// Occupants pushed out to make room.
    pub evicted: u32,
    /// Allocation attempts that found no slot.
    pub exhausted: u32,
}

impl FrameStats {
    pub fn is_idle(&self) -> bool {
        *self == FrameStats::default()
    }
}

impl<D: LightDevice, S: SpatialIndex> LightManager<D, S> {
    /// Per-frame rebalancing, run once before the first draw call.
    ///
    /// LOCAL lights no longer relevant at `camera` give up their slots.
    /// Enabled GLOBAL lights without a slot then retry in creation order,
    /// and last the relevant LOCAL lights fill what is left in the order the
    /// spatial index reports them.
    pub fn update_frame(&mut self, camera: Vec3) -> FrameStats {
        let evictions_before = self.evictions;
        let exhausted_before = self.exhausted;
        let mut stats = FrameStats::default();

        let mut relevant = std::mem::take(&mut self.relevant_scratch);
        relevant.clear();
        self.spatial().relevant(camera, &mut relevant);
        relevant.retain(|&id| {
            matches!(self.registry.live(id), Ok(record) if record.scope.is_local() && record.light.enabled)
        });

        for slot in 0..self.slots.len() {
            let entry = self.slots.slot(slot);
            let Some(index) = entry.occupant() else {
                continue;
            };
            if !entry.is_local() {
                continue;
            }
            if !relevant.contains(&self.registry.id_of(index)) {
                self.release(index);
                stats.released += 1;
            }
        }

        for i in 0..self.registry.global_order().len() {
            let index = self.registry.global_order()[i];
            let record = self.registry.by_index(index);
            if record.light.enabled
                && record.target == SlotTarget::Unassigned
                && self.allocate(index).is_some()
            {
                stats.allocated += 1;
            }
        }

        for &id in &relevant {
            if self.registry.by_index(id.index).target == SlotTarget::Unassigned
                && self.allocate(id.index).is_some()
            {
                stats.allocated += 1;
            }
        }
        self.relevant_scratch = relevant;

        stats.evicted = (self.evictions - evictions_before) as u32;
        stats.exhausted = (self.exhausted - exhausted_before) as u32;
        if !stats.is_idle() {
            log::debug!("Frame at {camera}: {stats:?}");
        }
        stats
    }
}
