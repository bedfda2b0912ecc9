use glam::{Vec3, Vec4};
use lightslot_core::{
    ColorChannel, LightDescriptor, LightError, LightId, LightingConfig, Scope, SlotTarget,
};

use crate::allocator::{find_global_clobberable, find_local_clobberable};
use crate::device::LightDevice;
use crate::program::{program_slot, reprogram_attenuation, reprogram_color, reprogram_position};
use crate::registry::{LightRecord, LightRegistry};
use crate::slot_table::{HardwareSlot, SlotStatus, SlotTable};
use crate::spatial::{RelevanceList, SpatialIndex};

/// Where a logical light stands with respect to the hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightState {
    /// Programmed into this hardware slot.
    Allocated(usize),
    /// Exists logically without a slot.
    Unallocated,
    /// Killed; can never be enabled again.
    Destroyed,
}

/// A single-channel property update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightProperty {
    Color(ColorChannel, Vec4),
    Position(Vec3),
    /// (constant, linear, quadratic)
    Attenuation(Vec3),
}

/// Maps logical lights onto the device's fixed hardware slots.
///
/// Owns the registry, the slot table, the device backend and the spatial
/// index. Single-threaded: the render thread calls it during light setup,
/// once per frame, before any draw call.
pub struct LightManager<D: LightDevice, S: SpatialIndex = RelevanceList> {
    config: LightingConfig,
    device: D,
    spatial: S,
    pub(crate) registry: LightRegistry,
    pub(crate) slots: SlotTable,
    /// Running totals, diffed by the frame pass.
    pub(crate) evictions: u64,
    pub(crate) exhausted: u64,
    /// Reused buffer for spatial queries.
    pub(crate) relevant_scratch: Vec<LightId>,
}

impl<D: LightDevice> LightManager<D, RelevanceList> {
    /// Manager whose LOCAL relevance is set by hand through `spatial_mut`.
    pub fn new(config: LightingConfig, device: D) -> Self {
        Self::with_spatial(config, device, RelevanceList::new())
    }
}

impl<D: LightDevice, S: SpatialIndex> LightManager<D, S> {
    pub fn with_spatial(config: LightingConfig, device: D, spatial: S) -> Self {
        log::info!("Light multiplexer: {} hardware slots", config.max_lights);
        Self {
            slots: SlotTable::new(config.max_lights),
            config,
            device,
            spatial,
            registry: LightRegistry::new(),
            evictions: 0,
            exhausted: 0,
            relevant_scratch: Vec::new(),
        }
    }

    /// Declare a new light. GLOBAL lights try for a slot immediately; LOCAL
    /// lights wait for the spatial index to report them near the camera.
    ///
    /// Returns the handle and the slot obtained. `None` is not a failure:
    /// the light exists logically and is retried on later frames.
    pub fn create(&mut self, light: &LightDescriptor, scope: Scope) -> (LightId, Option<usize>) {
        let id = self.registry.insert(*light, scope);
        let slot = match scope {
            Scope::Global => self.allocate(id.index),
            Scope::Local => {
                if light.enabled {
                    self.register_local(id);
                }
                None
            }
        };
        (id, slot)
    }

    /// Switch a light on. A slot-less GLOBAL light tries for a slot again;
    /// a LOCAL light re-enters the spatial index.
    pub fn enable(&mut self, id: LightId) -> Result<Option<usize>, LightError> {
        let record = self.registry.live_mut(id)?;
        record.light.enabled = true;
        let (target, scope) = (record.target, record.scope);

        if let Some(slot) = target.slot() {
            if !self.slots.slot(slot).is_on() {
                self.slots.set_on(slot, true);
                self.device.set_enabled(slot, true);
            }
            return Ok(Some(slot));
        }
        match scope {
            Scope::Global => Ok(self.allocate(id.index)),
            Scope::Local => {
                self.register_local(id);
                Ok(None)
            }
        }
    }

    /// Switch a light off: its slot is emptied and a LOCAL light leaves the
    /// spatial index until enabled again. No-op on a killed light.
    pub fn disable(&mut self, id: LightId) -> Result<(), LightError> {
        if self.registry.get(id)?.is_destroyed() {
            return Ok(());
        }
        self.disable_live(id);
        Ok(())
    }

    fn disable_live(&mut self, id: LightId) {
        let record = self.registry.by_index_mut(id.index);
        record.light.enabled = false;
        let scope = record.scope;
        self.release(id.index);
        if scope.is_local() {
            self.spatial.remove(id);
        }
    }

    /// Destroy a light for good. Idempotent; stale handles are ignored.
    pub fn kill(&mut self, id: LightId) {
        match self.registry.get(id) {
            Ok(record) if !record.is_destroyed() => {}
            Ok(_) => return,
            Err(e) => {
                log::debug!("kill ignored: {e}");
                return;
            }
        }
        self.disable_live(id);
        self.registry.destroy(id.index);
        log::debug!("{id} killed");
    }

    /// Update one property of a light.
    ///
    /// A LOCAL light holding a slot gives it up first; the next frame pass
    /// decides whether it earns one back. A GLOBAL light holding a slot has
    /// just the changed channel rewritten.
    pub fn set_property(&mut self, id: LightId, property: LightProperty) -> Result<(), LightError> {
        let record = self.registry.live(id)?;
        let (scope, target) = (record.scope, record.target);
        if scope.is_local() && target.slot().is_some() {
            self.release(id.index);
        }

        let record = self.registry.by_index_mut(id.index);
        match property {
            LightProperty::Color(channel, rgba) => record.light.set_color(channel, rgba),
            LightProperty::Position(position) => record.light.position = position,
            LightProperty::Attenuation(attenuation) => record.light.attenuation = attenuation,
        }
        let light = record.light;

        if scope.is_local() {
            if light.enabled {
                self.register_local(id);
            }
            return Ok(());
        }
        if let Some(slot) = target.slot() {
            match property {
                LightProperty::Color(channel, _) => {
                    reprogram_color(&mut self.device, &mut self.slots, slot, &light, channel)
                }
                LightProperty::Position(_) => {
                    reprogram_position(&mut self.device, &mut self.slots, slot, &light)
                }
                LightProperty::Attenuation(_) => {
                    reprogram_attenuation(&mut self.device, &mut self.slots, slot, &light)
                }
            }
        }
        Ok(())
    }

    pub fn set_color(
        &mut self,
        id: LightId,
        channel: ColorChannel,
        rgba: Vec4,
    ) -> Result<(), LightError> {
        self.set_property(id, LightProperty::Color(channel, rgba))
    }

    pub fn set_position(&mut self, id: LightId, position: Vec3) -> Result<(), LightError> {
        self.set_property(id, LightProperty::Position(position))
    }

    pub fn set_attenuation(&mut self, id: LightId, attenuation: Vec3) -> Result<(), LightError> {
        self.set_property(id, LightProperty::Attenuation(attenuation))
    }

    /// Give a LOCAL light a slot now, as if the spatial index had just
    /// reported it relevant. Never evicts an enabled occupant.
    pub fn allocate_local(&mut self, id: LightId) -> Result<Option<usize>, LightError> {
        let record = self.registry.live(id)?;
        if !record.light.enabled {
            return Ok(None);
        }
        Ok(self.allocate(id.index))
    }

    /// Find and program a slot for the record at `index`, evicting per the
    /// scope's policy. Returns the existing slot if it already has one.
    pub(crate) fn allocate(&mut self, index: u32) -> Option<usize> {
        let record = self.registry.by_index(index);
        if let Some(slot) = record.target.slot() {
            return Some(slot);
        }
        let found = match record.scope {
            Scope::Global => find_global_clobberable(&self.slots),
            Scope::Local => find_local_clobberable(&self.slots),
        };
        match found {
            Some(slot) => {
                self.clobber(slot, index);
                Some(slot)
            }
            None => {
                self.exhausted += 1;
                log::debug!("No hardware slot for {}", self.registry.id_of(index));
                None
            }
        }
    }

    /// Program `slot` with the record at `index`, keeping both sides of the
    /// slot/record link in step for the evicted and the incoming light.
    fn clobber(&mut self, slot: usize, index: u32) {
        let record = self.registry.by_index(index);
        let (light, scope) = (record.light, record.scope);
        let evicted = program_slot(&mut self.device, &mut self.slots, slot, index, &light, scope);
        if let Some(old) = evicted {
            let old_record = self.registry.by_index_mut(old);
            debug_assert_eq!(old_record.target, SlotTarget::Slot(slot));
            old_record.target = SlotTarget::Unassigned;
            self.evictions += 1;
            log::debug!(
                "{} evicted from slot {slot} by {}",
                self.registry.id_of(old),
                self.registry.id_of(index)
            );
        }
        self.registry.by_index_mut(index).target = SlotTarget::Slot(slot);
    }

    /// Empty the slot held by the record at `index`, if any.
    pub(crate) fn release(&mut self, index: u32) {
        let Some(slot) = self.registry.by_index(index).target.slot() else {
            return;
        };
        if self.slots.occupant(slot) != Some(index) {
            debug_assert!(false, "light {index} points at slot {slot} it does not occupy");
            log::warn!("Light {index} points at slot {slot} it does not occupy; left untouched");
            return;
        }
        let was_on = self.slots.slot(slot).is_on();
        self.slots.vacate(slot);
        if was_on {
            self.device.set_enabled(slot, false);
        }
        self.registry.by_index_mut(index).target = SlotTarget::Unassigned;
    }

    fn register_local(&mut self, id: LightId) {
        let light = &self.registry.by_index(id.index).light;
        let radius =
            light.influence_radius(self.config.influence_cutoff, self.config.max_local_radius);
        self.spatial.insert(id, light.position, radius);
    }

    pub fn state(&self, id: LightId) -> Result<LightState, LightError> {
        Ok(match self.registry.get(id)?.target {
            SlotTarget::Slot(slot) => LightState::Allocated(slot),
            SlotTarget::Unassigned => LightState::Unallocated,
            SlotTarget::Destroyed => LightState::Destroyed,
        })
    }

    pub fn light(&self, id: LightId) -> Result<&LightDescriptor, LightError> {
        Ok(&self.registry.live(id)?.light)
    }

    pub fn record(&self, id: LightId) -> Result<&LightRecord, LightError> {
        self.registry.get(id)
    }

    /// Hardware slot `slot`, or `None` past the device capacity.
    pub fn slot(&self, slot: usize) -> Option<&HardwareSlot> {
        self.slots.get(slot)
    }

    pub fn slots(&self) -> &SlotTable {
        &self.slots
    }

    /// Number of hardware slots currently occupied.
    pub fn occupancy(&self) -> usize {
        self.slots.occupied_count()
    }

    pub fn config(&self) -> &LightingConfig {
        &self.config
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn spatial(&self) -> &S {
        &self.spatial
    }

    pub fn spatial_mut(&mut self) -> &mut S {
        &mut self.spatial
    }

    /// Verify the slot/record link in both directions. Returns the first
    /// inconsistency found.
    pub fn check_invariants(&self) -> Result<(), String> {
        for (slot, entry) in self.slots.iter().enumerate() {
            let Some(index) = entry.occupant() else {
                if entry.status() != SlotStatus::empty() {
                    return Err(format!("empty slot {slot} has status {:?}", entry.status()));
                }
                continue;
            };
            let record = self.registry.by_index(index);
            if record.target != SlotTarget::Slot(slot) {
                return Err(format!(
                    "slot {slot} holds light {index} whose target is {:?}",
                    record.target
                ));
            }
            if entry.is_local() != record.scope.is_local() {
                return Err(format!("slot {slot} LOCAL bit disagrees with light {index}"));
            }
            if entry.is_on() != record.light.enabled {
                return Err(format!("slot {slot} ON bit disagrees with light {index}"));
            }
        }
        for (index, record) in self.registry.iter() {
            if let SlotTarget::Slot(slot) = record.target {
                if slot >= self.slots.len() || self.slots.occupant(slot) != Some(index) {
                    return Err(format!("light {index} targets slot {slot} it does not occupy"));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{DeviceWrite, RecordingDevice};

    fn manager(slots: usize) -> LightManager<RecordingDevice> {
        LightManager::new(LightingConfig::with_max_lights(slots), RecordingDevice::new())
    }

    fn off() -> LightDescriptor {
        LightDescriptor {
            enabled: false,
            ..Default::default()
        }
    }

    fn assert_consistent(m: &LightManager<RecordingDevice>) {
        if let Err(e) = m.check_invariants() {
            panic!("invariant violated: {e}");
        }
    }

    /// Put a LOCAL light into a specific slot through the relevance path.
    fn local_in_slot(m: &mut LightManager<RecordingDevice>, expected: usize) -> LightId {
        let (id, slot) = m.create(&LightDescriptor::default(), Scope::Local);
        assert_eq!(slot, None, "LOCAL lights wait for relevance");
        let slot = m.allocate_local(id).expect("live light");
        assert_eq!(slot, Some(expected));
        id
    }

    #[test]
    fn test_global_lands_in_lowest_empty_slot() {
        let mut m = manager(4);
        let (a, _) = m.create(&LightDescriptor::default(), Scope::Global);
        let (b, _) = m.create(&LightDescriptor::default(), Scope::Global);
        let (c, _) = m.create(&LightDescriptor::default(), Scope::Global);
        m.disable(b).expect("live");
        assert_eq!(m.state(b), Ok(LightState::Unallocated));

        let (_, slot) = m.create(&LightDescriptor::default(), Scope::Global);
        assert_eq!(slot, Some(1));
        assert_eq!(m.state(a), Ok(LightState::Allocated(0)));
        assert_eq!(m.state(c), Ok(LightState::Allocated(2)));
        assert_consistent(&m);
    }

    #[test]
    fn test_global_evicts_disabled_before_active() {
        let mut m = manager(4);
        m.create(&LightDescriptor::default(), Scope::Global);
        let (disabled, _) = m.create(&off(), Scope::Global);
        let local = local_in_slot(&mut m, 2);
        m.create(&LightDescriptor::default(), Scope::Global);
        assert_eq!(m.slots().status(1), SlotStatus::empty());
        assert_eq!(m.occupancy(), 4);

        let (newcomer, slot) = m.create(&LightDescriptor::default(), Scope::Global);

        assert_eq!(slot, Some(1));
        assert_eq!(m.state(newcomer), Ok(LightState::Allocated(1)));
        assert_eq!(m.state(disabled), Ok(LightState::Unallocated));
        assert_eq!(m.state(local), Ok(LightState::Allocated(2)));
        assert_consistent(&m);
    }

    #[test]
    fn test_global_evicts_local_not_global() {
        let mut m = manager(2);
        let (global, _) = m.create(&LightDescriptor::default(), Scope::Global);
        let local = local_in_slot(&mut m, 1);

        let (_, slot) = m.create(&LightDescriptor::default(), Scope::Global);

        assert_eq!(slot, Some(1));
        assert_eq!(m.state(global), Ok(LightState::Allocated(0)));
        assert_eq!(m.state(local), Ok(LightState::Unallocated));
        assert!(m.light(local).expect("live").enabled, "eviction is not a disable");
        assert_consistent(&m);
    }

    #[test]
    fn test_full_table_leaves_light_logical_only() {
        let mut m = manager(2);
        m.create(&LightDescriptor::default(), Scope::Global);
        m.create(&LightDescriptor::default(), Scope::Global);
        let before = m.slots().clone();
        m.device_mut().take();

        let (third, slot) = m.create(&LightDescriptor::default(), Scope::Global);

        assert_eq!(slot, None);
        assert_eq!(m.state(third), Ok(LightState::Unallocated));
        assert!(m.device().writes().is_empty());
        for i in 0..2 {
            assert_eq!(m.slots().occupant(i), before.occupant(i));
            assert_eq!(m.slots().status(i), before.status(i));
        }
        assert_consistent(&m);
    }

    #[test]
    fn test_clobber_writes_only_differing_channel() {
        let mut m = manager(1);
        let red = Vec4::new(1.0, 0.0, 0.0, 1.0);
        let a = LightDescriptor {
            diffuse: red,
            ..Default::default()
        };
        let (a_id, _) = m.create(&a, Scope::Local);
        assert_eq!(m.allocate_local(a_id), Ok(Some(0)));
        m.device_mut().take();

        let b = LightDescriptor {
            diffuse: red,
            specular: Vec4::new(0.0, 1.0, 0.0, 1.0),
            ..Default::default()
        };
        let (_, slot) = m.create(&b, Scope::Global);

        assert_eq!(slot, Some(0));
        assert_eq!(
            m.device().writes(),
            &[DeviceWrite::Color {
                slot: 0,
                channel: ColorChannel::Specular,
                value: Vec4::new(0.0, 1.0, 0.0, 1.0)
            }]
        );
        assert_eq!(m.state(a_id), Ok(LightState::Unallocated));
    }

    #[test]
    fn test_local_edit_releases_slot() {
        let mut m = manager(4);
        m.create(&LightDescriptor::default(), Scope::Global);
        m.create(&LightDescriptor::default(), Scope::Global);
        let local = local_in_slot(&mut m, 2);
        m.device_mut().take();

        m.set_color(local, ColorChannel::Diffuse, Vec4::new(0.0, 0.0, 1.0, 1.0))
            .expect("live");

        assert!(m.slots().get(2).expect("slot 2").is_empty());
        assert_eq!(m.state(local), Ok(LightState::Unallocated));
        assert_eq!(m.device().writes(), &[DeviceWrite::Enabled { slot: 2, on: false }]);
        assert!(m.spatial().is_registered(local), "still a relevance candidate");
        assert_eq!(m.light(local).expect("live").diffuse, Vec4::new(0.0, 0.0, 1.0, 1.0));
        assert_consistent(&m);
    }

    #[test]
    fn test_global_edit_reprograms_one_channel() {
        let mut m = manager(2);
        let (id, _) = m.create(&LightDescriptor::default(), Scope::Global);
        m.device_mut().take();

        m.set_color(id, ColorChannel::Ambient, Vec4::splat(0.1)).expect("live");
        m.set_position(id, Vec3::new(5.0, 0.0, 0.0)).expect("live");

        assert_eq!(
            m.device().writes(),
            &[
                DeviceWrite::Color {
                    slot: 0,
                    channel: ColorChannel::Ambient,
                    value: Vec4::splat(0.1)
                },
                DeviceWrite::Position {
                    slot: 0,
                    value: Vec4::new(5.0, 0.0, 0.0, 0.0)
                },
            ]
        );
        assert_eq!(m.state(id), Ok(LightState::Allocated(0)));
        assert_consistent(&m);
    }

    #[test]
    fn test_attenuation_edit_resends_position() {
        let mut m = manager(1);
        let (id, _) = m.create(&LightDescriptor::default(), Scope::Global);
        m.device_mut().take();

        m.set_attenuation(id, Vec3::new(1.0, 0.0, 0.5)).expect("live");

        let writes = m.device_mut().take();
        assert_eq!(writes.len(), 4);
        assert_eq!(
            writes[0],
            DeviceWrite::Position {
                slot: 0,
                value: Vec4::new(0.0, 0.0, 1.0, 1.0)
            }
        );
    }

    #[test]
    fn test_slotless_edit_touches_no_hardware() {
        let mut m = manager(1);
        m.create(&LightDescriptor::default(), Scope::Global);
        let (id, slot) = m.create(&LightDescriptor::default(), Scope::Global);
        assert_eq!(slot, None);
        m.device_mut().take();

        m.set_color(id, ColorChannel::Diffuse, Vec4::ZERO).expect("live");

        assert!(m.device().writes().is_empty());
        assert_eq!(m.light(id).expect("live").diffuse, Vec4::ZERO);
    }

    #[test]
    fn test_kill_twice_is_idempotent() {
        let mut m = manager(2);
        let (id, _) = m.create(&LightDescriptor::default(), Scope::Global);

        m.kill(id);
        let after_once = m.slots().clone();
        assert_eq!(m.state(id), Ok(LightState::Destroyed));

        m.kill(id);
        assert_eq!(m.state(id), Ok(LightState::Destroyed));
        for i in 0..2 {
            assert_eq!(m.slots().occupant(i), after_once.occupant(i));
        }
        assert_eq!(m.occupancy(), 0);
        assert_consistent(&m);
    }

    #[test]
    fn test_killed_light_cannot_be_enabled() {
        let mut m = manager(2);
        let (id, _) = m.create(&LightDescriptor::default(), Scope::Local);
        m.kill(id);
        assert_eq!(m.enable(id), Err(LightError::Destroyed(id)));
        assert_eq!(
            m.set_position(id, Vec3::ZERO),
            Err(LightError::Destroyed(id))
        );
        assert_eq!(m.disable(id), Ok(()));
        assert!(!m.spatial().is_registered(id));
    }

    #[test]
    fn test_recycled_record_invalidates_old_handle() {
        let mut m = manager(2);
        let (old, _) = m.create(&LightDescriptor::default(), Scope::Global);
        m.kill(old);
        let (new, slot) = m.create(&LightDescriptor::default(), Scope::Global);

        assert_eq!(new.index, old.index);
        assert_eq!(slot, Some(0));
        assert_eq!(m.state(old), Err(LightError::StaleHandle(old)));
        m.kill(old);
        assert_eq!(m.state(new), Ok(LightState::Allocated(0)), "stale kill is a no-op");
        assert_consistent(&m);
    }

    #[test]
    fn test_enable_after_disable_reallocates() {
        let mut m = manager(2);
        let (id, _) = m.create(&LightDescriptor::default(), Scope::Global);
        m.disable(id).expect("live");
        assert_eq!(m.device().writes().last(), Some(&DeviceWrite::Enabled { slot: 0, on: false }));

        assert_eq!(m.enable(id), Ok(Some(0)));
        assert_eq!(m.state(id), Ok(LightState::Allocated(0)));
        assert_consistent(&m);
    }

    #[test]
    fn test_enable_switches_on_occupied_off_slot() {
        let mut m = manager(2);
        let (id, slot) = m.create(&off(), Scope::Global);
        assert_eq!(slot, Some(0));
        assert!(!m.slots().slot(0).is_on());
        m.device_mut().take();

        assert_eq!(m.enable(id), Ok(Some(0)));

        assert!(m.slots().slot(0).is_on());
        assert_eq!(m.device().writes(), &[DeviceWrite::Enabled { slot: 0, on: true }]);
        assert_consistent(&m);
    }

    #[test]
    fn test_local_disable_leaves_spatial_index() {
        let mut m = manager(2);
        let local = local_in_slot(&mut m, 0);
        assert!(m.spatial().is_registered(local));

        m.disable(local).expect("live");

        assert!(!m.spatial().is_registered(local));
        assert_eq!(m.state(local), Ok(LightState::Unallocated));
        assert_eq!(m.enable(local), Ok(None), "LOCAL lights wait for relevance");
        assert!(m.spatial().is_registered(local));
        assert_consistent(&m);
    }

    #[test]
    fn test_local_registers_influence_radius() {
        let config = LightingConfig {
            influence_cutoff: 0.25,
            ..LightingConfig::with_max_lights(2)
        };
        let mut m = LightManager::new(config, RecordingDevice::new());
        let light = LightDescriptor {
            position: Vec3::new(3.0, 0.0, 0.0),
            attenuation: Vec3::new(1.0, 0.5, 0.0),
            ..Default::default()
        };
        let (id, _) = m.create(&light, Scope::Local);

        let (position, radius) = m.spatial().entry(id).expect("registered");
        assert_eq!(position, Vec3::new(3.0, 0.0, 0.0));
        assert!((radius - 6.0).abs() < 1e-4, "got {radius}");

        let (hidden, _) = m.create(&off(), Scope::Local);
        assert!(!m.spatial().is_registered(hidden));
    }

    #[test]
    fn test_local_never_evicts_enabled_light() {
        let mut m = manager(1);
        m.create(&LightDescriptor::default(), Scope::Global);
        let (local, _) = m.create(&LightDescriptor::default(), Scope::Local);
        assert_eq!(m.allocate_local(local), Ok(None));
        assert_consistent(&m);
    }
}
