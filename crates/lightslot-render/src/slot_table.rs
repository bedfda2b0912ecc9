use lightslot_core::{LightDescriptor, Scope};

bitflags::bitflags! {
    /// Device-side status of a hardware slot.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct SlotStatus: u8 {
        /// The device currently has this slot enabled.
        const ON = 1 << 0;
        /// The occupant is a LOCAL light.
        const LOCAL = 1 << 1;
    }
}

impl SlotStatus {
    /// Status bits for a light about to be programmed into a slot.
    pub fn for_light(light: &LightDescriptor, scope: Scope) -> Self {
        let mut status = SlotStatus::empty();
        status.set(SlotStatus::ON, light.enabled);
        status.set(SlotStatus::LOCAL, scope.is_local());
        status
    }
}

/// One device light channel.
#[derive(Debug, Clone, Copy, Default)]
pub struct HardwareSlot {
    /// Registry index of the light programmed here. Never dereferenced when None.
    occupant: Option<u32>,
    status: SlotStatus,
    /// Channel values as last written to the device. Meaningful only while occupied.
    programmed: LightDescriptor,
}

impl HardwareSlot {
    pub fn occupant(&self) -> Option<u32> {
        self.occupant
    }

    pub fn status(&self) -> SlotStatus {
        self.status
    }

    pub fn is_empty(&self) -> bool {
        self.occupant.is_none()
    }

    pub fn is_on(&self) -> bool {
        self.status.contains(SlotStatus::ON)
    }

    pub fn is_local(&self) -> bool {
        self.status.contains(SlotStatus::LOCAL)
    }

    /// Last programmed values, if the slot is occupied.
    pub fn programmed(&self) -> Option<&LightDescriptor> {
        self.occupant.map(|_| &self.programmed)
    }
}

/// Fixed array of hardware slots, one per device light.
///
/// Only bookkeeping lives here; device writes happen in `program`.
#[derive(Debug, Clone)]
pub struct SlotTable {
    slots: Vec<HardwareSlot>,
}

impl SlotTable {
    /// Create `capacity` empty slots.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![HardwareSlot::default(); capacity],
        }
    }

    /// Number of slots (the device capacity N).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, slot: usize) -> Option<&HardwareSlot> {
        self.slots.get(slot)
    }

    /// Slot `slot`. Panics if out of range.
    pub fn slot(&self, slot: usize) -> &HardwareSlot {
        &self.slots[slot]
    }

    /// Occupant of slot `slot`. Panics if out of range.
    pub fn occupant(&self, slot: usize) -> Option<u32> {
        self.slots[slot].occupant
    }

    /// Status of slot `slot`. Panics if out of range.
    pub fn status(&self, slot: usize) -> SlotStatus {
        self.slots[slot].status
    }

    pub fn iter(&self) -> impl Iterator<Item = &HardwareSlot> {
        self.slots.iter()
    }

    /// Number of occupied slots.
    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|s| !s.is_empty()).count()
    }

    /// Record that `light` (registry index `occupant`) is now programmed into `slot`.
    /// Returns the previous occupant.
    pub fn occupy(
        &mut self,
        slot: usize,
        occupant: u32,
        light: &LightDescriptor,
        scope: Scope,
    ) -> Option<u32> {
        let entry = &mut self.slots[slot];
        let previous = entry.occupant.replace(occupant);
        entry.status = SlotStatus::for_light(light, scope);
        entry.programmed = *light;
        previous
    }

    /// Mark `slot` empty. Returns the previous occupant.
    pub fn vacate(&mut self, slot: usize) -> Option<u32> {
        let entry = &mut self.slots[slot];
        entry.status = SlotStatus::empty();
        entry.programmed = LightDescriptor::default();
        entry.occupant.take()
    }

    /// Flip the ON bit of an occupied slot.
    pub fn set_on(&mut self, slot: usize, on: bool) {
        let entry = &mut self.slots[slot];
        debug_assert!(entry.occupant.is_some(), "set_on on empty slot {slot}");
        entry.status.set(SlotStatus::ON, on);
    }

    /// Mutable access to the last programmed values, for single-channel updates.
    pub(crate) fn programmed_mut(&mut self, slot: usize) -> &mut LightDescriptor {
        &mut self.slots[slot].programmed
    }
}
