use bytemuck::Zeroable;
use glam::Vec4;
use lightslot_core::{AttenuationTerm, ColorChannel};

use crate::device::LightDevice;

/// One hardware light as laid out in a uniform buffer (80 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuLightSlot {
    pub position: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    pub ambient: [f32; 4],
    /// (constant, linear, quadratic)
    pub attenuation: [f32; 3],
    /// 1 when the slot is switched on.
    pub enabled: u32,
}

impl Default for GpuLightSlot {
    fn default() -> Self {
        Self {
            attenuation: [1.0, 0.0, 0.0],
            ..Self::zeroed()
        }
    }
}

/// Device backend for shader-based renderers: the "hardware" slots are an
/// array uploaded as a uniform buffer whenever a write dirtied it.
pub struct UniformLightDevice {
    slots: Vec<GpuLightSlot>,
    dirty: bool,
    writes: u64,
}

impl UniformLightDevice {
    /// Create `capacity` switched-off slots.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![GpuLightSlot::default(); capacity],
            dirty: true,
            writes: 0,
        }
    }

    pub fn slots(&self) -> &[GpuLightSlot] {
        &self.slots
    }

    /// Bytes to upload, one `GpuLightSlot` per hardware slot.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.slots)
    }

    /// Whether any write happened since the last `mark_clean`.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Call after uploading `as_bytes`.
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Channel writes received since creation.
    pub fn write_count(&self) -> u64 {
        self.writes
    }

    fn slot_mut(&mut self, slot: usize) -> &mut GpuLightSlot {
        self.dirty = true;
        self.writes += 1;
        &mut self.slots[slot]
    }
}

impl LightDevice for UniformLightDevice {
    fn set_enabled(&mut self, slot: usize, on: bool) {
        self.slot_mut(slot).enabled = on as u32;
    }

    fn set_position(&mut self, slot: usize, position: Vec4) {
        self.slot_mut(slot).position = position.to_array();
    }

    fn set_color(&mut self, slot: usize, channel: ColorChannel, rgba: Vec4) {
        let entry = self.slot_mut(slot);
        let target = match channel {
            ColorChannel::Diffuse => &mut entry.diffuse,
            ColorChannel::Specular => &mut entry.specular,
            ColorChannel::Ambient => &mut entry.ambient,
        };
        *target = rgba.to_array();
    }

    fn set_attenuation(&mut self, slot: usize, term: AttenuationTerm, value: f32) {
        self.slot_mut(slot).attenuation[term.index()] = value;
    }
}
