use glam::Vec4;
use lightslot_core::{AttenuationTerm, ColorChannel};

/// Channel-write primitives of a graphics device's fixed light slots.
///
/// Writes are trusted to succeed; the multiplexer never retries them.
pub trait LightDevice {
    /// Switch a hardware light on or off.
    fn set_enabled(&mut self, slot: usize, on: bool);

    /// Position (w = 1) or direction (w = 0) of a hardware light.
    fn set_position(&mut self, slot: usize, position: Vec4);

    fn set_color(&mut self, slot: usize, channel: ColorChannel, rgba: Vec4);

    fn set_attenuation(&mut self, slot: usize, term: AttenuationTerm, value: f32);
}

/// A single device call, as captured by `RecordingDevice`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeviceWrite {
    Enabled {
        slot: usize,
        on: bool,
    },
    Position {
        slot: usize,
        value: Vec4,
    },
    Color {
        slot: usize,
        channel: ColorChannel,
        value: Vec4,
    },
    Attenuation {
        slot: usize,
        term: AttenuationTerm,
        value: f32,
    },
}

impl DeviceWrite {
    pub fn slot(&self) -> usize {
        match *self {
            DeviceWrite::Enabled { slot, .. }
            | DeviceWrite::Position { slot, .. }
            | DeviceWrite::Color { slot, .. }
            | DeviceWrite::Attenuation { slot, .. } => slot,
        }
    }
}

/// Device backend that records every call instead of touching hardware.
#[derive(Debug, Default)]
pub struct RecordingDevice {
    writes: Vec<DeviceWrite>,
    total: u64,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes recorded since the last `take`.
    pub fn writes(&self) -> &[DeviceWrite] {
        &self.writes
    }

    /// Drain the recorded writes.
    pub fn take(&mut self) -> Vec<DeviceWrite> {
        std::mem::take(&mut self.writes)
    }

    /// Writes recorded since creation, including drained ones.
    pub fn write_count(&self) -> u64 {
        self.total
    }

    fn push(&mut self, write: DeviceWrite) {
        self.total += 1;
        self.writes.push(write);
    }
}

impl LightDevice for RecordingDevice {
    fn set_enabled(&mut self, slot: usize, on: bool) {
        self.push(DeviceWrite::Enabled { slot, on });
    }

    fn set_position(&mut self, slot: usize, value: Vec4) {
        self.push(DeviceWrite::Position { slot, value });
    }

    fn set_color(&mut self, slot: usize, channel: ColorChannel, value: Vec4) {
        self.push(DeviceWrite::Color {
            slot,
            channel,
            value,
        });
    }

    fn set_attenuation(&mut self, slot: usize, term: AttenuationTerm, value: f32) {
        self.push(DeviceWrite::Attenuation { slot, term, value });
    }
}
