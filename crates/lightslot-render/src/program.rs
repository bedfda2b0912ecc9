//! Writing logical lights into hardware slots.
//!
//! Most drivers dirty a light's whole state on any change, and lights that
//! share a slot over time rarely differ in more than a channel or two, so a
//! clobber only writes the channels that differ from what the slot holds.

use lightslot_core::{ColorChannel, LightDescriptor, Scope, ATTENUATION_TERMS};

use crate::device::LightDevice;
use crate::slot_table::SlotTable;

const COLOR_CHANNELS: [ColorChannel; 3] = [
    ColorChannel::Diffuse,
    ColorChannel::Specular,
    ColorChannel::Ambient,
];

/// Program `light` (registry index `occupant`) into `slot` and record it in
/// the table. Returns the evicted occupant, if any.
///
/// An empty slot gets every channel. An occupied slot only gets the
/// channels that differ from its last programmed values.
pub fn program_slot<D: LightDevice + ?Sized>(
    device: &mut D,
    table: &mut SlotTable,
    slot: usize,
    occupant: u32,
    light: &LightDescriptor,
    scope: Scope,
) -> Option<u32> {
    let current = *table.slot(slot);
    match current.programmed() {
        None => write_all(device, slot, light),
        Some(previous) => write_diff(device, slot, previous, light),
    }
    if current.is_on() != light.enabled {
        device.set_enabled(slot, light.enabled);
    }
    table.occupy(slot, occupant, light, scope)
}

/// Unconditional write of every channel.
fn write_all<D: LightDevice + ?Sized>(device: &mut D, slot: usize, light: &LightDescriptor) {
    if light.is_attenuated() {
        write_attenuation(device, slot, light);
    }
    device.set_position(slot, light.homogeneous_position());
    for channel in COLOR_CHANNELS {
        device.set_color(slot, channel, light.color(channel));
    }
}

/// Write only what differs between `previous` and `light`.
fn write_diff<D: LightDevice + ?Sized>(
    device: &mut D,
    slot: usize,
    previous: &LightDescriptor,
    light: &LightDescriptor,
) {
    // Unattenuated lights are directional; the device ignores their coefficients.
    if light.is_attenuated() {
        if previous.is_attenuated() {
            for term in ATTENUATION_TERMS {
                let value = light.attenuation[term.index()];
                if value != previous.attenuation[term.index()] {
                    device.set_attenuation(slot, term, value);
                }
            }
        } else {
            write_attenuation(device, slot, light);
        }
    }
    // w follows the attenuation flag, so compare the combined vector.
    if light.homogeneous_position() != previous.homogeneous_position() {
        device.set_position(slot, light.homogeneous_position());
    }
    for channel in COLOR_CHANNELS {
        let rgba = light.color(channel);
        if rgba != previous.color(channel) {
            device.set_color(slot, channel, rgba);
        }
    }
}

fn write_attenuation<D: LightDevice + ?Sized>(
    device: &mut D,
    slot: usize,
    light: &LightDescriptor,
) {
    for term in ATTENUATION_TERMS {
        device.set_attenuation(slot, term, light.attenuation[term.index()]);
    }
}

/// Rewrite one color channel of an occupied slot.
pub fn reprogram_color<D: LightDevice + ?Sized>(
    device: &mut D,
    table: &mut SlotTable,
    slot: usize,
    light: &LightDescriptor,
    channel: ColorChannel,
) {
    let rgba = light.color(channel);
    device.set_color(slot, channel, rgba);
    table.programmed_mut(slot).set_color(channel, rgba);
}

/// Rewrite the position of an occupied slot.
pub fn reprogram_position<D: LightDevice + ?Sized>(
    device: &mut D,
    table: &mut SlotTable,
    slot: usize,
    light: &LightDescriptor,
) {
    device.set_position(slot, light.homogeneous_position());
    table.programmed_mut(slot).position = light.position;
}

/// Rewrite attenuation of an occupied slot. The position goes out first
/// because its w depends on whether the light is attenuated.
pub fn reprogram_attenuation<D: LightDevice + ?Sized>(
    device: &mut D,
    table: &mut SlotTable,
    slot: usize,
    light: &LightDescriptor,
) {
    device.set_position(slot, light.homogeneous_position());
    write_attenuation(device, slot, light);
    let programmed = table.programmed_mut(slot);
    programmed.position = light.position;
    programmed.attenuation = light.attenuation;
}
