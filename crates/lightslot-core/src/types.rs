use std::fmt;

/// Generation-checked handle to a logical light.
///
/// `index` addresses the registry record and is the only thing a hardware
/// slot stores. `generation` is bumped whenever a killed record is reused,
/// so a handle kept past `kill` can never alias a newer light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LightId {
    pub index: u32,
    pub generation: u32,
}

impl LightId {
    pub fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }
}

impl fmt::Display for LightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "light#{}v{}", self.index, self.generation)
    }
}

/// Which hardware slot a logical light occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotTarget {
    /// Never allocated, evicted, released by the visibility pass, or disabled.
    #[default]
    Unassigned,
    /// Programmed into the hardware slot at this index.
    Slot(usize),
    /// Killed. The record may be recycled by a later create.
    Destroyed,
}

impl SlotTarget {
    /// Slot index if assigned.
    pub fn slot(self) -> Option<usize> {
        match self {
            SlotTarget::Slot(i) => Some(i),
            _ => None,
        }
    }

    pub fn is_destroyed(self) -> bool {
        self == SlotTarget::Destroyed
    }
}

/// Slot eligibility of a light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scope {
    /// Always a slot candidate whenever capacity allows.
    #[default]
    Global,
    /// A slot candidate only while the spatial index reports it near the camera.
    Local,
}

impl Scope {
    pub fn from_global(global: bool) -> Self {
        if global {
            Scope::Global
        } else {
            Scope::Local
        }
    }

    pub fn is_local(self) -> bool {
        self == Scope::Local
    }
}

/// One of the three 4-component color channels of a hardware light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorChannel {
    Diffuse,
    Specular,
    Ambient,
}

/// One of the three attenuation coefficients of a hardware light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttenuationTerm {
    Constant,
    Linear,
    Quadratic,
}

/// All attenuation terms in device write order.
pub const ATTENUATION_TERMS: [AttenuationTerm; 3] = [
    AttenuationTerm::Constant,
    AttenuationTerm::Linear,
    AttenuationTerm::Quadratic,
];

impl AttenuationTerm {
    /// Component index into a (constant, linear, quadratic) vector.
    pub fn index(self) -> usize {
        self as usize
    }
}
