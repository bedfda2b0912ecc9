pub mod allocator;
pub mod device;
pub mod frame;
pub mod manager;
pub mod program;
pub mod registry;
pub mod slot_table;
pub mod spatial;
pub mod uniform;

pub use device::{DeviceWrite, LightDevice, RecordingDevice};
pub use frame::FrameStats;
pub use manager::{LightManager, LightProperty, LightState};
pub use registry::{LightRecord, LightRegistry};
pub use slot_table::{HardwareSlot, SlotStatus, SlotTable};
pub use spatial::{RelevanceList, SpatialIndex};
pub use uniform::{GpuLightSlot, UniformLightDevice};
