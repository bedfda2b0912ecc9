use std::time::Instant;

use lightslot_core::LightingConfig;
use lightslot_render::{LightDevice, LightManager, SpatialIndex, UniformLightDevice};
use lightslot_world::{grid_light_manager, LightGroup};

use crate::scenes::{generate_scene_lights, SceneConfig};

/// Timing data for the per-frame pass, in microseconds.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimingSeries {
    pub mean_us: f64,
    pub median_us: f64,
    pub p95_us: f64,
    pub p99_us: f64,
    pub min_us: f64,
    pub max_us: f64,
}

/// Result of a single scene benchmark.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BenchmarkResult {
    pub scene_name: String,
    pub slot_count: usize,
    pub local_lights: u32,
    pub global_lights: u32,
    pub frame_count: u32,
    /// Channel and enable writes the device actually received.
    pub device_writes: u64,
    /// Writes a driver that reprograms every channel on each slot change
    /// would have issued for the same allocation sequence.
    pub full_reprogram_writes: u64,
    pub slot_changes: u64,
    pub evictions: u64,
    pub releases: u64,
    pub exhausted: u64,
    pub timings: TimingSeries,
}

impl BenchmarkResult {
    /// Share of full-reprogram writes the slot diff avoided, in percent.
    pub fn savings_pct(&self) -> f64 {
        if self.full_reprogram_writes == 0 {
            return 0.0;
        }
        (1.0 - self.device_writes as f64 / self.full_reprogram_writes as f64) * 100.0
    }
}

/// Runs scenes against the uniform-buffer backend.
pub struct BenchmarkRunner {
    frame_count: u32,
}

impl BenchmarkRunner {
    pub fn new(frame_count: u32) -> Self {
        Self { frame_count }
    }

    /// Fly the camera through a scene and return write counts and timings.
    pub fn run_scene(&self, config: &SceneConfig) -> BenchmarkResult {
        log::info!(
            "Running scene '{}' ({} LOCAL + {} GLOBAL lights, {} slots)...",
            config.name,
            config.local_count(),
            config.global_lights,
            config.max_lights
        );

        let lighting = LightingConfig::with_max_lights(config.max_lights);
        let device = UniformLightDevice::new(config.max_lights);
        let mut manager = grid_light_manager(lighting, device);
        let specs = generate_scene_lights(config);
        let mut group = LightGroup::spawn(&mut manager, &specs);

        let mut tally = WriteTally::new(&manager);
        let mut frame_times = Vec::with_capacity(self.frame_count as usize);
        let (mut evictions, mut releases, mut exhausted) = (0u64, 0u64, 0u64);

        for frame in 0..self.frame_count {
            let t = frame as f32 / self.frame_count.saturating_sub(1).max(1) as f32;
            let camera = config.camera_at(t);

            let frame_start = Instant::now();
            let stats = manager.update_frame(camera);
            frame_times.push(frame_start.elapsed().as_secs_f64() * 1_000_000.0);

            tally.observe(&manager, stats.released);
            evictions += stats.evicted as u64;
            releases += stats.released as u64;
            exhausted += stats.exhausted as u64;
            manager.device_mut().mark_clean();
        }

        if let Err(e) = manager.check_invariants() {
            log::warn!("Scene '{}' ended inconsistent: {e}", config.name);
        }
        let device_writes = manager.device().write_count();
        group.kill_all(&mut manager);

        let timings = compute_timings(&frame_times);
        log::info!(
            "  Done: {} writes vs {} full reprogram, mean={:.1}us, p99={:.1}us",
            device_writes,
            tally.full_writes,
            timings.mean_us,
            timings.p99_us
        );

        BenchmarkResult {
            scene_name: config.name.to_string(),
            slot_count: config.max_lights,
            local_lights: config.local_count(),
            global_lights: config.global_lights,
            frame_count: self.frame_count,
            device_writes,
            full_reprogram_writes: tally.full_writes,
            slot_changes: tally.slot_changes,
            evictions,
            releases,
            exhausted,
            timings,
        }
    }
}

/// Counts what a full reprogram would cost by watching slot occupants
/// change between observations.
struct WriteTally {
    occupants: Vec<Option<u32>>,
    full_writes: u64,
    slot_changes: u64,
}

impl WriteTally {
    fn new<D: LightDevice, S: SpatialIndex>(manager: &LightManager<D, S>) -> Self {
        let mut tally = Self {
            occupants: vec![None; manager.slots().len()],
            full_writes: 0,
            slot_changes: 0,
        };
        // Lights placed at spawn time were programmed too.
        tally.observe(manager, 0);
        tally
    }

    fn observe<D: LightDevice, S: SpatialIndex>(
        &mut self,
        manager: &LightManager<D, S>,
        released: u32,
    ) {
        // Each release switched an ON slot off.
        self.full_writes += released as u64;
        for (slot, entry) in manager.slots().iter().enumerate() {
            let occupant = entry.occupant();
            if occupant == self.occupants[slot] {
                continue;
            }
            self.occupants[slot] = occupant;
            if let Some(light) = entry.programmed() {
                let attenuation = if light.is_attenuated() { 3 } else { 0 };
                let enable = u64::from(light.enabled);
                self.full_writes += 4 + attenuation + enable;
                self.slot_changes += 1;
            }
        }
    }
}

/// Compute timing statistics from a list of frame times in microseconds.
fn compute_timings(times: &[f64]) -> TimingSeries {
    if times.is_empty() {
        return TimingSeries {
            mean_us: 0.0,
            median_us: 0.0,
            p95_us: 0.0,
            p99_us: 0.0,
            min_us: 0.0,
            max_us: 0.0,
        };
    }

    let mut sorted = times.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };
    let p95_idx = ((n as f64) * 0.95).ceil() as usize;
    let p99_idx = ((n as f64) * 0.99).ceil() as usize;

    TimingSeries {
        mean_us: mean,
        median_us: median,
        p95_us: sorted[p95_idx.min(n - 1)],
        p99_us: sorted[p99_idx.min(n - 1)],
        min_us: sorted[0],
        max_us: sorted[n - 1],
    }
}
