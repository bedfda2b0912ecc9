use glam::{Vec3, Vec4};
use lightslot_core::{LightDescriptor, LightSpec};

/// Configuration for a single benchmark scene.
pub struct SceneConfig {
    pub name: &'static str,
    /// Hardware slots the device exposes.
    pub max_lights: usize,
    /// LOCAL lights laid out on a lattice, `local_grid` per axis.
    pub local_grid: [u32; 3],
    /// Distance between neighbouring LOCAL lights.
    pub spacing: f32,
    pub global_lights: u32,
    pub camera_start: [f32; 3],
    pub camera_end: [f32; 3],
}

impl SceneConfig {
    pub fn local_count(&self) -> u32 {
        self.local_grid.iter().product()
    }

    /// Camera position `t` of the way along the fly-through, `t` in [0, 1].
    pub fn camera_at(&self, t: f32) -> Vec3 {
        Vec3::from(self.camera_start).lerp(Vec3::from(self.camera_end), t.clamp(0.0, 1.0))
    }
}

/// Return the standard suite of benchmark scenes, from a sparse corridor
/// to a field far denser than the slot count.
pub fn standard_scenes() -> Vec<SceneConfig> {
    vec![
        SceneConfig {
            name: "corridor",
            max_lights: 8,
            local_grid: [64, 1, 1],
            spacing: 20.0,
            global_lights: 1,
            camera_start: [-50.0, 0.0, 0.0],
            camera_end: [1330.0, 0.0, 0.0],
        },
        SceneConfig {
            name: "field",
            max_lights: 8,
            local_grid: [16, 4, 16],
            spacing: 25.0,
            global_lights: 2,
            camera_start: [0.0, 40.0, 0.0],
            camera_end: [375.0, 40.0, 375.0],
        },
        SceneConfig {
            name: "crowded",
            max_lights: 8,
            local_grid: [8, 8, 8],
            spacing: 6.0,
            global_lights: 4,
            camera_start: [0.0, 0.0, 0.0],
            camera_end: [42.0, 42.0, 42.0],
        },
        SceneConfig {
            name: "starved",
            max_lights: 4,
            local_grid: [32, 1, 32],
            spacing: 15.0,
            global_lights: 4,
            camera_start: [0.0, 0.0, 0.0],
            camera_end: [465.0, 0.0, 465.0],
        },
    ]
}

/// Deterministic light list for a scene: GLOBAL lights first, then the
/// LOCAL lattice. Colors come from a small palette so neighbouring lights
/// often share channels, which is what the slot diff relies on.
pub fn generate_scene_lights(config: &SceneConfig) -> Vec<LightSpec> {
    const PALETTE: [[f32; 4]; 4] = [
        [1.0, 0.9, 0.7, 1.0],
        [1.0, 0.5, 0.2, 1.0],
        [0.6, 0.7, 1.0, 1.0],
        [1.0, 1.0, 1.0, 1.0],
    ];

    let mut specs = Vec::with_capacity((config.global_lights + config.local_count()) as usize);

    for i in 0..config.global_lights {
        let angle = i as f32 * std::f32::consts::TAU / config.global_lights.max(1) as f32;
        specs.push(LightSpec {
            light: LightDescriptor {
                position: Vec3::new(angle.cos(), 1.0, angle.sin()).normalize(),
                diffuse: Vec4::from(PALETTE[i as usize % PALETTE.len()]),
                ..Default::default()
            },
            islocal: false,
        });
    }

    let [nx, ny, nz] = config.local_grid;
    for x in 0..nx {
        for y in 0..ny {
            for z in 0..nz {
                let index = (x * ny + y) * nz + z;
                let hash = (index as usize).wrapping_mul(31337) % 100;
                let diffuse = Vec4::from(PALETTE[hash % PALETTE.len()]);
                // Falloff reaching the cutoff at roughly 1.5 lattice spacings.
                let linear = 255.0 / (1.5 * config.spacing);
                specs.push(LightSpec {
                    light: LightDescriptor {
                        position: Vec3::new(x as f32, y as f32, z as f32) * config.spacing,
                        diffuse,
                        specular: if hash < 70 { Vec4::ONE } else { diffuse },
                        attenuation: Vec3::new(1.0, linear, 0.0),
                        ..Default::default()
                    },
                    islocal: true,
                });
            }
        }
    }

    specs
}
