use glam::{IVec3, Vec3};
use lightslot_core::constants::DEFAULT_GRID_CELL_SIZE;
use lightslot_core::LightId;
use lightslot_render::SpatialIndex;
use std::collections::HashMap;

/// Lights whose sphere spans more cells than this along any axis are kept
/// in a flat list instead of being stamped into every cell.
const MAX_CELLS_PER_AXIS: i32 = 4;

#[derive(Debug, Clone, Copy)]
struct GridEntry {
    position: Vec3,
    radius: f32,
    /// Inclusive cell range the sphere was stamped into. None when oversized.
    cells: Option<(IVec3, IVec3)>,
}

/// Uniform hash grid of LOCAL lights.
///
/// Each light is registered in every cell its sphere of influence overlaps,
/// so a query only has to look at the camera's cell. A light is relevant
/// when the camera lies inside its sphere; results come nearest first.
pub struct LightGrid {
    cell_size: f32,
    cells: HashMap<IVec3, Vec<LightId>>,
    entries: HashMap<LightId, GridEntry>,
    oversized: Vec<LightId>,
}

impl Default for LightGrid {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_CELL_SIZE)
    }
}

impl LightGrid {
    pub fn new(cell_size: f32) -> Self {
        debug_assert!(cell_size > 0.0, "grid cell size must be positive");
        Self {
            cell_size,
            cells: HashMap::new(),
            entries: HashMap::new(),
            oversized: Vec::new(),
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Cell containing a world position.
    pub fn cell_of(&self, position: Vec3) -> IVec3 {
        (position / self.cell_size).floor().as_ivec3()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: LightId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Number of non-empty cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Lights registered in `cell`, oversized ones excluded.
    pub fn lights_in_cell(&self, cell: IVec3) -> &[LightId] {
        self.cells.get(&cell).map(Vec::as_slice).unwrap_or(&[])
    }

    fn unstamp(&mut self, id: LightId, entry: &GridEntry) {
        let Some((min, max)) = entry.cells else {
            self.oversized.retain(|&o| o != id);
            return;
        };
        for x in min.x..=max.x {
            for y in min.y..=max.y {
                for z in min.z..=max.z {
                    let cell = IVec3::new(x, y, z);
                    if let Some(ids) = self.cells.get_mut(&cell) {
                        ids.retain(|&o| o != id);
                        if ids.is_empty() {
                            self.cells.remove(&cell);
                        }
                    }
                }
            }
        }
    }
}

impl SpatialIndex for LightGrid {
    fn insert(&mut self, id: LightId, position: Vec3, radius: f32) {
        self.remove(id);

        let radius = radius.max(0.0);
        let min = self.cell_of(position - Vec3::splat(radius));
        let max = self.cell_of(position + Vec3::splat(radius));
        let span = max - min + IVec3::ONE;
        let cells = if span.max_element() > MAX_CELLS_PER_AXIS {
            log::debug!("{id} radius {radius} spans {span} cells, kept oversized");
            self.oversized.push(id);
            None
        } else {
            for x in min.x..=max.x {
                for y in min.y..=max.y {
                    for z in min.z..=max.z {
                        self.cells.entry(IVec3::new(x, y, z)).or_default().push(id);
                    }
                }
            }
            Some((min, max))
        };
        self.entries.insert(
            id,
            GridEntry {
                position,
                radius,
                cells,
            },
        );
    }

    fn remove(&mut self, id: LightId) {
        if let Some(entry) = self.entries.remove(&id) {
            self.unstamp(id, &entry);
        }
    }

    fn relevant(&self, camera: Vec3, out: &mut Vec<LightId>) {
        let start = out.len();
        let candidates = self
            .lights_in_cell(self.cell_of(camera))
            .iter()
            .chain(self.oversized.iter());
        for &id in candidates {
            if let Some(entry) = self.entries.get(&id) {
                if entry.position.distance_squared(camera) <= entry.radius * entry.radius {
                    out.push(id);
                }
            }
        }
        out[start..].sort_by(|a, b| {
            let da = self.entries[a].position.distance_squared(camera);
            let db = self.entries[b].position.distance_squared(camera);
            da.total_cmp(&db).then(a.cmp(b))
        });
    }
}
