use lightslot_core::{LightDescriptor, LightError, LightId, Scope, SlotTarget};

/// One logical light.
#[derive(Debug, Clone)]
pub struct LightRecord {
    pub light: LightDescriptor,
    pub scope: Scope,
    /// Slot back-reference; mirrored by the slot table's occupant.
    pub target: SlotTarget,
    generation: u32,
}

impl LightRecord {
    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn is_destroyed(&self) -> bool {
        self.target.is_destroyed()
    }
}

/// Arena of logical lights addressed by stable index.
///
/// Records never move, so hardware slots can hold a bare index. Killed
/// records are recycled; the generation bump invalidates old handles.
#[derive(Debug, Default)]
pub struct LightRegistry {
    records: Vec<LightRecord>,
    /// Stack of destroyed record indices.
    free: Vec<u32>,
    /// Live GLOBAL lights in creation order.
    global_order: Vec<u32>,
}

impl LightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new light, reusing the most recently killed record if any.
    pub fn insert(&mut self, light: LightDescriptor, scope: Scope) -> LightId {
        let index = match self.free.pop() {
            Some(index) => {
                let record = &mut self.records[index as usize];
                record.generation = record.generation.wrapping_add(1);
                record.light = light;
                record.scope = scope;
                record.target = SlotTarget::Unassigned;
                index
            }
            None => {
                self.records.push(LightRecord {
                    light,
                    scope,
                    target: SlotTarget::Unassigned,
                    generation: 0,
                });
                (self.records.len() - 1) as u32
            }
        };
        if scope == Scope::Global {
            self.global_order.push(index);
        }
        LightId::new(index, self.records[index as usize].generation)
    }

    /// Record for `id`, destroyed or not. Fails only for recycled handles.
    pub fn get(&self, id: LightId) -> Result<&LightRecord, LightError> {
        match self.records.get(id.index as usize) {
            Some(record) if record.generation == id.generation => Ok(record),
            _ => Err(LightError::StaleHandle(id)),
        }
    }

    /// Record for `id`, rejecting killed lights.
    pub fn live(&self, id: LightId) -> Result<&LightRecord, LightError> {
        let record = self.get(id)?;
        if record.is_destroyed() {
            return Err(LightError::Destroyed(id));
        }
        Ok(record)
    }

    pub fn live_mut(&mut self, id: LightId) -> Result<&mut LightRecord, LightError> {
        self.live(id)?;
        Ok(&mut self.records[id.index as usize])
    }

    /// Record at a slot back-reference. Panics on an index never handed out.
    pub fn by_index(&self, index: u32) -> &LightRecord {
        &self.records[index as usize]
    }

    pub fn by_index_mut(&mut self, index: u32) -> &mut LightRecord {
        &mut self.records[index as usize]
    }

    /// Current handle for a record index.
    pub fn id_of(&self, index: u32) -> LightId {
        LightId::new(index, self.records[index as usize].generation)
    }

    /// Mark a record destroyed, clear its properties and queue it for reuse.
    /// The caller must already have released its slot.
    pub fn destroy(&mut self, index: u32) {
        let record = &mut self.records[index as usize];
        debug_assert!(
            record.target.slot().is_none(),
            "destroying light {index} that still holds a slot"
        );
        if record.is_destroyed() {
            return;
        }
        record.target = SlotTarget::Destroyed;
        record.light = LightDescriptor {
            enabled: false,
            ..Default::default()
        };
        if record.scope == Scope::Global {
            self.global_order.retain(|&i| i != index);
        }
        self.free.push(index);
    }

    /// Live GLOBAL lights in creation order.
    pub fn global_order(&self) -> &[u32] {
        &self.global_order
    }

    /// All records with their indices, destroyed ones included.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &LightRecord)> {
        self.records
            .iter()
            .enumerate()
            .map(|(i, record)| (i as u32, record))
    }

    /// Number of records that are not destroyed.
    pub fn live_count(&self) -> usize {
        self.records.len() - self.free.len()
    }
}
