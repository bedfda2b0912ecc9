use glam::Vec3;
use lightslot_core::LightId;

/// Proximity index consulted for LOCAL lights.
///
/// The manager registers LOCAL lights while they are enabled and asks once
/// per frame which of them matter near the camera.
pub trait SpatialIndex {
    /// Register or move a light's sphere of influence.
    fn insert(&mut self, id: LightId, position: Vec3, radius: f32);

    /// Forget a light. Unknown ids are ignored.
    fn remove(&mut self, id: LightId);

    /// Append the registered lights relevant at `camera` to `out`, most
    /// important first. Ids must be unique.
    fn relevant(&self, camera: Vec3, out: &mut Vec<LightId>);
}

/// Index whose relevance is decided by the caller: only lights named in
/// the last `set_relevant` that are also registered are reported.
#[derive(Debug, Default)]
pub struct RelevanceList {
    registered: Vec<(LightId, Vec3, f32)>,
    relevant: Vec<LightId>,
}

impl RelevanceList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the relevant set, in report order.
    pub fn set_relevant(&mut self, ids: &[LightId]) {
        self.relevant.clear();
        self.relevant.extend_from_slice(ids);
    }

    pub fn is_registered(&self, id: LightId) -> bool {
        self.registered.iter().any(|(r, _, _)| *r == id)
    }

    /// Registered position and radius of `id`.
    pub fn entry(&self, id: LightId) -> Option<(Vec3, f32)> {
        self.registered
            .iter()
            .find(|(r, _, _)| *r == id)
            .map(|&(_, position, radius)| (position, radius))
    }

    pub fn registered_count(&self) -> usize {
        self.registered.len()
    }
}

impl SpatialIndex for RelevanceList {
    fn insert(&mut self, id: LightId, position: Vec3, radius: f32) {
        match self.registered.iter_mut().find(|(r, _, _)| *r == id) {
            Some(entry) => *entry = (id, position, radius),
            None => self.registered.push((id, position, radius)),
        }
    }

    fn remove(&mut self, id: LightId) {
        self.registered.retain(|(r, _, _)| *r != id);
    }

    fn relevant(&self, _camera: Vec3, out: &mut Vec<LightId>) {
        out.extend(
            self.relevant
                .iter()
                .copied()
                .filter(|id| self.is_registered(*id)),
        );
    }
}
