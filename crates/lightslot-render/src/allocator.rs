//! Slot selection for incoming lights.
//!
//! Both scans take the first empty slot outright. Past that they keep the
//! *last* matching candidate seen, not the first, which decides the winner
//! when several disabled slots coexist with LOCAL and GLOBAL occupants.

use crate::slot_table::{SlotStatus, SlotTable};

/// Pick a slot for a LOCAL light: the first empty slot, else the last
/// disabled one. LOCAL lights never evict an enabled occupant.
pub fn find_local_clobberable(table: &SlotTable) -> Option<usize> {
    let mut clobber_disabled = None;
    for (i, slot) in table.iter().enumerate() {
        if slot.is_empty() {
            return Some(i);
        }
        if !slot.status().contains(SlotStatus::ON) {
            clobber_disabled = Some(i);
        }
    }
    clobber_disabled
}

/// Pick a slot for a GLOBAL light: the first empty slot, else a disabled
/// slot, else the last LOCAL-occupied slot. Enabled GLOBAL occupants are
/// never chosen, so `None` means every slot holds an enabled GLOBAL light.
///
/// The disabled candidate is only replaced when none is recorded yet or the
/// new disabled slot is also the latest LOCAL one.
pub fn find_global_clobberable(table: &SlotTable) -> Option<usize> {
    let mut clobber_disabled = None;
    let mut clobber_local = None;
    for (i, slot) in table.iter().enumerate() {
        if slot.is_empty() {
            return Some(i);
        }
        let status = slot.status();
        if status.contains(SlotStatus::LOCAL) {
            clobber_local = Some(i);
        }
        if !status.contains(SlotStatus::ON)
            && (clobber_local == Some(i) || clobber_disabled.is_none())
        {
            clobber_disabled = Some(i);
        }
    }
    clobber_disabled.or(clobber_local)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lightslot_core::{LightDescriptor, Scope};

    /// Occupancy of one slot in a test table.
    #[derive(Clone, Copy)]
    enum Fill {
        Empty,
        OnGlobal,
        OnLocal,
        OffGlobal,
        OffLocal,
    }

    use Fill::*;

    fn table(fills: &[Fill]) -> SlotTable {
        let mut table = SlotTable::new(fills.len());
        for (i, fill) in fills.iter().enumerate() {
            let (enabled, scope) = match fill {
                Fill::Empty => continue,
                Fill::OnGlobal => (true, Scope::Global),
                Fill::OnLocal => (true, Scope::Local),
                Fill::OffGlobal => (false, Scope::Global),
                Fill::OffLocal => (false, Scope::Local),
            };
            let light = LightDescriptor {
                enabled,
                ..Default::default()
            };
            table.occupy(i, 100 + i as u32, &light, scope);
        }
        table
    }

    #[test]
    fn test_first_empty_slot_wins() {
        let t = table(&[OnGlobal, Empty, OnGlobal, Empty]);
        assert_eq!(find_global_clobberable(&t), Some(1));
        assert_eq!(find_local_clobberable(&t), Some(1));
    }

    #[test]
    fn test_empty_slot_beats_earlier_disabled() {
        let t = table(&[OffGlobal, OnLocal, Empty]);
        assert_eq!(find_global_clobberable(&t), Some(2));
        assert_eq!(find_local_clobberable(&t), Some(2));
    }

    #[test]
    fn test_global_prefers_disabled_over_active() {
        let t = table(&[OnGlobal, OffGlobal, OnLocal, OnGlobal]);
        assert_eq!(find_global_clobberable(&t), Some(1));
    }

    #[test]
    fn test_global_evicts_local_when_nothing_disabled() {
        let t = table(&[OnGlobal, OnLocal]);
        assert_eq!(find_global_clobberable(&t), Some(1));
    }

    #[test]
    fn test_global_picks_last_local() {
        let t = table(&[OnLocal, OnGlobal, OnLocal, OnGlobal]);
        assert_eq!(find_global_clobberable(&t), Some(2));
    }

    #[test]
    fn test_global_keeps_first_disabled_global() {
        // Later disabled GLOBAL slots do not replace the first one.
        let t = table(&[OnGlobal, OffGlobal, OnGlobal, OffGlobal]);
        assert_eq!(find_global_clobberable(&t), Some(1));
    }

    #[test]
    fn test_global_moves_to_later_disabled_local() {
        // A disabled LOCAL slot replaces an earlier disabled GLOBAL candidate.
        let t = table(&[OffGlobal, OnGlobal, OffLocal, OnGlobal]);
        assert_eq!(find_global_clobberable(&t), Some(2));
    }

    #[test]
    fn test_global_exhausted() {
        let t = table(&[OnGlobal, OnGlobal]);
        assert_eq!(find_global_clobberable(&t), None);
    }

    #[test]
    fn test_local_picks_last_disabled() {
        let t = table(&[OffGlobal, OnLocal, OffLocal, OnGlobal]);
        assert_eq!(find_local_clobberable(&t), Some(2));
    }

    #[test]
    fn test_local_never_evicts_active() {
        let t = table(&[OnGlobal, OnLocal, OnLocal]);
        assert_eq!(find_local_clobberable(&t), None);
    }

    #[test]
    fn test_zero_capacity() {
        let t = SlotTable::new(0);
        assert_eq!(find_global_clobberable(&t), None);
        assert_eq!(find_local_clobberable(&t), None);
    }
}
