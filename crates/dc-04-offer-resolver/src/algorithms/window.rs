//! Window arithmetic for cross-definition paging.
//!
//! Definitions are laid end to end: definition `i` owns global positions
//! `[running_total, running_total + available)`. A request window `[from,
//! to)` overlaps some of them; this module works out which local slice of a
//! definition falls inside the window without touching its assets.

use crate::domain::OfferRange;

/// Local slice of one definition's matching assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slice {
    pub offset: u64,
    pub limit: u64,
}

/// The slice of a definition with `available` assets starting at global
/// position `running_total`, given `collected` results so far. `None` when
/// the definition ends at or before the window start, or has nothing left
/// to contribute.
pub fn plan_slice(
    range: &OfferRange,
    running_total: u64,
    available: u64,
    collected: u64,
) -> Option<Slice> {
    if running_total.saturating_add(available) <= range.from() {
        return None;
    }
    let offset = range.from().saturating_sub(running_total);
    let limit = (available - offset).min(range.size().saturating_sub(collected));
    if limit == 0 {
        return None;
    }
    Some(Slice { offset, limit })
}
