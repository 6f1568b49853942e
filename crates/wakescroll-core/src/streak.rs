//! Consecutive-day streak computation.
//!
//! One shared definition used by the XP ledger, the journal, and the timer
//! log. A streak is the length of the run of consecutive present days ending
//! exactly at the anchor day; if the anchor day itself is absent the streak
//! is 0, regardless of how long the run ending the day before was. The
//! incremental bump in [`crate::XpLedger::add`] is the only thing that may
//! briefly report a run ending yesterday, and the validator re-anchors it.

use std::collections::HashSet;

use crate::day::DayKey;

/// Length of the consecutive run of present days ending at `anchor`.
///
/// Returns 0 when `anchor` itself is not present.
pub fn run_ending_at(present: &HashSet<DayKey>, anchor: DayKey) -> u32 {
    let mut run = 0u32;
    let mut cursor = anchor;
    while present.contains(&cursor) {
        run += 1;
        let prev = cursor.pred();
        if prev == cursor {
            break; // saturated at the representable minimum
        }
        cursor = prev;
    }
    run
}

/// Collect the distinct days of an iterator of dated records.
pub fn present_days<I>(days: I) -> HashSet<DayKey>
where
    I: IntoIterator<Item = DayKey>,
{
    days.into_iter().collect()
}
