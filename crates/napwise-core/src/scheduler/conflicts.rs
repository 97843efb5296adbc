//! Post-generation checks over a block list.
//!
//! The generator places appointments and observed naps where they fall, so a
//! long nap can run into the next appointment. These helpers let callers warn
//! about that and find the block in progress without changing the schedule.

use serde::{Deserialize, Serialize};

use crate::clock::ClockTime;
use crate::schedule::{BlockKind, ScheduleBlock};

/// Two blocks whose intervals overlap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockConflict {
    pub first: ScheduleBlock,
    pub second: ScheduleBlock,
    pub overlap_minutes: i32,
}

fn overlap(a: &ScheduleBlock, b: &ScheduleBlock) -> i32 {
    let start = a.start.max(b.start);
    let end = a.end.min(b.end);
    start.minutes_until(end)
}

/// Every pair of blocks that share at least one minute, in list order.
pub fn detect_conflicts(blocks: &[ScheduleBlock]) -> Vec<BlockConflict> {
    let mut conflicts = Vec::new();
    for (i, a) in blocks.iter().enumerate() {
        for b in &blocks[i + 1..] {
            let minutes = overlap(a, b);
            if minutes > 0 {
                conflicts.push(BlockConflict {
                    first: a.clone(),
                    second: b.clone(),
                    overlap_minutes: minutes,
                });
            }
        }
    }
    conflicts
}

/// The block in progress at `now`.
///
/// When blocks overlap, a scheduled block wins over open time.
pub fn current_block(blocks: &[ScheduleBlock], now: ClockTime) -> Option<&ScheduleBlock> {
    let mut active = blocks.iter().filter(|b| b.contains(now));
    let first = active.next()?;
    if first.kind != BlockKind::Open {
        return Some(first);
    }
    active.find(|b| b.kind != BlockKind::Open).or(Some(first))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> ClockTime {
        s.parse().unwrap()
    }

    fn block(start: &str, end: &str, kind: BlockKind) -> ScheduleBlock {
        ScheduleBlock::new(t(start), t(end), "b", kind, "x")
    }

    #[test]
    fn adjacent_blocks_do_not_conflict() {
        let blocks = vec![
            block("07:00", "07:30", BlockKind::Routine),
            block("07:30", "09:00", BlockKind::Open),
        ];
        assert!(detect_conflicts(&blocks).is_empty());
    }

    #[test]
    fn reports_overlap_length() {
        let blocks = vec![
            block("09:30", "11:00", BlockKind::Nap),
            block("10:30", "11:30", BlockKind::Appointment),
        ];
        let conflicts = detect_conflicts(&blocks);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].overlap_minutes, 30);
        assert_eq!(conflicts[0].first.kind, BlockKind::Nap);
    }

    #[test]
    fn current_block_prefers_scheduled_over_open() {
        let blocks = vec![
            block("09:00", "18:30", BlockKind::Open),
            block("09:30", "11:00", BlockKind::Nap),
        ];
        assert_eq!(current_block(&blocks, t("10:00")).unwrap().kind, BlockKind::Nap);
        assert_eq!(current_block(&blocks, t("12:00")).unwrap().kind, BlockKind::Open);
        assert!(current_block(&blocks, t("19:00")).is_none());
    }
}
