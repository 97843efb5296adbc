//! Day schedule generator.
//!
//! Turns a [`DayPlan`] plus what has been observed so far (actual wake time,
//! nap starts and ends) into blocks covering the day from wake to bedtime:
//! - morning routine right after waking
//! - nap 1, the planned appointments, then nap 2, each preceded by open time
//!   when there is a gap
//! - open time until the bedtime routine
//!
//! Generation is a single forward pass over a time cursor followed by a sort.
//! It never fails: missing or malformed inputs fall back to defaults. It does
//! not prevent overlaps; see [`detect_conflicts`] for reporting them.

mod conflicts;

pub use conflicts::{current_block, detect_conflicts, BlockConflict};

use crate::clock::ClockTime;
use crate::constraints::{self, ConstraintKind};
use crate::day_log::NapDescriptor;
use crate::schedule::{BlockKind, DayPlan, NapSlot, ScheduleBlock};

pub const MORNING_ROUTINE_TITLE: &str = "Wake & Morning Routine";
pub const OPEN_TIME_TITLE: &str = "Open Time";
pub const BEDTIME_ROUTINE_TITLE: &str = "Bedtime Routine";

/// Caregiver label on a nap nobody signed up for.
pub const NAP_FALLBACK_CAREGIVER: &str = "Available";
/// Caregiver label on routines and appointments without an explicit caregiver.
pub const FAMILY_CAREGIVER: &str = "Family";
/// Caregiver label on open time.
pub const OPEN_CAREGIVER: &str = "Anyone";

/// Generator configuration
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// The child's own name; never assigned as a caregiver
    pub child_name: String,
    /// Wake time when neither an actual nor a target wake is known
    pub default_wake: ClockTime,
    /// Length of the morning routine (minutes)
    pub morning_routine: i32,
    /// Length of the bedtime routine (minutes)
    pub bedtime_routine: i32,
    /// Subtracted from the first wake window, which the morning routine overlaps (minutes)
    pub first_window_adjust: i32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            child_name: crate::settings::DEFAULT_CHILD_NAME.to_string(),
            default_wake: ClockTime::from_minutes(7 * 60),
            morning_routine: 30,
            bedtime_routine: 30,
            first_window_adjust: 30,
        }
    }
}

/// Schedule generator for one day
#[derive(Debug, Clone, Default)]
pub struct ScheduleGenerator {
    config: SchedulerConfig,
}

/// Durations resolved from the constraint list, in minutes.
#[derive(Debug, Clone, Copy)]
struct Windows {
    before_nap1: i32,
    nap1: i32,
    between_naps: i32,
    nap2: i32,
}

impl Windows {
    fn resolve(plan: &DayPlan) -> Self {
        let minutes = |kind| {
            i32::try_from(constraints::duration(&plan.constraints, kind)).unwrap_or(i32::MAX)
        };
        Self {
            before_nap1: minutes(ConstraintKind::WakeWindowBeforeNap1),
            nap1: minutes(ConstraintKind::Nap1Duration),
            between_naps: minutes(ConstraintKind::WakeWindowBetweenNaps),
            nap2: minutes(ConstraintKind::Nap2Duration),
        }
    }
}

impl ScheduleGenerator {
    /// Create a generator with default config
    pub fn new() -> Self {
        Self {
            config: SchedulerConfig::default(),
        }
    }

    /// Create with custom config
    pub fn with_config(config: SchedulerConfig) -> Self {
        Self { config }
    }

    /// Generator that excludes `child_name` from caregiver assignment.
    pub fn for_child(child_name: impl Into<String>) -> Self {
        Self::with_config(SchedulerConfig {
            child_name: child_name.into(),
            ..SchedulerConfig::default()
        })
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Generate the blocks for a day, sorted by start time.
    ///
    /// # Arguments
    /// * `plan` - The day's plan; its constraint list drives all durations
    /// * `actual_wake` - Observed wake time, overriding the plan's target
    /// * `nap1`, `nap2` - Whether each nap happens and any observed start/end
    pub fn generate(
        &self,
        plan: &DayPlan,
        actual_wake: Option<ClockTime>,
        nap1: NapDescriptor,
        nap2: NapDescriptor,
    ) -> Vec<ScheduleBlock> {
        let mut blocks = Vec::new();

        // 1. Start of day
        let mut cursor = actual_wake
            .or(plan.wake_target)
            .unwrap_or(self.config.default_wake);

        // 2. Morning routine
        let routine_end = cursor.add_minutes(self.config.morning_routine);
        blocks.push(ScheduleBlock::new(
            cursor,
            routine_end,
            MORNING_ROUTINE_TITLE,
            BlockKind::Routine,
            FAMILY_CAREGIVER,
        ));
        cursor = routine_end;

        // 3. Durations
        let windows = Windows::resolve(plan);

        // 4. Nap 1
        if nap1.enabled {
            cursor = self.place_nap(
                &mut blocks,
                plan,
                cursor,
                NapSlot::Nap1,
                nap1,
                windows.before_nap1.saturating_sub(self.config.first_window_adjust),
                windows.nap1,
            );
        }

        // 5. Appointments, in the order given
        for appt in plan.appointments.iter().filter(|a| a.is_schedulable()) {
            let (Some(start), Some(end)) = (appt.start, appt.resolved_end()) else {
                continue;
            };
            self.fill_gap(&mut blocks, cursor, start);
            let caregiver = appt
                .caregiver
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .unwrap_or(FAMILY_CAREGIVER);
            blocks.push(ScheduleBlock::new(
                start,
                end,
                appt.title.trim(),
                BlockKind::Appointment,
                caregiver,
            ));
            cursor = end;
        }

        // 6. Nap 2
        if nap2.enabled {
            cursor = self.place_nap(
                &mut blocks,
                plan,
                cursor,
                NapSlot::Nap2,
                nap2,
                windows.between_naps,
                windows.nap2,
            );
        }

        // 7. Evening
        let bedtime = constraints::bedtime(&plan.constraints);
        if cursor < bedtime {
            let routine_start = bedtime.add_minutes(-self.config.bedtime_routine);
            self.fill_gap(&mut blocks, cursor, routine_start);
            blocks.push(ScheduleBlock::new(
                routine_start,
                bedtime,
                BEDTIME_ROUTINE_TITLE,
                BlockKind::Routine,
                FAMILY_CAREGIVER,
            ));
        }

        // 8. Order by start; ties keep emission order
        blocks.sort_by_key(|b| b.start);
        blocks
    }

    /// Emit a nap (and any open time before it), returning the new cursor.
    #[allow(clippy::too_many_arguments)]
    fn place_nap(
        &self,
        blocks: &mut Vec<ScheduleBlock>,
        plan: &DayPlan,
        cursor: ClockTime,
        slot: NapSlot,
        observed: NapDescriptor,
        wake_window: i32,
        duration: i32,
    ) -> ClockTime {
        let start = observed.start.unwrap_or_else(|| cursor.add_minutes(wake_window));
        let end = observed.end.unwrap_or_else(|| start.add_minutes(duration));

        self.fill_gap(blocks, cursor, start);

        let caregiver = self
            .pick_caregiver(plan.caregiver_availability.for_nap(slot))
            .unwrap_or(NAP_FALLBACK_CAREGIVER);
        blocks.push(ScheduleBlock::new(start, end, slot.title(), BlockKind::Nap, caregiver));
        end
    }

    /// Open time from `from` to `to`, only when `from` precedes `to`.
    fn fill_gap(&self, blocks: &mut Vec<ScheduleBlock>, from: ClockTime, to: ClockTime) {
        if from < to {
            blocks.push(ScheduleBlock::new(
                from,
                to,
                OPEN_TIME_TITLE,
                BlockKind::Open,
                OPEN_CAREGIVER,
            ));
        }
    }

    /// First available name that is not the child's.
    fn pick_caregiver<'a>(&self, available: &'a [String]) -> Option<&'a str> {
        available
            .iter()
            .map(|name| name.trim())
            .find(|name| !name.is_empty() && !is_child(name, &self.config.child_name))
    }
}

/// Names match case-insensitively, ignoring surrounding whitespace.
pub fn is_child(name: &str, child_name: &str) -> bool {
    name.trim().eq_ignore_ascii_case(child_name.trim())
}

/// Generate with the default configuration.
pub fn generate_schedule(
    plan: &DayPlan,
    actual_wake: Option<ClockTime>,
    nap1: NapDescriptor,
    nap2: NapDescriptor,
) -> Vec<ScheduleBlock> {
    ScheduleGenerator::new().generate(plan, actual_wake, nap1, nap2)
}
