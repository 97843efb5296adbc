//! Schedule types: the next-day plan, appointments and generated blocks.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::clock::{self, ClockTime};
use crate::constraints::Constraint;
use crate::error::ValidationError;

/// Length of an appointment saved without an end time.
pub const DEFAULT_APPOINTMENT_MINUTES: i32 = 60;

/// One of the two daily nap slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NapSlot {
    Nap1,
    Nap2,
}

impl NapSlot {
    pub fn number(self) -> u8 {
        match self {
            NapSlot::Nap1 => 1,
            NapSlot::Nap2 => 2,
        }
    }

    pub fn from_number(n: u8) -> Result<Self, ValidationError> {
        match n {
            1 => Ok(NapSlot::Nap1),
            2 => Ok(NapSlot::Nap2),
            other => Err(ValidationError::InvalidNap(other)),
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            NapSlot::Nap1 => "Nap 1",
            NapSlot::Nap2 => "Nap 2",
        }
    }
}

/// A fixed appointment on the planned day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "clock::lenient::deserialize")]
    pub start: Option<ClockTime>,
    #[serde(default, deserialize_with = "clock::lenient::deserialize")]
    pub end: Option<ClockTime>,
    #[serde(default)]
    pub caregiver: Option<String>,
}

impl Appointment {
    pub fn new(title: impl Into<String>, start: ClockTime) -> Self {
        Self {
            title: title.into(),
            start: Some(start),
            end: None,
            caregiver: None,
        }
    }

    pub fn with_end(mut self, end: ClockTime) -> Self {
        self.end = Some(end);
        self
    }

    pub fn with_caregiver(mut self, caregiver: impl Into<String>) -> Self {
        self.caregiver = Some(caregiver.into());
        self
    }

    /// Explicit end, or start plus the default appointment length.
    pub fn resolved_end(&self) -> Option<ClockTime> {
        self.end
            .or_else(|| self.start.map(|s| s.add_minutes(DEFAULT_APPOINTMENT_MINUTES)))
    }

    /// Appointments without a title or start time are left off the schedule.
    pub fn is_schedulable(&self) -> bool {
        !self.title.trim().is_empty() && self.start.is_some()
    }
}

/// Who said they can cover each nap.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaregiverAvailability {
    #[serde(default)]
    pub nap1: Vec<String>,
    #[serde(default)]
    pub nap2: Vec<String>,
}

impl CaregiverAvailability {
    pub fn for_nap(&self, slot: NapSlot) -> &[String] {
        match slot {
            NapSlot::Nap1 => &self.nap1,
            NapSlot::Nap2 => &self.nap2,
        }
    }
}

/// Which naps the day is planned around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NapPlan {
    #[serde(default = "default_true")]
    pub nap1: bool,
    #[serde(default = "default_true")]
    pub nap2: bool,
}

fn default_true() -> bool {
    true
}

impl Default for NapPlan {
    fn default() -> Self {
        Self {
            nap1: true,
            nap2: true,
        }
    }
}

impl NapPlan {
    pub fn planned(&self, slot: NapSlot) -> bool {
        match slot {
            NapSlot::Nap1 => self.nap1,
            NapSlot::Nap2 => self.nap2,
        }
    }
}

/// The plan for one calendar day, written the evening before.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPlan {
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "clock::lenient::deserialize")]
    pub wake_target: Option<ClockTime>,
    #[serde(default)]
    pub appointments: Vec<Appointment>,
    #[serde(default)]
    pub caregiver_availability: CaregiverAvailability,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
    #[serde(default)]
    pub naps: NapPlan,
}

impl DayPlan {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            wake_target: None,
            appointments: Vec::new(),
            caregiver_availability: CaregiverAvailability::default(),
            constraints: Vec::new(),
            naps: NapPlan::default(),
        }
    }
}

/// Kind of schedule block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Routine,
    Open,
    Nap,
    Appointment,
}

impl BlockKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BlockKind::Routine => "routine",
            BlockKind::Open => "open",
            BlockKind::Nap => "nap",
            BlockKind::Appointment => "appointment",
        }
    }

    /// Style token for renderers.
    pub fn style(self) -> &'static str {
        match self {
            BlockKind::Routine => "block-routine",
            BlockKind::Open => "block-open",
            BlockKind::Nap => "block-nap",
            BlockKind::Appointment => "block-appointment",
        }
    }

    /// Open time is never sent to external calendars.
    pub fn is_exportable(self) -> bool {
        self != BlockKind::Open
    }
}

/// One contiguous, labeled, caregiver-assigned interval of the day.
///
/// Derived from the plan and log on every read; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleBlock {
    pub start: ClockTime,
    pub end: ClockTime,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: BlockKind,
    pub caregiver: String,
}

impl ScheduleBlock {
    pub fn new(
        start: ClockTime,
        end: ClockTime,
        title: impl Into<String>,
        kind: BlockKind,
        caregiver: impl Into<String>,
    ) -> Self {
        Self {
            start,
            end,
            title: title.into(),
            kind,
            caregiver: caregiver.into(),
        }
    }

    pub fn duration_minutes(&self) -> i32 {
        self.start.minutes_until(self.end)
    }

    /// Whether `at` falls in `[start, end)`.
    pub fn contains(&self, at: ClockTime) -> bool {
        self.start <= at && at < self.end
    }
}
