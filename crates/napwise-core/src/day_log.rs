//! What actually happened on a day: wake time, nap starts and ends, and the
//! ids of calendar events exported for it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::clock::{self, ClockTime};
use crate::schedule::NapSlot;

/// Observed start/end of one nap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NapLog {
    #[serde(default, deserialize_with = "clock::lenient::deserialize")]
    pub start: Option<ClockTime>,
    #[serde(default, deserialize_with = "clock::lenient::deserialize")]
    pub end: Option<ClockTime>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NapLogs {
    #[serde(default)]
    pub nap1: Option<NapLog>,
    #[serde(default)]
    pub nap2: Option<NapLog>,
}

impl NapLogs {
    pub fn get(&self, slot: NapSlot) -> Option<&NapLog> {
        match slot {
            NapSlot::Nap1 => self.nap1.as_ref(),
            NapSlot::Nap2 => self.nap2.as_ref(),
        }
    }

    fn entry(&mut self, slot: NapSlot) -> &mut NapLog {
        let field = match slot {
            NapSlot::Nap1 => &mut self.nap1,
            NapSlot::Nap2 => &mut self.nap2,
        };
        field.get_or_insert_with(NapLog::default)
    }

    fn clear(&mut self, slot: NapSlot) {
        match slot {
            NapSlot::Nap1 => self.nap1 = None,
            NapSlot::Nap2 => self.nap2 = None,
        }
    }
}

/// Input the generator takes for each nap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NapDescriptor {
    pub enabled: bool,
    pub start: Option<ClockTime>,
    pub end: Option<ClockTime>,
}

impl NapDescriptor {
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn planned() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }
}

/// Record for one calendar date, filled in through the day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayLog {
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "clock::lenient::deserialize")]
    pub actual_wake: Option<ClockTime>,
    #[serde(default)]
    pub naps: NapLogs,
    #[serde(default)]
    pub exported_events: Option<Vec<String>>,
}

impl DayLog {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            actual_wake: None,
            naps: NapLogs::default(),
            exported_events: None,
        }
    }

    pub fn record_wake(&mut self, at: ClockTime) {
        self.actual_wake = Some(at);
    }

    pub fn record_nap_start(&mut self, slot: NapSlot, at: ClockTime) {
        self.naps.entry(slot).start = Some(at);
    }

    pub fn record_nap_end(&mut self, slot: NapSlot, at: ClockTime) {
        self.naps.entry(slot).end = Some(at);
    }

    pub fn clear_nap(&mut self, slot: NapSlot) {
        self.naps.clear(slot);
    }

    /// Build the generator input for a nap from what was observed.
    pub fn nap_descriptor(&self, slot: NapSlot, planned: bool) -> NapDescriptor {
        let observed = self.naps.get(slot).copied().unwrap_or_default();
        NapDescriptor {
            // a nap that actually started counts even if it was not planned
            enabled: planned || observed.start.is_some(),
            start: observed.start,
            end: observed.end,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.actual_wake.is_none()
            && self.naps.nap1.is_none()
            && self.naps.nap2.is_none()
            && self.exported_events.as_ref().map_or(true, Vec::is_empty)
    }
}
