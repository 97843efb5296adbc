//! Named day constraints: nap durations, wake windows and the bedtime target.
//!
//! Values are free text as entered by caregivers ("2.5 hrs", "90 min",
//! "7:00 PM") and are only interpreted when a schedule is generated.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::clock::ClockTime;

static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(hrs?|min)").expect("duration pattern compiles")
});

static LEADING_HOUR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+)").expect("hour pattern compiles"));

/// Bedtime used when the constraint is missing or has no leading hour.
pub const DEFAULT_BEDTIME_HOUR: u16 = 19;

/// One named setting as stored in the settings record and plan snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraint {
    pub name: String,
    pub value: String,
}

impl Constraint {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// The fixed constraint vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstraintKind {
    Nap1Duration,
    Nap2Duration,
    WakeWindowBeforeNap1,
    WakeWindowBetweenNaps,
    BedtimeTarget,
}

impl ConstraintKind {
    pub const ALL: [ConstraintKind; 5] = [
        ConstraintKind::WakeWindowBeforeNap1,
        ConstraintKind::Nap1Duration,
        ConstraintKind::WakeWindowBetweenNaps,
        ConstraintKind::Nap2Duration,
        ConstraintKind::BedtimeTarget,
    ];

    /// Stored name; lookups match it exactly.
    pub fn name(self) -> &'static str {
        match self {
            ConstraintKind::Nap1Duration => "Nap 1 duration",
            ConstraintKind::Nap2Duration => "Nap 2 duration",
            ConstraintKind::WakeWindowBeforeNap1 => "Wake window before nap 1",
            ConstraintKind::WakeWindowBetweenNaps => "Wake window between naps",
            ConstraintKind::BedtimeTarget => "Bedtime target",
        }
    }

    /// Value used when the constraint is absent from the list.
    pub fn default_value(self) -> &'static str {
        match self {
            ConstraintKind::Nap1Duration | ConstraintKind::Nap2Duration => "90 min",
            ConstraintKind::WakeWindowBeforeNap1 => "2.5 hrs",
            ConstraintKind::WakeWindowBetweenNaps => "3 hrs",
            ConstraintKind::BedtimeTarget => "19:00",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }
}

/// The default constraint list for a fresh settings record.
pub fn default_constraints() -> Vec<Constraint> {
    ConstraintKind::ALL
        .into_iter()
        .map(|k| Constraint::new(k.name(), k.default_value()))
        .collect()
}

/// Extract minutes from text like `"90 min"` or `"2.5 hrs"`.
///
/// Returns 0 when no number-plus-unit pair is found.
pub fn parse_duration_minutes(value: &str) -> u32 {
    let Some(caps) = DURATION_RE.captures(value) else {
        return 0;
    };
    let Ok(magnitude) = caps[1].parse::<f64>() else {
        return 0;
    };
    let minutes = if caps[2].to_ascii_lowercase().starts_with("hr") {
        magnitude * 60.0
    } else {
        magnitude
    };
    minutes.round() as u32
}

/// Leading integer hour of a bedtime display string, as `HH:00`.
///
/// `"7:00 PM"` yields `07:00`: the AM/PM marker and minutes are dropped.
pub fn bedtime_hour(value: &str) -> Option<ClockTime> {
    let caps = LEADING_HOUR_RE.captures(value)?;
    let hour: u16 = caps[1].parse().ok()?;
    ClockTime::from_hm(hour, 0)
}

/// Find a constraint by its exact vocabulary name.
pub fn find(constraints: &[Constraint], kind: ConstraintKind) -> Option<&Constraint> {
    constraints.iter().find(|c| c.name == kind.name())
}

/// Resolve a duration constraint in minutes.
///
/// An absent constraint falls back to the vocabulary default. A present but
/// unparsable one resolves to 0.
pub fn duration(constraints: &[Constraint], kind: ConstraintKind) -> u32 {
    match find(constraints, kind) {
        Some(c) => {
            let minutes = parse_duration_minutes(&c.value);
            if minutes == 0 {
                tracing::debug!(name = %c.name, value = %c.value, "constraint has no duration, using 0");
            }
            minutes
        }
        None => parse_duration_minutes(kind.default_value()),
    }
}

/// Resolve the bedtime target to an on-the-hour clock time.
pub fn bedtime(constraints: &[Constraint]) -> ClockTime {
    find(constraints, ConstraintKind::BedtimeTarget)
        .and_then(|c| bedtime_hour(&c.value))
        .unwrap_or_else(|| ClockTime::from_minutes(DEFAULT_BEDTIME_HOUR * 60))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_durations() {
        assert_eq!(parse_duration_minutes("90 min"), 90);
        assert_eq!(parse_duration_minutes("2.5 hrs"), 150);
        assert_eq!(parse_duration_minutes("3 hr"), 180);
        assert_eq!(parse_duration_minutes("45min"), 45);
        assert_eq!(parse_duration_minutes("about 2 HRS"), 120);
        assert_eq!(parse_duration_minutes("garbage"), 0);
        assert_eq!(parse_duration_minutes(""), 0);
        assert_eq!(parse_duration_minutes("90"), 0);
    }

    #[test]
    fn bedtime_keeps_only_leading_hour() {
        assert_eq!(bedtime_hour("19:00"), "19:00".parse().ok());
        assert_eq!(bedtime_hour("7:00 PM"), "07:00".parse().ok());
        assert_eq!(bedtime_hour("19:45"), "19:00".parse().ok());
        assert_eq!(bedtime_hour("PM 7"), None);
        assert_eq!(bedtime_hour("31:00"), None);
    }

    #[test]
    fn absent_constraints_use_defaults() {
        assert_eq!(duration(&[], ConstraintKind::WakeWindowBeforeNap1), 150);
        assert_eq!(duration(&[], ConstraintKind::Nap1Duration), 90);
        assert_eq!(duration(&[], ConstraintKind::WakeWindowBetweenNaps), 180);
        assert_eq!(duration(&[], ConstraintKind::Nap2Duration), 90);
        assert_eq!(bedtime(&[]).to_string(), "19:00");
    }

    #[test]
    fn malformed_constraint_resolves_to_zero() {
        let list = vec![Constraint::new("Nap 1 duration", "a while")];
        assert_eq!(duration(&list, ConstraintKind::Nap1Duration), 0);
        // other names still default independently
        assert_eq!(duration(&list, ConstraintKind::Nap2Duration), 90);
    }

    #[test]
    fn lookup_is_exact() {
        let list = vec![Constraint::new("nap 1 duration", "30 min")];
        assert_eq!(duration(&list, ConstraintKind::Nap1Duration), 90);
        assert_eq!(
            ConstraintKind::from_name("Bedtime target"),
            Some(ConstraintKind::BedtimeTarget)
        );
        assert_eq!(ConstraintKind::from_name("Bedtime"), None);
    }

    #[test]
    fn defaults_cover_vocabulary() {
        let list = default_constraints();
        assert_eq!(list.len(), 5);
        for kind in ConstraintKind::ALL {
            assert!(find(&list, kind).is_some());
        }
    }
}
