//! Evening planning wizard: turns what caregivers entered for tomorrow into a
//! saved [`DayPlan`] and a batch of tasks.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::clock::ClockTime;
use crate::error::Result;
use crate::schedule::{Appointment, CaregiverAvailability, DayPlan, NapPlan, NapSlot};
use crate::scheduler::is_child;
use crate::settings::Settings;
use crate::storage::{RowStore, SpaceStore};
use crate::task::{split_brain_dump, Task};

/// Everything entered in one pass of the wizard.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanDraft {
    pub wake_target: Option<ClockTime>,
    pub appointments: Vec<Appointment>,
    pub nap1_caregivers: Vec<String>,
    pub nap2_caregivers: Vec<String>,
    pub naps: NapPlan,
    /// Newline-separated task list
    pub brain_dump: String,
}

/// What the wizard saved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanSummary {
    pub plan: DayPlan,
    pub tasks: Vec<Task>,
    /// Non-fatal issues worth showing the caregiver
    pub warnings: Vec<String>,
}

/// Clean a nap's availability list against the roster.
///
/// The child's name is dropped; names missing from a non-empty roster are
/// kept but reported.
fn vet_caregivers(
    names: &[String],
    slot: NapSlot,
    settings: &Settings,
    warnings: &mut Vec<String>,
) -> Vec<String> {
    let mut kept: Vec<String> = Vec::new();
    for name in names.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
        if is_child(name, &settings.child_name) {
            warnings.push(format!(
                "{} cannot cover {}: that is the child's name",
                name,
                slot.title()
            ));
            continue;
        }
        if kept.iter().any(|k| k.eq_ignore_ascii_case(name)) {
            continue;
        }
        if !settings.caregivers.is_empty() && !settings.has_caregiver(name) {
            warnings.push(format!("{name} is not on the caregiver roster"));
        }
        kept.push(name.to_string());
    }
    kept
}

/// Build tomorrow's plan from a draft without saving anything.
pub fn build_plan(today: NaiveDate, draft: &PlanDraft, settings: &Settings) -> (DayPlan, Vec<String>) {
    let mut warnings = Vec::new();
    let tomorrow = today + Duration::days(1);

    for appt in &draft.appointments {
        if !appt.is_schedulable() {
            warnings.push(format!(
                "appointment '{}' has no title or start time and will not be scheduled",
                appt.title
            ));
        } else if let (Some(start), Some(end)) = (appt.start, appt.end) {
            if end <= start {
                warnings.push(format!("appointment '{}' ends before it starts", appt.title));
            }
        }
    }

    let plan = DayPlan {
        date: tomorrow,
        wake_target: draft.wake_target,
        appointments: draft.appointments.clone(),
        caregiver_availability: CaregiverAvailability {
            nap1: vet_caregivers(&draft.nap1_caregivers, NapSlot::Nap1, settings, &mut warnings),
            nap2: vet_caregivers(&draft.nap2_caregivers, NapSlot::Nap2, settings, &mut warnings),
        },
        constraints: settings.constraints.clone(),
        naps: draft.naps,
    };
    (plan, warnings)
}

/// Save the plan for the day after `today` and add the brain-dump tasks.
///
/// Re-running the wizard for the same day replaces the earlier plan; tasks
/// are always added.
pub fn plan_next_day<S: RowStore>(
    store: &SpaceStore<S>,
    today: NaiveDate,
    draft: &PlanDraft,
) -> Result<PlanSummary> {
    let settings = store.settings()?;
    let (plan, warnings) = build_plan(today, draft, &settings);

    match store.plan(plan.date) {
        Ok(Some(_)) => tracing::info!(date = %plan.date, "replacing existing plan"),
        Ok(None) => {}
        Err(e) => tracing::warn!(date = %plan.date, error = %e, "replacing unreadable plan"),
    }
    store.save_plan(&plan)?;
    let tasks = store.add_tasks(split_brain_dump(&draft.brain_dump))?;

    for w in &warnings {
        tracing::warn!("{w}");
    }
    Ok(PlanSummary {
        plan,
        tasks,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::ConstraintKind;

    fn t(s: &str) -> ClockTime {
        s.parse().unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    #[test]
    fn saves_plan_for_tomorrow_with_settings_snapshot() {
        let store = SpaceStore::open_memory().unwrap();
        store
            .update_settings(|s| s.set_constraint("Nap 1 duration", "1 hr"))
            .unwrap();

        let draft = PlanDraft {
            wake_target: Some(t("06:45")),
            appointments: vec![Appointment::new("Swim", t("10:00"))],
            brain_dump: "wash bottles\n- order stroller part\n".into(),
            ..PlanDraft::default()
        };
        let summary = plan_next_day(&store, today(), &draft).unwrap();

        let tomorrow = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        assert_eq!(summary.plan.date, tomorrow);
        let saved = store.plan(tomorrow).unwrap().unwrap();
        assert_eq!(saved.wake_target, Some(t("06:45")));
        assert_eq!(
            crate::constraints::find(&saved.constraints, ConstraintKind::Nap1Duration)
                .unwrap()
                .value,
            "1 hr"
        );
        assert_eq!(summary.tasks.len(), 2);
        assert_eq!(store.tasks().unwrap().len(), 2);
    }

    #[test]
    fn caregivers_are_vetted() {
        let mut settings = Settings::default();
        settings.set_child_name("Milo").unwrap();
        settings.add_caregiver("Sam").unwrap();

        let draft = PlanDraft {
            nap1_caregivers: vec!["milo".into(), "Sam".into(), "sam".into(), "".into()],
            nap2_caregivers: vec!["Grandpa".into()],
            ..PlanDraft::default()
        };
        let (plan, warnings) = build_plan(today(), &draft, &settings);

        assert_eq!(plan.caregiver_availability.nap1, vec!["Sam"]);
        assert_eq!(plan.caregiver_availability.nap2, vec!["Grandpa"]);
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn incomplete_appointments_warn_but_are_kept() {
        let draft = PlanDraft {
            appointments: vec![
                Appointment::new("", t("09:00")),
                Appointment::new("Vet", t("14:00")).with_end(t("13:00")),
            ],
            ..PlanDraft::default()
        };
        let (plan, warnings) = build_plan(today(), &draft, &Settings::default());
        assert_eq!(plan.appointments.len(), 2);
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn rerun_replaces_plan() {
        let store = SpaceStore::open_memory().unwrap();
        let mut draft = PlanDraft {
            wake_target: Some(t("07:00")),
            ..PlanDraft::default()
        };
        plan_next_day(&store, today(), &draft).unwrap();
        draft.wake_target = Some(t("06:00"));
        draft.naps.nap2 = false;
        let summary = plan_next_day(&store, today(), &draft).unwrap();

        let saved = store.plan(summary.plan.date).unwrap().unwrap();
        assert_eq!(saved.wake_target, Some(t("06:00")));
        assert!(!saved.naps.nap2);
    }

    #[test]
    fn rerun_overwrites_unreadable_plan() {
        use crate::storage::Table;

        let store = SpaceStore::open_memory().unwrap();
        store
            .rows()
            .upsert(Table::Plans, "2026-10-17", &serde_json::json!("garbage"))
            .unwrap();
        assert!(store.plan(NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()).is_err());

        let draft = PlanDraft {
            wake_target: Some(t("06:30")),
            ..PlanDraft::default()
        };
        let summary = plan_next_day(&store, today(), &draft).unwrap();
        let saved = store.plan(summary.plan.date).unwrap().unwrap();
        assert_eq!(saved.wake_target, Some(t("06:30")));
    }
}
