//! Application state for one day.
//!
//! Holds everything a caregiver's view needs: settings, today's plan and log,
//! and the task list. State is loaded explicitly, refreshed after every write
//! and passed to whatever renders it.

use chrono::NaiveDate;

use crate::clock::ClockTime;
use crate::day_log::{DayLog, NapDescriptor};
use crate::error::Result;
use crate::schedule::{DayPlan, NapSlot, ScheduleBlock};
use crate::scheduler::{current_block, detect_conflicts, BlockConflict};
use crate::settings::Settings;
use crate::storage::{RowStore, SpaceStore};
use crate::task::Task;

#[derive(Debug, Clone)]
pub struct AppState {
    pub today: NaiveDate,
    pub settings: Settings,
    /// The plan written the evening before, if any.
    pub plan: Option<DayPlan>,
    /// Today's log; empty and unsaved until something is recorded.
    pub log: DayLog,
    pub tasks: Vec<Task>,
}

impl AppState {
    /// Read everything for `today` from the store.
    pub fn load<S: RowStore>(store: &SpaceStore<S>, today: NaiveDate) -> Result<Self> {
        Ok(Self {
            today,
            settings: store.settings()?,
            plan: store.plan(today)?,
            log: store.log_or_new(today)?,
            tasks: store.tasks()?,
        })
    }

    /// Re-read after a write, from this or another device.
    pub fn refresh<S: RowStore>(&mut self, store: &SpaceStore<S>) -> Result<()> {
        *self = Self::load(store, self.today)?;
        Ok(())
    }

    /// The plan the generator runs on.
    ///
    /// Without a saved plan an empty one for today is used. A plan with no
    /// constraint snapshot takes the current settings list.
    pub fn effective_plan(&self) -> DayPlan {
        let mut plan = self
            .plan
            .clone()
            .unwrap_or_else(|| DayPlan::new(self.today));
        if plan.constraints.is_empty() {
            plan.constraints = self.settings.constraints.clone();
        }
        plan
    }

    fn nap_descriptor(&self, plan: &DayPlan, slot: NapSlot) -> NapDescriptor {
        self.log.nap_descriptor(slot, plan.naps.planned(slot))
    }

    /// Today's schedule from the plan and what has been logged so far.
    pub fn schedule(&self) -> Vec<ScheduleBlock> {
        let plan = self.effective_plan();
        let nap1 = self.nap_descriptor(&plan, NapSlot::Nap1);
        let nap2 = self.nap_descriptor(&plan, NapSlot::Nap2);
        self.settings
            .generator()
            .generate(&plan, self.log.actual_wake, nap1, nap2)
    }

    /// Overlapping blocks in today's schedule.
    pub fn conflicts(&self) -> Vec<BlockConflict> {
        detect_conflicts(&self.schedule())
    }

    /// The block in progress at `now`.
    pub fn current_block(&self, now: ClockTime) -> Option<ScheduleBlock> {
        current_block(&self.schedule(), now).cloned()
    }

    pub fn open_tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| !t.done)
    }

    // === Recording ===

    pub fn record_wake<S: RowStore>(&mut self, store: &SpaceStore<S>, at: ClockTime) -> Result<()> {
        store.update_log(self.today, |log| log.record_wake(at))?;
        self.refresh(store)
    }

    pub fn record_nap_start<S: RowStore>(
        &mut self,
        store: &SpaceStore<S>,
        slot: NapSlot,
        at: ClockTime,
    ) -> Result<()> {
        store.update_log(self.today, |log| log.record_nap_start(slot, at))?;
        self.refresh(store)
    }

    pub fn record_nap_end<S: RowStore>(
        &mut self,
        store: &SpaceStore<S>,
        slot: NapSlot,
        at: ClockTime,
    ) -> Result<()> {
        store.update_log(self.today, |log| log.record_nap_end(slot, at))?;
        self.refresh(store)
    }

    pub fn clear_nap<S: RowStore>(&mut self, store: &SpaceStore<S>, slot: NapSlot) -> Result<()> {
        store.update_log(self.today, |log| log.clear_nap(slot))?;
        self.refresh(store)
    }
}
