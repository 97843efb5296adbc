//! Typed access to the records of one shared space.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::row_store::{RowStore, SqliteRowStore, Table};
use crate::day_log::DayLog;
use crate::error::{Result, StoreError, ValidationError};
use crate::schedule::DayPlan;
use crate::settings::Settings;
use crate::task::{self, Task};

const SETTINGS_KEY: &str = "settings";

fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn task_not_found(id: &str) -> ValidationError {
    ValidationError::NotFound {
        kind: "Task".to_string(),
        id: id.to_string(),
    }
}

/// Plans, logs, settings and tasks on top of a [`RowStore`].
pub struct SpaceStore<S = SqliteRowStore> {
    rows: S,
}

impl<S: RowStore> SpaceStore<S> {
    pub fn new(rows: S) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &S {
        &self.rows
    }

    fn read<T: DeserializeOwned>(&self, table: Table, key: &str) -> Result<Option<T>> {
        let Some(value) = self.rows.get(table, key)? else {
            return Ok(None);
        };
        let record = serde_json::from_value(value).map_err(|e| StoreError::CorruptRow {
            table: table.as_str().to_string(),
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(Some(record))
    }

    fn write<T: Serialize>(&self, table: Table, key: &str, record: &T) -> Result<()> {
        let value = serde_json::to_value(record)?;
        self.rows.upsert(table, key, &value)?;
        Ok(())
    }

    // === Plans ===

    pub fn plan(&self, date: NaiveDate) -> Result<Option<DayPlan>> {
        self.read(Table::Plans, &date_key(date))
    }

    /// Save a plan, replacing any earlier plan for the same date.
    pub fn save_plan(&self, plan: &DayPlan) -> Result<()> {
        self.write(Table::Plans, &date_key(plan.date), plan)?;
        tracing::info!(date = %plan.date, appointments = plan.appointments.len(), "plan saved");
        Ok(())
    }

    // === Logs ===

    pub fn log(&self, date: NaiveDate) -> Result<Option<DayLog>> {
        self.read(Table::Logs, &date_key(date))
    }

    /// The stored log, or an empty unsaved one.
    pub fn log_or_new(&self, date: NaiveDate) -> Result<DayLog> {
        Ok(self.log(date)?.unwrap_or_else(|| DayLog::new(date)))
    }

    pub fn save_log(&self, log: &DayLog) -> Result<()> {
        self.write(Table::Logs, &date_key(log.date), log)
    }

    /// Read-modify-write a day log, creating it on first use.
    pub fn update_log(&self, date: NaiveDate, f: impl FnOnce(&mut DayLog)) -> Result<DayLog> {
        let mut log = self.log_or_new(date)?;
        f(&mut log);
        self.save_log(&log)?;
        tracing::debug!(date = %date, "day log updated");
        Ok(log)
    }

    // === Settings ===

    /// The settings record, defaults when none has been saved.
    pub fn settings(&self) -> Result<Settings> {
        Ok(self.read(Table::Settings, SETTINGS_KEY)?.unwrap_or_default())
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<()> {
        self.write(Table::Settings, SETTINGS_KEY, settings)
    }

    /// Read-modify-write the settings; nothing is saved if `f` fails.
    pub fn update_settings<T>(
        &self,
        f: impl FnOnce(&mut Settings) -> std::result::Result<T, ValidationError>,
    ) -> Result<T> {
        let mut settings = self.settings()?;
        let out = f(&mut settings)?;
        self.save_settings(&settings)?;
        Ok(out)
    }

    // === Tasks ===

    /// All tasks, open first. Rows that no longer decode are skipped.
    pub fn tasks(&self) -> Result<Vec<Task>> {
        let mut tasks = Vec::new();
        for (key, value) in self.rows.list(Table::Tasks)? {
            match serde_json::from_value::<Task>(value) {
                Ok(t) => tasks.push(t),
                Err(e) => tracing::warn!(key = %key, "skipping unreadable task row: {e}"),
            }
        }
        task::sort_for_display(&mut tasks);
        Ok(tasks)
    }

    /// Look a task up by full id or unique id prefix.
    pub fn find_task(&self, id: &str) -> Result<Task> {
        if let Some(task) = self.read::<Task>(Table::Tasks, id)? {
            return Ok(task);
        }
        let mut matches = self
            .tasks()?
            .into_iter()
            .filter(|t| !id.is_empty() && t.id.starts_with(id));
        match (matches.next(), matches.next()) {
            (Some(task), None) => Ok(task),
            _ => Err(task_not_found(id).into()),
        }
    }

    pub fn save_task(&self, task: &Task) -> Result<()> {
        self.write(Table::Tasks, &task.id, task)
    }

    pub fn add_task(&self, title: &str) -> Result<Task> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::Empty("task title".to_string()).into());
        }
        let task = Task::new(title);
        self.save_task(&task)?;
        Ok(task)
    }

    /// Add one task per title, skipping blanks.
    pub fn add_tasks<I, T>(&self, titles: I) -> Result<Vec<Task>>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut created = Vec::new();
        for title in titles {
            if title.as_ref().trim().is_empty() {
                continue;
            }
            created.push(self.add_task(title.as_ref())?);
        }
        Ok(created)
    }

    pub fn set_task_done(&self, id: &str, done: bool) -> Result<Task> {
        let mut task = self.find_task(id)?;
        if done {
            task.complete();
        } else {
            task.reopen();
        }
        self.save_task(&task)?;
        Ok(task)
    }

    pub fn rename_task(&self, id: &str, title: &str) -> Result<Task> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::Empty("task title".to_string()).into());
        }
        let mut task = self.find_task(id)?;
        task.title = title.to_string();
        self.save_task(&task)?;
        Ok(task)
    }

    pub fn delete_task(&self, id: &str) -> Result<Task> {
        let task = self.find_task(id)?;
        self.rows.delete(Table::Tasks, &task.id)?;
        Ok(task)
    }

    /// Delete every completed task, returning how many were removed.
    pub fn clear_completed(&self) -> Result<usize> {
        let mut removed = 0;
        for task in self.tasks()?.into_iter().filter(|t| t.done) {
            if self.rows.delete(Table::Tasks, &task.id)? {
                removed += 1;
            }
        }
        Ok(removed)
    }
}

impl SpaceStore<SqliteRowStore> {
    /// In-memory store.
    pub fn open_memory() -> Result<Self> {
        Ok(Self::new(SqliteRowStore::open_memory("test")?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ClockTime;
    use crate::error::CoreError;
    use crate::schedule::NapSlot;
    use serde_json::json;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    #[test]
    fn plan_save_overwrites() {
        let store = SpaceStore::open_memory().unwrap();
        assert!(store.plan(date()).unwrap().is_none());

        let mut plan = DayPlan::new(date());
        store.save_plan(&plan).unwrap();
        plan.wake_target = "06:30".parse().ok();
        store.save_plan(&plan).unwrap();

        assert_eq!(store.plan(date()).unwrap(), Some(plan));
    }

    #[test]
    fn log_is_created_lazily() {
        let store = SpaceStore::open_memory().unwrap();
        assert!(store.log(date()).unwrap().is_none());

        let wake: ClockTime = "06:10".parse().unwrap();
        store.update_log(date(), |log| log.record_wake(wake)).unwrap();
        store
            .update_log(date(), |log| log.record_nap_start(NapSlot::Nap1, wake.add_minutes(150)))
            .unwrap();

        let log = store.log(date()).unwrap().unwrap();
        assert_eq!(log.actual_wake, Some(wake));
        assert_eq!(log.naps.nap1.unwrap().start, "08:40".parse().ok());
    }

    #[test]
    fn settings_default_until_saved() {
        let store = SpaceStore::open_memory().unwrap();
        assert_eq!(store.settings().unwrap(), Settings::default());

        store.update_settings(|s| s.add_caregiver("Ana")).unwrap();
        assert_eq!(store.settings().unwrap().caregivers, vec!["Ana"]);

        let err = store.update_settings(|s| s.set_constraint("Nope", "1 hr"));
        assert!(matches!(err, Err(CoreError::Validation(_))));
    }

    #[test]
    fn task_crud_by_prefix() {
        let store = SpaceStore::open_memory().unwrap();
        let created = store.add_tasks(["Buy wipes", " ", "Call daycare"]).unwrap();
        assert_eq!(created.len(), 2);

        let prefix = &created[0].id[..8];
        let done = store.set_task_done(prefix, true).unwrap();
        assert!(done.done);

        let titles: Vec<_> = store.tasks().unwrap().into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["Call daycare", "Buy wipes"]);

        store.rename_task(&created[1].id, "Call daycare re: Friday").unwrap();
        assert_eq!(store.clear_completed().unwrap(), 1);
        assert_eq!(store.tasks().unwrap().len(), 1);

        assert!(store.find_task("zzz").is_err());
        assert!(store.add_task("   ").is_err());
        store.delete_task(&created[1].id).unwrap();
        assert!(store.tasks().unwrap().is_empty());
    }

    #[test]
    fn corrupt_plan_row_is_an_error_and_bad_task_row_is_skipped() {
        let store = SpaceStore::open_memory().unwrap();
        store
            .rows()
            .upsert(Table::Plans, "2026-10-17", &json!({"wake_target": "07:00"}))
            .unwrap();
        assert!(matches!(
            store.plan(date()),
            Err(CoreError::Store(StoreError::CorruptRow { .. }))
        ));

        store.rows().upsert(Table::Tasks, "junk", &json!([1, 2])).unwrap();
        store.add_task("real").unwrap();
        assert_eq!(store.tasks().unwrap().len(), 1);
    }
}
