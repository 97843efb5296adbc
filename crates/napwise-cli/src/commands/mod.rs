pub mod calendar;
pub mod config;
pub mod log;
pub mod plan;
pub mod schedule;
pub mod settings;
pub mod task;

use chrono::{Local, NaiveDate, Timelike};
use napwise_core::{AccessGate, ClockTime, Config, CoreError, SpaceStore, SqliteRowStore};

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Invocation-wide state shared by every command.
pub struct Context {
    passphrase: Option<String>,
}

impl Context {
    pub fn new(passphrase: Option<String>) -> Self {
        Self { passphrase }
    }

    pub fn config(&self) -> Result<Config, CoreError> {
        Ok(Config::load()?)
    }

    /// Open the configured store without an access check.
    pub fn store(&self, config: &Config) -> Result<SpaceStore, CoreError> {
        tracing::debug!(space = %config.space, "opening store");
        Ok(SpaceStore::new(SqliteRowStore::open_default(config)?))
    }

    /// Fail unless the passphrase matches the configured digest.
    pub fn authorize(&self, config: &Config) -> Result<(), CoreError> {
        AccessGate::from_config(&config.access).check(self.passphrase.as_deref())?;
        Ok(())
    }

    /// Open the store for a command that writes.
    pub fn store_for_write(&self) -> Result<(Config, SpaceStore), CoreError> {
        let config = self.config()?;
        self.authorize(&config)?;
        let store = self.store(&config)?;
        Ok((config, store))
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Current local wall-clock time, to the minute.
pub fn now() -> ClockTime {
    let now = Local::now();
    ClockTime::from_minutes((now.hour() * 60 + now.minute()) as u16)
}

pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("invalid date '{s}': {e}"))
}

pub fn parse_time(s: &str) -> Result<ClockTime, String> {
    s.parse::<ClockTime>().map_err(|e| e.to_string())
}
