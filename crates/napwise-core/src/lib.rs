//! # napwise core library
//!
//! Business logic for planning and tracking a young child's day across a
//! small set of caregivers. The CLI is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Constraint model**: free-text duration settings ("2.5 hrs", "90 min")
//!   parsed on demand, with per-name defaults
//! - **Schedule generator**: a pure function from a day plan plus observed
//!   wake/nap times to an ordered list of blocks from wake to bedtime
//! - **Storage**: a generic row store (SQLite) scoped to one shared space,
//!   with typed access to plans, logs, settings and tasks
//! - **Integrations**: calendar export of the generated schedule
//!
//! ## Key Components
//!
//! - [`ScheduleGenerator`]: Builds the day's blocks
//! - [`AppState`]: One day's view, loaded and refreshed explicitly
//! - [`SpaceStore`]: Typed record access over a [`RowStore`]
//! - [`Config`]: Per-device configuration

pub mod access;
pub mod clock;
pub mod constraints;
pub mod day_log;
pub mod error;
pub mod integrations;
pub mod schedule;
pub mod scheduler;
pub mod settings;
pub mod state;
pub mod storage;
pub mod task;
pub mod wizard;

pub use access::{hash_passphrase, AccessGate};
pub use clock::ClockTime;
pub use constraints::{parse_duration_minutes, Constraint, ConstraintKind};
pub use day_log::{DayLog, NapDescriptor, NapLog};
pub use error::{CalendarError, ConfigError, CoreError, StoreError, ValidationError};
pub use schedule::{Appointment, BlockKind, CaregiverAvailability, DayPlan, NapPlan, NapSlot, ScheduleBlock};
pub use scheduler::{
    current_block, detect_conflicts, generate_schedule, BlockConflict, ScheduleGenerator,
    SchedulerConfig,
};
pub use settings::Settings;
pub use state::AppState;
pub use storage::{Config, RowStore, SpaceStore, SqliteRowStore, Table};
pub use task::Task;
pub use wizard::{plan_next_day, PlanDraft, PlanSummary};
