//! Shared household task list.
//!
//! Tasks are entered one at a time or as a "brain dump": a newline-separated
//! block of text typed during planning and split into individual tasks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry on the shared task list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub done: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            done: false,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    pub fn complete(&mut self) {
        if !self.done {
            self.done = true;
            self.completed_at = Some(Utc::now());
        }
    }

    pub fn reopen(&mut self) {
        self.done = false;
        self.completed_at = None;
    }
}

/// Open tasks first, then by creation time.
pub fn sort_for_display(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| a.done.cmp(&b.done).then(a.created_at.cmp(&b.created_at)));
}

const BULLETS: &[char] = &['-', '*', '•'];

/// Split brain-dump text into task titles.
///
/// One title per line; surrounding whitespace and a leading list bullet are
/// stripped, blank lines dropped.
pub fn split_brain_dump(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| {
            let line = line.trim();
            line.strip_prefix(BULLETS).map(str::trim_start).unwrap_or(line)
        })
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
