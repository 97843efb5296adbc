//! Household settings shared by every caregiver: the constraint list, the
//! caregiver roster and the child's name.

use serde::{Deserialize, Serialize};

use crate::constraints::{self, Constraint, ConstraintKind};
use crate::error::ValidationError;
use crate::scheduler::{is_child, ScheduleGenerator};

pub const DEFAULT_CHILD_NAME: &str = "Baby";

fn default_child_name() -> String {
    DEFAULT_CHILD_NAME.to_string()
}

/// Singleton settings record for the space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "constraints::default_constraints")]
    pub constraints: Vec<Constraint>,
    #[serde(default)]
    pub caregivers: Vec<String>,
    #[serde(default = "default_child_name")]
    pub child_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            constraints: constraints::default_constraints(),
            caregivers: Vec::new(),
            child_name: default_child_name(),
        }
    }
}

impl Settings {
    pub fn constraint(&self, kind: ConstraintKind) -> Option<&Constraint> {
        constraints::find(&self.constraints, kind)
    }

    /// Insert or replace a constraint. Names outside the vocabulary are rejected.
    pub fn set_constraint(&mut self, name: &str, value: &str) -> Result<(), ValidationError> {
        let kind = ConstraintKind::from_name(name)
            .ok_or_else(|| ValidationError::UnknownConstraint(name.to_string()))?;
        let value = value.trim();
        if value.is_empty() {
            return Err(ValidationError::Empty(name.to_string()));
        }
        match self.constraints.iter_mut().find(|c| c.name == kind.name()) {
            Some(existing) => existing.value = value.to_string(),
            None => self.constraints.push(Constraint::new(kind.name(), value)),
        }
        Ok(())
    }

    /// Add a caregiver to the roster. Returns false if already present.
    pub fn add_caregiver(&mut self, name: &str) -> Result<bool, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::Empty("caregiver".to_string()));
        }
        if is_child(name, &self.child_name) {
            return Err(ValidationError::ReservedName(name.to_string()));
        }
        if self.has_caregiver(name) {
            return Ok(false);
        }
        self.caregivers.push(name.to_string());
        Ok(true)
    }

    /// Remove a caregiver. Returns false if they were not on the roster.
    pub fn remove_caregiver(&mut self, name: &str) -> bool {
        let before = self.caregivers.len();
        self.caregivers
            .retain(|c| !c.trim().eq_ignore_ascii_case(name.trim()));
        self.caregivers.len() != before
    }

    pub fn has_caregiver(&self, name: &str) -> bool {
        self.caregivers
            .iter()
            .any(|c| c.trim().eq_ignore_ascii_case(name.trim()))
    }

    /// Rename the child. A caregiver entry with the new name is dropped.
    pub fn set_child_name(&mut self, name: &str) -> Result<(), ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::Empty("child name".to_string()));
        }
        self.child_name = name.to_string();
        self.remove_caregiver(name);
        Ok(())
    }

    /// Generator configured for this household.
    pub fn generator(&self) -> ScheduleGenerator {
        ScheduleGenerator::for_child(self.child_name.clone())
    }
}
