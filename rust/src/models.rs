//! Core data types for the task planner.

use rustc_hash::FxHashSet;

use crate::error::TaskError;
use crate::estimate::{DurationSpec, EstimateUpdate};

/// A unit of project work.
#[derive(Clone, Debug, PartialEq)]
pub struct Task {
    /// Unique, case-sensitive, non-empty name.
    pub name: String,
    pub estimate: DurationSpec,
    /// Owner, used for grouping in reports only.
    pub assigned_to: String,
    /// Stored for bookkeeping; scheduling ignores it.
    pub priority: i32,
    /// Names of the tasks that must finish before this one starts, in display order.
    pub dependencies: Vec<String>,
}

impl Task {
    pub fn new(name: impl Into<String>, estimate: DurationSpec) -> Self {
        Self {
            name: name.into(),
            estimate,
            assigned_to: String::new(),
            priority: 0,
            dependencies: Vec::new(),
        }
    }

    pub fn assigned_to(mut self, owner: impl Into<String>) -> Self {
        self.assigned_to = owner.into();
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Replace the dependency list. Repeated names are collapsed, first occurrence wins.
    pub fn depends_on<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dedup_dependencies(deps.into_iter().map(Into::into));
        self
    }

    /// Duration of this task alone, see [`crate::intrinsic_duration`].
    pub fn intrinsic_duration(&self) -> f64 {
        self.estimate.expected()
    }

    /// Field-level checks that do not need the rest of the collection.
    ///
    /// Names (own and referenced) must be non-empty and may not contain `,`.
    /// Names and the owner must be storable as one `" - "`-separated line:
    /// no surrounding whitespace, no line breaks, no `" - "` inside and no
    /// trailing `" -"`.
    pub fn check(&self) -> Result<(), TaskError> {
        check_name("name", &self.name)?;
        for dep in &self.dependencies {
            check_name("dependencies", dep)?;
        }
        check_text("assigned_to", &self.assigned_to)?;
        self.estimate.validate()
    }
}

fn check_text(field: &str, value: &str) -> Result<(), TaskError> {
    let storable = value.trim() == value
        && !value.contains(['\n', '\r'])
        && !value.contains(" - ")
        && !value.ends_with(" -");
    if !storable {
        return Err(TaskError::invalid_input(field, value));
    }
    Ok(())
}

fn check_name(field: &str, name: &str) -> Result<(), TaskError> {
    if name.is_empty() || name.contains(',') {
        return Err(TaskError::invalid_input(field, name));
    }
    check_text(field, name)
}

pub(crate) fn dedup_dependencies(deps: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen: FxHashSet<String> = FxHashSet::default();
    deps.filter(|d| seen.insert(d.clone())).collect()
}

/// Partial update for an existing task. `None` leaves a field unchanged.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TaskEdit {
    pub name: Option<String>,
    pub estimate: Option<EstimateUpdate>,
    pub assigned_to: Option<String>,
    pub dependencies: Option<Vec<String>>,
    pub priority: Option<i32>,
}

impl TaskEdit {
    pub fn rename(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn estimate(mut self, estimate: DurationSpec) -> Self {
        self.estimate = Some(EstimateUpdate::Replace(estimate));
        self
    }

    pub fn assigned_to(mut self, owner: impl Into<String>) -> Self {
        self.assigned_to = Some(owner.into());
        self
    }

    pub fn dependencies<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = Some(deps.into_iter().map(Into::into).collect());
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Whether applying this edit can change a computed schedule.
    pub fn affects_schedule(&self) -> bool {
        self.name.is_some() || self.estimate.is_some() || self.dependencies.is_some()
    }

    /// Produce the edited copy of `task`, leaving `task` untouched.
    ///
    /// Only checks the task itself; name collisions are the caller's concern.
    pub fn apply_to(&self, task: &Task) -> Result<Task, TaskError> {
        let mut updated = task.clone();
        if let Some(name) = &self.name {
            updated.name = name.clone();
        }
        if let Some(update) = &self.estimate {
            updated.estimate = update.apply(&task.estimate)?;
        }
        if let Some(owner) = &self.assigned_to {
            updated.assigned_to = owner.clone();
        }
        if let Some(deps) = &self.dependencies {
            updated.dependencies = dedup_dependencies(deps.iter().cloned());
        }
        if let Some(priority) = self.priority {
            updated.priority = priority;
        }
        updated.check()?;
        Ok(updated)
    }
}
