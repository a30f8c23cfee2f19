//! In-memory task collection with a lazily cached schedule.

use rustc_hash::FxHashMap;

use crate::config::PlanConfig;
use crate::critical_path::{ScheduleCache, ScheduleResult};
use crate::error::{TaskError, ValidationError};
use crate::graph;
use crate::log_changes;
use crate::models::{Task, TaskEdit};
use crate::report::ChartRow;

/// Ordered task collection keyed by name.
///
/// Insertion order is kept for display. Structural checks (dangling
/// references, cycles) are deferred to [`TaskRepository::validate`] and the
/// schedule queries; mutations only enforce unique names and valid estimates.
#[derive(Debug, Default)]
pub struct TaskRepository {
    tasks: Vec<Task>,
    /// Name -> position in `tasks`.
    positions: FxHashMap<String, usize>,
    cache: ScheduleCache,
    config: PlanConfig,
}

impl TaskRepository {
    pub fn new(config: PlanConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Build a repository from a persisted sequence, keeping its order.
    pub fn from_tasks(tasks: Vec<Task>, config: PlanConfig) -> Result<Self, TaskError> {
        let mut repo = Self::new(config);
        for task in tasks {
            repo.add(task)?;
        }
        Ok(repo)
    }

    /// Hand the tasks back, in order, for saving.
    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks
    }

    pub fn config(&self) -> &PlanConfig {
        &self.config
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.tasks.iter().map(|t| t.name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&Task> {
        self.positions.get(name).map(|&pos| &self.tasks[pos])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Append a task.
    ///
    /// # Returns
    /// * `Err(TaskError::InvalidInput)` if the name is empty
    /// * `Err(TaskError::InvalidEstimate)` if the estimate is invalid
    /// * `Err(ValidationError::DuplicateName)` if the name is taken
    pub fn add(&mut self, task: Task) -> Result<(), TaskError> {
        task.check()?;
        if self.contains(&task.name) {
            return Err(ValidationError::DuplicateName(task.name).into());
        }

        log_changes!(self.config.verbosity, "Added task {}", task.name);
        self.positions.insert(task.name.clone(), self.tasks.len());
        self.tasks.push(task);
        self.cache.invalidate("task added", self.config.verbosity);
        Ok(())
    }

    /// Apply a partial update to the task called `name`.
    ///
    /// Nothing changes unless the whole edit succeeds. Renaming does not
    /// rewrite other tasks' dependency lists.
    pub fn edit(&mut self, name: &str, edit: &TaskEdit) -> Result<&Task, TaskError> {
        let pos = self.position(name)?;
        let updated = edit.apply_to(&self.tasks[pos])?;

        if updated.name != name && self.contains(&updated.name) {
            return Err(ValidationError::DuplicateName(updated.name).into());
        }

        if updated.name != name {
            self.positions.remove(name);
            self.positions.insert(updated.name.clone(), pos);
        }
        log_changes!(self.config.verbosity, "Edited task {}", updated.name);
        self.tasks[pos] = updated;

        if edit.affects_schedule() {
            self.cache.invalidate("task edited", self.config.verbosity);
        }
        Ok(&self.tasks[pos])
    }

    /// Remove and return the task called `name`.
    ///
    /// Tasks that depended on it keep the reference; the next validation
    /// reports it as dangling.
    pub fn delete(&mut self, name: &str) -> Result<Task, TaskError> {
        let pos = self.position(name)?;
        let removed = self.tasks.remove(pos);
        self.positions.remove(name);
        for (offset, task) in self.tasks[pos..].iter().enumerate() {
            self.positions.insert(task.name.clone(), pos + offset);
        }

        log_changes!(self.config.verbosity, "Deleted task {}", name);
        self.cache.invalidate("task deleted", self.config.verbosity);
        Ok(removed)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        graph::validate(&self.tasks)
    }

    /// The schedule for the current tasks, recomputed only after a relevant mutation.
    pub fn schedule(&mut self) -> Result<&ScheduleResult, TaskError> {
        Ok(self
            .cache
            .get_or_compute(&self.tasks, self.config.verbosity)?)
    }

    /// Earliest finish of `name`, including its whole dependency chain.
    pub fn task_duration(&mut self, name: &str) -> Result<f64, TaskError> {
        self.position(name)?;
        self.schedule()?.earliest_finish(name)
    }

    pub fn project_duration(&mut self) -> Result<f64, TaskError> {
        Ok(self.schedule()?.project_duration)
    }

    pub fn critical_path(&mut self) -> Result<Vec<String>, TaskError> {
        Ok(self.schedule()?.critical_path.clone())
    }

    /// Rows for the Gantt chart, in insertion order.
    pub fn chart_rows(&self) -> Vec<ChartRow> {
        self.tasks.iter().map(ChartRow::from_task).collect()
    }

    pub fn is_schedule_cached(&self) -> bool {
        self.cache.is_cached()
    }

    /// How many times the schedule has been computed so far.
    pub fn schedule_computations(&self) -> u64 {
        self.cache.computations()
    }

    fn position(&self, name: &str) -> Result<usize, TaskError> {
        self.positions
            .get(name)
            .copied()
            .ok_or_else(|| TaskError::TaskNotFound(name.to_string()))
    }
}
