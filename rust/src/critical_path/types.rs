//! Types for critical path results.

use rustc_hash::FxHashMap;

use crate::error::TaskError;

/// Tolerance for comparing computed times.
pub const TIME_EPSILON: f64 = 1e-9;

/// Per-task timing information from the forward and backward passes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TaskTiming {
    /// Intrinsic duration used for this task.
    pub duration: f64,
    /// Earliest possible start time (from forward pass).
    pub earliest_start: f64,
    /// Earliest possible finish time (from forward pass).
    pub earliest_finish: f64,
    /// Latest allowable start time (from backward pass).
    pub latest_start: f64,
    /// Latest allowable finish time (from backward pass).
    pub latest_finish: f64,
    /// Slack = latest_start - earliest_start.
    pub slack: f64,
}

impl TaskTiming {
    pub fn is_critical(&self) -> bool {
        self.slack.abs() < TIME_EPSILON
    }
}

/// Output of one scheduling run. Owns its data; nothing points back into the tasks.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScheduleResult {
    /// Timing for every task, keyed by name.
    pub timings: FxHashMap<String, TaskTiming>,
    /// Topological order the tasks were evaluated in.
    pub order: Vec<String>,
    /// Largest earliest finish over all tasks, 0 when there are none.
    pub project_duration: f64,
    /// Chain of tasks realizing `project_duration`, first task first.
    pub critical_path: Vec<String>,
}

impl ScheduleResult {
    pub fn timing(&self, name: &str) -> Option<&TaskTiming> {
        self.timings.get(name)
    }

    /// Time until `name` and everything it depends on is done.
    pub fn earliest_finish(&self, name: &str) -> Result<f64, TaskError> {
        self.timings
            .get(name)
            .map(|t| t.earliest_finish)
            .ok_or_else(|| TaskError::TaskNotFound(name.to_string()))
    }

    pub fn earliest_start(&self, name: &str) -> Result<f64, TaskError> {
        self.timings
            .get(name)
            .map(|t| t.earliest_start)
            .ok_or_else(|| TaskError::TaskNotFound(name.to_string()))
    }

    /// Tasks with zero slack, in evaluation order.
    ///
    /// A superset of `critical_path` when several chains tie for the longest.
    pub fn zero_slack_tasks(&self) -> impl Iterator<Item = &str> + '_ {
        self.order
            .iter()
            .filter(|name| self.timings.get(*name).is_some_and(TaskTiming::is_critical))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
