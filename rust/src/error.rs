//! Error types for task validation, scheduling and repository operations.

use thiserror::Error;

/// Structural problems in a task collection.
///
/// Any of these makes the dependency graph unschedulable as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Two tasks share the same name.
    #[error("Duplicate task name: {0}")]
    DuplicateName(String),

    /// A task depends on a name that is not in the collection.
    #[error("Task '{task}' depends on missing task '{missing}'")]
    DanglingDependency { task: String, missing: String },

    /// The dependency graph contains a cycle. The path repeats its first name at the end.
    #[error("Circular dependency detected: {}", .0.join(" -> "))]
    CycleDetected(Vec<String>),
}

/// Errors returned by task construction, repository operations and schedule queries.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TaskError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A duration estimate is negative, non-finite or out of PERT order.
    #[error("Invalid estimate: {0}")]
    InvalidEstimate(String),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    /// A field value could not be interpreted.
    #[error("Invalid input for {field}: {value:?}")]
    InvalidInput { field: String, value: String },
}

impl TaskError {
    pub(crate) fn invalid_input(field: &str, value: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.to_string(),
            value: value.into(),
        }
    }
}
