//! Adapter from raw prompt answers to typed tasks and edits.
//!
//! A prompt layer collects strings; blank means "not given". Everything that
//! fails to parse becomes [`TaskError::InvalidInput`] before the repository
//! is touched.

use crate::config::PlanConfig;
use crate::error::TaskError;
use crate::estimate::{DurationSpec, EstimateUpdate};
use crate::models::{Task, TaskEdit};

/// Field values as typed by a user.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawTaskFields {
    pub name: String,
    /// Fixed duration (`2.5`) or a full `o/m/p` triple.
    pub duration: String,
    pub optimistic: String,
    pub most_likely: String,
    pub pessimistic: String,
    pub assigned_to: String,
    /// Comma-separated task names.
    pub dependencies: String,
    pub priority: String,
}

fn given(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn parse_point(field: &str, value: &str) -> Result<Option<f64>, TaskError> {
    given(value)
        .map(|v| {
            v.parse::<f64>()
                .map_err(|_| TaskError::invalid_input(field, v))
        })
        .transpose()
}

/// Split a comma-separated list, dropping blanks.
pub fn parse_dependencies(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(String::from)
        .collect()
}

impl RawTaskFields {
    fn estimate_update(&self) -> Result<Option<EstimateUpdate>, TaskError> {
        let estimate = given(&self.duration)
            .map(str::parse::<DurationSpec>)
            .transpose()?;
        EstimateUpdate::from_parts(
            estimate,
            parse_point("optimistic", &self.optimistic)?,
            parse_point("most likely", &self.most_likely)?,
            parse_point("pessimistic", &self.pessimistic)?,
        )
    }

    fn priority(&self) -> Result<Option<i32>, TaskError> {
        given(&self.priority)
            .map(|p| {
                p.parse::<i32>()
                    .map_err(|_| TaskError::invalid_input("priority", p))
            })
            .transpose()
    }

    /// Build a new task. Name and an estimate are required; a missing
    /// priority takes `config.default_priority`.
    pub fn into_task(self, config: &PlanConfig) -> Result<Task, TaskError> {
        let name = given(&self.name)
            .ok_or_else(|| TaskError::invalid_input("name", self.name.clone()))?
            .to_string();

        let estimate = self
            .estimate_update()?
            .ok_or_else(|| TaskError::invalid_input("duration", self.duration.clone()))?
            .into_estimate()?;

        let task = Task::new(name, estimate)
            .assigned_to(self.assigned_to.trim())
            .priority(self.priority()?.unwrap_or(config.default_priority))
            .depends_on(parse_dependencies(&self.dependencies));
        task.check()?;
        Ok(task)
    }

    /// Build a partial edit. `none` as the dependency list clears it.
    pub fn into_edit(self) -> Result<TaskEdit, TaskError> {
        let dependencies = given(&self.dependencies).map(|deps| {
            if deps.eq_ignore_ascii_case("none") {
                Vec::new()
            } else {
                parse_dependencies(deps)
            }
        });

        Ok(TaskEdit {
            name: given(&self.name).map(String::from),
            estimate: self.estimate_update()?,
            assigned_to: given(&self.assigned_to).map(String::from),
            dependencies,
            priority: self.priority()?,
        })
    }
}
