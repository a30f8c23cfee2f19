//! Cached schedule for incremental use by the repository.
//!
//! The cache holds at most one [`ScheduleResult`]. Mutations that can change
//! the schedule drop it; the next query recomputes lazily. Failed
//! computations are not cached.

use crate::error::ValidationError;
use crate::models::Task;
use crate::{log_changes, log_checks};

use super::calculation::schedule_with_verbosity;
use super::types::ScheduleResult;

#[derive(Debug, Default)]
pub struct ScheduleCache {
    cached: Option<ScheduleResult>,
    /// Number of successful recomputations, for observing cache behaviour.
    computations: u64,
}

impl ScheduleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached schedule, computing it from `tasks` if there is none.
    pub fn get_or_compute(
        &mut self,
        tasks: &[Task],
        verbosity: u8,
    ) -> Result<&ScheduleResult, ValidationError> {
        let result = match self.cached.take() {
            Some(result) => {
                log_checks!(verbosity, "Schedule cache hit");
                result
            }
            None => {
                log_checks!(verbosity, "Recomputing schedule for {} tasks", tasks.len());
                let result = schedule_with_verbosity(tasks, verbosity)?;
                self.computations += 1;
                result
            }
        };
        Ok(self.cached.insert(result))
    }

    /// Drop the cached schedule, if any.
    pub fn invalidate(&mut self, reason: &str, verbosity: u8) {
        if self.cached.take().is_some() {
            log_changes!(verbosity, "Schedule invalidated: {}", reason);
        }
    }

    pub fn is_cached(&self) -> bool {
        self.cached.is_some()
    }

    pub fn computations(&self) -> u64 {
        self.computations
    }
}
