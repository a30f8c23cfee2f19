//! Critical path engine.
//!
//! A single memoized pass over a validated dependency graph yields earliest
//! and latest times for every task, the project duration and the critical
//! path. Both estimate models feed the same pass through
//! [`crate::intrinsic_duration`].

mod cache;
mod calculation;
mod types;

pub use cache::ScheduleCache;
pub use calculation::{cumulative_duration, schedule, schedule_with_verbosity};
pub use types::{ScheduleResult, TaskTiming, TIME_EPSILON};
