//! Critical path calculation using forward and backward passes.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;

use crate::error::{TaskError, ValidationError};
use crate::graph::validate;
use crate::interner::{NameInterner, TaskIdx};
use crate::logging::VERBOSITY_SILENT;
use crate::models::Task;
use crate::{log_checks, log_debug};

use super::types::{ScheduleResult, TaskTiming, TIME_EPSILON};

/// Pre-computed task data for the passes.
/// All lookups use direct array indexing by [`TaskIdx`].
struct TaskData<'a> {
    /// Task name <-> integer mapping, in slice order.
    index: NameInterner<'a>,
    /// Intrinsic durations indexed by task id.
    durations: Vec<f64>,
    /// Dependencies indexed by task id.
    deps: Vec<Vec<TaskIdx>>,
    /// Reverse dependencies (dependents) indexed by task id.
    dependents: Vec<Vec<TaskIdx>>,
}

impl<'a> TaskData<'a> {
    /// Build from a validated slice: names are unique and every dependency resolves.
    fn new(tasks: &'a [Task]) -> Self {
        let n = tasks.len();
        let mut index = NameInterner::with_capacity(n);
        for task in tasks {
            index.intern(&task.name);
        }

        let mut durations = vec![0.0; n];
        let mut deps: Vec<Vec<TaskIdx>> = vec![Vec::new(); n];
        let mut dependents: Vec<Vec<TaskIdx>> = vec![Vec::new(); n];

        for (pos, task) in tasks.iter().enumerate() {
            durations[pos] = task.intrinsic_duration();
            for dep in &task.dependencies {
                if let Some(dep_id) = index.get(dep) {
                    deps[pos].push(dep_id);
                    dependents[dep_id as usize].push(pos as TaskIdx);
                }
            }
        }

        Self {
            index,
            durations,
            deps,
            dependents,
        }
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    fn name(&self, id: TaskIdx) -> &'a str {
        self.index.resolve(id).unwrap_or_default()
    }
}

/// Compute earliest/latest times, project duration and critical path for `tasks`.
///
/// The task collection is validated first; any validation error is returned
/// unchanged and nothing is computed.
pub fn schedule(tasks: &[Task]) -> Result<ScheduleResult, ValidationError> {
    schedule_with_verbosity(tasks, VERBOSITY_SILENT)
}

/// Same as [`schedule`], logging through the verbosity-gated macros.
pub fn schedule_with_verbosity(
    tasks: &[Task],
    verbosity: u8,
) -> Result<ScheduleResult, ValidationError> {
    if let Err(e) = validate(tasks) {
        log_checks!(verbosity, "Validation failed: {}", e);
        return Err(e);
    }
    log_checks!(verbosity, "Validated {} tasks", tasks.len());

    if tasks.is_empty() {
        return Ok(ScheduleResult::default());
    }

    let data = TaskData::new(tasks);
    let order = topological_order(&data)?;

    // Forward pass: every dependency precedes its dependents in `order`, so
    // each task is evaluated once from already-final dependency finishes.
    let mut timings: Vec<TaskTiming> = vec![TaskTiming::default(); data.len()];
    for &id in &order {
        let idx = id as usize;
        let earliest_start = data.deps[idx]
            .iter()
            .map(|&dep| timings[dep as usize].earliest_finish)
            .fold(0.0, f64::max);
        let duration = data.durations[idx];

        let timing = &mut timings[idx];
        timing.duration = duration;
        timing.earliest_start = earliest_start;
        timing.earliest_finish = earliest_start + duration;

        log_debug!(
            verbosity,
            "Forward: {} ES={} EF={}",
            data.name(id),
            timing.earliest_start,
            timing.earliest_finish
        );
    }

    let project_duration = timings
        .iter()
        .map(|t| t.earliest_finish)
        .fold(0.0, f64::max);

    // Backward pass: latest finish is bounded by the earliest latest start of
    // any dependent, or by the project end for tasks nothing waits on.
    for &id in order.iter().rev() {
        let idx = id as usize;
        let latest_finish = if data.dependents[idx].is_empty() {
            project_duration
        } else {
            data.dependents[idx]
                .iter()
                .map(|&d| timings[d as usize].latest_start)
                .fold(f64::INFINITY, f64::min)
        };

        let timing = &mut timings[idx];
        timing.latest_finish = latest_finish;
        timing.latest_start = latest_finish - timing.duration;
        timing.slack = timing.latest_start - timing.earliest_start;

        log_debug!(
            verbosity,
            "Backward: {} LS={} LF={} slack={}",
            data.name(id),
            timing.latest_start,
            timing.latest_finish,
            timing.slack
        );
    }

    let critical_path: Vec<String> = extract_critical_path(&data, &timings)
        .into_iter()
        .map(|id| data.name(id).to_string())
        .collect();

    log_checks!(
        verbosity,
        "Project duration {} via {}",
        project_duration,
        critical_path.join(" -> ")
    );

    let mut by_name: FxHashMap<String, TaskTiming> =
        FxHashMap::with_capacity_and_hasher(data.len(), Default::default());
    for (pos, timing) in timings.into_iter().enumerate() {
        by_name.insert(data.name(pos as TaskIdx).to_string(), timing);
    }

    Ok(ScheduleResult {
        timings: by_name,
        order: order
            .iter()
            .map(|&id| data.name(id).to_string())
            .collect(),
        project_duration,
        critical_path,
    })
}

/// Cumulative duration of one task: its earliest finish including every
/// dependency chain leading to it.
pub fn cumulative_duration(tasks: &[Task], name: &str) -> Result<f64, TaskError> {
    if !tasks.iter().any(|t| t.name == name) {
        return Err(TaskError::TaskNotFound(name.to_string()));
    }
    let result = schedule(tasks)?;
    result.earliest_finish(name)
}

/// Topological sort using Kahn's algorithm (dependencies before dependents).
///
/// The queue is seeded and fed in slice order, so the result is deterministic.
fn topological_order(data: &TaskData<'_>) -> Result<Vec<TaskIdx>, ValidationError> {
    let n = data.len();
    let mut in_degree: Vec<usize> = data.deps.iter().map(Vec::len).collect();

    let mut queue: VecDeque<TaskIdx> = (0..n as TaskIdx)
        .filter(|&id| in_degree[id as usize] == 0)
        .collect();
    let mut result: Vec<TaskIdx> = Vec::with_capacity(n);

    while let Some(id) = queue.pop_front() {
        result.push(id);
        for &dependent in &data.dependents[id as usize] {
            let degree = &mut in_degree[dependent as usize];
            *degree -= 1;
            if *degree == 0 {
                queue.push_back(dependent);
            }
        }
    }

    if result.len() != n {
        // Only reachable if validation was bypassed; report what never became ready.
        let stuck: Vec<String> = (0..n)
            .filter(|&pos| in_degree[pos] > 0)
            .map(|pos| data.name(pos as TaskIdx).to_string())
            .collect();
        return Err(ValidationError::CycleDetected(stuck));
    }

    Ok(result)
}

/// Among `candidates`, the one with the largest earliest finish; ties go to
/// the lexicographically smallest name.
///
/// Finishes that overflowed to infinity tie by equality, since their
/// difference is NaN.
fn latest_finishing(
    candidates: &[TaskIdx],
    data: &TaskData<'_>,
    timings: &[TaskTiming],
) -> Option<TaskIdx> {
    let finish = |id: TaskIdx| timings[id as usize].earliest_finish;
    let max_finish = candidates
        .iter()
        .map(|&id| finish(id))
        .fold(f64::NEG_INFINITY, f64::max);

    candidates
        .iter()
        .copied()
        .filter(|&id| finish(id) == max_finish || max_finish - finish(id) < TIME_EPSILON)
        .min_by_key(|&id| data.name(id))
}

/// Walk back from the final task that finishes last, always through the
/// dependency that finishes last, until reaching a task with no dependencies.
///
/// Only tasks nothing depends on can end the path. Durations are never
/// negative, so one of them always reaches the project duration.
fn extract_critical_path(data: &TaskData<'_>, timings: &[TaskTiming]) -> Vec<TaskIdx> {
    let sinks: Vec<TaskIdx> = (0..data.len() as TaskIdx)
        .filter(|&id| data.dependents[id as usize].is_empty())
        .collect();
    let Some(end) = latest_finishing(&sinks, data, timings) else {
        return Vec::new();
    };

    let mut path = vec![end];
    let mut current = end;
    while let Some(prev) = latest_finishing(&data.deps[current as usize], data, timings) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}
