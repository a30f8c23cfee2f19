//! Structural validation of a task collection.
//!
//! Checks run in a fixed order (names, then references, then cycles) and
//! report the first problem in slice order, so the same input always yields
//! the same error.

use rustc_hash::FxHashMap;

use crate::error::ValidationError;
use crate::models::Task;

/// Validate that `tasks` forms a schedulable dependency graph.
///
/// # Returns
/// * `Err(ValidationError::DuplicateName)` for the first repeated name
/// * `Err(ValidationError::DanglingDependency)` for the first reference to a missing task
/// * `Err(ValidationError::CycleDetected)` with the names along the first cycle found
pub fn validate(tasks: &[Task]) -> Result<(), ValidationError> {
    let index = unique_name_index(tasks)?;
    check_dependencies_exist(tasks, &index)?;
    check_acyclic(tasks, &index)
}

/// Map each name to its position, failing on the first collision.
fn unique_name_index(tasks: &[Task]) -> Result<FxHashMap<&str, usize>, ValidationError> {
    let mut index: FxHashMap<&str, usize> =
        FxHashMap::with_capacity_and_hasher(tasks.len(), Default::default());
    for (pos, task) in tasks.iter().enumerate() {
        if index.insert(task.name.as_str(), pos).is_some() {
            return Err(ValidationError::DuplicateName(task.name.clone()));
        }
    }
    Ok(index)
}

fn check_dependencies_exist(
    tasks: &[Task],
    index: &FxHashMap<&str, usize>,
) -> Result<(), ValidationError> {
    for task in tasks {
        if let Some(missing) = task
            .dependencies
            .iter()
            .find(|dep| !index.contains_key(dep.as_str()))
        {
            return Err(ValidationError::DanglingDependency {
                task: task.name.clone(),
                missing: missing.clone(),
            });
        }
    }
    Ok(())
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Depth-first search with an explicit stack; a dependency that is still in
/// progress closes a cycle.
fn check_acyclic(tasks: &[Task], index: &FxHashMap<&str, usize>) -> Result<(), ValidationError> {
    let mut marks = vec![Mark::Unvisited; tasks.len()];
    // (task position, next dependency to visit)
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for root in 0..tasks.len() {
        if marks[root] != Mark::Unvisited {
            continue;
        }
        marks[root] = Mark::InProgress;
        stack.push((root, 0));

        while let Some(frame) = stack.last_mut() {
            let (node, next) = *frame;
            let deps = &tasks[node].dependencies;
            if next == deps.len() {
                marks[node] = Mark::Done;
                stack.pop();
                continue;
            }
            frame.1 += 1;

            let Some(&dep) = index.get(deps[next].as_str()) else {
                continue;
            };
            match marks[dep] {
                Mark::Unvisited => {
                    marks[dep] = Mark::InProgress;
                    stack.push((dep, 0));
                }
                Mark::InProgress => {
                    return Err(ValidationError::CycleDetected(cycle_path(
                        tasks, &stack, dep,
                    )));
                }
                Mark::Done => {}
            }
        }
    }

    Ok(())
}

/// Names from `start` down the current DFS stack, closed by `start` again.
fn cycle_path(tasks: &[Task], stack: &[(usize, usize)], start: usize) -> Vec<String> {
    let begin = stack
        .iter()
        .position(|&(node, _)| node == start)
        .unwrap_or(0);
    let mut path: Vec<String> = stack[begin..]
        .iter()
        .map(|&(node, _)| tasks[node].name.clone())
        .collect();
    path.push(tasks[start].name.clone());
    path
}
