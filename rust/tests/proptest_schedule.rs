//! Property-based tests for the schedule engine.
//!
//! These tests verify the behavioral contracts of scheduling:
//! - Earliest times respect every dependency and shared dependencies count once
//! - The critical path is a real dependency chain adding up to the project duration
//! - Cycles are rejected instead of evaluated

use proptest::prelude::*;
use std::collections::HashMap;
use taskplan::{schedule, validate, DurationSpec, Task, TaskRepository, ValidationError};

// =============================================================================
// Strategies for generating test data
// =============================================================================

/// A fixed or PERT estimate with ordered points.
fn estimate_strategy() -> impl Strategy<Value = DurationSpec> {
    prop_oneof![
        (0u32..20).prop_map(|d| DurationSpec::Fixed(f64::from(d))),
        (0u32..10, 0u32..10, 0u32..10).prop_map(|(a, b, c)| {
            let mut points = [f64::from(a), f64::from(b), f64::from(c)];
            points.sort_by(f64::total_cmp);
            DurationSpec::Pert {
                optimistic: points[0],
                most_likely: points[1],
                pessimistic: points[2],
            }
        }),
    ]
}

/// Generate a DAG by only letting a task depend on tasks declared before it.
fn dag_strategy(max_tasks: usize) -> impl Strategy<Value = Vec<Task>> {
    (1..=max_tasks).prop_flat_map(|count| {
        let deps = (0..count)
            .map(|i| {
                if i == 0 {
                    Just(Vec::new()).boxed()
                } else {
                    proptest::collection::vec(0..i, 0..=i.min(3)).boxed()
                }
            })
            .collect::<Vec<_>>();
        (
            proptest::collection::vec(estimate_strategy(), count),
            deps,
            any::<bool>(),
        )
            .prop_map(|(estimates, deps, reversed)| {
                let mut tasks: Vec<Task> = estimates
                    .into_iter()
                    .zip(deps)
                    .enumerate()
                    .map(|(i, (estimate, deps))| {
                        Task::new(format!("t{i}"), estimate)
                            .depends_on(deps.into_iter().map(|d| format!("t{d}")))
                    })
                    .collect();
                // Declaration order must not matter
                if reversed {
                    tasks.reverse();
                }
                tasks
            })
    })
}

/// A ring t0 -> t1 -> ... -> t(n-1) -> t0.
fn ring_strategy() -> impl Strategy<Value = Vec<Task>> {
    (1..=6usize).prop_map(|count| {
        (0..count)
            .map(|i| {
                Task::new(format!("t{i}"), DurationSpec::Fixed(1.0))
                    .depends_on([format!("t{}", (i + 1) % count)])
            })
            .collect()
    })
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn forward_pass_respects_dependencies(tasks in dag_strategy(25)) {
        let result = schedule(&tasks).unwrap();

        for task in &tasks {
            let timing = result.timing(&task.name).unwrap();
            let expected_start = task
                .dependencies
                .iter()
                .map(|d| result.earliest_finish(d).unwrap())
                .fold(0.0, f64::max);

            prop_assert!((timing.earliest_start - expected_start).abs() < 1e-9);
            prop_assert!(
                (timing.earliest_finish - timing.earliest_start - task.intrinsic_duration()).abs()
                    < 1e-9
            );
            prop_assert!(timing.slack > -1e-9);
        }

        let max_finish = result
            .timings
            .values()
            .map(|t| t.earliest_finish)
            .fold(0.0, f64::max);
        prop_assert_eq!(result.project_duration, max_finish);
        prop_assert_eq!(result.order.len(), tasks.len());
    }

    #[test]
    fn critical_path_is_a_chain_summing_to_project_duration(tasks in dag_strategy(25)) {
        let result = schedule(&tasks).unwrap();
        let by_name: HashMap<&str, &Task> = tasks.iter().map(|t| (t.name.as_str(), t)).collect();
        let path = &result.critical_path;

        prop_assert!(!path.is_empty());
        prop_assert!(by_name[path[0].as_str()].dependencies.is_empty());
        for pair in path.windows(2) {
            prop_assert!(by_name[pair[1].as_str()].dependencies.contains(&pair[0]));
        }

        let total: f64 = path
            .iter()
            .map(|name| by_name[name.as_str()].intrinsic_duration())
            .sum();
        prop_assert!((total - result.project_duration).abs() < 1e-6);
        for name in path {
            prop_assert!(result.timing(name).unwrap().is_critical());
        }
    }

    #[test]
    fn diamond_counts_shared_dependency_once(
        a in 0u32..50, b in 0u32..50, c in 0u32..50, d in 0u32..50,
    ) {
        let tasks = vec![
            Task::new("a", DurationSpec::Fixed(f64::from(a))),
            Task::new("b", DurationSpec::Fixed(f64::from(b))).depends_on(["a"]),
            Task::new("c", DurationSpec::Fixed(f64::from(c))).depends_on(["a"]),
            Task::new("d", DurationSpec::Fixed(f64::from(d))).depends_on(["b", "c"]),
        ];
        let result = schedule(&tasks).unwrap();
        let expected = f64::from(a + b.max(c) + d);
        prop_assert_eq!(result.earliest_finish("d").unwrap(), expected);
    }

    #[test]
    fn rings_are_rejected(tasks in ring_strategy()) {
        match validate(&tasks) {
            Err(ValidationError::CycleDetected(path)) => {
                prop_assert_eq!(path.first(), path.last());
                prop_assert_eq!(path.len(), tasks.len() + 1);
            }
            other => prop_assert!(false, "expected cycle, got {:?}", other),
        }
        prop_assert!(schedule(&tasks).is_err());
    }

    #[test]
    fn repository_schedule_is_idempotent(tasks in dag_strategy(15)) {
        let mut repo = TaskRepository::from_tasks(tasks, Default::default()).unwrap();
        let first = repo.schedule().unwrap().clone();
        let second = repo.schedule().unwrap().clone();
        prop_assert_eq!(first, second);
        prop_assert_eq!(repo.schedule_computations(), 1);
    }
}
