//! Plain-text task listing and Gantt chart.
//!
//! Rendering only needs each task's name, owner and intrinsic duration; it
//! does not look at schedule results.

use crate::config::PlanConfig;
use crate::estimate::intrinsic_duration;
use crate::models::Task;

const EMPTY_MESSAGE: &str = "No tasks added yet.";

/// One bar in the Gantt chart.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartRow {
    pub name: String,
    pub assigned_to: String,
    pub duration: f64,
}

impl ChartRow {
    pub fn from_task(task: &Task) -> Self {
        Self {
            name: task.name.clone(),
            assigned_to: task.assigned_to.clone(),
            duration: intrinsic_duration(task),
        }
    }
}

/// Numbered listing of tasks in their stored order.
pub fn render_task_list(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return format!("{EMPTY_MESSAGE}\n");
    }

    let mut out = String::from("Tasks:\n");
    for (idx, task) in tasks.iter().enumerate() {
        let dependencies = if task.dependencies.is_empty() {
            "None".to_string()
        } else {
            task.dependencies.join(", ")
        };
        let expected = if task.estimate.is_pert() {
            format!(" (expected {:.2})", task.intrinsic_duration())
        } else {
            String::new()
        };
        out.push_str(&format!(
            "{}. {} - {} days{} - Priority: {} - Assigned to: {} - Dependencies: {}\n",
            idx + 1,
            task.name,
            task.estimate,
            expected,
            task.priority,
            task.assigned_to,
            dependencies
        ));
    }
    out
}

/// Bar for one row: one `chart_bar` per whole day, at most `chart_max_bar` long.
fn bar(duration: f64, config: &PlanConfig) -> String {
    // Float-to-int casts saturate, so huge durations land on the cap
    let days = (duration.floor() as usize).min(config.chart_max_bar);
    std::iter::repeat(config.chart_bar).take(days).collect()
}

/// Gantt chart grouped by owner.
///
/// Owners appear in ascending order. Within an owner, longer tasks come
/// first and equal durations keep their input order.
pub fn render_gantt(rows: &[ChartRow], config: &PlanConfig) -> String {
    if rows.is_empty() {
        return format!("{EMPTY_MESSAGE}\n");
    }

    let mut owners: Vec<&str> = rows.iter().map(|r| r.assigned_to.as_str()).collect();
    owners.sort_unstable();
    owners.dedup();

    let rule = "=".repeat(config.chart_rule_width);
    let mut lines: Vec<String> = Vec::new();
    for owner in owners {
        lines.push(rule.clone());
        lines.push(format!("Team Member: {owner}"));
        lines.push(rule.clone());

        let mut assigned: Vec<&ChartRow> =
            rows.iter().filter(|r| r.assigned_to == owner).collect();
        assigned.sort_by(|a, b| b.duration.total_cmp(&a.duration));

        lines.extend(
            assigned
                .into_iter()
                .map(|row| format!("{}: {}", row.name, bar(row.duration, config))),
        );
    }
    lines.join("\n") + "\n"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimate::DurationSpec;

    fn row(name: &str, owner: &str, duration: f64) -> ChartRow {
        ChartRow {
            name: name.to_string(),
            assigned_to: owner.to_string(),
            duration,
        }
    }

    #[test]
    fn test_empty_outputs() {
        assert_eq!(render_task_list(&[]), "No tasks added yet.\n");
        assert_eq!(
            render_gantt(&[], &PlanConfig::default()),
            "No tasks added yet.\n"
        );
    }

    #[test]
    fn test_task_list_format() {
        let tasks = vec![
            Task::new("A", DurationSpec::Fixed(2.0)).assigned_to("bob"),
            Task::new("B", DurationSpec::pert(1.0, 2.0, 9.0).unwrap())
                .assigned_to("amy")
                .priority(3)
                .depends_on(["A"]),
        ];
        let expected = "Tasks:\n\
            1. A - 2 days - Priority: 0 - Assigned to: bob - Dependencies: None\n\
            2. B - 1/2/9 days (expected 3.00) - Priority: 3 - Assigned to: amy - Dependencies: A\n";
        assert_eq!(render_task_list(&tasks), expected);
    }

    #[test]
    fn test_gantt_groups_and_orders() {
        let rows = vec![
            row("write", "zoe", 2.0),
            row("plan", "amy", 1.5),
            row("build", "amy", 4.0),
            row("test", "amy", 1.5),
        ];
        let config = PlanConfig {
            chart_rule_width: 5,
            ..PlanConfig::default()
        };
        let expected = "=====\n\
            Team Member: amy\n\
            =====\n\
            build: ####\n\
            plan: #\n\
            test: #\n\
            =====\n\
            Team Member: zoe\n\
            =====\n\
            write: ##\n";
        assert_eq!(render_gantt(&rows, &config), expected);
    }

    #[test]
    fn test_gantt_custom_bar() {
        let config = PlanConfig {
            chart_bar: '*',
            chart_rule_width: 1,
            ..PlanConfig::default()
        };
        let out = render_gantt(&[row("a", "x", 3.9)], &config);
        assert!(out.ends_with("a: ***\n"));
    }

    #[test]
    fn test_gantt_caps_bar_length() {
        let config = PlanConfig {
            chart_rule_width: 1,
            chart_max_bar: 4,
            ..PlanConfig::default()
        };
        let rows = vec![row("huge", "x", 1e19), row("long", "x", 1e12), row("short", "x", 2.0)];
        let out = render_gantt(&rows, &config);
        assert!(out.contains("huge: ####\n"));
        assert!(out.contains("long: ####\n"));
        assert!(out.contains("short: ##\n"));
    }

    #[test]
    fn test_gantt_from_task_with_validated_huge_estimate() {
        let task = Task::new("big", DurationSpec::fixed(1e19).unwrap());
        let out = render_gantt(&[ChartRow::from_task(&task)], &PlanConfig::default());
        assert!(out.ends_with(&format!("big: {}\n", "#".repeat(120))));
    }
}
