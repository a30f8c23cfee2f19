//! Flat-file task storage.
//!
//! One task per line, fields separated by `" - "`:
//!
//! ```text
//! name - <estimate> days - <priority> - <assigned_to>[ - dep1,dep2]
//! ```
//!
//! `<estimate>` is `2.5` for a fixed duration or `1/2/9` for
//! optimistic/most-likely/pessimistic. Priority and owner may be omitted; an
//! empty owner is only written when dependencies follow it. [`Task::check`]
//! rejects any name or owner that would not survive the line format.

use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;

use crate::config::PlanConfig;
use crate::error::TaskError;
use crate::estimate::DurationSpec;
use crate::input::parse_dependencies;
use crate::models::Task;
use crate::repository::TaskRepository;

const FIELD_SEPARATOR: &str = " - ";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A line could not be turned into a task. Lines are numbered from 1.
    #[error("line {line}: {source}")]
    Parse { line: usize, source: TaskError },

    #[error(transparent)]
    Task(#[from] TaskError),
}

/// Parse one non-blank line.
pub fn parse_line(line: &str, config: &PlanConfig) -> Result<Task, TaskError> {
    let fields: Vec<&str> = line.trim().split(FIELD_SEPARATOR).map(str::trim).collect();
    if !(2..=5).contains(&fields.len()) {
        return Err(TaskError::invalid_input("line", line));
    }

    let estimate_field = fields[1];
    let estimate: DurationSpec = estimate_field
        .strip_suffix("days")
        .unwrap_or(estimate_field)
        .parse()?;

    let priority = match fields.get(2).filter(|p| !p.is_empty()) {
        Some(p) => p
            .parse::<i32>()
            .map_err(|_| TaskError::invalid_input("priority", *p))?,
        None => config.default_priority,
    };

    let task = Task::new(fields[0], estimate)
        .priority(priority)
        .assigned_to(fields.get(3).copied().unwrap_or_default())
        .depends_on(parse_dependencies(fields.get(4).copied().unwrap_or_default()));
    task.check()?;
    Ok(task)
}

/// Format one task as a line, without the trailing newline.
///
/// Trailing empty fields are left out. The task must pass [`Task::check`]
/// for the line to parse back to the same task.
pub fn format_line(task: &Task) -> String {
    let mut fields = vec![
        task.name.clone(),
        format!("{} days", task.estimate),
        task.priority.to_string(),
    ];
    if !task.assigned_to.is_empty() || !task.dependencies.is_empty() {
        fields.push(task.assigned_to.clone());
    }
    if !task.dependencies.is_empty() {
        fields.push(task.dependencies.join(","));
    }
    fields.join(FIELD_SEPARATOR)
}

/// Parse a whole file's contents, skipping blank lines.
pub fn parse_tasks(text: &str, config: &PlanConfig) -> Result<Vec<Task>, StorageError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            parse_line(line, config).map_err(|source| StorageError::Parse {
                line: idx + 1,
                source,
            })
        })
        .collect()
}

pub fn format_tasks(tasks: &[Task]) -> String {
    tasks
        .iter()
        .map(|task| format_line(task) + "\n")
        .collect()
}

/// Load tasks from `path`. A missing file is an empty project.
pub fn load_tasks(path: impl AsRef<Path>, config: &PlanConfig) -> Result<Vec<Task>, StorageError> {
    match fs::read_to_string(path) {
        Ok(text) => parse_tasks(&text, config),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e.into()),
    }
}

/// Write `tasks` to `path`. Nothing is written if any task fails [`Task::check`].
pub fn save_tasks(path: impl AsRef<Path>, tasks: &[Task]) -> Result<(), StorageError> {
    for task in tasks {
        task.check()?;
    }
    fs::write(path, format_tasks(tasks))?;
    Ok(())
}

/// Load a file straight into a repository, rejecting duplicate names.
pub fn load_repository(
    path: impl AsRef<Path>,
    config: PlanConfig,
) -> Result<TaskRepository, StorageError> {
    let tasks = load_tasks(path, &config)?;
    Ok(TaskRepository::from_tasks(tasks, config)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    #[test]
    fn test_parse_full_line() {
        let task = parse_line("build - 4 days - 2 - bob - design,review", &PlanConfig::default())
            .unwrap();
        assert_eq!(task.name, "build");
        assert_eq!(task.estimate, DurationSpec::Fixed(4.0));
        assert_eq!(task.priority, 2);
        assert_eq!(task.assigned_to, "bob");
        assert_eq!(task.dependencies, vec!["design", "review"]);
    }

    #[test]
    fn test_parse_pert_and_defaults() {
        let config = PlanConfig {
            default_priority: 7,
            ..PlanConfig::default()
        };
        let task = parse_line("design - 1/2/9 days", &config).unwrap();
        assert!((task.intrinsic_duration() - 3.0).abs() < 1e-9);
        assert_eq!(task.priority, 7);
        assert_eq!(task.assigned_to, "");
        assert!(task.dependencies.is_empty());
    }

    #[test]
    fn test_parse_dash_owner_is_kept() {
        let task = parse_line("a - 2 days - 0 - -", &PlanConfig::default()).unwrap();
        assert_eq!(task.assigned_to, "-");
        assert!(task.dependencies.is_empty());
    }

    #[test]
    fn test_format_line() {
        let task = Task::new("b", DurationSpec::Fixed(3.5))
            .priority(1)
            .assigned_to("amy")
            .depends_on(["a"]);
        assert_eq!(format_line(&task), "b - 3.5 days - 1 - amy - a");

        let plain = Task::new("a", DurationSpec::pert(1.0, 2.0, 3.0).unwrap());
        assert_eq!(format_line(&plain), "a - 1/2/3 days - 0");

        let unowned = Task::new("c", DurationSpec::Fixed(1.0)).depends_on(["a", "b"]);
        assert_eq!(format_line(&unowned), "c - 1 days - 0 -  - a,b");
    }

    #[test]
    fn test_awkward_but_valid_fields_survive_roundtrip() {
        let fixed = DurationSpec::Fixed(1.0);
        let tasks = vec![
            Task::new("- draft", fixed).assigned_to("-"),
            Task::new("review-v2", fixed)
                .assigned_to("Mary-Jane, QA")
                .depends_on(["- draft"]),
            Task::new("ship", fixed).depends_on(["review-v2", "- draft"]),
        ];
        for task in &tasks {
            assert_eq!(task.check(), Ok(()));
        }
        let parsed = parse_tasks(&format_tasks(&tasks), &PlanConfig::default()).unwrap();
        assert_eq!(parsed, tasks);
    }

    #[test]
    fn test_save_rejects_fields_that_would_not_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.txt");
        let fixed = DurationSpec::Fixed(1.0);

        for task in [
            Task::new("x", fixed).assigned_to("R - D"),
            Task::new("a,b", fixed),
            Task::new("x", fixed).depends_on(["p - q"]),
        ] {
            assert!(matches!(
                save_tasks(&path, &[task]),
                Err(StorageError::Task(TaskError::InvalidInput { .. }))
            ));
        }
        assert!(!path.exists());

        let mut repo = TaskRepository::default();
        assert!(matches!(
            repo.add(Task::new("x", fixed).assigned_to("R - D")),
            Err(TaskError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_parse_reports_line_numbers() {
        let text = "a - 1 days\n\nb - x days\n";
        match parse_tasks(text, &PlanConfig::default()) {
            Err(StorageError::Parse { line, source }) => {
                assert_eq!(line, 3);
                assert!(matches!(source, TaskError::InvalidInput { .. }));
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_bad_estimates() {
        assert!(matches!(
            parse_line("a - 9/2/1 days", &PlanConfig::default()),
            Err(TaskError::InvalidEstimate(_))
        ));
        assert!(matches!(
            parse_line("lonely", &PlanConfig::default()),
            Err(TaskError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_text_roundtrip_keeps_order() {
        let tasks = vec![
            Task::new("z", DurationSpec::Fixed(1.0)).assigned_to("amy"),
            Task::new("a", DurationSpec::pert(1.0, 2.0, 9.0).unwrap())
                .priority(3)
                .depends_on(["z"]),
        ];
        let parsed = parse_tasks(&format_tasks(&tasks), &PlanConfig::default()).unwrap();
        assert_eq!(parsed, tasks);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let tasks = load_tasks(dir.path().join("tasks.txt"), &PlanConfig::default()).unwrap();
        assert!(tasks.is_empty());
    }

    #[test]
    fn test_file_roundtrip_into_repository() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.txt");
        let tasks = vec![
            Task::new("a", DurationSpec::Fixed(2.0)),
            Task::new("b", DurationSpec::Fixed(3.0)).depends_on(["a"]),
        ];
        save_tasks(&path, &tasks).unwrap();

        let mut repo = load_repository(&path, PlanConfig::default()).unwrap();
        assert_eq!(repo.project_duration(), Ok(5.0));
        assert_eq!(repo.into_tasks(), tasks);
    }

    #[test]
    fn test_duplicate_lines_rejected_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.txt");
        fs::write(&path, "a - 1 days\na - 2 days\n").unwrap();

        match load_repository(&path, PlanConfig::default()) {
            Err(StorageError::Task(TaskError::Validation(ValidationError::DuplicateName(n)))) => {
                assert_eq!(n, "a")
            }
            other => panic!("expected duplicate name, got {other:?}"),
        }
    }
}
