//! Task planning with a dependency-graph duration engine.
//!
//! Tasks carry a fixed or PERT estimate and name the tasks they wait on. The
//! engine validates the graph, evaluates every task once in topological order
//! and reports per-task earliest finish times, the project duration and the
//! critical path. A Python module exposes the repository via PyO3.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use std::path::PathBuf;

use pyo3::exceptions::{PyIOError, PyKeyError, PyValueError};
use pyo3::prelude::*;

mod config;
pub mod critical_path;
mod error;
pub mod estimate;
pub mod graph;
pub mod input;
mod interner;
pub mod logging;
mod models;
pub mod report;
mod repository;
pub mod storage;

pub use config::PlanConfig;
pub use critical_path::{
    cumulative_duration, schedule, schedule_with_verbosity, ScheduleCache, ScheduleResult,
    TaskTiming,
};
pub use error::{TaskError, ValidationError};
pub use estimate::{intrinsic_duration, pert_estimate, DurationSpec, EstimateUpdate};
pub use graph::validate;
pub use input::RawTaskFields;
pub use models::{Task, TaskEdit};
pub use report::{render_gantt, render_task_list, ChartRow};
pub use repository::TaskRepository;
pub use storage::StorageError;

fn task_error_to_py(err: TaskError) -> PyErr {
    match &err {
        TaskError::TaskNotFound(_) => PyKeyError::new_err(err.to_string()),
        _ => PyValueError::new_err(err.to_string()),
    }
}

fn storage_error_to_py(err: StorageError) -> PyErr {
    match err {
        StorageError::Io(e) => PyIOError::new_err(e.to_string()),
        StorageError::Task(e) => task_error_to_py(e),
        other => PyValueError::new_err(other.to_string()),
    }
}

/// Validated PERT expected duration `(o + 4m + p) / 6`.
///
/// # Raises
/// * ValueError if any point is negative or the points are out of order
#[pyfunction]
#[pyo3(name = "pert_estimate")]
fn py_pert_estimate(optimistic: f64, most_likely: f64, pessimistic: f64) -> PyResult<f64> {
    DurationSpec::pert(optimistic, most_likely, pessimistic)
        .map(|spec| spec.expected())
        .map_err(task_error_to_py)
}

/// Task repository (PyO3 wrapper).
#[pyclass(name = "TaskRepository")]
pub struct PyTaskRepository {
    inner: TaskRepository,
}

#[pymethods]
impl PyTaskRepository {
    #[new]
    #[pyo3(signature = (config=None))]
    fn new(config: Option<PlanConfig>) -> Self {
        Self {
            inner: TaskRepository::new(config.unwrap_or_default()),
        }
    }

    /// Load tasks from a file; a missing file gives an empty repository.
    #[staticmethod]
    #[pyo3(signature = (path, config=None))]
    fn load(path: PathBuf, config: Option<PlanConfig>) -> PyResult<Self> {
        let inner = storage::load_repository(path, config.unwrap_or_default())
            .map_err(storage_error_to_py)?;
        Ok(Self { inner })
    }

    fn save(&self, path: PathBuf) -> PyResult<()> {
        storage::save_tasks(path, self.inner.tasks()).map_err(storage_error_to_py)
    }

    /// Add a task with either `duration` or all three PERT points.
    ///
    /// # Raises
    /// * ValueError on a duplicate name, empty name or invalid estimate
    #[pyo3(signature = (
        name,
        duration=None,
        optimistic=None,
        most_likely=None,
        pessimistic=None,
        assigned_to=String::new(),
        priority=None,
        dependencies=Vec::new()
    ))]
    #[allow(clippy::too_many_arguments)]
    fn add_task(
        &mut self,
        name: String,
        duration: Option<f64>,
        optimistic: Option<f64>,
        most_likely: Option<f64>,
        pessimistic: Option<f64>,
        assigned_to: String,
        priority: Option<i32>,
        dependencies: Vec<String>,
    ) -> PyResult<()> {
        let estimate = EstimateUpdate::from_parts(
            duration.map(DurationSpec::Fixed),
            optimistic,
            most_likely,
            pessimistic,
        )
        .and_then(|update| {
            update
                .ok_or_else(|| TaskError::invalid_input("duration", ""))?
                .into_estimate()
        })
        .map_err(task_error_to_py)?;

        let priority = priority.unwrap_or(self.inner.config().default_priority);
        let task = Task::new(name, estimate)
            .assigned_to(assigned_to)
            .priority(priority)
            .depends_on(dependencies);
        self.inner.add(task).map_err(task_error_to_py)
    }

    /// Partially update a task; omitted arguments keep their current values.
    ///
    /// # Raises
    /// * KeyError if the task does not exist
    /// * ValueError on a name collision or invalid estimate
    #[pyo3(signature = (
        name,
        new_name=None,
        duration=None,
        optimistic=None,
        most_likely=None,
        pessimistic=None,
        assigned_to=None,
        priority=None,
        dependencies=None
    ))]
    #[allow(clippy::too_many_arguments)]
    fn edit_task(
        &mut self,
        name: &str,
        new_name: Option<String>,
        duration: Option<f64>,
        optimistic: Option<f64>,
        most_likely: Option<f64>,
        pessimistic: Option<f64>,
        assigned_to: Option<String>,
        priority: Option<i32>,
        dependencies: Option<Vec<String>>,
    ) -> PyResult<()> {
        let estimate = EstimateUpdate::from_parts(
            duration.map(DurationSpec::Fixed),
            optimistic,
            most_likely,
            pessimistic,
        )
        .map_err(task_error_to_py)?;

        let edit = TaskEdit {
            name: new_name,
            estimate,
            assigned_to,
            dependencies,
            priority,
        };
        self.inner
            .edit(name, &edit)
            .map(|_| ())
            .map_err(task_error_to_py)
    }

    fn delete_task(&mut self, name: &str) -> PyResult<()> {
        self.inner
            .delete(name)
            .map(|_| ())
            .map_err(task_error_to_py)
    }

    fn validate(&self) -> PyResult<()> {
        self.inner
            .validate()
            .map_err(|e| PyValueError::new_err(e.to_string()))
    }

    /// Earliest finish of a task including its dependency chain.
    fn task_duration(&mut self, name: &str) -> PyResult<f64> {
        self.inner.task_duration(name).map_err(task_error_to_py)
    }

    fn project_duration(&mut self) -> PyResult<f64> {
        self.inner.project_duration().map_err(task_error_to_py)
    }

    fn critical_path(&mut self) -> PyResult<Vec<String>> {
        self.inner.critical_path().map_err(task_error_to_py)
    }

    /// (name, earliest_start, earliest_finish, slack) per task in evaluation order.
    fn schedule(&mut self) -> PyResult<Vec<(String, f64, f64, f64)>> {
        let result = self.inner.schedule().map_err(task_error_to_py)?;
        Ok(result
            .order
            .iter()
            .filter_map(|name| {
                result.timing(name).map(|t| {
                    (
                        name.clone(),
                        t.earliest_start,
                        t.earliest_finish,
                        t.slack,
                    )
                })
            })
            .collect())
    }

    fn task_names(&self) -> Vec<String> {
        self.inner.names().map(String::from).collect()
    }

    fn task_list(&self) -> String {
        render_task_list(self.inner.tasks())
    }

    fn gantt_chart(&self) -> String {
        render_gantt(&self.inner.chart_rows(), self.inner.config())
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }

    fn __repr__(&self) -> String {
        format!("TaskRepository(tasks={})", self.inner.len())
    }
}

/// The taskplan Python module.
#[pymodule]
fn taskplan(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PlanConfig>()?;
    m.add_class::<PyTaskRepository>()?;
    m.add_function(wrap_pyfunction!(py_pert_estimate, m)?)?;
    Ok(())
}
