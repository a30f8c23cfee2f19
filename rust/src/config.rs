//! Configuration for the task planner.

use pyo3::prelude::*;

/// Settings shared by the repository, the storage codec and the chart renderer.
#[pyclass]
#[derive(Clone, Debug, PartialEq)]
pub struct PlanConfig {
    /// Verbosity level: 0=silent, 1=changes, 2=checks, 3=debug.
    #[pyo3(get, set)]
    pub verbosity: u8,
    /// Priority given to tasks that do not state one.
    #[pyo3(get, set)]
    pub default_priority: i32,
    /// Width of the `=` rule framing each owner in the Gantt chart.
    #[pyo3(get, set)]
    pub chart_rule_width: usize,
    /// Character repeated once per whole day in Gantt bars.
    #[pyo3(get, set)]
    pub chart_bar: char,
    /// Longest Gantt bar drawn, in characters; longer tasks are cut off.
    #[pyo3(get, set)]
    pub chart_max_bar: usize,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            verbosity: 0,
            default_priority: 0,
            chart_rule_width: 30,
            chart_bar: '#',
            chart_max_bar: 120,
        }
    }
}

#[pymethods]
impl PlanConfig {
    #[new]
    #[pyo3(signature = (
        verbosity=0,
        default_priority=0,
        chart_rule_width=30,
        chart_bar='#',
        chart_max_bar=120
    ))]
    fn new(
        verbosity: u8,
        default_priority: i32,
        chart_rule_width: usize,
        chart_bar: char,
        chart_max_bar: usize,
    ) -> Self {
        Self {
            verbosity,
            default_priority,
            chart_rule_width,
            chart_bar,
            chart_max_bar,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "PlanConfig(verbosity={}, default_priority={}, chart_rule_width={}, chart_bar={:?}, chart_max_bar={})",
            self.verbosity,
            self.default_priority,
            self.chart_rule_width,
            self.chart_bar,
            self.chart_max_bar
        )
    }
}
