//! Python bindings (feature `python`).

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::config::EngineConfig;
use crate::critical_path::compute_critical_path_with_config;
use crate::cycle_guard::{check_and_prepare_insert, would_create_cycle};
use crate::error::EngineError;
use crate::models::{DependencyEdge, Task, TaskId};

fn to_py_err(err: EngineError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn to_edges(edges: Vec<(TaskId, TaskId)>) -> Vec<DependencyEdge> {
    edges
        .into_iter()
        .map(|(from, to)| DependencyEdge::new(from, to))
        .collect()
}

/// Task as seen from Python.
#[pyclass(name = "Task")]
#[derive(Clone, Debug)]
pub struct PyTask {
    #[pyo3(get, set)]
    pub id: TaskId,
    #[pyo3(get, set)]
    pub title: String,
    #[pyo3(get, set)]
    pub created_at: DateTime<Utc>,
    #[pyo3(get, set)]
    pub due_date: Option<DateTime<Utc>>,
    #[pyo3(get, set)]
    pub image_url: Option<String>,
}

#[pymethods]
impl PyTask {
    #[new]
    #[pyo3(signature = (id, title, created_at, due_date=None, image_url=None))]
    fn new(
        id: TaskId,
        title: String,
        created_at: DateTime<Utc>,
        due_date: Option<DateTime<Utc>>,
        image_url: Option<String>,
    ) -> Self {
        Self {
            id,
            title,
            created_at,
            due_date,
            image_url,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "Task(id={}, title={:?}, due_date={:?})",
            self.id, self.title, self.due_date
        )
    }
}

impl TryFrom<PyTask> for Task {
    type Error = EngineError;

    fn try_from(py: PyTask) -> Result<Self, Self::Error> {
        Ok(Task::new(py.id, py.title, py.created_at)?
            .with_due_date(py.due_date)
            .with_image_url(py.image_url))
    }
}

/// Critical path query result.
#[pyclass(name = "CriticalPathResult")]
#[derive(Clone, Debug, Default)]
pub struct PyCriticalPathResult {
    #[pyo3(get)]
    pub critical_path: Vec<TaskId>,
    #[pyo3(get)]
    pub earliest_start: HashMap<TaskId, Option<DateTime<Utc>>>,
    #[pyo3(get)]
    pub chain_lengths: HashMap<TaskId, usize>,
}

#[pymethods]
impl PyCriticalPathResult {
    fn __repr__(&self) -> String {
        format!(
            "CriticalPathResult(critical_path={:?}, tasks={})",
            self.critical_path,
            self.earliest_start.len()
        )
    }
}

/// Compute the critical path and earliest starts.
///
/// # Raises
/// * ValueError if a task is invalid or the edge set contains a cycle
#[pyfunction]
#[pyo3(name = "compute_critical_path", signature = (tasks, edges, verbosity=0))]
fn py_compute_critical_path(
    tasks: Vec<PyTask>,
    edges: Vec<(TaskId, TaskId)>,
    verbosity: u8,
) -> PyResult<PyCriticalPathResult> {
    let tasks = tasks
        .into_iter()
        .map(Task::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(to_py_err)?;
    let config = EngineConfig::with_verbosity(verbosity);

    let result =
        compute_critical_path_with_config(&tasks, &to_edges(edges), &config).map_err(to_py_err)?;

    Ok(PyCriticalPathResult {
        critical_path: result.critical_path,
        earliest_start: result.earliest_start.into_iter().collect(),
        chain_lengths: result
            .task_timings
            .into_iter()
            .map(|(id, timing)| (id, timing.chain_length))
            .collect(),
    })
}

/// Check whether `from -> to` would close a cycle in `edges`.
#[pyfunction]
#[pyo3(name = "would_create_cycle")]
fn py_would_create_cycle(from: TaskId, to: TaskId, edges: Vec<(TaskId, TaskId)>) -> bool {
    would_create_cycle(from, to, &to_edges(edges))
}

/// Validate a candidate edge, returning it as `(from, to)` if accepted.
///
/// # Raises
/// * ValueError on self-dependency, unknown task, or cycle
#[pyfunction]
#[pyo3(name = "check_and_prepare_insert")]
fn py_check_and_prepare_insert(
    from: TaskId,
    to: TaskId,
    tasks: Vec<PyTask>,
    edges: Vec<(TaskId, TaskId)>,
) -> PyResult<(TaskId, TaskId)> {
    let tasks = tasks
        .into_iter()
        .map(Task::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(to_py_err)?;

    let edge = check_and_prepare_insert(from, to, &tasks, &to_edges(edges))
        .into_result(from, to)
        .map_err(to_py_err)?;
    Ok((edge.from_id, edge.to_id))
}

/// Install a stderr log subscriber. Returns False if one was already set.
#[pyfunction]
#[pyo3(name = "init_logging", signature = (verbosity=1))]
fn py_init_logging(verbosity: u8) -> bool {
    crate::logging::init_logging(verbosity)
}

/// The taskdeps.rust Python module.
#[pymodule]
fn rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyTask>()?;
    m.add_class::<PyCriticalPathResult>()?;

    m.add_function(wrap_pyfunction!(py_compute_critical_path, m)?)?;
    m.add_function(wrap_pyfunction!(py_would_create_cycle, m)?)?;
    m.add_function(wrap_pyfunction!(py_check_and_prepare_insert, m)?)?;
    m.add_function(wrap_pyfunction!(py_init_logging, m)?)?;

    Ok(())
}
