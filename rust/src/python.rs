//! Python bindings (enabled with the `python` feature).
//!
//! The host application keeps plans as JSON, so the bindings take and return
//! plan documents as strings.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::config::{ScheduleConfig, TieBreak, ValidationMode};
use crate::models::Plan;

fn to_py_err(err: impl std::fmt::Display) -> PyErr {
    PyValueError::new_err(err.to_string())
}

/// Schedule a plan document and return it with computed fields filled in.
///
/// # Arguments
/// * `plan_json` - The plan document
/// * `strict` - Reject plans with any validation issue (otherwise only fatal ones)
/// * `tie_break` - "input_order" or "id_ascending"
/// * `verbosity` - 0=silent, 1=changes, 2=checks, 3=debug
///
/// # Raises
/// * ValueError if the document or configuration is invalid
#[pyfunction]
#[pyo3(signature = (plan_json, strict=true, tie_break="input_order", verbosity=0))]
fn calculate_plan(plan_json: &str, strict: bool, tie_break: &str, verbosity: u8) -> PyResult<String> {
    let validation = if strict {
        ValidationMode::Strict
    } else {
        ValidationMode::Lenient
    };
    let config = ScheduleConfig::default()
        .with_validation(validation)
        .with_tie_break(tie_break.parse::<TieBreak>().map_err(to_py_err)?)
        .with_verbosity(verbosity);

    crate::calculate_json(plan_json, &config).map_err(to_py_err)
}

/// List the validation issues of a plan document as messages.
#[pyfunction]
fn validate_plan(plan_json: &str) -> PyResult<Vec<String>> {
    let plan = Plan::from_json(plan_json).map_err(to_py_err)?;
    Ok(crate::validate(&plan)
        .iter()
        .map(ToString::to_string)
        .collect())
}

/// The plan_engine Python module.
#[pymodule]
fn plan_engine(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(calculate_plan, m)?)?;
    m.add_function(wrap_pyfunction!(validate_plan, m)?)?;
    Ok(())
}
