//! # ant_scavenge_py
//!
//! Python bindings for the ant scavenging environment.

mod environment;
mod policy;

use environment::{PyAnt, PyEnvironment, PyTransition};
use pyo3::prelude::*;

#[pymodule]
fn ant_scavenge_py(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyEnvironment>()?;
    m.add_class::<PyTransition>()?;
    m.add_class::<PyAnt>()?;
    Ok(())
}
