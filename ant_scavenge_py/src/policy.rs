use ant_scavenge::{Action, Policy, ScavengeError, View};
use pyo3::prelude::*;

/// Lets a Python object drive an ant.
///
/// The object must expose `get_action(view)`, receiving the view as nested lists indexed
/// `[channel][x][y]` and returning an action id.
pub struct PyPolicy {
    agent: Py<PyAny>,
}

impl PyPolicy {
    pub fn new(agent: Py<PyAny>) -> PyPolicy {
        PyPolicy { agent }
    }
}

impl Policy for PyPolicy {
    fn choose(&mut self, view: &View) -> ant_scavenge::Result<usize> {
        let id = Python::with_gil(|py| {
            self.agent
                .call_method1(py, "get_action", (view.to_nested(),))
                .and_then(|action| action.extract::<i64>(py))
                .map_err(|e| ScavengeError::Policy(e.to_string()))
        })?;

        // Negative ids are still actions outside of the set, not policy failures
        Action::try_from(id).map(Action::id)
    }
}
