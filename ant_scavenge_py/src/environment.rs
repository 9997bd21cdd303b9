use crate::policy::PyPolicy;
use ant_scavenge::{
    Board, Environment, EnvironmentConfig, Policy, RandomPolicy, ScavengeError,
    TerminalVisualizer, TransitionRecord, Visualizer,
};
use pyo3::exceptions::{PyIOError, PyIndexError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;

/// The scavenging environment.
/// Main entry point for training agents from Python.
#[pyclass(name = "Environment", module = "ant_scavenge_py")]
pub struct PyEnvironment {
    inner: Environment,
    visualizer: TerminalVisualizer,
}

/// What one ant saw, did and earned during one step.
#[pyclass(name = "Transition", module = "ant_scavenge_py", get_all)]
#[derive(Clone)]
pub struct PyTransition {
    /// The id of the ant.
    pub ant_id: String,
    /// The view before moving, indexed `[channel][x][y]`.
    pub observation: Vec<Vec<Vec<f32>>>,
    /// The action id the ant took.
    pub action: usize,
    pub reward: f32,
    /// The view once every ant has moved.
    pub next_observation: Vec<Vec<Vec<f32>>>,
    /// The `(x, y)` position once every ant has moved.
    pub position: (i32, i32),
}

/// The state of one ant.
#[pyclass(name = "Ant", module = "ant_scavenge_py", get_all)]
#[derive(Clone)]
pub struct PyAnt {
    pub id: String,
    pub position: (i32, i32),
    pub has_food: bool,
}

#[pymethods]
impl PyEnvironment {
    /// Creates a new environment on a freshly generated board.
    ///
    /// # Arguments
    /// * `agent` - Object with a `get_action(view)` method driving every ant. If `None`, ants move at random.
    /// * `width` - The width of the board.
    /// * `height` - The height of the board.
    /// * `seed` - The seed for the random number generator. If `None`, the seed is drawn from entropy.
    /// * `carrying_reward_shaping` - Whether ants carrying food still earn the exploration reward.
    /// * `replay_filename` - The filename to save the replay to. If `None`, no replay will be saved.
    #[new]
    #[pyo3(signature = (agent=None, width=25, height=25, seed=None, carrying_reward_shaping=true, replay_filename=None))]
    pub fn new(
        agent: Option<Py<PyAny>>,
        width: usize,
        height: usize,
        seed: Option<u64>,
        carrying_reward_shaping: bool,
        replay_filename: Option<String>,
    ) -> PyResult<PyEnvironment> {
        let config = EnvironmentConfig {
            width,
            height,
            seed,
            carrying_reward_shaping,
            replay_filename,
            ..EnvironmentConfig::default()
        };

        let inner = Environment::with_policies(config, policy_factory(agent))
            .map_err(to_py_err)?;
        Ok(PyEnvironment::wrap(inner))
    }

    /// Creates an environment on a board given in its textual form.
    ///
    /// Only the first episode uses that board, `reset` generates a new one of `width` by `height`.
    #[staticmethod]
    #[pyo3(signature = (contents, agent=None, width=25, height=25, seed=None, replay_filename=None))]
    pub fn from_board(
        contents: &str,
        agent: Option<Py<PyAny>>,
        width: usize,
        height: usize,
        seed: Option<u64>,
        replay_filename: Option<String>,
    ) -> PyResult<PyEnvironment> {
        let board = Board::parse(contents).map_err(to_py_err)?;
        let config = EnvironmentConfig {
            width,
            height,
            seed,
            replay_filename,
            ..EnvironmentConfig::default()
        };

        let inner = Environment::from_board(board, config, policy_factory(agent))
            .map_err(to_py_err)?;
        Ok(PyEnvironment::wrap(inner))
    }

    /// Starts a new episode on a new board.
    pub fn reset(&mut self) -> PyResult<()> {
        self.inner.reset().map_err(to_py_err)
    }

    /// Moves every ant once and returns one transition per ant, in the order they moved.
    pub fn step(&mut self) -> PyResult<Vec<PyTransition>> {
        let records = self.inner.step().map_err(to_py_err)?;
        Ok(records.into_iter().map(to_transition).collect())
    }

    /// The board as text, one line per row.
    #[getter]
    pub fn board(&self) -> String {
        self.inner.board().to_string()
    }

    #[getter]
    pub fn ants(&self) -> Vec<PyAnt> {
        self.inner
            .ants()
            .iter()
            .map(|ant| PyAnt {
                id: ant.id().to_string(),
                position: ant.position().into(),
                has_food: ant.has_food(),
            })
            .collect()
    }

    #[getter]
    pub fn turn(&self) -> usize {
        self.inner.turn()
    }

    #[getter]
    pub fn food_collected(&self) -> usize {
        self.inner.food_collected()
    }

    #[getter]
    pub fn food_delivered(&self) -> usize {
        self.inner.food_delivered()
    }

    /// Draws the board to the console.
    pub fn draw(&mut self) -> PyResult<()> {
        self.visualizer
            .show(self.inner.board())
            .map_err(to_py_err)
    }

    /// Writes the replay of the current episode, if a replay filename was given.
    pub fn save_replay(&self) -> PyResult<()> {
        self.inner.save_replay().map_err(to_py_err)
    }
}

impl PyEnvironment {
    fn wrap(inner: Environment) -> PyEnvironment {
        PyEnvironment {
            inner,
            visualizer: TerminalVisualizer::new(),
        }
    }
}

fn policy_factory(
    agent: Option<Py<PyAny>>,
) -> impl FnMut(usize, u64) -> Box<dyn Policy> + Send + Sync + 'static {
    move |_, seed| -> Box<dyn Policy> {
        match &agent {
            Some(agent) => {
                let agent = Python::with_gil(|py| agent.clone_ref(py));
                Box::new(PyPolicy::new(agent))
            }
            None => Box::new(RandomPolicy::new(seed)),
        }
    }
}

fn to_transition(record: TransitionRecord) -> PyTransition {
    PyTransition {
        ant_id: record.ant_id,
        observation: record.observation.to_nested(),
        action: record.action.id(),
        reward: record.reward,
        next_observation: record.next_observation.to_nested(),
        position: record.position.into(),
    }
}

fn to_py_err(error: ScavengeError) -> PyErr {
    match error {
        ScavengeError::Configuration(_)
        | ScavengeError::Parse(_)
        | ScavengeError::PointArity(_)
        | ScavengeError::InvalidAction(_) => PyValueError::new_err(error.to_string()),
        ScavengeError::OutOfBounds { .. } => PyIndexError::new_err(error.to_string()),
        ScavengeError::Io(_) | ScavengeError::Json(_) => PyIOError::new_err(error.to_string()),
        ScavengeError::Policy(_) => PyRuntimeError::new_err(error.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ant_scavenge::{Point, ScriptedPolicy};
    use pyo3::ffi::c_str;
    use pyo3::types::{PyModule, PyTuple};
    use std::io;

    const CORRIDOR: &str = "\
        rows 3
        cols 5
        m wwwww
        m wa..w
        m wwwww";

    fn fixed_agent(action: i64) -> Py<PyAny> {
        pyo3::prepare_freethreaded_python();
        Python::with_gil(|py| {
            let module = PyModule::from_code(
                py,
                c_str!(
                    r#"
class Fixed:
    def __init__(self, action):
        self.action = action

    def get_action(self, view):
        return self.action
"#
                ),
                c_str!("fixed.py"),
                c_str!("fixed"),
            )
            .unwrap();
            module
                .getattr("Fixed")
                .unwrap()
                .call1(PyTuple::new(py, [action]).unwrap())
                .unwrap()
                .unbind()
        })
    }

    #[test]
    fn when_converting_errors_each_kind_maps_to_its_python_exception() {
        pyo3::prepare_freethreaded_python();
        Python::with_gil(|py| {
            let configuration = to_py_err(ScavengeError::Configuration("too small".to_string()));
            assert!(configuration.is_instance_of::<PyValueError>(py));
            assert!(configuration.to_string().contains("too small"));

            assert!(to_py_err(ScavengeError::InvalidAction(-3)).is_instance_of::<PyValueError>(py));
            assert!(to_py_err(ScavengeError::Parse("bad".to_string())).is_instance_of::<PyValueError>(py));
            assert!(to_py_err(ScavengeError::PointArity(3)).is_instance_of::<PyValueError>(py));
            assert!(to_py_err(ScavengeError::OutOfBounds { x: -1, y: 0 })
                .is_instance_of::<PyIndexError>(py));
            assert!(to_py_err(ScavengeError::Policy("boom".to_string()))
                .is_instance_of::<PyRuntimeError>(py));
            assert!(to_py_err(ScavengeError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                "missing"
            )))
            .is_instance_of::<PyIOError>(py));
        });
    }

    #[test]
    fn when_converting_a_record_the_views_become_nested_lists() {
        let board = Board::parse(CORRIDOR).unwrap();
        let config = EnvironmentConfig {
            seed: Some(0),
            ..EnvironmentConfig::default()
        };
        let mut environment = Environment::from_board(board, config, |_, _| {
            Box::new(ScriptedPolicy::new(vec![2]))
        })
        .unwrap();

        let record = environment.step().unwrap().remove(0);
        let transition = to_transition(record.clone());

        assert_eq!(transition.ant_id, record.ant_id);
        assert_eq!(transition.action, 2);
        assert_eq!(transition.reward, 0.01);
        assert_eq!(transition.position, (2, 1));
        assert_eq!(transition.observation, record.observation.to_nested());
        assert_eq!(transition.next_observation.len(), 5);
        assert_eq!(transition.next_observation[2][2][2], 1.0);
    }

    #[test]
    fn when_stepping_with_a_python_agent_the_transitions_are_returned() {
        let mut environment =
            PyEnvironment::from_board(CORRIDOR, Some(fixed_agent(2)), 25, 25, Some(0), None).unwrap();

        let transitions = environment.step().unwrap();

        assert_eq!(transitions.len(), 1);
        assert_eq!(transitions[0].position, (2, 1));
        assert_eq!(environment.turn(), 1);
        assert_eq!(environment.ants()[0].position, (2, 1));
        assert_eq!(environment.board().lines().nth(1), Some("w a w"));
    }

    #[test]
    fn when_a_python_agent_returns_a_negative_id_stepping_raises_a_value_error() {
        let mut environment =
            PyEnvironment::from_board(CORRIDOR, Some(fixed_agent(-1)), 25, 25, Some(0), None).unwrap();

        let error = environment.step().err().unwrap();

        Python::with_gil(|py| assert!(error.is_instance_of::<PyValueError>(py)));
        assert_eq!(environment.turn(), 0);
        assert_eq!(environment.ants()[0].position, Point::new(1, 1).into());
    }

    #[test]
    fn when_creating_an_environment_with_random_ants_a_colony_is_spawned() {
        let environment = PyEnvironment::new(None, 25, 25, Some(0), true, None).unwrap();

        assert_eq!(environment.ants().len(), 12);
        assert_eq!(environment.board().lines().count(), 25);
    }

    #[test]
    fn when_the_board_is_too_small_creating_an_environment_raises_a_value_error() {
        pyo3::prepare_freethreaded_python();
        let error = PyEnvironment::new(None, 10, 25, Some(0), true, None).err().unwrap();

        Python::with_gil(|py| assert!(error.is_instance_of::<PyValueError>(py)));
    }
}
