use crate::error::{Result, ScavengeError};
use crate::point::Point;
use crate::view::View;
use rand::distributions::{Distribution, Standard};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A move an ant can make in one step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Action {
    Stay,
    North,
    East,
    South,
    West,
}

impl Action {
    /// All actions, ordered by their id.
    pub const ALL: [Action; 5] = [
        Action::Stay,
        Action::North,
        Action::East,
        Action::South,
        Action::West,
    ];

    pub fn id(self) -> usize {
        self as usize
    }

    /// The offset applied to the position of an ant taking this action.
    pub fn delta(self) -> Point {
        match self {
            Action::Stay => Point::new(0, 0),
            Action::North => Point::new(0, 1),
            Action::East => Point::new(1, 0),
            Action::South => Point::new(0, -1),
            Action::West => Point::new(-1, 0),
        }
    }
}

impl TryFrom<usize> for Action {
    type Error = ScavengeError;

    fn try_from(id: usize) -> Result<Action> {
        Action::ALL
            .get(id)
            .copied()
            .ok_or_else(|| ScavengeError::InvalidAction(i64::try_from(id).unwrap_or(i64::MAX)))
    }
}

/// Action ids coming from outside of Rust may be negative.
impl TryFrom<i64> for Action {
    type Error = ScavengeError;

    fn try_from(id: i64) -> Result<Action> {
        usize::try_from(id)
            .ok()
            .and_then(|index| Action::ALL.get(index).copied())
            .ok_or(ScavengeError::InvalidAction(id))
    }
}

impl Distribution<Action> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Action {
        Action::ALL[rng.gen_range(0..Action::ALL.len())]
    }
}

/// Decides what an ant does given what it sees.
///
/// Returns an action id, see [`Action::ALL`].
pub trait Policy: Send + Sync {
    fn choose(&mut self, view: &View) -> Result<usize>;
}

/// Picks one of the actions uniformly at random.
pub struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> RandomPolicy {
        RandomPolicy {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Policy for RandomPolicy {
    fn choose(&mut self, _view: &View) -> Result<usize> {
        let action: Action = self.rng.gen();
        Ok(action.id())
    }
}

/// Replays a fixed list of action ids, then stays put.
pub struct ScriptedPolicy {
    actions: Vec<usize>,
    next: usize,
}

impl ScriptedPolicy {
    pub fn new(actions: Vec<usize>) -> ScriptedPolicy {
        ScriptedPolicy { actions, next: 0 }
    }
}

impl Policy for ScriptedPolicy {
    fn choose(&mut self, _view: &View) -> Result<usize> {
        let action = self
            .actions
            .get(self.next)
            .copied()
            .unwrap_or(Action::Stay.id());
        self.next += 1;
        Ok(action)
    }
}
