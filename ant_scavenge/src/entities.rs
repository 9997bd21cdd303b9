use crate::board::Layer;
use crate::error::Result;
use crate::point::Point;
use crate::policy::Policy;
use crate::view::View;

/// The environment's record of one ant.
pub struct Ant {
    id: String,
    position: Point,
    history: Vec<Point>,
    has_food: bool,
    // Cells this ant has stood on, seeded with every starting position of the colony
    seen: Layer,
    policy: Box<dyn Policy>,
}

impl Ant {
    pub fn new(id: String, position: Point, seen: Layer, policy: Box<dyn Policy>) -> Ant {
        Ant {
            id,
            position,
            history: vec![position],
            has_food: false,
            seen,
            policy,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn position(&self) -> Point {
        self.position
    }

    /// Every position the ant has held, one entry per step plus the start.
    pub fn history(&self) -> &[Point] {
        &self.history
    }

    pub fn has_food(&self) -> bool {
        self.has_food
    }

    pub fn seen(&self) -> &Layer {
        &self.seen
    }

    pub(crate) fn choose(&mut self, view: &View) -> Result<usize> {
        self.policy.choose(view)
    }

    pub(crate) fn move_to(&mut self, position: Point) {
        self.position = position;
        self.history.push(position);
    }

    /// Records a step where the ant did not move.
    pub(crate) fn stay(&mut self) {
        self.history.push(self.position);
    }

    pub(crate) fn set_has_food(&mut self, value: bool) {
        self.has_food = value;
    }

    /// Marks `position` as seen, returning whether it is the first visit.
    pub(crate) fn mark_seen(&mut self, position: Point) -> Result<bool> {
        let first_visit = !self.seen.get(position)?;
        self.seen.set(position, true)?;
        Ok(first_visit)
    }
}
