use crate::board::{Board, LayerKind};
use crate::config::{check_generation, EnvironmentConfig, MIN_SIDE};
use crate::error::{Result, ScavengeError};
use crate::point::Point;
use rand::Rng;
use tracing::{debug, warn};

/// Distance kept from every edge by the mound and food cluster centers.
const CENTER_MARGIN: i32 = 4;
/// The food cluster center must be strictly further than this from the mound center on both axes.
const FOOD_CLEARANCE: i32 = 6;

/// Lays out new boards.
///
/// Every stage only writes to cells that no earlier stage has claimed, on any layer.
#[derive(Clone, Debug)]
pub struct BoardGenerator {
    food_cluster_retries: usize,
    food_scatter_probability: f64,
    wall_scatter_probability: f64,
}

impl Default for BoardGenerator {
    fn default() -> Self {
        BoardGenerator::new(&EnvironmentConfig::default())
    }
}

impl BoardGenerator {
    pub fn new(config: &EnvironmentConfig) -> BoardGenerator {
        BoardGenerator {
            food_cluster_retries: config.food_cluster_retries,
            food_scatter_probability: config.food_scatter_probability,
            wall_scatter_probability: config.wall_scatter_probability,
        }
    }

    /// Builds a board with a randomly placed mound.
    pub fn build<R: Rng + ?Sized>(&self, width: usize, height: usize, rng: &mut R) -> Result<Board> {
        check_shape(width, height)?;

        let x = rng.gen_range(CENTER_MARGIN..width as i32 - CENTER_MARGIN);
        let y = rng.gen_range(CENTER_MARGIN..height as i32 - CENTER_MARGIN);

        self.build_around(width, height, Point::new(x, y), rng)
    }

    /// Builds a board with the mound centered on `mound_center`.
    pub fn build_around<R: Rng + ?Sized>(
        &self,
        width: usize,
        height: usize,
        mound_center: Point,
        rng: &mut R,
    ) -> Result<Board> {
        check_shape(width, height)?;
        self.check_settings()?;
        if !in_center_range(mound_center.x, width) || !in_center_range(mound_center.y, height) {
            return Err(ScavengeError::Configuration(format!(
                "mound center {} must be at least {} cells from every edge",
                mound_center, CENTER_MARGIN
            )));
        }

        let mut board = Board::new(width, height);

        place_mound_and_ants(&mut board, mound_center)?;
        let food_center = self.place_food_cluster(&mut board, mound_center, rng)?;
        scatter(&mut board, LayerKind::Food, self.food_scatter_probability, rng)?;
        place_border_walls(&mut board)?;
        scatter(&mut board, LayerKind::Walls, self.wall_scatter_probability, rng)?;

        check_border(&board)?;
        board.validate()?;

        debug!(
            %mound_center,
            %food_center,
            food = board.food().count(),
            walls = board.walls().count(),
            "generated board"
        );

        Ok(board)
    }

    fn check_settings(&self) -> Result<()> {
        check_generation(
            self.food_cluster_retries,
            self.food_scatter_probability,
            self.wall_scatter_probability,
        )
    }

    fn place_food_cluster<R: Rng + ?Sized>(
        &self,
        board: &mut Board,
        mound_center: Point,
        rng: &mut R,
    ) -> Result<Point> {
        let (width, height) = board.shape();
        if !has_clear_center(mound_center.x, width) || !has_clear_center(mound_center.y, height) {
            return Err(ScavengeError::Configuration(format!(
                "no food cluster center is more than {} cells away from the mound at {} on a {}x{} board",
                FOOD_CLEARANCE, mound_center, width, height
            )));
        }

        let center = (1..=self.food_cluster_retries)
            .find_map(|attempt| {
                let x = rng.gen_range(CENTER_MARGIN..width as i32 - CENTER_MARGIN);
                let y = rng.gen_range(CENTER_MARGIN..height as i32 - CENTER_MARGIN);
                let (dx, dy) = mound_center.abs_dist((x, y));
                (dx > FOOD_CLEARANCE && dy > FOOD_CLEARANCE).then_some((attempt, Point::new(x, y)))
            })
            .map(|(attempt, center)| {
                if attempt > self.food_cluster_retries / 2 {
                    warn!(attempt, "food cluster needed more than half of its retry budget");
                }
                center
            })
            .ok_or_else(|| {
                ScavengeError::Configuration(format!(
                    "could not place the food cluster after {} attempts",
                    self.food_cluster_retries
                ))
            })?;

        for point in block(center, 2) {
            if !board.occupied(point) {
                board.layer_mut(LayerKind::Food).set(point, true)?;
            }
        }

        Ok(center)
    }
}

fn check_shape(width: usize, height: usize) -> Result<()> {
    if width < MIN_SIDE || height < MIN_SIDE {
        return Err(ScavengeError::Configuration(format!(
            "board shape ({}, {}) is smaller than {}x{}",
            width, height, MIN_SIDE, MIN_SIDE
        )));
    }
    Ok(())
}

fn in_center_range(value: i32, side: usize) -> bool {
    value >= CENTER_MARGIN && value < side as i32 - CENTER_MARGIN
}

// Whether some center on this axis is far enough from the mound.
fn has_clear_center(mound: i32, side: usize) -> bool {
    let low = CENTER_MARGIN;
    let high = side as i32 - CENTER_MARGIN - 1;
    mound - FOOD_CLEARANCE - 1 >= low || mound + FOOD_CLEARANCE + 1 <= high
}

/// The square of cells within `radius` of `center`.
fn block(center: Point, radius: i32) -> impl Iterator<Item = Point> {
    (-radius..=radius)
        .flat_map(move |dx| (-radius..=radius).map(move |dy| center + (dx, dy)))
}

fn place_mound_and_ants(board: &mut Board, center: Point) -> Result<()> {
    for point in block(center, 1) {
        board.layer_mut(LayerKind::Mound).set(point, true)?;
    }

    // The ring around the mound, without its corners
    for point in block(center, 2) {
        let (dx, dy) = center.abs_dist(point);
        let on_ring = dx == 2 || dy == 2;
        let corner = dx == 2 && dy == 2;
        if on_ring && !corner {
            board.layer_mut(LayerKind::Ants).set(point, true)?;
        }
    }

    Ok(())
}

fn interior(board: &Board) -> impl Iterator<Item = Point> {
    let (width, height) = board.shape();
    (1..width as i32 - 1).flat_map(move |x| (1..height as i32 - 1).map(move |y| Point::new(x, y)))
}

fn scatter<R: Rng + ?Sized>(
    board: &mut Board,
    kind: LayerKind,
    probability: f64,
    rng: &mut R,
) -> Result<()> {
    let points: Vec<Point> = interior(board).collect();
    for point in points {
        // Draw for every cell so the random stream does not depend on occupancy
        let selected = rng.gen_bool(probability);
        if selected && !board.occupied(point) {
            board.layer_mut(kind).set(point, true)?;
        }
    }
    Ok(())
}

fn border(width: usize, height: usize) -> impl Iterator<Item = Point> {
    let (width, height) = (width as i32, height as i32);
    (0..width)
        .flat_map(move |x| (0..height).map(move |y| Point::new(x, y)))
        .filter(move |p| p.x == 0 || p.y == 0 || p.x == width - 1 || p.y == height - 1)
}

fn place_border_walls(board: &mut Board) -> Result<()> {
    let (width, height) = board.shape();
    for point in border(width, height) {
        board.layer_mut(LayerKind::Walls).set(point, true)?;
    }
    Ok(())
}

fn check_border(board: &Board) -> Result<()> {
    let (width, height) = board.shape();
    match border(width, height).find(|point| !board.walls().is_set(*point)) {
        Some(point) => Err(ScavengeError::Configuration(format!(
            "border cell {} is not a wall",
            point
        ))),
        None => Ok(()),
    }
}
