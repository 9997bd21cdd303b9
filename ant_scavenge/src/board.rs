use crate::error::{Result, ScavengeError};
use crate::point::Point;
use regex::Regex;
use std::fmt;

/// One boolean occupancy grid of a board, indexed by `(x, y)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layer {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl Layer {
    pub fn new(width: usize, height: usize) -> Layer {
        Layer {
            width,
            height,
            cells: vec![false; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= 0
            && point.y >= 0
            && (point.x as usize) < self.width
            && (point.y as usize) < self.height
    }

    /// The value at `point`, failing if the point is outside of the layer.
    pub fn get(&self, point: Point) -> Result<bool> {
        self.index(point).map(|index| self.cells[index])
    }

    /// The value at `point`, treating everything outside of the layer as empty.
    pub fn is_set(&self, point: Point) -> bool {
        self.index(point)
            .map(|index| self.cells[index])
            .unwrap_or(false)
    }

    pub(crate) fn set(&mut self, point: Point, value: bool) -> Result<()> {
        let index = self.index(point)?;
        self.cells[index] = value;
        Ok(())
    }

    /// Number of cells set in the layer.
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|cell| **cell).count()
    }

    /// All set cells, ordered by `x` first and then by `y`.
    pub fn points(&self) -> Vec<Point> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| **cell)
            .map(|(index, _)| self.point(index))
            .collect()
    }

    fn index(&self, point: Point) -> Result<usize> {
        if !self.contains(point) {
            return Err(ScavengeError::OutOfBounds {
                x: point.x,
                y: point.y,
            });
        }
        Ok(point.x as usize * self.height + point.y as usize)
    }

    fn point(&self, index: usize) -> Point {
        Point::new((index / self.height) as i32, (index % self.height) as i32)
    }
}

/// The named layers of a board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerKind {
    Walls,
    Food,
    Ants,
    Mound,
}

impl LayerKind {
    /// All layers, in the order they appear as view channels.
    pub const ALL: [LayerKind; 4] = [
        LayerKind::Walls,
        LayerKind::Food,
        LayerKind::Ants,
        LayerKind::Mound,
    ];
}

/// Location of everything in the environment.
///
/// The shape is fixed at construction. Walls are exclusive: a wall cell never holds food, an ant
/// or the mound, while an ant may stand on the mound.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    walls: Layer,
    food: Layer,
    ants: Layer,
    mound: Layer,
}

impl Board {
    /// Creates an empty board.
    pub fn new(width: usize, height: usize) -> Board {
        Board {
            width,
            height,
            walls: Layer::new(width, height),
            food: Layer::new(width, height),
            ants: Layer::new(width, height),
            mound: Layer::new(width, height),
        }
    }

    /// Parses a board from its textual form.
    ///
    /// The format is a `rows`/`cols` header followed by one `m` line per row. Row `i` holds the
    /// cells with `y = i` and character `j` the cell with `x = j`, using the same symbols as
    /// [`Board::symbols`]. A `.` is accepted for an empty cell and short rows are padded with
    /// empty cells.
    pub fn parse(contents: &str) -> Result<Board> {
        let metadata = Regex::new(r"rows (\d+)\s+cols (\d+)")
            .map_err(|e| ScavengeError::Parse(e.to_string()))?
            .captures(contents)
            .ok_or_else(|| ScavengeError::Parse("missing `rows`/`cols` header".to_string()))?;

        let height: usize = metadata[1]
            .parse()
            .map_err(|_| ScavengeError::Parse(format!("invalid row count {}", &metadata[1])))?;
        let width: usize = metadata[2]
            .parse()
            .map_err(|_| ScavengeError::Parse(format!("invalid column count {}", &metadata[2])))?;

        let mut board = Board::new(width, height);

        let rows = Regex::new(r"(?m)^\s*m (.*)$").map_err(|e| ScavengeError::Parse(e.to_string()))?;
        for (y, captures) in rows.captures_iter(contents).enumerate() {
            if y >= height {
                return Err(ScavengeError::Parse(format!(
                    "more than {} rows were given",
                    height
                )));
            }

            let line = captures[1].trim_end_matches('\r');
            for (x, value) in line.chars().enumerate() {
                if x >= width {
                    return Err(ScavengeError::Parse(format!(
                        "row {} is longer than {} columns",
                        y, width
                    )));
                }

                let point = Point::new(x as i32, y as i32);
                let kinds: &[LayerKind] = match value {
                    ' ' | '.' => &[],
                    'w' => &[LayerKind::Walls],
                    'f' => &[LayerKind::Food],
                    'a' => &[LayerKind::Ants],
                    'm' => &[LayerKind::Mound],
                    '@' => &[LayerKind::Ants, LayerKind::Mound],
                    other => {
                        return Err(ScavengeError::Parse(format!(
                            "invalid cell `{}` at ({}, {})",
                            other, x, y
                        )))
                    }
                };
                for kind in kinds {
                    board.layer_mut(*kind).set(point, true)?;
                }
            }
        }

        Ok(board)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// The `(width, height)` of the board.
    pub fn shape(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn layer(&self, kind: LayerKind) -> &Layer {
        match kind {
            LayerKind::Walls => &self.walls,
            LayerKind::Food => &self.food,
            LayerKind::Ants => &self.ants,
            LayerKind::Mound => &self.mound,
        }
    }

    pub(crate) fn layer_mut(&mut self, kind: LayerKind) -> &mut Layer {
        match kind {
            LayerKind::Walls => &mut self.walls,
            LayerKind::Food => &mut self.food,
            LayerKind::Ants => &mut self.ants,
            LayerKind::Mound => &mut self.mound,
        }
    }

    pub fn walls(&self) -> &Layer {
        &self.walls
    }

    pub fn food(&self) -> &Layer {
        &self.food
    }

    pub fn ants(&self) -> &Layer {
        &self.ants
    }

    pub fn mound(&self) -> &Layer {
        &self.mound
    }

    pub fn contains(&self, point: Point) -> bool {
        self.walls.contains(point)
    }

    /// Whether any layer holds something at `point`.
    pub fn occupied(&self, point: Point) -> bool {
        LayerKind::ALL
            .iter()
            .any(|kind| self.layer(*kind).is_set(point))
    }

    /// Checks that walls never share a cell with food, ants or the mound.
    pub fn validate(&self) -> Result<()> {
        for point in self.walls.points() {
            if self.food.is_set(point) || self.ants.is_set(point) || self.mound.is_set(point) {
                return Err(ScavengeError::Configuration(format!(
                    "wall at {} overlaps another layer",
                    point
                )));
            }
        }
        Ok(())
    }

    /// The symbol of a single cell.
    ///
    /// An ant carrying food across a food cell is shown as the ant.
    pub fn symbol(&self, point: Point) -> char {
        if self.walls.is_set(point) {
            'w'
        } else if self.ants.is_set(point) && self.mound.is_set(point) {
            '@'
        } else if self.ants.is_set(point) {
            'a'
        } else if self.mound.is_set(point) {
            'm'
        } else if self.food.is_set(point) {
            'f'
        } else {
            ' '
        }
    }

    /// The symbolic projection of the board, one row per `y`.
    pub fn symbols(&self) -> Vec<Vec<char>> {
        (0..self.height)
            .map(|y| {
                (0..self.width)
                    .map(|x| self.symbol(Point::new(x as i32, y as i32)))
                    .collect()
            })
            .collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: Vec<String> = self
            .symbols()
            .into_iter()
            .map(|row| row.into_iter().collect())
            .collect();
        write!(f, "{}", rows.join("\n"))
    }
}
