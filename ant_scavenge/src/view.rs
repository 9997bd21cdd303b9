use crate::board::{Board, LayerKind};
use crate::error::{Result, ScavengeError};
use crate::point::Point;

/// How far an ant sees in each direction.
pub const VIEW_RADIUS: i32 = 2;
/// Side of the square view window.
pub const VIEW_SIZE: usize = 2 * VIEW_RADIUS as usize + 1;
/// One channel per board layer plus the hidden mask.
pub const CHANNELS: usize = LayerKind::ALL.len() + 1;
/// Index of the hidden mask channel.
pub const HIDDEN_CHANNEL: usize = CHANNELS - 1;

// Corners of the window are never visible
const CORNERS: [Point; 4] = [
    Point::new(-2, -2),
    Point::new(-2, 2),
    Point::new(2, -2),
    Point::new(2, 2),
];

// A wall on an inner ring cell hides the outer ring cells directly behind it
const SHADOWS: [(Point, &[Point]); 8] = [
    (Point::new(1, 0), &[Point::new(2, 0)]),
    (Point::new(-1, 0), &[Point::new(-2, 0)]),
    (Point::new(0, 1), &[Point::new(0, 2)]),
    (Point::new(0, -1), &[Point::new(0, -2)]),
    (Point::new(1, 1), &[Point::new(2, 1), Point::new(1, 2)]),
    (Point::new(1, -1), &[Point::new(2, -1), Point::new(1, -2)]),
    (Point::new(-1, 1), &[Point::new(-2, 1), Point::new(-1, 2)]),
    (Point::new(-1, -1), &[Point::new(-2, -1), Point::new(-1, -2)]),
];

/// An egocentric observation centered on an ant.
///
/// Values are indexed as `[channel][x][y]` where `x` and `y` are offsets from the center
/// shifted by [`VIEW_RADIUS`]. Channels follow [`LayerKind::ALL`] with the hidden mask last.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct View {
    data: [[[f32; VIEW_SIZE]; VIEW_SIZE]; CHANNELS],
}

impl View {
    /// The value of a board layer at an offset from the center. Hidden cells read as `0.0`.
    pub fn feature(&self, kind: LayerKind, offset: Point) -> f32 {
        self.value(channel(kind), offset)
    }

    pub fn is_hidden(&self, offset: Point) -> bool {
        self.value(HIDDEN_CHANNEL, offset) > 0.0
    }

    /// The raw `[channel][x][y]` tensor.
    pub fn data(&self) -> &[[[f32; VIEW_SIZE]; VIEW_SIZE]; CHANNELS] {
        &self.data
    }

    /// The tensor as nested vectors, e.g. for handing to an external learner.
    pub fn to_nested(&self) -> Vec<Vec<Vec<f32>>> {
        self.data
            .iter()
            .map(|channel| channel.iter().map(|column| column.to_vec()).collect())
            .collect()
    }

    /// The tensor flattened in `[channel][x][y]` order.
    pub fn flatten(&self) -> Vec<f32> {
        self.data.iter().flatten().flatten().copied().collect()
    }

    fn value(&self, channel: usize, offset: Point) -> f32 {
        match index(offset) {
            Some((i, j)) => self.data[channel][i][j],
            None => 0.0,
        }
    }

    fn hide(&mut self, offset: Point) {
        if let Some((i, j)) = index(offset) {
            for channel in self.data.iter_mut().take(HIDDEN_CHANNEL) {
                channel[i][j] = 0.0;
            }
            self.data[HIDDEN_CHANNEL][i][j] = 1.0;
        }
    }
}

/// Computes the views around each of `centers`.
pub fn get_views(board: &Board, centers: &[Point]) -> Result<Vec<View>> {
    centers
        .iter()
        .map(|center| get_view(board, *center))
        .collect()
}

/// Computes the view around a single `center`.
///
/// Cells beyond the edge of the board read as empty.
pub fn get_view(board: &Board, center: Point) -> Result<View> {
    if !board.contains(center) {
        return Err(ScavengeError::OutOfBounds {
            x: center.x,
            y: center.y,
        });
    }

    let mut view = View {
        data: [[[0.0; VIEW_SIZE]; VIEW_SIZE]; CHANNELS],
    };

    for (c, kind) in LayerKind::ALL.iter().enumerate() {
        let layer = board.layer(*kind);
        for (i, dx) in (-VIEW_RADIUS..=VIEW_RADIUS).enumerate() {
            for (j, dy) in (-VIEW_RADIUS..=VIEW_RADIUS).enumerate() {
                if layer.is_set(center + (dx, dy)) {
                    view.data[c][i][j] = 1.0;
                }
            }
        }
    }

    // Shadows are cast from the board, so a hidden cell never hides another one
    let mut hidden: Vec<Point> = CORNERS.to_vec();
    for (blocker, shadowed) in SHADOWS.iter() {
        if board.walls().is_set(center + *blocker) {
            hidden.extend_from_slice(shadowed);
        }
    }
    for offset in hidden {
        view.hide(offset);
    }

    Ok(view)
}

fn channel(kind: LayerKind) -> usize {
    match kind {
        LayerKind::Walls => 0,
        LayerKind::Food => 1,
        LayerKind::Ants => 2,
        LayerKind::Mound => 3,
    }
}

fn index(offset: Point) -> Option<(usize, usize)> {
    let i = offset.x + VIEW_RADIUS;
    let j = offset.y + VIEW_RADIUS;
    let range = 0..VIEW_SIZE as i32;
    (range.contains(&i) && range.contains(&j)).then_some((i as usize, j as usize))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offsets() -> impl Iterator<Item = Point> {
        (-2..=2).flat_map(|dx| (-2..=2).map(move |dy| Point::new(dx, dy)))
    }

    fn hidden_offsets(view: &View) -> Vec<Point> {
        offsets().filter(|offset| view.is_hidden(*offset)).collect()
    }

    #[test]
    fn when_there_are_no_walls_only_the_corners_are_hidden() {
        let board = "\
            rows 7
            cols 7
            m .......
            m .fffff.
            m .fffff.
            m .ffaff.
            m .fffff.
            m .fffff.
            m .......";
        let board = Board::parse(board).unwrap();
        let view = get_view(&board, Point::new(3, 3)).unwrap();

        let mut hidden = hidden_offsets(&view);
        hidden.sort_by_key(|p| (p.x, p.y));
        assert_eq!(hidden, CORNERS.to_vec());

        for corner in CORNERS {
            assert_eq!(view.feature(LayerKind::Food, corner), 0.0);
        }
        assert_eq!(view.feature(LayerKind::Food, Point::new(2, 1)), 1.0);
        assert_eq!(view.feature(LayerKind::Ants, Point::new(0, 0)), 1.0);
    }

    #[test]
    fn when_the_board_is_full_of_walls_the_corners_are_still_hidden() {
        let board = "\
            rows 5
            cols 5
            m wwwww
            m wwwww
            m wwaww
            m wwwww
            m wwwww";
        let board = Board::parse(board).unwrap();
        let view = get_view(&board, Point::new(2, 2)).unwrap();

        for corner in CORNERS {
            assert!(view.is_hidden(corner));
        }
        // Every outer ring cell is shadowed, the inner ring stays visible
        assert_eq!(hidden_offsets(&view).len(), 16);
        assert!(!view.is_hidden(Point::new(1, 1)));
        assert_eq!(view.feature(LayerKind::Walls, Point::new(-1, 0)), 1.0);
    }

    #[test]
    fn when_a_wall_is_orthogonally_adjacent_it_hides_the_cell_behind_it() {
        let board = "\
            rows 5
            cols 5
            m .....
            m .....
            m ..awf
            m .....
            m .....";
        let board = Board::parse(board).unwrap();
        let view = get_view(&board, Point::new(2, 2)).unwrap();

        assert!(view.is_hidden(Point::new(2, 0)));
        assert_eq!(view.feature(LayerKind::Food, Point::new(2, 0)), 0.0);
        assert!(!view.is_hidden(Point::new(2, 1)));
        assert!(!view.is_hidden(Point::new(2, -1)));
        assert!(!view.is_hidden(Point::new(1, 0)));
        assert_eq!(view.feature(LayerKind::Walls, Point::new(1, 0)), 1.0);
        assert_eq!(hidden_offsets(&view).len(), 5);
    }

    #[test]
    fn when_a_wall_is_diagonally_adjacent_it_hides_two_cells_behind_it() {
        let board = "\
            rows 5
            cols 5
            m .....
            m .....
            m ..a..
            m ...wf
            m ...ff";
        let board = Board::parse(board).unwrap();
        let view = get_view(&board, Point::new(2, 2)).unwrap();

        assert!(view.is_hidden(Point::new(2, 1)));
        assert!(view.is_hidden(Point::new(1, 2)));
        assert_eq!(view.feature(LayerKind::Food, Point::new(2, 1)), 0.0);
        assert_eq!(view.feature(LayerKind::Food, Point::new(1, 2)), 0.0);
        assert_eq!(hidden_offsets(&view).len(), 6);
    }

    #[test]
    fn when_a_wall_is_on_the_outer_ring_it_casts_no_shadow() {
        let board = "\
            rows 5
            cols 5
            m .....
            m .....
            m ..a.w
            m .....
            m .....";
        let board = Board::parse(board).unwrap();
        let view = get_view(&board, Point::new(2, 2)).unwrap();

        assert_eq!(hidden_offsets(&view).len(), 4);
        assert_eq!(view.feature(LayerKind::Walls, Point::new(2, 0)), 1.0);
    }

    #[test]
    fn when_the_center_is_near_the_edge_cells_beyond_the_board_are_zero() {
        let board = "\
            rows 3
            cols 3
            m www
            m w@w
            m www";
        let board = Board::parse(board).unwrap();
        let view = get_view(&board, Point::new(1, 1)).unwrap();

        assert_eq!(view.feature(LayerKind::Ants, Point::new(0, 0)), 1.0);
        assert_eq!(view.feature(LayerKind::Mound, Point::new(0, 0)), 1.0);
        assert!(!view.is_hidden(Point::new(0, 0)));
        // (-2, 0) is off the board and shadowed by the wall at (-1, 0)
        assert!(view.is_hidden(Point::new(-2, 0)));
        assert_eq!(view.feature(LayerKind::Walls, Point::new(-2, 0)), 0.0);
    }

    #[test]
    fn when_extracting_views_twice_the_results_are_identical_and_the_board_is_untouched() {
        let board = "\
            rows 6
            cols 6
            m wwwwww
            m wa.fmw
            m w.w.aw
            m wf..mw
            m w.a.fw
            m wwwwww";
        let board = Board::parse(board).unwrap();
        let before = board.clone();
        let centers = board.ants().points();

        let first = get_views(&board, &centers).unwrap();
        let second = get_views(&board, &centers).unwrap();

        assert_eq!(first.len(), 3);
        assert_eq!(first, second);
        assert_eq!(board, before);
    }

    #[test]
    fn when_the_center_is_outside_of_the_board_an_error_is_returned() {
        let board = Board::new(3, 3);

        assert!(matches!(
            get_views(&board, &[Point::new(1, 1), Point::new(3, 1)]),
            Err(ScavengeError::OutOfBounds { x: 3, y: 1 })
        ));
    }

    #[test]
    fn when_flattening_a_view_it_has_one_value_per_channel_and_cell() {
        let board = Board::new(5, 5);
        let view = get_view(&board, Point::new(2, 2)).unwrap();

        assert_eq!(view.flatten().len(), CHANNELS * VIEW_SIZE * VIEW_SIZE);
        assert_eq!(view.flatten().iter().sum::<f32>(), 4.0);
        assert_eq!(view.to_nested()[HIDDEN_CHANNEL][0][0], 1.0);
    }
}
