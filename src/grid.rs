use core::fmt;
use grid_util::direction::Direction;
use grid_util::point::Point;
use std::ops::Add;

/// A cell on the navigation grid, addressed by column and row. Rows grow downwards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Grid {
    pub col: i32,
    pub row: i32,
}

impl Grid {
    pub const fn new(col: i32, row: i32) -> Grid {
        Grid { col, row }
    }

    /// Unit direction pointing from `self` towards `other`, computed per axis.
    pub fn direction_to(&self, other: &Grid) -> Vector {
        Point::from(*self).dir_obj(&(*other).into()).into()
    }

    pub fn manhattan_distance(&self, other: &Grid) -> u32 {
        Point::from(*self).manhattan_distance(&(*other).into()) as u32
    }

    /// Number of king moves between the two cells.
    pub fn chebyshev_distance(&self, other: &Grid) -> u32 {
        Point::from(*self).move_distance(&(*other).into()) as u32
    }
}

impl From<Point> for Grid {
    fn from(point: Point) -> Grid {
        Grid::new(point.x, point.y)
    }
}

impl From<Grid> for Point {
    fn from(grid: Grid) -> Point {
        Point::new(grid.col, grid.row)
    }
}

impl Add<Vector> for Grid {
    type Output = Grid;

    fn add(self, rhs: Vector) -> Grid {
        Grid::new(self.col + rhs.x, self.row + rhs.y)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// A step direction. Both components lie in {-1, 0, 1}.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Vector {
    pub x: i32,
    pub y: i32,
}

pub const START: Vector = Vector::new(0, 0);
pub const LEFT: Vector = Vector::new(-1, 0);
pub const RIGHT: Vector = Vector::new(1, 0);
pub const UP: Vector = Vector::new(0, -1);
pub const DOWN: Vector = Vector::new(0, 1);
pub const LEFT_UP: Vector = Vector::new(-1, -1);
pub const RIGHT_UP: Vector = Vector::new(1, -1);
pub const LEFT_DOWN: Vector = Vector::new(-1, 1);
pub const RIGHT_DOWN: Vector = Vector::new(1, 1);

/// The four cardinal directions in the order the orthogonal scans try them.
pub const ORTHOGONAL: [Vector; 4] = [RIGHT, LEFT, DOWN, UP];
/// The four diagonal directions in the order the oblique pass tries them.
pub const OBLIQUE: [Vector; 4] = [LEFT_UP, LEFT_DOWN, RIGHT_UP, RIGHT_DOWN];

impl Vector {
    pub const fn new(x: i32, y: i32) -> Vector {
        Vector { x, y }
    }

    /// The direction of the start node, which has no parent.
    pub fn is_empty(&self) -> bool {
        self.x == 0 && self.y == 0
    }

    pub fn is_oblique(&self) -> bool {
        self.x != 0 && self.y != 0
    }

    pub fn x_dir(&self) -> Vector {
        Vector::new(self.x, 0)
    }

    pub fn y_dir(&self) -> Vector {
        Vector::new(0, self.y)
    }
}

/// Takes the unit delta of a [Direction] as is. [Direction::NORTH] has a positive y, so it is
/// [DOWN] on this grid.
impl From<Direction> for Vector {
    fn from(direction: Direction) -> Vector {
        let delta = Point::from(direction);
        Vector::new(delta.x, delta.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_vectors() {
        assert!(START.is_empty());
        assert!(!START.is_oblique());
        assert!(!RIGHT.is_empty());
        assert!(!RIGHT.is_oblique());
        for v in OBLIQUE {
            assert!(v.is_oblique());
        }
        for v in ORTHOGONAL {
            assert!(!v.is_oblique() && !v.is_empty());
        }
    }

    #[test]
    fn grid_equality_is_by_coordinate() {
        assert_eq!(Grid::new(3, 4), Grid::new(3, 4));
        assert_ne!(Grid::new(3, 4), Grid::new(4, 3));
    }

    #[test]
    fn distances_and_directions() {
        let a = Grid::new(1, 1);
        let b = Grid::new(4, -1);
        assert_eq!(a.manhattan_distance(&b), 5);
        assert_eq!(a.chebyshev_distance(&b), 3);
        assert_eq!(a.direction_to(&b), RIGHT_UP);
        assert_eq!(a + RIGHT_UP, Grid::new(2, 0));
        assert_eq!(RIGHT_UP.x_dir(), RIGHT);
        assert_eq!(RIGHT_UP.y_dir(), UP);
        assert_eq!(b.direction_to(&a), LEFT_DOWN);
        assert_eq!(a.direction_to(&a), START);
    }

    #[test]
    fn converts_to_and_from_points() {
        let grid = Grid::new(-2, 7);
        let point = Point::from(grid);
        assert_eq!((point.x, point.y), (-2, 7));
        assert_eq!(Grid::from(point), grid);
        assert_eq!(Vector::from(Direction::NORTH), DOWN);
        assert_eq!(Vector::from(Direction::SOUTHWEST), LEFT_UP);
        assert_eq!(Vector::from(Direction::NONE), START);
    }
}
