//! Discrete world grid and headings
//!
//! Cells are `IVec2` with the origin at the top-left, x growing right and
//! y growing down. Bounds are fixed for a session once computed from the
//! viewport.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::consts::{CELL_PX, WORLD_SCALE};

/// World bounds in cells: `[0, cols) x [0, rows)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub cols: i32,
    pub rows: i32,
}

impl Grid {
    pub fn new(cols: i32, rows: i32) -> Self {
        Self {
            cols: cols.max(0),
            rows: rows.max(0),
        }
    }

    /// Size the world from viewport pixels: `floor(dim / CELL_PX * WORLD_SCALE)`
    pub fn from_viewport(width: f32, height: f32) -> Self {
        let cells = |px: f32| (px.max(0.0) / CELL_PX * WORLD_SCALE).floor() as i32;
        Self::new(cells(width), cells(height))
    }

    #[inline]
    pub fn in_bounds(&self, cell: IVec2) -> bool {
        cell.x >= 0 && cell.x < self.cols && cell.y >= 0 && cell.y < self.rows
    }

    /// Grid centre, used for landmark placement
    pub fn center(&self) -> IVec2 {
        IVec2::new(self.cols / 2, self.rows / 2)
    }

    /// Clamp a cell into bounds (empty grids clamp to the origin)
    pub fn clamp(&self, cell: IVec2) -> IVec2 {
        IVec2::new(
            cell.x.clamp(0, (self.cols - 1).max(0)),
            cell.y.clamp(0, (self.rows - 1).max(0)),
        )
    }
}

/// Direction of travel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Heading {
    Up,
    Down,
    Left,
    Right,
}

/// Player steering input, always a 90 degree rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Turn {
    Left,
    Right,
}

impl Heading {
    pub const ALL: [Heading; 4] = [Heading::Up, Heading::Down, Heading::Left, Heading::Right];

    /// Unit step in grid space
    pub fn delta(self) -> IVec2 {
        match self {
            Heading::Up => IVec2::new(0, -1),
            Heading::Down => IVec2::new(0, 1),
            Heading::Left => IVec2::new(-1, 0),
            Heading::Right => IVec2::new(1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Heading::Up => Heading::Down,
            Heading::Down => Heading::Up,
            Heading::Left => Heading::Right,
            Heading::Right => Heading::Left,
        }
    }

    /// Clockwise order is Up, Right, Down, Left
    pub fn rotate(self, turn: Turn) -> Self {
        match (self, turn) {
            (Heading::Up, Turn::Right) | (Heading::Down, Turn::Left) => Heading::Right,
            (Heading::Right, Turn::Right) | (Heading::Left, Turn::Left) => Heading::Down,
            (Heading::Down, Turn::Right) | (Heading::Up, Turn::Left) => Heading::Left,
            (Heading::Left, Turn::Right) | (Heading::Right, Turn::Left) => Heading::Up,
        }
    }

    /// World-plane angle in radians (RIGHT = 0, DOWN = π/2)
    pub fn angle(self) -> f32 {
        use std::f32::consts::{FRAC_PI_2, PI};
        match self {
            Heading::Right => 0.0,
            Heading::Down => FRAC_PI_2,
            Heading::Left => PI,
            Heading::Up => -FRAC_PI_2,
        }
    }

    /// Next cell from `cell` along this heading
    #[inline]
    pub fn step(self, cell: IVec2) -> IVec2 {
        cell + self.delta()
    }
}

/// Grid (taxicab) distance between two cells
#[inline]
pub fn manhattan(a: IVec2, b: IVec2) -> i32 {
    (a - b).abs().element_sum()
}
