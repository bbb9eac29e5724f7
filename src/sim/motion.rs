//! Grid motion for both cycles
//!
//! A cycle moves exactly one cell per tick. Steering is buffered in
//! `requested` and only committed at the next tick boundary.

use glam::IVec2;

use super::grid::{Heading, Turn};

/// A cycle on the grid and the wall it leaves behind
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub pos: IVec2,
    /// Heading committed on the last tick
    pub heading: Heading,
    /// Heading to commit on the next tick
    pub requested: Heading,
    /// Visited cells in traversal order, the seed cell first
    pub trail: Vec<IVec2>,
}

impl Vehicle {
    pub fn new(spawn: IVec2, heading: Heading) -> Self {
        Self {
            pos: spawn,
            heading,
            requested: heading,
            trail: vec![spawn],
        }
    }

    /// Rotate relative to the committed heading, so repeated turns before a
    /// tick never add up to a reversal
    pub fn steer(&mut self, turn: Turn) {
        self.requested = self.heading.rotate(turn);
    }

    /// Commit the requested heading and return the cell it leads to
    pub fn advance(&mut self) -> IVec2 {
        self.heading = self.requested;
        self.heading.step(self.pos)
    }

    /// Move onto `cell` and extend the trail
    pub fn accept(&mut self, cell: IVec2) {
        self.pos = cell;
        self.trail.push(cell);
    }

    /// Drop the whole wall, keeping only the current cell
    pub fn reset_trail(&mut self) {
        self.trail.clear();
        self.trail.push(self.pos);
    }

    pub fn trail_contains(&self, cell: IVec2) -> bool {
        self.trail.contains(&cell)
    }
}
