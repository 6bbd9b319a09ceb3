//! Grid geometry and occupancy
//!
//! Cells are `IVec2` values in `[0, tile_count)` on both axes.

use std::collections::VecDeque;

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A cell on the board
pub type GridPosition = IVec2;

/// Square board of `tile_count × tile_count` cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub tile_count: i32,
}

impl Grid {
    pub fn new(tile_count: i32) -> Self {
        Self { tile_count }
    }

    #[inline]
    pub fn contains(&self, cell: GridPosition) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.tile_count && cell.y < self.tile_count
    }

    /// Uniformly random cell
    pub fn random_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> GridPosition {
        IVec2::new(
            rng.random_range(0..self.tile_count),
            rng.random_range(0..self.tile_count),
        )
    }

    /// Random anchor such that a `width × height` footprint stays on the board.
    /// `None` when the footprint is larger than the board.
    pub fn random_anchor<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        width: i32,
        height: i32,
    ) -> Option<GridPosition> {
        let max_x = self.tile_count - width;
        let max_y = self.tile_count - height;
        if width <= 0 || height <= 0 || max_x < 0 || max_y < 0 {
            return None;
        }
        Some(IVec2::new(
            rng.random_range(0..=max_x),
            rng.random_range(0..=max_y),
        ))
    }
}

/// Taxicab distance between two cells
#[inline]
pub fn manhattan(a: GridPosition, b: GridPosition) -> i32 {
    let d = a - b;
    d.x.abs() + d.y.abs()
}

/// True for the four unit headings
#[inline]
pub fn is_unit_heading(dir: IVec2) -> bool {
    dir.x.abs() + dir.y.abs() == 1
}

/// Anchor-plus-extent rectangle of cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Footprint {
    pub anchor: GridPosition,
    pub width: i32,
    pub height: i32,
}

impl Footprint {
    pub fn new(anchor: GridPosition, width: i32, height: i32) -> Self {
        Self {
            anchor,
            width,
            height,
        }
    }

    pub fn contains(&self, cell: GridPosition) -> bool {
        let rel = cell - self.anchor;
        rel.x >= 0 && rel.y >= 0 && rel.x < self.width && rel.y < self.height
    }

    /// All covered cells, row by row
    pub fn cells(self) -> impl Iterator<Item = GridPosition> {
        let Footprint {
            anchor,
            width,
            height,
        } = self;
        (0..height).flat_map(move |dy| (0..width).map(move |dx| anchor + IVec2::new(dx, dy)))
    }
}

/// Anything that claims grid cells
pub trait Occupancy {
    fn occupies(&self, cell: GridPosition) -> bool;
}

impl Occupancy for GridPosition {
    fn occupies(&self, cell: GridPosition) -> bool {
        *self == cell
    }
}

impl Occupancy for Footprint {
    fn occupies(&self, cell: GridPosition) -> bool {
        self.contains(cell)
    }
}

impl Occupancy for [GridPosition] {
    fn occupies(&self, cell: GridPosition) -> bool {
        self.contains(&cell)
    }
}

impl Occupancy for Vec<GridPosition> {
    fn occupies(&self, cell: GridPosition) -> bool {
        self.contains(&cell)
    }
}

impl Occupancy for VecDeque<GridPosition> {
    fn occupies(&self, cell: GridPosition) -> bool {
        self.contains(&cell)
    }
}

impl<T: Occupancy> Occupancy for Option<T> {
    fn occupies(&self, cell: GridPosition) -> bool {
        self.as_ref().is_some_and(|inner| inner.occupies(cell))
    }
}
