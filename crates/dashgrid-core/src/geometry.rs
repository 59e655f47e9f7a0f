#![forbid(unsafe_code)]

//! Grid dimensions, cells, and widget footprints.
//!
//! Coordinates are block cells, 0-indexed, origin at top-left. `x` is the
//! column and `y` the row.

use serde::{Deserialize, Serialize};

use crate::size::BlockSize;

/// One block cell on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Cell {
    /// Column (0-indexed).
    pub x: u16,
    /// Row (0-indexed).
    pub y: u16,
}

impl Cell {
    /// Create a new cell.
    #[inline]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Reading-order key: row first, then column.
    #[inline]
    pub const fn reading_key(self) -> (u16, u16) {
        (self.y, self.x)
    }
}

/// The rectangular set of cells a widget covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Footprint {
    /// Left edge (inclusive).
    pub x: u16,
    /// Top edge (inclusive).
    pub y: u16,
    /// Width in blocks.
    pub w: u16,
    /// Height in blocks.
    pub h: u16,
}

impl Footprint {
    /// Create a new footprint.
    #[inline]
    pub const fn new(x: u16, y: u16, w: u16, h: u16) -> Self {
        Self { x, y, w, h }
    }

    /// Footprint of a block size anchored at `origin`.
    #[inline]
    pub const fn at(origin: Cell, size: BlockSize) -> Self {
        Self::new(origin.x, origin.y, size.w() as u16, size.h() as u16)
    }

    /// Top-left anchor cell.
    #[inline]
    pub const fn origin(&self) -> Cell {
        Cell::new(self.x, self.y)
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> u16 {
        self.x.saturating_add(self.w)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> u16 {
        self.y.saturating_add(self.h)
    }

    /// Number of cells covered.
    #[inline]
    pub const fn area(&self) -> u32 {
        self.w as u32 * self.h as u32
    }

    /// Check if a cell is covered.
    #[inline]
    pub const fn contains(&self, cell: Cell) -> bool {
        cell.x >= self.x && cell.x < self.right() && cell.y >= self.y && cell.y < self.bottom()
    }

    /// Check if two footprints share at least one cell.
    #[inline]
    pub const fn intersects(&self, other: &Footprint) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Covered cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (self.y..self.bottom()).flat_map(move |y| (self.x..self.right()).map(move |x| Cell::new(x, y)))
    }
}

/// Dimensions of the block grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridDims {
    /// Number of columns.
    pub cols: u16,
    /// Number of rows.
    pub rows: u16,
}

impl GridDims {
    /// The standard 3×3 dashboard grid.
    pub const DEFAULT: Self = Self { cols: 3, rows: 3 };

    /// Create grid dimensions. Zero extents are raised to 1.
    #[must_use]
    pub const fn new(cols: u16, rows: u16) -> Self {
        Self {
            cols: if cols == 0 { 1 } else { cols },
            rows: if rows == 0 { 1 } else { rows },
        }
    }

    /// Total number of cells (`R·C`).
    #[inline]
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.cols as usize * self.rows as usize
    }

    /// Check if a cell lies inside the grid.
    #[inline]
    #[must_use]
    pub const fn contains(&self, cell: Cell) -> bool {
        cell.x < self.cols && cell.y < self.rows
    }

    /// Check if a whole footprint lies inside the grid.
    #[inline]
    #[must_use]
    pub const fn fits(&self, footprint: &Footprint) -> bool {
        footprint.w > 0
            && footprint.h > 0
            && footprint.right() <= self.cols
            && footprint.bottom() <= self.rows
    }

    /// Map a row-major cell index to its cell, or `None` past the last cell.
    #[must_use]
    pub const fn index_to_cell(&self, index: usize) -> Option<Cell> {
        if index >= self.cell_count() {
            return None;
        }
        let cols = self.cols as usize;
        Some(Cell::new((index % cols) as u16, (index / cols) as u16))
    }

    /// Map a cell to its row-major index, or `None` outside the grid.
    #[must_use]
    pub const fn cell_to_index(&self, cell: Cell) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        Some(cell.y as usize * self.cols as usize + cell.x as usize)
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + use<> {
        let cols = self.cols;
        (0..self.rows).flat_map(move |y| (0..cols).map(move |x| Cell::new(x, y)))
    }
}

impl Default for GridDims {
    fn default() -> Self {
        Self::DEFAULT
    }
}
