#![forbid(unsafe_code)]

//! Transient boolean occupancy matrix.
//!
//! An [`Occupancy`] is rebuilt from a widget list on every placement or
//! validation pass and thrown away afterwards.
//!
//! # Invariants
//!
//! 1. `mark` only ever sets cells; nothing clears a cell once marked.
//! 2. `first_fit` scans origins in reading order, so the returned cell is
//!    the smallest `(y, x)` whose full footprint is free and in bounds.

use crate::geometry::{Cell, Footprint, GridDims};
use crate::size::BlockSize;

/// Row-major occupancy bitmap over a [`GridDims`] grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occupancy {
    dims: GridDims,
    cells: Vec<bool>,
}

impl Occupancy {
    /// An empty matrix.
    #[must_use]
    pub fn new(dims: GridDims) -> Self {
        Self {
            dims,
            cells: vec![false; dims.cell_count()],
        }
    }

    /// Grid dimensions.
    #[inline]
    #[must_use]
    pub const fn dims(&self) -> GridDims {
        self.dims
    }

    /// Whether a single cell is taken. Cells outside the grid count as taken.
    #[must_use]
    pub fn is_occupied(&self, cell: Cell) -> bool {
        match self.dims.cell_to_index(cell) {
            Some(index) => self.cells[index],
            None => true,
        }
    }

    /// Whether the whole footprint is in bounds and untouched.
    #[must_use]
    pub fn is_free(&self, footprint: &Footprint) -> bool {
        self.dims.fits(footprint) && footprint.cells().all(|cell| !self.is_occupied(cell))
    }

    /// Mark every in-bounds cell of the footprint as taken.
    pub fn mark(&mut self, footprint: &Footprint) {
        for cell in footprint.cells() {
            if let Some(index) = self.dims.cell_to_index(cell) {
                self.cells[index] = true;
            }
        }
    }

    /// First origin, in reading order, where `size` fits.
    #[must_use]
    pub fn first_fit(&self, size: BlockSize) -> Option<Cell> {
        self.first_fit_from(0, size)
    }

    /// First origin at or after row-major index `start` where `size` fits.
    #[must_use]
    pub fn first_fit_from(&self, start: usize, size: BlockSize) -> Option<Cell> {
        (start..self.dims.cell_count())
            .filter_map(|index| self.dims.index_to_cell(index))
            .find(|&cell| self.is_free(&Footprint::at(cell, size)))
    }

    /// Untouched cells in reading order.
    pub fn free_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.dims.cells().filter(|&cell| !self.is_occupied(cell))
    }

    /// Number of taken cells.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&taken| taken).count()
    }

    /// Whether every cell is taken.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&taken| taken)
    }
}
