#![forbid(unsafe_code)]

//! Viewport-driven capacity.
//!
//! The host reports its viewport width; [`CapacityBreakpoints`] classifies it
//! and decides how many grid columns are usable, which bounds the number of
//! blocks real widgets may occupy.
//!
//! # Invariants
//!
//! 1. Classification is monotonic in width.
//! 2. Resolved capacity never exceeds `rows * cols`.

use dashgrid_core::GridDims;
use serde::{Deserialize, Serialize};

/// Width class of the host viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewportClass {
    Narrow,
    Medium,
    Wide,
}

impl ViewportClass {
    /// Columns usable at this class, clamped to the grid.
    #[must_use]
    pub const fn usable_cols(self, dims: GridDims) -> u16 {
        let cols = match self {
            Self::Narrow => 1,
            Self::Medium => 2,
            Self::Wide => dims.cols,
        };
        if cols < dims.cols { cols } else { dims.cols }
    }
}

/// Pixel thresholds between viewport classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityBreakpoints {
    /// Widths below this are [`ViewportClass::Narrow`].
    pub medium: u32,
    /// Widths below this (and at least `medium`) are [`ViewportClass::Medium`].
    pub wide: u32,
}

impl CapacityBreakpoints {
    pub const DEFAULT: Self = Self {
        medium: 640,
        wide: 1024,
    };

    /// Thresholds with `wide` raised to at least `medium`.
    #[must_use]
    pub const fn new(medium: u32, wide: u32) -> Self {
        Self {
            medium,
            wide: if wide < medium { medium } else { wide },
        }
    }

    #[must_use]
    pub const fn classify_width(&self, width: u32) -> ViewportClass {
        if width < self.medium {
            ViewportClass::Narrow
        } else if width < self.wide {
            ViewportClass::Medium
        } else {
            ViewportClass::Wide
        }
    }

    /// Block capacity for a viewport `width` on a `dims` grid.
    #[must_use]
    pub fn capacity_for_width(&self, width: u32, dims: GridDims) -> u16 {
        let cols = self.classify_width(width).usable_cols(dims);
        cols.saturating_mul(dims.rows)
    }
}

impl Default for CapacityBreakpoints {
    fn default() -> Self {
        Self::DEFAULT
    }
}
