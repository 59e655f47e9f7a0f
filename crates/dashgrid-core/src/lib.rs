#![forbid(unsafe_code)]

//! Core: block geometry for the dashgrid placement engine.
//!
//! # Role in dashgrid
//! `dashgrid-core` is the geometry layer. It knows nothing about widgets; it
//! only answers questions about blocks, cells, and rectangular footprints on
//! a bounded grid.
//!
//! # Primary responsibilities
//! - **Size tokens**: lossy parsing of `"WxH"` tokens into [`BlockSize`].
//! - **Grid geometry**: [`GridDims`], [`Cell`], [`Footprint`], and the
//!   explicit row-major index↔cell mapping.
//! - **Occupancy**: the transient boolean matrix used by every placement
//!   pass ([`Occupancy`]).
//!
//! # How it fits in the system
//! `dashgrid-layout` builds widgets on top of these primitives and rebuilds
//! an [`Occupancy`] from the widget list whenever it needs to place or
//! validate; the matrix itself is never persisted.

pub mod geometry;
pub mod occupancy;
pub mod size;

pub use geometry::{Cell, Footprint, GridDims};
pub use occupancy::Occupancy;
pub use size::{BlockSize, MAX_BLOCKS, MIN_BLOCKS, size_to_blocks};
