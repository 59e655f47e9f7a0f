#![forbid(unsafe_code)]

//! Widget placement, padding, and transactional grid state.
//!
//! Control flow for every mutation: an operation on [`GridState`] calls into
//! packing or reordering, those call [`pad`], and the padded list must pass
//! [`check_arrangement`] before it replaces the committed list.

pub mod appearance;
pub mod error;
pub mod pack;
pub mod pad;
pub mod preset;
pub mod reorder;
pub mod snapshot;
pub mod state;
pub mod validate;
pub mod viewport;
pub mod widget;

pub use appearance::{Appearance, Background};
pub use error::GridRejection;
pub use pack::insert_widget;
pub use pad::{PadOutcome, pad, pad_with_report, reflow};
pub use preset::{
    PRESET_TRACKS, Preset, PresetCompanion, PresetEntry, PresetSlot, builtin_presets, find_preset,
    generate_layout,
};
pub use reorder::{move_to_grid, reorder};
pub use snapshot::{
    GRID_SCHEMA_VERSION, GridSnapshot, MigrationResult, SnapshotMigrationError,
    SnapshotValidationError, migrate_snapshot, needs_migration,
};
pub use state::{GridEvent, GridOperation, GridOperationKind, GridOutcome, GridState};
pub use validate::{
    ArrangementError, ArrangementIssue, ArrangementIssueCode, ArrangementReport,
    ArrangementSeverity, check_arrangement, footprint_report, validate,
};
pub use viewport::{CapacityBreakpoints, ViewportClass};
pub use widget::{Settings, Widget, WidgetId, WidgetKind, WidgetLayout};

pub use dashgrid_core::{BlockSize, Cell, Footprint, GridDims, size_to_blocks};
