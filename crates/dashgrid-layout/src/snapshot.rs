//! Persisted grid schema with versioning and migration scaffolding.
//!
//! A [`GridSnapshot`] is the whole-list persistence contract: the ordered
//! widget array together with grid dimensions, capacity, appearance, and
//! the id counter. Writers always replace the whole snapshot.
//!
//! # Schema Versioning Policy
//!
//! - Additive fields may ride in `extensions` without a version bump.
//! - Breaking changes bump [`GRID_SCHEMA_VERSION`] and add a migration arm.
//! - Version 0 lists (no appearance, no id counter, possibly unpadded) are
//!   migrated by padding the list and deriving the counter from existing ids.

use std::collections::BTreeMap;
use std::fmt;

use dashgrid_core::GridDims;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::appearance::Appearance;
use crate::pad::pad;
use crate::state::GridState;
use crate::validate::{
    ArrangementError, ArrangementIssueCode, check_arrangement, footprint_report,
};
use crate::widget::{Widget, WidgetId, WidgetKind};

/// Current grid schema version.
pub const GRID_SCHEMA_VERSION: u16 = 1;

// =========================================================================
// Schema
// =========================================================================

/// Persisted grid state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSnapshot {
    #[serde(default = "default_grid_version")]
    pub schema_version: u16,
    pub dims: GridDims,
    pub capacity: u16,
    pub widgets: Vec<Widget>,
    #[serde(default)]
    pub appearance: Appearance,
    #[serde(default)]
    pub next_id: u64,
    /// Forward-compatible extension bag.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extensions: BTreeMap<String, String>,
}

fn default_grid_version() -> u16 {
    GRID_SCHEMA_VERSION
}

impl GridSnapshot {
    /// Check structural validity without building a [`GridState`].
    pub fn validate(&self) -> Result<(), SnapshotValidationError> {
        if self.schema_version != GRID_SCHEMA_VERSION {
            return Err(SnapshotValidationError::UnsupportedVersion {
                found: self.schema_version,
                expected: GRID_SCHEMA_VERSION,
            });
        }
        if self.dims.cols == 0 || self.dims.rows == 0 {
            return Err(SnapshotValidationError::EmptyGrid);
        }
        let cells = self.dims.cell_count();
        if usize::from(self.capacity) > cells {
            return Err(SnapshotValidationError::CapacityExceedsGrid {
                capacity: self.capacity,
                cells,
            });
        }

        let mut ids = FxHashSet::default();
        let mut kinds = FxHashSet::default();
        for widget in &self.widgets {
            if !ids.insert(&widget.id) {
                return Err(SnapshotValidationError::DuplicateId {
                    id: widget.id.clone(),
                });
            }
            if widget.enabled && !widget.is_spacer() && !kinds.insert(widget.kind) {
                return Err(SnapshotValidationError::DuplicateEnabledKind { kind: widget.kind });
            }
        }

        check_arrangement(&self.widgets, self.dims).map_err(SnapshotValidationError::Arrangement)?;

        let uncovered = footprint_report(&self.widgets, self.dims)
            .issues
            .iter()
            .filter(|issue| issue.code == ArrangementIssueCode::UncoveredCell)
            .count();
        if uncovered > 0 {
            return Err(SnapshotValidationError::Gaps { uncovered });
        }
        Ok(())
    }
}

// =========================================================================
// GridState conversion
// =========================================================================

impl GridState {
    /// Capture the committed state (pending notifications are not persisted).
    #[must_use]
    pub fn to_snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            schema_version: GRID_SCHEMA_VERSION,
            dims: self.dims(),
            capacity: self.capacity(),
            widgets: self.widgets().to_vec(),
            appearance: self.appearance().clone(),
            next_id: self.next_id(),
            extensions: BTreeMap::new(),
        }
    }

    /// Restore a state from a validated snapshot.
    pub fn from_snapshot(snapshot: GridSnapshot) -> Result<Self, SnapshotValidationError> {
        snapshot.validate()?;
        let next_id = snapshot.next_id.max(derive_next_id(&snapshot.widgets));
        Ok(Self::from_parts(
            snapshot.dims,
            snapshot.capacity,
            snapshot.widgets,
            snapshot.appearance,
            next_id,
        ))
    }
}

/// One past the largest numeric id suffix among real widgets, at least 1.
fn derive_next_id(widgets: &[Widget]) -> u64 {
    widgets
        .iter()
        .filter(|w| !w.is_spacer())
        .filter_map(|w| w.id.as_str().rsplit('-').next()?.parse::<u64>().ok())
        .max()
        .map_or(1, |n| n.saturating_add(1))
}

// =========================================================================
// Errors
// =========================================================================

/// Validation errors for a persisted grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotValidationError {
    UnsupportedVersion { found: u16, expected: u16 },
    EmptyGrid,
    CapacityExceedsGrid { capacity: u16, cells: usize },
    DuplicateId { id: WidgetId },
    DuplicateEnabledKind { kind: WidgetKind },
    Arrangement(ArrangementError),
    /// Cells covered by neither a widget nor a spacer.
    Gaps { uncovered: usize },
}

impl fmt::Display for SnapshotValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedVersion { found, expected } => {
                write!(f, "unsupported grid schema version {found} (expected {expected})")
            }
            Self::EmptyGrid => write!(f, "grid must have at least one row and column"),
            Self::CapacityExceedsGrid { capacity, cells } => {
                write!(f, "capacity {capacity} exceeds the {cells}-cell grid")
            }
            Self::DuplicateId { id } => write!(f, "duplicate widget id {id}"),
            Self::DuplicateEnabledKind { kind } => {
                write!(f, "more than one enabled {kind} widget")
            }
            Self::Arrangement(err) => write!(f, "invalid arrangement: {err}"),
            Self::Gaps { uncovered } => {
                write!(f, "{uncovered} grid cell(s) not covered by a widget or spacer")
            }
        }
    }
}

impl std::error::Error for SnapshotValidationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Arrangement(err) => Some(err),
            _ => None,
        }
    }
}

/// Migration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotMigrationError {
    /// Version is newer than this build understands.
    UnsupportedVersion { version: u16 },
    NoMigrationPath { from: u16, to: u16 },
}

impl fmt::Display for SnapshotMigrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedVersion { version } => {
                write!(f, "unsupported schema version {version} for migration")
            }
            Self::NoMigrationPath { from, to } => {
                write!(f, "no migration path from v{from} to v{to}")
            }
        }
    }
}

impl std::error::Error for SnapshotMigrationError {}

/// Result of a successful migration.
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationResult {
    pub snapshot: GridSnapshot,
    pub from_version: u16,
    pub to_version: u16,
    pub warnings: Vec<String>,
}

// =========================================================================
// Migration
// =========================================================================

/// Bring `snapshot` to [`GRID_SCHEMA_VERSION`].
pub fn migrate_snapshot(snapshot: GridSnapshot) -> Result<MigrationResult, SnapshotMigrationError> {
    match snapshot.schema_version {
        GRID_SCHEMA_VERSION => Ok(MigrationResult {
            from_version: GRID_SCHEMA_VERSION,
            to_version: GRID_SCHEMA_VERSION,
            warnings: Vec::new(),
            snapshot,
        }),
        0 => Ok(migrate_v0(snapshot)),
        v if v > GRID_SCHEMA_VERSION => Err(SnapshotMigrationError::UnsupportedVersion { version: v }),
        v => Err(SnapshotMigrationError::NoMigrationPath {
            from: v,
            to: GRID_SCHEMA_VERSION,
        }),
    }
}

fn migrate_v0(mut snapshot: GridSnapshot) -> MigrationResult {
    let mut warnings = Vec::new();

    let padded = pad(&snapshot.widgets, snapshot.dims);
    if padded != snapshot.widgets {
        warnings.push("widget list re-padded".to_owned());
    }
    snapshot.widgets = padded;

    let derived = derive_next_id(&snapshot.widgets);
    if snapshot.next_id < derived {
        snapshot.next_id = derived;
    }

    let cells = u16::try_from(snapshot.dims.cell_count()).unwrap_or(u16::MAX);
    if snapshot.capacity == 0 || snapshot.capacity > cells {
        warnings.push(format!("capacity {} reset to {cells}", snapshot.capacity));
        snapshot.capacity = cells;
    }

    snapshot.schema_version = GRID_SCHEMA_VERSION;
    MigrationResult {
        snapshot,
        from_version: 0,
        to_version: GRID_SCHEMA_VERSION,
        warnings,
    }
}

/// Whether `snapshot` needs [`migrate_snapshot`] before use.
#[must_use]
pub fn needs_migration(snapshot: &GridSnapshot) -> bool {
    snapshot.schema_version != GRID_SCHEMA_VERSION
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appearance::Background;
    use dashgrid_core::{BlockSize, Cell};
    use serde_json::json;

    fn populated() -> GridState {
        let mut state = GridState::new(GridDims::DEFAULT);
        state.add_widget(WidgetKind::Calendar, None).unwrap();
        state.add_widget(WidgetKind::Clock, None).unwrap();
        state
    }

    #[test]
    fn state_round_trips_through_json() {
        let mut state = populated();
        state.set_background(Background::Color("#abc".to_owned()));
        let json = serde_json::to_string(&state.to_snapshot()).unwrap();
        let snapshot: GridSnapshot = serde_json::from_str(&json).unwrap();
        let restored = GridState::from_snapshot(snapshot).unwrap();
        assert_eq!(restored, state);
        assert_eq!(restored.state_hash(), state.state_hash());
    }

    #[test]
    fn widget_json_uses_type_key_and_size_token() {
        let snapshot = populated().to_snapshot();
        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["widgets"][0]["type"], "calendar");
        assert_eq!(value["widgets"][0]["size"], "2x2");
        assert_eq!(value["widgets"][0]["layout"], json!({"x": 0, "y": 0, "w": 2, "h": 2}));
    }

    #[test]
    fn validate_rejects_bad_capacity_and_version() {
        let mut snapshot = populated().to_snapshot();
        snapshot.capacity = 10;
        assert_eq!(
            snapshot.validate(),
            Err(SnapshotValidationError::CapacityExceedsGrid {
                capacity: 10,
                cells: 9
            })
        );

        let mut snapshot = populated().to_snapshot();
        snapshot.schema_version = 7;
        assert!(matches!(
            snapshot.validate(),
            Err(SnapshotValidationError::UnsupportedVersion { found: 7, .. })
        ));
    }

    #[test]
    fn validate_rejects_overlap() {
        let mut snapshot = populated().to_snapshot();
        let clock = snapshot
            .widgets
            .iter_mut()
            .find(|w| w.kind == WidgetKind::Clock)
            .unwrap();
        clock.set_anchor(Cell::new(1, 1));
        assert!(matches!(
            snapshot.validate(),
            Err(SnapshotValidationError::Arrangement(_))
        ));
    }

    #[test]
    fn validate_rejects_unpadded_widget_list() {
        let mut snapshot = populated().to_snapshot();
        snapshot.widgets.retain(|w| !w.is_spacer());
        assert_eq!(
            snapshot.validate(),
            Err(SnapshotValidationError::Gaps { uncovered: 4 })
        );
    }

    #[test]
    fn empty_widget_list_does_not_load() {
        let mut snapshot = GridState::new(GridDims::DEFAULT).to_snapshot();
        snapshot.widgets.clear();
        assert_eq!(
            GridState::from_snapshot(snapshot),
            Err(SnapshotValidationError::Gaps { uncovered: 9 })
        );
    }

    #[test]
    fn validate_rejects_duplicate_enabled_kind() {
        let mut snapshot = GridState::new(GridDims::DEFAULT).to_snapshot();
        snapshot.widgets = pad(
            &[
                Widget::new("a", WidgetKind::Timer, BlockSize::ONE),
                Widget::new("b", WidgetKind::Timer, BlockSize::ONE).with_anchor(Cell::new(1, 0)),
            ],
            snapshot.dims,
        );
        assert_eq!(
            snapshot.validate(),
            Err(SnapshotValidationError::DuplicateEnabledKind {
                kind: WidgetKind::Timer
            })
        );
    }

    #[test]
    fn missing_optional_fields_default() {
        let snapshot: GridSnapshot = serde_json::from_value(json!({
            "dims": {"cols": 3, "rows": 3},
            "capacity": 9,
            "widgets": [],
        }))
        .unwrap();
        assert_eq!(snapshot.schema_version, GRID_SCHEMA_VERSION);
        assert_eq!(snapshot.appearance, Appearance::default());
        assert!(!needs_migration(&snapshot));
    }

    #[test]
    fn from_snapshot_repairs_id_counter() {
        let mut snapshot = populated().to_snapshot();
        snapshot.next_id = 0;
        let mut state = GridState::from_snapshot(snapshot).unwrap();
        let id = state.add_widget(WidgetKind::Weather, None).unwrap();
        assert_eq!(id.as_str(), "weather-3");
    }

    #[test]
    fn v0_lists_are_padded_on_migration() {
        let snapshot: GridSnapshot = serde_json::from_value(json!({
            "schema_version": 0,
            "dims": {"cols": 3, "rows": 3},
            "capacity": 0,
            "widgets": [
                {"id": "tasks-4", "type": "tasks", "size": "1x2", "layout": {"x": 2, "y": 0}}
            ],
        }))
        .unwrap();
        assert!(needs_migration(&snapshot));

        let migrated = migrate_snapshot(snapshot).unwrap();
        assert_eq!(migrated.from_version, 0);
        assert_eq!(migrated.warnings.len(), 2);
        assert_eq!(migrated.snapshot.widgets.len(), 8);
        assert_eq!(migrated.snapshot.next_id, 5);
        assert_eq!(migrated.snapshot.capacity, 9);
        assert!(migrated.snapshot.validate().is_ok());
    }

    #[test]
    fn future_versions_are_refused() {
        let mut snapshot = populated().to_snapshot();
        snapshot.schema_version = 9;
        assert_eq!(
            migrate_snapshot(snapshot),
            Err(SnapshotMigrationError::UnsupportedVersion { version: 9 })
        );
    }
}
