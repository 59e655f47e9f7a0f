//! Arrangement validation.
//!
//! Two complementary checks live here:
//!
//! - [`validate`] simulates flowing the widgets onto the grid in list order
//!   with a forward-only row-major cursor. It answers "can this sequence be
//!   laid out at all" and ignores recorded anchors.
//! - [`footprint_report`] inspects the recorded anchors directly and reports
//!   out-of-bounds footprints, overlaps, duplicate ids, and gaps.
//!
//! [`check_arrangement`] runs both and is the commit gate for every mutating
//! operation on [`GridState`](crate::GridState).

use std::fmt;

use dashgrid_core::{BlockSize, Cell, Footprint, GridDims, Occupancy};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::widget::{Widget, WidgetId};

/// Flow-simulate `widgets` onto a `dims` grid; `true` when every widget
/// found an in-bounds, non-overlapping slot.
#[must_use]
pub fn validate(widgets: &[Widget], dims: GridDims) -> bool {
    flow_check(widgets, dims).is_ok()
}

/// Flow simulation returning the first widget that overflowed.
fn flow_check(widgets: &[Widget], dims: GridDims) -> Result<(), WidgetId> {
    let mut occupancy = Occupancy::new(dims);
    let mut cursor = 0usize;

    for widget in widgets.iter().filter(|w| w.occupies_grid()) {
        let Some(origin) = flow_slot(&occupancy, &mut cursor, widget.size) else {
            return Err(widget.id.clone());
        };
        occupancy.mark(&Footprint::at(origin, widget.size));
    }

    Ok(())
}

/// Advance the cursor to the next origin where `size` fits.
///
/// The cursor only moves forward: cells skipped over are never revisited by
/// later widgets in the same pass.
fn flow_slot(occupancy: &Occupancy, cursor: &mut usize, size: BlockSize) -> Option<Cell> {
    let dims = occupancy.dims();
    let width = u16::from(size.w());
    if width > dims.cols || u16::from(size.h()) > dims.rows {
        return None;
    }

    loop {
        let cell = dims.index_to_cell(*cursor)?;
        if occupancy.is_occupied(cell) {
            *cursor += 1;
            continue;
        }
        if cell.x + width > dims.cols {
            // Wrap to column 0 of the next row.
            *cursor = (usize::from(cell.y) + 1) * usize::from(dims.cols);
            continue;
        }
        if occupancy.is_free(&Footprint::at(cell, size)) {
            return Some(cell);
        }
        *cursor += 1;
    }
}

// =========================================================================
// Footprint report
// =========================================================================

/// Severity for one arrangement finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ArrangementSeverity {
    /// Cosmetic; padding repairs it.
    Warning,
    /// The arrangement must not be committed.
    Error,
}

/// Stable code for arrangement findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ArrangementIssueCode {
    /// A footprint crosses the right or bottom edge.
    OutOfBounds,
    /// Two footprints share a cell.
    Overlap,
    /// Two widgets carry the same id.
    DuplicateId,
    /// A spacer is not a 1×1 block.
    OversizedSpacer,
    /// A cell is covered by nothing.
    UncoveredCell,
}

impl ArrangementIssueCode {
    /// Severity of this finding.
    #[must_use]
    pub const fn severity(self) -> ArrangementSeverity {
        match self {
            Self::UncoveredCell => ArrangementSeverity::Warning,
            Self::OutOfBounds | Self::Overlap | Self::DuplicateId | Self::OversizedSpacer => {
                ArrangementSeverity::Error
            }
        }
    }
}

/// One finding from [`footprint_report`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrangementIssue {
    pub code: ArrangementIssueCode,
    pub widget: Option<WidgetId>,
    pub other: Option<WidgetId>,
    pub cell: Option<Cell>,
}

impl fmt::Display for ArrangementIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widget = self.widget.as_ref().map_or("-", WidgetId::as_str);
        match (self.code, &self.other, self.cell) {
            (ArrangementIssueCode::Overlap, Some(other), Some(cell)) => write!(
                f,
                "widget {widget} overlaps {other} at ({}, {})",
                cell.x, cell.y
            ),
            (ArrangementIssueCode::OutOfBounds, _, _) => {
                write!(f, "widget {widget} extends past the grid edge")
            }
            (ArrangementIssueCode::DuplicateId, _, _) => {
                write!(f, "widget id {widget} appears more than once")
            }
            (ArrangementIssueCode::OversizedSpacer, _, _) => {
                write!(f, "spacer {widget} is larger than one block")
            }
            (ArrangementIssueCode::UncoveredCell, _, Some(cell)) => {
                write!(f, "cell ({}, {}) is not covered", cell.x, cell.y)
            }
            (code, _, _) => write!(f, "{code:?} on {widget}"),
        }
    }
}

/// Structured report over the recorded anchors of a widget list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArrangementReport {
    pub issues: Vec<ArrangementIssue>,
}

impl ArrangementReport {
    /// True when any finding is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.issues
            .iter()
            .any(|issue| issue.code.severity() == ArrangementSeverity::Error)
    }

    /// True when every cell is covered.
    #[must_use]
    pub fn is_gapless(&self) -> bool {
        !self
            .issues
            .iter()
            .any(|issue| issue.code == ArrangementIssueCode::UncoveredCell)
    }

    /// First error-severity finding.
    #[must_use]
    pub fn first_error(&self) -> Option<&ArrangementIssue> {
        self.issues
            .iter()
            .find(|issue| issue.code.severity() == ArrangementSeverity::Error)
    }
}

/// Check recorded anchors against bounds, each other, and grid coverage.
#[must_use]
pub fn footprint_report(widgets: &[Widget], dims: GridDims) -> ArrangementReport {
    let mut issues = Vec::new();
    let mut seen_ids = FxHashSet::default();
    let mut owner: FxHashMap<Cell, &WidgetId> = FxHashMap::default();

    for widget in widgets {
        if !seen_ids.insert(&widget.id) {
            issues.push(ArrangementIssue {
                code: ArrangementIssueCode::DuplicateId,
                widget: Some(widget.id.clone()),
                other: None,
                cell: None,
            });
        }
        if !widget.occupies_grid() {
            continue;
        }
        if widget.is_spacer() && widget.block_count() != 1 {
            issues.push(ArrangementIssue {
                code: ArrangementIssueCode::OversizedSpacer,
                widget: Some(widget.id.clone()),
                other: None,
                cell: Some(widget.anchor()),
            });
        }

        let footprint = widget.footprint();
        if !dims.fits(&footprint) {
            issues.push(ArrangementIssue {
                code: ArrangementIssueCode::OutOfBounds,
                widget: Some(widget.id.clone()),
                other: None,
                cell: Some(widget.anchor()),
            });
        }

        for cell in footprint.cells().filter(|&cell| dims.contains(cell)) {
            if let Some(previous) = owner.insert(cell, &widget.id) {
                issues.push(ArrangementIssue {
                    code: ArrangementIssueCode::Overlap,
                    widget: Some(widget.id.clone()),
                    other: Some(previous.clone()),
                    cell: Some(cell),
                });
            }
        }
    }

    for cell in dims.cells().filter(|cell| !owner.contains_key(cell)) {
        issues.push(ArrangementIssue {
            code: ArrangementIssueCode::UncoveredCell,
            widget: None,
            other: None,
            cell: Some(cell),
        });
    }

    ArrangementReport { issues }
}

// =========================================================================
// Commit gate
// =========================================================================

/// Why an arrangement was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArrangementError {
    /// The flow simulation ran off the bottom of the grid.
    Overflow { widget: WidgetId },
    /// The recorded anchors violate an invariant.
    Invariant {
        issue_count: usize,
        first: ArrangementIssue,
    },
}

impl fmt::Display for ArrangementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overflow { widget } => {
                write!(f, "widget {widget} does not fit in the remaining grid")
            }
            Self::Invariant { issue_count, first } => {
                write!(f, "{issue_count} layout violation(s), first: {first}")
            }
        }
    }
}

impl std::error::Error for ArrangementError {}

/// Run the flow validator and the footprint report; `Ok` only when both pass.
pub fn check_arrangement(widgets: &[Widget], dims: GridDims) -> Result<(), ArrangementError> {
    flow_check(widgets, dims).map_err(|widget| ArrangementError::Overflow { widget })?;

    let report = footprint_report(widgets, dims);
    if let Some(first) = report.first_error() {
        let issue_count = report
            .issues
            .iter()
            .filter(|issue| issue.code.severity() == ArrangementSeverity::Error)
            .count();
        return Err(ArrangementError::Invariant {
            issue_count,
            first: first.clone(),
        });
    }

    Ok(())
}
