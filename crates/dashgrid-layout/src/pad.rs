//! Grid padding ("densify").
//!
//! Padding recomputes real-widget placement and fills every remaining cell
//! with a 1×1 spacer so the grid is always rectangular and gapless.
//!
//! # Invariants
//!
//! 1. Existing spacers are discarded and regenerated on every pass.
//! 2. A real widget keeps its recorded anchor when that footprint is in
//!    bounds and free of widgets placed earlier in the same pass; otherwise
//!    it moves to the smallest free `(y, x)` origin.
//! 3. Output grid entries are sorted by `(y, x)`; disabled widgets follow
//!    in their original order.
//! 4. For a fixed input order and grid the output is fully deterministic,
//!    spacer ids included.
//!
//! # Failure Modes
//!
//! A widget that fits nowhere is reported in [`PadOutcome::unplaced`] and
//! emitted at its recorded anchor, so the result fails validation instead of
//! silently losing the widget.

use dashgrid_core::{Cell, Footprint, GridDims, Occupancy};
use tracing::{debug, warn};

use crate::widget::{Widget, WidgetId};

/// Result of a padding pass.
#[derive(Debug, Clone, PartialEq)]
pub struct PadOutcome {
    /// The padded widget list.
    pub widgets: Vec<Widget>,
    /// Real widgets that had to leave their recorded anchor.
    pub relocated: Vec<WidgetId>,
    /// Real widgets that fit nowhere.
    pub unplaced: Vec<WidgetId>,
}

impl PadOutcome {
    /// Whether every real widget found a slot.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unplaced.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AnchorPolicy {
    KeepRecorded,
    Reflow,
}

/// Pad `widgets` onto a `dims` grid.
#[must_use]
pub fn pad(widgets: &[Widget], dims: GridDims) -> Vec<Widget> {
    pad_with_report(widgets, dims).widgets
}

/// Pad and report which widgets moved or could not be placed.
#[must_use]
pub fn pad_with_report(widgets: &[Widget], dims: GridDims) -> PadOutcome {
    place(widgets, dims, AnchorPolicy::KeepRecorded)
}

/// Pad ignoring recorded anchors: real widgets are laid out first-fit in
/// list order.
#[must_use]
pub fn reflow(widgets: &[Widget], dims: GridDims) -> Vec<Widget> {
    place(widgets, dims, AnchorPolicy::Reflow).widgets
}

fn place(widgets: &[Widget], dims: GridDims, policy: AnchorPolicy) -> PadOutcome {
    let mut occupancy = Occupancy::new(dims);
    let mut grid: Vec<Widget> = Vec::with_capacity(dims.cell_count());
    let mut hidden = Vec::new();
    let mut relocated = Vec::new();
    let mut unplaced = Vec::new();

    for widget in widgets.iter().filter(|w| !w.is_spacer()) {
        if !widget.enabled {
            hidden.push(widget.clone());
            continue;
        }

        let recorded = widget.anchor();
        let keep = policy == AnchorPolicy::KeepRecorded
            && occupancy.is_free(&Footprint::at(recorded, widget.size));
        let origin = if keep {
            Some(recorded)
        } else {
            occupancy.first_fit(widget.size)
        };

        match origin {
            Some(origin) => {
                if origin != recorded {
                    debug!(
                        widget = %widget.id,
                        from_x = recorded.x,
                        from_y = recorded.y,
                        to_x = origin.x,
                        to_y = origin.y,
                        "relocated widget"
                    );
                    relocated.push(widget.id.clone());
                }
                occupancy.mark(&Footprint::at(origin, widget.size));
                grid.push(widget.clone().with_anchor(origin));
            }
            None => {
                warn!(widget = %widget.id, size = %widget.size, "widget fits nowhere on grid");
                unplaced.push(widget.id.clone());
                grid.push(widget.clone().with_anchor(recorded));
            }
        }
    }

    let free: Vec<Cell> = occupancy.free_cells().collect();
    grid.extend(free.into_iter().map(Widget::spacer));
    grid.sort_by_key(|w| w.anchor().reading_key());
    grid.extend(hidden);

    PadOutcome {
        widgets: grid,
        relocated,
        unplaced,
    }
}
