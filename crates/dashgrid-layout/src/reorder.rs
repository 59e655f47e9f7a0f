//! List reordering and grid block swaps.
//!
//! Block swaps address the grid by row-major cell index. The mapping between
//! an index and its cell always goes through [`GridDims::index_to_cell`] and
//! [`GridDims::cell_to_index`]; list position never stands in for grid
//! position.

use dashgrid_core::{Cell, GridDims};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::GridRejection;
use crate::pad::pad;
use crate::validate::check_arrangement;
use crate::widget::Widget;

/// Move the entry at `old_index` to `new_index`, then pad.
///
/// List slots keep their grid cells: after the move every entry takes the
/// anchor that its new list position held before, so entries outside the
/// moved range stay where they were. Padding then resolves any overlap the
/// moved widget's footprint causes.
pub fn reorder(
    widgets: &[Widget],
    old_index: usize,
    new_index: usize,
    dims: GridDims,
) -> Result<Vec<Widget>, GridRejection> {
    let len = widgets.len();
    for index in [old_index, new_index] {
        if index >= len {
            return Err(GridRejection::IndexOutOfRange { index, len });
        }
    }

    let slots: Vec<Cell> = widgets.iter().map(Widget::anchor).collect();
    let mut moved = widgets.to_vec();
    let entry = moved.remove(old_index);
    moved.insert(new_index, entry);
    for (widget, slot) in moved.iter_mut().zip(slots) {
        widget.set_anchor(slot);
    }

    let padded = pad(&moved, dims);
    check_arrangement(&padded, dims)?;
    Ok(padded)
}

/// Swap the block footprint anchored at cell `source` with the one at cell
/// `target`, row by row across the source widget's height.
///
/// Both indices are normalized to the anchor of the widget covering them.
/// For each row offset `i` the widget anchored at `source + i*cols` moves to
/// `target + i*cols` and vice versa; offsets that leave the grid are skipped.
/// Spacers are regenerated afterwards, so only real widgets actually move.
pub fn move_to_grid(
    widgets: &[Widget],
    source: usize,
    target: usize,
    dims: GridDims,
) -> Result<Vec<Widget>, GridRejection> {
    let cells = dims.cell_count();
    for index in [source, target] {
        if index >= cells {
            return Err(GridRejection::CellOutOfRange { index, cells });
        }
    }

    let packed = pad(widgets, dims);
    let cover = coverage(&packed, dims);
    let (Some(src_widget), Some(tgt_widget)) = (cover[source], cover[target]) else {
        // Padding covers every cell, so this only happens for unplaceable input.
        return Err(check_arrangement(&packed, dims)
            .err()
            .map_or(GridRejection::CellOutOfRange { index: source, cells }, Into::into));
    };
    if src_widget == tgt_widget {
        check_arrangement(&packed, dims)?;
        return Ok(packed);
    }

    let src_anchor = anchor_index(&packed[src_widget], dims, source);
    let tgt_anchor = anchor_index(&packed[tgt_widget], dims, target);
    let rows = usize::from(packed[src_widget].size.h());
    let cols = usize::from(dims.cols);

    let anchored: FxHashMap<Cell, usize> = packed
        .iter()
        .enumerate()
        .filter(|(_, w)| w.occupies_grid())
        .map(|(index, w)| (w.anchor(), index))
        .collect();

    let mut moves: FxHashMap<usize, Cell> = FxHashMap::default();
    for i in 0..rows {
        let (Some(a), Some(b)) = (
            dims.index_to_cell(src_anchor + i * cols),
            dims.index_to_cell(tgt_anchor + i * cols),
        ) else {
            continue;
        };
        if let Some(&widget) = anchored.get(&a) {
            moves.entry(widget).or_insert(b);
        }
        if let Some(&widget) = anchored.get(&b) {
            moves.entry(widget).or_insert(a);
        }
    }

    let mut swapped = packed;
    for (&index, &cell) in &moves {
        debug!(widget = %swapped[index].id, to_x = cell.x, to_y = cell.y, "block swap");
        swapped[index].set_anchor(cell);
    }

    let result = pad(&swapped, dims);
    check_arrangement(&result, dims)?;
    Ok(result)
}

/// Per-cell index of the covering widget.
fn coverage(widgets: &[Widget], dims: GridDims) -> Vec<Option<usize>> {
    let mut cover = vec![None; dims.cell_count()];
    for (index, widget) in widgets.iter().enumerate().filter(|(_, w)| w.occupies_grid()) {
        for cell in widget.footprint().cells() {
            if let Some(slot) = dims.cell_to_index(cell) {
                cover[slot].get_or_insert(index);
            }
        }
    }
    cover
}

fn anchor_index(widget: &Widget, dims: GridDims, fallback: usize) -> usize {
    dims.cell_to_index(widget.anchor()).unwrap_or(fallback)
}
