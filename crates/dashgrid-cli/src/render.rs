//! Plain-text rendering of a grid for terminal output.

use std::fmt::Write as _;

use dashgrid_layout::{GridState, Widget};

const CELL_WIDTH: usize = 10;

/// Draw the grid as boxed rows; each cell shows the kind covering it, `.`
/// for spacers.
#[must_use]
pub fn render_grid(state: &GridState) -> String {
    let dims = state.dims();
    let cols = usize::from(dims.cols);
    let mut labels = vec![String::from("?"); dims.cell_count()];

    for widget in state.widgets().iter().filter(|w| w.occupies_grid()) {
        let label = cell_label(widget);
        for cell in widget.footprint().cells() {
            if let Some(index) = dims.cell_to_index(cell) {
                labels[index] = label.clone();
            }
        }
    }

    let border = format!("+{}", format!("{}+", "-".repeat(CELL_WIDTH + 2)).repeat(cols));
    let mut out = String::new();
    let _ = writeln!(out, "{border}");
    for row in labels.chunks(cols) {
        out.push('|');
        for label in row {
            let _ = write!(out, " {label:<CELL_WIDTH$} |");
        }
        out.push('\n');
        let _ = writeln!(out, "{border}");
    }
    out
}

/// One line per real widget: id, kind, size, anchor, state.
#[must_use]
pub fn render_widget_table(state: &GridState) -> String {
    let mut out = String::new();
    for widget in state.real_widgets() {
        let status = if widget.enabled { "shown" } else { "hidden" };
        let _ = writeln!(
            out,
            "{:<16} {:<10} {:<4} ({},{}) {status}",
            widget.id.as_str(),
            widget.kind.as_str(),
            widget.size.to_string(),
            widget.layout.x,
            widget.layout.y,
        );
    }
    let _ = writeln!(
        out,
        "capacity {} blocks, {} used, {} free",
        state.capacity(),
        state.used_blocks(),
        state.free_blocks()
    );
    out
}

fn cell_label(widget: &Widget) -> String {
    if widget.is_spacer() {
        return ".".to_owned();
    }
    widget.kind.as_str().chars().take(CELL_WIDTH).collect()
}
