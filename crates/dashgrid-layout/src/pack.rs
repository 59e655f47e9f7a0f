//! Insertion search.
//!
//! Policy: prefer reusing a spacer's slot, else append, else give up. Every
//! candidate arrangement is padded and must pass
//! [`check_arrangement`](crate::validate::check_arrangement); the first one
//! that does is returned. At most `spacers + 1` candidates are tried.

use dashgrid_core::{Cell, GridDims};
use tracing::debug;

use crate::pad::pad;
use crate::validate::check_arrangement;
use crate::widget::Widget;

/// Find a legal arrangement containing `candidate`.
///
/// Each spacer slot is tried with the candidate anchored at that spacer's
/// cell; padding relocates it when the footprint does not fit there.
/// Returns `None` when neither a spacer substitution nor an append yields a
/// valid grid; `widgets` is never modified.
#[must_use]
pub fn insert_widget(widgets: &[Widget], candidate: &Widget, dims: GridDims) -> Option<Vec<Widget>> {
    let spacer_slots = widgets
        .iter()
        .enumerate()
        .filter(|(_, w)| w.is_spacer())
        .map(|(index, _)| index);

    for slot in spacer_slots {
        let mut trial = widgets.to_vec();
        let anchor = trial[slot].anchor();
        trial[slot] = candidate.clone().with_anchor(anchor);
        let padded = pad(&trial, dims);
        match check_arrangement(&padded, dims) {
            Ok(()) => {
                debug!(widget = %candidate.id, slot, "placed in spacer slot");
                return Some(padded);
            }
            Err(err) => debug!(widget = %candidate.id, slot, %err, "spacer slot rejected"),
        }
    }

    let mut trial = widgets.to_vec();
    trial.push(candidate.clone().with_anchor(Cell::default()));
    let padded = pad(&trial, dims);
    match check_arrangement(&padded, dims) {
        Ok(()) => {
            debug!(widget = %candidate.id, "placed by append");
            Some(padded)
        }
        Err(err) => {
            debug!(widget = %candidate.id, %err, "append rejected");
            None
        }
    }
}
