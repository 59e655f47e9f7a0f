//! Subcommand handlers.
//!
//! Every mutating handler follows the same shape: load, apply one
//! [`GridOperation`], report queued notifications, and only write the state
//! file when the operation committed.

use dashgrid_layout::{
    BlockSize, CapacityBreakpoints, GridDims, GridEvent, GridOperation, GridOutcome,
    GridRejection, GridState, Settings, Widget, WidgetId, WidgetKind, builtin_presets,
    footprint_report,
};
use serde_json::json;
use tracing::info;

use crate::cli::{AddArgs, CapacityArgs, GlobalArgs, InitArgs};
use crate::error::{CliError, Result};
use crate::render::{render_grid, render_widget_table};
use crate::store;

pub fn init(global: &GlobalArgs, args: &InitArgs) -> Result<()> {
    if global.state.exists() && !args.force {
        return Err(CliError::StateExists {
            path: global.state.clone(),
        });
    }

    let dims = GridDims::new(args.cols, args.rows);
    let mut state = match args.capacity {
        Some(capacity) => GridState::with_capacity(dims, capacity),
        None => GridState::new(dims),
    };
    if let Some(width) = args.viewport_width {
        state.set_viewport_width(width, &CapacityBreakpoints::DEFAULT)?;
    }

    store::save(&global.state, &state)?;
    info!(path = %global.state.display(), cols = dims.cols, rows = dims.rows, "grid created");
    if global.json {
        println!("{}", serde_json::to_string(&state.to_snapshot())?);
    } else {
        println!(
            "created {}x{} grid with capacity {} at {}",
            dims.cols,
            dims.rows,
            state.capacity(),
            global.state.display()
        );
    }
    Ok(())
}

pub fn show(global: &GlobalArgs) -> Result<()> {
    let state = store::load(&global.state)?;
    if global.json {
        println!("{}", serde_json::to_string_pretty(&state.to_snapshot())?);
    } else {
        print!("{}", render_grid(&state));
        print!("{}", render_widget_table(&state));
    }
    Ok(())
}

pub fn add(global: &GlobalArgs, args: &AddArgs) -> Result<()> {
    let kind = parse_kind(&args.kind)?;
    let size = args.size.as_deref().map(BlockSize::parse_lossy);
    mutate(global, GridOperation::AddWidget { kind, size })
}

pub fn remove(global: &GlobalArgs, id: String) -> Result<()> {
    mutate(global, GridOperation::RemoveWidget { id: id.into() })
}

pub fn resize(global: &GlobalArgs, id: String, size: &str) -> Result<()> {
    mutate(
        global,
        GridOperation::ResizeWidget {
            id: id.into(),
            size: BlockSize::parse_lossy(size),
        },
    )
}

pub fn toggle(global: &GlobalArgs, id: String) -> Result<()> {
    let id = WidgetId::from(id);
    let state = store::load(&global.state)?;
    let enabled = real_widget(&state, &id)?.enabled;
    apply(global, state, GridOperation::SetEnabled { id, enabled: !enabled })
}

pub fn settings(global: &GlobalArgs, id: String, value: Option<&str>) -> Result<()> {
    let id = WidgetId::from(id);
    let state = store::load(&global.state)?;

    let Some(raw) = value else {
        let widget = real_widget(&state, &id)?;
        println!("{}", serde_json::to_string_pretty(widget.settings.as_value())?);
        return Ok(());
    };

    let payload = serde_json::from_str(raw).unwrap_or_else(|_| json!(raw));
    apply(
        global,
        state,
        GridOperation::UpdateSettings {
            id,
            settings: Settings::new(payload),
        },
    )
}

pub fn reorder(global: &GlobalArgs, from: usize, to: usize) -> Result<()> {
    mutate(global, GridOperation::Reorder { from, to })
}

pub fn swap(global: &GlobalArgs, source: usize, target: usize) -> Result<()> {
    mutate(global, GridOperation::MoveToGrid { source, target })
}

pub fn preset(global: &GlobalArgs, id: String) -> Result<()> {
    mutate(global, GridOperation::ApplyPreset { preset: id })
}

pub fn presets(global: &GlobalArgs) -> Result<()> {
    let presets = builtin_presets();
    if global.json {
        println!("{}", serde_json::to_string_pretty(&presets)?);
        return Ok(());
    }
    for preset in presets {
        let kinds: Vec<&str> = preset.entries.iter().map(|e| e.kind.as_str()).collect();
        println!(
            "{:<8} {:<8} {} [{}]",
            preset.id,
            preset.name,
            preset.description,
            kinds.join(", ")
        );
    }
    Ok(())
}

pub fn capacity(global: &GlobalArgs, args: &CapacityArgs) -> Result<()> {
    let mut state = store::load(&global.state)?;
    let target = match (args.value, args.viewport_width) {
        (Some(value), _) => Some(value),
        (None, Some(width)) => {
            Some(CapacityBreakpoints::DEFAULT.capacity_for_width(width, state.dims()))
        }
        (None, None) => None,
    };

    let Some(capacity) = target else {
        if global.json {
            println!(
                "{}",
                json!({
                    "capacity": state.capacity(),
                    "used": state.used_blocks(),
                    "free": state.free_blocks(),
                })
            );
        } else {
            println!(
                "capacity {} blocks, {} used, {} free",
                state.capacity(),
                state.used_blocks(),
                state.free_blocks()
            );
        }
        return Ok(());
    };

    let outcome = state.set_capacity(capacity)?;
    store::save(&global.state, &state)?;
    report_outcome(global, &outcome, &state);
    Ok(())
}

pub fn validate(global: &GlobalArgs) -> Result<()> {
    let snapshot = store::read_snapshot(&global.state)?;
    let report = footprint_report(&snapshot.widgets, snapshot.dims);
    let verdict = snapshot.validate();

    if global.json {
        let issues: Vec<String> = report.issues.iter().map(ToString::to_string).collect();
        println!(
            "{}",
            json!({
                "valid": verdict.is_ok(),
                "error": verdict.as_ref().err().map(ToString::to_string),
                "issues": issues,
            })
        );
    } else {
        for issue in &report.issues {
            println!("{issue}");
        }
        if verdict.is_ok() {
            println!(
                "ok: {} widget(s) on a {}x{} grid",
                snapshot.widgets.len(),
                snapshot.dims.cols,
                snapshot.dims.rows
            );
        }
    }
    verdict.map_err(CliError::from)
}

pub fn kinds(global: &GlobalArgs) -> Result<()> {
    if global.json {
        let kinds: Vec<_> = WidgetKind::ADDABLE
            .iter()
            .map(|kind| json!({"kind": kind, "size": kind.default_size()}))
            .collect();
        println!("{}", serde_json::to_string_pretty(&kinds)?);
        return Ok(());
    }
    for kind in WidgetKind::ADDABLE {
        println!("{:<10} {}", kind.as_str(), kind.default_size());
    }
    Ok(())
}

// -------------------------------------------------------------------------
// Helpers
// -------------------------------------------------------------------------

fn mutate(global: &GlobalArgs, operation: GridOperation) -> Result<()> {
    let state = store::load(&global.state)?;
    apply(global, state, operation)
}

fn apply(global: &GlobalArgs, mut state: GridState, operation: GridOperation) -> Result<()> {
    let result = state.apply_operation(operation);
    report_events(global, &state.drain_events());
    let outcome = result?;
    if outcome.changed() {
        store::save(&global.state, &state)?;
    }
    report_outcome(global, &outcome, &state);
    Ok(())
}

fn report_events(global: &GlobalArgs, events: &[GridEvent]) {
    for event in events {
        if global.json {
            eprintln!("{}", json!({ "notice": event }));
            continue;
        }
        match event {
            GridEvent::CapacityReached { kind } => {
                eprintln!("notice: no room left on the grid for {kind}");
            }
            GridEvent::PresetEntriesDropped { preset, kinds } => {
                let names: Vec<&str> = kinds.iter().map(|k| k.as_str()).collect();
                eprintln!("notice: preset {preset} dropped {}", names.join(", "));
            }
        }
    }
}

fn report_outcome(global: &GlobalArgs, outcome: &GridOutcome, state: &GridState) {
    let touched: Vec<&str> = outcome.touched.iter().map(WidgetId::as_str).collect();
    if global.json {
        println!(
            "{}",
            json!({
                "status": "ok",
                "op": outcome.kind,
                "touched": touched,
                "changed": outcome.changed(),
                "capacity": state.capacity(),
                "free": state.free_blocks(),
            })
        );
    } else if outcome.changed() {
        println!("{}: {}", outcome.kind.as_str(), touched.join(", "));
    } else {
        println!("{}: no change", outcome.kind.as_str());
    }
}

fn parse_kind(raw: &str) -> Result<WidgetKind> {
    WidgetKind::from_name(raw).ok_or_else(|| {
        let known: Vec<&str> = WidgetKind::ADDABLE.iter().map(|k| k.as_str()).collect();
        CliError::invalid(format!(
            "unknown widget kind {raw:?} (expected one of: {})",
            known.join(", ")
        ))
    })
}

fn real_widget<'a>(state: &'a GridState, id: &WidgetId) -> Result<&'a Widget> {
    match state.widget(id) {
        Some(widget) if widget.is_spacer() => {
            Err(GridRejection::NotARealWidget { id: id.clone() }.into())
        }
        Some(widget) => Ok(widget),
        None => Err(GridRejection::WidgetNotFound { id: id.clone() }.into()),
    }
}
