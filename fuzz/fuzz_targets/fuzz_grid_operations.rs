#![no_main]

use arbitrary::Arbitrary;
use dashgrid_layout::{
    BlockSize, GridDims, GridOperation, GridRejection, GridState, Settings, WidgetKind,
    check_arrangement, pad, validate,
};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    cols: u8,
    rows: u8,
    capacity: u8,
    ops: Vec<Op>,
}

#[derive(Debug, Arbitrary)]
enum Op {
    Add { kind: u8, size: Option<(u8, u8)> },
    Remove { pick: u8 },
    Resize { pick: u8, w: u8, h: u8 },
    Toggle { pick: u8 },
    Settings { pick: u8, value: u16 },
    Reorder { from: u8, to: u8 },
    Swap { source: u8, target: u8 },
    Preset { pick: u8 },
    Capacity { value: u8 },
}

const PRESETS: [&str; 6] = ["focus", "morning", "study", "planner", "zen", "missing"];

fuzz_target!(|input: Input| {
    // 1..6 x 1..6 keeps the search space dense.
    let dims = GridDims::new(u16::from(input.cols % 6) + 1, u16::from(input.rows % 6) + 1);
    let mut state = GridState::with_capacity(dims, u16::from(input.capacity));

    for op in input.ops.into_iter().take(64) {
        let Some(operation) = to_operation(&state, op) else {
            continue;
        };
        let before = state.state_hash();
        let events_before = state.events().len();

        match state.apply_operation(operation) {
            Ok(_) => {}
            Err(GridRejection::CapacityExceeded { .. }) => {
                assert_eq!(state.state_hash(), before, "rejection mutated state");
                assert_eq!(state.events().len(), events_before + 1);
            }
            Err(_) => assert_eq!(state.state_hash(), before, "rejection mutated state"),
        }

        let widgets = state.widgets();
        assert!(validate(widgets, dims));
        assert!(check_arrangement(widgets, dims).is_ok());
        assert_eq!(pad(widgets, dims), widgets, "committed list is not a pad fixed point");
        state.drain_events();
    }
});

fn to_operation(state: &GridState, op: Op) -> Option<GridOperation> {
    let real: Vec<_> = state.real_widgets().map(|w| w.id.clone()).collect();
    let pick = |raw: u8| (!real.is_empty()).then(|| real[usize::from(raw) % real.len()].clone());
    let cells = usize::from(state.dims().cols) * usize::from(state.dims().rows);
    let len = state.widgets().len().max(1);

    Some(match op {
        Op::Add { kind, size } => GridOperation::AddWidget {
            kind: WidgetKind::ADDABLE[usize::from(kind) % WidgetKind::ADDABLE.len()],
            size: size.map(|(w, h)| BlockSize::new(w % 3 + 1, h % 3 + 1)),
        },
        Op::Remove { pick: raw } => GridOperation::RemoveWidget { id: pick(raw)? },
        Op::Resize { pick: raw, w, h } => GridOperation::ResizeWidget {
            id: pick(raw)?,
            size: BlockSize::new(w % 3 + 1, h % 3 + 1),
        },
        Op::Toggle { pick: raw } => {
            let id = pick(raw)?;
            let enabled = state.widget(&id).is_some_and(|w| w.enabled);
            GridOperation::SetEnabled { id, enabled: !enabled }
        }
        Op::Settings { pick: raw, value } => GridOperation::UpdateSettings {
            id: pick(raw)?,
            settings: Settings::new(value.into()),
        },
        Op::Reorder { from, to } => GridOperation::Reorder {
            from: usize::from(from) % (len + 1),
            to: usize::from(to) % (len + 1),
        },
        Op::Swap { source, target } => GridOperation::MoveToGrid {
            source: usize::from(source) % (cells + 1),
            target: usize::from(target) % (cells + 1),
        },
        Op::Preset { pick: raw } => GridOperation::ApplyPreset {
            preset: PRESETS[usize::from(raw) % PRESETS.len()].to_string(),
        },
        Op::Capacity { value } => GridOperation::SetCapacity {
            capacity: u16::from(value),
        },
    })
}
