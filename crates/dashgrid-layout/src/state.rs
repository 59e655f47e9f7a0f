//! Transactional grid state.
//!
//! [`GridState`] owns one dashboard grid: its dimensions, the block capacity
//! budget, the ordered widget list, and the appearance settings. Every
//! mutation is expressed as a [`GridOperation`] and applied atomically:
//!
//! 1. The operation runs against a cloned working state.
//! 2. The resulting widget list must pass
//!    [`check_arrangement`](crate::validate::check_arrangement).
//! 3. Only then does the working state replace `self`.
//!
//! # Invariants
//!
//! 1. The committed widget list is always padded: every cell is covered by
//!    exactly one enabled widget or spacer.
//! 2. At most one enabled widget per kind.
//! 3. Capacity is clamped to `rows * cols`.
//!
//! # Failure Modes
//!
//! A rejected operation leaves the state byte-for-byte unchanged apart from
//! the notification queue: capacity rejections enqueue exactly one
//! [`GridEvent::CapacityReached`].

use std::collections::BTreeSet;

use dashgrid_core::{BlockSize, GridDims};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::appearance::{Appearance, Background};
use crate::error::GridRejection;
use crate::pack::insert_widget;
use crate::pad::{pad, reflow};
use crate::preset::{Preset, find_preset, generate_layout};
use crate::reorder;
use crate::validate::check_arrangement;
use crate::viewport::CapacityBreakpoints;
use crate::widget::{Settings, Widget, WidgetId, WidgetKind};

// =========================================================================
// Operations
// =========================================================================

/// Supported grid mutations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum GridOperation {
    /// Place a new widget, or re-enable a hidden one of the same kind.
    AddWidget {
        kind: WidgetKind,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        size: Option<BlockSize>,
    },
    RemoveWidget { id: WidgetId },
    ResizeWidget { id: WidgetId, size: BlockSize },
    /// Hide or show a real widget without forgetting its settings.
    SetEnabled { id: WidgetId, enabled: bool },
    UpdateSettings { id: WidgetId, settings: Settings },
    /// Array move in the widget list; entries keep their list slot cells.
    Reorder { from: usize, to: usize },
    /// Block swap between two row-major cell indices.
    MoveToGrid { source: usize, target: usize },
    ApplyPreset { preset: String },
    SetCapacity { capacity: u16 },
}

impl GridOperation {
    /// Operation family.
    #[must_use]
    pub const fn kind(&self) -> GridOperationKind {
        match self {
            Self::AddWidget { .. } => GridOperationKind::AddWidget,
            Self::RemoveWidget { .. } => GridOperationKind::RemoveWidget,
            Self::ResizeWidget { .. } => GridOperationKind::ResizeWidget,
            Self::SetEnabled { .. } => GridOperationKind::SetEnabled,
            Self::UpdateSettings { .. } => GridOperationKind::UpdateSettings,
            Self::Reorder { .. } => GridOperationKind::Reorder,
            Self::MoveToGrid { .. } => GridOperationKind::MoveToGrid,
            Self::ApplyPreset { .. } => GridOperationKind::ApplyPreset,
            Self::SetCapacity { .. } => GridOperationKind::SetCapacity,
        }
    }
}

/// Stable operation discriminator used in logs and outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridOperationKind {
    AddWidget,
    RemoveWidget,
    ResizeWidget,
    SetEnabled,
    UpdateSettings,
    Reorder,
    MoveToGrid,
    ApplyPreset,
    SetCapacity,
}

impl GridOperationKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AddWidget => "add_widget",
            Self::RemoveWidget => "remove_widget",
            Self::ResizeWidget => "resize_widget",
            Self::SetEnabled => "set_enabled",
            Self::UpdateSettings => "update_settings",
            Self::Reorder => "reorder",
            Self::MoveToGrid => "move_to_grid",
            Self::ApplyPreset => "apply_preset",
            Self::SetCapacity => "set_capacity",
        }
    }
}

/// Successful operation result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridOutcome {
    pub kind: GridOperationKind,
    /// Real widgets that were added, removed, moved, resized, or edited.
    pub touched: Vec<WidgetId>,
    pub before_hash: u64,
    pub after_hash: u64,
}

impl GridOutcome {
    /// Whether the operation changed anything observable.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.before_hash != self.after_hash
    }
}

/// Notifications for the host, queued until drained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GridEvent {
    /// A widget could not be placed for lack of room.
    CapacityReached { kind: WidgetKind },
    /// A preset was applied but some entries fit nowhere.
    PresetEntriesDropped { preset: String, kinds: Vec<WidgetKind> },
}

// =========================================================================
// State
// =========================================================================

/// One dashboard grid and its widgets.
#[derive(Debug, Clone, PartialEq)]
pub struct GridState {
    dims: GridDims,
    capacity: u16,
    widgets: Vec<Widget>,
    appearance: Appearance,
    next_id: u64,
    events: Vec<GridEvent>,
}

impl GridState {
    /// An empty grid (all spacers) with full capacity.
    #[must_use]
    pub fn new(dims: GridDims) -> Self {
        Self {
            dims,
            capacity: clamp_capacity(dims, u16::MAX),
            widgets: pad(&[], dims),
            appearance: Appearance::default(),
            next_id: 1,
            events: Vec::new(),
        }
    }

    /// An empty grid with an explicit capacity (clamped to the cell count).
    #[must_use]
    pub fn with_capacity(dims: GridDims, capacity: u16) -> Self {
        let mut state = Self::new(dims);
        state.capacity = clamp_capacity(dims, capacity);
        state
    }

    /// Reassemble a state from persisted parts. The caller validates.
    pub(crate) fn from_parts(
        dims: GridDims,
        capacity: u16,
        widgets: Vec<Widget>,
        appearance: Appearance,
        next_id: u64,
    ) -> Self {
        Self {
            dims,
            capacity: clamp_capacity(dims, capacity),
            widgets,
            appearance,
            next_id,
            events: Vec::new(),
        }
    }

    #[must_use]
    pub const fn dims(&self) -> GridDims {
        self.dims
    }

    #[must_use]
    pub const fn capacity(&self) -> u16 {
        self.capacity
    }

    /// The full ordered list: grid entries by `(y, x)`, then hidden widgets.
    #[must_use]
    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    /// Non-spacer widgets, enabled or not.
    pub fn real_widgets(&self) -> impl Iterator<Item = &Widget> {
        self.widgets.iter().filter(|w| !w.is_spacer())
    }

    #[must_use]
    pub fn widget(&self, id: &WidgetId) -> Option<&Widget> {
        self.widgets.iter().find(|w| &w.id == id)
    }

    #[must_use]
    pub const fn appearance(&self) -> &Appearance {
        &self.appearance
    }

    #[must_use]
    pub const fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Blocks covered by enabled real widgets.
    #[must_use]
    pub fn used_blocks(&self) -> u32 {
        self.real_widgets()
            .filter(|w| w.enabled)
            .map(Widget::block_count)
            .sum()
    }

    /// Blocks still available under the capacity budget.
    #[must_use]
    pub fn free_blocks(&self) -> u32 {
        u32::from(self.capacity).saturating_sub(self.used_blocks())
    }

    /// Pending notifications, oldest first.
    #[must_use]
    pub fn events(&self) -> &[GridEvent] {
        &self.events
    }

    /// Take all pending notifications.
    pub fn drain_events(&mut self) -> Vec<GridEvent> {
        std::mem::take(&mut self.events)
    }

    /// User customization of the background. Not a grid operation.
    pub fn set_background(&mut self, background: Background) {
        self.appearance.background = background;
    }

    /// Deterministic FNV-1a hash of the committed state (notifications
    /// excluded).
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
        const PRIME: u64 = 0x0000_0001_0000_01b3;

        fn mix_bytes(hash: &mut u64, bytes: &[u8]) {
            for byte in bytes {
                *hash ^= u64::from(*byte);
                *hash = hash.wrapping_mul(PRIME);
            }
        }

        fn mix_str(hash: &mut u64, value: &str) {
            mix_bytes(hash, &(value.len() as u64).to_le_bytes());
            mix_bytes(hash, value.as_bytes());
        }

        let mut hash = OFFSET_BASIS;
        mix_bytes(&mut hash, &self.dims.cols.to_le_bytes());
        mix_bytes(&mut hash, &self.dims.rows.to_le_bytes());
        mix_bytes(&mut hash, &self.capacity.to_le_bytes());
        mix_bytes(&mut hash, &self.next_id.to_le_bytes());

        for widget in &self.widgets {
            mix_str(&mut hash, widget.id.as_str());
            mix_str(&mut hash, widget.kind.as_str());
            mix_bytes(&mut hash, &[widget.size.w(), widget.size.h(), u8::from(widget.enabled)]);
            mix_bytes(&mut hash, &widget.layout.x.to_le_bytes());
            mix_bytes(&mut hash, &widget.layout.y.to_le_bytes());
            mix_str(&mut hash, &widget.settings.as_value().to_string());
        }

        match &self.appearance.background {
            Background::DefaultGradient => mix_bytes(&mut hash, &[0]),
            Background::Color(color) => {
                mix_bytes(&mut hash, &[1]);
                mix_str(&mut hash, color);
            }
            Background::Image(image) => {
                mix_bytes(&mut hash, &[2]);
                mix_str(&mut hash, image);
            }
        }
        for track in &self.appearance.playlist {
            mix_str(&mut hash, track);
        }

        hash
    }

    // ---------------------------------------------------------------------
    // Transaction boundary
    // ---------------------------------------------------------------------

    /// Apply one operation atomically.
    ///
    /// On success the mutated working copy replaces `self`; on failure `self`
    /// is unchanged except for queued notifications.
    pub fn apply_operation(&mut self, operation: GridOperation) -> Result<GridOutcome, GridRejection> {
        self.transact(operation.kind(), |working| working.apply_inner(operation))
            .map(|(outcome, ())| outcome)
    }

    fn transact<T>(
        &mut self,
        kind: GridOperationKind,
        mutate: impl FnOnce(&mut Self) -> Result<T, GridRejection>,
    ) -> Result<(GridOutcome, T), GridRejection> {
        let before_hash = self.state_hash();
        let mut working = self.clone();

        let result = mutate(&mut working).and_then(|value| {
            check_arrangement(&working.widgets, working.dims)?;
            Ok(value)
        });

        let value = match result {
            Ok(value) => value,
            Err(rejection) => {
                warn!(op = kind.as_str(), %rejection, "grid operation rejected");
                if let GridRejection::CapacityExceeded { kind: widget_kind, .. } = &rejection {
                    self.events.push(GridEvent::CapacityReached { kind: *widget_kind });
                }
                return Err(rejection);
            }
        };

        let touched = touched_widgets(&self.widgets, &working.widgets);
        let after_hash = working.state_hash();
        *self = working;

        info!(
            op = kind.as_str(),
            touched = touched.len(),
            before_hash,
            after_hash,
            "grid operation committed"
        );

        Ok((
            GridOutcome {
                kind,
                touched,
                before_hash,
                after_hash,
            },
            value,
        ))
    }

    fn apply_inner(&mut self, operation: GridOperation) -> Result<(), GridRejection> {
        match operation {
            GridOperation::AddWidget { kind, size } => self.apply_add(kind, size).map(drop),
            GridOperation::RemoveWidget { id } => self.apply_remove(&id),
            GridOperation::ResizeWidget { id, size } => self.apply_resize(&id, size),
            GridOperation::SetEnabled { id, enabled } => self.apply_set_enabled(&id, enabled),
            GridOperation::UpdateSettings { id, settings } => {
                self.apply_update_settings(&id, settings)
            }
            GridOperation::Reorder { from, to } => {
                self.widgets = reorder::reorder(&self.widgets, from, to, self.dims)?;
                Ok(())
            }
            GridOperation::MoveToGrid { source, target } => {
                self.widgets = reorder::move_to_grid(&self.widgets, source, target, self.dims)?;
                Ok(())
            }
            GridOperation::ApplyPreset { preset } => {
                let preset =
                    find_preset(&preset).ok_or(GridRejection::UnknownPreset { id: preset })?;
                self.apply_preset_inner(&preset);
                Ok(())
            }
            GridOperation::SetCapacity { capacity } => {
                self.capacity = clamp_capacity(self.dims, capacity);
                Ok(())
            }
        }
    }

    // ---------------------------------------------------------------------
    // Operation bodies (run on the working copy)
    // ---------------------------------------------------------------------

    fn apply_add(&mut self, kind: WidgetKind, size: Option<BlockSize>) -> Result<WidgetId, GridRejection> {
        if kind == WidgetKind::Spacer {
            return Err(GridRejection::SpacerNotAddable);
        }
        if self.real_widgets().any(|w| w.enabled && w.kind == kind) {
            return Err(GridRejection::DuplicateKind { kind });
        }

        let hidden = self
            .widgets
            .iter()
            .position(|w| !w.enabled && w.kind == kind);
        let candidate = match hidden {
            Some(index) => {
                let mut widget = self.widgets.remove(index);
                widget.enabled = true;
                if let Some(size) = size {
                    widget.size = size;
                }
                widget
            }
            None => {
                let size = size.unwrap_or_else(|| kind.default_size());
                let id = self.allocate_id(kind);
                Widget::new(id, kind, size)
            }
        };

        self.place_candidate(candidate)
    }

    fn apply_remove(&mut self, id: &WidgetId) -> Result<(), GridRejection> {
        let index = self.real_index(id)?;
        self.widgets.remove(index);
        self.widgets = pad(&self.widgets, self.dims);
        Ok(())
    }

    fn apply_resize(&mut self, id: &WidgetId, size: BlockSize) -> Result<(), GridRejection> {
        let index = self.real_index(id)?;
        let widget = &self.widgets[index];
        if widget.enabled {
            let required = size.block_count();
            let available = self.free_blocks() + widget.block_count();
            if required > available {
                return Err(GridRejection::CapacityExceeded {
                    kind: widget.kind,
                    required,
                    available,
                });
            }
        }

        let widget = &mut self.widgets[index];
        let anchor = widget.anchor();
        widget.size = size;
        widget.set_anchor(anchor);

        let padded = pad(&self.widgets, self.dims);
        self.widgets = if check_arrangement(&padded, self.dims).is_ok() {
            padded
        } else {
            reflow(&self.widgets, self.dims)
        };
        Ok(())
    }

    fn apply_set_enabled(&mut self, id: &WidgetId, enabled: bool) -> Result<(), GridRejection> {
        let index = self.real_index(id)?;
        if self.widgets[index].enabled == enabled {
            return Ok(());
        }

        if enabled {
            let kind = self.widgets[index].kind;
            if self.real_widgets().any(|w| w.enabled && w.kind == kind) {
                return Err(GridRejection::DuplicateKind { kind });
            }
            let mut widget = self.widgets.remove(index);
            widget.enabled = true;
            self.place_candidate(widget).map(drop)
        } else {
            self.widgets[index].enabled = false;
            self.widgets = pad(&self.widgets, self.dims);
            Ok(())
        }
    }

    fn apply_update_settings(&mut self, id: &WidgetId, settings: Settings) -> Result<(), GridRejection> {
        let index = self.real_index(id)?;
        self.widgets[index].settings = settings;
        Ok(())
    }

    fn apply_preset_inner(&mut self, preset: &Preset) {
        let slots = generate_layout(&preset.entries, self.dims);
        let dropped: Vec<WidgetKind> = preset
            .entries
            .iter()
            .map(|entry| entry.kind)
            .filter(|kind| *kind != WidgetKind::Spacer && slots.iter().all(|s| s.kind != *kind))
            .collect();

        let mut placed = Vec::with_capacity(slots.len());
        for slot in slots {
            let id = self.allocate_id(slot.kind);
            placed.push(
                Widget::new(id, slot.kind, slot.size)
                    .with_settings(slot.settings)
                    .with_anchor(slot.anchor),
            );
        }
        self.widgets = pad(&placed, self.dims);

        if !self.appearance.is_customized() {
            if let Some(background) = &preset.companion.background {
                self.appearance.background = background.clone();
            }
            if !preset.companion.playlist.is_empty() {
                self.appearance.playlist = preset.companion.playlist.clone();
            }
        }

        if !dropped.is_empty() {
            self.events.push(GridEvent::PresetEntriesDropped {
                preset: preset.id.clone(),
                kinds: dropped,
            });
        }
    }

    /// Capacity-check `candidate` and run the insertion search.
    fn place_candidate(&mut self, candidate: Widget) -> Result<WidgetId, GridRejection> {
        let required = candidate.block_count();
        let available = self.free_blocks();
        let rejection = GridRejection::CapacityExceeded {
            kind: candidate.kind,
            required,
            available,
        };
        if required > available {
            return Err(rejection);
        }

        let id = candidate.id.clone();
        self.widgets = insert_widget(&self.widgets, &candidate, self.dims).ok_or(rejection)?;
        Ok(id)
    }

    /// Index of the real widget named `id`.
    fn real_index(&self, id: &WidgetId) -> Result<usize, GridRejection> {
        let index = self
            .widgets
            .iter()
            .position(|w| &w.id == id)
            .ok_or_else(|| GridRejection::WidgetNotFound { id: id.clone() })?;
        if self.widgets[index].is_spacer() {
            return Err(GridRejection::NotARealWidget { id: id.clone() });
        }
        Ok(index)
    }

    /// Next unused `"{kind}-{n}"` id.
    fn allocate_id(&mut self, kind: WidgetKind) -> WidgetId {
        loop {
            let id = WidgetId::new(format!("{kind}-{}", self.next_id));
            self.next_id += 1;
            if self.widgets.iter().all(|w| w.id != id) {
                return id;
            }
        }
    }

    // ---------------------------------------------------------------------
    // Convenience wrappers
    // ---------------------------------------------------------------------

    /// Add a widget of `kind`, returning its id.
    pub fn add_widget(&mut self, kind: WidgetKind, size: Option<BlockSize>) -> Result<WidgetId, GridRejection> {
        self.transact(GridOperationKind::AddWidget, |working| working.apply_add(kind, size))
            .map(|(_, id)| id)
    }

    pub fn remove_widget(&mut self, id: impl Into<WidgetId>) -> Result<GridOutcome, GridRejection> {
        self.apply_operation(GridOperation::RemoveWidget { id: id.into() })
    }

    pub fn resize_widget(
        &mut self,
        id: impl Into<WidgetId>,
        size: BlockSize,
    ) -> Result<GridOutcome, GridRejection> {
        self.apply_operation(GridOperation::ResizeWidget { id: id.into(), size })
    }

    pub fn set_enabled(
        &mut self,
        id: impl Into<WidgetId>,
        enabled: bool,
    ) -> Result<GridOutcome, GridRejection> {
        self.apply_operation(GridOperation::SetEnabled { id: id.into(), enabled })
    }

    pub fn update_settings(
        &mut self,
        id: impl Into<WidgetId>,
        settings: Settings,
    ) -> Result<GridOutcome, GridRejection> {
        self.apply_operation(GridOperation::UpdateSettings { id: id.into(), settings })
    }

    pub fn reorder(&mut self, from: usize, to: usize) -> Result<GridOutcome, GridRejection> {
        self.apply_operation(GridOperation::Reorder { from, to })
    }

    pub fn move_to_grid(&mut self, source: usize, target: usize) -> Result<GridOutcome, GridRejection> {
        self.apply_operation(GridOperation::MoveToGrid { source, target })
    }

    pub fn apply_preset(&mut self, preset: &str) -> Result<GridOutcome, GridRejection> {
        self.apply_operation(GridOperation::ApplyPreset {
            preset: preset.to_owned(),
        })
    }

    pub fn set_capacity(&mut self, capacity: u16) -> Result<GridOutcome, GridRejection> {
        self.apply_operation(GridOperation::SetCapacity { capacity })
    }

    /// Resolve capacity from a host viewport width.
    pub fn set_viewport_width(
        &mut self,
        width: u32,
        breakpoints: &CapacityBreakpoints,
    ) -> Result<GridOutcome, GridRejection> {
        self.set_capacity(breakpoints.capacity_for_width(width, self.dims))
    }
}

fn clamp_capacity(dims: GridDims, capacity: u16) -> u16 {
    let cells = u16::try_from(dims.cell_count()).unwrap_or(u16::MAX);
    capacity.min(cells)
}

/// Real widgets that differ between two lists, sorted by id.
fn touched_widgets(before: &[Widget], after: &[Widget]) -> Vec<WidgetId> {
    let mut touched = BTreeSet::new();
    for widget in before.iter().filter(|w| !w.is_spacer()) {
        match after.iter().find(|w| w.id == widget.id) {
            Some(other) if other == widget => {}
            _ => {
                touched.insert(widget.id.clone());
            }
        }
    }
    for widget in after.iter().filter(|w| !w.is_spacer()) {
        if before.iter().all(|w| w.id != widget.id) {
            touched.insert(widget.id.clone());
        }
    }
    touched.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::footprint_report;
    use dashgrid_core::Cell;
    use serde_json::json;

    fn assert_consistent(state: &GridState) {
        assert!(check_arrangement(state.widgets(), state.dims()).is_ok());
        assert!(footprint_report(state.widgets(), state.dims()).is_gapless());
    }

    // ---- construction ----

    #[test]
    fn new_grid_is_all_spacers() {
        let state = GridState::new(GridDims::DEFAULT);
        assert_eq!(state.widgets().len(), 9);
        assert!(state.widgets().iter().all(Widget::is_spacer));
        assert_eq!(state.capacity(), 9);
        assert_eq!(state.free_blocks(), 9);
    }

    #[test]
    fn capacity_is_clamped_to_cells() {
        let state = GridState::with_capacity(GridDims::new(2, 2), 50);
        assert_eq!(state.capacity(), 4);
    }

    // ---- add ----

    #[test]
    fn add_assigns_kind_prefixed_ids() {
        let mut state = GridState::new(GridDims::DEFAULT);
        let clock = state.add_widget(WidgetKind::Clock, None).unwrap();
        let weather = state.add_widget(WidgetKind::Weather, None).unwrap();
        assert_eq!(clock.as_str(), "clock-1");
        assert_eq!(weather.as_str(), "weather-2");
        assert_eq!(state.widget(&weather).unwrap().anchor(), Cell::new(1, 0));
        assert_consistent(&state);
    }

    #[test]
    fn add_rejects_duplicate_kind_and_spacers() {
        let mut state = GridState::new(GridDims::DEFAULT);
        state.add_widget(WidgetKind::Clock, None).unwrap();
        assert_eq!(
            state.add_widget(WidgetKind::Clock, None),
            Err(GridRejection::DuplicateKind {
                kind: WidgetKind::Clock
            })
        );
        assert_eq!(
            state.add_widget(WidgetKind::Spacer, None),
            Err(GridRejection::SpacerNotAddable)
        );
        assert!(state.events().is_empty());
    }

    #[test]
    fn size_override_is_respected() {
        let mut state = GridState::new(GridDims::DEFAULT);
        let id = state
            .add_widget(WidgetKind::Clock, Some(BlockSize::new(2, 2)))
            .unwrap();
        assert_eq!(state.widget(&id).unwrap().size, BlockSize::new(2, 2));
        assert_eq!(state.used_blocks(), 4);
    }

    #[test]
    fn capacity_budget_rejects_with_one_event() {
        let mut state = GridState::with_capacity(GridDims::DEFAULT, 3);
        state.add_widget(WidgetKind::Quote, None).unwrap();
        let before = state.clone();

        let err = state.add_widget(WidgetKind::Calendar, None).unwrap_err();
        assert_eq!(
            err,
            GridRejection::CapacityExceeded {
                kind: WidgetKind::Calendar,
                required: 4,
                available: 1,
            }
        );
        assert_eq!(state.widgets(), before.widgets());
        assert_eq!(state.state_hash(), before.state_hash());
        assert_eq!(
            state.drain_events(),
            vec![GridEvent::CapacityReached {
                kind: WidgetKind::Calendar
            }]
        );
        assert!(state.events().is_empty());
    }

    #[test]
    fn geometric_misfit_is_a_capacity_rejection() {
        let mut state = GridState::new(GridDims::DEFAULT);
        state.add_widget(WidgetKind::Calendar, None).unwrap();
        state.add_widget(WidgetKind::Tasks, None).unwrap();
        let before = state.widgets().to_vec();

        let err = state.add_widget(WidgetKind::Agenda, None).unwrap_err();
        assert!(matches!(err, GridRejection::CapacityExceeded { .. }));
        assert_eq!(state.widgets(), &before[..]);
        assert_eq!(state.events().len(), 1);
    }

    // ---- remove / resize ----

    #[test]
    fn remove_restores_spacers() {
        let mut state = GridState::new(GridDims::DEFAULT);
        let id = state.add_widget(WidgetKind::Calendar, None).unwrap();
        let outcome = state.remove_widget(id.clone()).unwrap();
        assert_eq!(outcome.touched, vec![id]);
        assert!(outcome.changed());
        assert!(state.widgets().iter().all(Widget::is_spacer));
        assert_eq!(state.widgets().len(), 9);
    }

    #[test]
    fn remove_rejects_spacers_and_unknown_ids() {
        let mut state = GridState::new(GridDims::DEFAULT);
        assert_eq!(
            state.remove_widget("spacer-0-0"),
            Err(GridRejection::NotARealWidget {
                id: WidgetId::from("spacer-0-0")
            })
        );
        assert_eq!(
            state.remove_widget("ghost"),
            Err(GridRejection::WidgetNotFound {
                id: WidgetId::from("ghost")
            })
        );
    }

    #[test]
    fn resize_grows_in_place_when_room() {
        let mut state = GridState::new(GridDims::DEFAULT);
        let id = state.add_widget(WidgetKind::Clock, None).unwrap();
        state.resize_widget(id.clone(), BlockSize::new(2, 2)).unwrap();
        let widget = state.widget(&id).unwrap();
        assert_eq!(widget.anchor(), Cell::new(0, 0));
        assert_eq!(widget.layout.w, 2);
        assert_consistent(&state);
    }

    #[test]
    fn resize_that_cannot_fit_keeps_previous_state() {
        let mut state = GridState::new(GridDims::DEFAULT);
        let cal = state.add_widget(WidgetKind::Calendar, None).unwrap();
        state.add_widget(WidgetKind::Tasks, None).unwrap();
        state.add_widget(WidgetKind::Quote, None).unwrap();
        let before = state.clone();

        let err = state.resize_widget(cal, BlockSize::new(3, 3)).unwrap_err();
        assert!(matches!(err, GridRejection::CapacityExceeded { .. }));
        assert_eq!(state.widgets(), before.widgets());
    }

    // ---- enable / settings ----

    #[test]
    fn hidden_widget_frees_cells_and_keeps_settings() {
        let mut state = GridState::new(GridDims::DEFAULT);
        let id = state.add_widget(WidgetKind::Notes, None).unwrap();
        state
            .update_settings(id.clone(), Settings::new(json!({"text": "hi"})))
            .unwrap();

        state.set_enabled(id.clone(), false).unwrap();
        assert_eq!(state.used_blocks(), 0);
        assert_eq!(state.widgets().len(), 10);
        assert_eq!(state.widgets().last().unwrap().id, id);
        assert_consistent(&state);

        let again = state.add_widget(WidgetKind::Notes, None).unwrap();
        assert_eq!(again, id);
        let widget = state.widget(&id).unwrap();
        assert!(widget.enabled);
        assert_eq!(widget.settings.as_value()["text"], "hi");
        assert_consistent(&state);
    }

    #[test]
    fn set_enabled_is_noop_when_unchanged() {
        let mut state = GridState::new(GridDims::DEFAULT);
        let id = state.add_widget(WidgetKind::Timer, None).unwrap();
        let outcome = state.set_enabled(id, true).unwrap();
        assert!(!outcome.changed());
        assert!(outcome.touched.is_empty());
    }

    #[test]
    fn settings_on_spacer_rejected() {
        let mut state = GridState::new(GridDims::DEFAULT);
        let err = state
            .update_settings("spacer-1-1", Settings::new(json!(1)))
            .unwrap_err();
        assert!(matches!(err, GridRejection::NotARealWidget { .. }));
    }

    // ---- reorder / swap ----

    #[test]
    fn swap_moves_widget_into_empty_cell() {
        let mut state = GridState::new(GridDims::DEFAULT);
        let id = state.add_widget(WidgetKind::Clock, None).unwrap();
        let outcome = state.move_to_grid(0, 8).unwrap();
        assert_eq!(outcome.touched, vec![id.clone()]);
        assert_eq!(state.widget(&id).unwrap().anchor(), Cell::new(2, 2));
    }

    #[test]
    fn reorder_moves_list_entry() {
        let mut state = GridState::new(GridDims::DEFAULT);
        let clock = state.add_widget(WidgetKind::Clock, None).unwrap();
        let weather = state.add_widget(WidgetKind::Weather, None).unwrap();
        state.reorder(1, 0).unwrap();
        assert_eq!(state.widget(&weather).unwrap().anchor(), Cell::new(0, 0));
        assert_eq!(state.widget(&clock).unwrap().anchor(), Cell::new(1, 0));
    }

    // ---- presets ----

    #[test]
    fn preset_replaces_list_and_applies_companion() {
        let mut state = GridState::new(GridDims::DEFAULT);
        state.add_widget(WidgetKind::Calendar, None).unwrap();
        state.apply_preset("zen").unwrap();

        let kinds: BTreeSet<&str> = state.real_widgets().map(|w| w.kind.as_str()).collect();
        assert_eq!(kinds, BTreeSet::from(["clock", "music", "quote"]));
        assert_eq!(
            state.appearance().background,
            Background::Image("zen-garden".to_owned())
        );
        assert_eq!(state.appearance().playlist, vec!["ambient-rain".to_owned()]);
        assert_consistent(&state);
    }

    #[test]
    fn preset_keeps_customized_background() {
        let mut state = GridState::new(GridDims::DEFAULT);
        state.set_background(Background::Color("#000".to_owned()));
        state.apply_preset("zen").unwrap();
        assert_eq!(state.appearance().background, Background::Color("#000".to_owned()));
        assert!(state.appearance().playlist.is_empty());
    }

    #[test]
    fn unknown_preset_rejected() {
        let mut state = GridState::new(GridDims::DEFAULT);
        assert_eq!(
            state.apply_preset("disco"),
            Err(GridRejection::UnknownPreset {
                id: "disco".to_owned()
            })
        );
    }

    #[test]
    fn preset_on_small_grid_reports_dropped_entries() {
        let mut state = GridState::new(GridDims::new(2, 2));
        state.apply_preset("planner").unwrap();
        let events = state.drain_events();
        assert!(matches!(
            events.as_slice(),
            [GridEvent::PresetEntriesDropped { preset, .. }] if preset == "planner"
        ));
        assert_consistent(&state);
    }

    // ---- capacity ----

    #[test]
    fn viewport_width_sets_capacity() {
        let mut state = GridState::new(GridDims::DEFAULT);
        state
            .set_viewport_width(500, &CapacityBreakpoints::DEFAULT)
            .unwrap();
        assert_eq!(state.capacity(), 3);
        state.set_capacity(200).unwrap();
        assert_eq!(state.capacity(), 9);
    }

    #[test]
    fn lowering_capacity_keeps_placed_widgets() {
        let mut state = GridState::new(GridDims::DEFAULT);
        state.add_widget(WidgetKind::Calendar, None).unwrap();
        state.set_capacity(2).unwrap();
        assert_eq!(state.real_widgets().count(), 1);
        assert_eq!(state.free_blocks(), 0);
        assert!(state.add_widget(WidgetKind::Clock, None).is_err());
    }

    // ---- serde ----

    #[test]
    fn operations_round_trip_through_json() {
        let op = GridOperation::AddWidget {
            kind: WidgetKind::Quote,
            size: Some(BlockSize::new(2, 1)),
        };
        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(json, json!({"op": "add_widget", "kind": "quote", "size": "2x1"}));
        let back: GridOperation = serde_json::from_value(json).unwrap();
        assert_eq!(back, op);
        assert_eq!(op.kind(), GridOperationKind::AddWidget);
    }

    #[test]
    fn state_hash_ignores_events() {
        let mut state = GridState::with_capacity(GridDims::DEFAULT, 0);
        let hash = state.state_hash();
        assert!(state.add_widget(WidgetKind::Clock, None).is_err());
        assert_eq!(state.events().len(), 1);
        assert_eq!(state.state_hash(), hash);
    }
}
