//! Preset catalog and column-balanced layout generation.
//!
//! A preset is an ordered list of `(kind, settings)` entries plus optional
//! companion appearance data. [`generate_layout`] turns the entries into
//! anchored slots by greedily balancing them over vertical tracks.
//!
//! # Invariants
//!
//! 1. A `clock` entry is moved to index 1 before placement.
//! 2. Each entry goes to the track with the lowest accumulated height (ties
//!    resolve to the lowest track index).
//! 3. A track is skipped when the entry would overflow the grid height or
//!    the grid width from that track.
//! 4. An entry as tall as the grid only goes into an empty track.
//! 5. Spacer entries and repeated kinds are ignored.
//!
//! # Failure Modes
//!
//! Entries that fit in no track are dropped with a debug log. Presets are
//! trusted input, so generation never fails.

use dashgrid_core::{BlockSize, Cell, GridDims};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::appearance::Background;
use crate::widget::{Settings, WidgetKind};

/// Vertical tracks used by the generator.
pub const PRESET_TRACKS: u16 = 3;

// =========================================================================
// Catalog types
// =========================================================================

/// One widget request inside a preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetEntry {
    pub kind: WidgetKind,
    #[serde(default, skip_serializing_if = "Settings::is_empty")]
    pub settings: Settings,
}

impl PresetEntry {
    #[must_use]
    pub fn new(kind: WidgetKind) -> Self {
        Self {
            kind,
            settings: Settings::default(),
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: serde_json::Value) -> Self {
        self.settings = Settings::new(settings);
        self
    }
}

/// Appearance data applied with a preset when the background is untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetCompanion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Background>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub playlist: Vec<String>,
}

/// A named widget bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub id: String,
    pub name: String,
    pub description: String,
    pub entries: Vec<PresetEntry>,
    #[serde(default)]
    pub companion: PresetCompanion,
}

impl Preset {
    fn new(id: &str, name: &str, description: &str) -> Self {
        Self {
            id: id.to_owned(),
            name: name.to_owned(),
            description: description.to_owned(),
            entries: Vec::new(),
            companion: PresetCompanion::default(),
        }
    }

    fn entry(mut self, entry: PresetEntry) -> Self {
        self.entries.push(entry);
        self
    }

    fn kind(self, kind: WidgetKind) -> Self {
        self.entry(PresetEntry::new(kind))
    }

    fn background(mut self, background: Background) -> Self {
        self.companion.background = Some(background);
        self
    }

    fn playlist(mut self, tracks: &[&str]) -> Self {
        self.companion.playlist = tracks.iter().map(|t| (*t).to_owned()).collect();
        self
    }
}

// =========================================================================
// Built-in presets
// =========================================================================

/// Deep-work preset: timer, tasks and notes.
#[must_use]
pub fn builtin_focus() -> Preset {
    Preset::new("focus", "Focus", "Pomodoro timer with tasks and notes")
        .entry(PresetEntry::new(WidgetKind::Pomodoro).with_settings(serde_json::json!({
            "work_minutes": 25,
            "break_minutes": 5,
        })))
        .kind(WidgetKind::Clock)
        .kind(WidgetKind::Tasks)
        .kind(WidgetKind::Notes)
        .background(Background::Color("#1f2933".to_owned()))
        .playlist(&["lofi-focus"])
}

/// Start-of-day overview.
#[must_use]
pub fn builtin_morning() -> Preset {
    Preset::new("morning", "Morning", "Weather, quote and habit tracker")
        .kind(WidgetKind::Clock)
        .kind(WidgetKind::Weather)
        .kind(WidgetKind::Quote)
        .kind(WidgetKind::Habits)
        .kind(WidgetKind::Bookmarks)
        .background(Background::Image("sunrise".to_owned()))
}

/// Study session with music.
#[must_use]
pub fn builtin_study() -> Preset {
    Preset::new("study", "Study", "Notes, music and a pomodoro")
        .kind(WidgetKind::Notes)
        .kind(WidgetKind::Clock)
        .kind(WidgetKind::Pomodoro)
        .kind(WidgetKind::Music)
        .kind(WidgetKind::Countdown)
        .playlist(&["classical-study", "piano-focus"])
}

/// Calendar-centric planning board.
#[must_use]
pub fn builtin_planner() -> Preset {
    Preset::new("planner", "Planner", "Agenda and calendar side by side")
        .kind(WidgetKind::Agenda)
        .kind(WidgetKind::Calendar)
        .kind(WidgetKind::Clock)
}

/// Minimal calm layout.
#[must_use]
pub fn builtin_zen() -> Preset {
    Preset::new("zen", "Zen", "Clock, quote and ambient music")
        .kind(WidgetKind::Clock)
        .kind(WidgetKind::Quote)
        .kind(WidgetKind::Music)
        .background(Background::Image("zen-garden".to_owned()))
        .playlist(&["ambient-rain"])
}

/// All built-in presets, in display order.
#[must_use]
pub fn builtin_presets() -> Vec<Preset> {
    vec![
        builtin_focus(),
        builtin_morning(),
        builtin_study(),
        builtin_planner(),
        builtin_zen(),
    ]
}

/// Look up a built-in preset by id (case-insensitive).
#[must_use]
pub fn find_preset(id: &str) -> Option<Preset> {
    builtin_presets()
        .into_iter()
        .find(|preset| preset.id.eq_ignore_ascii_case(id.trim()))
}

// =========================================================================
// Layout generation
// =========================================================================

/// An entry with its generated anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct PresetSlot {
    pub kind: WidgetKind,
    pub size: BlockSize,
    pub anchor: Cell,
    pub settings: Settings,
}

/// Balance `entries` over the grid's vertical tracks.
///
/// Slots come back in the order they were assigned; dropped entries are
/// simply absent.
#[must_use]
pub fn generate_layout(entries: &[PresetEntry], dims: GridDims) -> Vec<PresetSlot> {
    let ordered = normalize_entries(entries);
    let tracks = usize::from(PRESET_TRACKS.min(dims.cols));
    let capacity = dims.rows;
    let mut heights = vec![0_u16; tracks];
    let mut slots = Vec::with_capacity(ordered.len());

    for entry in ordered {
        let size = entry.kind.default_size();
        let (w, h) = (u16::from(size.w()), u16::from(size.h()));

        let mut candidates: Vec<usize> = (0..tracks).collect();
        candidates.sort_by_key(|&track| (heights[track], track));

        let chosen = candidates.into_iter().find_map(|track| {
            let span = usize::from(w);
            if track + span > tracks {
                return None;
            }
            let covered = &heights[track..track + span];
            let top = covered.iter().copied().max().unwrap_or(0);
            if h >= capacity && top > 0 {
                return None;
            }
            (top + h <= capacity).then_some((track, top))
        });

        let Some((track, top)) = chosen else {
            debug!(kind = %entry.kind, size = %size, "preset entry dropped: no track fits");
            continue;
        };

        for height in &mut heights[track..track + usize::from(w)] {
            *height = top + h;
        }
        let anchor = Cell::new(u16::try_from(track).unwrap_or(u16::MAX), top);
        slots.push(PresetSlot {
            kind: entry.kind,
            size,
            anchor,
            settings: entry.settings.clone(),
        });
    }

    slots
}

/// Drop spacers and repeated kinds, then move any clock to index 1.
fn normalize_entries(entries: &[PresetEntry]) -> Vec<&PresetEntry> {
    let mut seen = FxHashSet::default();
    let mut ordered: Vec<&PresetEntry> = entries
        .iter()
        .filter(|entry| entry.kind != WidgetKind::Spacer)
        .filter(|entry| seen.insert(entry.kind))
        .collect();

    if let Some(position) = ordered.iter().position(|e| e.kind == WidgetKind::Clock) {
        let clock = ordered.remove(position);
        let index = 1.min(ordered.len());
        ordered.insert(index, clock);
    }
    ordered
}
