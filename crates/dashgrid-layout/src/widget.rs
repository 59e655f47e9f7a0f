//! Widget records as persisted by the host.
//!
//! A [`Widget`] is a typed record with a block size, a top-left anchor, and
//! an opaque settings payload. The engine reads the geometry and never looks
//! inside [`Settings`].

use std::fmt;

use dashgrid_core::{BlockSize, Cell, Footprint};
use serde::{Deserialize, Serialize};

/// Unique widget identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetId(String);

impl WidgetId {
    /// Wrap a raw identifier.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Identifier of the spacer materialized at `cell`.
    ///
    /// Spacers carry no identity across passes, so their id is a pure
    /// function of the cell they fill.
    #[must_use]
    pub fn spacer_at(cell: Cell) -> Self {
        Self(format!("spacer-{}-{}", cell.x, cell.y))
    }

    /// Raw string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WidgetId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for WidgetId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

/// Widget kinds known to the dashboard, plus the inert [`WidgetKind::Spacer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
    Clock,
    Weather,
    Quote,
    Tasks,
    Calendar,
    Agenda,
    Timer,
    Pomodoro,
    Countdown,
    Notes,
    Habits,
    Music,
    Bookmarks,
    /// Filler occupying exactly one otherwise-empty block.
    Spacer,
}

impl WidgetKind {
    /// Every kind a user can add (excludes [`WidgetKind::Spacer`]).
    pub const ADDABLE: [WidgetKind; 13] = [
        Self::Clock,
        Self::Weather,
        Self::Quote,
        Self::Tasks,
        Self::Calendar,
        Self::Agenda,
        Self::Timer,
        Self::Pomodoro,
        Self::Countdown,
        Self::Notes,
        Self::Habits,
        Self::Music,
        Self::Bookmarks,
    ];

    /// Size-group lookup: the footprint a kind gets without an override.
    #[must_use]
    pub const fn default_size(self) -> BlockSize {
        match self {
            Self::Clock
            | Self::Weather
            | Self::Timer
            | Self::Pomodoro
            | Self::Countdown
            | Self::Bookmarks
            | Self::Spacer => BlockSize::new(1, 1),
            Self::Quote | Self::Music => BlockSize::new(2, 1),
            Self::Tasks | Self::Notes | Self::Habits => BlockSize::new(1, 2),
            Self::Calendar => BlockSize::new(2, 2),
            Self::Agenda => BlockSize::new(1, 3),
        }
    }

    /// Stable snake_case name, matching the serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Clock => "clock",
            Self::Weather => "weather",
            Self::Quote => "quote",
            Self::Tasks => "tasks",
            Self::Calendar => "calendar",
            Self::Agenda => "agenda",
            Self::Timer => "timer",
            Self::Pomodoro => "pomodoro",
            Self::Countdown => "countdown",
            Self::Notes => "notes",
            Self::Habits => "habits",
            Self::Music => "music",
            Self::Bookmarks => "bookmarks",
            Self::Spacer => "spacer",
        }
    }

    /// Look a kind up by its snake_case name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ADDABLE
            .into_iter()
            .chain(std::iter::once(Self::Spacer))
            .find(|kind| kind.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque per-widget settings payload.
///
/// Round-tripped by widget id; the placement engine never inspects it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings(serde_json::Value);

impl Settings {
    /// Wrap an arbitrary JSON value.
    #[must_use]
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// Whether no payload has been set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_null()
    }

    /// Borrow the raw value.
    #[must_use]
    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    /// Take the raw value.
    #[must_use]
    pub fn into_value(self) -> serde_json::Value {
        self.0
    }
}

/// Anchor plus cached dimensions, in block units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct WidgetLayout {
    pub x: u16,
    pub y: u16,
    #[serde(default = "one")]
    pub w: u16,
    #[serde(default = "one")]
    pub h: u16,
}

const fn one() -> u16 {
    1
}

const fn default_true() -> bool {
    true
}

/// One dashboard widget (or spacer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    pub id: WidgetId,
    #[serde(rename = "type")]
    pub kind: WidgetKind,
    #[serde(default)]
    pub size: BlockSize,
    #[serde(default)]
    pub layout: WidgetLayout,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Settings::is_empty")]
    pub settings: Settings,
}

impl Widget {
    /// An enabled widget anchored at the origin.
    pub fn new(id: impl Into<WidgetId>, kind: WidgetKind, size: BlockSize) -> Self {
        let mut widget = Self {
            id: id.into(),
            kind,
            size,
            layout: WidgetLayout::default(),
            enabled: true,
            settings: Settings::default(),
        };
        widget.set_anchor(Cell::default());
        widget
    }

    /// The disabled 1×1 filler for `cell`.
    #[must_use]
    pub fn spacer(cell: Cell) -> Self {
        let mut spacer = Self::new(WidgetId::spacer_at(cell), WidgetKind::Spacer, BlockSize::ONE);
        spacer.enabled = false;
        spacer.set_anchor(cell);
        spacer
    }

    /// Attach a settings payload (builder pattern).
    #[must_use]
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Move the anchor (builder pattern).
    #[must_use]
    pub fn with_anchor(mut self, anchor: Cell) -> Self {
        self.set_anchor(anchor);
        self
    }

    /// Move the anchor and refresh the cached dimensions.
    pub fn set_anchor(&mut self, anchor: Cell) {
        self.layout = WidgetLayout {
            x: anchor.x,
            y: anchor.y,
            w: u16::from(self.size.w()),
            h: u16::from(self.size.h()),
        };
    }

    #[inline]
    #[must_use]
    pub fn is_spacer(&self) -> bool {
        self.kind == WidgetKind::Spacer
    }

    /// Whether this widget takes cells on the grid: spacers always do, real
    /// widgets only while enabled.
    #[inline]
    #[must_use]
    pub fn occupies_grid(&self) -> bool {
        self.is_spacer() || self.enabled
    }

    /// Top-left anchor cell.
    #[inline]
    #[must_use]
    pub fn anchor(&self) -> Cell {
        Cell::new(self.layout.x, self.layout.y)
    }

    /// Covered cells, from the anchor and the block size.
    #[inline]
    #[must_use]
    pub fn footprint(&self) -> Footprint {
        Footprint::at(self.anchor(), self.size)
    }

    /// Number of blocks this widget covers.
    #[inline]
    #[must_use]
    pub fn block_count(&self) -> u32 {
        self.size.block_count()
    }
}
