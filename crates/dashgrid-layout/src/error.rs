//! Rejections returned by grid operations.
//!
//! A rejection is never fatal: the state it was raised against is left
//! exactly as it was.

use std::fmt;

use crate::validate::ArrangementError;
use crate::widget::{WidgetId, WidgetKind};

/// Structured reasons for refusing a grid operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridRejection {
    /// No legal slot exists for the widget, or the capacity budget is spent.
    CapacityExceeded {
        kind: WidgetKind,
        required: u32,
        available: u32,
    },
    /// A widget of this kind is already enabled.
    DuplicateKind { kind: WidgetKind },
    /// Spacers cannot be added directly.
    SpacerNotAddable,
    /// No widget with this id exists.
    WidgetNotFound { id: WidgetId },
    /// The id names a spacer, which has no settings or identity.
    NotARealWidget { id: WidgetId },
    /// A list index is outside the widget list.
    IndexOutOfRange { index: usize, len: usize },
    /// A cell index is outside the grid.
    CellOutOfRange { index: usize, cells: usize },
    /// No preset with this id exists.
    UnknownPreset { id: String },
    /// The candidate arrangement failed validation.
    InvalidArrangement(ArrangementError),
}

impl fmt::Display for GridRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityExceeded {
                kind,
                required,
                available,
            } => write!(
                f,
                "capacity reached: {kind} needs {required} block(s), {available} available"
            ),
            Self::DuplicateKind { kind } => write!(f, "a {kind} widget is already on the grid"),
            Self::SpacerNotAddable => write!(f, "spacers are managed by the grid"),
            Self::WidgetNotFound { id } => write!(f, "widget {id} not found"),
            Self::NotARealWidget { id } => write!(f, "{id} is a spacer"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range for {len} widget(s)")
            }
            Self::CellOutOfRange { index, cells } => {
                write!(f, "cell {index} out of range for a {cells}-cell grid")
            }
            Self::UnknownPreset { id } => write!(f, "unknown preset {id:?}"),
            Self::InvalidArrangement(err) => write!(f, "invalid arrangement: {err}"),
        }
    }
}

impl std::error::Error for GridRejection {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidArrangement(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ArrangementError> for GridRejection {
    fn from(err: ArrangementError) -> Self {
        Self::InvalidArrangement(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_display_names_kind_and_budget() {
        let err = GridRejection::CapacityExceeded {
            kind: WidgetKind::Calendar,
            required: 4,
            available: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("calendar"));
        assert!(msg.contains('4'));
        assert!(msg.contains('2'));
    }

    #[test]
    fn arrangement_error_is_source() {
        use std::error::Error;
        let err: GridRejection = ArrangementError::Overflow {
            widget: WidgetId::from("w"),
        }
        .into();
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("invalid arrangement"));
    }
}
