//! Input events for card interaction.

use serde::{Deserialize, Serialize};

/// Click target identifier of the edit trigger button.
pub const EDIT_TRIGGER_ID: &str = "edit-trigger";

/// All input events the card can receive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CardEvent {
    /// Pointer entered the card surface.
    PointerEnter,

    /// Pointer left the card surface.
    PointerLeave,

    /// A button inside the card was clicked.
    Click {
        /// Identifier of the clicked button.
        target: String,
    },
}

impl CardEvent {
    /// Create a click event on `target`.
    #[must_use]
    pub fn click(target: impl Into<String>) -> Self {
        Self::Click {
            target: target.into(),
        }
    }

    /// A click on the edit trigger.
    #[must_use]
    pub fn edit_click() -> Self {
        Self::click(EDIT_TRIGGER_ID)
    }
}

/// What the card did with an event.
///
/// Hosts must honour `default_prevented` and `propagation_stopped`
/// before running their own handlers for the same event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventOutcome {
    /// The card reacted to the event.
    pub handled: bool,
    /// The host must skip its default action.
    pub default_prevented: bool,
    /// The event must not bubble to enclosing elements.
    pub propagation_stopped: bool,
}

impl EventOutcome {
    /// The card did not react.
    pub const IGNORED: Self = Self {
        handled: false,
        default_prevented: false,
        propagation_stopped: false,
    };

    /// The card reacted; the host may continue as usual.
    pub const HANDLED: Self = Self {
        handled: true,
        default_prevented: false,
        propagation_stopped: false,
    };

    /// The card reacted and swallowed the event.
    pub const CONSUMED: Self = Self {
        handled: true,
        default_prevented: true,
        propagation_stopped: true,
    };
}
