//! Timelines of actions replayed against a card.

use std::time::Duration;

use card_core::{CardEvent, SideId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors loading a script.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// The JSON could not be parsed.
    #[error("Invalid script: {0}")]
    Parse(#[from] serde_json::Error),

    /// A submit step carries no arguments.
    #[error("Step {index} submits without arguments")]
    EmptySubmit {
        /// Position of the step in the file.
        index: usize,
    },
}

/// What happens at one point of the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptAction {
    /// Pointer enters the card.
    PointerEnter,
    /// Pointer leaves the card.
    PointerLeave,
    /// Click on a button of the card.
    Click {
        /// Button identifier.
        target: String,
    },
    /// The open dialog submits these arguments.
    Submit {
        /// Arguments forwarded to the edit handler.
        args: Vec<Value>,
    },
    /// The open dialog is dismissed.
    Close,
    /// The host forces a side, or releases it with `null`.
    ForceSide {
        /// Forced side.
        side: Option<SideId>,
    },
}

impl ScriptAction {
    /// The card input event for this action, if it is one.
    #[must_use]
    pub fn as_event(&self) -> Option<CardEvent> {
        match self {
            Self::PointerEnter => Some(CardEvent::PointerEnter),
            Self::PointerLeave => Some(CardEvent::PointerLeave),
            Self::Click { target } => Some(CardEvent::click(target.as_str())),
            Self::Submit { .. } | Self::Close | Self::ForceSide { .. } => None,
        }
    }
}

/// One timed action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    /// Offset from the start of the replay.
    pub at_ms: u64,
    /// Action to perform.
    pub event: ScriptAction,
}

impl ScriptStep {
    /// Offset from the start of the replay.
    #[must_use]
    pub fn at(&self) -> Duration {
        Duration::from_millis(self.at_ms)
    }
}

/// A timeline, ordered by time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Script {
    steps: Vec<ScriptStep>,
}

impl Script {
    /// Build a script; steps are ordered by time, ties keep their order.
    ///
    /// # Errors
    ///
    /// Returns an error if a submit step has no arguments.
    pub fn new(mut steps: Vec<ScriptStep>) -> Result<Self, ScriptError> {
        let empty_submit =
            |step: &ScriptStep| matches!(&step.event, ScriptAction::Submit { args } if args.is_empty());
        if let Some(index) = steps.iter().position(empty_submit) {
            return Err(ScriptError::EmptySubmit { index });
        }
        steps.sort_by_key(|step| step.at_ms);
        Ok(Self { steps })
    }

    /// Parse a script from a JSON array of steps.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a step is invalid.
    pub fn from_json(json: &str) -> Result<Self, ScriptError> {
        let steps: Vec<ScriptStep> = serde_json::from_str(json)?;
        Self::new(steps)
    }

    /// The timeline used when none is given: hover, leave, then edit.
    #[must_use]
    pub fn demo(editable: bool) -> Self {
        let mut steps = vec![
            ScriptStep {
                at_ms: 0,
                event: ScriptAction::PointerEnter,
            },
            ScriptStep {
                at_ms: 1200,
                event: ScriptAction::PointerLeave,
            },
        ];
        if editable {
            steps.push(ScriptStep {
                at_ms: 2400,
                event: ScriptAction::Click {
                    target: card_core::EDIT_TRIGGER_ID.to_string(),
                },
            });
            steps.push(ScriptStep {
                at_ms: 2800,
                event: ScriptAction::Submit {
                    args: vec![serde_json::json!({"title": "Mathematician"})],
                },
            });
        }
        Self { steps }
    }

    /// Steps in time order.
    #[must_use]
    pub fn steps(&self) -> &[ScriptStep] {
        &self.steps
    }

    /// Offset of the last step.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.steps.last().map_or(Duration::ZERO, ScriptStep::at)
    }
}
