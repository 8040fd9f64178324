//! Card configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{CardError, CardResult, SideId, SpringProps};

/// Default debounce window applied to side changes.
pub const DEFAULT_DEBOUNCE_MS: u64 = 200;

/// Tunables shared by every card a host mounts.
///
/// All fields are optional in JSON; missing ones take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardConfig {
    /// How long a side must stay put before the transition starts.
    pub debounce_ms: u64,
    /// Side shown at rest and after the pointer leaves.
    pub front_side: SideId,
    /// Side shown while the pointer hovers the card.
    pub back_side: SideId,
    /// Shadow elevation of the card surface.
    pub elevation: u8,
    /// Tooltip of the edit trigger.
    pub edit_tooltip: String,
    /// Transition used when the caller supplies none.
    pub default_transition: SpringProps,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            front_side: SideId::front(),
            back_side: SideId::back(),
            elevation: 1,
            edit_tooltip: "Edit this card".to_string(),
            default_transition: SpringProps::fade(),
        }
    }
}

impl CardConfig {
    /// Parse and validate a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the values are
    /// inconsistent.
    pub fn from_json(json: &str) -> CardResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the values make sense together.
    ///
    /// # Errors
    ///
    /// Returns [`CardError::InvalidConfig`] describing the first problem.
    pub fn validate(&self) -> CardResult<()> {
        if self.front_side.as_str().is_empty() || self.back_side.as_str().is_empty() {
            return Err(CardError::InvalidConfig(
                "side identifiers must not be empty".to_string(),
            ));
        }
        if self.front_side == self.back_side {
            return Err(CardError::InvalidConfig(format!(
                "front and back side are both '{}'",
                self.front_side
            )));
        }
        let spring = &self.default_transition.config;
        if spring.duration_ms.is_none() && spring.mass <= 0.0 {
            return Err(CardError::InvalidConfig(
                "spring mass must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// The debounce window.
    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Replace the debounce window.
    #[must_use]
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce_ms = u64::try_from(debounce.as_millis()).unwrap_or(u64::MAX);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SpringConfig;

    #[test]
    fn test_defaults() {
        let config = CardConfig::default();
        assert_eq!(config.debounce(), Duration::from_millis(200));
        assert_eq!(config.front_side, SideId::front());
        assert_eq!(config.back_side, SideId::back());
        assert_eq!(config.default_transition, SpringProps::fade());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = CardConfig::from_json(
            r#"{"debounce_ms": 50, "back_side": "stats", "default_transition": {"config": {"tension": 210, "friction": 20}}}"#,
        )
        .expect("parse");
        assert_eq!(config.debounce_ms, 50);
        assert_eq!(config.back_side, SideId::new("stats"));
        assert_eq!(config.front_side, SideId::front());
        assert_eq!(config.default_transition.config, SpringConfig::STIFF);
        assert_eq!(config.default_transition.enter, SpringProps::fade().enter);
    }

    #[test]
    fn test_rejects_identical_sides() {
        let err = CardConfig::from_json(r#"{"front_side": "back"}"#).expect_err("should reject");
        assert!(matches!(err, CardError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = CardConfig::from_json("{").expect_err("should reject");
        assert!(matches!(err, CardError::Serialization(_)));
    }
}
