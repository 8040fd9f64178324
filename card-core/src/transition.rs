//! Keyed enter/leave transitions between card sides.
//!
//! Every side shown gets a [`TransitionItem`] keyed `card_side_<id>`.
//! When the shown side changes, the entering item springs from `from` to
//! `enter` while the previous one springs to `leave` and is dropped once
//! it settles. Both are rendered meanwhile.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{AnimatedStyle, SideId, SpringConfig, SpringProps, Style};

/// Direction of a transition item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Heading to (or resting on) the `enter` style.
    Enter,
    /// Heading to the `leave` style, removed once settled.
    Leave,
}

/// One side instance tracked by the transition engine.
#[derive(Debug, Clone)]
pub struct TransitionItem {
    side: SideId,
    key: String,
    instance: u64,
    phase: Phase,
    style: AnimatedStyle,
    config: SpringConfig,
}

impl TransitionItem {
    /// The side this item shows.
    #[must_use]
    pub fn side(&self) -> &SideId {
        &self.side
    }

    /// Transition key, derived from the side.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Instance number, unique among all items this engine created.
    #[must_use]
    pub fn instance(&self) -> u64 {
        self.instance
    }

    /// Current direction.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current animated values.
    #[must_use]
    pub fn style(&self) -> Style {
        self.style.current()
    }

    /// Current value of one animated property.
    #[must_use]
    pub fn value(&self, property: &str) -> Option<f32> {
        self.style.get(property)
    }

    /// Check if the item rests on its target style.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.style.is_settled()
    }
}

/// The transition engine.
#[derive(Debug, Clone)]
pub struct Transitions {
    items: Vec<TransitionItem>,
    unique: bool,
    next_instance: u64,
}

impl Transitions {
    /// Create an empty engine.
    ///
    /// With `unique`, a side re-entering while it still leaves reuses its
    /// in-flight item instead of spawning a second one.
    #[must_use]
    pub fn new(unique: bool) -> Self {
        Self {
            items: Vec::new(),
            unique,
            next_instance: 0,
        }
    }

    /// Change the uniqueness constraint for later updates.
    pub fn set_unique(&mut self, unique: bool) {
        self.unique = unique;
    }

    /// Whether items are unique per key.
    #[must_use]
    pub fn is_unique(&self) -> bool {
        self.unique
    }

    /// Items in paint order (oldest first).
    #[must_use]
    pub fn items(&self) -> &[TransitionItem] {
        &self.items
    }

    /// The item currently entering or shown.
    #[must_use]
    pub fn current(&self) -> Option<&TransitionItem> {
        self.items.iter().rev().find(|item| item.phase == Phase::Enter)
    }

    /// Check if any item is still moving.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.items.iter().any(|item| !item.is_settled())
    }

    /// Show `side`. With `immediate`, every item snaps to its target.
    pub fn update(&mut self, side: &SideId, props: &SpringProps, immediate: bool) {
        if self.current().is_some_and(|item| &item.side == side) {
            return;
        }

        for item in self
            .items
            .iter_mut()
            .filter(|item| item.phase == Phase::Enter)
        {
            tracing::debug!("Side {} leaving", item.side);
            item.phase = Phase::Leave;
            item.config = props.config;
            if immediate {
                item.style.jump(&props.leave);
            } else {
                item.style.retarget(&props.leave);
            }
        }

        let key = side.transition_key();
        let revived = self.unique
            && self
                .items
                .iter_mut()
                .find(|item| item.key == key && item.phase == Phase::Leave)
                .map(|item| {
                    tracing::debug!("Side {side} re-entering instance {}", item.instance);
                    item.phase = Phase::Enter;
                    item.config = props.config;
                    if immediate {
                        item.style.jump(&props.enter);
                    } else {
                        item.style.retarget(&props.enter);
                    }
                })
                .is_some();

        if !revived {
            let mut style = AnimatedStyle::from_style(&props.from);
            if immediate {
                style.jump(&props.enter);
            } else {
                style.retarget(&props.enter);
            }
            tracing::debug!(immediate, "Side {side} entering as {key}");
            self.items.push(TransitionItem {
                side: side.clone(),
                key,
                instance: self.next_instance,
                phase: Phase::Enter,
                style,
                config: props.config,
            });
            self.next_instance += 1;
        }

        if immediate {
            self.items.retain(|item| item.phase == Phase::Enter);
        }
    }

    /// Advance every item by `dt` and drop leaving items that settled.
    pub fn advance(&mut self, dt: Duration) {
        if dt.is_zero() {
            return;
        }
        for item in &mut self.items {
            item.style.step(dt, &item.config);
        }
        self.items.retain(|item| {
            let done = item.phase == Phase::Leave && item.is_settled();
            if done {
                tracing::trace!("Removing settled item {} #{}", item.key, item.instance);
            }
            !done
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opacity(item: &TransitionItem) -> f32 {
        item.value("opacity").expect("opacity")
    }

    #[test]
    fn test_immediate_first_item_is_fully_visible() {
        let mut transitions = Transitions::new(true);
        transitions.update(&SideId::front(), &SpringProps::fade(), true);

        let items = transitions.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].key(), "card_side_front");
        assert!((opacity(&items[0]) - 1.0).abs() < f32::EPSILON);
        assert!(!transitions.is_animating());
    }

    #[test]
    fn test_change_runs_enter_and_leave_together() {
        let mut transitions = Transitions::new(true);
        transitions.update(&SideId::front(), &SpringProps::fade(), true);
        transitions.update(&SideId::back(), &SpringProps::fade(), false);

        let items = transitions.items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].phase(), Phase::Leave);
        assert_eq!(items[1].phase(), Phase::Enter);
        assert!(opacity(&items[1]).abs() < f32::EPSILON);
        assert!(transitions.is_animating());

        transitions.advance(Duration::from_millis(100));
        let items = transitions.items();
        assert!(opacity(&items[0]) < 1.0);
        assert!(opacity(&items[1]) > 0.0);

        transitions.advance(Duration::from_secs(2));
        let items = transitions.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].side(), &SideId::back());
        assert!(!transitions.is_animating());
    }

    #[test]
    fn test_same_side_update_is_noop() {
        let mut transitions = Transitions::new(true);
        transitions.update(&SideId::front(), &SpringProps::fade(), true);
        transitions.update(&SideId::front(), &SpringProps::fade(), false);
        assert_eq!(transitions.items().len(), 1);
        assert!(!transitions.is_animating());
    }

    #[test]
    fn test_unique_revives_leaving_item() {
        let mut transitions = Transitions::new(true);
        transitions.update(&SideId::front(), &SpringProps::fade(), true);
        transitions.update(&SideId::back(), &SpringProps::fade(), false);
        transitions.advance(Duration::from_millis(50));
        transitions.update(&SideId::front(), &SpringProps::fade(), false);

        let fronts: Vec<_> = transitions
            .items()
            .iter()
            .filter(|item| item.side() == &SideId::front())
            .collect();
        assert_eq!(fronts.len(), 1);
        assert_eq!(fronts[0].instance(), 0);
        assert_eq!(fronts[0].phase(), Phase::Enter);
    }

    #[test]
    fn test_non_unique_spawns_second_instance() {
        let mut transitions = Transitions::new(false);
        transitions.update(&SideId::front(), &SpringProps::fade(), true);
        transitions.update(&SideId::back(), &SpringProps::fade(), false);
        transitions.advance(Duration::from_millis(50));
        transitions.update(&SideId::front(), &SpringProps::fade(), false);

        let fronts: Vec<_> = transitions
            .items()
            .iter()
            .filter(|item| item.key() == "card_side_front")
            .map(TransitionItem::instance)
            .collect();
        assert_eq!(fronts, vec![0, 2]);
        assert_eq!(transitions.current().map(TransitionItem::instance), Some(2));
    }

    #[test]
    fn test_custom_styles() {
        let flip = SpringProps {
            from: Style::from([("rotate_y".to_string(), 180.0)]),
            enter: Style::from([("rotate_y".to_string(), 0.0)]),
            leave: Style::from([("rotate_y".to_string(), -180.0)]),
            config: SpringConfig::DEFAULT.with_duration(Duration::from_millis(100)),
        };
        let mut transitions = Transitions::new(true);
        transitions.update(&SideId::front(), &flip, true);
        transitions.update(&SideId::back(), &flip, false);
        transitions.advance(Duration::from_millis(50));

        let items = transitions.items();
        assert!((items[0].value("rotate_y").expect("rotate") + 90.0).abs() < 1e-3);
        assert!((items[1].value("rotate_y").expect("rotate") - 90.0).abs() < 1e-3);
    }
}
