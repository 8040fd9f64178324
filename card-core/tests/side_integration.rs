//! Side Switching Integration Tests
//!
//! Tests the complete side flow including:
//! - Hover in/out with debouncing
//! - Externally forced sides
//! - First-render suppression of animation
//! - Custom transition parameters
//! - Side changes requested by nested renderers

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use card_core::{
    CardConfig, CardEvent, Phase, ProfileCard, ProfileCardProps, SideId, SideProps, Sides,
    SpringConfig, SpringProps, Style, TransitionProps, View,
};
use serde_json::{json, Value};

/// Card data used across the tests.
fn profile() -> Value {
    json!({"id": 1, "name": "Ada"})
}

/// Sides that render their name and the card id.
fn sides() -> Sides<Value> {
    Sides::new()
        .with("front", |props: &SideProps<'_, Value>| {
            View::text(format!("F{}", props.data["id"]))
        })
        .with("back", |props: &SideProps<'_, Value>| {
            View::text(format!("B{}", props.data["id"]))
        })
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// Opacity of every animated side, keyed by transition key.
fn opacities(view: &View) -> Vec<(String, f32)> {
    view.animated()
        .into_iter()
        .filter_map(|v| match v {
            View::Animated { key, style, .. } => {
                Some((key.clone(), style.get("opacity").copied().unwrap_or(f32::NAN)))
            }
            _ => None,
        })
        .collect()
}

/// Advance far enough for any default transition to settle.
const SETTLE: Duration = Duration::from_secs(3);

// ============================================================================
// Hover Tests
// ============================================================================

#[test]
fn test_hover_flips_to_back_and_back_to_front() {
    let t0 = Instant::now();
    let mut card = ProfileCard::mount(
        ProfileCardProps::new(profile(), sides()),
        CardConfig::default(),
        t0,
    );

    let view = card.render();
    assert!(view.contains_text("F1"));
    assert!(!view.contains_text("B1"));

    card.handle_event(&CardEvent::PointerEnter, t0);
    assert_eq!(card.side(), &SideId::back());

    // Still inside the debounce window: front only.
    card.advance(t0 + ms(150));
    assert!(!card.render().contains_text("B1"));

    let t1 = t0 + ms(200) + SETTLE;
    card.advance(t1);
    let view = card.render();
    assert!(view.contains_text("B1"));
    assert!(!view.contains_text("F1"));

    card.handle_event(&CardEvent::PointerLeave, t1);
    assert_eq!(card.side(), &SideId::front());
    card.advance(t1 + ms(200) + SETTLE);
    let view = card.render();
    assert!(view.contains_text("F1"));
    assert!(!view.contains_text("B1"));
}

#[test]
fn test_hover_flicker_inside_window_does_not_animate() {
    let t0 = Instant::now();
    let mut card = ProfileCard::mount(
        ProfileCardProps::new(profile(), sides()),
        CardConfig::default(),
        t0,
    );

    card.handle_event(&CardEvent::PointerEnter, t0);
    card.handle_event(&CardEvent::PointerLeave, t0 + ms(80));
    card.handle_event(&CardEvent::PointerEnter, t0 + ms(120));
    card.handle_event(&CardEvent::PointerLeave, t0 + ms(160));

    card.advance(t0 + ms(400));
    assert_eq!(card.debounced_side(), &SideId::front());
    assert!(!card.is_animating());
    assert_eq!(card.transitions().items().len(), 1);
}

#[test]
fn test_hover_uses_configured_sides() {
    let t0 = Instant::now();
    let config = CardConfig {
        back_side: SideId::new("stats"),
        ..CardConfig::default()
    };
    let sides = sides().with("stats", |_: &SideProps<'_, Value>| View::text("stats"));
    let mut card = ProfileCard::mount(ProfileCardProps::new(profile(), sides), config, t0);

    card.handle_event(&CardEvent::PointerEnter, t0);
    card.advance(t0 + ms(200) + SETTLE);
    assert!(card.render().contains_text("stats"));
}

// ============================================================================
// Forced Side Tests
// ============================================================================

#[test]
fn test_forced_side_overrides_hover_state() {
    let t0 = Instant::now();
    let mut card = ProfileCard::mount(
        ProfileCardProps::new(profile(), sides()),
        CardConfig::default(),
        t0,
    );

    card.handle_event(&CardEvent::PointerEnter, t0);
    card.advance(t0 + ms(200) + SETTLE);
    assert_eq!(card.side(), &SideId::back());

    let t1 = t0 + ms(200) + SETTLE;
    card.update_props(
        ProfileCardProps::new(profile(), sides()).with_side("front"),
        t1,
    );
    assert_eq!(card.side(), &SideId::front());

    card.advance(t1 + ms(200) + SETTLE);
    assert!(card.render().contains_text("F1"));
}

#[test]
fn test_each_forced_change_wins() {
    let t0 = Instant::now();
    let mut card = ProfileCard::mount(
        ProfileCardProps::new(profile(), sides()).with_side("back"),
        CardConfig::default(),
        t0,
    );
    assert_eq!(card.side(), &SideId::back());

    card.handle_event(&CardEvent::PointerLeave, t0);
    assert_eq!(card.side(), &SideId::front());

    card.update_props(
        ProfileCardProps::new(profile(), sides()).with_side("front"),
        t0 + ms(10),
    );
    card.handle_event(&CardEvent::PointerEnter, t0 + ms(20));
    card.update_props(
        ProfileCardProps::new(profile(), sides()).with_side("back"),
        t0 + ms(30),
    );
    assert_eq!(card.side(), &SideId::back());
}

#[test]
fn test_unknown_side_renders_empty() {
    let t0 = Instant::now();
    let mut card = ProfileCard::mount(
        ProfileCardProps::new(profile(), sides()),
        CardConfig::default(),
        t0,
    );

    card.update_props(
        ProfileCardProps::new(profile(), sides()).with_side("missing"),
        t0,
    );
    card.advance(t0 + ms(200) + SETTLE);

    let view = card.render();
    match view.animated().as_slice() {
        [View::Animated { key, child, .. }] => {
            assert_eq!(key, "card_side_missing");
            assert!(child.is_empty());
        }
        other => panic!("Expected a single animated side, got {other:?}"),
    }
}

// ============================================================================
// Animation Tests
// ============================================================================

#[test]
fn test_first_side_never_animates_later_sides_do() {
    let t0 = Instant::now();
    let mut card = ProfileCard::mount(
        ProfileCardProps::new(profile(), sides()),
        CardConfig::default(),
        t0,
    );

    assert_eq!(
        opacities(&card.render()),
        vec![("card_side_front".to_string(), 1.0)]
    );
    assert!(!card.is_animating());

    card.handle_event(&CardEvent::PointerEnter, t0);
    card.advance(t0 + ms(200));
    let start = opacities(&card.render());
    assert_eq!(
        start,
        vec![
            ("card_side_front".to_string(), 1.0),
            ("card_side_back".to_string(), 0.0),
        ]
    );

    card.advance(t0 + ms(300));
    let mid = opacities(&card.render());
    assert!(mid[0].1 < 1.0 && mid[0].1 > 0.0, "front mid-fade: {mid:?}");
    assert!(mid[1].1 > 0.0 && mid[1].1 < 1.0, "back mid-fade: {mid:?}");
    assert!(card.is_animating());

    card.advance(t0 + ms(200) + SETTLE);
    assert_eq!(
        opacities(&card.render()),
        vec![("card_side_back".to_string(), 1.0)]
    );
}

#[test]
fn test_static_custom_transition() {
    let t0 = Instant::now();
    let slide = SpringProps {
        from: Style::from([("translate_x".to_string(), 100.0)]),
        enter: Style::from([("translate_x".to_string(), 0.0)]),
        leave: Style::from([("translate_x".to_string(), -100.0)]),
        config: SpringConfig::DEFAULT.with_duration(ms(200)),
    };
    let mut card = ProfileCard::mount(
        ProfileCardProps::new(profile(), sides()).with_transitions(slide),
        CardConfig::default(),
        t0,
    );

    card.handle_event(&CardEvent::PointerEnter, t0);
    card.advance(t0 + ms(300));

    let items = card.transitions().items();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].phase(), Phase::Leave);
    assert!((items[0].value("translate_x").expect("x") + 50.0).abs() < 1e-3);
    assert!((items[1].value("translate_x").expect("x") - 50.0).abs() < 1e-3);

    card.advance(t0 + ms(400));
    assert_eq!(card.transitions().items().len(), 1);
}

#[test]
fn test_per_side_transition_function_sees_each_side() {
    let t0 = Instant::now();
    let seen: Rc<RefCell<Vec<SideId>>> = Rc::default();
    let log = Rc::clone(&seen);
    let transitions = TransitionProps::per_side(move |side| {
        log.borrow_mut().push(side.clone());
        SpringProps::fade()
    });
    let mut card = ProfileCard::mount(
        ProfileCardProps::new(profile(), sides()).with_transitions(transitions),
        CardConfig::default(),
        t0,
    );

    card.handle_event(&CardEvent::PointerEnter, t0);
    card.handle_event(&CardEvent::PointerLeave, t0 + ms(10));

    assert_eq!(
        *seen.borrow(),
        vec![SideId::front(), SideId::back(), SideId::front()]
    );
}

#[test]
fn test_non_unique_transitions_render_both_instances() {
    let t0 = Instant::now();
    let config = CardConfig::default().with_debounce(Duration::ZERO);
    let mut card = ProfileCard::mount(
        ProfileCardProps::new(profile(), sides()).with_transition_unique(false),
        config,
        t0,
    );

    card.handle_event(&CardEvent::PointerEnter, t0);
    card.advance(t0 + ms(1));
    card.handle_event(&CardEvent::PointerLeave, t0 + ms(50));
    card.advance(t0 + ms(51));

    let fronts = card
        .render()
        .animated()
        .into_iter()
        .filter(|v| matches!(v, View::Animated { key, .. } if key == "card_side_front"))
        .count();
    assert_eq!(fronts, 2);
}

// ============================================================================
// Context Tests
// ============================================================================

#[test]
fn test_nested_renderer_can_flip_the_card() {
    let t0 = Instant::now();
    let setter = Rc::new(RefCell::new(None));
    let captured = Rc::clone(&setter);
    let sides = Sides::new()
        .with("front", move |props: &SideProps<'_, Value>| {
            *captured.borrow_mut() = Some(props.context.setter());
            View::text(format!("front on {}", props.context.side()))
        })
        .with("back", |_: &SideProps<'_, Value>| View::text("back"));
    let mut card = ProfileCard::mount(
        ProfileCardProps::new(profile(), sides),
        CardConfig::default(),
        t0,
    );

    assert!(card.render().contains_text("front on front"));

    setter
        .borrow()
        .as_ref()
        .expect("renderer captured the setter")
        .set("back");
    card.advance(t0 + ms(5));
    assert_eq!(card.side(), &SideId::back());

    card.advance(t0 + ms(205) + SETTLE);
    assert!(card.render().contains_text("back"));
}
