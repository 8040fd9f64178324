//! Spring animation of numeric style properties.
//!
//! Each animated property is a damped harmonic oscillator pulled toward
//! its target. Integration runs in fixed 1 ms sub-steps so results do
//! not depend on how a host slices frame time.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::SideId;

/// Numeric style properties, e.g. `opacity` or `rotate_y`.
pub type Style = BTreeMap<String, f32>;

const STEP: Duration = Duration::from_millis(1);
const STEP_SECS: f32 = 0.001;

/// Physical parameters of a spring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringConfig {
    /// Spring stiffness.
    pub tension: f32,
    /// Damping.
    pub friction: f32,
    /// Mass of the animated body.
    pub mass: f32,
    /// Distance and speed under which the spring snaps to rest.
    pub precision: f32,
    /// Animate linearly over this many milliseconds instead of simulating.
    pub duration_ms: Option<u64>,
}

impl SpringConfig {
    /// Balanced, barely overshooting.
    pub const DEFAULT: Self = Self::preset(170.0, 26.0);
    /// Soft and slow to start.
    pub const GENTLE: Self = Self::preset(120.0, 14.0);
    /// Bouncy.
    pub const WOBBLY: Self = Self::preset(180.0, 12.0);
    /// Fast and firm.
    pub const STIFF: Self = Self::preset(210.0, 20.0);
    /// Heavily damped.
    pub const SLOW: Self = Self::preset(280.0, 60.0);
    /// Very heavily damped.
    pub const MOLASSES: Self = Self::preset(280.0, 120.0);

    const fn preset(tension: f32, friction: f32) -> Self {
        Self {
            tension,
            friction,
            mass: 1.0,
            precision: 0.01,
            duration_ms: None,
        }
    }

    /// Look up a preset by name.
    #[must_use]
    pub fn named(name: &str) -> Option<Self> {
        match name {
            "default" => Some(Self::DEFAULT),
            "gentle" => Some(Self::GENTLE),
            "wobbly" => Some(Self::WOBBLY),
            "stiff" => Some(Self::STIFF),
            "slow" => Some(Self::SLOW),
            "molasses" => Some(Self::MOLASSES),
            _ => None,
        }
    }

    /// Use a fixed-duration linear animation.
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration_ms = Some(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX));
        self
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// One animated number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringValue {
    value: f32,
    velocity: f32,
    target: f32,
    origin: f32,
    elapsed: Duration,
    carry: Duration,
}

impl SpringValue {
    /// A value resting at `value`.
    #[must_use]
    pub fn at_rest(value: f32) -> Self {
        Self {
            value,
            velocity: 0.0,
            target: value,
            origin: value,
            elapsed: Duration::ZERO,
            carry: Duration::ZERO,
        }
    }

    /// Current value.
    #[must_use]
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Current velocity in units per second.
    #[must_use]
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Value the spring is heading to.
    #[must_use]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Start heading toward `target` from wherever the value is now.
    #[allow(clippy::float_cmp)]
    pub fn retarget(&mut self, target: f32) {
        if target == self.target {
            return;
        }
        self.target = target;
        self.origin = self.value;
        self.elapsed = Duration::ZERO;
    }

    /// Snap to `target` without animating.
    pub fn jump(&mut self, target: f32) {
        *self = Self::at_rest(target);
    }

    /// Check if the value rests on its target.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_settled(&self) -> bool {
        self.value == self.target && self.velocity == 0.0
    }

    /// Advance the simulation by `dt`.
    pub fn step(&mut self, dt: Duration, config: &SpringConfig) {
        if self.is_settled() {
            return;
        }
        match config.duration_ms {
            Some(ms) => self.step_linear(dt, Duration::from_millis(ms)),
            None => self.step_spring(dt, config),
        }
    }

    fn step_linear(&mut self, dt: Duration, duration: Duration) {
        self.elapsed += dt;
        self.velocity = 0.0;
        if duration.is_zero() || self.elapsed >= duration {
            self.value = self.target;
            return;
        }
        let progress = self.elapsed.as_secs_f32() / duration.as_secs_f32();
        self.value = self.origin + (self.target - self.origin) * progress;
    }

    #[allow(clippy::float_cmp)]
    fn step_spring(&mut self, dt: Duration, config: &SpringConfig) {
        let mut remaining = self.carry + dt;
        while remaining >= STEP {
            remaining -= STEP;
            let spring = -config.tension * (self.value - self.target);
            let damping = -config.friction * self.velocity;
            let acceleration = (spring + damping) / config.mass;
            self.velocity += acceleration * STEP_SECS;
            self.value += self.velocity * STEP_SECS;

            let resting = self.velocity.abs() <= config.precision;
            let arrived =
                config.tension == 0.0 || (self.target - self.value).abs() <= config.precision;
            if resting && arrived {
                tracing::trace!("Spring settled at {}", self.target);
                self.value = self.target;
                self.velocity = 0.0;
                remaining = Duration::ZERO;
                break;
            }
        }
        self.carry = remaining;
    }
}

/// A set of animated properties moving together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimatedStyle {
    values: BTreeMap<String, SpringValue>,
}

impl AnimatedStyle {
    /// Start at rest on `style`.
    #[must_use]
    pub fn from_style(style: &Style) -> Self {
        Self {
            values: style
                .iter()
                .map(|(name, &value)| (name.clone(), SpringValue::at_rest(value)))
                .collect(),
        }
    }

    /// Head toward `style`. Properties new to this set start at their target.
    pub fn retarget(&mut self, style: &Style) {
        for (name, &target) in style {
            self.values
                .entry(name.clone())
                .and_modify(|v| v.retarget(target))
                .or_insert_with(|| SpringValue::at_rest(target));
        }
    }

    /// Snap every property in `style` to its value.
    pub fn jump(&mut self, style: &Style) {
        for (name, &target) in style {
            self.values.insert(name.clone(), SpringValue::at_rest(target));
        }
    }

    /// Advance all properties by `dt`.
    pub fn step(&mut self, dt: Duration, config: &SpringConfig) {
        for value in self.values.values_mut() {
            value.step(dt, config);
        }
    }

    /// Check if every property rests.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.values.values().all(SpringValue::is_settled)
    }

    /// Current value of one property.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f32> {
        self.values.get(name).map(SpringValue::value)
    }

    /// Snapshot of the current values.
    #[must_use]
    pub fn current(&self) -> Style {
        self.values
            .iter()
            .map(|(name, value)| (name.clone(), value.value()))
            .collect()
    }
}

/// Start, enter and leave styles of a side transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringProps {
    /// Style an entering side starts from.
    pub from: Style,
    /// Style an entering side settles on.
    pub enter: Style,
    /// Style a leaving side heads to before removal.
    pub leave: Style,
    /// Spring used for the transition.
    pub config: SpringConfig,
}

impl SpringProps {
    /// Cross-fade: opacity 0 to 1 on enter, 1 to 0 on leave.
    #[must_use]
    pub fn fade() -> Self {
        Self {
            from: Style::from([("opacity".to_string(), 0.0)]),
            enter: Style::from([("opacity".to_string(), 1.0)]),
            leave: Style::from([("opacity".to_string(), 0.0)]),
            config: SpringConfig::DEFAULT,
        }
    }

    /// Replace the spring config.
    #[must_use]
    pub fn with_config(mut self, config: SpringConfig) -> Self {
        self.config = config;
        self
    }
}

impl Default for SpringProps {
    fn default() -> Self {
        Self::fade()
    }
}

/// Caller override of the transition parameters.
#[derive(Clone)]
pub enum TransitionProps {
    /// Same parameters for every side.
    Static(SpringProps),
    /// Parameters computed from the side being shown.
    PerSide(Rc<dyn Fn(&SideId) -> SpringProps>),
}

impl TransitionProps {
    /// Build parameters from a function of the current side.
    #[must_use]
    pub fn per_side(f: impl Fn(&SideId) -> SpringProps + 'static) -> Self {
        Self::PerSide(Rc::new(f))
    }

    /// Parameters to use while `side` is current.
    #[must_use]
    pub fn resolve(&self, side: &SideId) -> SpringProps {
        match self {
            Self::Static(props) => props.clone(),
            Self::PerSide(f) => f(side),
        }
    }
}

impl fmt::Debug for TransitionProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(props) => f.debug_tuple("Static").field(props).finish(),
            Self::PerSide(_) => f.write_str("PerSide(..)"),
        }
    }
}

impl From<SpringProps> for TransitionProps {
    fn from(props: SpringProps) -> Self {
        Self::Static(props)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_spring_settles_within_two_seconds() {
        let mut value = SpringValue::at_rest(0.0);
        value.retarget(1.0);
        assert!(!value.is_settled());

        value.step(Duration::from_millis(100), &SpringConfig::DEFAULT);
        assert!(value.value() > 0.0 && value.value() < 1.0);
        assert!(value.velocity() > 0.0);

        value.step(Duration::from_secs(2), &SpringConfig::DEFAULT);
        assert!(value.is_settled());
        assert!((value.value() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_split_frames_match_single_step() {
        let mut whole = SpringValue::at_rest(0.0);
        let mut sliced = SpringValue::at_rest(0.0);
        whole.retarget(1.0);
        sliced.retarget(1.0);

        whole.step(Duration::from_millis(160), &SpringConfig::WOBBLY);
        for _ in 0..10 {
            sliced.step(Duration::from_millis(16), &SpringConfig::WOBBLY);
        }
        assert!((whole.value() - sliced.value()).abs() < 1e-6);
    }

    #[test]
    fn test_linear_duration() {
        let config = SpringConfig::DEFAULT.with_duration(Duration::from_millis(400));
        let mut value = SpringValue::at_rest(1.0);
        value.retarget(0.0);

        value.step(Duration::from_millis(100), &config);
        assert!((value.value() - 0.75).abs() < 1e-4);
        value.step(Duration::from_millis(300), &config);
        assert!(value.is_settled());
    }

    #[test]
    fn test_retarget_midflight_starts_from_current_value() {
        let config = SpringConfig::DEFAULT.with_duration(Duration::from_millis(100));
        let mut value = SpringValue::at_rest(0.0);
        value.retarget(1.0);
        value.step(Duration::from_millis(50), &config);
        value.retarget(0.0);
        value.step(Duration::from_millis(50), &config);
        assert!((value.value() - 0.25).abs() < 1e-4);
    }

    #[test]
    fn test_animated_style_adds_unknown_properties_at_target() {
        let mut style = AnimatedStyle::from_style(&SpringProps::fade().from);
        style.retarget(&Style::from([
            ("opacity".to_string(), 1.0),
            ("scale".to_string(), 0.9),
        ]));
        assert_eq!(style.get("scale"), Some(0.9));
        assert_eq!(style.get("opacity"), Some(0.0));
        assert!(!style.is_settled());
    }

    #[test]
    fn test_named_presets() {
        assert_eq!(SpringConfig::named("gentle"), Some(SpringConfig::GENTLE));
        assert_eq!(SpringConfig::named("bouncy"), None);
    }

    #[test]
    fn test_per_side_props() {
        let props = TransitionProps::per_side(|side| {
            if side == &SideId::back() {
                SpringProps::fade().with_config(SpringConfig::STIFF)
            } else {
                SpringProps::fade()
            }
        });
        assert_eq!(props.resolve(&SideId::back()).config, SpringConfig::STIFF);
        assert_eq!(props.resolve(&SideId::front()).config, SpringConfig::DEFAULT);
    }
}
