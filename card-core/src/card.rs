//! The profile card component.
//!
//! A card is driven by three inputs: props (replaced wholesale, like a
//! re-render with new props), input events, and the clock. Nothing
//! inside reads the system time; every entry point takes `now`.

use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::{
    CardConfig, CardEvent, Debounced, EditDialog, EditOverlay, EventOutcome, MountedDialog,
    ProfileCardContext, SideId, SideProps, SideSetter, Sides, SpringProps, TransitionProps,
    Transitions, Variant, View, EDIT_TRIGGER_ID,
};

/// How often a host should repaint while a transition runs.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Inputs of a card.
pub struct ProfileCardProps<D> {
    /// Opaque card data, forwarded to side renderers and the edit dialog.
    pub data: D,
    /// Renderer per side.
    pub sides: Sides<D>,
    /// Side forced by the caller. Each change overrides hover state.
    pub side: Option<SideId>,
    /// Styling token.
    pub variant: Variant,
    /// At most one in-flight item per side key.
    pub is_transition_unique: bool,
    /// Show the edit trigger.
    pub is_editing_profile: bool,
    /// Dialog opened by the edit trigger.
    pub edit_dialog: Option<Rc<EditDialog<D>>>,
    /// Override of the transition parameters.
    pub custom_transitions_spring_props: Option<TransitionProps>,
}

impl<D> ProfileCardProps<D> {
    /// Props with defaults for everything but data and sides.
    #[must_use]
    pub fn new(data: D, sides: Sides<D>) -> Self {
        Self {
            data,
            sides,
            side: None,
            variant: Variant::default(),
            is_transition_unique: true,
            is_editing_profile: false,
            edit_dialog: None,
            custom_transitions_spring_props: None,
        }
    }

    /// Force a side.
    #[must_use]
    pub fn with_side(mut self, side: impl Into<SideId>) -> Self {
        self.side = Some(side.into());
        self
    }

    /// Set the variant token.
    #[must_use]
    pub fn with_variant(mut self, variant: impl Into<Variant>) -> Self {
        self.variant = variant.into();
        self
    }

    /// Set the transition uniqueness constraint.
    #[must_use]
    pub fn with_transition_unique(mut self, unique: bool) -> Self {
        self.is_transition_unique = unique;
        self
    }

    /// Show or hide the edit trigger.
    #[must_use]
    pub fn editing_profile(mut self, editing: bool) -> Self {
        self.is_editing_profile = editing;
        self
    }

    /// Attach an edit dialog.
    #[must_use]
    pub fn with_edit_dialog(self, dialog: EditDialog<D>) -> Self {
        self.with_shared_edit_dialog(Rc::new(dialog))
    }

    /// Attach an edit dialog shared with other props values.
    ///
    /// Passing the same `Rc` again on update keeps the bound callbacks.
    #[must_use]
    pub fn with_shared_edit_dialog(mut self, dialog: Rc<EditDialog<D>>) -> Self {
        self.edit_dialog = Some(dialog);
        self
    }

    /// Override the transition parameters.
    #[must_use]
    pub fn with_transitions(mut self, transitions: impl Into<TransitionProps>) -> Self {
        self.custom_transitions_spring_props = Some(transitions.into());
        self
    }
}

impl<D: Clone> Clone for ProfileCardProps<D> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            sides: self.sides.clone(),
            side: self.side.clone(),
            variant: self.variant.clone(),
            is_transition_unique: self.is_transition_unique,
            is_editing_profile: self.is_editing_profile,
            edit_dialog: self.edit_dialog.clone(),
            custom_transitions_spring_props: self.custom_transitions_spring_props.clone(),
        }
    }
}

impl<D: std::fmt::Debug> std::fmt::Debug for ProfileCardProps<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileCardProps")
            .field("data", &self.data)
            .field("sides", &self.sides)
            .field("side", &self.side)
            .field("variant", &self.variant)
            .field("is_transition_unique", &self.is_transition_unique)
            .field("is_editing_profile", &self.is_editing_profile)
            .field("edit_dialog", &self.edit_dialog)
            .field(
                "custom_transitions_spring_props",
                &self.custom_transitions_spring_props,
            )
            .finish()
    }
}

/// A mounted profile card.
pub struct ProfileCard<D> {
    props: ProfileCardProps<D>,
    config: CardConfig,
    side: SideId,
    received_side: Option<SideId>,
    debounced_side: Debounced<SideId>,
    spring_props: SpringProps,
    has_side_changed: bool,
    transitions: Transitions,
    setter: SideSetter,
    edit: EditOverlay<D>,
    clock: Instant,
}

impl<D> ProfileCard<D> {
    /// Mount a card at `now`.
    ///
    /// The initial side is the forced side if any, else the configured
    /// front side, and it shows at once without animating.
    #[must_use]
    pub fn mount(props: ProfileCardProps<D>, config: CardConfig, now: Instant) -> Self {
        let side = props
            .side
            .clone()
            .unwrap_or_else(|| config.front_side.clone());
        let spring_props = resolve_spring_props(&props, &config, &side);

        let mut transitions = Transitions::new(props.is_transition_unique);
        transitions.update(&side, &spring_props, true);
        tracing::debug!("Card mounted on side {side}");

        Self {
            received_side: props.side.clone(),
            debounced_side: Debounced::new(side.clone(), config.debounce()),
            edit: EditOverlay::new(props.edit_dialog.clone()),
            has_side_changed: true,
            setter: SideSetter::default(),
            props,
            config,
            side,
            spring_props,
            transitions,
            clock: now,
        }
    }

    /// Current props.
    #[must_use]
    pub fn props(&self) -> &ProfileCardProps<D> {
        &self.props
    }

    /// Card configuration.
    #[must_use]
    pub fn config(&self) -> &CardConfig {
        &self.config
    }

    /// The side currently requested, before debouncing.
    #[must_use]
    pub fn side(&self) -> &SideId {
        &self.side
    }

    /// The side the transitions are driven to.
    #[must_use]
    pub fn debounced_side(&self) -> &SideId {
        self.debounced_side.value()
    }

    /// Whether the first side has been observed; later changes animate.
    #[must_use]
    pub fn has_side_changed(&self) -> bool {
        self.has_side_changed
    }

    /// Transition parameters in effect for the current side.
    #[must_use]
    pub fn spring_props(&self) -> &SpringProps {
        &self.spring_props
    }

    /// The transition engine.
    #[must_use]
    pub fn transitions(&self) -> &Transitions {
        &self.transitions
    }

    /// Context value handed to side renderers.
    #[must_use]
    pub fn context(&self) -> ProfileCardContext {
        ProfileCardContext::new(self.side.clone(), self.setter.clone())
    }

    /// Check if edit mode is on.
    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.edit.is_editing()
    }

    /// The mounted edit dialog, if any.
    #[must_use]
    pub fn dialog(&self) -> Option<MountedDialog<'_, D>> {
        self.edit.mounted()
    }

    /// Check if a transition is in flight.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.transitions.is_animating()
    }

    /// When the host should call [`advance`](Self::advance) next, if at all.
    #[must_use]
    pub fn next_wakeup(&self) -> Option<Instant> {
        let frame = self
            .transitions
            .is_animating()
            .then(|| self.clock + FRAME_INTERVAL);
        match (self.debounced_side.deadline(), frame) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (deadline, frame) => deadline.or(frame),
        }
    }

    /// Replace the props, as a re-render with new inputs would.
    pub fn update_props(&mut self, props: ProfileCardProps<D>, now: Instant) {
        self.transitions.set_unique(props.is_transition_unique);
        self.edit.set_descriptor(props.edit_dialog.clone());

        let forced = props.side.clone();
        self.props = props;
        self.spring_props = resolve_spring_props(&self.props, &self.config, &self.side);

        if forced != self.received_side {
            self.received_side.clone_from(&forced);
            if let Some(side) = forced {
                tracing::debug!("Side {side} forced by props");
                self.set_side(side, now);
            }
        }
    }

    /// Feed an input event at `now`.
    pub fn handle_event(&mut self, event: &CardEvent, now: Instant) -> EventOutcome {
        self.apply_context_request(now);
        match event {
            CardEvent::PointerEnter => {
                self.set_side(self.config.back_side.clone(), now);
                EventOutcome::HANDLED
            }
            CardEvent::PointerLeave => {
                self.set_side(self.config.front_side.clone(), now);
                EventOutcome::HANDLED
            }
            CardEvent::Click { target }
                if target == EDIT_TRIGGER_ID && self.props.is_editing_profile =>
            {
                self.edit.open();
                EventOutcome::CONSUMED
            }
            CardEvent::Click { .. } => EventOutcome::IGNORED,
        }
    }

    /// Move the clock to `now`: commit debounced sides and step animations.
    pub fn advance(&mut self, now: Instant) {
        self.apply_context_request(now);
        let now = now.max(self.clock);

        if let Some(deadline) = self.debounced_side.deadline().filter(|d| *d <= now) {
            let deadline = deadline.max(self.clock);
            self.transitions.advance(deadline - self.clock);
            self.clock = deadline;
            if let Some(side) = self.debounced_side.poll(deadline).cloned() {
                tracing::debug!("Debounced side committed: {side}");
                let immediate = !self.has_side_changed;
                self.transitions.update(&side, &self.spring_props, immediate);
            }
        }

        self.transitions.advance(now - self.clock);
        self.clock = now;
    }

    /// Leave edit mode without submitting.
    pub fn close_dialog(&self) {
        self.edit.close();
    }

    /// Render the current frame.
    #[must_use]
    pub fn render(&self) -> View {
        let context = self.context();
        let side_props = SideProps {
            data: &self.props.data,
            variant: &self.props.variant,
            context: &context,
        };

        let mut surface = Vec::with_capacity(self.transitions.items().len() + 1);
        if self.props.is_editing_profile {
            surface.push(View::Tooltip {
                title: self.config.edit_tooltip.clone(),
                child: Box::new(View::Button {
                    id: EDIT_TRIGGER_ID.to_string(),
                    icon: Some("edit".to_string()),
                    label: None,
                }),
            });
        }
        surface.extend(self.transitions.items().iter().map(|item| View::Animated {
            key: item.key().to_string(),
            instance: item.instance(),
            style: item.style(),
            child: Box::new(self.props.sides.render(item.side(), &side_props)),
        }));

        let mut root = Vec::with_capacity(2);
        if let Some(dialog) = self.edit.mounted() {
            root.push(View::Dialog {
                instance: dialog.instance(),
                content: Box::new(dialog.render(&self.props.data)),
            });
        }
        root.push(View::Surface {
            elevation: self.config.elevation,
            variant: self.props.variant.clone(),
            children: surface,
        });
        View::Fragment { children: root }
    }

    fn set_side(&mut self, side: SideId, now: Instant) {
        if side == self.side {
            return;
        }
        tracing::debug!("Side {} -> {side}", self.side);
        self.side = side;
        self.spring_props = resolve_spring_props(&self.props, &self.config, &self.side);
        self.debounced_side.set(self.side.clone(), now);
    }

    fn apply_context_request(&mut self, now: Instant) {
        if let Some(side) = self.setter.take() {
            self.set_side(side, now);
        }
    }
}

impl<D> std::fmt::Debug for ProfileCard<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileCard")
            .field("side", &self.side)
            .field("debounced_side", &self.debounced_side.value())
            .field("has_side_changed", &self.has_side_changed)
            .field("transitions", &self.transitions.items().len())
            .field("edit", &self.edit)
            .finish_non_exhaustive()
    }
}

fn resolve_spring_props<D>(
    props: &ProfileCardProps<D>,
    config: &CardConfig,
    side: &SideId,
) -> SpringProps {
    props
        .custom_transitions_spring_props
        .as_ref()
        .map_or_else(|| config.default_transition.clone(), |custom| custom.resolve(side))
}
