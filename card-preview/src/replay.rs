//! Drives a card through a script and samples frames.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use card_core::{CardConfig, EditDialog, ProfileCard, ProfileCardProps, SideId, Variant, View};
use serde::Serialize;
use serde_json::Value;

use crate::{profile_dialog, profile_sides, Script, ScriptAction};

/// Extra time sampled after the last step so transitions can finish.
const SETTLE_TAIL: Duration = Duration::from_millis(1500);
/// Hard stop for springs that never come to rest.
const MAX_OVERRUN: Duration = Duration::from_secs(10);

/// Options of the mounted card.
#[derive(Debug, Clone, Default)]
pub struct ReplayOptions {
    /// Side forced by the host.
    pub forced_side: Option<SideId>,
    /// Variant token.
    pub variant: Variant,
    /// Show the edit trigger.
    pub editable: bool,
}

/// One sampled frame.
#[derive(Debug, Clone, Serialize)]
pub struct Frame {
    /// Offset from the start of the replay.
    pub at_ms: u64,
    /// Side requested by hover, context or host.
    pub side: SideId,
    /// Side the transitions are driven to.
    pub debounced_side: SideId,
    /// Whether the edit dialog is open.
    pub editing: bool,
    /// Whether a transition is running.
    pub animating: bool,
    /// Rendered view tree.
    pub view: View,
}

/// A card under replay.
pub struct Replay {
    card: ProfileCard<Value>,
    options: ReplayOptions,
    dialog: Rc<EditDialog<Value>>,
    submitted: Rc<RefCell<Option<Value>>>,
    start: Instant,
}

impl Replay {
    /// Mount the sample sides over `data` at `start`.
    #[must_use]
    pub fn new(data: Value, options: ReplayOptions, config: CardConfig, start: Instant) -> Self {
        let submitted = Rc::new(RefCell::new(None));
        let dialog = Rc::new(profile_dialog(Rc::clone(&submitted)));
        let props = Self::props(&options, &dialog, data);
        Self {
            card: ProfileCard::mount(props, config, start),
            options,
            dialog,
            submitted,
            start,
        }
    }

    fn props(
        options: &ReplayOptions,
        dialog: &Rc<EditDialog<Value>>,
        data: Value,
    ) -> ProfileCardProps<Value> {
        let mut props = ProfileCardProps::new(data, profile_sides())
            .with_variant(options.variant.clone())
            .editing_profile(options.editable)
            .with_shared_edit_dialog(Rc::clone(dialog));
        props.side.clone_from(&options.forced_side);
        props
    }

    /// The card being replayed.
    #[must_use]
    pub fn card(&self) -> &ProfileCard<Value> {
        &self.card
    }

    /// Perform `action` at `now`.
    pub fn apply(&mut self, action: &ScriptAction, now: Instant) {
        if let Some(event) = action.as_event() {
            let outcome = self.card.handle_event(&event, now);
            tracing::debug!("{event:?} -> {outcome:?}");
            return;
        }

        match action {
            ScriptAction::Submit { args } => {
                let Some(dialog) = self.card.dialog() else {
                    tracing::warn!("Submit ignored: no dialog is open");
                    return;
                };
                if let (Some(schema), Some(first)) = (dialog.validation_schema(), args.first()) {
                    if let Err(e) = schema.validate(first) {
                        tracing::warn!("Submission rejected, dialog stays open: {e}");
                        return;
                    }
                }
                dialog.submit(args);
            }
            ScriptAction::Close => self.card.close_dialog(),
            ScriptAction::ForceSide { side } => {
                self.options.forced_side.clone_from(side);
                let data = self.card.props().data.clone();
                self.replace_data(data, now);
            }
            ScriptAction::PointerEnter
            | ScriptAction::PointerLeave
            | ScriptAction::Click { .. } => {}
        }
    }

    /// Move the clock to `now` and merge any accepted edit into the data.
    pub fn tick(&mut self, now: Instant) {
        self.card.advance(now);

        let Some(edit) = self.submitted.borrow_mut().take() else {
            return;
        };
        let mut data = self.card.props().data.clone();
        match (data.as_object_mut(), edit) {
            (Some(fields), Value::Object(changes)) => {
                tracing::info!("Applying edit to {} field(s)", changes.len());
                fields.extend(changes);
            }
            (_, other) => {
                tracing::warn!("Edit replaces the whole card data");
                self.replace_data(other, now);
                return;
            }
        }
        self.replace_data(data, now);
    }

    fn replace_data(&mut self, data: Value, now: Instant) {
        let props = Self::props(&self.options, &self.dialog, data);
        self.card.update_props(props, now);
    }

    /// Sample the current frame.
    #[must_use]
    pub fn frame(&self, now: Instant) -> Frame {
        let at = now.saturating_duration_since(self.start);
        Frame {
            at_ms: u64::try_from(at.as_millis()).unwrap_or(u64::MAX),
            side: self.card.side().clone(),
            debounced_side: self.card.debounced_side().clone(),
            editing: self.card.is_editing(),
            animating: self.card.is_animating(),
            view: self.card.render(),
        }
    }

    /// Replay `script` on a virtual clock, sampling every `interval`.
    ///
    /// Runs until the last step has passed, the debounce window and a
    /// settle tail have elapsed, and no transition is running.
    pub fn run_virtual(&mut self, script: &Script, interval: Duration) -> Vec<Frame> {
        let interval = interval.max(Duration::from_millis(1));
        let end = script.duration() + self.card.config().debounce() + SETTLE_TAIL;
        let mut steps = script.steps().iter().peekable();
        let mut frames = Vec::new();
        let mut offset = Duration::ZERO;

        loop {
            while let Some(step) = steps.next_if(|step| step.at() <= offset) {
                self.apply(&step.event, self.start + step.at());
            }
            let now = self.start + offset;
            self.tick(now);
            frames.push(self.frame(now));

            let done = offset >= end && !self.card.is_animating();
            if done || offset >= end + MAX_OVERRUN {
                break;
            }
            offset += interval;
        }

        tracing::info!(
            "Replayed {} step(s) into {} frame(s)",
            script.steps().len(),
            frames.len()
        );
        frames
    }

    /// Replay `script` on the wall clock, handing each frame to `emit`.
    pub async fn run_realtime(
        &mut self,
        script: &Script,
        interval: Duration,
        mut emit: impl FnMut(&Frame),
    ) {
        let interval = interval.max(Duration::from_millis(1));
        let end = script.duration() + self.card.config().debounce() + SETTLE_TAIL;
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut steps = script.steps().iter().peekable();

        loop {
            let now = ticker.tick().await.into_std();
            let offset = now.saturating_duration_since(self.start);
            while let Some(step) = steps.next_if(|step| step.at() <= offset) {
                self.apply(&step.event, now);
            }
            self.tick(now);
            emit(&self.frame(now));

            let done = offset >= end && !self.card.is_animating();
            if done || offset >= end + MAX_OVERRUN {
                break;
            }
        }
    }
}
