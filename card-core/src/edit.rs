//! Edit overlay: gates a caller-supplied dialog over the card.
//!
//! The overlay owns a single `editing` flag. Dialog callbacks share that
//! flag, so a dialog can close itself from inside its own handlers
//! without borrowing the card.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::{CardResult, ValidationSchema, View};

/// Identity of one mounted dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DialogInstanceId(Uuid);

impl DialogInstanceId {
    /// Create a new unique instance ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DialogInstanceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DialogInstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Closes the dialog without submitting.
#[derive(Clone)]
pub struct CloseHandle {
    editing: Rc<Cell<bool>>,
}

impl CloseHandle {
    /// Leave edit mode. The caller's edit handler is not invoked.
    pub fn close(&self) {
        if self.editing.replace(false) {
            tracing::debug!("Edit dialog closed without submitting");
        }
    }
}

impl fmt::Debug for CloseHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloseHandle")
            .field("editing", &self.editing.get())
            .finish()
    }
}

/// Submits the dialog.
#[derive(Clone)]
pub struct EditHandle {
    editing: Rc<Cell<bool>>,
    on_edit: Rc<dyn Fn(&[Value])>,
}

impl EditHandle {
    /// Close the dialog, then forward `args` to the caller's edit handler.
    pub fn submit(&self, args: &[Value]) {
        self.editing.set(false);
        tracing::debug!("Edit dialog submitted with {} argument(s)", args.len());
        (self.on_edit)(args);
    }
}

impl fmt::Debug for EditHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditHandle")
            .field("editing", &self.editing.get())
            .finish_non_exhaustive()
    }
}

/// Everything an edit dialog receives.
#[derive(Debug)]
pub struct DialogProps<'a, D> {
    /// Card data to edit.
    pub data: &'a D,
    /// Schema the dialog should check submissions against.
    pub validation_schema: Option<&'a ValidationSchema>,
    /// Close without submitting.
    pub on_close: &'a CloseHandle,
    /// Submit.
    pub on_edit: &'a EditHandle,
}

impl<D> DialogProps<'_, D> {
    /// Check `submission` against the schema, if there is one.
    ///
    /// # Errors
    ///
    /// Returns the schema's validation error.
    pub fn validate(&self, submission: &Value) -> CardResult<()> {
        match self.validation_schema {
            Some(schema) => schema.validate(submission),
            None => Ok(()),
        }
    }
}

/// Renders an edit dialog.
pub trait DialogComponent<D> {
    /// Render the dialog content.
    fn render(&self, props: &DialogProps<'_, D>) -> View;
}

impl<D, F> DialogComponent<D> for F
where
    F: Fn(&DialogProps<'_, D>) -> View,
{
    fn render(&self, props: &DialogProps<'_, D>) -> View {
        self(props)
    }
}

/// Caller-supplied description of the edit dialog.
pub struct EditDialog<D> {
    component: Rc<dyn DialogComponent<D>>,
    validation_schema: Option<ValidationSchema>,
    on_edit: Rc<dyn Fn(&[Value])>,
}

impl<D> EditDialog<D> {
    /// Describe a dialog rendered by `component` that reports to `on_edit`.
    #[must_use]
    pub fn new<C, H>(component: C, on_edit: H) -> Self
    where
        C: Fn(&DialogProps<'_, D>) -> View + 'static,
        H: Fn(&[Value]) + 'static,
    {
        Self {
            component: Rc::new(component),
            validation_schema: None,
            on_edit: Rc::new(on_edit),
        }
    }

    /// Attach a validation schema.
    #[must_use]
    pub fn with_validation_schema(mut self, schema: ValidationSchema) -> Self {
        self.validation_schema = Some(schema);
        self
    }

    /// The attached validation schema.
    #[must_use]
    pub fn validation_schema(&self) -> Option<&ValidationSchema> {
        self.validation_schema.as_ref()
    }
}

impl<D> fmt::Debug for EditDialog<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditDialog")
            .field("validation_schema", &self.validation_schema)
            .finish_non_exhaustive()
    }
}

/// Callbacks bound to one descriptor.
struct Bound<D> {
    descriptor: Rc<EditDialog<D>>,
    on_close: CloseHandle,
    on_edit: EditHandle,
}

/// Controller deciding whether the edit dialog is mounted.
pub struct EditOverlay<D> {
    editing: Rc<Cell<bool>>,
    bound: Option<Bound<D>>,
    instance: Option<DialogInstanceId>,
}

impl<D> EditOverlay<D> {
    /// Create a closed overlay for `descriptor`.
    #[must_use]
    pub fn new(descriptor: Option<Rc<EditDialog<D>>>) -> Self {
        let mut overlay = Self {
            editing: Rc::new(Cell::new(false)),
            bound: None,
            instance: None,
        };
        overlay.set_descriptor(descriptor);
        overlay
    }

    /// Swap the descriptor. Callbacks are rebound only when it is a
    /// different descriptor than the current one.
    pub fn set_descriptor(&mut self, descriptor: Option<Rc<EditDialog<D>>>) {
        let unchanged = match (&self.bound, &descriptor) {
            (Some(bound), Some(next)) => Rc::ptr_eq(&bound.descriptor, next),
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            return;
        }

        tracing::debug!("Binding edit dialog descriptor");
        self.bound = descriptor.map(|descriptor| Bound {
            on_close: CloseHandle {
                editing: Rc::clone(&self.editing),
            },
            on_edit: EditHandle {
                editing: Rc::clone(&self.editing),
                on_edit: Rc::clone(&descriptor.on_edit),
            },
            descriptor,
        });
    }

    /// Enter edit mode. Keeps the current dialog if one is already open.
    pub fn open(&mut self) {
        if self.editing.get() && self.instance.is_some() {
            return;
        }
        let instance = DialogInstanceId::new();
        tracing::debug!("Opening edit dialog {instance}");
        self.instance = Some(instance);
        self.editing.set(true);
    }

    /// Leave edit mode without submitting.
    pub fn close(&self) {
        if let Some(bound) = &self.bound {
            bound.on_close.close();
        } else {
            self.editing.set(false);
        }
    }

    /// Check if edit mode is on.
    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.editing.get()
    }

    /// Check if a descriptor is bound.
    #[must_use]
    pub fn has_descriptor(&self) -> bool {
        self.bound.is_some()
    }

    /// The mounted dialog, if edit mode is on and a descriptor is bound.
    #[must_use]
    pub fn mounted(&self) -> Option<MountedDialog<'_, D>> {
        if !self.editing.get() {
            return None;
        }
        let bound = self.bound.as_ref()?;
        Some(MountedDialog {
            instance: self.instance?,
            descriptor: &bound.descriptor,
            on_close: &bound.on_close,
            on_edit: &bound.on_edit,
        })
    }
}

impl<D> fmt::Debug for EditOverlay<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditOverlay")
            .field("editing", &self.editing.get())
            .field("has_descriptor", &self.bound.is_some())
            .field("instance", &self.instance)
            .finish()
    }
}

/// A dialog currently mounted over the card.
pub struct MountedDialog<'a, D> {
    instance: DialogInstanceId,
    descriptor: &'a EditDialog<D>,
    on_close: &'a CloseHandle,
    on_edit: &'a EditHandle,
}

impl<D> MountedDialog<'_, D> {
    /// Identity of this mount.
    #[must_use]
    pub fn instance(&self) -> DialogInstanceId {
        self.instance
    }

    /// The close callback handed to the dialog.
    #[must_use]
    pub fn on_close(&self) -> CloseHandle {
        self.on_close.clone()
    }

    /// The submit callback handed to the dialog.
    #[must_use]
    pub fn on_edit(&self) -> EditHandle {
        self.on_edit.clone()
    }

    /// Schema the dialog checks submissions against.
    #[must_use]
    pub fn validation_schema(&self) -> Option<&ValidationSchema> {
        self.descriptor.validation_schema()
    }

    /// Close without submitting.
    pub fn close(&self) {
        self.on_close.close();
    }

    /// Submit, as the dialog would.
    pub fn submit(&self, args: &[Value]) {
        self.on_edit.submit(args);
    }

    /// Render the dialog for `data`.
    #[must_use]
    pub fn render(&self, data: &D) -> View {
        let props = DialogProps {
            data,
            validation_schema: self.descriptor.validation_schema(),
            on_close: self.on_close,
            on_edit: self.on_edit,
        };
        self.descriptor.component.render(&props)
    }
}

impl<D> fmt::Debug for MountedDialog<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MountedDialog")
            .field("instance", &self.instance)
            .finish_non_exhaustive()
    }
}
