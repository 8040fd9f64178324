//! View tree produced by a card render.
//!
//! Views are plain data: a host toolkit walks the tree and paints it,
//! and tests inspect it directly.

use serde::{Deserialize, Serialize};

use crate::{DialogInstanceId, Style, Variant};

/// A node of the rendered view tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum View {
    /// Renders nothing.
    Empty,

    /// A text label.
    Text {
        /// Text content.
        content: String,
    },

    /// A layout container for children.
    Group {
        /// Child views.
        children: Vec<View>,
    },

    /// Sibling views without a container of their own.
    Fragment {
        /// Child views.
        children: Vec<View>,
    },

    /// The elevated card surface. Hosts route pointer enter/leave here.
    Surface {
        /// Shadow elevation level.
        elevation: u8,
        /// Styling token.
        variant: Variant,
        /// Child views.
        children: Vec<View>,
    },

    /// Hint text shown while hovering the child.
    Tooltip {
        /// Tooltip text.
        title: String,
        /// Hovered view.
        child: Box<View>,
    },

    /// A clickable button. Hosts report clicks with its `id`.
    Button {
        /// Click target identifier.
        id: String,
        /// Optional icon name.
        #[serde(default)]
        icon: Option<String>,
        /// Optional text label.
        #[serde(default)]
        label: Option<String>,
    },

    /// One in-flight side of a transition, styled by the spring values.
    Animated {
        /// Transition key of the side.
        key: String,
        /// Instance number, distinct per transition item.
        instance: u64,
        /// Current animated style.
        style: Style,
        /// Side content.
        child: Box<View>,
    },

    /// A mounted edit dialog.
    Dialog {
        /// Identity of the mounted dialog.
        instance: DialogInstanceId,
        /// Dialog content.
        content: Box<View>,
    },
}

impl View {
    /// Create a text view.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
        }
    }

    /// Create a group view.
    #[must_use]
    pub fn group(children: Vec<View>) -> Self {
        Self::Group { children }
    }

    /// Check if this is the empty view.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Direct children of this view.
    #[must_use]
    pub fn children(&self) -> Vec<&View> {
        match self {
            Self::Group { children }
            | Self::Fragment { children }
            | Self::Surface { children, .. } => children.iter().collect(),
            Self::Tooltip { child, .. } | Self::Animated { child, .. } => vec![child.as_ref()],
            Self::Dialog { content, .. } => vec![content.as_ref()],
            Self::Empty | Self::Text { .. } | Self::Button { .. } => Vec::new(),
        }
    }

    /// Visit this view and all descendants, depth first.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a View)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }

    /// Collect every descendant (including self) matching `predicate`.
    #[must_use]
    pub fn find_all(&self, predicate: impl Fn(&View) -> bool) -> Vec<&View> {
        let mut found = Vec::new();
        self.walk(&mut |view| {
            if predicate(view) {
                found.push(view);
            }
        });
        found
    }

    /// Check whether any text node contains `needle`.
    #[must_use]
    pub fn contains_text(&self, needle: &str) -> bool {
        !self
            .find_all(|view| matches!(view, Self::Text { content } if content.contains(needle)))
            .is_empty()
    }

    /// Find a button by click target identifier.
    #[must_use]
    pub fn find_button(&self, id: &str) -> Option<&View> {
        self.find_all(|view| matches!(view, Self::Button { id: button, .. } if button == id))
            .into_iter()
            .next()
    }

    /// All animated side wrappers, in paint order.
    #[must_use]
    pub fn animated(&self) -> Vec<&View> {
        self.find_all(|view| matches!(view, Self::Animated { .. }))
    }

    /// All mounted dialogs.
    #[must_use]
    pub fn dialogs(&self) -> Vec<&View> {
        self.find_all(|view| matches!(view, Self::Dialog { .. }))
    }

    /// Serialize the view tree to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> crate::CardResult<String> {
        serde_json::to_string(self).map_err(crate::CardError::Serialization)
    }
}
