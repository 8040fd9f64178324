//! Card sides - identifiers, variants and the renderers behind them.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::{ProfileCardContext, View};

/// Identifier of one face of the card.
///
/// Keys are caller-defined; `front` and `back` are only a convention.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SideId(String);

impl SideId {
    /// Create a side identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The conventional resting side.
    #[must_use]
    pub fn front() -> Self {
        Self::new("front")
    }

    /// The conventional hovered side.
    #[must_use]
    pub fn back() -> Self {
        Self::new("back")
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key under which the transition engine tracks this side.
    #[must_use]
    pub fn transition_key(&self) -> String {
        format!("card_side_{}", self.0)
    }
}

impl fmt::Display for SideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SideId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for SideId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Styling token forwarded to side renderers and the card surface.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Variant(String);

impl Variant {
    /// Create a variant token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Borrow the raw token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Variant {
    fn default() -> Self {
        Self::new("default")
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Variant {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

/// Everything a side renderer receives.
#[derive(Debug)]
pub struct SideProps<'a, D> {
    /// Card data, passed through untouched.
    pub data: &'a D,
    /// Variant token of the card.
    pub variant: &'a Variant,
    /// Shared side state; lets nested content read or flip the side.
    pub context: &'a ProfileCardContext,
}

/// Produces the content of one side.
pub trait SideRenderer<D> {
    /// Render the side content.
    fn render(&self, props: &SideProps<'_, D>) -> View;
}

impl<D, F> SideRenderer<D> for F
where
    F: Fn(&SideProps<'_, D>) -> View,
{
    fn render(&self, props: &SideProps<'_, D>) -> View {
        self(props)
    }
}

/// Mapping from side identifier to renderer.
pub struct Sides<D> {
    renderers: BTreeMap<SideId, Rc<dyn SideRenderer<D>>>,
}

impl<D> Sides<D> {
    /// Create an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self {
            renderers: BTreeMap::new(),
        }
    }

    /// Add a closure renderer for `side`.
    #[must_use]
    pub fn with<F>(mut self, side: impl Into<SideId>, renderer: F) -> Self
    where
        F: Fn(&SideProps<'_, D>) -> View + 'static,
    {
        self.insert(side, Rc::new(renderer));
        self
    }

    /// Insert or replace the renderer for `side`.
    pub fn insert(&mut self, side: impl Into<SideId>, renderer: Rc<dyn SideRenderer<D>>) {
        self.renderers.insert(side.into(), renderer);
    }

    /// Look up the renderer for `side`.
    #[must_use]
    pub fn get(&self, side: &SideId) -> Option<&Rc<dyn SideRenderer<D>>> {
        self.renderers.get(side)
    }

    /// Whether a renderer exists for `side`.
    #[must_use]
    pub fn contains(&self, side: &SideId) -> bool {
        self.renderers.contains_key(side)
    }

    /// Known side identifiers, in order.
    pub fn ids(&self) -> impl Iterator<Item = &SideId> {
        self.renderers.keys()
    }

    /// Number of registered sides.
    #[must_use]
    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    /// Check if no side is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }

    /// Render `side`, or nothing when it has no renderer.
    #[must_use]
    pub fn render(&self, side: &SideId, props: &SideProps<'_, D>) -> View {
        match self.renderers.get(side) {
            Some(renderer) => renderer.render(props),
            None => {
                tracing::trace!("No renderer for side {side}, rendering empty");
                View::Empty
            }
        }
    }
}

impl<D> Default for Sides<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> Clone for Sides<D> {
    fn clone(&self) -> Self {
        Self {
            renderers: self.renderers.clone(),
        }
    }
}

impl<D> fmt::Debug for Sides<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sides")
            .field("ids", &self.renderers.keys().collect::<Vec<_>>())
            .finish()
    }
}
