//! Side state shared with the renderers nested inside a card.

use std::cell::RefCell;
use std::rc::Rc;

use crate::SideId;

/// Requests a side change from inside a render.
///
/// Renderers cannot borrow the card mutably, so a request is parked here
/// and applied by the card on its next `advance` or `handle_event`.
/// The last request before that call wins.
#[derive(Debug, Clone, Default)]
pub struct SideSetter {
    request: Rc<RefCell<Option<SideId>>>,
}

impl SideSetter {
    /// Ask the card to show `side`.
    pub fn set(&self, side: impl Into<SideId>) {
        let side = side.into();
        tracing::debug!("Side {side} requested through context");
        *self.request.borrow_mut() = Some(side);
    }

    /// Check if a request waits to be applied.
    #[must_use]
    pub fn has_request(&self) -> bool {
        self.request.borrow().is_some()
    }

    pub(crate) fn take(&self) -> Option<SideId> {
        self.request.borrow_mut().take()
    }
}

/// Context value handed to side renderers: `{ side, setSide }`.
#[derive(Debug, Clone)]
pub struct ProfileCardContext {
    side: SideId,
    setter: SideSetter,
}

impl ProfileCardContext {
    pub(crate) fn new(side: SideId, setter: SideSetter) -> Self {
        Self { side, setter }
    }

    /// A context bound to no card; requests go nowhere.
    ///
    /// Useful for rendering a side on its own, e.g. in previews.
    #[must_use]
    pub fn detached(side: SideId) -> Self {
        Self::new(side, SideSetter::default())
    }

    /// The side the card currently shows.
    #[must_use]
    pub fn side(&self) -> &SideId {
        &self.side
    }

    /// Request a side change.
    pub fn set_side(&self, side: impl Into<SideId>) {
        self.setter.set(side);
    }

    /// A handle that can outlive this context value.
    #[must_use]
    pub fn setter(&self) -> SideSetter {
        self.setter.clone()
    }
}
