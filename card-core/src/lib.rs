//! # Card Core
//!
//! Headless logic for a flippable profile card.
//! The card owns no window and paints nothing: a host feeds it input
//! events and timestamps, and paints the [`View`] tree it renders.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 ProfileCard                 │
//! ├─────────────────────────────────────────────┤
//! │  Side Controller    │  Edit Overlay         │
//! │  - Hover / forced   │  - Trigger button     │
//! │  - Debounce         │  - Dialog mounting    │
//! │  - Context setter   │  - Close / submit     │
//! ├─────────────────────────────────────────────┤
//! │  Transitions        │  View Tree            │
//! │  - Keyed items      │  - Surface, tooltip   │
//! │  - Spring physics   │  - Animated sides     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use std::time::{Duration, Instant};
//! use card_core::{CardConfig, CardEvent, ProfileCard, ProfileCardProps, Sides, View};
//!
//! let sides = Sides::<u32>::new()
//!     .with("front", |props| View::text(format!("#{}", props.data)))
//!     .with("back", |_| View::text("details"));
//!
//! let start = Instant::now();
//! let props = ProfileCardProps::new(1_u32, sides);
//! let mut card = ProfileCard::mount(props, CardConfig::default(), start);
//! assert!(card.render().contains_text("#1"));
//!
//! card.handle_event(&CardEvent::PointerEnter, start);
//! card.advance(start + Duration::from_secs(2));
//! assert!(card.render().contains_text("details"));
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod card;
pub mod config;
pub mod context;
pub mod debounce;
pub mod edit;
pub mod error;
pub mod event;
pub mod schema;
pub mod side;
pub mod spring;
pub mod transition;
pub mod view;

pub use card::{ProfileCard, ProfileCardProps};
pub use config::CardConfig;
pub use context::{ProfileCardContext, SideSetter};
pub use debounce::Debounced;
pub use edit::{
    CloseHandle, DialogComponent, DialogInstanceId, DialogProps, EditDialog, EditHandle,
    EditOverlay, MountedDialog,
};
pub use error::{CardError, CardResult};
pub use event::{CardEvent, EventOutcome, EDIT_TRIGGER_ID};
pub use schema::{FieldError, FieldKind, FieldRule, ValidationSchema};
pub use side::{SideId, SideProps, SideRenderer, Sides, Variant};
pub use spring::{AnimatedStyle, SpringConfig, SpringProps, SpringValue, Style, TransitionProps};
pub use transition::{Phase, TransitionItem, Transitions};
pub use view::View;

/// Card core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
