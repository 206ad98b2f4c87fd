//! Application layer - routing, view lifecycle and the views themselves.
//!
//! The controller owns the location and the single view container; views
//! reach the account service and session store only through a
//! [`views::ViewContext`] scoped to their mount generation.

pub mod controller;
pub mod lifecycle;
pub mod location;
pub mod registry;
pub mod views;

pub use controller::{MountedView, NavigationController, StartupCheck};
pub use lifecycle::{
    Flash, FlashKind, Generation, Panel, ProfileCard, Region, ScoreRow, ViewContainer, ViewHandle,
};
pub use location::{Location, NavigationCause, NavigationRequest};
pub use registry::ViewRegistry;
pub use views::{FormInput, View, ViewContext};
