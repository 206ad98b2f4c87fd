//! Domain layer - routes, sessions, profiles and input validation.
//!
//! Pure types with no I/O. The application layer combines them with the
//! ports to drive navigation.

pub mod account;
pub mod foundation;
pub mod route;
pub mod validation;

pub use account::{Profile, ProfileData, ProfilePatch, Session};
pub use route::{Route, RouteClassification};
