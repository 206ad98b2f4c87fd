//! Session and profile types exchanged with the account service.

mod profile;
mod session;

pub use profile::{Profile, ProfileData, ProfilePatch};
pub use session::Session;
