//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the router core and the outside world. Adapters implement these ports.
//!
//! - `AccountClient` - the remote account service
//! - `SessionStore` - persistence for the signed-in session

mod account_client;
mod session_store;

pub use account_client::{AccountClient, AccountError, Credentials, ListUsersQuery, LoginGrant};
pub use session_store::SessionStore;
