//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the application to external systems:
//! - `account` - Account service clients (HTTP, mock)
//! - `storage` - Session stores (file, in-memory)
//! - `terminal` - Command parsing and screen rendering for the binary

pub mod account;
pub mod storage;
pub mod terminal;

pub use account::{MockAccountClient, MockOperation, ReqwestAccountClient};
pub use storage::{FileSessionStore, InMemorySessionStore};
