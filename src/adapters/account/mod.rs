//! Account service adapters.
//!
//! Implementations of the `AccountClient` port:
//!
//! - `http` - Production JSON/HTTP client built on reqwest
//! - `mock` - In-memory service for tests

mod http;
mod mock;

pub use http::{HttpAccountConfig, HttpClientError, ReqwestAccountClient};
pub use mock::{MockAccountClient, MockOperation};
