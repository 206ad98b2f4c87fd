//! Score Portal - client for a user-account and score service.
//!
//! A session-aware router mounts one of four views (login, register,
//! profile, scoreboard) into a single container, keeping the session token
//! in a persistent store and dropping the effects of superseded views.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod logging;
pub mod ports;
