//! The client's location fragment and the navigation events it emits.
//!
//! The location is a value owned by the router. Changing it to a different
//! fragment queues one [`NavigationRequest`]; assigning the value it already
//! holds queues nothing, so redirects can never loop on themselves.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::Route;

/// What triggered a navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationCause {
    Startup,
    FragmentChanged,
    Redirect,
    Logout,
}

/// A pending intent to render whatever the location now points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationRequest {
    /// Fragment at the time the request was raised.
    pub fragment: Option<String>,
    pub cause: NavigationCause,
}

impl NavigationRequest {
    pub fn new(fragment: Option<String>, cause: NavigationCause) -> Self {
        Self { fragment, cause }
    }
}

#[derive(Debug, Default)]
struct LocationState {
    fragment: Option<String>,
    pending: VecDeque<NavigationRequest>,
}

/// Shared handle to the location fragment.
#[derive(Debug, Clone, Default)]
pub struct Location {
    inner: Arc<Mutex<LocationState>>,
}

/// Strips `#` and surrounding whitespace; an empty fragment is no fragment.
fn normalize(fragment: &str) -> Option<String> {
    let trimmed = fragment.trim();
    let name = trimmed.strip_prefix('#').unwrap_or(trimmed);
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

impl Location {
    /// Creates a location, e.g. from the fragment the client was opened with.
    pub fn new(initial: Option<&str>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(LocationState {
                fragment: initial.and_then(normalize),
                pending: VecDeque::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LocationState> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Current fragment, without the leading `#`.
    pub fn fragment(&self) -> Option<String> {
        self.lock().fragment.clone()
    }

    /// Sets the fragment. Queues a navigation request only if it changed.
    pub fn assign(&self, fragment: &str, cause: NavigationCause) -> bool {
        let next = normalize(fragment);
        let mut state = self.lock();
        if state.fragment == next {
            return false;
        }

        tracing::debug!(from = ?state.fragment, to = ?next, ?cause, "Location changed");
        state.fragment = next.clone();
        state.pending.push_back(NavigationRequest::new(next, cause));
        true
    }

    /// Points the location at `route`, queueing a request if it changed.
    pub fn go(&self, route: Route, cause: NavigationCause) -> bool {
        self.assign(route.as_fragment(), cause)
    }

    /// Rewrites the fragment without emitting a navigation request.
    ///
    /// Used by the render cycle when it has already decided what to mount.
    pub(crate) fn replace(&self, route: Route) -> bool {
        let next = Some(route.as_fragment().to_string());
        let mut state = self.lock();
        if state.fragment == next {
            return false;
        }
        state.fragment = next;
        true
    }

    pub(crate) fn take_pending(&self) -> Option<NavigationRequest> {
        self.lock().pending.pop_front()
    }

    pub(crate) fn discard_pending(&self) -> usize {
        let mut state = self.lock();
        let dropped = state.pending.len();
        state.pending.clear();
        dropped
    }

    /// Number of navigation requests waiting to be rendered.
    pub fn pending_len(&self) -> usize {
        self.lock().pending.len()
    }
}
