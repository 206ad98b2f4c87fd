//! View lifecycle - one container, one live view, generation-gated updates.
//!
//! Every mount replaces the container's region and bumps a generation
//! counter. Views only touch the region through a [`ViewHandle`] that
//! captured the generation at mount time; once a newer view is mounted the
//! handle goes stale and every update through it becomes a silent no-op.
//! This is logical cancellation: in-flight requests still complete, but
//! their effects are dropped.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::Route;

/// Monotonic mount counter.
pub type Generation = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Info,
    Success,
    Error,
}

/// Status line shown under a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub kind: FlashKind,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileCard {
    pub username: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRow {
    pub rank: usize,
    pub username: String,
    pub score: f64,
}

/// View-specific content of the region.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Panel {
    #[default]
    Blank,
    LoginForm,
    RegisterForm,
    Profile {
        card: Option<ProfileCard>,
    },
    Scoreboard {
        limit: u32,
        rows: Vec<ScoreRow>,
    },
}

/// Rendered state of the mounted view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Region {
    pub heading: String,
    pub panel: Panel,
    pub message: Option<Flash>,
    /// The view's submit control is disabled while a request is in flight.
    pub busy: bool,
}

impl Region {
    pub fn flash(&mut self, kind: FlashKind, text: impl Into<String>) {
        self.message = Some(Flash {
            kind,
            text: text.into(),
        });
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }
}

#[derive(Debug, Default)]
struct ContainerState {
    generation: Generation,
    route: Option<Route>,
    region: Region,
}

/// The single mount point for views.
#[derive(Debug, Clone, Default)]
pub struct ViewContainer {
    inner: Arc<Mutex<ContainerState>>,
}

impl ViewContainer {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ContainerState> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Replaces whatever is mounted with a fresh region for `route`.
    ///
    /// The previous content is discarded and the generation bumped before
    /// `render` runs, so the previous view's handles are already stale by the
    /// time the new view draws.
    pub fn mount(&self, route: Route, render: impl FnOnce(&mut Region)) -> ViewHandle {
        let mut state = self.lock();
        state.generation += 1;
        state.route = Some(route);
        state.region = Region::default();
        render(&mut state.region);

        tracing::debug!(%route, generation = state.generation, "View mounted");

        ViewHandle {
            generation: state.generation,
            route,
            container: self.clone(),
        }
    }

    pub fn generation(&self) -> Generation {
        self.lock().generation
    }

    pub fn route(&self) -> Option<Route> {
        self.lock().route
    }

    /// Copy of the current region.
    pub fn snapshot(&self) -> Region {
        self.lock().region.clone()
    }

    /// Handle for the live view, if one is mounted.
    pub fn current_handle(&self) -> Option<ViewHandle> {
        let state = self.lock();
        state.route.map(|route| ViewHandle {
            generation: state.generation,
            route,
            container: self.clone(),
        })
    }
}

/// A view's capability to mutate the container, valid for one generation.
#[derive(Debug, Clone)]
pub struct ViewHandle {
    generation: Generation,
    route: Route,
    container: ViewContainer,
}

impl ViewHandle {
    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn route(&self) -> Route {
        self.route
    }

    /// True while no newer view has been mounted.
    pub fn is_live(&self) -> bool {
        self.container.generation() == self.generation
    }

    /// Applies `f` to the region if this handle is still live.
    ///
    /// Returns `None` without touching anything when the handle is stale.
    pub fn update<R>(&self, f: impl FnOnce(&mut Region) -> R) -> Option<R> {
        let mut state = self.container.lock();
        if state.generation != self.generation {
            tracing::trace!(
                route = %self.route,
                stale = self.generation,
                live = state.generation,
                "Dropping update from superseded view"
            );
            return None;
        }
        Some(f(&mut state.region))
    }

    /// Disables the submit control. Returns false if the handle is stale or
    /// a request is already in flight.
    pub fn try_begin_busy(&self) -> bool {
        self.update(|region| {
            if region.busy {
                false
            } else {
                region.busy = true;
                true
            }
        })
        .unwrap_or(false)
    }

    pub fn end_busy(&self) {
        self.update(|region| region.busy = false);
    }
}
