//! View registry - maps routes to views and classifies them.
//!
//! Stateless after construction and shared freely across navigations.

use std::sync::Arc;

use super::views::{LoginView, ProfileView, RegisterView, ScoresView, View};
use crate::domain::Route;

/// One view per route.
#[derive(Clone)]
pub struct ViewRegistry {
    login: Arc<dyn View>,
    register: Arc<dyn View>,
    profile: Arc<dyn View>,
    scores: Arc<dyn View>,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self {
            login: Arc::new(LoginView),
            register: Arc::new(RegisterView),
            profile: Arc::new(ProfileView),
            scores: Arc::new(ScoresView),
        }
    }

    /// The view mounted for `route`.
    pub fn resolve(&self, route: Route) -> Arc<dyn View> {
        match route {
            Route::Login => self.login.clone(),
            Route::Register => self.register.clone(),
            Route::Profile => self.profile.clone(),
            Route::Scores => self.scores.clone(),
        }
    }

    /// Route for a location fragment. Unknown fragments fall back to the
    /// default route instead of failing.
    pub fn route_for(&self, fragment: &str) -> Route {
        Route::from_fragment(fragment).unwrap_or_default()
    }

    pub fn is_protected(&self, route: Route) -> bool {
        route.is_protected()
    }
}

impl Default for ViewRegistry {
    fn default() -> Self {
        Self::new()
    }
}
