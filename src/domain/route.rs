//! Client-side routes and their access classification.
//!
//! The route set is closed: every location fragment either names one of the
//! four routes below or falls back to [`Route::Login`].

use std::fmt;

/// A user-facing route, addressed by a location fragment such as `#scores`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Route {
    #[default]
    Login,
    Register,
    Profile,
    Scores,
}

/// Whether a route can be reached without a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClassification {
    Public,
    Protected,
}

impl Route {
    /// Every route, in menu order.
    pub const ALL: [Route; 4] = [Route::Login, Route::Register, Route::Profile, Route::Scores];

    /// Parses a location fragment, with or without the leading `#`.
    ///
    /// Returns `None` for anything outside the closed route set.
    pub fn from_fragment(fragment: &str) -> Option<Self> {
        match fragment.strip_prefix('#').unwrap_or(fragment) {
            "login" => Some(Route::Login),
            "register" => Some(Route::Register),
            "profile" => Some(Route::Profile),
            "scores" => Some(Route::Scores),
            _ => None,
        }
    }

    /// The fragment name, without the leading `#`.
    pub fn as_fragment(&self) -> &'static str {
        match self {
            Route::Login => "login",
            Route::Register => "register",
            Route::Profile => "profile",
            Route::Scores => "scores",
        }
    }

    pub fn classification(&self) -> RouteClassification {
        match self {
            Route::Profile | Route::Scores => RouteClassification::Protected,
            Route::Login | Route::Register => RouteClassification::Public,
        }
    }

    pub fn is_protected(&self) -> bool {
        self.classification() == RouteClassification::Protected
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_fragment())
    }
}
