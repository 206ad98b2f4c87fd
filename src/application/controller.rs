//! Navigation controller - the session-aware router.
//!
//! Decides which view may be shown for the current location and session,
//! mounts it, and drains the navigation requests that views raise
//! (login success, forced sign-out). Session presence is read from the
//! store on every decision and never cached.
//!
//! # Startup
//!
//! [`NavigationController::start`] validates a stored session against the
//! account service *before* the first render. An `Unauthorized` answer
//! clears the session and starts at login whatever fragment was requested,
//! so a stale token never shows a protected view even briefly. Any other
//! failure keeps the session.

use std::sync::Arc;

use super::lifecycle::{Generation, Region, ViewContainer, ViewHandle};
use super::location::{Location, NavigationCause, NavigationRequest};
use super::registry::ViewRegistry;
use super::views::{FormInput, ViewContext};
use crate::domain::Route;
use crate::ports::{AccountClient, SessionStore};

/// Maximum navigation requests rendered in one pass.
const MAX_REDIRECT_DEPTH: usize = 5;

/// The view a render produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MountedView {
    pub route: Route,
    pub generation: Generation,
}

/// Outcome of the startup session check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupCheck {
    NoSession,
    Verified,
    /// The service rejected the token; the session was cleared.
    Rejected,
    /// The check failed for another reason; the session was kept.
    Unverified,
}

/// Session-aware router over a single view container.
pub struct NavigationController {
    registry: ViewRegistry,
    container: ViewContainer,
    location: Location,
    sessions: Arc<dyn SessionStore>,
    account: Arc<dyn AccountClient>,
}

impl NavigationController {
    pub fn new(
        account: Arc<dyn AccountClient>,
        sessions: Arc<dyn SessionStore>,
        location: Location,
    ) -> Self {
        Self {
            registry: ViewRegistry::new(),
            container: ViewContainer::new(),
            location,
            sessions,
            account,
        }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn container(&self) -> &ViewContainer {
        &self.container
    }

    /// The currently mounted view.
    pub fn current(&self) -> Option<MountedView> {
        self.container.current_handle().map(|handle| MountedView {
            route: handle.route(),
            generation: handle.generation(),
        })
    }

    /// Snapshot of the mounted view's region.
    pub fn region(&self) -> Region {
        self.container.snapshot()
    }

    /// Application start: verify any stored session, then render.
    pub async fn start(&self) -> MountedView {
        let check = self.verify_session().await;
        tracing::debug!(?check, "Startup session check finished");
        if check == StartupCheck::Rejected {
            self.location.replace(Route::Login);
        }

        let request = NavigationRequest::new(self.location.fragment(), NavigationCause::Startup);
        let mounted = self.render(request).await;
        self.process_pending().await.unwrap_or(mounted)
    }

    /// Checks a stored session against the account service.
    pub async fn verify_session(&self) -> StartupCheck {
        let Some(session) = self.sessions.get() else {
            return StartupCheck::NoSession;
        };

        match self
            .account
            .get_profile(&session.username, &session.token)
            .await
        {
            Ok(_) => StartupCheck::Verified,
            Err(error) if error.is_unauthorized() => {
                tracing::info!(username = %session.username, "Stored session rejected, signing out");
                self.sessions.clear();
                StartupCheck::Rejected
            }
            Err(error) => {
                tracing::warn!(%error, "Could not verify stored session, keeping it");
                StartupCheck::Unverified
            }
        }
    }

    /// The user changed the location fragment.
    ///
    /// Returns `None` when the fragment was already current, since no
    /// navigation event happens in that case.
    pub async fn navigate(&self, fragment: &str) -> Option<MountedView> {
        if !self
            .location
            .assign(fragment, NavigationCause::FragmentChanged)
        {
            tracing::debug!(fragment, "Location unchanged, nothing to render");
            return None;
        }
        self.process_pending().await
    }

    /// Clears the session and shows the login view, whatever the prior state.
    pub async fn logout(&self) -> MountedView {
        self.sessions.clear();
        tracing::info!("Signed out");

        self.location.go(Route::Login, NavigationCause::Logout);
        match self.process_pending().await.or_else(|| self.current()) {
            Some(mounted) if mounted.route == Route::Login => mounted,
            _ => {
                let request =
                    NavigationRequest::new(self.location.fragment(), NavigationCause::Logout);
                self.render(request).await
            }
        }
    }

    /// Delivers a form submission to the mounted view.
    pub async fn submit(&self, form: FormInput) -> Option<MountedView> {
        let Some(handle) = self.container.current_handle() else {
            tracing::debug!("Form submitted before any view was mounted");
            return None;
        };

        let view = self.registry.resolve(handle.route());
        let ctx = self.context(handle);
        view.on_submit(&ctx, form).await;

        self.process_pending().await
    }

    /// Renders queued navigation requests until the queue is empty.
    ///
    /// Returns the last view mounted, or `None` if nothing was queued.
    pub async fn process_pending(&self) -> Option<MountedView> {
        let mut last = None;
        for _ in 0..MAX_REDIRECT_DEPTH {
            let Some(request) = self.location.take_pending() else {
                return last;
            };
            last = Some(self.render(request).await);
        }

        let dropped = self.location.discard_pending();
        if dropped > 0 {
            tracing::warn!(dropped, "Too many chained redirects, dropping the rest");
        }
        last
    }

    /// Picks the route to mount for the current location and session.
    fn decide(&self) -> Route {
        let has_session = self.sessions.has_session();
        let requested = match self.location.fragment() {
            Some(fragment) => self.registry.route_for(&fragment),
            None if has_session => Route::Profile,
            None => Route::Login,
        };

        if self.registry.is_protected(requested) && !has_session {
            tracing::info!(%requested, "Protected route without a session, redirecting to login");
            self.location.replace(Route::Login);
            return Route::Login;
        }
        requested
    }

    async fn render(&self, request: NavigationRequest) -> MountedView {
        let route = self.decide();
        tracing::debug!(?request, %route, "Rendering");

        let view = self.registry.resolve(route);
        let handle = self.container.mount(route, |region| view.render(region));
        let mounted = MountedView {
            route,
            generation: handle.generation(),
        };

        let ctx = self.context(handle);
        view.on_mounted(&ctx).await;
        mounted
    }

    fn context(&self, handle: ViewHandle) -> ViewContext {
        ViewContext::new(
            handle,
            self.account.clone(),
            self.sessions.clone(),
            self.location.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::account::{MockAccountClient, MockOperation};
    use crate::adapters::storage::InMemorySessionStore;
    use crate::domain::foundation::SessionToken;
    use crate::domain::Session;
    use crate::ports::AccountError;
    use proptest::prelude::*;

    fn signed_in_store() -> Arc<InMemorySessionStore> {
        Arc::new(InMemorySessionStore::with_session(Session::new(
            SessionToken::new("T1").unwrap(),
            "bob_01",
        )))
    }

    fn controller(
        client: MockAccountClient,
        sessions: Arc<InMemorySessionStore>,
        fragment: Option<&str>,
    ) -> (NavigationController, Arc<MockAccountClient>) {
        let client = Arc::new(client);
        let controller =
            NavigationController::new(client.clone(), sessions, Location::new(fragment));
        (controller, client)
    }

    #[tokio::test]
    async fn empty_fragment_defaults_by_session() {
        let (anonymous, _) = controller(
            MockAccountClient::new(),
            Arc::new(InMemorySessionStore::new()),
            None,
        );
        assert_eq!(anonymous.start().await.route, Route::Login);

        let (signed_in, _) = controller(
            MockAccountClient::new()
                .with_user("bob_01", "pass", 0)
                .with_token("T1", "bob_01"),
            signed_in_store(),
            None,
        );
        assert_eq!(signed_in.start().await.route, Route::Profile);
    }

    #[tokio::test]
    async fn guard_redirect_rewrites_location_without_extra_render() {
        let (controller, _) = controller(
            MockAccountClient::new(),
            Arc::new(InMemorySessionStore::new()),
            Some("#profile"),
        );

        let mounted = controller.start().await;

        assert_eq!(mounted.route, Route::Login);
        assert_eq!(mounted.generation, 1);
        assert_eq!(controller.location().fragment(), Some("login".into()));
        assert_eq!(controller.location().pending_len(), 0);
    }

    #[tokio::test]
    async fn unknown_fragment_mounts_login() {
        let (controller, _) = controller(
            MockAccountClient::new()
                .with_user("bob_01", "pass", 0)
                .with_token("T1", "bob_01"),
            signed_in_store(),
            Some("#nowhere"),
        );

        assert_eq!(controller.start().await.route, Route::Login);
    }

    #[tokio::test]
    async fn navigate_to_current_fragment_is_a_no_op() {
        let (controller, _) = controller(
            MockAccountClient::new(),
            Arc::new(InMemorySessionStore::new()),
            Some("#login"),
        );
        let first = controller.start().await;

        assert_eq!(controller.navigate("#login").await, None);
        assert_eq!(controller.current(), Some(first));
    }

    #[tokio::test]
    async fn verify_session_without_session_makes_no_request() {
        let (controller, client) = controller(
            MockAccountClient::new(),
            Arc::new(InMemorySessionStore::new()),
            None,
        );

        assert_eq!(controller.verify_session().await, StartupCheck::NoSession);
        assert_eq!(client.total_calls(), 0);
    }

    #[tokio::test]
    async fn verify_session_distinguishes_rejection_from_outage() {
        let sessions = signed_in_store();
        let (controller, client) = controller(
            MockAccountClient::new()
                .with_user("bob_01", "pass", 0)
                .with_token("T1", "bob_01")
                .with_error(MockOperation::GetProfile, AccountError::network("timeout")),
            sessions.clone(),
            None,
        );

        assert_eq!(controller.verify_session().await, StartupCheck::Unverified);
        assert!(sessions.has_session());

        client.clear_error(MockOperation::GetProfile);
        assert_eq!(controller.verify_session().await, StartupCheck::Verified);

        client.revoke_token("T1");
        assert_eq!(controller.verify_session().await, StartupCheck::Rejected);
        assert!(!sessions.has_session());
    }

    #[tokio::test]
    async fn logout_from_login_keeps_single_login_view() {
        let (controller, _) = controller(
            MockAccountClient::new(),
            Arc::new(InMemorySessionStore::new()),
            Some("#login"),
        );
        let before = controller.start().await;

        let after = controller.logout().await;

        assert_eq!(after, before);
    }

    #[tokio::test]
    async fn logout_before_start_mounts_login() {
        let (controller, _) = controller(
            MockAccountClient::new(),
            signed_in_store(),
            Some("#login"),
        );

        let mounted = controller.logout().await;

        assert_eq!(mounted.route, Route::Login);
        assert_eq!(controller.current(), Some(mounted));
    }

    #[tokio::test]
    async fn submit_without_view_does_nothing() {
        let (controller, client) = controller(
            MockAccountClient::new(),
            Arc::new(InMemorySessionStore::new()),
            None,
        );

        assert_eq!(controller.submit(FormInput::login("bob_01", "pass")).await, None);
        assert_eq!(client.total_calls(), 0);
    }

    #[tokio::test]
    async fn redirect_chain_is_bounded() {
        let (controller, _) = controller(
            MockAccountClient::new(),
            Arc::new(InMemorySessionStore::new()),
            None,
        );
        for (i, fragment) in ["login", "register"].iter().cycle().take(8).enumerate() {
            let cause = if i == 0 {
                NavigationCause::FragmentChanged
            } else {
                NavigationCause::Redirect
            };
            controller.location().assign(fragment, cause);
        }

        let mounted = controller.process_pending().await;

        assert_eq!(mounted.map(|m| m.generation), Some(MAX_REDIRECT_DEPTH as u64));
        assert_eq!(controller.location().pending_len(), 0);
    }

    proptest! {
        #[test]
        fn protected_routes_never_mount_without_session(
            route in prop::sample::select(vec![Route::Profile, Route::Scores]),
            with_hash in any::<bool>(),
        ) {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            let fragment = if with_hash {
                format!("#{}", route.as_fragment())
            } else {
                route.as_fragment().to_string()
            };

            let mounted = runtime.block_on(async {
                let (controller, client) = controller(
                    MockAccountClient::new(),
                    Arc::new(InMemorySessionStore::new()),
                    None,
                );
                controller.start().await;
                let mounted = controller.navigate(&fragment).await;
                (mounted, client.total_calls())
            });

            prop_assert_eq!(mounted.0.map(|m| m.route), Some(Route::Login));
            prop_assert_eq!(mounted.1, 0);
        }
    }
}
