//! Views - the four screens the router can mount.
//!
//! Each view renders its skeleton synchronously on mount, then performs any
//! data fetch in [`View::on_mounted`]. Form submissions arrive through
//! [`View::on_submit`]. All asynchronous work goes through a
//! [`ViewContext`], whose handle drops effects once the view is superseded.
//!
//! Failure protocol shared by every view:
//! - validation runs before any request and only renders a local message;
//! - the submit control is busy for the duration of a request, so a second
//!   submission is ignored;
//! - failures render the server message, else a generic one;
//! - `Unauthorized` also clears the session and redirects to login.

mod login;
mod profile;
mod register;
mod scores;

pub use login::LoginView;
pub use profile::ProfileView;
pub use register::RegisterView;
pub use scores::ScoresView;

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use super::lifecycle::{FlashKind, Region, ViewHandle};
use super::location::{Location, NavigationCause};
use crate::domain::foundation::Password;
use crate::domain::{Route, Session};
use crate::ports::{AccountClient, AccountError, SessionStore};

/// A form submitted by the user.
#[derive(Debug, Clone)]
pub enum FormInput {
    Login { username: String, password: Password },
    Register { username: String, password: Password },
    Score { value: String },
    Scoreboard { limit: Option<String> },
}

impl FormInput {
    pub fn login(username: impl Into<String>, password: impl Into<String>) -> Self {
        FormInput::Login {
            username: username.into(),
            password: Password::new(password),
        }
    }

    pub fn register(username: impl Into<String>, password: impl Into<String>) -> Self {
        FormInput::Register {
            username: username.into(),
            password: Password::new(password),
        }
    }

    pub fn score(value: impl Into<String>) -> Self {
        FormInput::Score {
            value: value.into(),
        }
    }

    pub fn scoreboard(limit: Option<&str>) -> Self {
        FormInput::Scoreboard {
            limit: limit.map(str::to_string),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            FormInput::Login { .. } => "login",
            FormInput::Register { .. } => "register",
            FormInput::Score { .. } => "score",
            FormInput::Scoreboard { .. } => "scoreboard",
        }
    }
}

/// A mountable screen.
#[async_trait]
pub trait View: Send + Sync {
    fn route(&self) -> Route;

    /// Draws the initial content into a blank region.
    fn render(&self, region: &mut Region);

    /// Runs once after mounting, e.g. to fetch data.
    async fn on_mounted(&self, _ctx: &ViewContext) {}

    /// Handles a form submission addressed to this view.
    async fn on_submit(&self, ctx: &ViewContext, form: FormInput);
}

/// Everything a mounted view may touch, scoped to its generation.
#[derive(Clone)]
pub struct ViewContext {
    handle: ViewHandle,
    account: Arc<dyn AccountClient>,
    sessions: Arc<dyn SessionStore>,
    location: Location,
}

impl ViewContext {
    pub fn new(
        handle: ViewHandle,
        account: Arc<dyn AccountClient>,
        sessions: Arc<dyn SessionStore>,
        location: Location,
    ) -> Self {
        Self {
            handle,
            account,
            sessions,
            location,
        }
    }

    pub fn handle(&self) -> &ViewHandle {
        &self.handle
    }

    pub fn account(&self) -> &dyn AccountClient {
        self.account.as_ref()
    }

    /// Reads the session store. Never cache the result across an `.await`.
    pub fn session(&self) -> Option<Session> {
        self.sessions.get()
    }

    /// Sets the status line. No-op if the view is stale.
    pub fn show(&self, kind: FlashKind, text: impl Into<String>) {
        let text = text.into();
        self.handle.update(|region| region.flash(kind, text));
    }

    pub fn clear_message(&self) {
        self.handle.update(Region::clear_message);
    }

    /// Stores a new session and moves to the profile, if still live.
    pub fn sign_in(&self, session: Session) {
        if !self.handle.is_live() {
            tracing::debug!(route = %self.handle.route(), "Ignoring login from superseded view");
            return;
        }
        tracing::info!(username = %session.username, "Signed in");
        self.sessions.set(session);
        self.location.go(Route::Profile, NavigationCause::Redirect);
    }

    /// Returns the session, or signs out and redirects if there is none.
    pub fn require_session(&self) -> Option<Session> {
        let session = self.session();
        if session.is_none() {
            self.expire_session();
        }
        session
    }

    /// Reports a failed request per the shared failure protocol.
    ///
    /// `describe` turns the error into the user-visible text.
    pub fn report_failure(
        &self,
        error: &AccountError,
        describe: impl FnOnce(&AccountError) -> String,
    ) {
        let text = describe(error);
        if self
            .handle
            .update(|region| region.flash(FlashKind::Error, text))
            .is_none()
        {
            tracing::debug!(route = %self.handle.route(), %error, "Dropping failure from superseded view");
            return;
        }

        tracing::debug!(route = %self.handle.route(), %error, "Request failed");
        if error.is_unauthorized() {
            self.expire_session();
        }
    }

    fn expire_session(&self) {
        if !self.handle.is_live() {
            return;
        }
        tracing::info!(route = %self.handle.route(), "Session rejected, returning to login");
        self.sessions.clear();
        self.location.go(Route::Login, NavigationCause::Redirect);
    }

    /// Runs a request with the submit control disabled.
    ///
    /// Returns `None` without running the request if a submission is already
    /// in flight or the view is stale, and `None` after reporting a failure.
    pub async fn run<T, F>(
        &self,
        request: F,
        describe: impl FnOnce(&AccountError) -> String + Send,
    ) -> Option<T>
    where
        F: Future<Output = Result<T, AccountError>> + Send,
        T: Send,
    {
        if !self.handle.try_begin_busy() {
            tracing::debug!(route = %self.handle.route(), "Submission ignored while busy");
            return None;
        }

        let result = request.await;
        self.handle.end_busy();

        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.report_failure(&error, describe);
                None
            }
        }
    }
}

/// Default failure text: the server message, else a generic one.
pub(crate) fn plain_message(error: &AccountError) -> String {
    error.display_message()
}

pub(crate) fn ignore_form(route: Route, form: &FormInput) {
    tracing::debug!(%route, form = form.name(), "Form not handled by this view");
}
