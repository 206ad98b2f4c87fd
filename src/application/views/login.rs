//! Login screen.

use async_trait::async_trait;

use super::{ignore_form, plain_message, FormInput, View, ViewContext};
use crate::application::lifecycle::{FlashKind, Panel, Region};
use crate::domain::foundation::Password;
use crate::domain::validation::{validate_password, validate_username};
use crate::domain::{Route, Session};
use crate::ports::Credentials;

#[derive(Debug, Default)]
pub struct LoginView;

impl LoginView {
    async fn submit(&self, ctx: &ViewContext, username: String, password: Password) {
        ctx.clear_message();

        let username = match validate_username(&username) {
            Ok(username) => username,
            Err(e) => return ctx.show(FlashKind::Error, e.to_string()),
        };
        if let Err(e) = validate_password(&password) {
            return ctx.show(FlashKind::Error, e.to_string());
        }

        let credentials = Credentials::new(username, password);
        let Some(grant) = ctx
            .run(ctx.account().login(&credentials), plain_message)
            .await
        else {
            return;
        };

        let username = grant
            .profile
            .and_then(|p| p.username)
            .unwrap_or(credentials.username);
        ctx.sign_in(Session::new(grant.token, username));
    }
}

#[async_trait]
impl View for LoginView {
    fn route(&self) -> Route {
        Route::Login
    }

    fn render(&self, region: &mut Region) {
        region.heading = "Login".to_string();
        region.panel = Panel::LoginForm;
    }

    async fn on_submit(&self, ctx: &ViewContext, form: FormInput) {
        match form {
            FormInput::Login { username, password } => self.submit(ctx, username, password).await,
            other => ignore_form(self.route(), &other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::account::{MockAccountClient, MockOperation};
    use crate::adapters::storage::InMemorySessionStore;
    use crate::application::lifecycle::ViewContainer;
    use crate::application::location::Location;
    use crate::ports::{AccountError, SessionStore};
    use std::sync::Arc;

    struct Harness {
        client: Arc<MockAccountClient>,
        sessions: Arc<InMemorySessionStore>,
        location: Location,
        container: ViewContainer,
        ctx: ViewContext,
    }

    fn harness(client: MockAccountClient) -> Harness {
        let client = Arc::new(client);
        let sessions = Arc::new(InMemorySessionStore::new());
        let location = Location::new(Some("#login"));
        let container = ViewContainer::new();
        let handle = container.mount(Route::Login, |r| LoginView.render(r));
        let ctx = ViewContext::new(handle, client.clone(), sessions.clone(), location.clone());
        Harness {
            client,
            sessions,
            location,
            container,
            ctx,
        }
    }

    #[tokio::test]
    async fn successful_login_stores_session_and_redirects() {
        let h = harness(MockAccountClient::new().with_user("bob_01", "pass", 0));

        LoginView
            .on_submit(&h.ctx, FormInput::login("bob_01", "pass"))
            .await;

        let session = h.sessions.get().unwrap();
        assert_eq!(session.username, "bob_01");
        assert_eq!(session.token.expose(), "T1");
        assert_eq!(h.location.fragment(), Some("profile".into()));
        assert!(!h.container.snapshot().busy);
    }

    #[tokio::test]
    async fn short_username_never_reaches_the_service() {
        let h = harness(MockAccountClient::new());

        LoginView.on_submit(&h.ctx, FormInput::login("ab", "pass")).await;

        assert_eq!(h.client.total_calls(), 0);
        let message = h.container.snapshot().message.unwrap();
        assert_eq!(message.kind, FlashKind::Error);
        assert!(message.text.starts_with("Invalid username"));
    }

    #[tokio::test]
    async fn short_password_never_reaches_the_service() {
        let h = harness(MockAccountClient::new());

        LoginView.on_submit(&h.ctx, FormInput::login("bob_01", "abc")).await;

        assert_eq!(h.client.total_calls(), 0);
        assert!(h.container.snapshot().message.unwrap().text.starts_with("Invalid password"));
    }

    #[tokio::test]
    async fn rejected_credentials_show_server_message() {
        let h = harness(MockAccountClient::new().with_user("bob_01", "pass", 0));

        LoginView
            .on_submit(&h.ctx, FormInput::login("bob_01", "wrong"))
            .await;

        assert_eq!(h.client.calls(MockOperation::Login), 1);
        assert_eq!(
            h.container.snapshot().message.unwrap().text,
            "Invalid credentials"
        );
        assert!(h.sessions.get().is_none());
        assert_eq!(h.location.pending_len(), 0);
    }

    #[tokio::test]
    async fn server_error_is_display_only() {
        let h = harness(
            MockAccountClient::new()
                .with_error(MockOperation::Login, AccountError::from_status(500, None)),
        );

        LoginView
            .on_submit(&h.ctx, FormInput::login("bob_01", "pass"))
            .await;

        assert_eq!(h.container.snapshot().message.unwrap().text, "Server error");
        assert_eq!(h.location.fragment(), Some("login".into()));
    }

    #[tokio::test]
    async fn busy_form_ignores_second_submission() {
        let h = harness(MockAccountClient::new().with_user("bob_01", "pass", 0));
        assert!(h.ctx.handle().try_begin_busy());

        LoginView
            .on_submit(&h.ctx, FormInput::login("bob_01", "pass"))
            .await;

        assert_eq!(h.client.total_calls(), 0);
        assert!(h.sessions.get().is_none());
    }

    #[tokio::test]
    async fn login_from_superseded_view_is_dropped() {
        let h = harness(MockAccountClient::new().with_user("bob_01", "pass", 0));
        h.container.mount(Route::Register, |_| {});

        LoginView
            .on_submit(&h.ctx, FormInput::login("bob_01", "pass"))
            .await;

        assert!(h.sessions.get().is_none());
        assert_eq!(h.location.pending_len(), 0);
    }
}
