//! Profile screen: shows the signed-in user's score and updates it.

use async_trait::async_trait;

use super::{ignore_form, plain_message, FormInput, View, ViewContext};
use crate::application::lifecycle::{FlashKind, Panel, ProfileCard, Region};
use crate::domain::validation::parse_score;
use crate::domain::{Profile, ProfilePatch, Route};

const UNNAMED: &str = "(unnamed)";

#[derive(Debug, Default)]
pub struct ProfileView;

impl ProfileView {
    /// Shows `profile`, preferring the session's username over the server's.
    fn show_profile(ctx: &ViewContext, profile: &Profile) -> bool {
        let username = ctx
            .session()
            .map(|s| s.username)
            .filter(|name| !name.is_empty())
            .or_else(|| profile.username.clone())
            .unwrap_or_else(|| UNNAMED.to_string());
        let card = ProfileCard {
            username,
            score: profile.score(),
        };

        ctx.handle()
            .update(|region| region.panel = Panel::Profile { card: Some(card) })
            .is_some()
    }

    async fn submit_score(&self, ctx: &ViewContext, raw: String) {
        ctx.clear_message();

        let score = match parse_score(&raw) {
            Ok(score) => score,
            Err(e) => return ctx.show(FlashKind::Error, e.to_string()),
        };
        let Some(session) = ctx.require_session() else {
            return;
        };

        let patch = ProfilePatch::score(score);
        let request = ctx
            .account()
            .update_data(&session.username, &patch, &session.token);
        let Some(profile) = ctx.run(request, plain_message).await else {
            return;
        };

        if Self::show_profile(ctx, &profile) {
            tracing::info!(score, "Score updated");
            ctx.show(FlashKind::Success, "Score updated.");
        }
    }
}

#[async_trait]
impl View for ProfileView {
    fn route(&self) -> Route {
        Route::Profile
    }

    fn render(&self, region: &mut Region) {
        region.heading = "Profile".to_string();
        region.panel = Panel::Profile { card: None };
    }

    async fn on_mounted(&self, ctx: &ViewContext) {
        let Some(session) = ctx.require_session() else {
            return;
        };

        match ctx
            .account()
            .get_profile(&session.username, &session.token)
            .await
        {
            Ok(profile) => {
                Self::show_profile(ctx, &profile);
            }
            Err(error) => ctx.report_failure(&error, plain_message),
        }
    }

    async fn on_submit(&self, ctx: &ViewContext, form: FormInput) {
        match form {
            FormInput::Score { value } => self.submit_score(ctx, value).await,
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
    use crate::domain::foundation::SessionToken;
    use crate::domain::Session;
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
        let client = Arc::new(client.with_user("bob_01", "pass", 4).with_token("T1", "bob_01"));
        let sessions = Arc::new(InMemorySessionStore::with_session(Session::new(
            SessionToken::new("T1").unwrap(),
            "bob_01",
        )));
        let location = Location::new(Some("#profile"));
        let container = ViewContainer::new();
        let handle = container.mount(Route::Profile, |r| ProfileView.render(r));
        let ctx = ViewContext::new(handle, client.clone(), sessions.clone(), location.clone());
        Harness {
            client,
            sessions,
            location,
            container,
            ctx,
        }
    }

    fn card(container: &ViewContainer) -> Option<ProfileCard> {
        match container.snapshot().panel {
            Panel::Profile { card } => card,
            other => panic!("unexpected panel {:?}", other),
        }
    }

    #[tokio::test]
    async fn mount_fetches_and_shows_profile() {
        let h = harness(MockAccountClient::new());

        ProfileView.on_mounted(&h.ctx).await;

        assert_eq!(
            card(&h.container),
            Some(ProfileCard {
                username: "bob_01".into(),
                score: 4.0
            })
        );
    }

    #[tokio::test]
    async fn score_update_refreshes_card_and_confirms() {
        let h = harness(MockAccountClient::new());

        ProfileView.on_submit(&h.ctx, FormInput::score("7")).await;

        assert_eq!(card(&h.container).unwrap().score, 7.0);
        let message = h.container.snapshot().message.unwrap();
        assert_eq!(message.kind, FlashKind::Success);
        assert_eq!(message.text, "Score updated.");
        assert_eq!(h.client.score_of("bob_01"), Some(7.0));
    }

    #[tokio::test]
    async fn negative_score_never_reaches_the_service() {
        let h = harness(MockAccountClient::new());

        ProfileView.on_submit(&h.ctx, FormInput::score("-3")).await;

        assert_eq!(h.client.calls(MockOperation::UpdateData), 0);
        assert_eq!(
            h.container.snapshot().message.unwrap().text,
            "Invalid score (number >= 0)"
        );
    }

    #[tokio::test]
    async fn unauthorized_fetch_signs_out_and_redirects() {
        let h = harness(MockAccountClient::new());
        h.client.revoke_token("T1");

        ProfileView.on_mounted(&h.ctx).await;

        assert!(h.sessions.get().is_none());
        assert_eq!(h.location.fragment(), Some("login".into()));
        assert_eq!(h.location.pending_len(), 1);
        assert_eq!(h.container.snapshot().message.unwrap().kind, FlashKind::Error);
    }

    #[tokio::test]
    async fn not_found_is_display_only() {
        let h = harness(
            MockAccountClient::new().with_error(
                MockOperation::GetProfile,
                AccountError::NotFound {
                    message: Some("User not found".into()),
                },
            ),
        );

        ProfileView.on_mounted(&h.ctx).await;

        assert!(h.sessions.get().is_some());
        assert_eq!(h.location.pending_len(), 0);
        assert_eq!(h.container.snapshot().message.unwrap().text, "User not found");
    }

    #[tokio::test]
    async fn stale_fetch_leaves_new_view_untouched() {
        let h = harness(MockAccountClient::new());
        h.client.revoke_token("T1");
        let replacement = h.container.mount(Route::Scores, |r| r.heading = "Scoreboard".into());

        ProfileView.on_mounted(&h.ctx).await;

        assert!(replacement.is_live());
        assert_eq!(h.container.snapshot().heading, "Scoreboard");
        assert_eq!(h.container.snapshot().message, None);
        assert!(h.sessions.get().is_some());
        assert_eq!(h.location.pending_len(), 0);
    }

    #[tokio::test]
    async fn missing_session_redirects_without_request() {
        let h = harness(MockAccountClient::new());
        h.sessions.clear();

        ProfileView.on_submit(&h.ctx, FormInput::score("1")).await;

        assert_eq!(h.client.calls(MockOperation::UpdateData), 0);
        assert_eq!(h.location.fragment(), Some("login".into()));
    }
}
