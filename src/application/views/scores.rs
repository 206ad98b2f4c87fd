//! Scoreboard screen: top users ordered by score, highest first.

use async_trait::async_trait;

use super::{ignore_form, FormInput, View, ViewContext};
use crate::application::lifecycle::{FlashKind, Panel, Region, ScoreRow};
use crate::domain::validation::{clamp_scoreboard_limit, DEFAULT_SCOREBOARD_LIMIT};
use crate::domain::{Profile, Route};
use crate::ports::{AccountError, ListUsersQuery};

#[derive(Debug, Default)]
pub struct ScoresView;

/// Failure text with the status code in front, e.g. `HTTP 503 - Server error`.
fn describe_with_status(error: &AccountError) -> String {
    match error.status() {
        Some(status) => format!("HTTP {} - {}", status, error.display_message()),
        None => error.display_message(),
    }
}

/// Orders profiles by score, highest first, and numbers them.
///
/// The service is asked to sort too, but its order is not trusted. Ties keep
/// the order the service returned.
pub fn rank_profiles(mut profiles: Vec<Profile>) -> Vec<ScoreRow> {
    profiles.sort_by(|a, b| b.score().total_cmp(&a.score()));
    profiles
        .into_iter()
        .enumerate()
        .map(|(i, p)| {
            let score = p.score();
            ScoreRow {
                rank: i + 1,
                username: p.username.unwrap_or_else(|| "(unnamed)".to_string()),
                score,
            }
        })
        .collect()
}

impl ScoresView {
    async fn load(&self, ctx: &ViewContext, limit: u32) {
        // A load already in flight owns the table and the status line.
        let started = ctx.handle().update(|region| {
            if region.busy {
                return false;
            }
            region.panel = Panel::Scoreboard {
                limit,
                rows: Vec::new(),
            };
            region.flash(FlashKind::Info, "Loading...");
            true
        });
        if started != Some(true) {
            tracing::debug!(limit, "Scoreboard load skipped");
            return;
        }

        let Some(session) = ctx.require_session() else {
            return;
        };

        let query = ListUsersQuery::top(limit);
        let request = ctx.account().list_users(&query, &session.token);
        let Some(profiles) = ctx.run(request, describe_with_status).await else {
            return;
        };

        let rows = rank_profiles(profiles);
        let count = rows.len();
        ctx.handle().update(|region| {
            region.panel = Panel::Scoreboard { limit, rows };
            if count == 0 {
                region.flash(FlashKind::Info, "No users to display.");
            } else {
                region.flash(FlashKind::Info, format!("Showing {} user(s).", count));
            }
        });
    }
}

#[async_trait]
impl View for ScoresView {
    fn route(&self) -> Route {
        Route::Scores
    }

    fn render(&self, region: &mut Region) {
        region.heading = "Scoreboard".to_string();
        region.panel = Panel::Scoreboard {
            limit: DEFAULT_SCOREBOARD_LIMIT,
            rows: Vec::new(),
        };
    }

    async fn on_mounted(&self, ctx: &ViewContext) {
        self.load(ctx, DEFAULT_SCOREBOARD_LIMIT).await;
    }

    async fn on_submit(&self, ctx: &ViewContext, form: FormInput) {
        match form {
            FormInput::Scoreboard { limit } => {
                let limit = clamp_scoreboard_limit(limit.as_deref());
                self.load(ctx, limit).await
            }
            other => ignore_form(self.route(), &other),
        }
    }
}
