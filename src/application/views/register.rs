//! Registration screen. Creating an account does not sign the user in.

use async_trait::async_trait;

use super::{ignore_form, plain_message, FormInput, View, ViewContext};
use crate::application::lifecycle::{FlashKind, Panel, Region};
use crate::domain::foundation::Password;
use crate::domain::validation::{validate_password, validate_username};
use crate::domain::Route;
use crate::ports::Credentials;

#[derive(Debug, Default)]
pub struct RegisterView;

impl RegisterView {
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
        if ctx
            .run(ctx.account().register(&credentials), plain_message)
            .await
            .is_some()
        {
            tracing::info!(username = %credentials.username, "Account created");
            ctx.show(FlashKind::Success, "User created. You can now log in.");
        }
    }
}

#[async_trait]
impl View for RegisterView {
    fn route(&self) -> Route {
        Route::Register
    }

    fn render(&self, region: &mut Region) {
        region.heading = "Register".to_string();
        region.panel = Panel::RegisterForm;
    }

    async fn on_submit(&self, ctx: &ViewContext, form: FormInput) {
        match form {
            FormInput::Register { username, password } => {
                self.submit(ctx, username, password).await
            }
            other => ignore_form(self.route(), &other),
        }
    }
}
