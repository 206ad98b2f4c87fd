//! Mock account client for testing.
//!
//! An in-memory stand-in for the account service so the router and views
//! can be exercised without a network.
//!
//! # Example
//!
//! ```ignore
//! use score_portal::adapters::account::{MockAccountClient, MockOperation};
//! use score_portal::ports::AccountError;
//!
//! let client = MockAccountClient::new()
//!     .with_user("bob_01", "pass", 0)
//!     .with_error(MockOperation::ListUsers, AccountError::unauthorized());
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::sync::{Notify, Semaphore};

use crate::domain::foundation::SessionToken;
use crate::domain::{Profile, ProfilePatch};
use crate::ports::{AccountClient, AccountError, Credentials, ListUsersQuery, LoginGrant};

/// Operations of the account service, used to force errors and count calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOperation {
    Register,
    Login,
    GetProfile,
    UpdateData,
    ListUsers,
}

#[derive(Debug, Clone)]
struct MockUser {
    password: String,
    profile: Profile,
}

#[derive(Debug, Default)]
struct MockState {
    /// Users in registration order
    users: Vec<(String, MockUser)>,
    /// Issued tokens and the user they belong to
    tokens: HashMap<String, String>,
    /// Errors returned instead of normal results
    forced: HashMap<MockOperation, AccountError>,
    /// Fixed scoreboard returned by `list_users`
    listing: Option<Vec<Profile>>,
    calls: HashMap<MockOperation, usize>,
    issued: u32,
}

impl MockState {
    fn user_mut(&mut self, username: &str) -> Option<&mut MockUser> {
        self.users
            .iter_mut()
            .find(|(name, _)| name == username)
            .map(|(_, user)| user)
    }

    fn user(&self, username: &str) -> Option<&MockUser> {
        self.users
            .iter()
            .find(|(name, _)| name == username)
            .map(|(_, user)| user)
    }

    /// Records the call and returns the forced error, if any.
    fn enter(&mut self, operation: MockOperation) -> Result<(), AccountError> {
        *self.calls.entry(operation).or_insert(0) += 1;
        match self.forced.get(&operation) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn authorize(&self, token: &SessionToken) -> Result<&str, AccountError> {
        self.tokens
            .get(token.expose())
            .map(String::as_str)
            .ok_or_else(AccountError::unauthorized)
    }
}

/// Holds `get_profile` responses until the test releases them.
#[derive(Debug)]
struct ProfileGate {
    requested: Notify,
    release: Semaphore,
}

/// Mock account client for testing.
#[derive(Debug, Default)]
pub struct MockAccountClient {
    state: Mutex<MockState>,
    gate: Mutex<Option<Arc<ProfileGate>>>,
}

impl MockAccountClient {
    /// Creates an empty mock service.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Adds a registered user with the given score.
    pub fn with_user(self, username: &str, password: &str, score: i64) -> Self {
        self.state().users.push((
            username.to_string(),
            MockUser {
                password: password.to_string(),
                profile: Profile::with_score(username, score),
            },
        ));
        self
    }

    /// Registers a token as valid for a user, as if issued by a past login.
    pub fn with_token(self, token: &str, username: &str) -> Self {
        self.state()
            .tokens
            .insert(token.to_string(), username.to_string());
        self
    }

    /// Forces an operation to fail with the given error.
    pub fn with_error(self, operation: MockOperation, error: AccountError) -> Self {
        self.set_error(operation, error);
        self
    }

    /// Makes `list_users` return exactly these profiles, in this order.
    pub fn with_listing(self, profiles: Vec<Profile>) -> Self {
        self.state().listing = Some(profiles);
        self
    }

    /// Forces an operation to fail from now on.
    pub fn set_error(&self, operation: MockOperation, error: AccountError) {
        self.state().forced.insert(operation, error);
    }

    /// Returns an operation to normal behaviour.
    pub fn clear_error(&self, operation: MockOperation) {
        self.state().forced.remove(&operation);
    }

    /// Invalidates a previously issued token.
    pub fn revoke_token(&self, token: &str) {
        self.state().tokens.remove(token);
    }

    /// Number of calls made to an operation.
    pub fn calls(&self, operation: MockOperation) -> usize {
        self.state().calls.get(&operation).copied().unwrap_or(0)
    }

    /// Number of calls made to any operation.
    pub fn total_calls(&self) -> usize {
        self.state().calls.values().sum()
    }

    /// Returns the stored score for a user.
    pub fn score_of(&self, username: &str) -> Option<f64> {
        self.state().user(username).map(|u| u.profile.score())
    }

    /// Holds every subsequent `get_profile` response until released.
    pub fn hold_profile_responses(&self) {
        *self.gate.lock().unwrap_or_else(|p| p.into_inner()) = Some(Arc::new(ProfileGate {
            requested: Notify::new(),
            release: Semaphore::new(0),
        }));
    }

    /// Waits until a held `get_profile` call has started.
    pub async fn profile_requested(&self) {
        if let Some(gate) = self.current_gate() {
            gate.requested.notified().await;
        }
    }

    /// Lets one held `get_profile` call complete.
    pub fn release_profile(&self) {
        if let Some(gate) = self.current_gate() {
            gate.release.add_permits(1);
        }
    }

    fn current_gate(&self) -> Option<Arc<ProfileGate>> {
        self.gate.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }
}

#[async_trait]
impl AccountClient for MockAccountClient {
    async fn register(&self, credentials: &Credentials) -> Result<(), AccountError> {
        let mut state = self.state();
        state.enter(MockOperation::Register)?;

        if state.user(&credentials.username).is_some() {
            return Err(AccountError::Conflict {
                message: Some("User already exists".to_string()),
            });
        }

        state.users.push((
            credentials.username.clone(),
            MockUser {
                password: credentials.password.expose().to_string(),
                profile: Profile {
                    username: Some(credentials.username.clone()),
                    data: Default::default(),
                },
            },
        ));
        Ok(())
    }

    async fn login(&self, credentials: &Credentials) -> Result<LoginGrant, AccountError> {
        let mut state = self.state();
        state.enter(MockOperation::Login)?;

        let profile = match state.user(&credentials.username) {
            Some(user) if user.password == credentials.password.expose() => user.profile.clone(),
            _ => {
                return Err(AccountError::Unauthorized {
                    message: Some("Invalid credentials".to_string()),
                })
            }
        };

        state.issued += 1;
        let token = format!("T{}", state.issued);
        state
            .tokens
            .insert(token.clone(), credentials.username.clone());

        Ok(LoginGrant {
            token: SessionToken::new(token).map_err(|e| AccountError::network(e.to_string()))?,
            profile: Some(profile),
        })
    }

    async fn get_profile(
        &self,
        username: &str,
        token: &SessionToken,
    ) -> Result<Profile, AccountError> {
        let gate = self.current_gate();
        if let Some(gate) = gate {
            gate.requested.notify_one();
            if let Ok(permit) = gate.release.acquire().await {
                permit.forget();
            }
        }

        let mut state = self.state();
        state.enter(MockOperation::GetProfile)?;
        state.authorize(token)?;

        state
            .user(username)
            .map(|u| u.profile.clone())
            .ok_or(AccountError::NotFound {
                message: Some("User not found".to_string()),
            })
    }

    async fn update_data(
        &self,
        username: &str,
        patch: &ProfilePatch,
        token: &SessionToken,
    ) -> Result<Profile, AccountError> {
        let mut state = self.state();
        state.enter(MockOperation::UpdateData)?;
        state.authorize(token)?;

        let user = state.user_mut(username).ok_or(AccountError::NotFound {
            message: Some("User not found".to_string()),
        })?;
        if let Some(score) = patch.score {
            user.profile.data.score = Some(score as f64);
        }
        Ok(user.profile.clone())
    }

    async fn list_users(
        &self,
        query: &ListUsersQuery,
        token: &SessionToken,
    ) -> Result<Vec<Profile>, AccountError> {
        let mut state = self.state();
        state.enter(MockOperation::ListUsers)?;
        state.authorize(token)?;

        let mut profiles = match &state.listing {
            Some(listing) => listing.clone(),
            None => state.users.iter().map(|(_, u)| u.profile.clone()).collect(),
        };
        profiles.truncate(query.limit as usize);
        Ok(profiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Password;

    fn credentials(username: &str, password: &str) -> Credentials {
        Credentials::new(username, Password::new(password))
    }

    #[tokio::test]
    async fn login_issues_sequential_tokens() {
        let client = MockAccountClient::new().with_user("bob_01", "pass", 0);

        let first = client.login(&credentials("bob_01", "pass")).await.unwrap();
        let second = client.login(&credentials("bob_01", "pass")).await.unwrap();

        assert_eq!(first.token.expose(), "T1");
        assert_eq!(second.token.expose(), "T2");
        assert_eq!(first.profile, Some(Profile::with_score("bob_01", 0)));
    }

    #[tokio::test]
    async fn login_rejects_wrong_password() {
        let client = MockAccountClient::new().with_user("bob_01", "pass", 0);

        let result = client.login(&credentials("bob_01", "nope")).await;

        assert!(matches!(result, Err(AccountError::Unauthorized { .. })));
    }

    #[tokio::test]
    async fn register_rejects_duplicates() {
        let client = MockAccountClient::new();

        client.register(&credentials("ann", "pass")).await.unwrap();
        let result = client.register(&credentials("ann", "pass")).await;

        assert!(matches!(result, Err(AccountError::Conflict { .. })));
        assert_eq!(client.calls(MockOperation::Register), 2);
    }

    #[tokio::test]
    async fn authenticated_calls_require_known_token() {
        let client = MockAccountClient::new().with_user("bob_01", "pass", 5);
        let bad = SessionToken::new("stale").unwrap();

        let result = client.get_profile("bob_01", &bad).await;

        assert!(matches!(result, Err(AccountError::Unauthorized { .. })));
    }

    #[tokio::test]
    async fn update_data_changes_score() {
        let client = MockAccountClient::new()
            .with_user("bob_01", "pass", 0)
            .with_token("T9", "bob_01");
        let token = SessionToken::new("T9").unwrap();

        let profile = client
            .update_data("bob_01", &ProfilePatch::score(7), &token)
            .await
            .unwrap();

        assert_eq!(profile.score(), 7.0);
        assert_eq!(client.score_of("bob_01"), Some(7.0));
    }

    #[tokio::test]
    async fn forced_error_overrides_result_until_cleared() {
        let client = MockAccountClient::new()
            .with_user("bob_01", "pass", 0)
            .with_token("T9", "bob_01")
            .with_error(MockOperation::GetProfile, AccountError::from_status(503, None));
        let token = SessionToken::new("T9").unwrap();

        assert!(client.get_profile("bob_01", &token).await.is_err());
        client.clear_error(MockOperation::GetProfile);
        assert!(client.get_profile("bob_01", &token).await.is_ok());
    }

    #[tokio::test]
    async fn list_users_returns_fixed_listing_in_given_order() {
        let client = MockAccountClient::new()
            .with_token("T9", "bob_01")
            .with_listing(vec![
                Profile::with_score("a", 3),
                Profile::with_score("b", 9),
                Profile::with_score("c", 1),
            ]);
        let token = SessionToken::new("T9").unwrap();

        let users = client.list_users(&ListUsersQuery::top(2), &token).await.unwrap();

        let scores: Vec<f64> = users.iter().map(Profile::score).collect();
        assert_eq!(scores, vec![3.0, 9.0]);
    }

    #[tokio::test]
    async fn held_profile_waits_for_release() {
        let client = Arc::new(
            MockAccountClient::new()
                .with_user("bob_01", "pass", 2)
                .with_token("T9", "bob_01"),
        );
        client.hold_profile_responses();

        let pending = {
            let client = client.clone();
            tokio::spawn(async move {
                let token = SessionToken::new("T9").unwrap();
                client.get_profile("bob_01", &token).await
            })
        };

        client.profile_requested().await;
        assert_eq!(client.calls(MockOperation::GetProfile), 0);

        client.release_profile();
        let profile = pending.await.unwrap().unwrap();
        assert_eq!(profile.score(), 2.0);
    }
}
