//! Explicit session context: the bearer token and the logged-in user.
//!
//! Created by login, cleared by logout, and passed to every operation that
//! needs to authenticate.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::model::{LoginResponse, UserProfile};

/// Authentication state shared by the API client and the session handler.
///
/// Note: Debug masks the token so it never reaches logs.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionContext {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    user: Option<UserProfile>,
}

impl SessionContext {
    /// A context with no credentials.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(token: impl Into<String>, user: Option<UserProfile>) -> Self {
        Self {
            token: Some(token.into()),
            user,
        }
    }

    pub fn from_login(response: LoginResponse) -> Self {
        Self::authenticated(response.token, Some(response.user))
    }

    /// Replace the token, keeping the user.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Forget the token and user.
    pub fn logout(&mut self) {
        self.token = None;
        self.user = None;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }

    /// The token, or `AuthenticationMissing` when there is none.
    pub fn require_token(&self) -> Result<&str, ApiError> {
        self.token().ok_or(ApiError::AuthenticationMissing)
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.user_id.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("token", &self.token.as_ref().map(|_| "***"))
            .field("user", &self.user)
            .finish()
    }
}
