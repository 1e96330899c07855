//! Authentication slice.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::action::{Action, AuthSession};

/// Opaque user profile returned by the authentication service.
///
/// The store never inspects it; it is kept and persisted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserRecord(serde_json::Value);

impl UserRecord {
    /// Wrap a JSON profile.
    #[must_use]
    pub const fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// The raw JSON profile.
    #[must_use]
    pub const fn as_json(&self) -> &serde_json::Value {
        &self.0
    }
}

/// Opaque bearer credential.
///
/// Implements `Debug` manually to redact the value.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    /// Wrap a token string.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Expose the token value.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken([REDACTED])")
    }
}

/// Signed-in user and token.
///
/// `isAuth` is derived from the token and is never stored independently: it
/// is written out for readers of the persisted layout and ignored on read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "AuthSnapshot", from = "AuthSnapshot")]
pub struct AuthState {
    user: Option<UserRecord>,
    token: Option<AuthToken>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthSnapshot {
    #[serde(default)]
    user: Option<UserRecord>,
    #[serde(default)]
    token: Option<AuthToken>,
    #[serde(default)]
    is_auth: bool,
}

impl From<AuthState> for AuthSnapshot {
    fn from(state: AuthState) -> Self {
        let is_auth = state.is_auth();
        Self {
            user: state.user,
            token: state.token,
            is_auth,
        }
    }
}

impl From<AuthSnapshot> for AuthState {
    fn from(snapshot: AuthSnapshot) -> Self {
        Self {
            user: snapshot.user,
            token: snapshot.token,
        }
    }
}

impl AuthState {
    /// The signed-in user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&UserRecord> {
        self.user.as_ref()
    }

    /// The current token, if any.
    #[must_use]
    pub const fn token(&self) -> Option<&AuthToken> {
        self.token.as_ref()
    }

    /// True iff a token is held.
    #[must_use]
    pub const fn is_auth(&self) -> bool {
        self.token.is_some()
    }

    /// Apply an action. Non-auth actions return an identical copy.
    #[must_use]
    pub fn reduce(&self, action: &Action) -> Self {
        match action {
            Action::Login(session) | Action::Register(session) => Self::signed_in(session),
            Action::Logout => Self::default(),
            _ => self.clone(),
        }
    }

    fn signed_in(session: &AuthSession) -> Self {
        Self {
            user: Some(session.user.clone()),
            token: Some(session.token.clone()),
        }
    }
}
