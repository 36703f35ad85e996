//! Session state and its transitions.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthStatus {
    #[default]
    Checking,
    Authenticated,
    NotAuthenticated,
}

impl fmt::Display for AuthStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            AuthStatus::Checking => "checking",
            AuthStatus::Authenticated => "authenticated",
            AuthStatus::NotAuthenticated => "not-authenticated",
        };
        write!(f, "{label}")
    }
}

/// Profile of the signed-in user. Every field is whatever the backend sent.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl User {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.uid.is_none() && self.email.is_none() && self.password.is_none()
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("name", &self.name)
            .field("uid", &self.uid)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Transitions of the session state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthAction {
    Checking,
    /// An empty profile cannot be signed in and is applied as a silent logout.
    Login(User),
    /// Carries the message to surface, or `None` for a silent logout.
    Logout(Option<String>),
    ClearErrorMessage,
}

/// The status/user/error triple held by the session store.
///
/// `user` is non-empty exactly when `status` is `Authenticated`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthState {
    pub status: AuthStatus,
    pub user: User,
    pub error_message: Option<String>,
}

impl AuthState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn not_authenticated() -> Self {
        AuthState {
            status: AuthStatus::NotAuthenticated,
            ..Self::default()
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.status == AuthStatus::Authenticated
    }

    pub fn apply(&mut self, action: AuthAction) {
        match action {
            AuthAction::Checking => {
                self.status = AuthStatus::Checking;
                self.user = User::default();
                self.error_message = None;
            }
            AuthAction::Login(payload) if payload.is_empty() => {
                self.apply(AuthAction::Logout(None));
            }
            AuthAction::Login(payload) => {
                self.status = AuthStatus::Authenticated;
                self.user = User {
                    name: payload.name,
                    uid: payload.uid,
                    email: payload.email,
                    password: payload.password,
                };
                self.error_message = None;
            }
            AuthAction::Logout(message) => {
                self.status = AuthStatus::NotAuthenticated;
                self.user = User::default();
                self.error_message = message;
            }
            AuthAction::ClearErrorMessage => {
                self.error_message = None;
            }
        }
    }
}
