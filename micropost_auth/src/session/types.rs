use chrono::{DateTime, Utc};
use http::HeaderMap;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use crate::session::errors::SessionError;
use crate::storage::CacheData;
use crate::userdb::User as DbUser;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Info,
    Error,
}

impl FlashKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashKind::Success => "success",
            FlashKind::Info => "info",
            FlashKind::Error => "error",
        }
    }
}

/// A message shown on the next rendered page, then discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }
}

/// The identity a session resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub admin: bool,
}

impl From<DbUser> for SessionUser {
    fn from(user: DbUser) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            admin: user.admin,
        }
    }
}

impl From<&DbUser> for SessionUser {
    fn from(user: &DbUser) -> Self {
        user.clone().into()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(super) struct StoredSession {
    pub(super) user_id: Option<i64>,
    pub(super) csrf_token: String,
    #[serde(default)]
    pub(super) return_to: Option<String>,
    #[serde(default)]
    pub(super) flash: Vec<Flash>,
    pub(super) expires_at: DateTime<Utc>,
    pub(super) ttl: u64,
}

impl StoredSession {
    /// Seconds left before expiry, at least one.
    pub(super) fn remaining_ttl(&self) -> u64 {
        (self.expires_at - Utc::now()).num_seconds().max(1) as u64
    }
}

impl TryFrom<&StoredSession> for CacheData {
    type Error = SessionError;

    fn try_from(session: &StoredSession) -> Result<Self, Self::Error> {
        Ok(Self {
            value: serde_json::to_string(session)
                .map_err(|e| SessionError::Storage(e.to_string()))?,
            expires_at: session.expires_at,
        })
    }
}

impl TryFrom<CacheData> for StoredSession {
    type Error = SessionError;

    fn try_from(data: CacheData) -> Result<Self, Self::Error> {
        serde_json::from_str(&data.value).map_err(|e| SessionError::Storage(e.to_string()))
    }
}

/// What a request knows about its session: the session id (if a valid cookie
/// was presented), its CSRF token and the resolved current user.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    pub(super) session_id: Option<String>,
    pub(super) csrf_token: Option<String>,
    pub(super) current_user: Option<SessionUser>,
}

impl SessionContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn current_user(&self) -> Option<&SessionUser> {
        self.current_user.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.current_user.is_some()
    }

    /// True when `user_id` is the signed-in user.
    pub fn is_current_user(&self, user_id: i64) -> bool {
        self.current_user.as_ref().is_some_and(|u| u.id == user_id)
    }

    pub fn has_session(&self) -> bool {
        self.session_id.is_some()
    }

    pub fn csrf_token(&self) -> Option<&str> {
        self.csrf_token.as_deref()
    }

    /// Compare a submitted token with the session's in constant time.
    pub fn verify_csrf(&self, submitted: &str) -> bool {
        match &self.csrf_token {
            Some(expected) => {
                !submitted.is_empty() && bool::from(expected.as_bytes().ct_eq(submitted.as_bytes()))
            }
            None => false,
        }
    }
}

/// Result of establishing a signed-in identity.
#[derive(Debug)]
pub struct SignIn {
    /// `Set-Cookie` for the new session id
    pub headers: HeaderMap,
    /// Friendly-forwarding path recorded before sign-in, consumed here
    pub return_to: Option<String>,
    /// Context for the new session, for follow-up calls in the same request
    pub context: SessionContext,
}
