use chrono::{Duration, Utc};
use http::HeaderMap;

use crate::config::SessionSettings;
use crate::session::cookie::{sign_session_id, verify_session_cookie};
use crate::session::errors::SessionError;
use crate::session::types::{Flash, SessionContext, SessionUser, SignIn, StoredSession};
use crate::storage::{CacheData, SharedCacheStore};
use crate::userdb::{User, UserStore};
use crate::utils::{CookieAttributes, gen_random_string, header_set_cookie};

const SESSION_PREFIX: &str = "session";

/// Creates, resolves and destroys sessions kept in the cache store.
#[derive(Clone)]
pub struct SessionManager {
    cache: SharedCacheStore,
    users: UserStore,
    settings: SessionSettings,
}

impl SessionManager {
    pub(crate) fn new(cache: SharedCacheStore, users: UserStore, settings: SessionSettings) -> Self {
        Self {
            cache,
            users,
            settings,
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.settings.cookie_name
    }

    /// Resolve the session cookie of a request. Missing, tampered, expired
    /// or dangling sessions all come back anonymous.
    pub async fn load(&self, cookie_value: Option<&str>) -> SessionContext {
        let Some(value) = cookie_value else {
            return SessionContext::anonymous();
        };

        match self.try_load(value).await {
            Ok(ctx) => ctx,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load session; treating as anonymous");
                SessionContext::anonymous()
            }
        }
    }

    async fn try_load(&self, cookie_value: &str) -> Result<SessionContext, SessionError> {
        let Some(session_id) = verify_session_cookie(cookie_value, &self.settings.secret) else {
            tracing::warn!("Session cookie signature mismatch");
            return Ok(SessionContext::anonymous());
        };

        let Some(stored) = self.get_stored(&session_id).await? else {
            tracing::debug!("Session not found or expired");
            return Ok(SessionContext::anonymous());
        };

        let current_user = match stored.user_id {
            Some(user_id) => {
                let user = self.users.get_user(user_id).await?;
                if user.is_none() {
                    tracing::debug!(user_id, "Session refers to a deleted user");
                }
                user.map(SessionUser::from)
            }
            None => None,
        };

        Ok(SessionContext {
            session_id: Some(session_id),
            csrf_token: Some(stored.csrf_token),
            current_user,
        })
    }

    /// Establish `user` as the signed-in identity under a fresh session id.
    #[tracing::instrument(skip(self, ctx, user), fields(user_id = user.id))]
    pub async fn sign_in(&self, ctx: &SessionContext, user: &User) -> Result<SignIn, SessionError> {
        // the anonymous session is consumed along with its forwarding target
        let return_to = match &ctx.session_id {
            Some(old_id) => self.take_stored(old_id).await?.and_then(|old| old.return_to),
            None => None,
        };

        let (session_id, stored, headers) = self.create_session(Some(user.id)).await?;
        tracing::info!("User signed in");

        Ok(SignIn {
            headers,
            return_to,
            context: SessionContext {
                session_id: Some(session_id),
                csrf_token: Some(stored.csrf_token),
                current_user: Some(SessionUser::from(user)),
            },
        })
    }

    /// Forget the session and expire the cookie. Safe without a session.
    pub async fn sign_out(&self, ctx: &SessionContext) -> Result<HeaderMap, SessionError> {
        if let Some(session_id) = &ctx.session_id {
            self.remove_stored(session_id).await?;
        }
        if let Some(user) = &ctx.current_user {
            tracing::info!(user_id = user.id, "User signed out");
        }

        let mut headers = HeaderMap::new();
        header_set_cookie(
            &mut headers,
            &self.settings.cookie_name,
            "",
            CookieAttributes {
                max_age: -86400,
                secure: self.settings.secure,
            },
        )?;
        Ok(headers)
    }

    /// Remember where to send the visitor after they sign in.
    pub async fn store_location(
        &self,
        ctx: &SessionContext,
        path: &str,
    ) -> Result<HeaderMap, SessionError> {
        let path = path.to_string();
        self.update_or_create(ctx, move |session| session.return_to = Some(path))
            .await
    }

    pub async fn push_flash(
        &self,
        ctx: &SessionContext,
        flash: Flash,
    ) -> Result<HeaderMap, SessionError> {
        self.update_or_create(ctx, move |session| session.flash.push(flash))
            .await
    }

    /// Pending flash messages; they are removed from the session.
    pub async fn take_flash(&self, ctx: &SessionContext) -> Result<Vec<Flash>, SessionError> {
        let Some(session_id) = &ctx.session_id else {
            return Ok(Vec::new());
        };
        let Some(mut stored) = self.get_stored(session_id).await? else {
            return Ok(Vec::new());
        };
        if stored.flash.is_empty() {
            return Ok(Vec::new());
        }

        let flash = std::mem::take(&mut stored.flash);
        self.put_stored(session_id, &stored).await?;
        Ok(flash)
    }

    /// Apply `change` to the stored session, or to a new anonymous one
    /// (returning its cookie) when the context has none.
    async fn update_or_create(
        &self,
        ctx: &SessionContext,
        change: impl FnOnce(&mut StoredSession),
    ) -> Result<HeaderMap, SessionError> {
        if let Some(session_id) = &ctx.session_id {
            if let Some(mut stored) = self.get_stored(session_id).await? {
                change(&mut stored);
                self.put_stored(session_id, &stored).await?;
                return Ok(HeaderMap::new());
            }
        }

        let (session_id, mut stored, headers) = self.create_session(None).await?;
        change(&mut stored);
        self.put_stored(&session_id, &stored).await?;
        Ok(headers)
    }

    async fn create_session(
        &self,
        user_id: Option<i64>,
    ) -> Result<(String, StoredSession, HeaderMap), SessionError> {
        let session_id = gen_random_string(32)?;
        let max_age = self.settings.max_age;

        let stored = StoredSession {
            user_id,
            csrf_token: gen_random_string(32)?,
            return_to: None,
            flash: Vec::new(),
            expires_at: Utc::now() + Duration::seconds(max_age),
            ttl: max_age as u64,
        };
        self.put_stored(&session_id, &stored).await?;

        let mut headers = HeaderMap::new();
        header_set_cookie(
            &mut headers,
            &self.settings.cookie_name,
            &sign_session_id(&session_id, &self.settings.secret)?,
            CookieAttributes {
                max_age,
                secure: self.settings.secure,
            },
        )?;

        Ok((session_id, stored, headers))
    }

    async fn get_stored(&self, session_id: &str) -> Result<Option<StoredSession>, SessionError> {
        let cached = self
            .cache
            .lock()
            .await
            .get(SESSION_PREFIX, session_id)
            .await?;

        cached.map(StoredSession::try_from).transpose()
    }

    async fn take_stored(&self, session_id: &str) -> Result<Option<StoredSession>, SessionError> {
        let cached = self
            .cache
            .lock()
            .await
            .take(SESSION_PREFIX, session_id)
            .await?;

        cached.map(StoredSession::try_from).transpose()
    }

    async fn put_stored(&self, session_id: &str, stored: &StoredSession) -> Result<(), SessionError> {
        let data = CacheData::try_from(stored)?;
        self.cache
            .lock()
            .await
            .put(SESSION_PREFIX, session_id, data, stored.remaining_ttl())
            .await?;
        Ok(())
    }

    async fn remove_stored(&self, session_id: &str) -> Result<(), SessionError> {
        self.cache
            .lock()
            .await
            .remove(SESSION_PREFIX, session_id)
            .await?;
        Ok(())
    }
}
