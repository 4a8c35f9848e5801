//! Runtime settings shared by the session manager and the coordination layer.

use std::env;
use std::sync::LazyLock;

static SESSION_COOKIE_SECURE: LazyLock<bool> = LazyLock::new(|| {
    env::var("SESSION_COOKIE_SECURE")
        .ok()
        .and_then(|s| parse_bool(&s))
        .unwrap_or(true)
});

static SESSION_COOKIE_NAME: LazyLock<String> = LazyLock::new(|| {
    env::var("SESSION_COOKIE_NAME")
        .ok()
        .unwrap_or_else(|| default_cookie_name(*SESSION_COOKIE_SECURE).to_string())
});

static SESSION_COOKIE_MAX_AGE: LazyLock<i64> = LazyLock::new(|| {
    env::var("SESSION_COOKIE_MAX_AGE")
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|age: &i64| *age > 0)
        .unwrap_or(86400)
});

static SESSION_SECRET: LazyLock<Vec<u8>> = LazyLock::new(|| match env::var("SESSION_SECRET") {
    Ok(secret) => secret.into_bytes(),
    Err(_) => {
        tracing::warn!("SESSION_SECRET is not set; using the development default");
        "default_session_secret_change_in_production"
            .to_string()
            .into_bytes()
    }
});

static BCRYPT_COST: LazyLock<u32> = LazyLock::new(|| {
    env::var("BCRYPT_COST")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(bcrypt::DEFAULT_COST)
});

static USERS_PER_PAGE: LazyLock<i64> = LazyLock::new(|| {
    env::var("USERS_PER_PAGE")
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|n: &i64| *n > 0)
        .unwrap_or(30)
});

/// `__Host-` cookies are only accepted over HTTPS.
fn default_cookie_name(secure: bool) -> &'static str {
    if secure {
        "__Host-MicropostSession"
    } else {
        "MicropostSession"
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// Session cookie parameters.
#[derive(Clone)]
pub struct SessionSettings {
    pub cookie_name: String,
    /// Session lifetime in seconds, also the cookie `Max-Age`
    pub max_age: i64,
    pub secure: bool,
    /// HMAC key for cookie signatures
    pub secret: Vec<u8>,
}

impl std::fmt::Debug for SessionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSettings")
            .field("cookie_name", &self.cookie_name)
            .field("max_age", &self.max_age)
            .field("secure", &self.secure)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub session: SessionSettings,
    pub bcrypt_cost: u32,
    pub users_per_page: i64,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            session: SessionSettings {
                cookie_name: SESSION_COOKIE_NAME.clone(),
                max_age: *SESSION_COOKIE_MAX_AGE,
                secure: *SESSION_COOKIE_SECURE,
                secret: SESSION_SECRET.clone(),
            },
            bcrypt_cost: *BCRYPT_COST,
            users_per_page: *USERS_PER_PAGE,
        }
    }

    /// Plain-HTTP cookies and the cheapest bcrypt cost, for test servers.
    pub fn for_testing() -> Self {
        Self {
            session: SessionSettings {
                cookie_name: default_cookie_name(false).to_string(),
                max_age: 3600,
                secure: false,
                secret: b"test-session-secret".to_vec(),
            },
            bcrypt_cost: 4,
            users_per_page: 30,
        }
    }
}
