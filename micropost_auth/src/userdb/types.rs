use chrono::{DateTime, Utc};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use sqlx::FromRow;
use std::fmt;

use crate::validation::{ValidationErrors, check_max_length, check_presence};

pub(crate) const NAME_MAX_LENGTH: usize = 50;
pub(crate) const EMAIL_MAX_LENGTH: usize = 255;
pub(crate) const PASSWORD_MIN_LENGTH: usize = 6;

/// A registered account.
#[derive(Clone, FromRow, PartialEq)]
pub struct User {
    /// Database-assigned primary key
    pub id: i64,
    pub name: String,
    /// Stored lower-cased; unique
    pub email: String,
    pub password_digest: String,
    pub admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Keeps the digest out of logs
impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("admin", &self.admin)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish_non_exhaustive()
    }
}

impl User {
    /// Gravatar image URL derived from the SHA-256 of the normalized email.
    pub fn gravatar_url(&self, size: u32) -> String {
        let digest = Sha256::digest(normalize_email(&self.email).as_bytes());
        let hash: String = digest.iter().map(|b| format!("{b:02x}")).collect();
        format!("https://secure.gravatar.com/avatar/{hash}?s={size}")
    }
}

/// Attributes of a user about to be inserted. The digest is already computed.
#[derive(Clone)]
pub(crate) struct NewUserRecord {
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) password_digest: String,
    pub(crate) admin: bool,
}

/// Sign-up form. There is deliberately no `admin` field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewUser {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password_confirmation: String,
}

impl NewUser {
    pub(crate) fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validate_name(&mut errors, &self.name);
        validate_email(&mut errors, &self.email);
        validate_password(
            &mut errors,
            &self.password,
            &self.password_confirmation,
        );
        errors.into_result()
    }
}

/// Profile edit form. A blank password leaves the current one in place.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdate {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password_confirmation: String,
}

impl UserUpdate {
    pub(crate) fn changes_password(&self) -> bool {
        !self.password.is_empty() || !self.password_confirmation.is_empty()
    }

    pub(crate) fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validate_name(&mut errors, &self.name);
        validate_email(&mut errors, &self.email);
        if self.changes_password() {
            validate_password(
                &mut errors,
                &self.password,
                &self.password_confirmation,
            );
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone)]
pub(crate) enum UserSearchField {
    Id(i64),
    Email(String),
}

impl fmt::Display for UserSearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserSearchField::Id(id) => write!(f, "Id({id})"),
            UserSearchField::Email(email) => write!(f, "Email({email})"),
        }
    }
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_name(errors: &mut ValidationErrors, name: &str) {
    check_presence(errors, "Name", name);
    check_max_length(errors, "Name", name, NAME_MAX_LENGTH);
}

fn validate_email(errors: &mut ValidationErrors, email: &str) {
    if !check_presence(errors, "Email", email) {
        return;
    }
    check_max_length(errors, "Email", email, EMAIL_MAX_LENGTH);
    if !is_valid_email(email.trim()) {
        errors.add("Email is invalid");
    }
}

fn validate_password(errors: &mut ValidationErrors, password: &str, confirmation: &str) {
    if password.chars().count() < PASSWORD_MIN_LENGTH {
        errors.add(format!(
            "Password is too short (minimum is {PASSWORD_MIN_LENGTH} characters)"
        ));
    }
    if password != confirmation {
        errors.add("Password confirmation doesn't match Password");
    }
}

/// `local@domain.tld` where local is word characters, `+`, `-` or `.`, the
/// domain is alphanumerics, `-` or `.`, and the final label is letters only.
pub(crate) fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };

    !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '+' | '-' | '.'))
        && !host.is_empty()
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.'))
        && !tld.is_empty()
        && tld.chars().all(|c| c.is_ascii_alphabetic())
}
