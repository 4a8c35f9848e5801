use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::FromRow;

use crate::validation::{ValidationErrors, check_max_length, check_presence};

pub(crate) const CONTENT_MAX_LENGTH: usize = 140;

/// A short post owned by a user.
#[derive(Debug, Clone, FromRow, PartialEq)]
pub struct Micropost {
    pub id: i64,
    pub content: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Micropost form. The owner always comes from the session.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewMicropost {
    #[serde(default)]
    pub content: String,
}

impl NewMicropost {
    pub(crate) fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_presence(&mut errors, "Content", &self.content);
        check_max_length(&mut errors, "Content", &self.content, CONTENT_MAX_LENGTH);
        errors.into_result()
    }
}
