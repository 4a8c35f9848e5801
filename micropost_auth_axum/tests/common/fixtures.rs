use std::sync::atomic::{AtomicUsize, Ordering};

use micropost_auth::{
    Micropost, NewMicropost, NewUser, SessionUser, Stores, User, create_micropost, seed_admin,
    sign_up,
};

/// Password of every fixture user
pub const PASSWORD: &str = "foobar";

static SEQUENCE: AtomicUsize = AtomicUsize::new(0);

fn next_sequence() -> usize {
    SEQUENCE.fetch_add(1, Ordering::Relaxed)
}

/// Factories for records inserted straight into a test server's stores
pub struct Factory;

impl Factory {
    /// A regular user with a unique name and email
    pub async fn user(stores: &Stores) -> User {
        let n = next_sequence();
        Self::user_with_email(stores, &format!("person-{n}@example.com")).await
    }

    pub async fn user_with_email(stores: &Stores, email: &str) -> User {
        let n = next_sequence();
        sign_up(
            stores,
            NewUser {
                name: format!("Person {n}"),
                email: email.to_string(),
                password: PASSWORD.to_string(),
                password_confirmation: PASSWORD.to_string(),
            },
        )
        .await
        .expect("Failed to create fixture user")
    }

    pub async fn admin(stores: &Stores) -> User {
        let n = next_sequence();
        seed_admin(
            stores,
            &format!("Admin {n}"),
            &format!("admin-{n}@example.com"),
            PASSWORD,
        )
        .await
        .expect("Failed to create fixture admin")
    }

    pub async fn micropost(stores: &Stores, owner: &User, content: &str) -> Micropost {
        create_micropost(
            stores,
            &SessionUser::from(owner),
            NewMicropost {
                content: content.to_string(),
            },
        )
        .await
        .expect("Failed to create fixture micropost")
    }
}
