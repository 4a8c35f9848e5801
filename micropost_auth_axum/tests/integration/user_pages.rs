use crate::common::{Factory, MockBrowser, PASSWORD, SignInMode, TestServer, redirect_location};
use micropost_auth::{count_microposts, find_user};
use reqwest::StatusCode;

#[tokio::test]
async fn test_signup_creates_account_and_signs_in() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::start().await?;
    let browser = MockBrowser::new(&server.base_url);

    let page = browser.visit("/signup").await?;
    assert!(page.has_title_prefix("Sign up"));
    assert!(page.body.contains("action=\"/users\""));

    let response = browser
        .post_form(
            "/users",
            &[
                ("name", "Example User"),
                ("email", "User@Example.com"),
                ("password", "foobar"),
                ("password_confirmation", "foobar"),
            ],
        )
        .await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = redirect_location(&response).ok_or("no redirect")?;
    assert!(location.starts_with("/users/"));

    let profile = browser.settle(response).await?;
    assert!(profile.has_title_prefix("Example User"));
    assert!(profile.has_flash("success", "Welcome to the Sample App!"));
    assert!(profile.has_link("/signout", "Sign out"));

    // flash is shown once
    let again = browser.visit(&location).await?;
    assert!(!again.has_flash("success", "Welcome to the Sample App!"));

    server.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn test_invalid_signup_rerenders_with_errors() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::start().await?;
    let existing = Factory::user(&server.stores).await;
    let browser = MockBrowser::new(&server.base_url);

    let response = browser
        .post_form(
            "/users",
            &[
                ("name", ""),
                ("email", "user@invalid"),
                ("password", "foo"),
                ("password_confirmation", "bar"),
            ],
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let page = browser.settle(response).await?;
    assert!(page.has_title_prefix("Sign up"));
    assert!(page.body.contains("id=\"error_explanation\""));
    assert!(page.body.contains("Email is invalid"));
    assert!(page.body.contains("Password is too short"));

    let shouted = existing.email.to_uppercase();
    let response = browser
        .post_form(
            "/users",
            &[
                ("name", "Copycat"),
                ("email", shouted.as_str()),
                ("password", "foobar"),
                ("password_confirmation", "foobar"),
            ],
        )
        .await?;
    let page = browser.settle(response).await?;
    assert!(page.body.contains("Email has already been taken"));
    assert!(page.has_link("/signin", "Sign in"));

    server.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn test_signed_in_user_skips_signup() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::start().await?;
    let user = Factory::user(&server.stores).await;
    let browser = MockBrowser::new(&server.base_url);
    browser.sign_in(&user, SignInMode::Direct).await?;

    let response = browser.get("/signup").await?;
    assert_eq!(redirect_location(&response).as_deref(), Some("/"));

    server.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn test_profile_page() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::start().await?;
    let user = Factory::user(&server.stores).await;
    Factory::micropost(&server.stores, &user, "Foo").await;
    Factory::micropost(&server.stores, &user, "Bar").await;
    let browser = MockBrowser::new(&server.base_url);

    let page = browser.visit(&format!("/users/{}", user.id)).await?;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.has_title_prefix(&user.name));
    assert!(page.body.contains("Microposts (2)"));
    assert!(page.body.contains("Foo"));
    assert!(page.body.contains("Bar"));
    assert!(page.body.contains("https://secure.gravatar.com/avatar/"));
    // visitors get no delete buttons
    assert!(!page.body.contains("/delete\""));

    let missing = browser.get(&format!("/users/{}", user.id + 100)).await?;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    server.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn test_edit_and_update_own_profile() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::start().await?;
    let user = Factory::user(&server.stores).await;
    let browser = MockBrowser::new(&server.base_url);
    browser.sign_in(&user, SignInMode::Form).await?;

    let edit_path = format!("/users/{}/edit", user.id);
    let page = browser.visit(&edit_path).await?;
    assert!(page.has_title_prefix("Edit user"));
    let token = page.csrf_token().ok_or("no csrf token")?;

    let response = browser
        .post_form(
            &format!("/users/{}", user.id),
            &[
                ("authenticity_token", token.as_str()),
                ("name", "New Name"),
                ("email", "new@example.com"),
                ("password", ""),
                ("password_confirmation", ""),
            ],
        )
        .await?;
    assert_eq!(
        redirect_location(&response),
        Some(format!("/users/{}", user.id))
    );
    let profile = browser.settle(response).await?;
    assert!(profile.has_flash("success", "Profile updated"));
    assert!(profile.has_title_prefix("New Name"));

    let updated = find_user(&server.stores, user.id).await?;
    assert_eq!(updated.name, "New Name");
    assert_eq!(updated.email, "new@example.com");
    // blank password keeps the old one
    assert_eq!(updated.password_digest, user.password_digest);

    server.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn test_invalid_update_rerenders_edit() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::start().await?;
    let user = Factory::user(&server.stores).await;
    let browser = MockBrowser::new(&server.base_url);
    browser.sign_in(&user, SignInMode::Direct).await?;
    let token = browser.csrf_token().await?;

    let response = browser
        .patch_form(
            &format!("/users/{}", user.id),
            &[
                ("authenticity_token", token.as_str()),
                ("name", user.name.as_str()),
                ("email", "foo@invalid"),
                ("password", "foo"),
                ("password_confirmation", "bar"),
            ],
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let page = browser.settle(response).await?;
    assert!(page.has_title_prefix("Edit user"));
    assert!(page.body.contains("Email is invalid"));

    let unchanged = find_user(&server.stores, user.id).await?;
    assert_eq!(unchanged.email, user.email);

    server.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn test_cannot_edit_another_user() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::start().await?;
    let user = Factory::user(&server.stores).await;
    let wrong_user = Factory::user_with_email(&server.stores, "wrong@example.com").await;
    let browser = MockBrowser::new(&server.base_url);
    browser.sign_in(&user, SignInMode::Direct).await?;

    let response = browser
        .get(&format!("/users/{}/edit", wrong_user.id))
        .await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(redirect_location(&response).as_deref(), Some("/"));
    let body = response.text().await?;
    assert!(!body.contains("Edit user"));

    let token = browser.csrf_token().await?;
    let response = browser
        .patch_form(
            &format!("/users/{}", wrong_user.id),
            &[
                ("authenticity_token", token.as_str()),
                ("name", "Hacked"),
                ("email", "hacked@example.com"),
                ("admin", "true"),
            ],
        )
        .await?;
    assert_eq!(redirect_location(&response).as_deref(), Some("/"));
    assert!(!response.text().await?.contains("Edit user"));

    let unchanged = find_user(&server.stores, wrong_user.id).await?;
    assert_eq!(unchanged, wrong_user);

    server.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn test_admin_flag_cannot_be_set_through_update() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::start().await?;
    let user = Factory::user(&server.stores).await;
    let browser = MockBrowser::new(&server.base_url);
    browser.sign_in(&user, SignInMode::Direct).await?;
    let token = browser.csrf_token().await?;

    let response = browser
        .patch_form(
            &format!("/users/{}", user.id),
            &[
                ("authenticity_token", token.as_str()),
                ("name", user.name.as_str()),
                ("email", user.email.as_str()),
                ("password", PASSWORD),
                ("password_confirmation", PASSWORD),
                ("admin", "1"),
            ],
        )
        .await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let reloaded = find_user(&server.stores, user.id).await?;
    assert!(!reloaded.admin);

    server.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn test_update_requires_csrf_token() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::start().await?;
    let user = Factory::user(&server.stores).await;
    let browser = MockBrowser::new(&server.base_url);
    browser.sign_in(&user, SignInMode::Direct).await?;
    let path = format!("/users/{}", user.id);

    let response = browser
        .patch_form(&path, &[("name", "No Token"), ("email", "x@example.com")])
        .await?;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = browser
        .patch_form(
            &path,
            &[
                ("authenticity_token", "forged"),
                ("name", "Bad Token"),
                ("email", "x@example.com"),
            ],
        )
        .await?;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(find_user(&server.stores, user.id).await?.name, user.name);

    // the header works as well as the form field
    let token = browser.csrf_token().await?;
    let response = browser
        .patch_form_with_header(
            &path,
            &[("name", "Header Token"), ("email", user.email.as_str())],
            ("x-csrf-token", token.as_str()),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        find_user(&server.stores, user.id).await?.name,
        "Header Token"
    );

    server.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn test_users_index_pagination() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::start().await?;
    let user = Factory::user(&server.stores).await;
    for _ in 0..31 {
        Factory::user(&server.stores).await;
    }
    let browser = MockBrowser::new(&server.base_url);
    browser.sign_in(&user, SignInMode::Direct).await?;

    let page = browser.visit("/users").await?;
    assert!(page.has_title_prefix("All users"));
    assert!(page.has_link(&format!("/users/{}", user.id), &user.name));
    assert!(page.has_link("/users?page=2", "Next"));
    // regular users get no delete buttons
    assert!(!page.body.contains("/delete\""));

    let second = browser.click_link(&page, "Next").await?;
    assert!(second.has_link("/users?page=1", "Previous"));
    assert!(!second.has_link_text("Next"));

    server.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn test_admin_sees_delete_buttons_for_others() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::start().await?;
    let admin = Factory::admin(&server.stores).await;
    let other = Factory::user(&server.stores).await;
    let browser = MockBrowser::new(&server.base_url);
    browser.sign_in(&admin, SignInMode::Direct).await?;

    let page = browser.visit("/users").await?;
    assert!(
        page.body
            .contains(&format!("action=\"/users/{}/delete\"", other.id))
    );
    assert!(
        !page
            .body
            .contains(&format!("action=\"/users/{}/delete\"", admin.id))
    );

    server.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn test_non_admin_cannot_delete_users() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::start().await?;
    let user = Factory::user(&server.stores).await;
    let target = Factory::user(&server.stores).await;
    let browser = MockBrowser::new(&server.base_url);
    browser.sign_in(&user, SignInMode::Direct).await?;
    let token = browser.csrf_token().await?;

    let response = browser
        .delete(&format!("/users/{}", target.id), Some(token.as_str()))
        .await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(redirect_location(&response).as_deref(), Some("/"));
    assert!(find_user(&server.stores, target.id).await.is_ok());

    server.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn test_admin_cannot_delete_self() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::start().await?;
    let admin = Factory::admin(&server.stores).await;
    let browser = MockBrowser::new(&server.base_url);
    browser.sign_in(&admin, SignInMode::Direct).await?;
    let token = browser.csrf_token().await?;

    let response = browser
        .delete(&format!("/users/{}", admin.id), Some(token.as_str()))
        .await?;
    assert_eq!(redirect_location(&response).as_deref(), Some("/"));
    assert!(find_user(&server.stores, admin.id).await.is_ok());

    server.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn test_admin_deletes_other_user() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::start().await?;
    let admin = Factory::admin(&server.stores).await;
    let target = Factory::user(&server.stores).await;
    Factory::micropost(&server.stores, &target, "Soon gone").await;
    let browser = MockBrowser::new(&server.base_url);
    browser.sign_in(&admin, SignInMode::Direct).await?;
    let token = browser.csrf_token().await?;

    // without the token nothing happens
    let response = browser
        .delete(&format!("/users/{}", target.id), None)
        .await?;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(find_user(&server.stores, target.id).await.is_ok());

    let response = browser
        .post_form(
            &format!("/users/{}/delete", target.id),
            &[("authenticity_token", token.as_str())],
        )
        .await?;
    assert_eq!(redirect_location(&response).as_deref(), Some("/users"));
    let page = browser.settle(response).await?;
    assert!(page.has_flash("success", "User deleted."));

    assert!(find_user(&server.stores, target.id).await.is_err());
    assert_eq!(count_microposts(&server.stores).await?, 0);

    server.shutdown().await;
    Ok(())
}
