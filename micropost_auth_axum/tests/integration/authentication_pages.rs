use crate::common::{
    Factory, MockBrowser, SignInMode, TestServer, redirect_location, set_cookie_pair,
};
use reqwest::StatusCode;

const INVALID_BANNER: &str =
    "<div class=\"alert alert-error\">Invalid email/password combination</div>";

#[tokio::test]
async fn test_signin_page() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::start().await?;
    let browser = MockBrowser::new(&server.base_url);

    let page = browser.visit("/signin").await?;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.has_title_prefix("Sign In"));
    assert!(page.body.contains("<h1>Sign In</h1>"));
    assert!(page.body.contains("value=\"Sign In\""));
    assert!(page.has_link("/signin", "Sign in"));

    server.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn test_invalid_signin_shows_banner_once() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::start().await?;
    let browser = MockBrowser::new(&server.base_url);

    let response = browser.sign_in_with("", "", SignInMode::Form).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let page = browser.settle(response).await?;
    assert!(page.has_title_prefix("Sign In"));
    assert!(page.body.contains(INVALID_BANNER));

    // the banner does not survive navigation
    let home = browser.click_link(&page, "Home").await?;
    assert_eq!(home.path, "/");
    assert!(!home.body.contains(INVALID_BANNER));

    server.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn test_wrong_password_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::start().await?;
    let user = Factory::user(&server.stores).await;
    let browser = MockBrowser::new(&server.base_url);

    let response = browser
        .sign_in_with(&user.email, "not-the-password", SignInMode::Form)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let page = browser.settle(response).await?;
    assert!(page.body.contains(INVALID_BANNER));
    // the submitted email is kept in the form
    assert!(page.body.contains(&format!("value=\"{}\"", user.email)));

    let users = browser.get("/users").await?;
    assert_eq!(redirect_location(&users).as_deref(), Some("/signin"));

    server.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn test_valid_signin_shows_profile_links() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::start().await?;
    let user = Factory::user(&server.stores).await;
    let browser = MockBrowser::new(&server.base_url);

    let response = browser.sign_in(&user, SignInMode::Form).await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let profile_path = format!("/users/{}", user.id);
    assert_eq!(redirect_location(&response), Some(profile_path.clone()));

    let page = browser.settle(response).await?;
    assert_eq!(page.path, profile_path);
    assert!(page.has_title_prefix(&user.name));
    assert!(page.has_link("/users", "Users"));
    assert!(page.has_link(&profile_path, "Profile"));
    assert!(page.has_link(&format!("/users/{}/edit", user.id), "Settings"));
    assert!(page.has_link("/signout", "Sign out"));
    assert!(!page.has_link("/signin", "Sign in"));

    server.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn test_signin_email_is_case_insensitive() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::start().await?;
    let user = Factory::user_with_email(&server.stores, "mixed@example.com").await;
    let browser = MockBrowser::new(&server.base_url);

    let response = browser
        .sign_in_with("MiXeD@Example.COM", crate::common::PASSWORD, SignInMode::Direct)
        .await?;
    assert_eq!(
        redirect_location(&response),
        Some(format!("/users/{}", user.id))
    );

    server.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn test_signout_restores_signin_link() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::start().await?;
    let user = Factory::user(&server.stores).await;
    let browser = MockBrowser::new(&server.base_url);

    browser.sign_in(&user, SignInMode::Form).await?;
    let profile = browser.visit(&format!("/users/{}", user.id)).await?;
    assert!(profile.has_link("/signout", "Sign out"));

    let response = browser.get("/signout").await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(redirect_location(&response).as_deref(), Some("/"));

    let home = browser.settle(response).await?;
    assert!(home.has_link("/signin", "Sign in"));
    assert!(!home.has_link_text("Sign out"));

    // the old session no longer grants access
    let users = browser.get("/users").await?;
    assert_eq!(redirect_location(&users).as_deref(), Some("/signin"));

    server.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn test_friendly_forwarding_is_one_shot() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::start().await?;
    let user = Factory::user(&server.stores).await;
    let browser = MockBrowser::new(&server.base_url);
    let edit_path = format!("/users/{}/edit", user.id);

    let response = browser.get(&edit_path).await?;
    assert_eq!(redirect_location(&response).as_deref(), Some("/signin"));

    let response = browser.sign_in(&user, SignInMode::Form).await?;
    assert_eq!(redirect_location(&response), Some(edit_path.clone()));
    let page = browser.settle(response).await?;
    assert!(page.has_title_prefix("Edit user"));

    // a second sign-in falls back to the profile
    browser.get("/signout").await?;
    let response = browser.sign_in(&user, SignInMode::Form).await?;
    assert_eq!(
        redirect_location(&response),
        Some(format!("/users/{}", user.id))
    );

    server.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn test_non_get_requests_are_not_forwarded() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::start().await?;
    let user = Factory::user(&server.stores).await;
    let browser = MockBrowser::new(&server.base_url);

    let response = browser
        .patch_form(&format!("/users/{}", user.id), &[("name", "Later")])
        .await?;
    assert_eq!(redirect_location(&response).as_deref(), Some("/signin"));

    let response = browser.sign_in(&user, SignInMode::Direct).await?;
    assert_eq!(
        redirect_location(&response),
        Some(format!("/users/{}", user.id))
    );

    server.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn test_protected_actions_redirect_visitors() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::start().await?;
    let user = Factory::user(&server.stores).await;
    let micropost = Factory::micropost(&server.stores, &user, "Still here").await;
    let browser = MockBrowser::new(&server.base_url);

    let responses = [
        browser.get("/users").await?,
        browser.get(&format!("/users/{}/edit", user.id)).await?,
        browser
            .patch_form(&format!("/users/{}", user.id), &[("name", "Nope")])
            .await?,
        browser.delete(&format!("/users/{}", user.id), None).await?,
        browser
            .post_form("/microposts", &[("content", "Lorem ipsum")])
            .await?,
        browser
            .delete(&format!("/microposts/{}", micropost.id), None)
            .await?,
    ];
    for response in responses {
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(redirect_location(&response).as_deref(), Some("/signin"));
    }

    assert_eq!(micropost_auth::count_microposts(&server.stores).await?, 1);
    let unchanged = micropost_auth::find_user(&server.stores, user.id).await?;
    assert_eq!(unchanged.name, user.name);

    server.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn test_tampered_session_cookie_is_anonymous() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::start().await?;
    let user = Factory::user(&server.stores).await;
    let browser = MockBrowser::without_cookies(&server.base_url);

    let response = browser.sign_in(&user, SignInMode::Direct).await?;
    let cookie = set_cookie_pair(&response).ok_or("sign-in did not set a cookie")?;

    let response = browser.get_with_cookie("/users", &cookie).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let tampered = format!("{cookie}x");
    let response = browser.get_with_cookie("/users", &tampered).await?;
    assert_eq!(redirect_location(&response).as_deref(), Some("/signin"));

    let (name, value) = cookie.split_once('=').ok_or("malformed cookie")?;
    let session_id = value.split('.').next().unwrap_or_default();
    let unsigned = format!("{name}={session_id}");
    let response = browser.get_with_cookie("/users", &unsigned).await?;
    assert_eq!(redirect_location(&response).as_deref(), Some("/signin"));

    server.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn test_static_pages() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::start().await?;
    let browser = MockBrowser::new(&server.base_url);

    let home = browser.visit("/").await?;
    assert_eq!(home.status, StatusCode::OK);
    assert_eq!(home.title(), Some(micropost_auth_axum::APP_TITLE.as_str()));
    assert!(home.has_link("/signup", "Sign up now!"));
    assert!(home.has_link("/", "Home"));
    assert!(home.has_link("/help", "Help"));

    for (path, title) in [("/help", "Help"), ("/about", "About"), ("/contact", "Contact")] {
        let page = browser.visit(path).await?;
        assert_eq!(page.status, StatusCode::OK);
        assert!(page.has_title_prefix(title), "{path} title");
    }

    let css = browser.get("/assets/app.css").await?;
    assert_eq!(css.status(), StatusCode::OK);
    assert_eq!(css.headers()["content-type"], "text/css");

    server.shutdown().await;
    Ok(())
}
