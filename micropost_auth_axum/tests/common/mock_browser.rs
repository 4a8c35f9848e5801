use reqwest::header::{COOKIE, LOCATION, SET_COOKIE};
use reqwest::{Client, Response, StatusCode};

use micropost_auth::User;

use super::fixtures::PASSWORD;

const MAX_REDIRECTS: usize = 5;

/// How a test signs in.
#[derive(Debug, Clone, Copy)]
pub enum SignInMode {
    /// Load the sign-in page first and submit its form
    Form,
    /// POST the credentials straight to `/sessions`
    Direct,
}

/// A rendered page reached through [`MockBrowser::visit`].
#[derive(Debug)]
pub struct Page {
    pub status: StatusCode,
    /// Path of the final URL after redirects
    pub path: String,
    pub body: String,
}

impl Page {
    async fn from_response(response: Response) -> Result<Self, Box<dyn std::error::Error>> {
        let status = response.status();
        let path = response.url().path().to_string();
        let body = response.text().await?;
        Ok(Self { status, path, body })
    }

    /// `<a href="{href}">{text}</a>` appears on the page
    pub fn has_link(&self, href: &str, text: &str) -> bool {
        self.body.contains(&format!("<a href=\"{href}\">{text}</a>"))
    }

    /// Any link with this text, wherever it points
    pub fn has_link_text(&self, text: &str) -> bool {
        self.find_link(text).is_some()
    }

    pub fn title(&self) -> Option<&str> {
        let start = self.body.find("<title>")? + "<title>".len();
        let end = self.body[start..].find("</title>")? + start;
        Some(&self.body[start..end])
    }

    pub fn has_title_prefix(&self, title: &str) -> bool {
        self.title()
            .is_some_and(|t| t.starts_with(&format!("{title} | ")))
    }

    pub fn has_flash(&self, kind: &str, message: &str) -> bool {
        self.body
            .contains(&format!("<div class=\"alert alert-{kind}\">{message}</div>"))
    }

    /// The session CSRF token from the `csrf-token` meta tag
    pub fn csrf_token(&self) -> Option<String> {
        let marker = "<meta name=\"csrf-token\" content=\"";
        let start = self.body.find(marker)? + marker.len();
        let end = self.body[start..].find('"')? + start;
        Some(self.body[start..end].to_string())
    }

    /// `href` of the first link whose text is exactly `text`
    pub fn find_link(&self, text: &str) -> Option<String> {
        let closing = format!("\">{text}</a>");
        let end = self.body.find(&closing)?;
        let start = self.body[..end].rfind("href=\"")? + "href=\"".len();
        Some(self.body[start..end].to_string())
    }
}

/// Mock browser client for integration testing
///
/// Keeps cookies like a browser but leaves redirects to the test so each hop
/// can be asserted.
pub struct MockBrowser {
    client: Client,
    base_url: String,
}

impl MockBrowser {
    pub fn new(base_url: &str) -> Self {
        Self::build(base_url, true)
    }

    /// A client that never stores cookies; send them by hand.
    pub fn without_cookies(base_url: &str) -> Self {
        Self::build(base_url, false)
    }

    fn build(base_url: &str, use_cookies: bool) -> Self {
        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .cookie_store(use_cookies)
            .build()
            .unwrap();

        Self {
            client,
            base_url: base_url.to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get(&self, path: &str) -> Result<Response, reqwest::Error> {
        self.client.get(self.url(path)).send().await
    }

    pub async fn get_with_cookie(
        &self,
        path: &str,
        cookie: &str,
    ) -> Result<Response, reqwest::Error> {
        self.client
            .get(self.url(path))
            .header(COOKIE, cookie)
            .send()
            .await
    }

    pub async fn post_form(
        &self,
        path: &str,
        form_data: &[(&str, &str)],
    ) -> Result<Response, reqwest::Error> {
        self.client.post(self.url(path)).form(form_data).send().await
    }

    pub async fn patch_form(
        &self,
        path: &str,
        form_data: &[(&str, &str)],
    ) -> Result<Response, reqwest::Error> {
        self.client
            .patch(self.url(path))
            .form(form_data)
            .send()
            .await
    }

    pub async fn patch_form_with_header(
        &self,
        path: &str,
        form_data: &[(&str, &str)],
        header: (&str, &str),
    ) -> Result<Response, reqwest::Error> {
        self.client
            .patch(self.url(path))
            .header(header.0, header.1)
            .form(form_data)
            .send()
            .await
    }

    /// A bodiless DELETE, optionally carrying the CSRF token header
    pub async fn delete(
        &self,
        path: &str,
        csrf_token: Option<&str>,
    ) -> Result<Response, reqwest::Error> {
        let mut request = self.client.delete(self.url(path));
        if let Some(token) = csrf_token {
            request = request.header("x-csrf-token", token);
        }
        request.send().await
    }

    /// Follow a redirect response with a GET
    pub async fn follow_redirect(
        &self,
        response: Response,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let location = redirect_location(&response).ok_or("No location header found")?;
        Ok(self.get(&location).await?)
    }

    /// GET `path` and follow redirects to the final page.
    pub async fn visit(&self, path: &str) -> Result<Page, Box<dyn std::error::Error>> {
        let response = self.get(path).await?;
        self.settle(response).await
    }

    /// Follow redirects from `response` to the final page.
    pub async fn settle(&self, mut response: Response) -> Result<Page, Box<dyn std::error::Error>> {
        for _ in 0..MAX_REDIRECTS {
            if !response.status().is_redirection() {
                return Page::from_response(response).await;
            }
            response = self.follow_redirect(response).await?;
        }
        Err("Too many redirects".into())
    }

    /// Click the first link labelled `text` on `page`.
    pub async fn click_link(
        &self,
        page: &Page,
        text: &str,
    ) -> Result<Page, Box<dyn std::error::Error>> {
        let href = page
            .find_link(text)
            .ok_or_else(|| format!("No link labelled {text:?}"))?;
        self.visit(&href).await
    }

    /// Submit the sign-in form. The response is returned unfollowed.
    pub async fn sign_in_with(
        &self,
        email: &str,
        password: &str,
        mode: SignInMode,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        if let SignInMode::Form = mode {
            let page = self.visit("/signin").await?;
            assert!(page.body.contains("action=\"/sessions\""));
        }
        Ok(self
            .post_form("/sessions", &[("email", email), ("password", password)])
            .await?)
    }

    pub async fn sign_in(
        &self,
        user: &User,
        mode: SignInMode,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        self.sign_in_with(&user.email, PASSWORD, mode).await
    }

    /// The current session's CSRF token, read from the home page.
    pub async fn csrf_token(&self) -> Result<String, Box<dyn std::error::Error>> {
        let page = self.visit("/").await?;
        Ok(page.csrf_token().ok_or("No csrf-token meta tag")?)
    }
}

/// Path the response redirects to, if it is a redirect
pub fn redirect_location(response: &Response) -> Option<String> {
    if !response.status().is_redirection() {
        return None;
    }
    response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// `name=value` of the first cookie the response sets
pub fn set_cookie_pair(response: &Response) -> Option<String> {
    response
        .headers()
        .get(SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|cookie| cookie.split(';').next())
        .map(str::to_string)
}
