//! Page-level configuration

use std::sync::LazyLock;

/// Base title appended to every page title.
/// Default: "Micropost Sample App"
pub static APP_TITLE: LazyLock<String> = LazyLock::new(|| {
    std::env::var("APP_TITLE").unwrap_or_else(|_| "Micropost Sample App".to_string())
});

/// Where anonymous visitors are sent by the access guards
pub(crate) const SIGN_IN_PATH: &str = "/signin";
/// Where signed-in visitors without permission are sent
pub(crate) const ROOT_PATH: &str = "/";

/// `"{title} | {base}"`, or just the base title for the home page.
pub(crate) fn full_title(base: &str, page_title: Option<&str>) -> String {
    match page_title {
        Some(title) if !title.is_empty() => format!("{title} | {base}"),
        _ => base.to_string(),
    }
}
