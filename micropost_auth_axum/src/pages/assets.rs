use axum::response::IntoResponse;
use http::header::{CACHE_CONTROL, CONTENT_TYPE};

const APP_CSS: &str = include_str!("../../static/app.css");

pub(super) async fn serve_app_css() -> impl IntoResponse {
    (
        [
            (CONTENT_TYPE, "text/css"),
            (CACHE_CONTROL, "public, max-age=3600"),
        ],
        APP_CSS,
    )
}
