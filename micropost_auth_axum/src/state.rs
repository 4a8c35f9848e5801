use micropost_auth::Stores;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub stores: Stores,
}

impl AppState {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }
}
