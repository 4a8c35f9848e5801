use http::Method;

/// A single check in an action's guard chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// Someone must be signed in
    SignedIn,
    /// The actor must be the user the action targets
    CorrectUser,
    /// The actor must be an admin
    Admin,
    /// The actor must not be the user the action targets
    NotSelf,
    /// The actor must own the micropost
    MicropostOwner,
}

/// A protected controller action and the record it targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ListUsers,
    EditUser(i64),
    UpdateUser(i64),
    DestroyUser(i64),
    CreateMicropost,
    DestroyMicropost { owner_id: i64 },
}

impl Action {
    /// Guards in evaluation order; the first rejection wins.
    pub fn guards(&self) -> &'static [Guard] {
        match self {
            Action::ListUsers | Action::CreateMicropost => &[Guard::SignedIn],
            Action::EditUser(_) | Action::UpdateUser(_) => &[Guard::SignedIn, Guard::CorrectUser],
            Action::DestroyUser(_) => &[Guard::SignedIn, Guard::Admin, Guard::NotSelf],
            Action::DestroyMicropost { .. } => &[Guard::SignedIn, Guard::MicropostOwner],
        }
    }

    /// The user record the action is about, if any.
    pub fn target_user(&self) -> Option<i64> {
        match self {
            Action::EditUser(id) | Action::UpdateUser(id) | Action::DestroyUser(id) => Some(*id),
            Action::DestroyMicropost { owner_id } => Some(*owner_id),
            Action::ListUsers | Action::CreateMicropost => None,
        }
    }
}

/// The parts of the incoming request the guards look at.
#[derive(Debug, Clone)]
pub struct AccessRequest {
    pub method: Method,
    /// Path with query string, as requested
    pub path: String,
}

impl AccessRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessOutcome {
    Allow,
    /// Not signed in. `forward_to` is where to go after signing in.
    RedirectToSignIn { forward_to: Option<String> },
    /// Signed in but not permitted.
    RedirectToRoot,
}

impl AccessOutcome {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessOutcome::Allow)
    }
}
