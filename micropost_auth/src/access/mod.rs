//! Guard chains deciding whether the current user may perform an action.

mod evaluate;
mod types;

pub use evaluate::{authenticate, evaluate};
pub use types::{AccessOutcome, AccessRequest, Action, Guard};
