mod errors;
mod storage;
mod types;

pub use errors::MicropostError;
pub use types::{Micropost, NewMicropost};

pub(crate) use storage::MicropostStore;
