pub mod patch;
pub mod snapshot;
pub mod store;

pub use patch::*;
pub use snapshot::*;
pub use store::*;
