pub mod codec;
pub mod errors;
pub mod game;
pub mod messages;
pub mod room;

// Re-export all types
pub use codec::*;
pub use errors::*;
pub use game::*;
pub use messages::*;
pub use room::*;
