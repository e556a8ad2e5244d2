pub mod room_code;
pub mod rotation;
pub mod round;
pub mod scoring;
pub mod word_validation;

// Re-export main components
pub use room_code::*;
pub use rotation::*;
pub use round::*;
pub use scoring::*;
pub use word_validation::*;
