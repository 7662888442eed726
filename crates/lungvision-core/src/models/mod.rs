//! Domain models for the LungVision intake system.

mod booking;
mod directory;
mod patient;
mod prediction;

pub use booking::*;
pub use directory::*;
pub use patient::*;
pub use prediction::*;
