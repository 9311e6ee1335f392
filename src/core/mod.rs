//! Clipsight Core Engine
//!
//! Core module tree. Handles source classification, playback control,
//! clip analysis, persistence, and view projections.

pub mod analysis;
pub mod clips;
pub mod events;
pub mod export;
pub mod playback;
pub mod source;
pub mod store;
pub mod views;

// Re-export common types
mod types;
pub use types::*;

mod error;
pub use error::*;
