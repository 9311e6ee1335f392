//! Clip Domain Models
//!
//! Scored highlight intervals and the video records they belong to.

mod models;
pub use models::*;
