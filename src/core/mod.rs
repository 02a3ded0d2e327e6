//! Core domain modules
//!
//! Error types and filesystem helpers shared by the profile, storage and
//! models layers.

pub mod errors;
pub mod fsutil;

pub use errors::{DiffError, ModelsError, ProfileError};
