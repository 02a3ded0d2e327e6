//! Screens of the interactive app
//!
//! Each screen keeps its own sub-state and adds key handling and rendering
//! to [`App`](super::app::App).

pub mod agents;
pub mod backups;
pub mod diff;
pub mod models;
pub mod profiles;
