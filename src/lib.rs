//! moirai: profile manager for oh-my-opencode agent configurations
//!
//! This library provides:
//! - Profile discovery, switching, backups and restore
//! - Agent model assignment and autofill presets
//! - A cached model list refreshed from `opencode models`
//! - Terminal UI (TUI) for browsing and editing profiles
//! - One-shot CLI commands

pub mod config;
pub mod core;
pub mod models;
pub mod profile;
pub mod storage;
pub mod transport;
pub mod tui;

pub use config::AppConfig;
pub use crate::core::{DiffError, ModelsError, ProfileError};
pub use profile::{ProfileInfo, RootConfig};
