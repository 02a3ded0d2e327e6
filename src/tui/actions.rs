//! Side effects available to the TUI
//!
//! The state machine never touches the filesystem or spawns processes
//! itself; it calls through this table. Override single entries with struct
//! update syntax, every other entry keeps its default:
//!
//! ```ignore
//! let actions = Actions {
//!     apply_profile: Rc::new(|_, _| Ok(())),
//!     ..Actions::default()
//! };
//! ```

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use crate::models::{self, ModelCache};
use crate::profile::{self, config, diff, Preset, RootConfig};
use crate::storage;

pub type ApplyFn = Rc<dyn Fn(&Path, &str) -> Result<()>>;
pub type ListBackupsFn = Rc<dyn Fn(&Path, &str) -> Result<Vec<String>>>;
pub type ActiveProfileFn = Rc<dyn Fn(&Path) -> Result<Option<String>>>;
pub type DiffLastBackupFn = Rc<dyn Fn(&Path, &str) -> Result<Option<String>>>;
pub type DiffBetweenFn = Rc<dyn Fn(&Path, &str, &str) -> Result<String>>;
pub type LoadProfileFn = Rc<dyn Fn(&Path) -> Result<RootConfig>>;
pub type SaveProfileFn = Rc<dyn Fn(&Path, &RootConfig) -> Result<()>>;
pub type BackupProfileFn = Rc<dyn Fn(&Path, &str) -> Result<PathBuf>>;
pub type AutofillFn = Rc<dyn Fn(&mut RootConfig, &[&str], &Preset) -> bool>;
pub type LoadModelsFn = Rc<dyn Fn() -> Vec<String>>;
pub type CacheAgeFn = Rc<dyn Fn() -> Option<Duration>>;
pub type ListModelsFn = Rc<dyn Fn() -> Result<Vec<String>>>;
pub type SaveModelsFn = Rc<dyn Fn(&[String]) -> Result<()>>;

/// Capability table injected into [`App`](super::app::App)
#[derive(Clone)]
pub struct Actions {
    pub apply_profile: ApplyFn,
    pub list_backups: ListBackupsFn,
    pub active_profile: ActiveProfileFn,
    /// Diff against the newest backup, `None` when there is no backup
    pub diff_against_last_backup: DiffLastBackupFn,
    pub diff_between_profiles: DiffBetweenFn,
    pub load_profile: LoadProfileFn,
    pub save_profile: SaveProfileFn,
    pub backup_profile: BackupProfileFn,
    pub apply_autofill: AutofillFn,
    /// Bounded cache read for opening the model picker
    pub load_model_list: LoadModelsFn,
    pub model_cache_age: CacheAgeFn,
    /// Fresh list from the external lister
    pub list_models: ListModelsFn,
    pub save_model_cache: SaveModelsFn,
}

impl Default for Actions {
    fn default() -> Self {
        Self {
            apply_profile: Rc::new(|dir, name| Ok(storage::apply_profile(dir, name)?)),
            list_backups: Rc::new(|dir, name| Ok(storage::list_profile_backups(dir, name)?)),
            active_profile: Rc::new(|dir| Ok(storage::active_profile(dir)?)),
            diff_against_last_backup: Rc::new(diff_against_last_backup),
            diff_between_profiles: Rc::new(|dir, a, b| Ok(diff::diff_profiles(dir, a, b)?)),
            load_profile: Rc::new(|path| Ok(config::load_profile(path)?)),
            save_profile: Rc::new(|path, cfg| Ok(config::save_profile(path, cfg)?)),
            backup_profile: Rc::new(|dir, name| Ok(storage::backup_profile(dir, name)?)),
            apply_autofill: Rc::new(profile::apply_autofill),
            load_model_list: Rc::new(models::load_model_list),
            model_cache_age: Rc::new(default_cache_age),
            list_models: Rc::new(|| Ok(models::opencode::list_models()?)),
            save_model_cache: Rc::new(|list| Ok(ModelCache::default_location()?.save(list)?)),
        }
    }
}

impl std::fmt::Debug for Actions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Actions { .. }")
    }
}

fn diff_against_last_backup(dir: &Path, name: &str) -> Result<Option<String>> {
    let Some(backup) = storage::latest_profile_backup(dir, name)? else {
        return Ok(None);
    };
    Ok(Some(diff::diff_profile_against_file(dir, name, &backup)?))
}

fn default_cache_age() -> Option<Duration> {
    match ModelCache::default_location().and_then(|cache| cache.age()) {
        Ok(age) => age,
        Err(e) => {
            tracing::warn!("Cannot read model cache age: {}", e);
            None
        }
    }
}
