//! On-disk model list cache
//!
//! `models.txt` holds one model per line; `models.meta.json` records when and
//! from where the list was refreshed. Cache age is taken from the mtime of
//! `models.txt`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::core::{fsutil, ModelsError};

const MODELS_FILE: &str = "models.txt";
const META_FILE: &str = "models.meta.json";
const META_VERSION: u32 = 1;

/// Contents of `models.meta.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CacheMeta {
    pub updated_at: String,
    pub source: String,
    pub version: u32,
}

/// Model list cache rooted at `<config home>/opencode/moirai`
#[derive(Debug, Clone)]
pub struct ModelCache {
    dir: PathBuf,
}

impl ModelCache {
    pub fn new(config_home: &Path) -> Self {
        Self {
            dir: config_home.join("opencode").join("moirai"),
        }
    }

    /// Cache under the platform config dir (honors `XDG_CONFIG_HOME`)
    pub fn default_location() -> Result<Self, ModelsError> {
        dirs::config_dir()
            .map(|home| Self::new(&home))
            .ok_or(ModelsError::NoCacheHome)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn models_path(&self) -> PathBuf {
        self.dir.join(MODELS_FILE)
    }

    fn meta_path(&self) -> PathBuf {
        self.dir.join(META_FILE)
    }

    /// Cached models, `None` when the cache is missing or empty
    pub fn load(&self) -> Result<Option<Vec<String>>, ModelsError> {
        let data = match fs::read_to_string(self.models_path()) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let models = parse_lines(&data);
        Ok((!models.is_empty()).then_some(models))
    }

    /// Replace the cached list and its metadata
    pub fn save(&self, models: &[String]) -> Result<(), ModelsError> {
        fs::create_dir_all(&self.dir)?;
        let mut content = models.join("\n");
        if !content.is_empty() {
            content.push('\n');
        }
        fsutil::write_atomic(&self.models_path(), content.as_bytes(), Some(0o644))?;

        let meta = CacheMeta {
            updated_at: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            source: "opencode models".to_string(),
            version: META_VERSION,
        };
        let mut meta_json = serde_json::to_string_pretty(&meta)?;
        meta_json.push('\n');
        fsutil::write_atomic(&self.meta_path(), meta_json.as_bytes(), Some(0o644))?;
        tracing::info!("Cached {} models in {}", models.len(), self.dir.display());
        Ok(())
    }

    /// Time since the list was last written, `None` if never
    pub fn age(&self) -> Result<Option<Duration>, ModelsError> {
        let meta = match fs::metadata(self.models_path()) {
            Ok(meta) => meta,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let modified = meta.modified()?;
        Ok(Some(
            SystemTime::now()
                .duration_since(modified)
                .unwrap_or(Duration::ZERO),
        ))
    }
}

/// Trimmed, non-blank lines
pub fn parse_lines(data: &str) -> Vec<String> {
    data.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
