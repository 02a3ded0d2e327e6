//! Model list for the model picker
//!
//! The picker opens with whatever the disk cache yields inside a short
//! budget, falling back to a built-in list. A refresh from `opencode models`
//! runs as deferred work when the cache is stale or when forced.

pub mod cache;
pub mod opencode;

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crate::core::ModelsError;

pub use cache::ModelCache;

/// How long opening the picker may wait on the disk cache
pub const CACHE_READ_BUDGET: Duration = Duration::from_millis(50);

/// Cache freshness window for background refreshes
pub const CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

const DEFAULT_MODELS: &[&str] = &[
    "gpt-4o-mini",
    "gpt-4o",
    "gpt-4.1",
    "gpt-4.1-mini",
    "gpt-4.1-nano",
    "gpt-4.5-preview",
    "o1-mini",
    "o1-preview",
];

/// Built-in list used when the cache cannot supply one in time
pub fn default_model_list() -> Vec<String> {
    DEFAULT_MODELS.iter().map(|m| m.to_string()).collect()
}

/// Race `read` on its own thread against `budget`.
///
/// Whichever finishes first wins. A read that loses the race keeps running
/// but its result is dropped with the channel. Errors and empty results fall
/// back to the default list.
pub fn load_model_list_within<F>(read: F, budget: Duration) -> Vec<String>
where
    F: FnOnce() -> Result<Option<Vec<String>>, ModelsError> + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(read());
    });

    match rx.recv_timeout(budget) {
        Ok(Ok(Some(models))) if !models.is_empty() => models,
        Ok(Ok(_)) => default_model_list(),
        Ok(Err(e)) => {
            tracing::warn!("Model cache read failed: {}", e);
            default_model_list()
        }
        Err(_) => {
            tracing::debug!("Model cache read exceeded {:?}, using defaults", budget);
            default_model_list()
        }
    }
}

/// Cached models from the default cache location, bounded by the read budget
pub fn load_model_list() -> Vec<String> {
    load_model_list_within(
        || match ModelCache::default_location() {
            Ok(cache) => cache.load(),
            Err(e) => Err(e),
        },
        CACHE_READ_BUDGET,
    )
}

/// Whether a refresh should run for a cache of the given age
pub fn refresh_due(age: Option<Duration>, ttl: Duration, force: bool) -> bool {
    force || age.map_or(true, |age| age >= ttl)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_cached_list_wins_within_budget() {
        let models = load_model_list_within(
            || Ok(Some(vec!["cached".to_string()])),
            Duration::from_secs(1),
        );
        assert_eq!(models, vec!["cached"]);
    }

    #[test]
    fn test_slow_read_falls_back_without_blocking() {
        let budget = Duration::from_millis(30);
        let start = Instant::now();
        let models = load_model_list_within(
            || {
                thread::sleep(Duration::from_millis(500));
                Ok(Some(vec!["late".to_string()]))
            },
            budget,
        );
        assert_eq!(models, default_model_list());
        assert!(start.elapsed() < Duration::from_millis(400));
    }

    #[test]
    fn test_errors_and_empty_fall_back() {
        let models = load_model_list_within(|| Err(ModelsError::Empty), Duration::from_secs(1));
        assert_eq!(models, default_model_list());
        let models = load_model_list_within(|| Ok(None), Duration::from_secs(1));
        assert_eq!(models, default_model_list());
        let models = load_model_list_within(|| Ok(Some(Vec::new())), Duration::from_secs(1));
        assert_eq!(models, default_model_list());
    }

    #[test]
    fn test_refresh_due() {
        let ttl = Duration::from_secs(10);
        assert!(refresh_due(None, ttl, false));
        assert!(!refresh_due(Some(Duration::from_secs(1)), ttl, false));
        assert!(refresh_due(Some(Duration::from_secs(1)), ttl, true));
        assert!(refresh_due(Some(Duration::from_secs(10)), ttl, false));
    }
}
