//! `opencode models` invocation

use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use crate::core::ModelsError;

/// Upper bound on a single `opencode models` run
pub const LIST_MODELS_TIMEOUT: Duration = Duration::from_secs(4);

/// Models reported by `opencode models`
pub fn list_models() -> Result<Vec<String>, ModelsError> {
    list_models_with("opencode", &["models"], LIST_MODELS_TIMEOUT)
}

/// Run `program args...` and parse its stdout as a model list.
///
/// Output is trimmed, deduplicated and sorted. The child is killed when the
/// timeout elapses.
pub fn list_models_with(
    program: &str,
    args: &[&str],
    timeout: Duration,
) -> Result<Vec<String>, ModelsError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run_lister(program, args, timeout))
}

async fn run_lister(
    program: &str,
    args: &[&str],
    timeout: Duration,
) -> Result<Vec<String>, ModelsError> {
    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| ModelsError::ListerFailed(e.to_string()))?;

    let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(result) => result?,
        Err(_) => return Err(ModelsError::ListerTimedOut(timeout)),
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let mut reason = output.status.to_string();
        if !stderr.is_empty() {
            reason = format!("{reason}: {stderr}");
        }
        return Err(ModelsError::ListerFailed(reason));
    }

    let models = normalize(&String::from_utf8_lossy(&output.stdout));
    if models.is_empty() {
        return Err(ModelsError::Empty);
    }
    tracing::debug!("{} listed {} models", program, models.len());
    Ok(models)
}

fn normalize(stdout: &str) -> Vec<String> {
    let mut models = super::cache::parse_lines(stdout);
    models.sort();
    models.dedup();
    models
}
