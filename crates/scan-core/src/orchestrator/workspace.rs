use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::TempDir;
use tokio::process::Command;
use tokio::time::timeout;

/// The resolved checkout the orchestrator dispatches analyzers against.
/// Owns a [`TempDir`] when the workspace was cloned, so cleanup happens on
/// drop in addition to the explicit cleanup step — every exit path,
/// including a panic unwinding through the call, leaves no temp files
/// behind (SPEC_FULL.md §4.5).
pub struct Workspace {
    path: PathBuf,
    _temp: Option<TempDir>,
}

impl Workspace {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_temp(&self) -> bool {
        self._temp.is_some()
    }
}

const CLONE_TIMEOUT: Duration = Duration::from_secs(60);

/// Resolves `repo_path` into a [`Workspace`]: a shallow clone into a fresh
/// temp directory for `http(s)://` URLs, or the path as-is for a local
/// checkout (spec.md §4.5 step 5).
pub async fn resolve_workspace(repo_path: &str) -> Result<Workspace, String> {
    if !repo_path.starts_with("http") {
        return Ok(Workspace {
            path: PathBuf::from(repo_path),
            _temp: None,
        });
    }

    let temp = TempDir::new().map_err(|e| format!("failed to create temp dir: {e}"))?;
    let dest = temp.path().to_path_buf();

    let spawn = Command::new("git")
        .args(["clone", "--depth", "1", repo_path])
        .arg(&dest)
        .kill_on_drop(true)
        .output();

    let output = timeout(CLONE_TIMEOUT, spawn)
        .await
        .map_err(|_| format!("git clone of '{repo_path}' timed out"))?
        .map_err(|e| format!("failed to spawn git: {e}"))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("git clone of '{repo_path}' failed: {stderr}"));
    }

    Ok(Workspace {
        path: dest,
        _temp: Some(temp),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn local_path_is_used_directly_without_cloning() {
        let ws = resolve_workspace("/tmp/already-checked-out").await.unwrap();
        assert_eq!(ws.path(), Path::new("/tmp/already-checked-out"));
        assert!(!ws.is_temp());
    }

    #[tokio::test]
    async fn unreachable_remote_url_fails_cleanly() {
        let result = resolve_workspace("https://invalid.invalid/does-not-exist.git").await;
        assert!(result.is_err());
    }
}
