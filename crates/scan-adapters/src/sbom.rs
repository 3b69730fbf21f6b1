//! CycloneDX SBOM generator adapter (spec.md §4.3, §6).

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use scan_core::orchestrator::SbomAdapter;
use tokio::process::Command;

use crate::subprocess::run_with_timeout;

/// Invokes `cyclonedx-py --format json --output <tmp> .` against the repo
/// root. Any non-zero exit or a missing/empty output file is a hard
/// failure — the SCA stage cannot proceed without an SBOM (spec.md §4.3).
pub struct CyclonedxAdapter {
    pub binary: String,
    pub timeout: Duration,
}

impl Default for CyclonedxAdapter {
    fn default() -> Self {
        CyclonedxAdapter {
            binary: "cyclonedx-py".to_string(),
            timeout: Duration::from_secs(120),
        }
    }
}

#[async_trait]
impl SbomAdapter for CyclonedxAdapter {
    async fn generate(&self, repo_path: &Path) -> anyhow::Result<PathBuf> {
        let out_file = tempfile::Builder::new()
            .prefix("sbom-")
            .suffix(".json")
            .tempfile()?;
        let (_file, out_path) = out_file.keep()?;

        let mut command = Command::new(&self.binary);
        command
            .arg("--format")
            .arg("json")
            .arg("--output")
            .arg(&out_path)
            .arg(".")
            .current_dir(repo_path);

        let output = run_with_timeout(command, self.timeout).await?;
        if !output.success() {
            anyhow::bail!(
                "cyclonedx-py failed (exit {:?}): {}",
                output.exit_code,
                output.stderr
            );
        }

        let metadata = tokio::fs::metadata(&out_path)
            .await
            .map_err(|e| anyhow::anyhow!("SBOM output file missing: {e}"))?;
        if metadata.len() == 0 {
            anyhow::bail!("SBOM output file is empty");
        }

        Ok(out_path)
    }
}
