use async_trait::async_trait;

/// A narrow text-completion port. Neither the Planner nor the Remediator
/// know which vendor sits behind it (spec.md §9, "Model-provider IO").
#[async_trait]
pub trait ModelProvider: Send + Sync {
    async fn complete(&self, prompt: &str) -> anyhow::Result<String>;
}

/// A test double that never produces a completion, forcing every caller
/// down the baseline/fallback path.
pub struct NullModelProvider;

#[async_trait]
impl ModelProvider for NullModelProvider {
    async fn complete(&self, _prompt: &str) -> anyhow::Result<String> {
        anyhow::bail!("NullModelProvider never completes")
    }
}
