use {
    crate::plan::DeploymentPlan,
    anyhow::{Context, Result},
    std::path::Path,
    tokio::fs,
};

/// Loads a deployment plan from a TOML file.
pub async fn load(path: &Path) -> Result<DeploymentPlan> {
    let data = fs::read_to_string(path)
        .await
        .with_context(|| format!("I/O error while reading {}", path.display()))?;
    parse(&data).with_context(|| format!("invalid deployment plan {}", path.display()))
}

pub fn parse(data: &str) -> Result<DeploymentPlan> {
    Ok(toml::de::from_str(data)?)
}
