use anyhow::Context;
use hilo_config::HiloConfig;

/// Layered configuration followed by range checks.
pub fn load_config() -> anyhow::Result<HiloConfig> {
    let config = HiloConfig::load().context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;
    Ok(config)
}

/// Load `.env` from the current directory so it can feed both `HILO_LOG`
/// and the `HILO_*` configuration layer.
pub fn load_dotenv() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    let env_path = cwd.join(".env");
    if env_path.exists() {
        dotenvy::from_path(&env_path)
            .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
    }
    Ok(())
}
