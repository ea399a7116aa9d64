use anyhow::{bail, Result};

use carousel3d_core::AppConfig;

/// Print the effective configuration
pub fn show(config: &AppConfig) -> Result<()> {
    println!("# {}", AppConfig::config_path().display());
    print!("{}", config.to_toml()?);
    Ok(())
}

/// Write the default configuration file
pub fn init(force: bool) -> Result<()> {
    let path = AppConfig::config_path();
    if path.exists() && !force {
        bail!(
            "Config file already exists at {}\nUse --force to overwrite it.",
            path.display()
        );
    }

    AppConfig::default().save()?;
    tracing::info!("Wrote default config to {}", path.display());
    println!("Wrote {}", path.display());
    Ok(())
}
