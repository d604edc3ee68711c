use colored::*;
use playgate::config::Config;
use playgate::error::{PlaygateError, Result};
use std::path::Path;

pub fn show(config: &Config, path: &Path) -> Result<()> {
    let toml_string =
        toml::to_string_pretty(config).map_err(|e| PlaygateError::ConfigError(e.to_string()))?;

    eprintln!("{} {}", "# config:".dimmed(), path.display());
    println!("{}", toml_string);
    Ok(())
}

pub fn init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(PlaygateError::ConfigError(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    Config::default().save(path)?;
    eprintln!("{} Wrote default config to {}", "[OK]".green(), path.display());
    Ok(())
}
