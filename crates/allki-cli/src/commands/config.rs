use anyhow::{Context, Result, bail};
use colored::Colorize;

use allki_core::config::AppConfig;

use crate::app::App;

pub fn show(app: &App) -> Result<()> {
    let mut config = app.config.clone();
    if config.llm.api_key.is_some() {
        config.llm.api_key = Some("********".to_string());
    }
    println!("{}", format!("# config: {}", app.paths.config_file().display()).bright_black());
    println!("{}", format!("# data:   {}", app.paths.data_dir().display()).bright_black());
    print!("{}", config.to_toml_string()?);
    Ok(())
}

pub fn init(app: &App, force: bool) -> Result<()> {
    let path = app.paths.config_file();
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    std::fs::create_dir_all(app.paths.config_dir())
        .with_context(|| format!("Failed to create {}", app.paths.config_dir().display()))?;
    std::fs::write(&path, AppConfig::default().to_toml_string()?)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("{}", format!("Wrote {}", path.display()).green());
    Ok(())
}
