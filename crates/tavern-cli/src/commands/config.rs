use anyhow::Result;
use std::path::Path;

use crate::ConfigAction;
use crate::config::TavernConfig;

/// Handle config subcommands.
pub fn handle(action: ConfigAction, path: &Path) -> Result<()> {
    match action {
        ConfigAction::Init => {
            if path.exists() {
                println!("Config already exists at: {}", path.display());
                println!("Use `tavern config show` to view it.");
                return Ok(());
            }

            let config = TavernConfig::default();
            config.save(path)?;
            println!("Created default config at: {}", path.display());
            println!();
            print_config(&config)?;
        }

        ConfigAction::Show => {
            let config = TavernConfig::load(path)?;
            print_config(&config)?;
        }
    }
    Ok(())
}

fn print_config(config: &TavernConfig) -> Result<()> {
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
