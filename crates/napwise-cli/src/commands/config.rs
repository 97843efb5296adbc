use clap::Subcommand;
use napwise_core::{hash_passphrase, Config};

use super::{CmdResult, Context};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "space", "calendar.time_zone")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// List all config values
    List,
    /// Reset config to defaults
    Reset,
    /// Set the household passphrase; an empty value turns the check off
    SetPassphrase {
        #[arg(id = "new_passphrase", value_name = "PASSPHRASE")]
        passphrase: String,
    },
}

pub fn run(action: ConfigAction, ctx: &Context) -> CmdResult {
    match action {
        ConfigAction::Get { key } => {
            let config = ctx.config()?;
            let value = config.get(&key).ok_or(format!("unknown key: {key}"))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let mut config = ctx.config()?;
            ctx.authorize(&config)?;
            config.set(&key, &value)?;
            config.save()?;
            println!("ok");
        }
        ConfigAction::List => {
            let config = ctx.config()?;
            let json = serde_json::to_string_pretty(&config)?;
            println!("{json}");
        }
        ConfigAction::Reset => {
            ctx.authorize(&ctx.config()?)?;
            let config = Config::default();
            config.save()?;
            println!("config reset to defaults");
        }
        ConfigAction::SetPassphrase { passphrase } => {
            let mut config = ctx.config()?;
            ctx.authorize(&config)?;
            config.access.passphrase_sha256 = if passphrase.is_empty() {
                String::new()
            } else {
                hash_passphrase(&passphrase)
            };
            config.save()?;
            if passphrase.is_empty() {
                println!("passphrase removed");
            } else {
                println!("passphrase set");
            }
        }
    }
    Ok(())
}
