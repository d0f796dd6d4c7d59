use clap::Subcommand;
use focusflow_core::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "focus.burnout_bonus_xp", "storage.pretty")
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
}

pub fn run(action: ConfigAction) -> super::CommandResult {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            match config.get(&key) {
                Some(value) => super::print_json(&serde_json::json!({ "key": key, "value": value }))?,
                None => return Err(format!("unknown key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            let value = config.get(&key).unwrap_or(value);
            super::print_json(&serde_json::json!({ "key": key, "value": value }))?;
        }
        ConfigAction::List => {
            print_entries(&Config::load()?)?;
        }
        ConfigAction::Reset => {
            let config = Config::default();
            config.save()?;
            print_entries(&config)?;
        }
    }
    Ok(())
}

fn print_entries(config: &Config) -> super::CommandResult {
    let entries: serde_json::Map<String, serde_json::Value> = config
        .list()
        .into_iter()
        .map(|(k, v)| (k, serde_json::Value::String(v)))
        .collect();
    super::print_json(&entries)
}
