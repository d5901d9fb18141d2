use clap::Subcommand;
use coinfocus_core::session::RoundPlan;
use coinfocus_core::{Config, ConfigError};
use serde_json::json;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "session.rest_duration_secs")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value (arrays as JSON, e.g. "[10, 20]")
        value: String,
    },
    /// List all config values, with the numbered task presets
    List,
    /// Reset config to defaults
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            let value = config.get(&key).ok_or(ConfigError::UnknownKey(key))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            println!("ok");
        }
        ConfigAction::List => {
            let config = Config::load()?;
            let presets: Vec<_> = config
                .session
                .task_options
                .iter()
                .enumerate()
                .map(|(i, minutes)| {
                    let round = config.session.round_minutes_for(f64::from(*minutes));
                    let rounds = RoundPlan::from_minutes(f64::from(*minutes), round)
                        .map(|plan| plan.total_rounds)
                        .ok();
                    json!({ "preset": i + 1, "minutes": minutes, "rounds": rounds })
                })
                .collect();
            let json = serde_json::to_string_pretty(&json!({
                "session": config.session,
                "presets": presets,
            }))?;
            println!("{json}");
        }
        ConfigAction::Reset => {
            let config = Config::default();
            config.save()?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}
