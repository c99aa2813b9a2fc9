use serde::Deserialize;
use std::path::Path;

use crate::error::NotifierError;

pub const DEFAULT_CATALOG_URL: &str =
    "https://store-site-backend-static.ak.epicgames.com/freeGamesPromotions";
const DEFAULT_STATE_FILE: &str = "sent_games.json";

#[derive(Deserialize, Debug)]
pub struct ApplicationConfig {
    pub bot_token: String,
    pub chat_id: String,
    pub state_file: String,
    pub catalog_url: String,
}

/// Loads settings from an optional TOML file merged with environment
/// variables (BOT_TOKEN, CHAT_ID, STATE_FILE, CATALOG_URL). The
/// environment wins over the file. Missing credentials are a fatal
/// startup condition surfaced before any network call.
pub fn load_config(config_path: Option<&Path>) -> Result<ApplicationConfig, NotifierError> {
    let mut builder = config::Config::builder()
        .set_default("state_file", DEFAULT_STATE_FILE)?
        .set_default("catalog_url", DEFAULT_CATALOG_URL)?;
    if let Some(path) = config_path {
        builder = builder.add_source(config::File::from(path));
    }
    let settings = builder.add_source(config::Environment::default()).build()?;

    Ok(settings.try_deserialize::<ApplicationConfig>()?)
}
