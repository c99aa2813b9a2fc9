mod caption;
mod catalog_client;
mod config;
mod error;
mod notification;
mod notifier;
mod state;

use clap::{App, Arg};
use log::{error, info};
use std::path::Path;
use std::process;

use crate::catalog_client::EpicStoreClient;
use crate::error::NotifierError;
use crate::notification::TelegramClient;
use crate::state::SentStore;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = App::new("Epic Free Games Notifier")
        .about("Announces newly free Epic Games Store offers to a Telegram chat")
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("FILE")
                .help("Sets a custom config file")
                .takes_value(true),
        )
        .get_matches();

    match run(matches.value_of("config")).await {
        Ok(0) => info!("no new free offers"),
        Ok(count) => info!("announced {} new offer(s)", count),
        Err(err) => {
            error!("{}", err);
            process::exit(1);
        }
    }
}

async fn run(config_path: Option<&str>) -> Result<usize, NotifierError> {
    let app_config = config::load_config(config_path.map(Path::new))?;

    let client = EpicStoreClient::new(app_config.catalog_url);
    let offers = client.fetch_free_offers().await?;
    info!("catalog currently lists {} free offer(s)", offers.len());

    let store = SentStore::new(&app_config.state_file);
    let telegram = TelegramClient::new(app_config.bot_token, app_config.chat_id);
    notifier::announce_new_offers(&telegram, &store, &offers).await
}
