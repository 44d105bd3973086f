#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

use std::{env, sync::Arc};

use serenity::{http::Http, prelude::GatewayIntents, Client};
use sqlx::postgres::PgPoolOptions;
use tracing::{error, info};

mod commands;
mod common;
mod database;
mod engine;
mod events;
mod gateways;
mod models;
mod notify;

use database::postgres::{economy::PostgresRewardLedger, giveaway::PostgresGiveawayStore};

#[tokio::main]
async fn main() {
    let log_level = match env::var("DEBUG").unwrap_or(false.to_string()).as_str() {
        "true" => tracing::Level::DEBUG,
        _ => tracing::Level::INFO,
    };
    tracing_subscriber::fmt().with_max_level(log_level).init();

    info!("Getting environment variables");
    let discord_token = env::var("DISCORD_TOKEN").unwrap();
    let db_username = env::var("DB_USER").unwrap_or("postgres".to_string());
    let db_password = env::var("DB_PASSWORD").unwrap();
    let db_host = env::var("DB_HOST").unwrap_or("localhost".to_string());
    let db_port = env::var("DB_PORT").unwrap_or("5432".to_string());
    let db_name = env::var("DB_NAME").unwrap_or("postgres".to_string());

    let connection_url =
        format!("postgres://{db_username}:{db_password}@{db_host}:{db_port}/{db_name}");
    info!("Establishing connection to database");
    let pool = PgPoolOptions::new().connect(&connection_url).await.unwrap();
    info!("Running outstanding migrations");
    sqlx::migrate!().run(&pool).await.unwrap();
    info!("Connected to database");

    // The engine announces over a plain REST client, so it never has to wait
    // for a gateway context to exist.
    let http = Arc::new(Http::new(&discord_token));
    let store = Arc::new(PostgresGiveawayStore::new(pool.clone()));
    let ledger = Arc::new(PostgresRewardLedger::new(pool));
    let notifier = Arc::new(notify::DiscordNotifier::new(http));
    let engine = Arc::new(engine::GiveawayEngine::new(store, notifier, ledger));

    let handler = models::handler::Handler { engine };
    let intents = GatewayIntents::non_privileged();
    let mut client = Client::builder(&discord_token, intents)
        .event_handler(handler)
        .await
        .unwrap();

    if let Err(err) = client.start_autosharded().await {
        error!(
            "Attempted to start Windfall Discord client, but failed with error: {}",
            err
        );
    }
}
