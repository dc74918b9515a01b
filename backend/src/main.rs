mod config;
mod error;
mod services;
mod sessions;
mod store;

use crate::config::Config;
use crate::sessions::state::{start_attachment_updater, SessionsState};
use crate::store::SqliteTemplateStore;
use actix_web::{web, App, HttpServer};
use env_logger::Env;
use log::{info, warn};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok(); // a missing .env is fine
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = Config::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    let store = SqliteTemplateStore::new(config.db_path.clone());
    store
        .init()
        .map_err(std::io::Error::other)?;

    // Initialize session state and the attachment updater
    let (sessions, rx) = SessionsState::new(100, config.image_budget());
    let updater_state = sessions.clone();
    tokio::spawn(async move {
        start_attachment_updater(updater_state, rx).await;
    });

    if !config.admin {
        warn!("Admin capability disabled: structure edits and template writes are refused");
    }
    info!("Server running at http://{}:{}", config.host, config.port);

    let limit = config.json_limit;
    let snapshot_limit = config.snapshot_limit;
    let bind = (config.host.clone(), config.port);
    HttpServer::new(move || {
        App::new()
            .app_data(web::JsonConfig::default().limit(limit))
            .app_data(web::PayloadConfig::default().limit(snapshot_limit))
            .app_data(web::Data::new(store.clone()))
            .app_data(web::Data::new(sessions.clone()))
            .app_data(web::Data::new(config.clone()))
            .service(services::templates::configure_routes())
            .service(services::audits::configure_routes())
    })
    .bind(bind)?
    .run()
    .await
}
