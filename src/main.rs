use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use blogforge::{
    config::Config,
    routes,
    state::AppState,
    store::{MemoryStore, PgStore},
};

fn startup_error<E: std::fmt::Display>(error: E) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, error.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(startup_error)?;

    let (state, pg_store) = if config.uses_memory_store() {
        log::warn!("Using the in-memory store; data is lost on shutdown");
        let store = Arc::new(MemoryStore::new());
        (AppState::new(store, &config.jwt_secret, config.bcrypt_cost), None)
    } else {
        let store = Arc::new(
            PgStore::connect(&config.database_url, config.database_max_connections)
                .await
                .map_err(startup_error)?,
        );
        log::info!("Database connected");
        (
            AppState::new(store.clone(), &config.jwt_secret, config.bcrypt_cost),
            Some(store),
        )
    };
    let state = web::Data::new(state);

    log::info!("Starting blogforge server at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::config)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await?;

    if let Some(store) = pg_store {
        store.close().await;
        log::info!("Database pool closed");
    }
    Ok(())
}
