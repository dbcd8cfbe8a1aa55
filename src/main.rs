use std::io;

use actix_web::{web, App, HttpServer};
use log::{info, warn};

use photobooth::{
    config::ServerConfig,
    db::init_db_pool,
    handlers,
    service::{auth::LoginThrottle, log::{init_logger, LoggerMiddleware}},
    AppState,
};

#[actix_web::main]
async fn main() -> io::Result<()> {
    init_logger();
    let config = ServerConfig::from_env()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let throttle = LoginThrottle::new(config.login_max_failures, config.login_lockout);

    let state = match &config.database_url {
        Some(db_url) => {
            let pool = init_db_pool(db_url, config.max_connections)
                .await
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
            AppState::postgres(pool, throttle)
        }
        None => {
            warn!("DATABASE_URL is not set, using the in-memory store");
            AppState::in_memory(throttle)
        }
    };
    let state = web::Data::new(state);

    info!("listening on {}:{}", config.host, config.port);
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(LoggerMiddleware)
            .configure(handlers::init_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
