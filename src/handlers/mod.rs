pub mod auth;
pub mod event;

use actix_web::{get, web, HttpResponse, Responder};
use log::{error, warn};

use crate::{dto::OkResponse, errors::BoothError};

pub(crate) fn failure(route: &str, err: BoothError) -> HttpResponse {
    match err {
        BoothError::Store(_) => error!("[{} : {}] {}: {:?}", file!(), line!(), route, err),
        _ => warn!("{}: {}", route, err),
    }
    HttpResponse::from_error(err)
}

#[get("/")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(OkResponse::new("Started"))
}

/// Registers every route plus extractor configs that render malformed
/// input in the same error envelope as handler failures.
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        BoothError::BadClientData(err.to_string()).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        BoothError::BadClientData(err.to_string()).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        BoothError::BadClientData(err.to_string()).into()
    }))
    .service(health)
    .configure(auth::init_routes)
    .configure(event::init_routes);
}
