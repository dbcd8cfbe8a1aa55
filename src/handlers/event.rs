use actix_web::{get, post, web, HttpResponse, Responder};
use log::info;
use uuid::Uuid;

use super::failure;
use crate::{
    dto::{GalleryQuery, NewEventDto, NewPhotoDto, OkResponse, UpdateEventRequest},
    service::{self, gallery::GalleryFilter},
    AppState,
};

#[post("/create-event")]
pub async fn create(dto: web::Json<NewEventDto>, state: web::Data<AppState>) -> impl Responder {
    match service::event::create(state.events.as_ref(), dto.into_inner()).await {
        Ok(event) => HttpResponse::Created().json(OkResponse::new(event)),
        Err(err) => failure("/create-event", err),
    }
}

#[get("/events")]
pub async fn get_all(state: web::Data<AppState>) -> impl Responder {
    match service::event::get_all(state.events.as_ref()).await {
        Ok(events) => {
            info!("RESPONSE /EVENTS: {} events", events.len());
            HttpResponse::Ok().json(OkResponse::new(events))
        }
        Err(err) => failure("/events", err),
    }
}

#[get("/events/{id}")]
pub async fn get_by_id(id: web::Path<Uuid>, state: web::Data<AppState>) -> impl Responder {
    match service::event::get_by_id(state.events.as_ref(), id.into_inner()).await {
        Ok(event) => HttpResponse::Ok().json(OkResponse::new(event)),
        Err(err) => failure("/events/{id}", err),
    }
}

#[get("/events/{id}/gallery")]
pub async fn get_gallery(
    id: web::Path<Uuid>,
    query: web::Query<GalleryQuery>,
    state: web::Data<AppState>,
) -> impl Responder {
    let mode = match query.filter.as_deref() {
        Some(raw) => match raw.parse::<GalleryFilter>() {
            Ok(mode) => mode,
            Err(err) => return failure("/events/{id}/gallery", err),
        },
        None => GalleryFilter::All,
    };
    match service::event::gallery(state.events.as_ref(), id.into_inner(), mode).await {
        Ok(photos) => HttpResponse::Ok().json(OkResponse::new(photos)),
        Err(err) => failure("/events/{id}/gallery", err),
    }
}

#[post("/update-event")]
pub async fn update(
    dto: web::Json<UpdateEventRequest>,
    state: web::Data<AppState>,
) -> impl Responder {
    match service::event::update(state.events.as_ref(), dto.into_inner()).await {
        Ok(event) => HttpResponse::Ok().json(OkResponse::new(event)),
        Err(err) => failure("/update-event", err),
    }
}

#[post("/add-photo")]
pub async fn add_photo(dto: web::Json<NewPhotoDto>, state: web::Data<AppState>) -> impl Responder {
    match service::event::add_photo(state.events.as_ref(), dto.into_inner()).await {
        Ok(photo) => HttpResponse::Created().json(OkResponse::new(photo)),
        Err(err) => failure("/add-photo", err),
    }
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create)
        .service(get_all)
        .service(get_gallery)
        .service(get_by_id)
        .service(update)
        .service(add_photo);
}
