use actix_web::{post, web, HttpResponse, Responder};
use log::info;

use super::failure;
use crate::{
    dto::{LoginUserRequest, NewUserDto, OkResponse},
    service, AppState,
};

#[post("/register")]
pub async fn register(dto: web::Json<NewUserDto>, state: web::Data<AppState>) -> impl Responder {
    let response = service::user::register(state.users.as_ref(), dto.into_inner()).await;
    match response {
        Ok(()) => {
            info!("RESPONSE /REGISTER: user created");
            HttpResponse::Created().json(OkResponse::new("User Created"))
        }
        Err(err) => failure("/register", err),
    }
}

#[post("/login-user")]
pub async fn login(dto: web::Json<LoginUserRequest>, state: web::Data<AppState>) -> impl Responder {
    let response =
        service::auth::login(state.users.as_ref(), &state.throttle, dto.into_inner()).await;
    match response {
        Ok(()) => HttpResponse::Ok().json(OkResponse::new("Login successful")),
        Err(err) => failure("/login-user", err),
    }
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(register).service(login);
}
