use actix_web::{http::header, post, web, App, HttpRequest, HttpResponse, HttpServer, Responder};
use serde_json::json;

use photobooth::{
    client::{
        screens::{CaptureScreen, EventListScreen, GalleryScreen, LoginScreen, Route},
        upload::{HttpUploader, ImageUploader},
        ClientConfig, HttpApi, PhotoBoothApi,
    },
    dto::NewUserDto,
    errors::BoothError,
    handlers,
    service::auth::LoginThrottle,
    AppState,
};

#[post("/upload")]
async fn fake_upload(req: HttpRequest, body: web::Bytes) -> impl Responder {
    let multipart = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("multipart/form-data"))
        .unwrap_or(false);
    if !multipart || body.is_empty() {
        return HttpResponse::BadRequest().finish();
    }
    HttpResponse::Ok().json(json!({
        "secure_url": "https://img.example/booth/1.jpg",
        "public_id": "booth/1"
    }))
}

#[post("/broken-upload")]
async fn broken_upload() -> impl Responder {
    HttpResponse::InternalServerError().finish()
}

/// Starts backend and fake image host on an ephemeral port.
fn spawn_server() -> (String, actix_web::dev::ServerHandle) {
    let state = web::Data::new(AppState::in_memory(LoginThrottle::default()));
    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(handlers::init_routes)
            .service(fake_upload)
            .service(broken_upload)
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .unwrap();
    let addr = server.addrs()[0];
    let server = server.run();
    let handle = server.handle();
    actix_rt::spawn(server);
    (format!("http://{addr}"), handle)
}

fn config(base: &str, upload_path: &str) -> ClientConfig {
    ClientConfig {
        backend_url: base.to_string(),
        upload_url: format!("{base}{upload_path}"),
        upload_preset: Some("booth".to_string()),
    }
}

#[actix_web::test]
async fn screens_over_http() {
    let (base, handle) = spawn_server();
    let config = config(&base, "/upload");
    let api = HttpApi::new(&config);
    let uploader = HttpUploader::new(&config);

    api.register(NewUserDto {
        username: "host".to_string(),
        password: "s3cret".to_string(),
    })
    .await
    .unwrap();
    let mut login = LoginScreen {
        username: "host".to_string(),
        password: "s3cret".to_string(),
        alert: None,
    };
    assert_eq!(login.submit(&api).await, Ok(Route::Events));

    let mut list = EventListScreen::default();
    list.load(&api).await.unwrap();
    list.form.name = "Gala".to_string();
    let Route::EventDetails { event_id } = list.save_new_event(&api).await.unwrap() else {
        panic!("expected event details route");
    };

    let mut capture = CaptureScreen::new(event_id);
    capture.capture(vec![0xff, 0xd8, 0xff]);
    capture.continue_to_details();
    capture.phone_number = "555-0100".to_string();
    assert_eq!(
        capture.submit(&uploader, &api).await,
        Ok(Route::Success { event_id })
    );

    let mut gallery = GalleryScreen::new(event_id);
    gallery.load(&api).await.unwrap();
    let visible = gallery.visible();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].image_url, "https://img.example/booth/1.jpg");
    assert_eq!(visible[0].file_id.as_deref(), Some("booth/1"));

    handle.stop(true).await;
}

#[actix_web::test]
async fn backend_errors_arrive_typed() {
    let (base, handle) = spawn_server();
    let api = HttpApi::new(&config(&base, "/upload"));

    let mut login = LoginScreen {
        username: "nobody".to_string(),
        password: "x".to_string(),
        alert: None,
    };
    assert_eq!(login.submit(&api).await, Err(BoothError::UserNotFound));
    assert!(login.alert.is_some());

    handle.stop(true).await;
}

#[actix_web::test]
async fn upload_fails_closed() {
    let (base, handle) = spawn_server();
    let uploader = HttpUploader::new(&config(&base, "/broken-upload"));

    let err = uploader.upload(vec![1, 2, 3], "x.jpg").await.unwrap_err();
    assert!(matches!(err, BoothError::UploadFailure(_)));
    let err = uploader.upload(Vec::new(), "x.jpg").await.unwrap_err();
    assert!(matches!(err, BoothError::UploadFailure(_)));

    handle.stop(true).await;
}

#[actix_web::test]
async fn unreachable_backend_is_unavailable() {
    let api = HttpApi::new(&config("http://127.0.0.1:1", "/upload"));
    assert!(matches!(
        api.list_events().await,
        Err(BoothError::Unavailable(_))
    ));
}
