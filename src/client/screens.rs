//! Per-screen view models. Each holds only its own transient form state;
//! screens hand each other nothing but an event id through [`Route`].
//!
//! A failed action records the message in `alert` and leaves the rest of the
//! screen's state as it was.

use chrono::{DateTime, Utc};
use log::warn;
use uuid::Uuid;

use super::{upload::ImageUploader, PhotoBoothApi};
use crate::{
    dto::{EventRef, LoginUserRequest, NewEventDto, NewPhotoDto, UpdateEventRequest},
    errors::BoothError,
    models::{Event, LogoPlacement, Photo},
    service::gallery::{self, GalleryFilter},
};

/// Navigation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Events,
    EventDetails { event_id: Uuid },
    Capture { event_id: Uuid },
    Gallery { event_id: Uuid },
    Success { event_id: Uuid },
}

fn alert<T>(slot: &mut Option<String>, result: Result<T, BoothError>) -> Result<T, BoothError> {
    match &result {
        Ok(_) => *slot = None,
        Err(err) => {
            warn!("screen action failed: {}", err);
            *slot = Some(err.to_string());
        }
    }
    result
}

#[derive(Debug, Default)]
pub struct LoginScreen {
    pub username: String,
    pub password: String,
    pub alert: Option<String>,
}

impl LoginScreen {
    pub async fn submit(&mut self, api: &dyn PhotoBoothApi) -> Result<Route, BoothError> {
        let req = LoginUserRequest {
            username: self.username.clone(),
            password: self.password.clone(),
        };
        let result = api.login(req).await.map(|_| Route::Events);
        if result.is_ok() {
            self.password.clear();
        }
        alert(&mut self.alert, result)
    }
}

#[derive(Debug, Clone)]
pub struct NewEventForm {
    pub name: String,
    pub date: DateTime<Utc>,
    pub prompt: String,
    pub negative_prompt: String,
}

impl Default for NewEventForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            date: Utc::now(),
            prompt: String::new(),
            negative_prompt: String::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct EventListScreen {
    pub events: Vec<Event>,
    pub modal_visible: bool,
    pub form: NewEventForm,
    pub alert: Option<String>,
}

impl EventListScreen {
    pub async fn load(&mut self, api: &dyn PhotoBoothApi) -> Result<(), BoothError> {
        let result = api.list_events().await;
        let result = alert(&mut self.alert, result)?;
        self.events = result;
        Ok(())
    }

    pub fn toggle_modal(&mut self) {
        self.modal_visible = !self.modal_visible;
    }

    /// Creates the event from the form; names already in the list are
    /// refused before any request is made.
    pub async fn save_new_event(&mut self, api: &dyn PhotoBoothApi) -> Result<Route, BoothError> {
        let name = self.form.name.trim().to_string();
        if self.events.iter().any(|e| e.name == name) {
            return alert(&mut self.alert, Err(BoothError::DuplicateName(name)));
        }
        let dto = NewEventDto {
            event_name: name,
            event_date: self.form.date,
            prompt_title: String::new(),
            prompt: self.form.prompt.clone(),
            negative_prompt: self.form.negative_prompt.clone(),
            logo_url: None,
            logo_placement: LogoPlacement::Unset,
        };
        let created = alert(&mut self.alert, api.create_event(dto).await)?;
        let event_id = created.id;
        self.events.push(created);
        self.form = NewEventForm::default();
        self.modal_visible = false;
        Ok(Route::EventDetails { event_id })
    }

    pub fn open(&self, event_id: Uuid) -> Route {
        Route::EventDetails { event_id }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EventEditorScreen {
    pub event_id: Uuid,
    pub name: String,
    pub date: Option<DateTime<Utc>>,
    pub prompt_title: String,
    pub prompt: String,
    pub negative_prompt: String,
    pub logo_url: String,
    pub logo_placement: LogoPlacement,
    pub alert: Option<String>,
}

impl EventEditorScreen {
    pub async fn load(api: &dyn PhotoBoothApi, event_id: Uuid) -> Result<Self, BoothError> {
        let event = api
            .list_events()
            .await?
            .into_iter()
            .find(|e| e.id == event_id)
            .ok_or_else(BoothError::not_found_event)?;
        Ok(Self {
            event_id,
            name: event.name,
            date: Some(event.date),
            prompt_title: event.prompt_title,
            prompt: event.prompt,
            negative_prompt: event.negative_prompt,
            logo_url: event.logo_url.unwrap_or_default(),
            logo_placement: event.logo_placement,
            alert: None,
        })
    }

    /// Sets the logo to a freshly uploaded image; the field is untouched on failure.
    pub async fn upload_logo(
        &mut self,
        uploader: &dyn ImageUploader,
        bytes: Vec<u8>,
    ) -> Result<(), BoothError> {
        let file_name = format!("logo-{}.jpg", self.event_id);
        let uploaded = alert(&mut self.alert, uploader.upload(bytes, &file_name).await)?;
        self.logo_url = uploaded.url;
        Ok(())
    }

    pub async fn save(&mut self, api: &dyn PhotoBoothApi) -> Result<Event, BoothError> {
        let req = UpdateEventRequest {
            target: EventRef {
                event_id: Some(self.event_id),
                event_name: Some(self.name.clone()),
            },
            event_date: self.date,
            prompt_title: Some(self.prompt_title.clone()),
            prompt: Some(self.prompt.clone()),
            negative_prompt: Some(self.negative_prompt.clone()),
            logo_url: Some(self.logo_url.clone()).filter(|url| !url.is_empty()),
            logo_placement: Some(self.logo_placement),
        };
        alert(&mut self.alert, api.update_event(req).await)
    }

    pub fn start_event(&self) -> Route {
        Route::Capture {
            event_id: self.event_id,
        }
    }

    pub fn view_gallery(&self) -> Route {
        Route::Gallery {
            event_id: self.event_id,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CaptureScreen {
    pub event_id: Uuid,
    pub photo: Option<Vec<u8>>,
    pub modal_visible: bool,
    pub phone_number: String,
    pub email: String,
    pub alert: Option<String>,
}

impl CaptureScreen {
    pub fn new(event_id: Uuid) -> Self {
        Self {
            event_id,
            photo: None,
            modal_visible: false,
            phone_number: String::new(),
            email: String::new(),
            alert: None,
        }
    }

    pub fn capture(&mut self, bytes: Vec<u8>) {
        self.photo = Some(bytes);
    }

    pub fn retake(&mut self) {
        self.photo = None;
        self.modal_visible = false;
    }

    /// Opens the contact-details modal once a photo is held.
    pub fn continue_to_details(&mut self) -> bool {
        self.modal_visible = self.photo.is_some();
        self.modal_visible
    }

    /// Contact check, then upload, then record against the event.
    pub async fn submit(
        &mut self,
        uploader: &dyn ImageUploader,
        api: &dyn PhotoBoothApi,
    ) -> Result<Route, BoothError> {
        let result = self.try_submit(uploader, api).await;
        let route = alert(&mut self.alert, result)?;
        self.modal_visible = false;
        Ok(route)
    }

    async fn try_submit(
        &self,
        uploader: &dyn ImageUploader,
        api: &dyn PhotoBoothApi,
    ) -> Result<Route, BoothError> {
        let phone_number = Some(self.phone_number.trim().to_string()).filter(|v| !v.is_empty());
        let email = Some(self.email.trim().to_string()).filter(|v| !v.is_empty());
        if phone_number.is_none() && email.is_none() {
            return Err(BoothError::BadClientData(
                "please enter either a phone number or an email".to_string(),
            ));
        }
        let bytes = self
            .photo
            .clone()
            .ok_or_else(|| BoothError::BadClientData("no photo captured".to_string()))?;
        let file_name = format!("{}-{}.jpg", self.event_id, Uuid::new_v4());
        let uploaded = uploader.upload(bytes, &file_name).await?;
        let dto = NewPhotoDto {
            target: EventRef {
                event_id: Some(self.event_id),
                event_name: None,
            },
            image_url: uploaded.url,
            file_id: uploaded.file_id,
            phone_number,
            email,
        };
        api.add_photo(dto).await?;
        Ok(Route::Success {
            event_id: self.event_id,
        })
    }
}

#[derive(Debug, Clone)]
pub struct GalleryScreen {
    pub event_id: Uuid,
    pub photos: Vec<Photo>,
    pub mode: GalleryFilter,
    pub alert: Option<String>,
}

impl GalleryScreen {
    pub fn new(event_id: Uuid) -> Self {
        Self {
            event_id,
            photos: Vec::new(),
            mode: GalleryFilter::All,
            alert: None,
        }
    }

    pub async fn load(&mut self, api: &dyn PhotoBoothApi) -> Result<(), BoothError> {
        let result = api.list_events().await.and_then(|events| {
            events
                .into_iter()
                .find(|e| e.id == self.event_id)
                .map(|e| e.gallery)
                .ok_or_else(BoothError::not_found_event)
        });
        self.photos = alert(&mut self.alert, result)?;
        Ok(())
    }

    pub fn set_mode(&mut self, mode: GalleryFilter) {
        self.mode = mode;
    }

    /// Photos to display for the current mode, newest first.
    pub fn visible(&self) -> Vec<Photo> {
        gallery::filter(&self.photos, self.mode)
    }
}

/// Confirmation after a submitted photo; `Done` returns to capture for the
/// same event so the next guest can step up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuccessScreen {
    pub event_id: Uuid,
}

impl SuccessScreen {
    pub fn new(event_id: Uuid) -> Self {
        Self { event_id }
    }

    pub fn done(&self) -> Route {
        Route::Capture {
            event_id: self.event_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        client::{upload::UploadedImage, LocalApi},
        dto::NewUserDto,
        service::auth::LoginThrottle,
        AppState,
    };
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeUploader {
        fail: bool,
        calls: AtomicUsize,
    }

    impl FakeUploader {
        fn new(fail: bool) -> Self {
            Self {
                fail,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ImageUploader for FakeUploader {
        async fn upload(&self, _bytes: Vec<u8>, file_name: &str) -> Result<UploadedImage, BoothError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(BoothError::UploadFailure("host down".to_string()));
            }
            Ok(UploadedImage {
                url: format!("http://img/{n}.jpg"),
                file_id: Some(file_name.to_string()),
            })
        }
    }

    fn api() -> LocalApi {
        LocalApi::new(AppState::in_memory(LoginThrottle::default()))
    }

    async fn event_named(api: &LocalApi, name: &str) -> Uuid {
        let mut list = EventListScreen::default();
        list.toggle_modal();
        list.form.name = name.to_string();
        match list.save_new_event(api).await.unwrap() {
            Route::EventDetails { event_id } => event_id,
            other => panic!("unexpected route {other:?}"),
        }
    }

    #[tokio::test]
    async fn login_screen_routes_to_events() {
        let api = api();
        api.register(NewUserDto {
            username: "host".to_string(),
            password: "pw".to_string(),
        })
        .await
        .unwrap();

        let mut screen = LoginScreen {
            username: "host".to_string(),
            password: "wrong".to_string(),
            alert: None,
        };
        assert!(screen.submit(&api).await.is_err());
        assert!(screen.alert.is_some());
        assert_eq!(screen.password, "wrong");

        screen.password = "pw".to_string();
        assert_eq!(screen.submit(&api).await, Ok(Route::Events));
        assert!(screen.alert.is_none());
        assert!(screen.password.is_empty());
    }

    #[tokio::test]
    async fn event_list_refuses_known_name_locally() {
        let api = api();
        let mut list = EventListScreen::default();
        list.load(&api).await.unwrap();
        list.form.name = "Gala".to_string();
        list.modal_visible = true;
        list.save_new_event(&api).await.unwrap();
        assert!(!list.modal_visible);
        assert_eq!(list.events.len(), 1);

        list.modal_visible = true;
        list.form.name = "Gala".to_string();
        let err = list.save_new_event(&api).await.unwrap_err();
        assert_eq!(err, BoothError::DuplicateName("Gala".to_string()));
        assert!(list.modal_visible);
        assert_eq!(api.list_events().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn editor_saves_by_id() {
        let api = api();
        let event_id = event_named(&api, "Gala").await;

        let mut editor = EventEditorScreen::load(&api, event_id).await.unwrap();
        editor.prompt = "watercolor".to_string();
        editor.logo_placement = LogoPlacement::BottomLeft;
        editor.upload_logo(&FakeUploader::new(false), vec![1, 2, 3]).await.unwrap();
        let saved = editor.save(&api).await.unwrap();

        assert_eq!(saved.prompt, "watercolor");
        assert_eq!(saved.logo_placement, LogoPlacement::BottomLeft);
        assert_eq!(saved.logo_url.as_deref(), Some("http://img/0.jpg"));
        assert_eq!(editor.start_event(), Route::Capture { event_id });
    }

    #[tokio::test]
    async fn capture_requires_contact_before_upload() {
        let api = api();
        let event_id = event_named(&api, "Gala").await;
        let uploader = FakeUploader::new(false);

        let mut capture = CaptureScreen::new(event_id);
        capture.capture(vec![0xff, 0xd8]);
        assert!(capture.continue_to_details());
        let err = capture.submit(&uploader, &api).await.unwrap_err();
        assert!(matches!(err, BoothError::BadClientData(_)));
        assert_eq!(uploader.calls.load(Ordering::SeqCst), 0);
        assert!(capture.modal_visible);
    }

    #[tokio::test]
    async fn failed_upload_records_nothing() {
        let api = api();
        let event_id = event_named(&api, "Gala").await;

        let mut capture = CaptureScreen::new(event_id);
        capture.capture(vec![0xff, 0xd8]);
        capture.email = "a@b.com".to_string();
        let err = capture.submit(&FakeUploader::new(true), &api).await.unwrap_err();
        assert!(matches!(err, BoothError::UploadFailure(_)));
        assert_eq!(capture.email, "a@b.com");

        let mut gallery = GalleryScreen::new(event_id);
        gallery.load(&api).await.unwrap();
        assert!(gallery.visible().is_empty());
    }

    #[tokio::test]
    async fn capture_to_gallery_flow() {
        let api = api();
        let event_id = event_named(&api, "Gala").await;
        let uploader = FakeUploader::new(false);

        for email in ["a@b.com", "c@d.com"] {
            let mut capture = CaptureScreen::new(event_id);
            capture.capture(vec![0xff, 0xd8]);
            capture.continue_to_details();
            capture.email = email.to_string();
            assert_eq!(
                capture.submit(&uploader, &api).await,
                Ok(Route::Success { event_id })
            );
            assert!(!capture.modal_visible);
        }

        let mut gallery = GalleryScreen::new(event_id);
        gallery.load(&api).await.unwrap();
        let urls: Vec<_> = gallery.visible().into_iter().map(|p| p.image_url).collect();
        assert_eq!(urls, ["http://img/1.jpg", "http://img/0.jpg"]);

        gallery.set_mode(GalleryFilter::Sent);
        assert!(gallery.visible().is_empty());
        gallery.set_mode(GalleryFilter::Received);
        assert_eq!(gallery.visible().len(), 2);
    }

    #[tokio::test]
    async fn gallery_for_unknown_event_alerts() {
        let api = api();
        let mut gallery = GalleryScreen::new(Uuid::new_v4());
        assert_eq!(gallery.load(&api).await, Err(BoothError::not_found_event()));
        assert!(gallery.alert.is_some());
    }

    #[tokio::test]
    async fn success_returns_to_capture_for_same_event() {
        let api = api();
        let event_id = event_named(&api, "Gala").await;
        let uploader = FakeUploader::new(false);

        let mut route = Route::Capture { event_id };
        for email in ["a@b.com", "c@d.com"] {
            let Route::Capture { event_id } = route else {
                panic!("expected capture, got {route:?}");
            };
            let mut capture = CaptureScreen::new(event_id);
            capture.capture(vec![0xff, 0xd8]);
            capture.continue_to_details();
            capture.email = email.to_string();
            let Ok(Route::Success { event_id }) = capture.submit(&uploader, &api).await else {
                panic!("submit did not reach the success screen");
            };
            route = SuccessScreen::new(event_id).done();
        }

        assert_eq!(route, Route::Capture { event_id });
        assert_eq!(api.list_events().await.unwrap()[0].gallery.len(), 2);
    }
}
