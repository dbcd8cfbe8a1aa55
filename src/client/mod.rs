//! Client side of the booth: typed access to the backend, the image upload
//! collaborator, and per-screen view models.
//!
//! Screens talk to the backend only through [`PhotoBoothApi`], so the same
//! view models run against the HTTP backend ([`HttpApi`]) or an in-process
//! one ([`LocalApi`]).

pub mod screens;
pub mod upload;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{
    dto::{LoginUserRequest, NewEventDto, NewPhotoDto, NewUserDto, UpdateEventRequest},
    errors::BoothError,
    models::{Event, Photo},
    service, AppState,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend root, e.g. `http://localhost:5001`.
    pub backend_url: String,
    /// Multipart upload endpoint of the image host.
    pub upload_url: String,
    /// Unsigned upload preset sent with every image, if the host needs one.
    pub upload_preset: Option<String>,
}

#[async_trait]
pub trait PhotoBoothApi: Send + Sync {
    async fn register(&self, dto: NewUserDto) -> Result<(), BoothError>;
    async fn login(&self, req: LoginUserRequest) -> Result<(), BoothError>;
    async fn list_events(&self) -> Result<Vec<Event>, BoothError>;
    async fn create_event(&self, dto: NewEventDto) -> Result<Event, BoothError>;
    async fn update_event(&self, req: UpdateEventRequest) -> Result<Event, BoothError>;
    async fn add_photo(&self, dto: NewPhotoDto) -> Result<Photo, BoothError>;
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: String,
    #[serde(default)]
    detail: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum Envelope<T> {
    Ok { data: T },
    Error { error: ErrorBody },
}

impl<T> Envelope<T> {
    fn into_result(self) -> Result<T, BoothError> {
        match self {
            Envelope::Ok { data } => Ok(data),
            Envelope::Error { error } => Err(BoothError::from_wire(&error.code, error.detail)),
        }
    }
}

/// Backend access over HTTP; reads the `{status, data | error}` envelope
/// regardless of the response status code.
#[derive(Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.backend_url.trim_end_matches('/').to_string(),
        }
    }

    async fn read<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, BoothError> {
        let envelope: Envelope<T> = resp
            .json()
            .await
            .map_err(|e| BoothError::Unavailable(format!("unreadable backend response: {e}")))?;
        envelope.into_result()
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, BoothError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let resp = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await
            .map_err(|e| BoothError::Unavailable(e.to_string()))?;
        Self::read(resp).await
    }
}

#[async_trait]
impl PhotoBoothApi for HttpApi {
    async fn register(&self, dto: NewUserDto) -> Result<(), BoothError> {
        self.post::<_, String>("/register", &dto).await.map(|_| ())
    }

    async fn login(&self, req: LoginUserRequest) -> Result<(), BoothError> {
        self.post::<_, String>("/login-user", &req).await.map(|_| ())
    }

    async fn list_events(&self) -> Result<Vec<Event>, BoothError> {
        let resp = self
            .client
            .get(format!("{}/events", self.base_url))
            .send()
            .await
            .map_err(|e| BoothError::Unavailable(e.to_string()))?;
        Self::read(resp).await
    }

    async fn create_event(&self, dto: NewEventDto) -> Result<Event, BoothError> {
        self.post("/create-event", &dto).await
    }

    async fn update_event(&self, req: UpdateEventRequest) -> Result<Event, BoothError> {
        self.post("/update-event", &req).await
    }

    async fn add_photo(&self, dto: NewPhotoDto) -> Result<Photo, BoothError> {
        self.post("/add-photo", &dto).await
    }
}

/// Backend access without a network hop, straight onto the service layer.
#[derive(Clone)]
pub struct LocalApi {
    state: AppState,
}

impl LocalApi {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl PhotoBoothApi for LocalApi {
    async fn register(&self, dto: NewUserDto) -> Result<(), BoothError> {
        service::user::register(self.state.users.as_ref(), dto).await
    }

    async fn login(&self, req: LoginUserRequest) -> Result<(), BoothError> {
        service::auth::login(self.state.users.as_ref(), &self.state.throttle, req).await
    }

    async fn list_events(&self) -> Result<Vec<Event>, BoothError> {
        service::event::get_all(self.state.events.as_ref()).await
    }

    async fn create_event(&self, dto: NewEventDto) -> Result<Event, BoothError> {
        service::event::create(self.state.events.as_ref(), dto).await
    }

    async fn update_event(&self, req: UpdateEventRequest) -> Result<Event, BoothError> {
        service::event::update(self.state.events.as_ref(), req).await
    }

    async fn add_photo(&self, dto: NewPhotoDto) -> Result<Photo, BoothError> {
        service::event::add_photo(self.state.events.as_ref(), dto).await
    }
}
