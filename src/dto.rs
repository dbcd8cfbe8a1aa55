use chrono::{self, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    errors::BoothError,
    models::{LogoPlacement, Photo},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUserDto {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginUserRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEventDto {
    pub event_name: String,
    pub event_date: chrono::DateTime<Utc>,
    #[serde(default)]
    pub prompt_title: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub negative_prompt: String,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub logo_placement: LogoPlacement,
}

/// Names an event in a request body. `eventID` is the stable key; `eventName`
/// alone is accepted from older clients and resolved to the id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventRef {
    #[serde(rename = "eventID", default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<Uuid>,
    #[serde(rename = "eventName", default, skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    #[serde(flatten)]
    pub target: EventRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_date: Option<chrono::DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_placement: Option<LogoPlacement>,
}

/// Scalar fields to overwrite on an event; `None` leaves the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateEventDto {
    pub name: Option<String>,
    pub date: Option<chrono::DateTime<Utc>>,
    pub prompt_title: Option<String>,
    pub prompt: Option<String>,
    pub negative_prompt: Option<String>,
    pub logo_url: Option<String>,
    pub logo_placement: Option<LogoPlacement>,
}

impl UpdateEventDto {
    pub fn is_empty(&self) -> bool {
        *self == UpdateEventDto::default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPhotoDto {
    #[serde(flatten)]
    pub target: EventRef,
    pub image_url: String,
    #[serde(rename = "fileID", default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl NewPhotoDto {
    /// Splits the request into its target and a validated [`Photo`].
    pub fn into_photo(self) -> Result<(EventRef, Photo), BoothError> {
        let NewPhotoDto { target, image_url, file_id, phone_number, email } = self;
        if image_url.trim().is_empty() {
            return Err(BoothError::BadClientData("imageUrl is required".to_string()));
        }
        let phone_number = non_blank(phone_number);
        let email = non_blank(email);
        if phone_number.is_none() && email.is_none() {
            return Err(BoothError::BadClientData(
                "either a phone number or an email is required".to_string(),
            ));
        }
        let photo = Photo {
            image_url,
            file_id: non_blank(file_id),
            phone_number,
            email,
            delivery_state: None,
        };
        Ok((target, photo))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GalleryQuery {
    pub filter: Option<String>,
}

/// Uniform success body: `{"status": "ok", "data": ...}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct OkResponse<T> {
    pub status: String,
    pub data: T,
}

impl<T> OkResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            status: "ok".to_string(),
            data,
        }
    }
}
