use std::{fmt, str::FromStr};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::BoothError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub name: String,
    pub date: chrono::DateTime<Utc>,
    pub prompt_title: String,
    pub prompt: String,
    pub negative_prompt: String,
    pub logo_url: Option<String>,
    pub logo_placement: LogoPlacement,
    pub gallery: Vec<Photo>,
}

/// A submitted photo. `delivery_state` is written by the external fulfilment
/// pipeline only; an absent value reads as [`DeliveryState::Received`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub image_url: String,
    #[serde(rename = "fileID", default)]
    pub file_id: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_state: Option<DeliveryState>,
}

impl Photo {
    pub fn effective_state(&self) -> DeliveryState {
        self.delivery_state.unwrap_or(DeliveryState::Received)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryState {
    Received,
    Processing,
    Sent,
}

/// Where the event logo is overlaid on delivered photos.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogoPlacement {
    #[default]
    #[serde(rename = "")]
    Unset,
    #[serde(rename = "bottom-left")]
    BottomLeft,
    #[serde(rename = "bottom-right")]
    BottomRight,
}

impl LogoPlacement {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogoPlacement::Unset => "",
            LogoPlacement::BottomLeft => "bottom-left",
            LogoPlacement::BottomRight => "bottom-right",
        }
    }
}

impl fmt::Display for LogoPlacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogoPlacement {
    type Err = BoothError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(LogoPlacement::Unset),
            "bottom-left" => Ok(LogoPlacement::BottomLeft),
            "bottom-right" => Ok(LogoPlacement::BottomRight),
            other => Err(BoothError::BadClientData(format!(
                "unknown logo placement '{other}'"
            ))),
        }
    }
}

/// Stored account. `pwd_hash` is the encoded salted hash, never the password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub pwd_hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn photo_without_state_reads_as_received() {
        let photo: Photo = serde_json::from_value(serde_json::json!({
            "imageUrl": "http://x/1.jpg",
            "email": "a@b.com"
        }))
        .unwrap();
        assert_eq!(photo.delivery_state, None);
        assert_eq!(photo.effective_state(), DeliveryState::Received);
    }

    #[test]
    fn logo_placement_uses_wire_names() {
        assert_eq!(
            serde_json::to_value(LogoPlacement::BottomRight).unwrap(),
            serde_json::json!("bottom-right")
        );
        assert_eq!("".parse::<LogoPlacement>().unwrap(), LogoPlacement::Unset);
        assert!("top".parse::<LogoPlacement>().is_err());
    }
}
