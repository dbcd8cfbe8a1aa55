use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    errors::BoothError,
    models::{DeliveryState, Photo},
};

/// Gallery view mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GalleryFilter {
    #[default]
    All,
    Received,
    Processing,
    Sent,
}

impl FromStr for GalleryFilter {
    type Err = BoothError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(GalleryFilter::All),
            "received" => Ok(GalleryFilter::Received),
            "processing" => Ok(GalleryFilter::Processing),
            "sent" => Ok(GalleryFilter::Sent),
            other => Err(BoothError::BadClientData(format!("unknown gallery filter '{other}'"))),
        }
    }
}

impl GalleryFilter {
    fn accepts(&self, photo: &Photo) -> bool {
        match self {
            GalleryFilter::All => true,
            GalleryFilter::Received => photo.effective_state() == DeliveryState::Received,
            GalleryFilter::Processing => photo.delivery_state == Some(DeliveryState::Processing),
            GalleryFilter::Sent => photo.delivery_state == Some(DeliveryState::Sent),
        }
    }
}

/// Newest-first view of `gallery` restricted to `mode`.
pub fn filter(gallery: &[Photo], mode: GalleryFilter) -> Vec<Photo> {
    gallery
        .iter()
        .rev()
        .filter(|photo| mode.accepts(photo))
        .cloned()
        .collect()
}
