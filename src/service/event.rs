use log::{info, warn};
use uuid::Uuid;

use super::gallery::{self, GalleryFilter};
use crate::{
    db::EventStore,
    dto::{EventRef, NewEventDto, NewPhotoDto, UpdateEventDto, UpdateEventRequest},
    errors::BoothError,
    models::{Event, Photo},
};

pub async fn create(events: &dyn EventStore, dto: NewEventDto) -> Result<Event, BoothError> {
    let name = dto.event_name.trim().to_string();
    if name.is_empty() {
        return Err(BoothError::BadClientData("eventName is required".to_string()));
    }
    if events.find_id_by_name(&name).await?.is_some() {
        return Err(BoothError::DuplicateName(name));
    }
    let event = Event {
        id: Uuid::new_v4(),
        name,
        date: dto.event_date,
        prompt_title: dto.prompt_title,
        prompt: dto.prompt,
        negative_prompt: dto.negative_prompt,
        logo_url: dto.logo_url,
        logo_placement: dto.logo_placement,
        gallery: Vec::new(),
    };
    let created = events.create(event).await?;
    info!("created event '{}' ({})", created.name, created.id);
    Ok(created)
}

pub async fn get_all(events: &dyn EventStore) -> Result<Vec<Event>, BoothError> {
    events.get_all().await
}

pub async fn get_by_id(events: &dyn EventStore, id: Uuid) -> Result<Event, BoothError> {
    events
        .get_by_id(id)
        .await?
        .ok_or_else(BoothError::not_found_event)
}

/// Resolves a request's event reference to the stable id.
pub async fn resolve(events: &dyn EventStore, target: &EventRef) -> Result<Uuid, BoothError> {
    match (target.event_id, target.event_name.as_deref()) {
        (Some(id), _) => Ok(id),
        (None, Some(name)) => {
            let name = name.trim();
            warn!("event addressed by name '{}'; clients should send eventID", name);
            events
                .find_id_by_name(name)
                .await?
                .ok_or_else(BoothError::not_found_event)
        }
        (None, None) => Err(BoothError::BadClientData(
            "eventID or eventName is required".to_string(),
        )),
    }
}

pub async fn update(events: &dyn EventStore, req: UpdateEventRequest) -> Result<Event, BoothError> {
    let id = resolve(events, &req.target).await?;
    // With an explicit id, eventName is the new name rather than the key.
    let name = match req.target.event_id {
        Some(_) => req
            .target
            .event_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty()),
        None => None,
    };
    let fields = UpdateEventDto {
        name,
        date: req.event_date,
        prompt_title: req.prompt_title,
        prompt: req.prompt,
        negative_prompt: req.negative_prompt,
        logo_url: req.logo_url,
        logo_placement: req.logo_placement,
    };
    let updated = events.set_fields(id, fields).await?;
    info!("updated event '{}' ({})", updated.name, updated.id);
    Ok(updated)
}

pub async fn add_photo(events: &dyn EventStore, dto: NewPhotoDto) -> Result<Photo, BoothError> {
    let (target, photo) = dto.into_photo()?;
    let id = resolve(events, &target).await?;
    events.append_photo(id, photo.clone()).await?;
    info!("photo {} added to event {}", photo.image_url, id);
    Ok(photo)
}

pub async fn gallery(
    events: &dyn EventStore,
    id: Uuid,
    mode: GalleryFilter,
) -> Result<Vec<Photo>, BoothError> {
    let event = get_by_id(events, id).await?;
    Ok(gallery::filter(&event.gallery, mode))
}
