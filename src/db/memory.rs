//! In-process store used by tests and by local runs without `DATABASE_URL`.
//!
//! Every operation takes the lock once, so a gallery append is as atomic
//! here as the single-statement update is in PostgreSQL.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{EventStore, UserStore};
use crate::{
    dto::UpdateEventDto,
    errors::BoothError,
    models::{Event, Photo, User},
};

#[derive(Debug, Default)]
pub struct MemoryStore {
    events: RwLock<Vec<Event>>,
    users: RwLock<Vec<User>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn create(&self, mut event: Event) -> Result<Event, BoothError> {
        let mut events = self.events.write().await;
        if events.iter().any(|e| e.name == event.name) {
            return Err(BoothError::DuplicateName(event.name));
        }
        event.gallery.clear();
        events.push(event.clone());
        Ok(event)
    }

    async fn get_all(&self) -> Result<Vec<Event>, BoothError> {
        Ok(self.events.read().await.clone())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Event>, BoothError> {
        Ok(self.events.read().await.iter().find(|e| e.id == id).cloned())
    }

    async fn find_id_by_name(&self, name: &str) -> Result<Option<Uuid>, BoothError> {
        Ok(self
            .events
            .read()
            .await
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.id))
    }

    async fn set_fields(&self, id: Uuid, fields: UpdateEventDto) -> Result<Event, BoothError> {
        let mut events = self.events.write().await;
        if let Some(name) = &fields.name {
            if events.iter().any(|e| e.id != id && &e.name == name) {
                return Err(BoothError::DuplicateName(name.clone()));
            }
        }
        let event = events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(BoothError::not_found_event)?;
        let UpdateEventDto {
            name,
            date,
            prompt_title,
            prompt,
            negative_prompt,
            logo_url,
            logo_placement,
        } = fields;
        if let Some(v) = name {
            event.name = v;
        }
        if let Some(v) = date {
            event.date = v;
        }
        if let Some(v) = prompt_title {
            event.prompt_title = v;
        }
        if let Some(v) = prompt {
            event.prompt = v;
        }
        if let Some(v) = negative_prompt {
            event.negative_prompt = v;
        }
        if let Some(v) = logo_url {
            event.logo_url = Some(v);
        }
        if let Some(v) = logo_placement {
            event.logo_placement = v;
        }
        Ok(event.clone())
    }

    async fn append_photo(&self, id: Uuid, photo: Photo) -> Result<(), BoothError> {
        let mut events = self.events.write().await;
        let event = events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(BoothError::not_found_event)?;
        event.gallery.push(photo);
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, user: User) -> Result<(), BoothError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.username == user.username) {
            return Err(BoothError::DuplicateUser(user.username));
        }
        users.push(user);
        Ok(())
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, BoothError> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LogoPlacement;
    use chrono::Utc;

    fn event(name: &str) -> Event {
        Event {
            id: Uuid::new_v4(),
            name: name.to_string(),
            date: Utc::now(),
            prompt_title: String::new(),
            prompt: String::new(),
            negative_prompt: String::new(),
            logo_url: None,
            logo_placement: LogoPlacement::Unset,
            gallery: Vec::new(),
        }
    }

    #[tokio::test]
    async fn rename_onto_taken_name_is_rejected() {
        let store = MemoryStore::new();
        EventStore::create(&store, event("Gala")).await.unwrap();
        let other = EventStore::create(&store, event("Brunch")).await.unwrap();

        let fields = UpdateEventDto {
            name: Some("Gala".to_string()),
            ..Default::default()
        };
        let err = store.set_fields(other.id, fields).await.unwrap_err();
        assert_eq!(err, BoothError::DuplicateName("Gala".to_string()));
        let stored = store.get_by_id(other.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Brunch");
    }

    #[tokio::test]
    async fn append_to_unknown_event_is_not_found() {
        let store = MemoryStore::new();
        let photo = Photo {
            image_url: "http://x/1.jpg".to_string(),
            file_id: None,
            phone_number: None,
            email: Some("a@b.com".to_string()),
            delivery_state: None,
        };
        let err = store.append_photo(Uuid::new_v4(), photo).await.unwrap_err();
        assert_eq!(err, BoothError::not_found_event());
    }
}
