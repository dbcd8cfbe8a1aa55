use log::info;
use uuid::Uuid;

use super::crypto;
use crate::{db::UserStore, dto::NewUserDto, errors::BoothError, models::User};

pub async fn register(users: &dyn UserStore, dto: NewUserDto) -> Result<(), BoothError> {
    let NewUserDto { username, password } = dto;
    let username = username.trim().to_string();
    if username.is_empty() || password.is_empty() {
        return Err(BoothError::BadClientData(
            "username and password are required".to_string(),
        ));
    }
    if users.get_by_username(&username).await?.is_some() {
        return Err(BoothError::DuplicateUser(username));
    }
    let user = User {
        id: Uuid::new_v4(),
        pwd_hash: crypto::hash(password).await?,
        username,
    };
    let username = user.username.clone();
    users.create(user).await?;
    info!("registered user '{}'", username);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;
    use std::{cell::Cell, time::Duration};

    fn dto(username: &str, password: &str) -> NewUserDto {
        NewUserDto {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn second_registration_is_duplicate() {
        let store = MemoryStore::new();
        register(&store, dto("alice", "pw")).await.unwrap();
        assert_eq!(
            register(&store, dto("alice", "other")).await,
            Err(BoothError::DuplicateUser("alice".to_string()))
        );
    }

    #[tokio::test]
    async fn password_is_not_stored_in_plaintext() {
        let store = MemoryStore::new();
        register(&store, dto("alice", "pw-plain")).await.unwrap();
        let user = store.get_by_username("alice").await.unwrap().unwrap();
        assert_ne!(user.pwd_hash, "pw-plain");
        assert!(crypto::verify_password("pw-plain", &user.pwd_hash));
    }

    #[tokio::test]
    async fn blank_fields_are_rejected() {
        let store = MemoryStore::new();
        assert!(matches!(
            register(&store, dto("  ", "pw")).await,
            Err(BoothError::BadClientData(_))
        ));
    }

    #[tokio::test]
    async fn hashing_does_not_hold_the_runtime() {
        let store = MemoryStore::new();
        let done = Cell::new(false);
        let ticks = Cell::new(0u32);

        let registering = async {
            let res = register(&store, dto("alice", "pw")).await;
            done.set(true);
            res
        };
        let ticking = async {
            while !done.get() {
                tokio::time::sleep(Duration::from_millis(1)).await;
                ticks.set(ticks.get() + 1);
            }
        };
        let (res, ()) = tokio::join!(registering, ticking);

        res.unwrap();
        assert!(ticks.get() > 1, "runtime stalled while hashing");
    }
}
