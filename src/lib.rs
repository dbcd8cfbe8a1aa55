pub mod client;
pub mod config;
pub mod db;
pub mod dto;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod service;

use std::sync::Arc;

use sqlx::{postgres::Postgres, Pool};

use db::{
    event::PgEventStore, memory::MemoryStore, user::PgUserStore, EventStore, UserStore,
};
use service::auth::LoginThrottle;

pub type PGPool = Pool<Postgres>;

/// Shared handler state: the two stores and the login throttle.
#[derive(Clone)]
pub struct AppState {
    pub events: Arc<dyn EventStore>,
    pub users: Arc<dyn UserStore>,
    pub throttle: LoginThrottle,
}

impl AppState {
    pub fn postgres(pool: PGPool, throttle: LoginThrottle) -> Self {
        Self {
            events: Arc::new(PgEventStore::new(pool.clone())),
            users: Arc::new(PgUserStore::new(pool)),
            throttle,
        }
    }

    pub fn in_memory(throttle: LoginThrottle) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            events: store.clone(),
            users: store,
            throttle,
        }
    }
}
