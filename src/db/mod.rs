pub mod event;
pub mod memory;
pub mod user;

use async_trait::async_trait;
use log::{info, warn};
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use crate::{
    dto::UpdateEventDto,
    errors::BoothError,
    models::{Event, Photo, User},
    PGPool,
};

/// Persistence for events and their embedded galleries.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Inserts `event`; a taken name yields [`BoothError::DuplicateName`].
    async fn create(&self, event: Event) -> Result<Event, BoothError>;

    /// All events in insertion order.
    async fn get_all(&self) -> Result<Vec<Event>, BoothError>;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Event>, BoothError>;

    async fn find_id_by_name(&self, name: &str) -> Result<Option<Uuid>, BoothError>;

    /// Overwrites the given scalar fields and returns the stored event.
    async fn set_fields(&self, id: Uuid, fields: UpdateEventDto) -> Result<Event, BoothError>;

    /// Appends to the gallery in a single atomic write.
    async fn append_photo(&self, id: Uuid, photo: Photo) -> Result<(), BoothError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts `user`; a taken username yields [`BoothError::DuplicateUser`].
    async fn create(&self, user: User) -> Result<(), BoothError>;

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, BoothError>;
}

pub async fn init_db_pool(db_url: &str, max_connections: u32) -> Result<PGPool, BoothError> {
    warn!("connecting to database (max {} connections)", max_connections);
    let pool: PGPool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(db_url)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("connected to postgresql, migrations applied");
    Ok(pool)
}

/// Maps a unique-constraint violation to `duplicate`, anything else to a store error.
pub(crate) fn map_unique_violation(err: sqlx::Error, duplicate: BoothError) -> BoothError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => duplicate,
        _ => err.into(),
    }
}
