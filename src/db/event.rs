use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{prelude::FromRow, types::Json, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{map_unique_violation, EventStore};
use crate::{
    dto::UpdateEventDto,
    errors::BoothError,
    models::{Event, Photo},
    PGPool,
};

const EVENT_COLUMNS: &str =
    "id, name, date, prompt_title, prompt, negative_prompt, logo_url, logo_placement, gallery";

#[derive(Debug, FromRow)]
struct EventRow {
    id: Uuid,
    name: String,
    date: DateTime<Utc>,
    prompt_title: String,
    prompt: String,
    negative_prompt: String,
    logo_url: Option<String>,
    logo_placement: String,
    gallery: Json<Vec<Photo>>,
}

impl TryFrom<EventRow> for Event {
    type Error = BoothError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        let logo_placement = row
            .logo_placement
            .parse()
            .map_err(|_| BoothError::Store(format!("bad logo_placement on event {}", row.id)))?;
        Ok(Event {
            id: row.id,
            name: row.name,
            date: row.date,
            prompt_title: row.prompt_title,
            prompt: row.prompt,
            negative_prompt: row.negative_prompt,
            logo_url: row.logo_url,
            logo_placement,
            gallery: row.gallery.0,
        })
    }
}

/// PostgreSQL-backed event store. The gallery lives in a JSONB column.
#[derive(Clone)]
pub struct PgEventStore {
    pool: PGPool,
}

impl PgEventStore {
    pub fn new(pool: PGPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventStore for PgEventStore {
    async fn create(&self, event: Event) -> Result<Event, BoothError> {
        let sql = format!(
            "INSERT INTO events ({EVENT_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, '[]'::jsonb) \
             RETURNING {EVENT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, EventRow>(&sql)
            .bind(event.id)
            .bind(&event.name)
            .bind(event.date)
            .bind(&event.prompt_title)
            .bind(&event.prompt)
            .bind(&event.negative_prompt)
            .bind(&event.logo_url)
            .bind(event.logo_placement.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|err| map_unique_violation(err, BoothError::DuplicateName(event.name.clone())))?;
        row.try_into()
    }

    async fn get_all(&self) -> Result<Vec<Event>, BoothError> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events ORDER BY seq");
        sqlx::query_as::<_, EventRow>(&sql)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Event::try_from)
            .collect()
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Event>, BoothError> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1");
        sqlx::query_as::<_, EventRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Event::try_from)
            .transpose()
    }

    async fn find_id_by_name(&self, name: &str) -> Result<Option<Uuid>, BoothError> {
        let id = sqlx::query_scalar::<_, Uuid>("SELECT id FROM events WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(id)
    }

    async fn set_fields(&self, id: Uuid, fields: UpdateEventDto) -> Result<Event, BoothError> {
        if fields.is_empty() {
            return self
                .get_by_id(id)
                .await?
                .ok_or_else(BoothError::not_found_event);
        }
        let duplicate = BoothError::DuplicateName(fields.name.clone().unwrap_or_default());
        let mut query_builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE events SET ");
        {
            let mut separated = query_builder.separated(", ");
            if let Some(v) = fields.name {
                separated.push("name = ");
                separated.push_bind_unseparated(v);
            }
            if let Some(v) = fields.date {
                separated.push("date = ");
                separated.push_bind_unseparated(v);
            }
            if let Some(v) = fields.prompt_title {
                separated.push("prompt_title = ");
                separated.push_bind_unseparated(v);
            }
            if let Some(v) = fields.prompt {
                separated.push("prompt = ");
                separated.push_bind_unseparated(v);
            }
            if let Some(v) = fields.negative_prompt {
                separated.push("negative_prompt = ");
                separated.push_bind_unseparated(v);
            }
            if let Some(v) = fields.logo_url {
                separated.push("logo_url = ");
                separated.push_bind_unseparated(v);
            }
            if let Some(v) = fields.logo_placement {
                separated.push("logo_placement = ");
                separated.push_bind_unseparated(v.as_str());
            }
        }
        query_builder.push(" WHERE id = ");
        query_builder.push_bind(id);
        query_builder.push(format!(" RETURNING {EVENT_COLUMNS}"));

        let row = query_builder
            .build_query_as::<EventRow>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| map_unique_violation(err, duplicate))?;
        match row {
            Some(row) => row.try_into(),
            None => Err(BoothError::not_found_event()),
        }
    }

    async fn append_photo(&self, id: Uuid, photo: Photo) -> Result<(), BoothError> {
        let res = sqlx::query(
            "UPDATE events SET gallery = gallery || jsonb_build_array($2::jsonb) WHERE id = $1",
        )
        .bind(id)
        .bind(Json(photo))
        .execute(&self.pool)
        .await?;
        if res.rows_affected() == 0 {
            return Err(BoothError::not_found_event());
        }
        Ok(())
    }
}
