//! PostgreSQL implementation of the document store.
//!
//! Events carry a `version` column. The registration transaction reads
//! `(registered, capacity, version)`, checks capacity, then bumps the
//! counter with `WHERE version = $read_version` and inserts the
//! registration in the same database transaction. An update that matches
//! no row means the read set changed underneath us; the attempt is rolled
//! back and rerun by [`run_optimistic`].

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use sqlx::migrate::Migrator;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::types::Json;
use uuid::Uuid;

use super::retry::{Attempt, RetryPolicy, run_optimistic};
use super::{DocumentStore, StoreMode};
use crate::config::StoreSettings;
use crate::domain::{
    Event, EventId, ExtraFields, NewEvent, RegistrantData, Registration, RegistrationId,
    check_capacity,
};
use crate::error::PortalError;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// SQLSTATE codes that mean "retry the whole transaction".
const RETRYABLE_SQLSTATES: [&str; 2] = ["40001", "40P01"];

/// PostgreSQL-backed store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
    retry: RetryPolicy,
}

/// Outcome of one registration attempt before error classification.
enum Step {
    Done(Registration),
    Conflict,
    Rejected(PortalError),
}

#[derive(Debug, sqlx::FromRow)]
struct EventRow {
    id: Uuid,
    title: String,
    description: Option<String>,
    date: Option<String>,
    time: Option<String>,
    venue: Option<String>,
    category: Option<String>,
    organizer: Option<String>,
    image_url: Option<String>,
    capacity: i64,
    registered: i64,
    created_at: DateTime<Utc>,
    extra: Json<ExtraFields>,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Self {
            id: EventId::from_uuid(row.id),
            title: row.title,
            description: row.description,
            date: row.date,
            time: row.time,
            venue: row.venue,
            category: row.category,
            organizer: row.organizer,
            image_url: row.image_url,
            capacity: counter(row.capacity),
            registered: counter(row.registered),
            created_at: row.created_at,
            extra: row.extra.0,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct RegistrationRow {
    id: Uuid,
    event_id: Uuid,
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    student_id: Option<String>,
    department: Option<String>,
    year: Option<String>,
    extra: Json<ExtraFields>,
    registered_at: DateTime<Utc>,
}

impl From<RegistrationRow> for Registration {
    fn from(row: RegistrationRow) -> Self {
        Self {
            id: RegistrationId::from_uuid(row.id),
            event_id: EventId::from_uuid(row.event_id),
            registrant: RegistrantData {
                name: row.name,
                email: row.email,
                phone: row.phone,
                student_id: row.student_id,
                department: row.department,
                year: row.year,
                extra: row.extra.0,
            },
            registered_at: row.registered_at,
        }
    }
}

/// Narrows a `BIGINT` counter column to `u32`. Table constraints keep the
/// stored values in range.
fn counter(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

fn is_retryable(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db
            .code()
            .is_some_and(|code| RETRYABLE_SQLSTATES.contains(&&*code)),
        _ => false,
    }
}

/// Reads `(registered, capacity, version)` for one event.
async fn read_counters(
    conn: &mut PgConnection,
    event_id: EventId,
) -> Result<Option<(u32, u32, i64)>, sqlx::Error> {
    let read: Option<(i64, i64, i64)> =
        sqlx::query_as("SELECT registered, capacity, version FROM events WHERE id = $1")
            .bind(event_id.as_uuid())
            .fetch_optional(conn)
            .await?;
    Ok(read.map(|(registered, capacity, version)| {
        (counter(registered), counter(capacity), version)
    }))
}

/// Bumps the counter if the event is still at `version`. Returns `false`
/// when the row changed or disappeared since it was read.
async fn claim_seat(
    conn: &mut PgConnection,
    event_id: EventId,
    version: i64,
) -> Result<bool, sqlx::Error> {
    let updated = sqlx::query(
        "UPDATE events SET registered = registered + 1, version = version + 1 \
         WHERE id = $1 AND version = $2",
    )
    .bind(event_id.as_uuid())
    .bind(version)
    .execute(conn)
    .await?;
    Ok(updated.rows_affected() == 1)
}

async fn insert_registration(
    conn: &mut PgConnection,
    event_id: EventId,
    registrant: &RegistrantData,
) -> Result<Registration, sqlx::Error> {
    let (id, registered_at): (Uuid, DateTime<Utc>) = sqlx::query_as(
        "INSERT INTO registrations \
         (event_id, name, email, phone, student_id, department, year, extra) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING id, registered_at",
    )
    .bind(event_id.as_uuid())
    .bind(&registrant.name)
    .bind(&registrant.email)
    .bind(&registrant.phone)
    .bind(&registrant.student_id)
    .bind(&registrant.department)
    .bind(&registrant.year)
    .bind(Json(&registrant.extra))
    .fetch_one(conn)
    .await?;

    Ok(Registration {
        id: RegistrationId::from_uuid(id),
        event_id,
        registrant: registrant.clone(),
        registered_at,
    })
}

impl PostgresStore {
    /// Creates a store over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool, retry: RetryPolicy) -> Self {
        Self { pool, retry }
    }

    /// Connects using `settings` and applies pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::NotConfigured`] if a required attribute is
    /// missing, or [`PortalError::PersistenceError`] if the connection or a
    /// migration fails.
    pub async fn connect(settings: &StoreSettings, retry: RetryPolicy) -> Result<Self, PortalError> {
        let (Some(host), Some(database), Some(user)) =
            (&settings.host, &settings.database, &settings.user)
        else {
            return Err(PortalError::NotConfigured(format!(
                "missing store connection attributes: {}",
                settings.missing_keys().join(", ")
            )));
        };

        let mut options = PgConnectOptions::new()
            .host(host)
            .port(settings.port)
            .database(database)
            .username(user);
        if let Some(password) = &settings.password {
            options = options.password(password);
        }

        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(Duration::from_secs(settings.connect_timeout_secs))
            .connect_with(options)
            .await?;

        MIGRATOR
            .run(&pool)
            .await
            .map_err(|e| PortalError::PersistenceError(e.to_string()))?;

        Ok(Self::new(pool, retry))
    }

    async fn register_once(
        &self,
        event_id: EventId,
        registrant: &RegistrantData,
    ) -> Result<Step, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let Some((registered, capacity, version)) = read_counters(&mut *tx, event_id).await?
        else {
            tx.rollback().await?;
            return Ok(Step::Rejected(PortalError::event_not_found(event_id)));
        };
        if let Err(err) = check_capacity(registered, capacity) {
            tx.rollback().await?;
            return Ok(Step::Rejected(err));
        }

        if !claim_seat(&mut *tx, event_id, version).await? {
            tx.rollback().await?;
            return Ok(Step::Conflict);
        }

        let registration = insert_registration(&mut *tx, event_id, registrant).await?;
        tx.commit().await?;
        Ok(Step::Done(registration))
    }

    async fn try_register(
        &self,
        event_id: EventId,
        registrant: &RegistrantData,
    ) -> Result<Attempt<Registration>, PortalError> {
        match self.register_once(event_id, registrant).await {
            Ok(Step::Done(registration)) => Ok(Attempt::Committed(registration)),
            Ok(Step::Conflict) => Ok(Attempt::Conflict),
            Ok(Step::Rejected(err)) => Err(err),
            Err(err) if is_retryable(&err) => Ok(Attempt::Conflict),
            Err(err) => Err(err.into()),
        }
    }
}

#[async_trait]
impl DocumentStore for PostgresStore {
    fn mode(&self) -> StoreMode {
        StoreMode::Live
    }

    async fn list_events(&self) -> Result<Vec<Event>, PortalError> {
        let rows = sqlx::query_as::<_, EventRow>(
            "SELECT id, title, description, date, time, venue, category, organizer, \
             image_url, capacity, registered, created_at, extra FROM events",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Event::from).collect())
    }

    async fn list_registrations(&self) -> Result<Vec<Registration>, PortalError> {
        let rows = sqlx::query_as::<_, RegistrationRow>(
            "SELECT id, event_id, name, email, phone, student_id, department, year, extra, \
             registered_at FROM registrations",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Registration::from).collect())
    }

    async fn create_event(&self, new: NewEvent) -> Result<EventId, PortalError> {
        let id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO events \
             (title, description, date, time, venue, category, organizer, image_url, capacity, extra) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING id",
        )
        .bind(&new.title)
        .bind(&new.description)
        .bind(&new.date)
        .bind(&new.time)
        .bind(&new.venue)
        .bind(&new.category)
        .bind(&new.organizer)
        .bind(&new.image_url)
        .bind(i64::from(new.capacity))
        .bind(Json(&new.extra))
        .fetch_one(&self.pool)
        .await?;

        Ok(EventId::from_uuid(id))
    }

    async fn delete_event(&self, id: EventId) -> Result<(), PortalError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(PortalError::event_not_found(id));
        }
        Ok(())
    }

    async fn register(
        &self,
        event_id: EventId,
        registrant: RegistrantData,
    ) -> Result<Registration, PortalError> {
        let registrant = &registrant;
        run_optimistic(&self.retry, move |attempt| {
            tracing::trace!(%event_id, attempt, "registration attempt");
            self.try_register(event_id, registrant)
        })
        .await
    }
}
