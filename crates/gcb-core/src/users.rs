//! Per-user persistence: the registered-user roster and message history.

use async_trait::async_trait;
use gcb_store::PsqlStore;
use sqlx::postgres::PgRow;
use sqlx::Row;

use crate::{
    domain::{Address, RegisteredUser},
    Error, Result,
};

/// Idempotent schema for the bot's tables. Timestamps are UTC, stored
/// without time zone.
pub const DATABASE_TABLES: &str = "
CREATE TABLE IF NOT EXISTS registered_users (
    address VARCHAR PRIMARY KEY,
    messages_sent BIGINT DEFAULT 0,
    first_joined TIMESTAMP WITHOUT TIME ZONE DEFAULT (now() AT TIME ZONE 'utc'),
    last_seen TIMESTAMP WITHOUT TIME ZONE DEFAULT (now() AT TIME ZONE 'utc'),
    registered BOOLEAN DEFAULT TRUE,
    ban_release_date TIMESTAMP WITHOUT TIME ZONE DEFAULT NULL
);

CREATE TABLE IF NOT EXISTS message_history (
    message_id BIGSERIAL PRIMARY KEY,
    address VARCHAR NOT NULL,
    message VARCHAR,
    date TIMESTAMP WITHOUT TIME ZONE DEFAULT (now() AT TIME ZONE 'utc')
);

CREATE TABLE IF NOT EXISTS reports (
    report_id BIGSERIAL PRIMARY KEY,
    reporter VARCHAR NOT NULL,
    reportee VARCHAR NOT NULL,
    report VARCHAR
);
";

/// Roster queries used by the chat service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn load(&self, address: &Address) -> Result<Option<RegisteredUser>>;

    /// Upsert the user's registration flag, refreshing `last_seen`.
    async fn set_registered(&self, address: &Address, registered: bool) -> Result<()>;

    /// Number of registered users who are not currently banned.
    async fn active_count(&self) -> Result<i64>;

    /// Addresses of all registered users (fan-out targets).
    async fn registered_addresses(&self) -> Result<Vec<Address>>;

    async fn bump_messages_sent(&self, address: &Address) -> Result<()>;

    /// Append a relayed message to the history table.
    async fn record_message(&self, address: &Address, body: &str) -> Result<()>;
}

/// Postgres-backed roster over [`PsqlStore`].
#[derive(Clone)]
pub struct PsqlUserDirectory {
    store: PsqlStore,
}

impl PsqlUserDirectory {
    pub fn new(store: PsqlStore) -> Self {
        Self { store }
    }

    /// Create the schema and tables. Safe to call on every startup.
    pub async fn initialize(&self) -> Result<()> {
        self.store.initialize(Some(DATABASE_TABLES)).await?;
        Ok(())
    }

    pub fn store(&self) -> &PsqlStore {
        &self.store
    }
}

#[async_trait]
impl UserDirectory for PsqlUserDirectory {
    async fn load(&self, address: &Address) -> Result<Option<RegisteredUser>> {
        let row = self
            .store
            .fetchrow(
                "SELECT address, messages_sent, first_joined, last_seen, registered, \
                 ban_release_date FROM registered_users WHERE address = $1",
                vec![address.0.as_str().into()],
            )
            .await?;
        row.map(|row| decode_user(&row)).transpose()
    }

    async fn set_registered(&self, address: &Address, registered: bool) -> Result<()> {
        self.store
            .execute(
                "INSERT INTO registered_users (address, last_seen, registered) \
                 VALUES ($1, now() AT TIME ZONE 'utc', $2) \
                 ON CONFLICT (address) DO UPDATE SET \
                 last_seen = EXCLUDED.last_seen, registered = EXCLUDED.registered",
                vec![address.0.as_str().into(), registered.into()],
            )
            .await?;
        Ok(())
    }

    async fn active_count(&self) -> Result<i64> {
        let count = self
            .store
            .fetchval::<i64>(
                "SELECT COUNT(*) FROM registered_users WHERE registered = TRUE \
                 AND (ban_release_date IS NULL OR ban_release_date < (now() AT TIME ZONE 'utc'))",
                vec![],
            )
            .await?;
        Ok(count.unwrap_or(0))
    }

    async fn registered_addresses(&self) -> Result<Vec<Address>> {
        let rows = self
            .store
            .fetch(
                "SELECT address FROM registered_users WHERE registered = TRUE",
                vec![],
            )
            .await?;
        let mut addresses = Vec::with_capacity(rows.len());
        for row in &rows {
            addresses.push(Address(
                row.try_get::<String, _>(0)
                    .map_err(gcb_store::StoreError::from)?,
            ));
        }
        Ok(addresses)
    }

    async fn bump_messages_sent(&self, address: &Address) -> Result<()> {
        self.store
            .execute(
                "UPDATE registered_users SET messages_sent = messages_sent + 1 WHERE address = $1",
                vec![address.0.as_str().into()],
            )
            .await?;
        Ok(())
    }

    async fn record_message(&self, address: &Address, body: &str) -> Result<()> {
        self.store
            .execute(
                "INSERT INTO message_history (address, message) VALUES ($1, $2)",
                vec![address.0.as_str().into(), body.into()],
            )
            .await?;
        Ok(())
    }
}

fn decode_user(row: &PgRow) -> Result<RegisteredUser> {
    let decode = |e: sqlx::Error| Error::from(gcb_store::StoreError::from(e));
    Ok(RegisteredUser {
        address: Address(row.try_get("address").map_err(decode)?),
        messages_sent: row.try_get("messages_sent").map_err(decode)?,
        first_joined: row.try_get("first_joined").map_err(decode)?,
        last_seen: row.try_get("last_seen").map_err(decode)?,
        registered: row.try_get("registered").map_err(decode)?,
        ban_release_date: row.try_get("ban_release_date").map_err(decode)?,
    })
}
