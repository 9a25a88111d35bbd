use gaia_core::error::{GaiaError, Result};
use gaia_core::types::*;
use libsql::{Builder, Connection, Database};

const TRIGGER_COLUMNS: &str =
    "id, keywords, is_enabled, action_type, response_text, response_buttons, created_at";

/// Trigger rules and the studio profile, backed by libsql.
pub struct StudioStore {
    db: Database,
}

fn db_err(e: libsql::Error) -> GaiaError {
    GaiaError::Database(e.to_string())
}

/// Read a nullable TEXT column as Option<String>.
fn get_optional_string(row: &libsql::Row, idx: i32) -> Result<Option<String>> {
    let val = row.get::<libsql::Value>(idx).map_err(db_err)?;
    match val {
        libsql::Value::Null => Ok(None),
        libsql::Value::Text(s) => Ok(Some(s)),
        other => Err(GaiaError::Database(format!(
            "expected text or null at column {idx}, got: {other:?}"
        ))),
    }
}

impl StudioStore {
    /// Open a local libsql database at the given file path.
    pub async fn new(path: &str) -> Result<Self> {
        let db = Builder::new_local(path).build().await.map_err(db_err)?;
        let store = Self { db };
        store.init_tables().await?;
        Ok(store)
    }

    /// Open a remote Turso database.
    pub async fn new_remote(url: &str, token: &str) -> Result<Self> {
        let db = Builder::new_remote(url.to_string(), token.to_string())
            .build()
            .await
            .map_err(db_err)?;
        let store = Self { db };
        store.init_tables().await?;
        Ok(store)
    }

    /// Get a fresh database connection per call.
    fn conn(&self) -> Result<Connection> {
        self.db.connect().map_err(db_err)
    }

    async fn init_tables(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS gaia_triggers (
                id TEXT PRIMARY KEY,
                keywords TEXT NOT NULL,
                is_enabled INTEGER NOT NULL DEFAULT 1,
                action_type TEXT NOT NULL DEFAULT 'generic',
                response_text TEXT NOT NULL,
                response_buttons TEXT,
                created_at INTEGER NOT NULL
            )",
            (),
        )
        .await
        .map_err(db_err)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS studio_profile (
                id TEXT PRIMARY KEY,
                google_maps_url TEXT,
                address_street TEXT,
                address_number TEXT,
                address_neighborhood TEXT,
                address_city TEXT,
                address_state TEXT,
                updated_at INTEGER NOT NULL
            )",
            (),
        )
        .await
        .map_err(db_err)?;

        Ok(())
    }

    /// Insert a trigger rule and return the stored row.
    pub async fn create_trigger(&self, new: &NewTrigger) -> Result<Trigger> {
        let id = new_id();
        let now = now_unix();
        let keywords = serde_json::to_string(&new.keywords)?;
        let buttons = new
            .response_buttons
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        self.conn()?
            .execute(
                "INSERT INTO gaia_triggers (id, keywords, is_enabled, action_type, response_text, response_buttons, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                libsql::params![
                    id.clone(),
                    keywords,
                    i64::from(new.is_enabled),
                    new.action_type.as_str().to_string(),
                    new.response_text.clone(),
                    buttons,
                    now
                ],
            )
            .await
            .map_err(db_err)?;

        tracing::info!(trigger_id = %id, action = new.action_type.as_str(), "trigger created");

        Ok(Trigger {
            id,
            keywords: new.keywords.clone(),
            is_enabled: new.is_enabled,
            action_type: new.action_type,
            response_text: new.response_text.clone(),
            response_buttons: new.response_buttons.clone(),
            created_at: now,
        })
    }

    /// All enabled triggers in creation order. This is the matcher's input.
    pub async fn enabled_triggers(&self) -> Result<Vec<Trigger>> {
        let sql = format!(
            "SELECT {TRIGGER_COLUMNS} FROM gaia_triggers WHERE is_enabled = 1 ORDER BY created_at ASC, rowid ASC"
        );
        self.query_triggers(&sql).await
    }

    /// Every trigger, enabled or not, in creation order.
    pub async fn list_triggers(&self) -> Result<Vec<Trigger>> {
        let sql = format!(
            "SELECT {TRIGGER_COLUMNS} FROM gaia_triggers ORDER BY created_at ASC, rowid ASC"
        );
        self.query_triggers(&sql).await
    }

    /// Rows that cannot be decoded are logged and skipped; the rest still load.
    async fn query_triggers(&self, sql: &str) -> Result<Vec<Trigger>> {
        let mut rows = self.conn()?.query(sql, ()).await.map_err(db_err)?;

        let mut triggers = Vec::new();
        while let Some(row) = rows.next().await.map_err(db_err)? {
            match row_to_trigger(&row) {
                Ok(trigger) => triggers.push(trigger),
                Err(e) => {
                    let trigger_id = row.get::<String>(0).unwrap_or_default();
                    tracing::warn!(%trigger_id, error = %e, "skipping malformed trigger row");
                }
            }
        }
        Ok(triggers)
    }

    pub async fn set_trigger_enabled(&self, trigger_id: &str, enabled: bool) -> Result<()> {
        let affected = self
            .conn()?
            .execute(
                "UPDATE gaia_triggers SET is_enabled = ?1 WHERE id = ?2",
                libsql::params![i64::from(enabled), trigger_id.to_string()],
            )
            .await
            .map_err(db_err)?;

        if affected == 0 {
            return Err(GaiaError::Database(format!(
                "trigger not found: {trigger_id}"
            )));
        }

        Ok(())
    }

    pub async fn delete_trigger(&self, trigger_id: &str) -> Result<()> {
        let affected = self
            .conn()?
            .execute(
                "DELETE FROM gaia_triggers WHERE id = ?1",
                libsql::params![trigger_id.to_string()],
            )
            .await
            .map_err(db_err)?;

        if affected == 0 {
            return Err(GaiaError::Database(format!(
                "trigger not found: {trigger_id}"
            )));
        }

        Ok(())
    }

    /// Fetch the profile row for a tenant key.
    pub async fn get_profile(&self, profile_id: &str) -> Result<Option<StudioProfile>> {
        let mut rows = self
            .conn()?
            .query(
                "SELECT google_maps_url, address_street, address_number, address_neighborhood, address_city, address_state FROM studio_profile WHERE id = ?1",
                libsql::params![profile_id.to_string()],
            )
            .await
            .map_err(db_err)?;

        match rows.next().await.map_err(db_err)? {
            Some(row) => Ok(Some(StudioProfile {
                google_maps_url: get_optional_string(&row, 0)?,
                address_street: get_optional_string(&row, 1)?,
                address_number: get_optional_string(&row, 2)?,
                address_neighborhood: get_optional_string(&row, 3)?,
                address_city: get_optional_string(&row, 4)?,
                address_state: get_optional_string(&row, 5)?,
            })),
            None => Ok(None),
        }
    }

    /// Insert or replace the profile row for a tenant key.
    pub async fn upsert_profile(&self, profile_id: &str, profile: &StudioProfile) -> Result<()> {
        self.conn()?
            .execute(
                "INSERT INTO studio_profile (id, google_maps_url, address_street, address_number, address_neighborhood, address_city, address_state, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                 ON CONFLICT(id) DO UPDATE SET
                    google_maps_url = excluded.google_maps_url,
                    address_street = excluded.address_street,
                    address_number = excluded.address_number,
                    address_neighborhood = excluded.address_neighborhood,
                    address_city = excluded.address_city,
                    address_state = excluded.address_state,
                    updated_at = excluded.updated_at",
                libsql::params![
                    profile_id.to_string(),
                    profile.google_maps_url.clone(),
                    profile.address_street.clone(),
                    profile.address_number.clone(),
                    profile.address_neighborhood.clone(),
                    profile.address_city.clone(),
                    profile.address_state.clone(),
                    now_unix()
                ],
            )
            .await
            .map_err(db_err)?;

        Ok(())
    }
}

/// Extract a Trigger from a row selected with `TRIGGER_COLUMNS`.
fn row_to_trigger(row: &libsql::Row) -> Result<Trigger> {
    let id = row.get::<String>(0).map_err(db_err)?;
    let keywords_json = row.get::<String>(1).map_err(db_err)?;
    let keywords: Vec<String> = serde_json::from_str(&keywords_json).map_err(|e| {
        GaiaError::Database(format!("trigger {id} has malformed keywords: {e}"))
    })?;
    let response_buttons = match get_optional_string(row, 5)? {
        Some(json) if !json.trim().is_empty() => {
            Some(serde_json::from_str::<Vec<ButtonTemplate>>(&json).map_err(|e| {
                GaiaError::Database(format!("trigger {id} has malformed buttons: {e}"))
            })?)
        }
        _ => None,
    };

    Ok(Trigger {
        keywords,
        is_enabled: row.get::<i64>(2).map_err(db_err)? != 0,
        action_type: ActionType::parse(&row.get::<String>(3).map_err(db_err)?),
        response_text: row.get::<String>(4).map_err(db_err)?,
        response_buttons,
        created_at: row.get::<i64>(6).map_err(db_err)?,
        id,
    })
}
