//! Local SQLite-backed membership store via libsql. Used when the hosted backend
//! is not configured.
//!
//! Single `memberships` table in data/memberships.db. Areas are stored as JSON;
//! dates as ISO text; ids are random UUIDs.

use crate::domain::{
    Area, DomainError, MembershipPatch, MembershipRecord, MembershipStatus, NewMembership,
};
use crate::ports::MembershipStore;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use libsql::{Connection, Database, Row, params};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::info;

const MEMBERSHIPS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS memberships (
    id TEXT PRIMARY KEY,
    client_name TEXT NOT NULL,
    client_phone TEXT NOT NULL,
    client_email TEXT,
    membership_type TEXT NOT NULL,
    plan_name TEXT NOT NULL,
    areas_json TEXT NOT NULL DEFAULT '[]',
    monthly_payment INTEGER NOT NULL,
    initial_payment INTEGER NOT NULL,
    total_sessions INTEGER NOT NULL,
    completed_sessions INTEGER NOT NULL DEFAULT 0,
    start_date TEXT NOT NULL,
    end_date TEXT,
    status TEXT NOT NULL DEFAULT 'activa',
    notes TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)"#;
const MEMBERSHIPS_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_memberships_created ON memberships (created_at DESC)";

const SELECT_COLUMNS: &str = "id, client_name, client_phone, client_email, membership_type, \
     plan_name, areas_json, monthly_payment, initial_payment, total_sessions, completed_sessions, \
     start_date, end_date, status, notes, created_at, updated_at";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Fixed-width timestamps so text ordering matches time ordering.
fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn repo_err(e: impl std::fmt::Display) -> DomainError {
    DomainError::Store(e.to_string())
}

/// Enum values are stored with their wire names, same as the hosted table.
fn wire_name<T: Serialize>(value: &T) -> Result<String, DomainError> {
    match serde_json::to_value(value).map_err(repo_err)? {
        serde_json::Value::String(s) => Ok(s),
        other => Err(repo_err(format!("unexpected enum encoding: {}", other))),
    }
}

fn from_wire_name<T: DeserializeOwned>(s: &str) -> Result<T, DomainError> {
    serde_json::from_value(serde_json::Value::String(s.to_string())).map_err(repo_err)
}

fn amount(row: &Row, idx: i32) -> Result<u32, DomainError> {
    let v: i64 = row.get(idx).map_err(repo_err)?;
    u32::try_from(v).map_err(repo_err)
}

/// SQLite membership store. One database file in the given base directory.
pub struct SqliteMembershipStore {
    db: Database,
    db_path: PathBuf,
}

impl SqliteMembershipStore {
    /// Connect to (or create) the database and ensure the schema exists.
    pub async fn connect(base_dir: impl AsRef<Path>) -> Result<Self, DomainError> {
        let base = base_dir.as_ref();
        std::fs::create_dir_all(base).map_err(repo_err)?;
        let db_path = base.join("memberships.db");
        let path_str = db_path.to_string_lossy();
        let db = libsql::Builder::new_local(path_str.as_ref())
            .build()
            .await
            .map_err(repo_err)?;
        let conn = db.connect().map_err(repo_err)?;

        // PRAGMA returns a row; drain it through query since execute rejects rows.
        let mut wal_rows = conn
            .query("PRAGMA journal_mode=WAL", ())
            .await
            .map_err(|e| repo_err(format!("WAL pragma failed: {}", e)))?;
        while wal_rows.next().await.map_err(repo_err)?.is_some() {}

        conn.execute(MEMBERSHIPS_TABLE, ()).await.map_err(repo_err)?;
        conn.execute(MEMBERSHIPS_INDEX, ()).await.map_err(repo_err)?;

        info!(path = %db_path.display(), "local membership store ready");

        Ok(Self { db, db_path })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn conn(&self) -> Result<Connection, DomainError> {
        self.db.connect().map_err(repo_err)
    }

    fn row_to_record(row: &Row) -> Result<MembershipRecord, DomainError> {
        let areas_json: String = row.get(6).map_err(repo_err)?;
        let areas: Vec<Area> = serde_json::from_str(&areas_json).map_err(repo_err)?;
        let start_date: String = row.get(11).map_err(repo_err)?;
        let end_date: Option<String> = row.get::<String>(12).ok();
        let status: String = row.get(13).map_err(repo_err)?;
        let created_at: String = row.get(15).map_err(repo_err)?;
        let updated_at: String = row.get(16).map_err(repo_err)?;
        let membership_type: String = row.get(4).map_err(repo_err)?;
        let plan_name: String = row.get(5).map_err(repo_err)?;

        Ok(MembershipRecord {
            id: row.get(0).map_err(repo_err)?,
            client_name: row.get(1).map_err(repo_err)?,
            client_phone: row.get(2).map_err(repo_err)?,
            client_email: row.get::<String>(3).ok(),
            membership_type: from_wire_name(&membership_type)?,
            plan_name: from_wire_name(&plan_name)?,
            areas,
            monthly_payment: amount(row, 7)?,
            initial_payment: amount(row, 8)?,
            total_sessions: amount(row, 9)?,
            completed_sessions: amount(row, 10)?,
            start_date: NaiveDate::parse_from_str(&start_date, DATE_FORMAT).map_err(repo_err)?,
            end_date: end_date
                .map(|d| NaiveDate::parse_from_str(&d, DATE_FORMAT))
                .transpose()
                .map_err(repo_err)?,
            status: MembershipStatus::from_wire_name(&status)
                .ok_or_else(|| repo_err(format!("unknown status {}", status)))?,
            notes: row.get::<String>(14).ok(),
            created_at: DateTime::parse_from_rfc3339(&created_at)
                .map_err(repo_err)?
                .with_timezone(&Utc),
            updated_at: DateTime::parse_from_rfc3339(&updated_at)
                .map_err(repo_err)?
                .with_timezone(&Utc),
        })
    }

    /// Column assignments for a patch, as (column, value) pairs.
    fn patch_columns(patch: &MembershipPatch) -> Result<Vec<(&'static str, libsql::Value)>, DomainError> {
        use libsql::Value;

        fn text(s: Option<String>) -> Value {
            s.map(Value::Text).unwrap_or(Value::Null)
        }

        let mut cols = Vec::new();
        if let Some(v) = &patch.client_name {
            cols.push(("client_name", Value::Text(v.clone())));
        }
        if let Some(v) = &patch.client_phone {
            cols.push(("client_phone", Value::Text(v.clone())));
        }
        if let Some(v) = &patch.client_email {
            cols.push(("client_email", text(v.clone())));
        }
        if let Some(v) = &patch.membership_type {
            cols.push(("membership_type", Value::Text(wire_name(v)?)));
        }
        if let Some(v) = &patch.plan_name {
            cols.push(("plan_name", Value::Text(wire_name(v)?)));
        }
        if let Some(v) = &patch.areas {
            let json = serde_json::to_string(v).map_err(repo_err)?;
            cols.push(("areas_json", Value::Text(json)));
        }
        if let Some(v) = patch.monthly_payment {
            cols.push(("monthly_payment", Value::Integer(i64::from(v))));
        }
        if let Some(v) = patch.initial_payment {
            cols.push(("initial_payment", Value::Integer(i64::from(v))));
        }
        if let Some(v) = patch.total_sessions {
            cols.push(("total_sessions", Value::Integer(i64::from(v))));
        }
        if let Some(v) = patch.completed_sessions {
            cols.push(("completed_sessions", Value::Integer(i64::from(v))));
        }
        if let Some(v) = patch.start_date {
            cols.push(("start_date", Value::Text(v.format(DATE_FORMAT).to_string())));
        }
        if let Some(v) = patch.status {
            cols.push(("status", Value::Text(v.wire_name().to_string())));
        }
        if let Some(v) = &patch.notes {
            cols.push(("notes", text(v.clone())));
        }
        Ok(cols)
    }
}

#[async_trait::async_trait]
impl MembershipStore for SqliteMembershipStore {
    async fn list(&self) -> Result<Vec<MembershipRecord>, DomainError> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM memberships ORDER BY created_at DESC",
            SELECT_COLUMNS
        );
        let mut rows = conn.query(&sql, ()).await.map_err(repo_err)?;
        let mut records = Vec::new();
        while let Some(row) = rows.next().await.map_err(repo_err)? {
            records.push(Self::row_to_record(&row)?);
        }
        Ok(records)
    }

    async fn insert(&self, m: &NewMembership) -> Result<String, DomainError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = timestamp_now();
        let areas_json = serde_json::to_string(&m.areas).map_err(repo_err)?;
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO memberships (
                id, client_name, client_phone, client_email, membership_type, plan_name,
                areas_json, monthly_payment, initial_payment, total_sessions, completed_sessions,
                start_date, end_date, status, notes, created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, 0, ?11, NULL, 'activa', ?12, ?13, ?13)
            "#,
            params![
                id.as_str(),
                m.client_name.as_str(),
                m.client_phone.as_str(),
                m.client_email.clone(),
                wire_name(&m.membership_type)?,
                wire_name(&m.plan_name)?,
                areas_json,
                i64::from(m.monthly_payment),
                i64::from(m.initial_payment),
                i64::from(m.total_sessions),
                m.start_date.format(DATE_FORMAT).to_string(),
                m.notes.clone(),
                now
            ],
        )
        .await
        .map_err(repo_err)?;
        Ok(id)
    }

    async fn update(&self, id: &str, patch: &MembershipPatch) -> Result<(), DomainError> {
        let mut cols = Self::patch_columns(patch)?;
        if cols.is_empty() {
            return Ok(());
        }
        cols.push(("updated_at", libsql::Value::Text(timestamp_now())));

        let assignments: Vec<String> = cols
            .iter()
            .enumerate()
            .map(|(i, (col, _))| format!("{} = ?{}", col, i + 1))
            .collect();
        let sql = format!(
            "UPDATE memberships SET {} WHERE id = ?{}",
            assignments.join(", "),
            cols.len() + 1
        );
        let mut values: Vec<libsql::Value> = cols.into_iter().map(|(_, v)| v).collect();
        values.push(libsql::Value::Text(id.to_string()));

        let conn = self.conn()?;
        let changed = conn.execute(&sql, values).await.map_err(repo_err)?;
        if changed == 0 {
            return Err(repo_err(format!("membership {} not found", id)));
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM memberships WHERE id = ?1", params![id])
            .await
            .map_err(repo_err)?;
        Ok(())
    }
}
