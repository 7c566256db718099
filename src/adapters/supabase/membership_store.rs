//! PostgREST access to the `memberships` table. Implements MembershipStore.

use super::client::{SupabaseClient, ensure_success};
use crate::domain::{DomainError, MembershipPatch, MembershipRecord, NewMembership};
use crate::ports::MembershipStore;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};

const TABLE: &str = "memberships";

/// Row returned by `Prefer: return=representation`; only the id is needed.
#[derive(Deserialize)]
struct InsertedRow {
    id: serde_json::Value,
}

pub struct SupabaseMembershipStore {
    client: Arc<SupabaseClient>,
}

impl SupabaseMembershipStore {
    pub fn new(client: Arc<SupabaseClient>) -> Self {
        Self { client }
    }

    fn by_id(&self, id: &str) -> String {
        self.client.rest_url(&format!("{}?id=eq.{}", TABLE, id))
    }
}

fn store_err(context: &str, e: impl std::fmt::Display) -> DomainError {
    DomainError::Store(format!("{}: {}", context, e))
}

#[async_trait::async_trait]
impl MembershipStore for SupabaseMembershipStore {
    async fn list(&self) -> Result<Vec<MembershipRecord>, DomainError> {
        let url = self
            .client
            .rest_url(&format!("{}?select=*&order=created_at.desc", TABLE));
        let req = self.client.http().get(&url);
        let res = self
            .client
            .authorize(req)
            .await
            .send()
            .await
            .map_err(|e| store_err("list request failed", e))?;
        let res = ensure_success(res, "list memberships", DomainError::Store).await?;
        let records: Vec<MembershipRecord> = res
            .json()
            .await
            .map_err(|e| store_err("failed to parse memberships", e))?;
        debug!(count = records.len(), "memberships loaded");
        Ok(records)
    }

    async fn insert(&self, membership: &NewMembership) -> Result<String, DomainError> {
        let url = self.client.rest_url(TABLE);
        let req = self
            .client
            .http()
            .post(&url)
            .header("Prefer", "return=representation")
            .json(membership);
        let res = self
            .client
            .authorize(req)
            .await
            .send()
            .await
            .map_err(|e| store_err("insert request failed", e))?;
        let res = ensure_success(res, "insert membership", DomainError::Store).await?;
        let rows: Vec<InsertedRow> = res
            .json()
            .await
            .map_err(|e| store_err("failed to parse inserted row", e))?;
        let id = match rows.into_iter().next().map(|r| r.id) {
            Some(serde_json::Value::String(s)) => s,
            Some(other) => other.to_string(),
            None => return Err(DomainError::Store("insert returned no rows".to_string())),
        };
        info!(id = %id, client = %membership.client_name, "membership created");
        Ok(id)
    }

    async fn update(&self, id: &str, patch: &MembershipPatch) -> Result<(), DomainError> {
        if patch.is_empty() {
            return Ok(());
        }
        let req = self.client.http().patch(self.by_id(id)).json(patch);
        let res = self
            .client
            .authorize(req)
            .await
            .send()
            .await
            .map_err(|e| store_err("update request failed", e))?;
        ensure_success(res, "update membership", DomainError::Store).await?;
        info!(id = %id, "membership updated");
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let req = self.client.http().delete(self.by_id(id));
        let res = self
            .client
            .authorize(req)
            .await
            .send()
            .await
            .map_err(|e| store_err("delete request failed", e))?;
        ensure_success(res, "delete membership", DomainError::Store).await?;
        info!(id = %id, "membership deleted");
        Ok(())
    }
}
