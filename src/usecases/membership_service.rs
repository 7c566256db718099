//! Membership management. Form submission, status/notes updates, filtering,
//! dashboard statistics and CSV export, orchestrated over the MembershipStore.
//!
//! Payment and session fields are never taken from the operator: they are
//! recomputed from the form's areas and plan right before every insert/update.

use crate::adapters::export::{export_file_name, memberships_to_csv};
use crate::domain::validation::{
    normalize_phone, validate_email, validate_full_name, validate_phone,
};
use crate::domain::{
    AreaSelection, DomainError, MembershipPatch, MembershipRecord, MembershipStatus,
    NewMembership, PlanTier, Quote, ValidationErrors,
};
use crate::ports::MembershipStore;
use chrono::NaiveDate;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tracing::{error, info};

/// Data entered in the membership form.
#[derive(Debug, Clone, PartialEq)]
pub struct MembershipForm {
    pub client_name: String,
    pub client_phone: String,
    pub client_email: String,
    pub plan: PlanTier,
    pub areas: AreaSelection,
    pub start_date: NaiveDate,
    pub notes: String,
}

impl MembershipForm {
    pub fn new(start_date: NaiveDate) -> Self {
        Self {
            client_name: String::new(),
            client_phone: String::new(),
            client_email: String::new(),
            plan: PlanTier::default(),
            areas: AreaSelection::new(),
            start_date,
            notes: String::new(),
        }
    }

    /// Prefill from an existing record (edit flow).
    pub fn from_record(record: &MembershipRecord) -> Self {
        Self {
            client_name: record.client_name.clone(),
            client_phone: record.client_phone.clone(),
            client_email: record.client_email.clone().unwrap_or_default(),
            plan: record.plan_name,
            areas: AreaSelection::from_areas(record.areas.iter().cloned()),
            start_date: record.start_date,
            notes: record.notes.clone().unwrap_or_default(),
        }
    }

    /// Store the phone as typed digits only (max 10).
    pub fn set_phone(&mut self, input: &str) {
        self.client_phone = normalize_phone(input);
    }

    pub fn quote(&self) -> Quote {
        self.areas.quote(self.plan)
    }

    pub fn validate(&self) -> ValidationErrors {
        ValidationErrors {
            name: validate_full_name(&self.client_name),
            phone: validate_phone(&self.client_phone),
            email: validate_email(self.client_email.trim()),
            areas: self
                .areas
                .is_empty()
                .then(|| "Select at least one area".to_string()),
        }
    }

    fn checked(&self) -> Result<Quote, DomainError> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(DomainError::Validation(errors));
        }
        Ok(self.quote())
    }

    fn notes_value(&self) -> Option<String> {
        let trimmed = self.notes.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    fn email_value(&self) -> Option<String> {
        let trimmed = self.client_email.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    pub fn to_new_membership(&self) -> Result<NewMembership, DomainError> {
        let quote = self.checked()?;
        Ok(NewMembership {
            client_name: self.client_name.trim().to_string(),
            client_phone: self.client_phone.clone(),
            client_email: self.email_value(),
            membership_type: quote.membership_type,
            plan_name: self.plan,
            areas: self.areas.areas().to_vec(),
            monthly_payment: quote.monthly_payment,
            initial_payment: quote.initial_payment,
            total_sessions: quote.total_sessions,
            start_date: self.start_date,
            notes: self.notes_value(),
        })
    }

    pub fn to_patch(&self) -> Result<MembershipPatch, DomainError> {
        let m = self.to_new_membership()?;
        Ok(MembershipPatch {
            client_name: Some(m.client_name),
            client_phone: Some(m.client_phone),
            client_email: Some(m.client_email),
            membership_type: Some(m.membership_type),
            plan_name: Some(m.plan_name),
            areas: Some(m.areas),
            monthly_payment: Some(m.monthly_payment),
            initial_payment: Some(m.initial_payment),
            total_sessions: Some(m.total_sessions),
            start_date: Some(m.start_date),
            notes: Some(m.notes),
            ..Default::default()
        })
    }
}

/// Search by client name (case-insensitive) or phone, plus optional status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipFilter {
    pub search: String,
    pub status: Option<MembershipStatus>,
}

impl MembershipFilter {
    pub fn matches(&self, record: &MembershipRecord) -> bool {
        let term = self.search.trim();
        let matches_search = term.is_empty()
            || record
                .client_name
                .to_lowercase()
                .contains(&term.to_lowercase())
            || record.client_phone.contains(term);
        let matches_status = self.status.is_none_or(|s| s == record.status);
        matches_search && matches_status
    }

    pub fn apply<'a>(&self, records: &'a [MembershipRecord]) -> Vec<&'a MembershipRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

/// Dashboard counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MembershipStats {
    pub total: usize,
    pub active: usize,
    /// Sum of monthly payments over active memberships.
    pub monthly_revenue: u64,
    pub completed: usize,
}

impl MembershipStats {
    pub fn from_records(records: &[MembershipRecord]) -> Self {
        records.iter().fold(
            Self {
                total: records.len(),
                ..Default::default()
            },
            |mut acc, r| {
                match r.status {
                    MembershipStatus::Active => {
                        acc.active += 1;
                        acc.monthly_revenue += u64::from(r.monthly_payment);
                    }
                    MembershipStatus::Completed => acc.completed += 1,
                    _ => {}
                }
                acc
            },
        )
    }
}

pub struct MembershipService {
    store: Arc<dyn MembershipStore>,
    export_dir: PathBuf,
}

impl MembershipService {
    pub fn new(store: Arc<dyn MembershipStore>, export_dir: PathBuf) -> Self {
        Self { store, export_dir }
    }

    pub async fn list(&self) -> Result<Vec<MembershipRecord>, DomainError> {
        let records = self
            .store
            .list()
            .await
            .inspect_err(|e| error!(error = %e, "fetching memberships failed"))?;
        info!(count = records.len(), "memberships loaded");
        Ok(records)
    }

    pub async fn create(&self, form: &MembershipForm) -> Result<String, DomainError> {
        let new = form.to_new_membership()?;
        let id = self
            .store
            .insert(&new)
            .await
            .inspect_err(|e| error!(error = %e, "creating membership failed"))?;
        info!(
            id = %id,
            membership_type = %new.membership_type,
            plan = %new.plan_name,
            monthly = new.monthly_payment,
            "membership created"
        );
        Ok(id)
    }

    pub async fn update(&self, id: &str, form: &MembershipForm) -> Result<(), DomainError> {
        let patch = form.to_patch()?;
        self.store
            .update(id, &patch)
            .await
            .inspect_err(|e| error!(id, error = %e, "updating membership failed"))?;
        info!(id, "membership updated");
        Ok(())
    }

    pub async fn set_status(&self, id: &str, status: MembershipStatus) -> Result<(), DomainError> {
        let patch = MembershipPatch {
            status: Some(status),
            ..Default::default()
        };
        self.store
            .update(id, &patch)
            .await
            .inspect_err(|e| error!(id, error = %e, "updating status failed"))?;
        info!(id, status = %status, "membership status changed");
        Ok(())
    }

    /// Empty notes clear the column.
    pub async fn set_notes(&self, id: &str, notes: &str) -> Result<(), DomainError> {
        let trimmed = notes.trim();
        let patch = MembershipPatch {
            notes: Some((!trimmed.is_empty()).then(|| trimmed.to_string())),
            ..Default::default()
        };
        self.store
            .update(id, &patch)
            .await
            .inspect_err(|e| error!(id, error = %e, "saving notes failed"))?;
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<(), DomainError> {
        self.store
            .delete(id)
            .await
            .inspect_err(|e| error!(id, error = %e, "deleting membership failed"))?;
        info!(id, "membership deleted");
        Ok(())
    }

    /// Write the given (already filtered) records to `memberships_<date>.csv`.
    pub async fn export_csv(
        &self,
        records: &[MembershipRecord],
        date: NaiveDate,
    ) -> Result<PathBuf, DomainError> {
        if records.is_empty() {
            return Err(DomainError::Export("no memberships to export".into()));
        }
        fs::create_dir_all(&self.export_dir)
            .await
            .map_err(|e| DomainError::Export(format!("Failed to create export dir: {}", e)))?;

        let content = memberships_to_csv(records)
            .map_err(|e| DomainError::Export(format!("Failed to generate CSV: {}", e)))?;
        let path = self.export_dir.join(export_file_name(date));
        fs::write(&path, content)
            .await
            .map_err(|e| DomainError::Export(format!("Failed to write CSV: {}", e)))?;

        info!(path = %path.display(), rows = records.len(), "memberships exported");
        Ok(path)
    }
}
