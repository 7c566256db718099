//! Domain entities. Pure data structures for the core business.
//!
//! Wire names (serde renames) follow the hosted `memberships` table, which stores
//! Spanish enum values; Rust names stay in English.

use crate::domain::catalog::PACKAGE_MIN_AREAS;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Size category of a treatment zone. Drives the per-area price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AreaCategory {
    #[serde(rename = "grandes")]
    Large,
    #[serde(rename = "medianas")]
    Medium,
    #[serde(rename = "chicas")]
    Small,
}

impl AreaCategory {
    pub const ALL: [AreaCategory; 3] = [Self::Large, Self::Medium, Self::Small];

    pub fn title(self) -> &'static str {
        match self {
            Self::Large => "Large areas",
            Self::Medium => "Medium areas",
            Self::Small => "Small areas",
        }
    }
}

/// A named body zone selected for treatment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Area {
    pub category: AreaCategory,
    pub name: String,
}

impl Area {
    pub fn new(category: AreaCategory, name: impl Into<String>) -> Self {
        Self {
            category,
            name: name.into(),
        }
    }
}

/// Service level. Determines price and session count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlanTier {
    #[serde(rename = "esencial")]
    Essential,
    #[default]
    #[serde(rename = "completa")]
    Complete,
    #[serde(rename = "platinum")]
    Platinum,
}

impl PlanTier {
    pub const ALL: [PlanTier; 3] = [Self::Essential, Self::Complete, Self::Platinum];

    pub fn label(self) -> &'static str {
        match self {
            Self::Essential => "essential",
            Self::Complete => "complete",
            Self::Platinum => "platinum",
        }
    }
}

impl fmt::Display for PlanTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Membership classification, derived from the number of selected areas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MembershipType {
    #[default]
    #[serde(rename = "individual")]
    Individual,
    #[serde(rename = "personalizada")]
    Custom,
    #[serde(rename = "combo")]
    Package,
}

impl MembershipType {
    /// 1 area → individual, 2 up to the package threshold → custom, then the
    /// full-body package. An empty selection classifies as individual.
    pub fn for_area_count(count: usize) -> Self {
        match count {
            n if n >= PACKAGE_MIN_AREAS => Self::Package,
            0 | 1 => Self::Individual,
            _ => Self::Custom,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Individual => "individual",
            Self::Custom => "custom",
            Self::Package => "full body",
        }
    }
}

impl fmt::Display for MembershipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MembershipStatus {
    #[default]
    #[serde(rename = "activa")]
    Active,
    #[serde(rename = "pausada")]
    Paused,
    #[serde(rename = "completada")]
    Completed,
    #[serde(rename = "cancelada")]
    Canceled,
}

impl MembershipStatus {
    pub const ALL: [MembershipStatus; 4] =
        [Self::Active, Self::Paused, Self::Completed, Self::Canceled];

    pub fn label(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Completed => "completed",
            Self::Canceled => "canceled",
        }
    }

    /// Value as stored in the `status` column.
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Active => "activa",
            Self::Paused => "pausada",
            Self::Completed => "completada",
            Self::Canceled => "cancelada",
        }
    }

    pub fn from_wire_name(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|st| st.wire_name() == s)
    }
}

impl fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A persisted membership, as returned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MembershipRecord {
    pub id: String,
    pub client_name: String,
    pub client_phone: String,
    pub client_email: Option<String>,
    pub membership_type: MembershipType,
    pub plan_name: PlanTier,
    pub areas: Vec<Area>,
    #[serde(deserialize_with = "whole_units")]
    pub monthly_payment: u32,
    #[serde(deserialize_with = "whole_units")]
    pub initial_payment: u32,
    #[serde(deserialize_with = "whole_units")]
    pub total_sessions: u32,
    #[serde(default, deserialize_with = "whole_units")]
    pub completed_sessions: u32,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    pub status: MembershipStatus,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MembershipRecord {
    /// Completed sessions as a rounded percentage of the total. 0 when the total is 0.
    pub fn progress_percent(&self) -> u32 {
        if self.total_sessions == 0 {
            return 0;
        }
        let pct = (f64::from(self.completed_sessions) / f64::from(self.total_sessions)) * 100.0;
        pct.round() as u32
    }

    pub fn area_names(&self) -> Vec<&str> {
        self.areas.iter().map(|a| a.name.as_str()).collect()
    }
}

/// Insert payload. The store assigns id, timestamps, status and completed sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMembership {
    pub client_name: String,
    pub client_phone: String,
    pub client_email: Option<String>,
    pub membership_type: MembershipType,
    pub plan_name: PlanTier,
    pub areas: Vec<Area>,
    pub monthly_payment: u32,
    pub initial_payment: u32,
    pub total_sessions: u32,
    pub start_date: NaiveDate,
    pub notes: Option<String>,
}

/// Partial update. Only `Some` fields are sent to the store.
///
/// `notes` is doubly optional: `Some(None)` clears the column.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MembershipPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_email: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub membership_type: Option<MembershipType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_name: Option<PlanTier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub areas: Option<Vec<Area>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_payment: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_payment: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_sessions: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_sessions: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<MembershipStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
}

impl MembershipPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Authenticated session returned by the auth port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub user_email: Option<String>,
}

/// Result of a credential check. Wrong credentials are an outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInOutcome {
    Authenticated(Session),
    InvalidCredentials,
}

/// Numeric columns may come back as `675` or `675.00`; both decode to whole units.
fn whole_units<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Number::deserialize(deserializer)?;
    if let Some(n) = value.as_u64() {
        return u32::try_from(n).map_err(serde::de::Error::custom);
    }
    match value.as_f64() {
        Some(f) if f >= 0.0 && f <= f64::from(u32::MAX) => Ok(f.round() as u32),
        _ => Err(serde::de::Error::custom(format!(
            "expected a non-negative amount, got {}",
            value
        ))),
    }
}
