use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::fmt;
use thiserror::Error;

/// Sentinel `note_limit` for plans without a ceiling.
pub const UNLIMITED_NOTES: i64 = -1;

#[derive(Debug, Error)]
#[error("unknown plan: {0}")]
pub struct UnknownPlan(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Free,
    Pro,
}

impl Plan {
    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Free => "free",
            Plan::Pro => "pro",
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Plan {
    type Error = UnknownPlan;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "free" => Ok(Plan::Free),
            "pro" => Ok(Plan::Pro),
            _ => Err(UnknownPlan(value)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[sqlx(try_from = "String")]
    pub plan: Plan,
    pub note_limit: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tenant {
    /// New tenants always start on the free plan.
    pub fn new(name: String, slug: String, free_note_limit: i64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            slug,
            plan: Plan::Free,
            note_limit: free_note_limit,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_unlimited(&self) -> bool {
        self.plan == Plan::Pro
    }

    /// Moves the tenant to the pro plan. There is no way back.
    pub fn upgrade(&mut self) {
        self.plan = Plan::Pro;
        self.note_limit = UNLIMITED_NOTES;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tenant_is_free_with_limit() {
        let tenant = Tenant::new("Acme".into(), "acme".into(), 3);
        assert_eq!(tenant.plan, Plan::Free);
        assert_eq!(tenant.note_limit, 3);
        assert!(!tenant.is_unlimited());
    }

    #[test]
    fn test_upgrade_sets_unlimited() {
        let mut tenant = Tenant::new("Acme".into(), "acme".into(), 3);
        tenant.upgrade();
        assert_eq!(tenant.plan, Plan::Pro);
        assert_eq!(tenant.note_limit, UNLIMITED_NOTES);
        assert!(tenant.is_unlimited());
    }

    #[test]
    fn test_plan_parsing() {
        assert_eq!(Plan::try_from("pro".to_string()).unwrap(), Plan::Pro);
        assert!(Plan::try_from("enterprise".to_string()).is_err());
    }
}
