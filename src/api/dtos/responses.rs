use serde::Serialize;
use crate::domain::models::{tenant::{Plan, Tenant}, user::{Role, User}};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub role: Role,
    pub tenant_id: String,
    pub tenant_slug: String,
}

impl UserProfile {
    pub fn new(user: &User, tenant: &Tenant) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            role: user.role,
            tenant_id: tenant.id.clone(),
            tenant_slug: tenant.slug.clone(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationSummary {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub plan: Plan,
    pub note_limit: i64,
}

impl From<&Tenant> for OrganizationSummary {
    fn from(tenant: &Tenant) -> Self {
        Self {
            id: tenant.id.clone(),
            name: tenant.name.clone(),
            slug: tenant.slug.clone(),
            plan: tenant.plan,
            note_limit: tenant.note_limit,
        }
    }
}

#[derive(Serialize)]
pub struct SignupResponse {
    pub message: String,
    pub token: String,
    pub user: UserProfile,
    pub organization: OrganizationSummary,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub uptime: f64,
}
