use serde::{Deserialize, Serialize};

use super::tenant::Tenant;
use super::user::{Role, User};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub sub: String,
    pub aud: String,
    pub exp: usize,
    pub iat: usize,
    pub jti: String,

    #[serde(rename = "https://notes.local/claims/email")]
    pub email: String,

    #[serde(rename = "https://notes.local/claims/role")]
    pub role: Role,

    #[serde(rename = "https://notes.local/claims/tenant_id")]
    pub tenant_id: String,

    #[serde(rename = "https://notes.local/claims/tenant_slug")]
    pub tenant_slug: String,
}

/// The verified caller of a request, rebuilt from the bearer token every time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub user_id: String,
    pub email: String,
    pub role: Role,
    pub tenant_id: String,
    pub tenant_slug: String,
}

impl Principal {
    pub fn for_user(user: &User, tenant: &Tenant) -> Self {
        Self {
            user_id: user.id.clone(),
            email: user.email.clone(),
            role: user.role,
            tenant_id: tenant.id.clone(),
            tenant_slug: tenant.slug.clone(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
            tenant_id: claims.tenant_id,
            tenant_slug: claims.tenant_slug,
        }
    }
}
