use crate::domain::models::{tenant::Tenant, user::{Role, User}};
use crate::domain::ports::{TenantRepository, UserRepository};
use crate::domain::services::credentials::hash_password;
use crate::error::AppError;
use tracing::info;

pub const DEMO_PASSWORD: &str = "password";

const DEMO_TENANTS: [(&str, &str); 2] = [("Acme", "acme"), ("Globex", "globex")];

/// Creates the Acme and Globex demo tenants, each with an admin and a member,
/// when the store has no tenants yet. Returns whether anything was written.
pub async fn seed_demo_data(
    tenants: &dyn TenantRepository,
    users: &dyn UserRepository,
    free_note_limit: i64,
) -> Result<bool, AppError> {
    if tenants.count().await? > 0 {
        return Ok(false);
    }

    let password_hash = hash_password(DEMO_PASSWORD)?;

    for (name, slug) in DEMO_TENANTS {
        let tenant = Tenant::new(name.to_string(), slug.to_string(), free_note_limit);
        let admin = User::new(tenant.id.clone(), &format!("admin@{}.test", slug), password_hash.clone(), Role::Admin);
        let (tenant, _) = tenants.create_with_admin(&tenant, &admin).await?;

        let member = User::new(tenant.id.clone(), &format!("user@{}.test", slug), password_hash.clone(), Role::Member);
        users.create(&member).await?;

        info!("Seeded demo tenant {} ({})", tenant.name, tenant.slug);
    }

    Ok(true)
}
