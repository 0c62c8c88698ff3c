//! Subscription limits on note creation.
//!
//! The tenant's `note_limit` is applied to each user separately: a free tenant
//! with a limit of 3 lets every member hold 3 notes of their own. The count is
//! read and then the note is written without a lock, so two concurrent
//! creations at the boundary can both pass. The limit is a soft one.

use crate::domain::models::{auth::Principal, tenant::Tenant};
use crate::domain::ports::NoteRepository;
use crate::domain::services::policy::{Action, Decision, Denial, DenyReason};
use crate::error::AppError;
use tracing::info;

pub fn check_quota(tenant: &Tenant, current_usage: i64) -> Decision {
    if tenant.is_unlimited() || current_usage < tenant.note_limit {
        Decision::Allow
    } else {
        Decision::Deny(DenyReason::LimitReached)
    }
}

/// Gate for creating one more note as `principal`. Pro tenants return before
/// the store is asked for a count.
pub async fn ensure_note_quota(
    tenant: &Tenant,
    principal: &Principal,
    notes: &dyn NoteRepository,
) -> Result<(), AppError> {
    if tenant.is_unlimited() {
        return Ok(());
    }

    let usage = notes.count_by_owner(&tenant.id, &principal.user_id).await?;
    match check_quota(tenant, usage) {
        Decision::Allow => Ok(()),
        Decision::Deny(reason) => {
            info!(
                tenant_id = %tenant.id,
                user_id = %principal.user_id,
                usage,
                limit = tenant.note_limit,
                "note limit reached"
            );
            Err(Denial { action: Action::CreateNote, reason }.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::note::{Note, NoteChanges};
    use crate::domain::models::user::Role;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingNotes {
        usage: i64,
        count_calls: AtomicUsize,
    }

    impl CountingNotes {
        fn with_usage(usage: i64) -> Self {
            Self { usage, count_calls: AtomicUsize::new(0) }
        }

        fn calls(&self) -> usize {
            self.count_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl NoteRepository for CountingNotes {
        async fn create(&self, note: &Note) -> Result<Note, AppError> {
            Ok(note.clone())
        }
        async fn find_by_id(&self, _tenant_id: &str, _id: &str) -> Result<Option<Note>, AppError> {
            Ok(None)
        }
        async fn list_by_owner(&self, _tenant_id: &str, _user_id: &str) -> Result<Vec<Note>, AppError> {
            Ok(vec![])
        }
        async fn count_by_owner(&self, _tenant_id: &str, _user_id: &str) -> Result<i64, AppError> {
            self.count_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.usage)
        }
        async fn update(&self, _tenant_id: &str, _user_id: &str, _id: &str, _changes: &NoteChanges) -> Result<Option<Note>, AppError> {
            Ok(None)
        }
        async fn delete(&self, _tenant_id: &str, _user_id: &str, _id: &str) -> Result<bool, AppError> {
            Ok(false)
        }
    }

    fn member_of(tenant: &Tenant) -> Principal {
        Principal {
            user_id: "member-1".into(),
            email: "user@acme.test".into(),
            role: Role::Member,
            tenant_id: tenant.id.clone(),
            tenant_slug: tenant.slug.clone(),
        }
    }

    #[test]
    fn test_free_plan_allows_below_limit_and_denies_at_limit() {
        let tenant = Tenant::new("Acme".into(), "acme".into(), 3);
        for usage in 0..3 {
            assert_eq!(check_quota(&tenant, usage), Decision::Allow, "usage {usage}");
        }
        for usage in 3..6 {
            assert_eq!(check_quota(&tenant, usage), Decision::Deny(DenyReason::LimitReached), "usage {usage}");
        }
    }

    #[test]
    fn test_pro_plan_always_allows() {
        let mut tenant = Tenant::new("Acme".into(), "acme".into(), 3);
        tenant.upgrade();
        for usage in [0, 3, 1_000_000] {
            assert_eq!(check_quota(&tenant, usage), Decision::Allow);
        }
    }

    #[tokio::test]
    async fn test_pro_tenant_never_counts_notes() {
        let mut tenant = Tenant::new("Acme".into(), "acme".into(), 3);
        tenant.upgrade();
        let notes = CountingNotes::with_usage(500);

        ensure_note_quota(&tenant, &member_of(&tenant), &notes).await.unwrap();
        assert_eq!(notes.calls(), 0);
    }

    #[tokio::test]
    async fn test_free_tenant_counts_and_flags_limit() {
        let tenant = Tenant::new("Acme".into(), "acme".into(), 3);

        let below = CountingNotes::with_usage(2);
        ensure_note_quota(&tenant, &member_of(&tenant), &below).await.unwrap();
        assert_eq!(below.calls(), 1);

        let at_limit = CountingNotes::with_usage(3);
        let err = ensure_note_quota(&tenant, &member_of(&tenant), &at_limit).await.unwrap_err();
        assert!(matches!(err, AppError::LimitReached));
        assert_eq!(at_limit.calls(), 1);
    }
}
