use axum::{
    extract::{FromRequestParts, FromRef},
    http::{header::AUTHORIZATION, request::Parts},
};
use crate::state::AppState;
use crate::domain::models::auth::Principal;
use std::convert::Infallible;
use std::sync::Arc;
use tracing::{debug, Span};

/// The bearer-token identity of the caller, if any.
///
/// Extraction never fails: a missing, malformed or expired token yields
/// `Caller(None)` and the policy engine turns that into `Unauthenticated`.
pub struct Caller(pub Option<Principal>);

impl Caller {
    pub fn principal(&self) -> Option<&Principal> {
        self.0.as_ref()
    }
}

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts) else {
            debug!("No bearer token on request");
            return Ok(Caller(None));
        };

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);
        let principal = app_state.token_service.verify(token);

        if let Some(p) = &principal {
            Span::current().record("tenant_id", p.tenant_id.as_str());
            Span::current().record("user_id", p.user_id.as_str());
        }

        Ok(Caller(principal))
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts.headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/notes");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&parts_with(Some("Bearer abc.def.ghi"))), Some("abc.def.ghi"));
        assert_eq!(bearer_token(&parts_with(Some("Basic dXNlcjpwYXNz"))), None);
        assert_eq!(bearer_token(&parts_with(Some("Bearer "))), None);
        assert_eq!(bearer_token(&parts_with(Some("abc.def.ghi"))), None);
        assert_eq!(bearer_token(&parts_with(None)), None);
    }
}
