use crate::config::Config;
use crate::domain::models::auth::{Claims, Principal};
use crate::error::AppError;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::{debug, error};
use uuid::Uuid;

pub const TOKEN_AUDIENCE: &str = "notes-frontend";

/// Issues and verifies the signed bearer tokens that carry a [`Principal`].
///
/// Tokens are stateless: there is no revocation list, so a leaked token stays
/// valid until it expires. Logout is the client discarding its copy.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    ttl: Duration,
}

impl TokenService {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let encoding_key = EncodingKey::from_ed_pem(config.jwt_secret_key.as_bytes())
            .map_err(|e| AppError::InternalWithMsg(format!("Invalid JWT private key PEM: {}", e)))?;
        let decoding_key = DecodingKey::from_ed_pem(config.jwt_public_key.as_bytes())
            .map_err(|e| AppError::InternalWithMsg(format!("Invalid JWT public key PEM: {}", e)))?;

        if config.token_ttl_hours <= 0 {
            return Err(AppError::InternalWithMsg("TOKEN_TTL_HOURS must be positive".into()));
        }

        Ok(Self {
            encoding_key,
            decoding_key,
            issuer: config.auth_issuer.clone(),
            ttl: Duration::hours(config.token_ttl_hours),
        })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, principal: &Principal) -> Result<String, AppError> {
        self.issue_at(principal, Utc::now())
    }

    pub(crate) fn issue_at(&self, principal: &Principal, issued_at: DateTime<Utc>) -> Result<String, AppError> {
        let exp = (issued_at + self.ttl).timestamp().max(0) as usize;

        let claims = Claims {
            iss: self.issuer.clone(),
            sub: principal.user_id.clone(),
            aud: TOKEN_AUDIENCE.to_string(),
            exp,
            iat: issued_at.timestamp().max(0) as usize,
            jti: Uuid::new_v4().to_string(),
            email: principal.email.clone(),
            role: principal.role,
            tenant_id: principal.tenant_id.clone(),
            tenant_slug: principal.tenant_slug.clone(),
        };

        encode(&Header::new(Algorithm::EdDSA), &claims, &self.encoding_key)
            .map_err(|e| {
                error!("JWT encoding failed: {}", e);
                AppError::Internal
            })
    }

    /// Returns `None` for any token that is malformed, expired, signed by a
    /// different key or addressed to a different audience/issuer.
    pub fn verify(&self, token: &str) -> Option<Principal> {
        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.set_audience(&[TOKEN_AUDIENCE]);
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.leeway = 0;

        match decode::<Claims>(token, &self.decoding_key, &validation) {
            Ok(data) => Some(Principal::from(data.claims)),
            Err(e) => {
                debug!("Token rejected: {}", e);
                None
            }
        }
    }
}
