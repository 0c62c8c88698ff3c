use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret_key: String, // Private key (PEM)
    pub jwt_public_key: String, // Public key (PEM)
    pub auth_issuer: String,
    pub token_ttl_hours: i64,
    pub free_plan_note_limit: i64,
    pub seed_demo_data: bool,
}

impl Config {
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        let free_plan_note_limit: i64 = env::var("FREE_PLAN_NOTE_LIMIT")
            .unwrap_or_else(|_| "3".to_string())
            .parse()
            .expect("FREE_PLAN_NOTE_LIMIT must be a number");
        assert!(free_plan_note_limit > 0, "FREE_PLAN_NOTE_LIMIT must be positive");

        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            jwt_secret_key: env::var("JWT_SECRET_KEY").expect("JWT_SECRET_KEY must be set (Ed25519 Private Key)"),
            jwt_public_key: env::var("JWT_PUBLIC_KEY").expect("JWT_PUBLIC_KEY must be set (Ed25519 Public Key)"),
            auth_issuer: env::var("AUTH_ISSUER").unwrap_or_else(|_| "https://api.notes.local".to_string()),
            token_ttl_hours: env::var("TOKEN_TTL_HOURS").unwrap_or_else(|_| "24".to_string()).parse().expect("TOKEN_TTL_HOURS must be a number"),
            free_plan_note_limit,
            seed_demo_data: env::var("SEED_DEMO_DATA")
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        }
    }
}
