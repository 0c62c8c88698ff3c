use tenant_notes_backend::{
    api::router::create_router,
    config::Config,
    infra::{database::Database, factory::build_state},
};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

pub const PASSWORD: &str = "password123";

#[allow(dead_code)]
pub struct Signup {
    pub token: String,
    pub user_id: String,
    pub tenant_id: String,
    pub slug: String,
    pub email: String,
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub database: Database,
    pub db_filename: String,
}

fn test_config(database_url: String) -> Config {
    Config {
        database_url,
        port: 0,
        jwt_secret_key: include_str!("../tests/keys/test_private.pem").to_string(),
        jwt_public_key: include_str!("../tests/keys/test_public.pem").to_string(),
        auth_issuer: "test-issuer".to_string(),
        token_ttl_hours: 24,
        free_plan_note_limit: 3,
        seed_demo_data: false,
    }
}

pub async fn parse_body(response: Response) -> Value {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    if bytes.is_empty() {
        panic!("Response body is empty. Status: {}", status);
    }
    match serde_json::from_slice(&bytes) {
        Ok(v) => v,
        Err(e) => panic!("Failed to parse JSON: {:?}. Status: {}. Body: {:?}", e, status, String::from_utf8_lossy(&bytes))
    }
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let database = Database::connect(&db_url).await.expect("Failed to connect to test db");
        database.migrate().await.expect("Failed to migrate test db");

        let config = test_config(db_url);
        let state = build_state(&config, &database).expect("Failed to build app state");
        let router = create_router(Arc::new(state));

        Self {
            router,
            database,
            db_filename,
        }
    }

    pub fn config(&self) -> Config {
        test_config(format!("sqlite://{}?mode=rwc", self.db_filename))
    }

    /// Sends a request, with a JSON body and bearer token when given.
    pub async fn request(&self, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(t) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", t));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.router.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
    }

    /// Sends `body` verbatim as `application/json`, whether or not it parses.
    pub async fn request_raw(&self, method: &str, uri: &str, token: Option<&str>, body: &str) -> Response {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(t) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", t));
        }

        self.router.clone().oneshot(builder.body(Body::from(body.to_string())).unwrap()).await.unwrap()
    }

    pub async fn signup(&self, name: &str, slug: &str) -> Signup {
        let email = format!("admin@{}.test", slug);
        let res = self.request("POST", "/auth/signup", None, Some(serde_json::json!({
            "organizationName": name,
            "organizationSlug": slug,
            "adminEmail": email,
            "adminPassword": PASSWORD
        }))).await;

        if res.status() != StatusCode::CREATED {
            let status = res.status();
            panic!("Signup failed in test helper: status {}, body {:?}", status, parse_body(res).await);
        }

        let body = parse_body(res).await;
        Signup {
            token: body["token"].as_str().unwrap().to_string(),
            user_id: body["user"]["id"].as_str().unwrap().to_string(),
            tenant_id: body["organization"]["id"].as_str().unwrap().to_string(),
            slug: slug.to_string(),
            email,
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> String {
        let res = self.request("POST", "/auth/login", None, Some(serde_json::json!({
            "email": email,
            "password": password
        }))).await;

        if !res.status().is_success() {
            panic!("Login failed in test helper: status {}", res.status());
        }

        parse_body(res).await["token"].as_str().expect("No token in body").to_string()
    }

    /// Invites a user as `admin_token` and returns `(user_id, token)` for them.
    pub async fn invite(&self, admin_token: &str, email: &str, role: &str) -> (String, String) {
        let res = self.request("POST", "/users", Some(admin_token), Some(serde_json::json!({
            "email": email,
            "password": PASSWORD,
            "role": role
        }))).await;
        assert_eq!(res.status(), StatusCode::CREATED, "invite of {} failed", email);

        let user_id = parse_body(res).await["user"]["id"].as_str().unwrap().to_string();
        let token = self.login(email, PASSWORD).await;
        (user_id, token)
    }

    pub async fn create_note(&self, token: &str, title: &str) -> Response {
        self.request("POST", "/notes", Some(token), Some(serde_json::json!({
            "title": title,
            "content": format!("Body of {}", title)
        }))).await
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", self.db_filename, suffix));
        }
    }
}
