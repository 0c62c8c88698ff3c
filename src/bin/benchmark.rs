use colored::*;
use governor::{Quota, RateLimiter};
use hdrhistogram::Histogram;
use reqwest::Client;
use serde_json::{json, Value};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use uuid::Uuid;

const DURATION_SECS: u64 = 20;
const DEFAULT_BASE_URL: &str = "http://localhost:3000";
const ADMIN_PASSWORD: &str = "benchmark-password";

struct Target {
    name: &'static str,
    method: &'static str,
    url: String,
    body: Option<Value>,
    token: Option<String>,
}

struct Session {
    slug: String,
    email: String,
    token: String,
}

#[tokio::main]
async fn main() {
    let base_url = std::env::var("BENCH_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

    println!("{}", "🚀 Starting Benchmark Suite".bold().green());
    println!("Target URL: {}", base_url);

    let client = Client::builder()
        .pool_max_idle_per_host(1000)
        .timeout(Duration::from_secs(10))
        .build()
        .expect("Failed to build HTTP client");

    if client.get(format!("{}/health", base_url)).send().await.is_err() {
        eprintln!("{}", format!("❌ Server is NOT reachable at {}. Please start it first.", base_url).red().bold());
        return;
    }

    println!("\n{}", "⚙️  Setting up benchmark data...".yellow());
    let session = setup_tenant(&client, &base_url).await;
    upgrade_tenant(&client, &base_url, &session).await;

    println!("{}", "✅ Data created successfully.".green());
    println!("   Tenant: {}", session.slug);
    println!("   Admin:  {}", session.email);

    let targets = vec![
        Target {
            name: "Health Check (Public)",
            method: "GET",
            url: format!("{}/health", base_url),
            body: None,
            token: None,
        },
        Target {
            name: "Login Flow (Crypto Intensive)",
            method: "POST",
            url: format!("{}/auth/login", base_url),
            body: Some(json!({
                "email": session.email,
                "password": ADMIN_PASSWORD
            })),
            token: None,
        },
        Target {
            name: "List Notes (Token Verify + Read)",
            method: "GET",
            url: format!("{}/notes", base_url),
            body: None,
            token: Some(session.token.clone()),
        },
        Target {
            name: "Create Note (Policy + Write)",
            method: "POST",
            url: format!("{}/notes", base_url),
            body: Some(json!({
                "title": "Benchmark note",
                "content": "Load testing"
            })),
            token: Some(session.token.clone()),
        },
    ];

    let rps_stages = vec![10, 50, 200, 1000];

    for target in targets {
        println!("\n{}", "=".repeat(60));
        println!("Benchmarking Endpoint: {}", target.name.cyan().bold());
        println!("URL: {}", target.url);
        println!("{}", "=".repeat(60));

        println!("{:<10} | {:<15} | {:<15} | {:<15}", "RPS", "Mean (ms)", "P99 (ms)", "Success Rate");
        println!("{:-<10}-+-{:-<15}-+-{:-<15}-+-{:-<15}", "", "", "", "");

        for &rps in &rps_stages {
            run_stage(&client, &target, rps).await;
        }
    }
}

async fn setup_tenant(client: &Client, base_url: &str) -> Session {
    let slug = format!("bench-{}", Uuid::new_v4().simple());
    let email = format!("admin@{}.test", slug);
    let res = client.post(format!("{}/auth/signup", base_url))
        .json(&json!({
            "organizationName": "Benchmark Corp",
            "organizationSlug": slug,
            "adminEmail": email,
            "adminPassword": ADMIN_PASSWORD
        }))
        .send()
        .await
        .expect("Failed to send signup request");

    if !res.status().is_success() {
        panic!("Failed to create tenant: status {}", res.status());
    }

    let body: Value = res.json().await.expect("Failed to parse signup response");
    let token = body["token"].as_str().expect("No token in signup response").to_string();
    Session { slug, email, token }
}

// The create-note stage would hit the free plan limit after three requests.
async fn upgrade_tenant(client: &Client, base_url: &str, session: &Session) {
    let res = client.post(format!("{}/tenants/{}/upgrade", base_url, session.slug))
        .bearer_auth(&session.token)
        .send()
        .await
        .expect("Failed to send upgrade request");

    if !res.status().is_success() {
        let status = res.status();
        let txt = res.text().await.unwrap_or_default();
        panic!("Failed to upgrade tenant. Status: {}. Body: {}", status, txt);
    }
}

async fn run_stage(client: &Client, target: &Target, rps: u32) {
    let Some(per_second) = NonZeroU32::new(rps) else {
        return;
    };
    let limiter = Arc::new(RateLimiter::direct(Quota::per_second(per_second)));

    let (tx, mut rx) = mpsc::channel(50000);
    let start_time = Instant::now();
    let duration = Duration::from_secs(DURATION_SECS);

    loop {
        if start_time.elapsed() > duration {
            break;
        }

        if limiter.check().is_ok() {
            let client = client.clone();
            let url = target.url.clone();
            let body = target.body.clone();
            let token = target.token.clone();
            let method = target.method;
            let tx = tx.clone();

            tokio::spawn(async move {
                let req_start = Instant::now();
                let mut req = match method {
                    "POST" => client.post(&url),
                    _ => client.get(&url),
                };
                if let Some(t) = token {
                    req = req.bearer_auth(t);
                }
                if let Some(b) = body {
                    req = req.json(&b);
                }
                let res = req.send().await;
                let latency = req_start.elapsed();

                let success = match res {
                    Ok(r) => r.status().is_success(),
                    Err(_) => false,
                };

                let _ = tx.send((latency, success)).await;
            });
        } else {
            tokio::task::yield_now().await;
        }
    }

    drop(tx);

    let mut histogram = Histogram::<u64>::new(3).expect("valid histogram precision");
    let mut successes = 0;
    let mut total = 0;

    while let Some((latency, success)) = rx.recv().await {
        total += 1;
        if success { successes += 1; }
        let _ = histogram.record(latency.as_micros() as u64);
    }

    let mean_ms = histogram.mean() / 1000.0;
    let p99_ms = histogram.value_at_quantile(0.99) as f64 / 1000.0;
    let success_rate = if total > 0 { (successes as f64 / total as f64) * 100.0 } else { 0.0 };

    println!(
        "{:<10} | {:<15.2} | {:<15.2} | {:<14.1}%",
        rps,
        mean_ms,
        p99_ms,
        success_rate
    );

    tokio::time::sleep(Duration::from_millis(500)).await;
}
