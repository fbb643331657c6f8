use chrono::{Duration as ChronoDuration, Utc};
use colored::*;
use governor::{Quota, RateLimiter};
use hdrhistogram::Histogram;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::env;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use uuid::Uuid;

const DURATION_SECS: u64 = 20;
const RACE_CLIENTS: usize = 20;

struct Target {
    name: &'static str,
    url: String,
}

#[tokio::main]
async fn main() {
    let base_url = env::var("BENCH_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
    let username = env::var("BENCH_ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
    let password = env::var("BENCH_ADMIN_PASSWORD").expect("BENCH_ADMIN_PASSWORD must be set");

    println!("{}", "Starting Benchmark Suite".bold().green());
    println!("Target URL: {}", base_url);

    let client = Client::builder()
        .pool_max_idle_per_host(1000)
        .timeout(Duration::from_secs(10))
        .cookie_store(true)
        .build()
        .expect("Failed to build HTTP client");

    if client.get(format!("{}/health", base_url)).send().await.is_err() {
        eprintln!("{}", format!("Server is NOT reachable at {}. Please start it first.", base_url).red().bold());
        return;
    }

    println!("\n{}", "Setting up benchmark data...".yellow());
    let csrf_token = login(&client, &base_url, &username, &password).await;
    let procedure_id = setup_procedure(&client, &base_url, &csrf_token).await;
    let date = (Utc::now() + ChronoDuration::days(3)).date_naive();

    println!("{}", "Data created successfully.".green());
    println!("   Procedure ID: {}", procedure_id);

    let targets = vec![
        Target {
            name: "Health Check",
            url: format!("{}/health", base_url),
        },
        Target {
            name: "Procedure Catalog",
            url: format!("{}/api/v1/procedures/catalog", base_url),
        },
        Target {
            name: "Slot Grid",
            url: format!("{}/api/v1/offices/sofia/slots?date={}&procedure_id={}", base_url, date, procedure_id),
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

    race_stage(&client, &base_url, &procedure_id, date).await;
}

async fn login(client: &Client, base_url: &str, username: &str, password: &str) -> String {
    let res = client.post(format!("{}/api/v1/auth/login", base_url))
        .json(&json!({ "username": username, "password": password }))
        .send()
        .await
        .expect("Login failed during setup");

    if !res.status().is_success() {
        panic!("Login failed. Status: {}", res.status());
    }

    let body: Value = res.json().await.expect("Failed to parse login response");
    body["csrf_token"].as_str().expect("No csrf_token").to_string()
}

async fn setup_procedure(client: &Client, base_url: &str, csrf_token: &str) -> String {
    let res = client.post(format!("{}/api/v1/admin/procedures", base_url))
        .header("X-CSRF-Token", csrf_token)
        .json(&json!({
            "name": format!("Benchmark {}", &Uuid::new_v4().to_string()[..8]),
            "description": "Load testing",
            "duration_minutes": 30,
            "price": 10.0,
            "type": "Нокти",
            "technician": "Bot"
        }))
        .send()
        .await
        .expect("Failed to create procedure");

    if !res.status().is_success() {
        let status = res.status();
        let txt = res.text().await.unwrap_or_default();
        panic!("Failed to create procedure. Status: {}. Body: {}", status, txt);
    }

    let body: Value = res.json().await.expect("Failed to parse procedure response");
    body["id"].as_str().expect("No procedure id").to_string()
}

async fn run_stage(client: &Client, target: &Target, rps: u32) {
    let limiter = Arc::new(RateLimiter::direct(
        Quota::per_second(NonZeroU32::new(rps).expect("rps must be non-zero"))
    ));

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
            let tx = tx.clone();

            tokio::spawn(async move {
                let req_start = Instant::now();
                let res = client.get(&url).send().await;
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

    let mut histogram = Histogram::<u64>::new(3).expect("histogram");
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

/// Fires concurrent reservations for one free slot; exactly one must win.
async fn race_stage(client: &Client, base_url: &str, procedure_id: &str, date: chrono::NaiveDate) {
    println!("\n{}", "=".repeat(60));
    println!("Double-booking race: {} clients on one slot", RACE_CLIENTS.to_string().cyan().bold());
    println!("{}", "=".repeat(60));

    let slots: Value = client
        .get(format!("{}/api/v1/offices/sofia/slots?date={}&procedure_id={}", base_url, date, procedure_id))
        .send()
        .await
        .expect("Failed to fetch slots")
        .json()
        .await
        .expect("Failed to parse slots");

    let Some(start) = slots["slots"].as_array()
        .and_then(|s| s.iter().find(|slot| slot["available"].as_bool() == Some(true)))
        .and_then(|slot| slot["datetime"].as_str())
        .map(str::to_string)
    else {
        println!("{}", "No free slot left on the benchmark day, skipping race.".yellow());
        return;
    };

    let mut handles = Vec::with_capacity(RACE_CLIENTS);
    for i in 0..RACE_CLIENTS {
        let client = client.clone();
        let url = format!("{}/api/v1/reservations", base_url);
        let body = json!({
            "office": "sofia",
            "procedure_id": procedure_id,
            "start": start,
            "first_name": "Бенчмарк",
            "last_name": "Тест",
            "phone": format!("08881234{:02}", i),
        });
        handles.push(tokio::spawn(async move {
            client.post(&url).json(&body).send().await.map(|r| r.status())
        }));
    }

    let (mut created, mut conflicts, mut other) = (0, 0, 0);
    for handle in handles {
        match handle.await {
            Ok(Ok(StatusCode::CREATED)) => created += 1,
            Ok(Ok(StatusCode::CONFLICT)) => conflicts += 1,
            _ => other += 1,
        }
    }

    println!("Slot {}: {} created, {} conflicts, {} other", start, created, conflicts, other);
    if created == 1 {
        println!("{}", "Exactly one reservation won the race.".green().bold());
    } else {
        println!("{}", format!("Expected exactly one winner, got {}", created).red().bold());
    }
}
