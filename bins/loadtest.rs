//! Load-testing client for the book store HTTP contract.
//!
//! Each simulated user creates a book, then loops: list the collection,
//! update the held book, delete it and immediately create a replacement.
//! Individual request failures are counted but never abort the run.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::{distributions::Alphanumeric, Rng};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

#[derive(Debug, Clone, Deserialize)]
struct Book {
    id: i32,
    title: String,
    author: String,
}

#[derive(Default)]
struct Stats {
    requests: AtomicU64,
    failures: AtomicU64,
}

fn rand_text(prefix: &str) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect();
    format!("{prefix}_{suffix}")
}

fn wait_time() -> Duration {
    Duration::from_secs_f64(rand::thread_rng().gen_range(0.5..2.0))
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

async fn create_book(c: &reqwest::Client, base: &str, stats: &Stats) -> Option<Book> {
    stats.requests.fetch_add(1, Ordering::Relaxed);
    let payload = json!({"title": rand_text("Title"), "author": rand_text("Author")});
    match c.post(format!("{base}/books")).json(&payload).send().await {
        Ok(r) if r.status() == reqwest::StatusCode::CREATED => r.json::<Book>().await.ok(),
        Ok(r) => {
            stats.failures.fetch_add(1, Ordering::Relaxed);
            warn!(status = %r.status(), "create failed");
            None
        }
        Err(e) => {
            stats.failures.fetch_add(1, Ordering::Relaxed);
            warn!(error = %e, "create failed");
            None
        }
    }
}

async fn user_flow(c: reqwest::Client, base: String, stats: Arc<Stats>, deadline: Instant) {
    let mut book = create_book(&c, &base, &stats).await;

    while Instant::now() < deadline {
        // List the whole collection
        stats.requests.fetch_add(1, Ordering::Relaxed);
        if c.get(format!("{base}/books")).send().await.map(|r| !r.status().is_success()).unwrap_or(true) {
            stats.failures.fetch_add(1, Ordering::Relaxed);
        }
        tokio::time::sleep(wait_time()).await;

        // Update the held book
        if let Some(b) = &book {
            stats.requests.fetch_add(1, Ordering::Relaxed);
            let payload = json!({"title": rand_text("UpdTitle"), "author": rand_text("UpdAuthor")});
            let ok = c
                .put(format!("{base}/books/{}", b.id))
                .json(&payload)
                .send()
                .await
                .map(|r| r.status().is_success())
                .unwrap_or(false);
            if !ok {
                stats.failures.fetch_add(1, Ordering::Relaxed);
            }
        }
        tokio::time::sleep(wait_time()).await;

        // Delete the held book, then create a new one to keep the flow going
        if let Some(b) = book.take() {
            stats.requests.fetch_add(1, Ordering::Relaxed);
            let ok = c
                .delete(format!("{base}/books/{}", b.id))
                .send()
                .await
                .map(|r| r.status().is_success())
                .unwrap_or(false);
            if !ok {
                stats.failures.fetch_add(1, Ordering::Relaxed);
                warn!(id = b.id, title = %b.title, author = %b.author, "delete failed");
            }
        }
        book = create_book(&c, &base, &stats).await;
        tokio::time::sleep(wait_time()).await;
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    common::utils::logging::init_logging_from_env();

    let base_url: String = env_or("LOADTEST_BASE_URL", "http://127.0.0.1:8080".to_string());
    let users: usize = env_or("LOADTEST_USERS", 4);
    let duration_secs: u64 = env_or("LOADTEST_DURATION_SECS", 30);

    info!(%base_url, users, duration_secs, "load test starting");

    let client = reqwest::Client::builder().timeout(Duration::from_secs(10)).build()?;
    let stats = Arc::new(Stats::default());
    let deadline = Instant::now() + Duration::from_secs(duration_secs);

    let mut handles = Vec::with_capacity(users);
    for _ in 0..users {
        handles.push(tokio::spawn(user_flow(
            client.clone(),
            base_url.clone(),
            Arc::clone(&stats),
            deadline,
        )));
    }
    for h in handles {
        let _ = h.await;
    }

    let requests = stats.requests.load(Ordering::Relaxed);
    let failures = stats.failures.load(Ordering::Relaxed);
    info!(requests, failures, "load test finished");
    Ok(())
}
