use std::net::SocketAddr;

use axum::Router;
use migration::MigratorTrait;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use server::routes::{self, ServerState};

fn cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

struct TestApp {
    base_url: String,
}

/// Boot the real router on an ephemeral port against an isolated in-memory
/// database. Each call gets a fresh database, so ids start at 1.
async fn start_server() -> anyhow::Result<TestApp> {
    let db = models::db::connect_to("sqlite::memory:").await?;
    migration::Migrator::up(&db, None).await?;

    let state = ServerState { db };
    let app: Router = routes::build_router(cors(), state);
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });

    Ok(TestApp { base_url })
}

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

#[tokio::test]
async fn e2e_health() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn e2e_book_lifecycle() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    // POST /books -> 201 with the created record
    let res = c
        .post(format!("{}/books", app.base_url))
        .json(&json!({"title": "Dune", "author": "Herbert"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let created = res.json::<serde_json::Value>().await?;
    assert_eq!(created, json!({"id": 1, "title": "Dune", "author": "Herbert"}));

    // GET /books -> the one record, no created_at in the payload
    let res = c.get(format!("{}/books", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let listed = res.json::<serde_json::Value>().await?;
    assert_eq!(listed, json!([{"id": 1, "title": "Dune", "author": "Herbert"}]));

    // PUT /books/1 -> 200 with the updated record under the same id
    let res = c
        .put(format!("{}/books/1", app.base_url))
        .json(&json!({"title": "Dune 2", "author": "Herbert"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let updated = res.json::<serde_json::Value>().await?;
    assert_eq!(updated, json!({"id": 1, "title": "Dune 2", "author": "Herbert"}));

    // DELETE /books/1 -> 200 {"ok": true}
    let res = c.delete(format!("{}/books/1", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let ack = res.json::<serde_json::Value>().await?;
    assert_eq!(ack, json!({"ok": true}));

    // GET /books -> empty again
    let res = c.get(format!("{}/books", app.base_url)).send().await?;
    let listed = res.json::<serde_json::Value>().await?;
    assert_eq!(listed, json!([]));
    Ok(())
}

#[tokio::test]
async fn e2e_create_validation() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    for payload in [
        json!({"title": "", "author": "Herbert"}),
        json!({"title": "Dune", "author": ""}),
        json!({"title": "   ", "author": "Herbert"}),
        json!({"author": "Herbert"}),
        json!({"title": "Dune"}),
        json!({}),
    ] {
        let res = c
            .post(format!("{}/books", app.base_url))
            .json(&payload)
            .send()
            .await?;
        assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST, "payload {payload} must be rejected");
        let body = res.json::<serde_json::Value>().await?;
        assert_eq!(body["error"], "Validation Error");
    }

    // A completely absent body behaves like an empty object
    let res = c.post(format!("{}/books", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    // Nothing was persisted by any rejected create
    let res = c.get(format!("{}/books", app.base_url)).send().await?;
    let listed = res.json::<serde_json::Value>().await?;
    assert_eq!(listed, json!([]));
    Ok(())
}

#[tokio::test]
async fn e2e_create_trims_whitespace() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    let res = c
        .post(format!("{}/books", app.base_url))
        .json(&json!({"title": "  Dune  ", "author": " Herbert "}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let created = res.json::<serde_json::Value>().await?;
    assert_eq!(created["title"], "Dune");
    assert_eq!(created["author"], "Herbert");
    Ok(())
}

#[tokio::test]
async fn e2e_unknown_id_is_404() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    let res = c
        .put(format!("{}/books/999", app.base_url))
        .json(&json!({"title": "Ghost", "author": "Nobody"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["error"], "Not Found");

    let res = c.delete(format!("{}/books/999", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);

    // Neither failure mutated anything
    let res = c.get(format!("{}/books", app.base_url)).send().await?;
    let listed = res.json::<serde_json::Value>().await?;
    assert_eq!(listed, json!([]));
    Ok(())
}

#[tokio::test]
async fn e2e_list_orders_newest_first() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    for (title, author) in [("First", "A"), ("Second", "B"), ("Third", "C")] {
        let res = c
            .post(format!("{}/books", app.base_url))
            .json(&json!({"title": title, "author": author}))
            .send()
            .await?;
        assert_eq!(res.status(), HttpStatusCode::CREATED);
    }

    let res = c.get(format!("{}/books", app.base_url)).send().await?;
    let listed = res.json::<serde_json::Value>().await?;
    let titles: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Third", "Second", "First"]);
    Ok(())
}

#[tokio::test]
async fn e2e_cors_allows_any_origin() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    let res = c
        .request(reqwest::Method::OPTIONS, format!("{}/books", app.base_url))
        .header("Origin", "http://example.com")
        .header("Access-Control-Request-Method", "POST")
        .send()
        .await?;
    assert!(res.status().is_success());
    assert!(res.headers().get("access-control-allow-origin").is_some());
    Ok(())
}
