use std::net::SocketAddr;
use std::path::PathBuf;

use reqwest::StatusCode;
use serde_json::{json, Value};
use server::ServerState;
use service::{identity, Catalog};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use uuid::Uuid;

struct TestApp {
    base_url: String,
    db_path: PathBuf,
    stop: Option<oneshot::Sender<()>>,
}

impl TestApp {
    async fn call(&self, method: &str, body: Value) -> anyhow::Result<(StatusCode, Value)> {
        let res = reqwest::Client::new()
            .post(format!("{}/{}", self.base_url, method))
            .json(&body)
            .send()
            .await?;
        let status = res.status();
        let body = res.json::<Value>().await?;
        Ok((status, body))
    }

    async fn stop(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        let _ = tokio::fs::remove_file(&self.db_path).await;
    }
}

async fn start_server_at(db_path: PathBuf) -> anyhow::Result<TestApp> {
    let catalog = Catalog::open(&db_path).await?;
    let state = ServerState::new(catalog);

    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    let (tx, rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        let shutdown = async move {
            let _ = rx.await;
        };
        if let Err(e) = server::serve(listener, state, shutdown).await {
            eprintln!("server error: {}", e);
        }
    });

    Ok(TestApp { base_url, db_path, stop: Some(tx) })
}

async fn start_server() -> anyhow::Result<TestApp> {
    let db_path = std::env::temp_dir().join(format!("rpc_{}.json", Uuid::new_v4()));
    start_server_at(db_path).await
}

#[tokio::test]
async fn tolkien_scenario() -> anyhow::Result<()> {
    let app = start_server().await?;
    let h1 = identity::author_id("Tolkien");
    let h2 = identity::book_id("The Hobbit", &h1);

    let (status, body) = app.call("Authors/CreateAuthor", json!({"author": {"name": "Tolkien"}})).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"authors": {"id": h1, "name": "Tolkien"}}));

    let (status, body) = app
        .call("Bookstore/CreateBook", json!({"book": {"title": "The Hobbit", "author": h1}}))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"books": {"id": h2, "title": "The Hobbit", "author": h1}}));

    let (status, body) = app.call("Bookstore/GetBook", json!({"bookId": h2})).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["books"]["title"], "The Hobbit");

    let (status, body) = app.call("Authors/DeleteAuthor", json!({"authorId": h1})).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));

    let (_, body) = app.call("Bookstore/ListBook", json!({})).await?;
    assert_eq!(body, json!({"books": [{"id": h2, "title": "The Hobbit", "author": h1}]}));

    app.stop().await;
    Ok(())
}

#[tokio::test]
async fn create_failures_leave_store_unchanged() -> anyhow::Result<()> {
    let app = start_server().await?;

    let (status, body) = app
        .call("Bookstore/CreateBook", json!({"book": {"title": "Orphan", "author": "nobody"}}))
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
    assert!(body.get("books").is_none());

    let (_, created) = app.call("Authors/CreateAuthor", json!({"author": {"name": "Le Guin"}})).await?;
    let author_id = created["authors"]["id"].clone();
    let (status, body) = app.call("Authors/CreateAuthor", json!({"author": {"name": "Le Guin"}})).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "ALREADY_EXISTS");

    let book = json!({"book": {"title": "Earthsea", "author": author_id}});
    let (status, _) = app.call("Bookstore/CreateBook", book.clone()).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = app.call("Bookstore/CreateBook", book).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["message"], "Book \"Earthsea\" by \"Le Guin\" already exists");

    let (_, books) = app.call("Bookstore/ListBook", json!({})).await?;
    assert_eq!(books["books"].as_array().map(Vec::len), Some(1));
    let (_, authors) = app.call("Authors/ListAuthor", json!({})).await?;
    assert_eq!(authors["authors"].as_array().map(Vec::len), Some(1));

    app.stop().await;
    Ok(())
}

#[tokio::test]
async fn update_merges_and_ignores_id() -> anyhow::Result<()> {
    let app = start_server().await?;
    let (_, author) = app
        .call("Authors/CreateAuthor", json!({"author": {"name": "Herbert", "born": 1920}}))
        .await?;
    let id = author["authors"]["id"].clone();

    let (status, body) = app
        .call(
            "Authors/UpdateAuthor",
            json!({"authorId": id, "data": {"id": "hijack", "name": "Frank Herbert", "died": 1986}}),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"authors": {"id": id, "name": "Frank Herbert", "born": 1920, "died": 1986}})
    );

    let (status, body) = app
        .call("Authors/UpdateAuthor", json!({"authorId": "missing", "data": {"name": "x"}}))
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let (status, body) = app
        .call("Authors/UpdateAuthor", json!({"authorId": id, "data": {"name": 7}}))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_ARGUMENT");

    app.stop().await;
    Ok(())
}

#[tokio::test]
async fn get_and_delete_unknown_are_not_found() -> anyhow::Result<()> {
    let app = start_server().await?;
    let (status, _) = app.call("Bookstore/GetBook", json!({"bookId": "nope"})).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.call("Bookstore/DeleteBook", json!({"bookId": "nope"})).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.call("Authors/GetAuthor", json!({"authorId": "nope"})).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    app.stop().await;
    Ok(())
}

#[tokio::test]
async fn state_survives_restart_in_pair_format() -> anyhow::Result<()> {
    let app = start_server().await?;
    let (_, author) = app.call("Authors/CreateAuthor", json!({"author": {"name": "Austen"}})).await?;
    let author_id = author["authors"]["id"].clone();
    let (_, book) = app
        .call("Bookstore/CreateBook", json!({"book": {"title": "Emma", "author": author_id}}))
        .await?;
    let book_id = book["books"]["id"].clone();

    let db_path = app.db_path.clone();
    let raw: Value = serde_json::from_slice(&tokio::fs::read(&db_path).await?)?;
    assert_eq!(raw["books"], json!([[book_id, book["books"]]]));
    assert_eq!(raw["authors"], json!([[author_id, author["authors"]]]));

    // stop without deleting the file, then boot a fresh server on it
    let mut app = app;
    if let Some(stop) = app.stop.take() {
        let _ = stop.send(());
    }
    let app = start_server_at(db_path).await?;
    let (_, body) = app.call("Bookstore/GetBook", json!({"bookId": book_id})).await?;
    assert_eq!(body["books"], book["books"]);
    app.stop().await;
    Ok(())
}

#[tokio::test]
async fn concurrent_creates_all_land() -> anyhow::Result<()> {
    let app = start_server().await?;
    let base_url = app.base_url.clone();

    let mut handles = Vec::new();
    for i in 0..40 {
        let url = format!("{}/Authors/CreateAuthor", base_url);
        handles.push(tokio::spawn(async move {
            reqwest::Client::new()
                .post(url)
                .json(&json!({"author": {"name": format!("writer-{i}")}}))
                .send()
                .await
                .map(|r| r.status())
        }));
    }
    for handle in handles {
        assert_eq!(handle.await??, StatusCode::OK);
    }

    let raw: Value = serde_json::from_slice(&tokio::fs::read(&app.db_path).await?)?;
    assert_eq!(raw["authors"].as_array().map(Vec::len), Some(40));
    app.stop().await;
    Ok(())
}
