use std::sync::Arc;

use api::{AppConfig, AppState, router};
use axum::http::StatusCode;
use axum_test::TestServer;
use axum_test::multipart::{MultipartForm, Part};
use futures::future::BoxFuture;
use serde_json::{Value, json};
use vector_index::{EmbeddingsProvider, IndexError, MemoryStore, SearchClient};

/// Counts vowels and consonants: deterministic and good enough to rank by overlap.
struct CharClassEmbedder;

impl EmbeddingsProvider for CharClassEmbedder {
    fn dim(&self) -> usize {
        3
    }

    fn embed<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<Vec<f32>, IndexError>> {
        Box::pin(async move {
            let mut v = vec![0.0f32, 0.0, 1.0];
            for c in text.chars().filter(|c| c.is_ascii_alphabetic()) {
                if "aeiouAEIOU".contains(c) {
                    v[0] += 1.0;
                } else {
                    v[1] += 1.0;
                }
            }
            Ok(v)
        })
    }
}

fn server_with_batch(batch_size: usize) -> anyhow::Result<TestServer> {
    let config = AppConfig::resolve(|_| None)?;
    let search = SearchClient::new(
        Arc::new(MemoryStore::new()),
        Arc::new(CharClassEmbedder),
        batch_size,
    );
    let state = Arc::new(AppState::new(config, Arc::new(search)));
    Ok(TestServer::new(router(state))?)
}

fn server() -> anyhow::Result<TestServer> {
    server_with_batch(128)
}

async fn create(server: &TestServer, name: &str) {
    server
        .post("/api/create_collection")
        .add_query_param("collection_name", name)
        .add_query_param("distance", "cosine")
        .await
        .assert_status_ok();
}

fn csv_form(csv: &str) -> MultipartForm {
    MultipartForm::new().add_part(
        "file",
        Part::bytes(csv.as_bytes().to_vec())
            .file_name("data.csv")
            .mime_type("text/csv"),
    )
}

#[tokio::test]
async fn create_collection_then_conflict() -> anyhow::Result<()> {
    let server = server()?;

    let res = server
        .post("/api/create_collection")
        .add_query_param("collection_name", "docs")
        .add_query_param("distance", "cosine")
        .await;
    res.assert_status_ok();
    res.assert_json(&json!({"output": {"message": "Collection created successfully"}}));

    let res = server
        .post("/api/create_collection")
        .add_query_param("collection_name", "docs")
        .add_query_param("distance", "dot")
        .await;
    res.assert_status(StatusCode::CONFLICT);
    res.assert_json(&json!({"output": {"error": "Collection already exists"}}));
    Ok(())
}

#[tokio::test]
async fn invalid_distance_is_bad_request() -> anyhow::Result<()> {
    let server = server()?;
    let res = server
        .post("/api/create_collection")
        .add_query_param("collection_name", "docs")
        .add_query_param("distance", "manhattan")
        .await;
    res.assert_status_bad_request();
    res.assert_json(&json!({"output": {"error": "Distance must in list [cosine, dot, euclid]"}}));
    Ok(())
}

#[tokio::test]
async fn add_point_is_unwrapped_and_ids_increase() -> anyhow::Result<()> {
    let server = server()?;
    create(&server, "docs").await;

    for expected in 0..3u64 {
        let res = server
            .post("/api/add_point")
            .add_query_param("collection_name", "docs")
            .add_query_param("title", format!("t{expected}"))
            .add_query_param("content", "some text")
            .await;
        res.assert_status_ok();
        res.assert_json(&json!({"message": "Upsert successful", "id": expected}));
    }

    let res = server
        .post("/api/add_point")
        .add_query_param("collection_name", "ghost")
        .add_query_param("title", "t")
        .add_query_param("content", "c")
        .await;
    res.assert_status_not_found();
    res.assert_json(&json!({"error": "Collection is not exists"}));
    Ok(())
}

#[tokio::test]
async fn search_returns_native_hits() -> anyhow::Result<()> {
    let server = server()?;
    create(&server, "docs").await;

    for (title, content) in [("vowels", "aeiou aeiou"), ("consonants", "bcdfg hjklm")] {
        server
            .post("/api/add_point")
            .add_query_param("collection_name", "docs")
            .add_query_param("title", title)
            .add_query_param("content", content)
            .await
            .assert_status_ok();
    }

    let res = server
        .get("/api/search")
        .add_query_param("collection_name", "docs")
        .add_query_param("query", "aaa")
        .add_query_param("top_k", 1)
        .await;
    res.assert_status_ok();

    let body: Value = res.json();
    let hits = body["output"].as_array().expect("output is a list");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["id"], 0);
    assert_eq!(hits[0]["payload"], json!({"title": "vowels", "text": "aeiou aeiou"}));
    assert!(hits[0]["score"].is_number());
    assert!(hits[0]["version"].is_number());
    Ok(())
}

#[tokio::test]
async fn search_missing_collection_is_not_found() -> anyhow::Result<()> {
    let server = server()?;
    let res = server
        .get("/api/search")
        .add_query_param("collection_name", "ghost")
        .add_query_param("query", "q")
        .add_query_param("top_k", 3)
        .await;
    res.assert_status_not_found();
    res.assert_json(&json!({"output": {"error": "Collection is not exists"}}));
    Ok(())
}

#[tokio::test]
async fn indexing_data_reports_batches() -> anyhow::Result<()> {
    let server = server_with_batch(2)?;
    create(&server, "docs").await;

    let res = server
        .post("/api/indexing_data")
        .add_query_param("collection_name", "docs")
        .multipart(csv_form("title,text,page\na,alpha,1\nb,beta,2\nc,gamma,3\n"))
        .await;
    res.assert_status_ok();

    let body: Value = res.json();
    assert_eq!(body["output"]["message"], "Upsert successful");
    assert_eq!(body["output"]["report"]["rows"], 3);
    assert_eq!(body["output"]["report"]["failed_batches"], 0);
    assert_eq!(
        body["output"]["report"]["batches"],
        json!([
            {"batch": 0, "first_id": 0, "last_id": 1, "status": "ok"},
            {"batch": 1, "first_id": 2, "last_id": 2, "status": "ok"}
        ])
    );

    let res = server
        .get("/api/search")
        .add_query_param("collection_name", "docs")
        .add_query_param("query", "gamma")
        .add_query_param("top_k", 10)
        .await;
    let body: Value = res.json();
    let pages: Vec<i64> = body["output"]
        .as_array()
        .expect("output is a list")
        .iter()
        .filter_map(|h| h["payload"]["page"].as_i64())
        .collect();
    assert_eq!(pages.len(), 3);
    Ok(())
}

#[tokio::test]
async fn indexing_without_text_column_is_bad_request() -> anyhow::Result<()> {
    let server = server()?;
    create(&server, "docs").await;

    let res = server
        .post("/api/indexing_data")
        .add_query_param("collection_name", "docs")
        .multipart(csv_form("title,body\na,b\n"))
        .await;
    res.assert_status_bad_request();
    res.assert_json(&json!({"output": {"error": "Uploaded file has no `text` column"}}));
    Ok(())
}

#[tokio::test]
async fn indexing_into_missing_collection_is_not_found() -> anyhow::Result<()> {
    let server = server()?;
    let res = server
        .post("/api/indexing_data")
        .add_query_param("collection_name", "ghost")
        .multipart(csv_form("text\nhello\n"))
        .await;
    res.assert_status_not_found();
    Ok(())
}

#[tokio::test]
async fn edit_and_delete_point() -> anyhow::Result<()> {
    let server = server()?;
    create(&server, "docs").await;
    server
        .post("/api/add_point")
        .add_query_param("collection_name", "docs")
        .add_query_param("title", "old")
        .add_query_param("content", "old text")
        .await
        .assert_status_ok();

    let res = server
        .put("/api/edit_point")
        .add_query_param("collection_name", "docs")
        .add_query_param("point_id", 0)
        .add_query_param("new_title", "new")
        .add_query_param("new_content", "new text")
        .await;
    res.assert_status_ok();
    res.assert_json(&json!({"output": {"message": "Point updated successfully"}}));

    let res = server
        .put("/api/edit_point")
        .add_query_param("collection_name", "docs")
        .add_query_param("point_id", 99)
        .add_query_param("new_title", "x")
        .add_query_param("new_content", "y")
        .await;
    res.assert_status_not_found();
    res.assert_json(&json!({"output": {"error": "Point not found"}}));

    let res = server
        .post("/api/delete_point")
        .add_query_param("collection_name", "docs")
        .add_query_param("id", 0)
        .await;
    res.assert_status_ok();
    res.assert_json(&json!({"output": {"message": "Point deleted successfully"}}));

    let res = server
        .get("/api/search")
        .add_query_param("collection_name", "docs")
        .add_query_param("query", "new")
        .add_query_param("top_k", 5)
        .await;
    res.assert_json(&json!({"output": []}));
    Ok(())
}

#[tokio::test]
async fn delete_collection_twice() -> anyhow::Result<()> {
    let server = server()?;
    create(&server, "docs").await;

    let res = server
        .delete("/api/delete_collection")
        .add_query_param("collection_name", "docs")
        .await;
    res.assert_status_ok();
    res.assert_json(&json!({"output": {"message": "Collection deleted successfully"}}));

    let res = server
        .delete("/api/delete_collection")
        .add_query_param("collection_name", "docs")
        .await;
    res.assert_status_not_found();
    res.assert_json(&json!({"output": {"error": "Collection is not exists"}}));
    Ok(())
}

#[tokio::test]
async fn malformed_query_is_rewritten_into_envelope() -> anyhow::Result<()> {
    let server = server()?;
    let res = server
        .get("/api/search")
        .add_query_param("collection_name", "docs")
        .add_query_param("query", "q")
        .await;
    res.assert_status_bad_request();
    assert!(res.maybe_header("X-Request-Id").is_some());

    let body: Value = res.json();
    let error = body["output"]["error"].as_str().expect("error is a string");
    assert!(error.contains("top_k"), "unexpected error text: {error}");
    assert_eq!(body["output"]["field"], "top_k");
    Ok(())
}
