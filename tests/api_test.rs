#![allow(clippy::indexing_slicing)]
#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{create_test_dir, spawn_app};
use serde_json::{json, Value};
use tempfile::TempDir;

async fn catalog_server() -> (TempDir, String) {
    let dir = create_test_dir();
    let base = spawn_app(&dir.path().join("catalog.json")).await;
    (dir, base)
}

async fn post_item(client: &reqwest::Client, base: &str, body: &Value) -> Value {
    let resp = client
        .post(format!("{base}/items"))
        .json(body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    resp.json().await.unwrap()
}

#[tokio::test]
async fn test_health() {
    let (_dir, base) = catalog_server().await;
    let client = reqwest::Client::new();

    let resp = client.get(format!("{base}/health")).send().await.unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_create_then_search_by_name() {
    let (_dir, base) = catalog_server().await;
    let client = reqwest::Client::new();

    let created = post_item(
        &client,
        &base,
        &json!({ "title": "UniqueTitle", "item_type": "book" }),
    )
    .await;
    assert!(created["id"].as_u64().is_some());
    assert_eq!(created["is_available"], true);

    let hit: Value = client
        .get(format!("{base}/items?name=UniqueTitle"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let hits = hit.as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["title"], "UniqueTitle");

    let miss: Value = client
        .get(format!("{base}/items?name=NoSuchTitle"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(miss.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_search_is_case_insensitive() {
    let (_dir, base) = catalog_server().await;
    let client = reqwest::Client::new();

    post_item(&client, &base, &json!({ "title": "Dune", "item_type": "book" })).await;

    let found: Value = client
        .get(format!("{base}/items?name=dune"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(found.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_name_search_overrides_other_filters() {
    let (_dir, base) = catalog_server().await;
    let client = reqwest::Client::new();

    post_item(&client, &base, &json!({ "title": "Dune", "item_type": "book" })).await;

    // A type filter that matches nothing must not hide the search hit.
    let found: Value = client
        .get(format!("{base}/items?name=Dune&type=film&available=false"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let items = found.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Dune");
}

#[tokio::test]
async fn test_create_missing_item_type_is_rejected() {
    let (_dir, base) = catalog_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/items"))
        .json(&json!({ "title": "Orphan" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("required"));

    // Nothing was created.
    let listed: Value = client
        .get(format!("{base}/items"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_create_invalid_date_is_rejected() {
    let (_dir, base) = catalog_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/items"))
        .json(&json!({
            "title": "Dune",
            "item_type": "book",
            "expected_available_date": "31-12-2025"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("Invalid date"));
}

#[tokio::test]
async fn test_create_with_date_is_unavailable() {
    let (_dir, base) = catalog_server().await;
    let client = reqwest::Client::new();

    let created = post_item(
        &client,
        &base,
        &json!({
            "title": "Dune",
            "item_type": "book",
            "expected_available_date": "2030-05-01"
        }),
    )
    .await;
    assert_eq!(created["is_available"], false);
    assert_eq!(created["expected_available_date"], "2030-05-01");
}

#[tokio::test]
async fn test_unknown_fields_are_ignored() {
    let (_dir, base) = catalog_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/items"))
        .header("content-type", "application/json")
        .body(r#"{"title": "Dune", "item_type": "book", "shelf": "A3"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
}

#[tokio::test]
async fn test_get_missing_item_is_404() {
    let (_dir, base) = catalog_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{base}/items/999"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Not found");
}

#[tokio::test]
async fn test_update_availability_and_date_stay_consistent() {
    let (_dir, base) = catalog_server().await;
    let client = reqwest::Client::new();

    let created = post_item(&client, &base, &json!({ "title": "Dune", "item_type": "book" })).await;
    let id = created["id"].as_u64().unwrap();

    let checked_out: Value = client
        .put(format!("{base}/items/{id}"))
        .json(&json!({
            "is_available": false,
            "expected_available_date": "2025-12-31"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(checked_out["is_available"], false);
    assert_eq!(checked_out["expected_available_date"], "2025-12-31");

    // Marking it available again clears the date.
    let returned: Value = client
        .put(format!("{base}/items/{id}"))
        .json(&json!({ "is_available": true }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(returned["is_available"], true);
    assert!(returned["expected_available_date"].is_null());
}

#[tokio::test]
async fn test_update_distinguishes_null_from_absent() {
    let (_dir, base) = catalog_server().await;
    let client = reqwest::Client::new();

    let created = post_item(
        &client,
        &base,
        &json!({
            "title": "Dune",
            "item_type": "book",
            "author_or_director": "Frank Herbert"
        }),
    )
    .await;
    let id = created["id"].as_u64().unwrap();

    // An absent field keeps its value.
    let untouched: Value = client
        .put(format!("{base}/items/{id}"))
        .header("content-type", "application/json")
        .body(r#"{"title": "Dune (1965)"}"#)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(untouched["title"], "Dune (1965)");
    assert_eq!(untouched["author_or_director"], "Frank Herbert");

    // An explicit null clears it.
    let cleared: Value = client
        .put(format!("{base}/items/{id}"))
        .header("content-type", "application/json")
        .body(r#"{"author_or_director": null}"#)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(cleared["author_or_director"].is_null());
}

#[tokio::test]
async fn test_update_missing_item_is_404() {
    let (_dir, base) = catalog_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .put(format!("{base}/items/42"))
        .json(&json!({ "title": "Ghost" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn test_delete_then_repeat_is_404() {
    let (_dir, base) = catalog_server().await;
    let client = reqwest::Client::new();

    let created = post_item(&client, &base, &json!({ "title": "Dune", "item_type": "book" })).await;
    let id = created["id"].as_u64().unwrap();

    let resp = client
        .delete(format!("{base}/items/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let ack: Value = resp.json().await.unwrap();
    assert_eq!(ack["status"], "deleted");

    let again = client
        .delete(format!("{base}/items/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(again.status(), 404);

    let fetch = client
        .get(format!("{base}/items/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(fetch.status(), 404);
}

#[tokio::test]
async fn test_available_filter_parsing() {
    let (_dir, base) = catalog_server().await;
    let client = reqwest::Client::new();

    post_item(&client, &base, &json!({ "title": "OnShelf", "item_type": "book" })).await;
    post_item(
        &client,
        &base,
        &json!({
            "title": "CheckedOut",
            "item_type": "book",
            "expected_available_date": "2030-01-01"
        }),
    )
    .await;

    for query in ["available=true", "available=1"] {
        let found: Value = client
            .get(format!("{base}/items?{query}"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let items = found.as_array().unwrap();
        assert_eq!(items.len(), 1, "query {query} should match one item");
        assert_eq!(items[0]["title"], "OnShelf");
    }

    for query in ["available=false", "available=banana"] {
        let found: Value = client
            .get(format!("{base}/items?{query}"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let items = found.as_array().unwrap();
        assert_eq!(items.len(), 1, "query {query} should match one item");
        assert_eq!(items[0]["title"], "CheckedOut");
    }
}

#[tokio::test]
async fn test_type_filter_is_case_insensitive() {
    let (_dir, base) = catalog_server().await;
    let client = reqwest::Client::new();

    post_item(&client, &base, &json!({ "title": "Alien", "item_type": "film" })).await;
    post_item(&client, &base, &json!({ "title": "Dune", "item_type": "book" })).await;

    let films: Value = client
        .get(format!("{base}/items?type=FILM"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let items = films.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Alien");
}

#[tokio::test]
async fn test_list_is_ordered_by_id() {
    let (_dir, base) = catalog_server().await;
    let client = reqwest::Client::new();

    post_item(&client, &base, &json!({ "title": "One", "item_type": "book" })).await;
    post_item(&client, &base, &json!({ "title": "Two", "item_type": "book" })).await;
    post_item(&client, &base, &json!({ "title": "Three", "item_type": "book" })).await;

    let listed: Value = client
        .get(format!("{base}/items"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let ids: Vec<u64> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);
}
