mod helpers;

use axum::http::StatusCode;
use helpers::catalog_app;
use serde_json::{Value, json};

#[tokio::test]
async fn create_menu_returns_201_with_counters() {
    let (client, _kv, _cache) = catalog_app();

    let response = client
        .post_json(
            "/api/v1/menus",
            &json!({"title": "Menu A", "description": "desc"}),
        )
        .await;

    response.assert_status(StatusCode::CREATED);
    let menu: Value = response.json();
    assert_eq!(menu["title"], "Menu A");
    assert_eq!(menu["description"], "desc");
    assert_eq!(menu["submenus_count"], 0);
    assert_eq!(menu["dishes_count"], 0);
    assert!(menu["id"].is_string());
}

#[tokio::test]
async fn create_then_get_reads_own_write() {
    let (client, _kv, _cache) = catalog_app();

    let created: Value = client
        .post_json("/api/v1/menus", &json!({"title": "Menu A", "description": "d"}))
        .await
        .json();
    let id = created["id"].as_str().unwrap().to_string();

    let fetched: Value = client
        .get(&format!("/api/v1/menus/{}", id))
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(fetched, created);
}

#[tokio::test]
async fn list_menus_includes_created() {
    let (client, _kv, _cache) = catalog_app();

    client
        .post_json("/api/v1/menus", &json!({"title": "A", "description": ""}))
        .await;
    client
        .post_json("/api/v1/menus", &json!({"title": "B", "description": ""}))
        .await;

    let menus: Vec<Value> = client
        .get("/api/v1/menus")
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(menus.len(), 2);
    assert_eq!(menus[0]["title"], "A");
    assert_eq!(menus[1]["title"], "B");
}

#[tokio::test]
async fn get_missing_menu_returns_404_detail() {
    let (client, _kv, _cache) = catalog_app();

    let response = client
        .get("/api/v1/menus/00000000-0000-0000-0000-000000000000")
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["detail"], "menu not found");
}

#[tokio::test]
async fn duplicate_title_returns_409() {
    let (client, _kv, _cache) = catalog_app();

    client
        .post_json("/api/v1/menus", &json!({"title": "Carta", "description": ""}))
        .await
        .assert_status(StatusCode::CREATED);

    let response = client
        .post_json("/api/v1/menus", &json!({"title": "Carta", "description": "x"}))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["detail"], "Another menu with this title already exists.");
}

#[tokio::test]
async fn update_menu_changes_title() {
    let (client, _kv, _cache) = catalog_app();

    let created: Value = client
        .post_json("/api/v1/menus", &json!({"title": "Vieja", "description": "d"}))
        .await
        .json();
    let id = created["id"].as_str().unwrap().to_string();

    let updated: Value = client
        .patch_json(
            &format!("/api/v1/menus/{}", id),
            &json!({"title": "Nueva", "description": "d2"}),
        )
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(updated["title"], "Nueva");
    assert_eq!(updated["description"], "d2");

    let fetched: Value = client.get(&format!("/api/v1/menus/{}", id)).await.json();
    assert_eq!(fetched["title"], "Nueva");
}

#[tokio::test]
async fn update_missing_menu_returns_404() {
    let (client, _kv, _cache) = catalog_app();

    client
        .patch_json(
            "/api/v1/menus/00000000-0000-0000-0000-000000000000",
            &json!({"title": "t", "description": "d"}),
        )
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_menu_confirms_and_makes_it_unreachable() {
    let (client, _kv, cache) = catalog_app();

    let created: Value = client
        .post_json("/api/v1/menus", &json!({"title": "A", "description": ""}))
        .await
        .json();
    let id = created["id"].as_str().unwrap().to_string();

    let confirmation: Value = client
        .delete(&format!("/api/v1/menus/{}", id))
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(confirmation["status"], true);
    assert_eq!(confirmation["message"], "The menu has been deleted");

    cache.drain().await;
    client
        .get(&format!("/api/v1/menus/{}", id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_absent_menu_is_a_confirmed_noop() {
    let (client, _kv, _cache) = catalog_app();

    let confirmation: Value = client
        .delete("/api/v1/menus/00000000-0000-0000-0000-000000000000")
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(confirmation["status"], true);
}

#[tokio::test]
async fn repeated_gets_after_cache_drop_stay_identical() {
    let (client, kv, _cache) = catalog_app();

    let created: Value = client
        .post_json("/api/v1/menus", &json!({"title": "A", "description": "d"}))
        .await
        .json();
    let id = created["id"].as_str().unwrap().to_string();
    let uri = format!("/api/v1/menus/{}", id);

    // Cada miss repuebla la cache con el mismo resultado que storage
    let first: Value = client.get(&uri).await.json();
    carta_cache::KvBackend::flush_all(&*kv).await.unwrap();
    let second: Value = client.get(&uri).await.json();
    let third: Value = client.get(&uri).await.json();

    assert_eq!(first, second);
    assert_eq!(second, third);
}
