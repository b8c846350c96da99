//! Integration tests for the admin store
//!
//! These drive a full `AdminStore` against a mock API and check what a
//! console view would observe: cache fast paths, key discrimination, error
//! isolation and stale-response handling.

use std::sync::Arc;
use std::time::Duration;

use console_store::app::{AdminStore, CacheConfig, MemorySessionStorage, QueryParams, StoreConfig};
use console_store::errors::{AuthError, FetchError};
use httpmock::prelude::*;
use serde_json::{json, Value};

fn store(server: &MockServer) -> AdminStore {
    let mut config = StoreConfig::with_base_url(server.base_url());
    config.client.rate_limit_rps = 1_000;
    AdminStore::new(config, Arc::new(MemorySessionStorage::default())).unwrap()
}

fn users(names: &[&str]) -> Value {
    let users: Vec<Value> = names
        .iter()
        .enumerate()
        .map(|(i, name)| json!({ "id": i + 1, "firstName": name, "lastName": "Doe" }))
        .collect();
    json!({ "users": users, "total": names.len(), "skip": 0, "limit": 10 })
}

#[tokio::test]
async fn test_search_scenario_uses_cache() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/auth/login");
            then.status(200).json_body(json!({
                "id": 1,
                "username": "emilys",
                "firstName": "Emily",
                "accessToken": "token-abc"
            }));
        })
        .await;
    let ann = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/users/search")
                .query_param("q", "ann")
                .query_param("limit", "10")
                .query_param("skip", "0");
            then.status(200)
                .json_body(users(&["Ann", "Anna", "Annabel"]));
        })
        .await;
    let bob = server
        .mock_async(|when, then| {
            when.method(GET).path("/users/search").query_param("q", "bob");
            then.status(200).json_body(users(&["Bob"]));
        })
        .await;

    let store = store(&server);
    store.initialize().await;
    store.login("emilys", "emilyspass").await.unwrap();

    let page = store
        .fetch_users(QueryParams::new().with_search("ann"))
        .await
        .unwrap();
    assert_eq!(page.items.len(), 3);
    assert_eq!(page.total, 3);

    let state = store.users().state();
    assert_eq!(state.items.len(), 3);
    assert_eq!(state.active_query.search, "ann");
    assert!(!state.loading);

    // Same query again: no second network call, same page
    let again = store
        .fetch_users(QueryParams::new().with_search("ann").with_limit(10).with_skip(0))
        .await
        .unwrap();
    assert_eq!(again, page);
    assert_eq!(ann.calls_async().await, 1);

    // A different search is a different cache entry
    store
        .fetch_users(QueryParams::new().with_search("bob"))
        .await
        .unwrap();
    assert_eq!(bob.calls_async().await, 1);
    assert_eq!(store.users().state().items[0].first_name, "Bob");

    let stats = store.users().cache_stats().await;
    assert_eq!(stats.entries, 2);
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 2);

    // Back to "ann" is served from the cache
    store
        .fetch_users(QueryParams::new().with_search("ann"))
        .await
        .unwrap();
    assert_eq!(ann.calls_async().await, 1);
    assert_eq!(store.users().state().items.len(), 3);
}

#[tokio::test]
async fn test_pages_are_distinct_cache_entries() {
    let server = MockServer::start_async().await;
    let first = server
        .mock_async(|when, then| {
            when.method(GET).path("/users").query_param("skip", "0");
            then.status(200)
                .json_body(json!({ "users": [{ "id": 1 }], "total": 20 }));
        })
        .await;
    let second = server
        .mock_async(|when, then| {
            when.method(GET).path("/users").query_param("skip", "10");
            then.status(200)
                .json_body(json!({ "users": [{ "id": 11 }], "total": 20 }));
        })
        .await;

    let store = store(&server);
    store.fetch_users(QueryParams::new()).await.unwrap();
    store
        .fetch_users(QueryParams::new().with_skip(10))
        .await
        .unwrap();
    assert_eq!(store.users().state().items[0].id, 11);

    store.fetch_users(QueryParams::new()).await.unwrap();
    assert_eq!(store.users().state().items[0].id, 1);

    assert_eq!(first.calls_async().await, 1);
    assert_eq!(second.calls_async().await, 1);
    assert!(store.users().is_cached(QueryParams::new().with_skip(10)).await);
}

#[tokio::test]
async fn test_search_takes_priority_over_category() {
    let server = MockServer::start_async().await;
    let search = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/products/search")
                .query_param("q", "phone");
            then.status(200).json_body(json!({
                "products": [{ "id": 122, "title": "iPhone 6", "category": "smartphones" }],
                "total": 1
            }));
        })
        .await;
    let category = server
        .mock_async(|when, then| {
            when.method(GET).path("/products/category/home-decoration");
            then.status(200).json_body(json!({
                "products": [{ "id": 26, "title": "Plant Pot", "category": "home-decoration" }],
                "total": 5
            }));
        })
        .await;

    let store = store(&server);
    store
        .fetch_products(
            QueryParams::new()
                .with_search("phone")
                .with_category("home-decoration"),
        )
        .await
        .unwrap();
    assert_eq!(search.calls_async().await, 1);
    assert_eq!(category.calls_async().await, 0);

    store
        .fetch_products(QueryParams::new().with_category("home-decoration"))
        .await
        .unwrap();
    assert_eq!(category.calls_async().await, 1);
    assert_eq!(store.products().state().total, 5);
}

#[tokio::test]
async fn test_failure_in_one_collection_does_not_touch_the_other() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/users");
            then.status(200)
                .json_body(json!({ "users": [{ "id": 1 }], "total": 1 }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/products");
            then.status(500);
        })
        .await;

    let store = store(&server);
    store.fetch_users(QueryParams::new()).await.unwrap();
    let err = store
        .fetch_products(QueryParams::new())
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Status { status: 500, .. }));

    let users = store.users().state();
    assert_eq!(users.items.len(), 1);
    assert!(users.error.is_none());

    let products = store.products().state();
    assert!(products.items.is_empty());
    assert_eq!(
        products.error.as_deref(),
        Some("Failed to load products (HTTP 500)")
    );
    assert!(!products.loading);
}

#[tokio::test]
async fn test_stale_response_is_discarded() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/users/search").query_param("q", "slow");
            then.status(200)
                .delay(Duration::from_millis(500))
                .json_body(users(&["Slow"]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/users/search").query_param("q", "fast");
            then.status(200).json_body(users(&["Fast"]));
        })
        .await;

    let store = Arc::new(store(&server));

    let slow = {
        let store = store.clone();
        tokio::spawn(async move {
            store
                .fetch_users(QueryParams::new().with_search("slow"))
                .await
        })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(store.users().state().loading);

    store
        .fetch_users(QueryParams::new().with_search("fast"))
        .await
        .unwrap();

    let slow_result = slow.await.unwrap();
    assert!(matches!(slow_result, Err(FetchError::Superseded { .. })));

    let state = store.users().state();
    assert_eq!(state.items[0].first_name, "Fast");
    assert_eq!(state.active_query.search, "fast");
    assert!(!state.loading);
    assert!(!store
        .users()
        .is_cached(QueryParams::new().with_search("slow"))
        .await);
}

#[tokio::test]
async fn test_cache_hit_supersedes_in_flight_request() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/products").query_param("skip", "0");
            then.status(200).json_body(json!({
                "products": [{ "id": 1, "title": "Mascara" }],
                "total": 30
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/products").query_param("skip", "10");
            then.status(200)
                .delay(Duration::from_millis(500))
                .json_body(json!({ "products": [{ "id": 11, "title": "Lamp" }], "total": 30 }));
        })
        .await;

    let store = Arc::new(store(&server));
    store.fetch_products(QueryParams::new()).await.unwrap();

    let pending = {
        let store = store.clone();
        tokio::spawn(async move { store.fetch_products(QueryParams::new().with_skip(10)).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    // User goes back to the first page before the second arrives
    store.fetch_products(QueryParams::new()).await.unwrap();
    assert!(matches!(
        pending.await.unwrap(),
        Err(FetchError::Superseded { .. })
    ));

    let state = store.products().state();
    assert_eq!(state.items[0].title, "Mascara");
    assert_eq!(state.active_query.skip, 0);
    assert!(!state.loading);
}

#[tokio::test]
async fn test_categories_and_detail() {
    let server = MockServer::start_async().await;
    let categories = server
        .mock_async(|when, then| {
            when.method(GET).path("/products/category-list");
            then.status(200).json_body(json!(["beauty", "fragrances"]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/users/7");
            then.status(200)
                .json_body(json!({ "id": 7, "firstName": "Ava", "lastName": "Taylor" }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/products/999");
            then.status(404).json_body(json!({ "message": "Product with id '999' not found" }));
        })
        .await;

    let store = store(&server);
    assert_eq!(store.categories().ensure_loaded().await.unwrap().len(), 2);
    store.categories().ensure_loaded().await.unwrap();
    assert_eq!(categories.calls_async().await, 1);

    let user = store.fetch_user(7).await.unwrap();
    assert_eq!(user.full_name(), "Ava Taylor");

    let err = store.fetch_product(999).await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to load product (HTTP 404)");
    // Detail failures never touch collection state
    assert!(store.products().state().error.is_none());
}

#[tokio::test]
async fn test_login_failure_and_logout() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/auth/login");
            then.status(400);
        })
        .await;

    let store = store(&server);
    store.initialize().await;

    let err = store.login("emilys", "nope").await.unwrap_err();
    assert!(matches!(err, AuthError::Rejected { .. }));
    assert_eq!(err.to_string(), "Email or password incorrect");

    let auth = store.sessions().state();
    assert_eq!(auth.error.as_deref(), Some("Email or password incorrect"));
    assert!(!auth.loading);
    assert!(!auth.session.is_authenticated());

    store.logout().await;
    assert!(!store.sessions().is_authenticated());
}

#[tokio::test]
async fn test_dispose_clears_collections_and_dashboard() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/users");
            then.status(200).json_body(users(&["Ann", "Bob"]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/products");
            then.status(200).json_body(json!({
                "products": [{ "id": 1, "rating": 4.0 }, { "id": 2, "rating": 2.0 }],
                "total": 194
            }));
        })
        .await;

    let store = store(&server);
    store.initialize().await;
    store.fetch_users(QueryParams::new()).await.unwrap();
    store.fetch_products(QueryParams::new()).await.unwrap();

    let summary = store.dashboard();
    assert_eq!(summary.welcome, "Welcome");
    assert_eq!(summary.loaded_users, 2);
    assert_eq!(summary.total_products, 194);
    assert!((summary.average_rating - 3.0).abs() < f64::EPSILON);

    store.dispose().await;
    assert!(store.users().state().is_empty());
    assert!(store.products().state().is_empty());
    assert_eq!(store.users().cache_stats().await.entries, 0);
}

#[tokio::test]
async fn test_least_recently_used_query_is_evicted() {
    let server = MockServer::start_async().await;
    let first = server
        .mock_async(|when, then| {
            when.method(GET).path("/users").query_param("skip", "0");
            then.status(200)
                .json_body(json!({ "users": [{ "id": 1 }], "total": 20 }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/users").query_param("skip", "10");
            then.status(200)
                .json_body(json!({ "users": [{ "id": 11 }], "total": 20 }));
        })
        .await;

    let mut config = StoreConfig::with_base_url(server.base_url());
    config.client.rate_limit_rps = 1_000;
    config.cache = CacheConfig::with_capacity(1);
    let store = AdminStore::new(config, Arc::new(MemorySessionStorage::default())).unwrap();

    store.fetch_users(QueryParams::new()).await.unwrap();
    store
        .fetch_users(QueryParams::new().with_skip(10))
        .await
        .unwrap();
    assert!(!store.users().is_cached(QueryParams::new()).await);

    // Evicted page goes back to the network
    store.fetch_users(QueryParams::new()).await.unwrap();
    assert_eq!(first.calls_async().await, 2);

    let stats = store.users().cache_stats().await;
    assert_eq!(stats.entries, 1);
    assert_eq!(stats.evictions, 2);
}

#[tokio::test]
async fn test_cache_hit_never_raises_loading() {
    let server = MockServer::start_async().await;
    let listing = server
        .mock_async(|when, then| {
            when.method(GET).path("/users");
            then.status(200)
                .delay(Duration::from_millis(50))
                .json_body(users(&["Ann", "Bob"]));
        })
        .await;

    let store = store(&server);
    let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
    let recorder = {
        let mut rx = store.users().subscribe();
        let seen = seen.clone();
        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let loading = rx.borrow_and_update().loading;
                seen.lock().unwrap().push(loading);
            }
        })
    };

    // A miss is observed loading while the response is outstanding
    store.fetch_users(QueryParams::new()).await.unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(seen.lock().unwrap().contains(&true));
    seen.lock().unwrap().clear();

    store.fetch_users(QueryParams::new()).await.unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;
    let observed = seen.lock().unwrap().clone();
    assert!(!observed.is_empty());
    assert!(observed.iter().all(|loading| !loading));
    assert_eq!(listing.calls_async().await, 1);

    recorder.abort();
}
