//! Integration tests for session persistence and the auth guard
//!
//! A session written by one store instance must be restored by the next,
//! and the guard must hold its decision until that restore has happened.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use console_store::app::{
    AdminStore, FileSessionStorage, GuardDecision, MemorySessionStorage, SessionStorage,
    StoreConfig,
};
use httpmock::prelude::*;
use serde_json::json;
use tempfile::TempDir;

async fn login_server() -> MockServer {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/auth/login");
            then.status(200).json_body(json!({
                "id": 1,
                "username": "emilys",
                "email": "emily.johnson@x.dummyjson.com",
                "firstName": "Emily",
                "lastName": "Johnson",
                "accessToken": "token-abc",
                "refreshToken": "refresh-xyz"
            }));
        })
        .await;
    server
}

fn store(server: &MockServer, storage: Arc<dyn SessionStorage>) -> AdminStore {
    AdminStore::new(StoreConfig::with_base_url(server.base_url()), storage).unwrap()
}

#[tokio::test]
async fn test_session_survives_restart() {
    let server = login_server().await;
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");

    {
        let storage = Arc::new(FileSessionStorage::new(&path, "console-session"));
        let store = store(&server, storage);
        store.initialize().await;
        store.login("emilys", "emilyspass").await.unwrap();
        store.dispose().await;
    }

    let storage = Arc::new(FileSessionStorage::new(&path, "console-session"));
    let restarted = store(&server, storage);
    assert_eq!(restarted.guard().evaluate("/users"), GuardDecision::Pending);

    restarted.initialize().await;
    let session = restarted.sessions().session();
    assert_eq!(session.token.as_deref(), Some("token-abc"));
    assert_eq!(
        session.user.map(|u| u.username),
        Some("emilys".to_string())
    );
    assert_eq!(restarted.guard().evaluate("/users"), GuardDecision::Allow);
    assert_eq!(
        restarted.guard().evaluate("/login"),
        GuardDecision::RedirectToDashboard
    );
}

#[tokio::test]
async fn test_logout_is_persisted() {
    let server = login_server().await;
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");

    let storage = Arc::new(FileSessionStorage::new(&path, "console-session"));
    let store = store(&server, storage);
    store.initialize().await;
    store.login("emilys", "emilyspass").await.unwrap();
    store.logout().await;

    let storage = Arc::new(FileSessionStorage::new(&path, "console-session"));
    let restarted = store_for(&server, storage).await;
    assert!(!restarted.sessions().is_authenticated());
    assert_eq!(
        restarted.guard().evaluate("/dashboard"),
        GuardDecision::RedirectToLogin
    );
}

async fn store_for(server: &MockServer, storage: Arc<dyn SessionStorage>) -> AdminStore {
    let store = store(server, storage);
    store.initialize().await;
    store
}

#[tokio::test]
async fn test_hydration_callbacks_fire_once() {
    let server = login_server().await;
    let store = store(&server, Arc::new(MemorySessionStorage::default()));

    let fired = Arc::new(AtomicBool::new(false));
    let flag = fired.clone();
    store.gate().on_hydrated(move || {
        assert!(!flag.swap(true, Ordering::SeqCst), "callback ran twice");
    });
    assert!(!fired.load(Ordering::SeqCst));

    store.initialize().await;
    store.initialize().await;
    assert!(fired.load(Ordering::SeqCst));

    // Registered after the transition: runs immediately
    let late = Arc::new(AtomicBool::new(false));
    let late_flag = late.clone();
    store
        .gate()
        .on_hydrated(move || late_flag.store(true, Ordering::SeqCst));
    assert!(late.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_guard_waits_for_hydration() {
    let server = login_server().await;
    let storage = Arc::new(MemorySessionStorage::default());

    let seeded = store(&server, storage.clone());
    seeded.initialize().await;
    seeded.login("emilys", "emilyspass").await.unwrap();

    let store = Arc::new(store(&server, storage));
    let pending = {
        let store = store.clone();
        tokio::spawn(async move { store.guard().resolve("/products").await })
    };
    tokio::task::yield_now().await;
    assert!(!pending.is_finished());

    store.initialize().await;
    assert_eq!(pending.await.unwrap(), GuardDecision::Allow);
}

#[tokio::test]
async fn test_foreign_record_is_ignored() {
    let server = login_server().await;
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");

    let other = Arc::new(FileSessionStorage::new(&path, "some-other-app"));
    let store = store(&server, other);
    store.initialize().await;
    store.login("emilys", "emilyspass").await.unwrap();

    let ours = Arc::new(FileSessionStorage::new(&path, "console-session"));
    let restarted = store_for(&server, ours).await;
    assert!(!restarted.sessions().is_authenticated());
}

#[tokio::test]
async fn test_login_accepts_every_success_shape() {
    let shapes = [
        (
            json!({ "id": 1, "username": "emilys", "token": "t", "accessToken": "a", "refreshToken": "r" }),
            "t",
        ),
        (json!({ "username": "emilys", "token": "t" }), "t"),
        (json!({ "id": 1, "username": "emilys", "role": "admin", "accessToken": "a" }), "a"),
    ];

    for (body, expected_token) in shapes {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/auth/login");
                then.status(200).json_body(body.clone());
            })
            .await;

        let storage = Arc::new(MemorySessionStorage::default());
        let store = store(&server, storage.clone());
        store.initialize().await;

        let session = store.login("emilys", "emilyspass").await.unwrap();
        assert_eq!(session.token.as_deref(), Some(expected_token));
        assert_eq!(session.user.as_ref().unwrap().username, "emilys");

        let restarted = store_for(&server, storage).await;
        assert_eq!(restarted.sessions().session(), session);
        if body.get("role").is_some() {
            let user = restarted.sessions().session().user.unwrap();
            assert_eq!(user.extra.get("role"), Some(&json!("admin")));
        }
    }
}
