//! `FirebaseAuth` over `ReqwestTransport` against a fake Identity Toolkit.

use std::net::SocketAddr;

use axum::extract::Query;
use axum::http::{StatusCode, Uri};
use axum::{Json, Router};
use courier::firebase::{FirebaseAuth, FirebaseConfig};
use courier::store::SessionStore;
use courier::{GateState, IdentityProvider, SessionTracker};
use serde::Deserialize;
use serde_json::{Value, json};
use uplink::{FileSessionStore, ReqwestTransport};

const API_KEY: &str = "fake-key";

#[derive(Deserialize)]
struct KeyQuery {
    key: String,
}

async fn toolkit(uri: Uri, Query(query): Query<KeyQuery>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if query.key != API_KEY {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": { "code": 400, "message": "API_KEY_INVALID" } })));
    }
    let email = body["email"].as_str().unwrap_or_default();
    match uri.path() {
        "/v1/accounts:signUp" if email == "taken@example.com" => {
            (StatusCode::BAD_REQUEST, Json(json!({ "error": { "code": 400, "message": "EMAIL_EXISTS" } })))
        }
        "/v1/accounts:signUp" | "/v1/accounts:signInWithPassword" if body["password"] == "correct-horse" => (
            StatusCode::OK,
            Json(json!({
                "localId": format!("uid-{email}"),
                "email": email,
                "idToken": "id-token",
                "refreshToken": "refresh-token",
                "expiresIn": "3600",
            })),
        ),
        "/v1/accounts:signInWithPassword" => {
            (StatusCode::BAD_REQUEST, Json(json!({ "error": { "code": 400, "message": "INVALID_LOGIN_CREDENTIALS" } })))
        }
        _ => (StatusCode::NOT_FOUND, Json(json!({ "error": { "code": 404, "message": "NOT_FOUND" } }))),
    }
}

async fn spawn_toolkit() -> SocketAddr {
    let app = Router::new().fallback(toolkit);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn auth_for(addr: SocketAddr, store: FileSessionStore) -> FirebaseAuth<ReqwestTransport, FileSessionStore> {
    let config = FirebaseConfig {
        api_key: API_KEY.to_owned(),
        base_url: format!("http://{addr}/v1"),
        request_uri: "http://localhost:8080".to_owned(),
    };
    FirebaseAuth::new(ReqwestTransport::new(None).unwrap(), store, config)
}

fn temp_store() -> FileSessionStore {
    FileSessionStore::new(std::env::temp_dir().join(format!("uplink-it-{}.json", uuid::Uuid::new_v4())))
}

#[tokio::test]
async fn sign_in_persists_session_for_next_run() {
    let addr = spawn_toolkit().await;
    let store = temp_store();

    let first = auth_for(addr, store.clone());
    let mut tracker = SessionTracker::start(&first);
    first.restore();
    assert_eq!(tracker.resolve().await, &GateState::Unauthenticated);

    let identity = first.sign_in("a@example.com", "correct-horse").await.unwrap();
    assert_eq!(identity.uid, "uid-a@example.com");
    assert_eq!(tracker.changed().await.and_then(GateState::identity), Some(&identity));
    tracker.teardown();

    let second = auth_for(addr, store.clone());
    let mut tracker = SessionTracker::start(&second);
    second.restore();
    assert_eq!(tracker.resolve().await.identity(), Some(&identity));

    second.sign_out().await.unwrap();
    assert_eq!(store.load().unwrap(), None);
}

#[tokio::test]
async fn wrong_password_is_readable_error() {
    let addr = spawn_toolkit().await;
    let auth = auth_for(addr, temp_store());
    let err = auth.sign_in("a@example.com", "nope").await.unwrap_err();
    assert_eq!(err.code.as_deref(), Some("INVALID_LOGIN_CREDENTIALS"));
    assert_eq!(err.message, "Invalid email or password.");
}

#[tokio::test]
async fn duplicate_sign_up_is_readable_error() {
    let addr = spawn_toolkit().await;
    let auth = auth_for(addr, temp_store());
    let err = auth.sign_up("taken@example.com", "correct-horse").await.unwrap_err();
    assert_eq!(err.message, "The email address is already in use by another account.");
}
