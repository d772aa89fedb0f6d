//! `ReqwestTransport` + `courier::submit` against a local multipart server.

use std::net::SocketAddr;

use axum::extract::Multipart;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use courier::transport::{HttpTransport, MultipartForm};
use courier::{ClientError, Identity, SelectedFile, UploadReceipt, submit};
use serde_json::{Value, json};
use uplink::ReqwestTransport;

async fn store_upload(mut multipart: Multipart) -> impl IntoResponse {
    let mut fields = Vec::new();
    let mut uid = String::new();
    let mut file_name = String::new();
    let mut content_type = String::new();
    let mut size = 0;
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_owned();
        fields.push(name.clone());
        match name.as_str() {
            "uid" => uid = field.text().await.unwrap_or_default(),
            "file" => {
                file_name = field.file_name().unwrap_or_default().to_owned();
                content_type = field.content_type().unwrap_or_default().to_owned();
                size = field.bytes().await.map(|b| b.len()).unwrap_or_default();
            }
            _ => {}
        }
    }
    if uid.is_empty() {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "missing uid" })));
    }
    (
        StatusCode::OK,
        Json(json!({
            "url": format!("https://cdn/{uid}/{file_name}"),
            "fields": fields,
            "content_type": content_type,
            "size": size,
        })),
    )
}

async fn spawn_server() -> SocketAddr {
    let app = Router::new()
        .route("/upload", post(store_upload))
        .route("/html", post(|| async { "<html>maintenance</html>" }))
        .route("/broken", post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn identity(uid: &str) -> Identity {
    Identity { uid: uid.to_owned(), email: None }
}

fn data_json() -> SelectedFile {
    SelectedFile::new("data.json", "application/json", br#"{"k":1}"#.to_vec())
}

#[tokio::test]
async fn upload_returns_server_url() {
    let addr = spawn_server().await;
    let transport = ReqwestTransport::new(None).unwrap();

    let outcome = submit(&transport, Some(&data_json()), Some(&identity("u1")), &format!("http://{addr}/upload")).await;

    assert_eq!(outcome, Ok(UploadReceipt { url: "https://cdn/u1/data.json".to_owned() }));
}

#[tokio::test]
async fn multipart_body_has_file_and_uid() {
    let addr = spawn_server().await;
    let transport = ReqwestTransport::new(None).unwrap();
    let form = MultipartForm::new().file("file", "scan.pdf", "application/pdf", vec![7; 32]).text("uid", "u9");

    let reply = transport.post_multipart(&format!("http://{addr}/upload"), &form).await.unwrap();

    assert_eq!(reply.status, 200);
    let body: Value = serde_json::from_str(&reply.body).unwrap();
    assert_eq!(body["fields"], json!(["file", "uid"]));
    assert_eq!(body["content_type"], "application/pdf");
    assert_eq!(body["size"], 32);
}

#[tokio::test]
async fn non_json_reply_is_parse_failure() {
    let addr = spawn_server().await;
    let transport = ReqwestTransport::new(None).unwrap();
    let outcome = submit(&transport, Some(&data_json()), Some(&identity("u1")), &format!("http://{addr}/html")).await;
    assert!(matches!(outcome, Err(ClientError::NetworkOrParse(msg)) if !msg.is_empty()));
}

#[tokio::test]
async fn server_error_is_failure() {
    let addr = spawn_server().await;
    let transport = ReqwestTransport::new(None).unwrap();
    let outcome = submit(&transport, Some(&data_json()), Some(&identity("u1")), &format!("http://{addr}/broken")).await;
    assert_eq!(outcome, Err(ClientError::NetworkOrParse("server returned status 500: boom".to_owned())));
}

#[tokio::test]
async fn connection_refused_is_network_failure() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let transport = ReqwestTransport::new(None).unwrap();
    let outcome = submit(&transport, Some(&data_json()), Some(&identity("u1")), &format!("http://{addr}/upload")).await;
    assert!(matches!(outcome, Err(ClientError::NetworkOrParse(msg)) if msg.starts_with("could not connect")));
}
