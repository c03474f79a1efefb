use std::path::Path;

use axum::body::Body;
use axum::http::Request;
use http_body_util::BodyExt;
use serde_json::Value;
use snap_vault::{build, defaults, Settings};
use tower::ServiceExt;

const BOUNDARY: &str = "snap-vault-boundary";

fn settings(dir: &Path, database_url: &str) -> Settings {
    let mut config = defaults();
    config.set("uploads.dir", dir.join("uploads").display().to_string());
    config.set("database.url", database_url);
    Settings::from_snapshot(&config.snapshot()).unwrap()
}

fn upload(title: &str, is_private: &str, bytes: &[u8]) -> Request<Body> {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"title\"\r\n\r\n{title}\r\n\
         --{BOUNDARY}\r\nContent-Disposition: form-data; name=\"isPrivate\"\r\n\r\n{is_private}\r\n\
         --{BOUNDARY}\r\nContent-Disposition: form-data; name=\"media\"; filename=\"clip.mp4\"\r\n\
         Content-Type: video/mp4\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/media")
        .header("content-type", format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(body))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(res: axum::response::Response) -> Value {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn liveness_ok() {
    let dir = tempfile::tempdir().unwrap();
    let app = build(&settings(dir.path(), "memory")).await.unwrap();

    let res = app.router.oneshot(get("/")).await.unwrap();
    assert_eq!(res.status().as_u16(), 200);
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(std::str::from_utf8(&bytes).unwrap(), "snap-vault-server is running");
}

#[tokio::test]
async fn build_creates_upload_dir() {
    let dir = tempfile::tempdir().unwrap();
    build(&settings(dir.path(), "memory")).await.unwrap();
    assert!(dir.path().join("uploads").is_dir());
}

#[tokio::test]
async fn sqlite_backed_upload_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("media.db").display());
    let app = build(&settings(dir.path(), &url)).await.unwrap();

    let res = app.router.clone().oneshot(upload("Clip", "false", b"frames")).await.unwrap();
    assert_eq!(res.status().as_u16(), 200);
    let created = json_body(res).await;

    let res = app.router.clone().oneshot(get("/media")).await.unwrap();
    let listed = json_body(res).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0], created["media"]);

    let url = created["media"]["url"].as_str().unwrap();
    let res = app.router.clone().oneshot(get(url)).await.unwrap();
    assert_eq!(res.status().as_u16(), 200);
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"frames");
}

#[tokio::test]
async fn records_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("media.db").display());

    let first = build(&settings(dir.path(), &url)).await.unwrap();
    let res = first.router.clone().oneshot(upload("Kept", "true", b"x")).await.unwrap();
    assert_eq!(res.status().as_u16(), 200);
    drop(first);

    let second = build(&settings(dir.path(), &url)).await.unwrap();
    let res = second.router.clone().oneshot(get("/my-uploads")).await.unwrap();
    let all = json_body(res).await;
    assert_eq!(all.as_array().unwrap().len(), 1);
    assert_eq!(all[0]["title"], "Kept");
    assert_eq!(all[0]["isPrivate"], Value::Bool(true));

    let res = second.router.oneshot(get("/media")).await.unwrap();
    assert!(json_body(res).await.as_array().unwrap().is_empty());
}
