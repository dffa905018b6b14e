use std::sync::Arc;

use actix_web::{
    dev::{Service, ServiceResponse},
    http::{header, StatusCode},
    test, App,
};
use serde::de::DeserializeOwned;
use serde_json::json;
use upload_server::{
    api::{dtos::*, ResponseBase},
    infrastructure::{config::UploadConfig, ServiceProvider},
    server::{configure, prepare_storage},
};

const BOUNDARY: &str = "----chunk-boundary";
const MD5: &str = "5d41402abc4b2a76b9719d911017c592";

struct TestHost {
    // Dropped last, the service keeps paths into it.
    _dir: tempfile::TempDir,
    sp: Arc<ServiceProvider>,
}

async fn host() -> TestHost {
    let dir = tempfile::tempdir().unwrap();
    let config: UploadConfig = serde_json::from_value(json!({
        "host": { "temp_dir": dir.path().join("tmp") },
        "storage": { "root": dir.path().join("uploads") },
    }))
    .unwrap();
    let sp = Arc::new(ServiceProvider::build(config).unwrap());
    prepare_storage(&sp).await.unwrap();
    TestHost { _dir: dir, sp }
}

fn chunk_body(md5: &str, index: u64, content: &str) -> String {
    format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"md5\"\r\n\
         Content-Type: text/plain\r\n\r\n\
         {md5}\r\n\
         --{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"index\"\r\n\
         Content-Type: text/plain\r\n\r\n\
         {index}\r\n\
         --{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"data\"; filename=\"blob\"\r\n\
         Content-Type: application/octet-stream\r\n\r\n\
         {content}\r\n\
         --{BOUNDARY}--\r\n"
    )
}

async fn content<T: DeserializeOwned>(resp: ServiceResponse) -> Option<T> {
    let body: ResponseBase<T> = test::read_body_json(resp).await;
    body.content
}

macro_rules! app {
    ($host:expr) => {{
        let sp = $host.sp.clone();
        test::init_service(App::new().configure(move |cfg| configure(cfg, sp))).await
    }};
}

async fn post_json<S>(app: &S, uri: &str, body: serde_json::Value) -> ServiceResponse
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    test::call_service(app, test::TestRequest::post().uri(uri).set_json(body).to_request()).await
}

async fn upload<S>(app: &S, index: u64, content: &str) -> ServiceResponse
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    upload_to(app, "/upload", index, content).await
}

async fn upload_to<S>(app: &S, uri: &str, index: u64, content: &str) -> ServiceResponse
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let req = test::TestRequest::post()
        .uri(uri)
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(chunk_body(MD5, index, content))
        .to_request();
    test::call_service(app, req).await
}

#[actix_web::test]
async fn unknown_content_does_not_exist() {
    let host = host().await;
    let app = app!(host);

    let resp = post_json(&app, "/check", json!({ "md5": MD5, "fileName": "a.txt" })).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let checked: CheckResponse = content(resp).await.unwrap();
    assert_eq!(
        checked,
        CheckResponse {
            exist: false,
            chunk_list: None
        }
    );
}

#[actix_web::test]
async fn upload_merge_list_download_delete() {
    let host = host().await;
    let app = app!(host);

    for (index, part) in [(1, "world"), (0, "hello ")] {
        let resp = upload(&app, index, part).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let uploaded: UploadChunkResponse = content(resp).await.unwrap();
        assert_eq!(uploaded.chunk, index);
    }
    let resp = post_json(&app, "/check", json!({ "md5": MD5, "fileName": "résumé.txt" })).await;
    let checked: CheckResponse = content(resp).await.unwrap();
    assert!(checked.exist);
    assert_eq!(checked.chunk_list, Some(vec![0, 1]));

    let resp = post_json(
        &app,
        "/merge",
        json!({ "md5": MD5, "fileName": "résumé.txt", "total": 2 }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let merged: MergeResponse = content(resp).await.unwrap();
    assert!(!merged.deduplicated);

    let resp = post_json(&app, "/files", json!({})).await;
    let files: Vec<FileEntry> = content(resp).await.unwrap();
    assert_eq!(
        files,
        [FileEntry {
            md5: MD5.to_string(),
            name: "résumé.txt".to_string(),
            percent: 100,
            status: FileStatus::Uploaded,
        }]
    );

    let resp = post_json(&app, "/download", json!({ "md5": MD5, "fileName": "résumé.txt" })).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let disposition = resp.headers().get(header::CONTENT_DISPOSITION).unwrap().to_str().unwrap();
    assert!(disposition.starts_with("attachment"));
    assert!(disposition.contains("filename*=UTF-8''r%C3%A9sum%C3%A9.txt"));
    assert_eq!(test::read_body(resp).await, "hello world");

    let resp = post_json(&app, "/delete", json!({ "md5": MD5, "fileName": "résumé.txt" })).await;
    let deleted: DeleteResponse = content(resp).await.unwrap();
    assert_eq!(deleted.result, RemovalKind::Deleted);
    let resp = post_json(&app, "/files", json!({})).await;
    assert!(content::<Vec<FileEntry>>(resp).await.unwrap().is_empty());
}

#[actix_web::test]
async fn linked_alias_downloads_the_same_content() {
    let host = host().await;
    let app = app!(host);
    upload(&app, 0, "shared").await;
    post_json(&app, "/merge", json!({ "md5": MD5, "fileName": "a.txt", "total": 1 })).await;

    let resp = post_json(&app, "/link", json!({ "md5": MD5, "fileName": "b.txt" })).await;
    let linked: LinkResponse = content(resp).await.unwrap();
    assert_eq!(linked.file_names, ["a.txt", "b.txt"]);

    let resp = post_json(&app, "/delete", json!({ "md5": MD5, "fileName": "a.txt" })).await;
    let deleted: DeleteResponse = content(resp).await.unwrap();
    assert_eq!(deleted.result, RemovalKind::Promoted);
    assert_eq!(deleted.canonical.as_deref(), Some("b.txt"));

    let resp = post_json(&app, "/download", json!({ "md5": MD5, "fileName": "b.txt" })).await;
    assert_eq!(test::read_body(resp).await, "shared");
}

#[actix_web::test]
async fn incomplete_merge_reports_missing_chunks() {
    let host = host().await;
    let app = app!(host);
    upload(&app, 0, "first").await;

    let resp = post_json(&app, "/merge", json!({ "md5": MD5, "fileName": "a.txt", "total": 2 })).await;

    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: ResponseBase<Vec<u64>> = test::read_body_json(resp).await;
    assert_eq!(body.status, 409);
    assert_eq!(body.content, Some(vec![1]));
}

#[actix_web::test]
async fn errors_use_the_envelope() {
    let host = host().await;
    let app = app!(host);

    let resp = post_json(&app, "/delete", json!({ "md5": MD5, "fileName": "a.txt" })).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: ResponseBase<()> = test::read_body_json(resp).await;
    assert_eq!(body.status, 404);

    let resp = post_json(&app, "/check", json!({ "md5": "not-a-hash", "fileName": "a.txt" })).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = post_json(&app, "/check", json!({ "md5": MD5, "fileName": "../a.txt" })).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = post_json(&app, "/merge", json!({ "md5": MD5 })).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ResponseBase<()> = test::read_body_json(resp).await;
    assert_eq!(body.status, 400);
}

#[actix_web::test]
async fn routes_with_a_trailing_segment_are_accepted() {
    let host = host().await;
    let app = app!(host);

    let resp = upload_to(&app, "/upload/0", 0, "legacy").await;
    assert_eq!(resp.status(), StatusCode::OK);
    post_json(&app, "/merge", json!({ "md5": MD5, "fileName": "a.txt", "total": 1 })).await;

    let resp = post_json(&app, "/test", json!({})).await;
    let files: Vec<FileEntry> = content(resp).await.unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].percent, 100);

    let resp = post_json(&app, "/download/a.txt", json!({ "md5": MD5, "fileName": "a.txt" })).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(test::read_body(resp).await, "legacy");

    let resp = post_json(&app, "/delete/a.txt", json!({ "md5": MD5, "fileName": "a.txt" })).await;
    let deleted: DeleteResponse = content(resp).await.unwrap();
    assert_eq!(deleted.result, RemovalKind::Deleted);
}
