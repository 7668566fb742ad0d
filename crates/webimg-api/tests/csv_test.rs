//! CSV flow integration tests: prepare, then process.
//!
//! Run with: `cargo test -p webimg-api --test csv_test`

mod helpers;

use axum::http::StatusCode;
use axum_test::multipart::MultipartForm;
use helpers::fixtures::{create_test_jpeg, create_transparent_png, csv_part};
use helpers::{folder_path, setup_test_app, TestApp};
use serde_json::{json, Value};

async fn prepare(app: &TestApp, content: &str) -> Value {
    let form = MultipartForm::new().add_part("file", csv_part(content, "products.csv"));
    let response = app.client().post("/csv/prepare").multipart(form).await;
    response.assert_status_ok();
    response.json()
}

#[tokio::test]
async fn test_prepare_lists_columns() {
    let app = setup_test_app().await;

    let body = prepare(&app, "sku,1000image,name\nS1,http://x/a.jpg,A\n").await;

    assert_eq!(body["columns"], json!(["sku", "1000image", "name"]));
    assert_eq!(body["default_column"], "1000image");
    assert_eq!(body["filename"], "products.csv");
    assert!(body["token"].as_str().unwrap().len() >= 32);
    assert_eq!(app.files_in(app.upload_root()).len(), 1);
}

#[tokio::test]
async fn test_prepare_defaults_to_first_column_when_default_absent() {
    let app = setup_test_app().await;

    let body = prepare(&app, "url,sku\nhttp://x/a.jpg,S1\n").await;

    assert_eq!(body["default_column"], "url");
}

#[tokio::test]
async fn test_prepare_without_file_is_rejected() {
    let app = setup_test_app().await;

    let form = MultipartForm::new().add_text("other", "value");
    let response = app.client().post("/csv/prepare").multipart(form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "No file provided");
}

#[tokio::test]
async fn test_prepare_empty_csv_is_rejected_and_discarded() {
    let app = setup_test_app().await;

    let form = MultipartForm::new().add_part("file", csv_part("", "empty.csv"));
    let response = app.client().post("/csv/prepare").multipart(form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(app.files_in(app.upload_root()).is_empty());
}

#[tokio::test]
async fn test_process_requires_token() {
    let app = setup_test_app().await;

    let response = app.client().post("/csv/process").json(&json!({})).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Missing upload token");
}

#[tokio::test]
async fn test_process_unknown_token() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/csv/process")
        .json(&json!({ "token": "no-such-token" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "UPLOAD_NOT_FOUND");
}

#[tokio::test]
async fn test_process_unknown_column_discards_upload() {
    let app = setup_test_app().await;
    let prepared = prepare(&app, "url\nhttp://x/a.jpg\n").await;

    let response = app
        .client()
        .post("/csv/process")
        .json(&json!({ "token": prepared["token"], "column": "1000image" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Column '1000image' not found"));
    assert!(app.files_in(app.upload_root()).is_empty());

    // Token is single-use.
    let again = app
        .client()
        .post("/csv/process")
        .json(&json!({ "token": prepared["token"], "column": "url" }))
        .await;
    again.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_process_downloads_and_converts() {
    let mut remote = mockito::Server::new_async().await;
    let _jpeg = remote
        .mock("GET", "/shoe.jpg")
        .with_status(200)
        .with_body(create_test_jpeg())
        .create_async()
        .await;
    let _png = remote
        .mock("GET", "/logo.png")
        .with_status(200)
        .with_body(create_transparent_png())
        .create_async()
        .await;
    let _missing = remote
        .mock("GET", "/gone.jpg")
        .with_status(404)
        .create_async()
        .await;

    let app = setup_test_app().await;
    let csv = format!(
        "1000image,SKU\n{base}/shoe.jpg,AB 1\n{base}/gone.jpg,AB 2\n,AB 3\n{base}/logo.png,\n",
        base = remote.url()
    );
    let prepared = prepare(&app, &csv).await;

    let response = app
        .client()
        .post("/csv/process")
        .json(&json!({
            "token": prepared["token"],
            "column": "1000image",
            "quality": "80",
            "keep_png": false,
            "enhance_filenames": "yes"
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();

    assert_eq!(body["processed"], json!(["shoe-AB-1-web.jpg", "logo-web.jpg"]));
    assert_eq!(
        body["skipped"],
        json!([format!("Download failed: {}/gone.jpg", remote.url())])
    );
    assert_eq!(body["skipped_count"], 1);
    assert_eq!(body["quality"], 80);
    assert_eq!(body["enhance_filenames"], true);
    assert_eq!(body["keep_png"], false);
    assert_eq!(body["sku_applied"], true);
    assert_eq!(body["column"], "1000image");
    assert_eq!(body["sku_column"], "SKU");
    assert_eq!(body["source"], "csv");
    assert!(body["note"].is_string());

    let folder = folder_path(&app, &body);
    assert!(folder.ends_with(body["folder_key"].as_str().unwrap()));
    assert!(body["folder_key"].as_str().unwrap().ends_with(" - Images"));
    assert_eq!(
        app.files_in(&folder),
        vec!["logo-web.jpg".to_string(), "shoe-AB-1-web.jpg".to_string()]
    );
    assert!(app.files_in(app.upload_root()).is_empty());
}

#[tokio::test]
async fn test_process_keeps_png_without_renaming() {
    let mut remote = mockito::Server::new_async().await;
    let png = create_transparent_png();
    let _png = remote
        .mock("GET", "/logo.png")
        .with_status(200)
        .with_body(png.clone())
        .create_async()
        .await;

    let app = setup_test_app().await;
    let prepared = prepare(&app, &format!("1000image\n{}/logo.png\n", remote.url())).await;

    let response = app
        .client()
        .post("/csv/process")
        .json(&json!({ "token": prepared["token"], "keep_png": "1" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["processed"], json!(["logo.png"]));
    assert_eq!(body["quality"], 95);
    assert_eq!(body["sku_applied"], false);
    assert!(body.get("sku_column").is_none());
    assert!(body.get("note").is_none());

    let folder = folder_path(&app, &body);
    assert_eq!(std::fs::read(folder.join("logo.png")).unwrap(), png);
}

#[tokio::test]
async fn test_process_with_no_urls_reports_note() {
    let app = setup_test_app().await;
    let prepared = prepare(&app, "1000image,sku\n,S1\nNaN,S2\n").await;

    let response = app
        .client()
        .post("/csv/process")
        .json(&json!({ "token": prepared["token"] }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["processed"], json!([]));
    assert_eq!(body["skipped"], json!([]));
    assert_eq!(body["note"], "No image URLs found in column '1000image'.");
}
