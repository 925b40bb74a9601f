//! Lesson and document management integration tests.
//!
//! Run with: `cargo test -p lectern-api --test admin_test`

mod helpers;

use axum::http::StatusCode;
use axum_test::multipart::MultipartForm;
use helpers::fixtures::minimal_pdf;
use helpers::{admin_path, api_path, create_lesson, pdf_part, setup_test_app};

#[tokio::test]
async fn test_create_lesson_derives_video_id_and_thumbnail() {
    let app = setup_test_app().await;

    let lesson = create_lesson(
        app.client(),
        "Limits",
        "Calculus",
        1,
        MultipartForm::new()
            .add_part("notes_pdf", pdf_part(&minimal_pdf("n"), "n.pdf"))
            .add_part(
                "annotated_practice_set_pdf",
                pdf_part(&minimal_pdf("a"), "a.pdf"),
            ),
    )
    .await;

    assert_eq!(lesson["video_id"], "dQw4w9WgXcQ");
    assert_eq!(
        lesson["thumbnail_url"],
        "https://img.youtube.com/vi/dQw4w9WgXcQ/hqdefault.jpg"
    );
    let documents = lesson["documents"].as_array().unwrap();
    assert_eq!(documents.len(), 2);
    assert_eq!(documents[0]["title"], "Limits - Notes");
    assert_eq!(documents[0]["display_order"], 1);
    assert_eq!(documents[1]["title"], "Limits - Annotated Practice Set");
    assert_eq!(documents[1]["display_order"], 2);
    assert_eq!(app.blob_count(), 2);
}

#[tokio::test]
async fn test_create_lesson_rejects_unsupported_link() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post(&admin_path("/lessons"))
        .multipart(
            MultipartForm::new()
                .add_text("video_url", "https://vimeo.com/12345")
                .add_text("title", "Limits")
                .add_text("section", "Calculus"),
        )
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let sections = app.client().get(&api_path("/sections")).await;
    assert_eq!(sections.json::<serde_json::Value>(), serde_json::json!([]));
}

#[tokio::test]
async fn test_create_lesson_validates_title_length() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post(&admin_path("/lessons"))
        .multipart(
            MultipartForm::new()
                .add_text("video_url", "dQw4w9WgXcQ")
                .add_text("title", "t".repeat(201))
                .add_text("section", "Calculus"),
        )
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<serde_json::Value>()["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_duplicate_document_type_conflicts_and_keeps_first_blob() {
    let app = setup_test_app().await;
    let client = app.client();
    let lesson = create_lesson(
        client,
        "Limits",
        "Calculus",
        1,
        MultipartForm::new().add_part("notes_pdf", pdf_part(&minimal_pdf("first"), "n.pdf")),
    )
    .await;
    let lesson_id = lesson["id"].as_i64().unwrap();

    let response = client
        .post(&admin_path(&format!("/lessons/{}/documents", lesson_id)))
        .multipart(
            MultipartForm::new()
                .add_text("title", "More notes")
                .add_text("document_type", "Notes")
                .add_text("display_order", "5")
                .add_part("file", pdf_part(&minimal_pdf("second"), "n2.pdf")),
        )
        .await;

    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(
        response.json::<serde_json::Value>()["error"],
        "A PDF with type 'Notes' already exists for this video. Please use the update endpoint to modify it."
    );
    assert_eq!(app.blob_count(), 1);
}

#[tokio::test]
async fn test_add_update_delete_document() {
    let app = setup_test_app().await;
    let client = app.client();
    let lesson = create_lesson(client, "Limits", "Calculus", 1, MultipartForm::new()).await;
    let lesson_id = lesson["id"].as_i64().unwrap();

    let added = client
        .post(&admin_path(&format!("/lessons/{}/documents", lesson_id)))
        .multipart(
            MultipartForm::new()
                .add_text("title", "Worksheet")
                .add_text("document_type", "Worksheet")
                .add_text("display_order", "4")
                .add_part("file", pdf_part(&minimal_pdf("w"), "w.pdf")),
        )
        .await;
    added.assert_status(StatusCode::CREATED);
    let document = added.json::<serde_json::Value>();
    let document_id = document["id"].as_i64().unwrap();
    let first_address = document["file_url"].as_str().unwrap().to_string();
    assert_eq!(app.blob_count(), 1);

    let updated = client
        .put(&admin_path(&format!(
            "/lessons/{}/documents/{}",
            lesson_id, document_id
        )))
        .multipart(
            MultipartForm::new()
                .add_text("title", "")
                .add_text("display_order", "2")
                .add_part("file", pdf_part(&minimal_pdf("w2"), "w2.pdf")),
        )
        .await;
    updated.assert_status_ok();
    let updated = updated.json::<serde_json::Value>();
    assert_eq!(updated["title"], "Worksheet");
    assert_eq!(updated["display_order"], 2);
    assert_ne!(updated["file_url"].as_str().unwrap(), first_address);
    assert_eq!(app.blob_count(), 1);

    let deleted = client
        .delete(&admin_path(&format!(
            "/lessons/{}/documents/{}",
            lesson_id, document_id
        )))
        .await;
    deleted.assert_status(StatusCode::NO_CONTENT);
    assert_eq!(app.blob_count(), 0);

    let again = client
        .delete(&admin_path(&format!(
            "/lessons/{}/documents/{}",
            lesson_id, document_id
        )))
        .await;
    again.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(again.json::<serde_json::Value>()["error"], "PDF not found");
}

#[tokio::test]
async fn test_add_document_to_missing_lesson() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post(&admin_path("/lessons/999/documents"))
        .multipart(
            MultipartForm::new()
                .add_text("title", "Worksheet")
                .add_text("document_type", "Worksheet")
                .add_text("display_order", "1")
                .add_part("file", pdf_part(&minimal_pdf("w"), "w.pdf")),
        )
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<serde_json::Value>()["error"], "Video not found");
    assert_eq!(app.blob_count(), 0);
}

#[tokio::test]
async fn test_add_document_requires_file() {
    let app = setup_test_app().await;
    let client = app.client();
    let lesson = create_lesson(client, "Limits", "Calculus", 1, MultipartForm::new()).await;

    let response = client
        .post(&admin_path(&format!(
            "/lessons/{}/documents",
            lesson["id"].as_i64().unwrap()
        )))
        .multipart(
            MultipartForm::new()
                .add_text("title", "Worksheet")
                .add_text("document_type", "Worksheet")
                .add_text("display_order", "1")
                .add_part("file", pdf_part(b"", "empty.pdf")),
        )
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_lesson_cascades_to_documents_and_blobs() {
    let app = setup_test_app().await;
    let client = app.client();
    let lesson = create_lesson(
        client,
        "Limits",
        "Calculus",
        1,
        MultipartForm::new()
            .add_part("notes_pdf", pdf_part(&minimal_pdf("n"), "n.pdf"))
            .add_part("solved_practice_set_pdf", pdf_part(&minimal_pdf("s"), "s.pdf")),
    )
    .await;
    assert_eq!(app.blob_count(), 2);

    let response = client
        .delete(&admin_path(&format!(
            "/lessons/{}",
            lesson["id"].as_i64().unwrap()
        )))
        .await;

    response.assert_status(StatusCode::NO_CONTENT);
    assert_eq!(app.blob_count(), 0);
    let sections = client.get(&api_path("/sections")).await;
    assert_eq!(sections.json::<serde_json::Value>(), serde_json::json!([]));

    client
        .delete(&admin_path(&format!(
            "/lessons/{}",
            lesson["id"].as_i64().unwrap()
        )))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
