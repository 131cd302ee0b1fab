use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::core::security::Role;
use crate::services::storage::UploadKind;
use crate::test_support::{self, TestContext};

const PDF_BYTES: &[u8] = b"%PDF-1.4 kidzibooks";

fn exam_meta() -> serde_json::Value {
    json!({
        "displayName": "Fractions Mid Term",
        "className": "Class 5",
        "subject": "Math",
        "chapter": "Fractions",
        "questions": [{"q": "1/2 + 1/4 = ?", "options": ["1/2", "3/4", "1/4", "1"]}],
        "answers": {"1": "3/4"}
    })
}

fn on_disk(ctx: &TestContext, kind: UploadKind, url: &str) -> std::path::PathBuf {
    ctx.state.files().dir(kind).join(url.rsplit('/').next().expect("file name"))
}

async fn staff_token(ctx: &TestContext, school_code: &str) -> String {
    let teacher =
        test_support::insert_teacher(ctx.state.db(), school_code, "T-1", "teacher-pass-1").await;
    test_support::bearer_token(&teacher.id, Role::Teacher, school_code, ctx.state.settings())
}

#[tokio::test]
async fn upload_exam_stores_file_and_lists_it() {
    let ctx = test_support::setup_test_context().await;
    let token = staff_token(&ctx, "SCH400").await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::multipart_upload_request(
            "/api/uploadExam",
            &token,
            "fractions mid term.pdf",
            PDF_BYTES,
            &exam_meta(),
        ))
        .await
        .expect("upload exam");

    let status = response.status();
    let created = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {created}");
    assert_eq!(created["display_name"], "Fractions Mid Term");

    let file_url = created["file_url"].as_str().expect("file url");
    assert!(file_url.starts_with("/exam_uploads/"));
    let path = on_disk(&ctx, UploadKind::Exam, file_url);
    let bytes = tokio::fs::read(&path).await.expect("uploaded file on disk");
    assert_eq!(bytes, PDF_BYTES);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, "/api/allExams", None, None))
        .await
        .expect("list exams");
    assert_eq!(response.status(), StatusCode::OK);
    let exams = test_support::read_json(response).await;
    let exams = exams.as_array().expect("array");
    assert_eq!(exams.len(), 1);
    assert_eq!(exams[0]["chapter"], "Fractions");
}

#[tokio::test]
async fn upload_exam_requires_auth_and_staff_role() {
    let ctx = test_support::setup_test_context().await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::POST, "/api/uploadExam", None, None))
        .await
        .expect("anonymous upload");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    test_support::insert_student(ctx.state.db(), "SCH401", "S-1", "Class 5", "student-pass-1")
        .await;
    let token = test_support::bearer_token("S-1", Role::Student, "SCH401", ctx.state.settings());
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::multipart_upload_request(
            "/api/uploadExam",
            &token,
            "test.pdf",
            PDF_BYTES,
            &exam_meta(),
        ))
        .await
        .expect("student upload");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn upload_exam_rejects_non_pdf_and_invalid_meta() {
    let ctx = test_support::setup_test_context().await;
    let token = staff_token(&ctx, "SCH402").await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::multipart_upload_request(
            "/api/uploadExam",
            &token,
            "notes.txt",
            PDF_BYTES,
            &exam_meta(),
        ))
        .await
        .expect("non-pdf upload");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let mut meta = exam_meta();
    meta["displayName"] = json!("");
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::multipart_upload_request(
            "/api/uploadExam",
            &token,
            "test.pdf",
            PDF_BYTES,
            &meta,
        ))
        .await
        .expect("blank display name upload");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = test_support::read_json(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn delete_exam_removes_row_and_file() {
    let ctx = test_support::setup_test_context().await;
    let token = staff_token(&ctx, "SCH403").await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::multipart_upload_request(
            "/api/uploadExam",
            &token,
            "to delete.pdf",
            PDF_BYTES,
            &exam_meta(),
        ))
        .await
        .expect("upload exam");
    let created = test_support::read_json(response).await;
    let id = created["id"].as_str().expect("exam id").to_string();
    let path = on_disk(&ctx, UploadKind::Exam, created["file_url"].as_str().expect("file url"));
    assert!(path.exists());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::DELETE,
            &format!("/api/deleteExam/{id}"),
            Some(&token),
            None,
        ))
        .await
        .expect("delete exam");
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!path.exists());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::DELETE,
            &format!("/api/deleteExam/{id}"),
            Some(&token),
            None,
        ))
        .await
        .expect("delete exam again");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn olympiad_upload_replaces_the_previous_exam() {
    let ctx = test_support::setup_test_context().await;
    let token = staff_token(&ctx, "SCH404").await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, "/api/currentOlympiadExam", None, None))
        .await
        .expect("current before upload");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::multipart_upload_request(
            "/api/uploadOlympiadPDF",
            &token,
            "olympiad round 1.pdf",
            PDF_BYTES,
            &json!({"displayName": "Olympiad Round 1", "questions": [], "answers": {}}),
        ))
        .await
        .expect("first olympiad upload");
    assert_eq!(response.status(), StatusCode::CREATED);
    let first = test_support::read_json(response).await;
    let first_path =
        on_disk(&ctx, UploadKind::Olympiad, first["file_url"].as_str().expect("file url"));
    assert!(first_path.exists());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::multipart_upload_request(
            "/api/uploadOlympiadPDF",
            &token,
            "olympiad round 2.pdf",
            PDF_BYTES,
            &json!({"displayName": "Olympiad Round 2", "questions": [], "answers": {}}),
        ))
        .await
        .expect("second olympiad upload");
    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(!first_path.exists());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, "/api/currentOlympiadExam", None, None))
        .await
        .expect("current after replace");
    assert_eq!(response.status(), StatusCode::OK);
    let current = test_support::read_json(response).await;
    assert_eq!(current["display_name"], "Olympiad Round 2");
}
