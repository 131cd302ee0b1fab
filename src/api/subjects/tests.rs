use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

use crate::core::security::Role;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::services::storage::UploadKind;
use crate::test_support;

async fn seed_exam(
    ctx: &test_support::TestContext,
    class_name: &str,
    subject: &str,
    chapter: &str,
) -> crate::db::models::Exam {
    let stored = ctx
        .state
        .files()
        .save_pdf(UploadKind::Exam, "seed.pdf", b"%PDF-1.4 seed")
        .await
        .expect("store pdf");

    repositories::exams::create(
        ctx.state.db(),
        repositories::exams::CreateExam {
            id: &Uuid::new_v4().to_string(),
            display_name: "Seed Exam",
            file_url: &stored.url,
            class_name,
            subject,
            chapter,
            questions: json!([]),
            answers: json!({}),
            created_at: primitive_now_utc(),
        },
    )
    .await
    .expect("insert exam")
}

#[tokio::test]
async fn add_subject_chapter_upserts_and_dedupes() {
    let ctx = test_support::setup_test_context().await;
    let teacher = test_support::insert_teacher(ctx.state.db(), "SCH200", "T-1", "teacher-pass-1")
        .await;
    let token = test_support::bearer_token(&teacher.id, Role::Teacher, "SCH200", ctx.state.settings());

    let body = json!({
        "schoolCode": "SCH200",
        "className": "Class 5",
        "subject": "Math",
        "chapter": "Fractions"
    });

    for _ in 0..2 {
        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/addSubjectChapter",
                Some(&token),
                Some(body.clone()),
            ))
            .await
            .expect("add chapter");
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/addSubjectChapter",
            Some(&token),
            Some(json!({
                "schoolCode": "SCH200",
                "className": "Class 5",
                "subject": "Math",
                "chapter": "Decimals"
            })),
        ))
        .await
        .expect("add second chapter");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/subjects/SCH200/Class%205",
            None,
            None,
        ))
        .await
        .expect("list subjects");
    assert_eq!(response.status(), StatusCode::OK);
    let subjects = test_support::read_json(response).await;
    assert_eq!(subjects.as_array().expect("array").len(), 1);
    assert_eq!(subjects[0]["chapters"], json!(["Fractions", "Decimals"]));
}

#[tokio::test]
async fn add_subject_chapter_requires_staff() {
    let ctx = test_support::setup_test_context().await;
    let student =
        test_support::insert_student(ctx.state.db(), "SCH201", "S-1", "Class 5", "student-pass-1")
            .await;
    let token = test_support::bearer_token(&student.id, Role::Student, "SCH201", ctx.state.settings());

    let body = json!({
        "schoolCode": "SCH201",
        "className": "Class 5",
        "subject": "Math",
        "chapter": "Fractions"
    });

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/addSubjectChapter",
            Some(&token),
            Some(body.clone()),
        ))
        .await
        .expect("student add chapter");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/addSubjectChapter",
            None,
            Some(body),
        ))
        .await
        .expect("anonymous add chapter");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn delete_subject_removes_matching_exams() {
    let ctx = test_support::setup_test_context().await;
    let teacher = test_support::insert_teacher(ctx.state.db(), "SCH202", "T-1", "teacher-pass-1")
        .await;
    let token = test_support::bearer_token(&teacher.id, Role::Teacher, "SCH202", ctx.state.settings());

    repositories::subjects::create(
        ctx.state.db(),
        repositories::subjects::CreateSubject {
            id: &Uuid::new_v4().to_string(),
            school_code: "SCH202",
            class_name: "Class 5",
            subject: "Math",
            chapters: vec!["Fractions".to_string()],
            created_at: primitive_now_utc(),
            updated_at: primitive_now_utc(),
        },
    )
    .await
    .expect("insert subject");

    let exam = seed_exam(&ctx, "Class 5", "Math", "Fractions").await;
    let unrelated = seed_exam(&ctx, "Class 5", "Science", "Plants").await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::DELETE,
            "/api/deleteSubject/SCH202/Class%205/Math",
            Some(&token),
            None,
        ))
        .await
        .expect("delete subject");
    assert_eq!(response.status(), StatusCode::OK);

    let gone = repositories::exams::find_by_id(ctx.state.db(), &exam.id).await.expect("find exam");
    assert!(gone.is_none());
    let kept = repositories::exams::find_by_id(ctx.state.db(), &unrelated.id)
        .await
        .expect("find unrelated exam");
    assert!(kept.is_some());
}

#[tokio::test]
async fn delete_chapter_removes_only_matching_exams() {
    let ctx = test_support::setup_test_context().await;
    let teacher = test_support::insert_teacher(ctx.state.db(), "SCH203", "T-1", "teacher-pass-1")
        .await;
    let token = test_support::bearer_token(&teacher.id, Role::Teacher, "SCH203", ctx.state.settings());

    repositories::subjects::create(
        ctx.state.db(),
        repositories::subjects::CreateSubject {
            id: &Uuid::new_v4().to_string(),
            school_code: "SCH203",
            class_name: "Class 5",
            subject: "Math",
            chapters: vec!["Fractions".to_string(), "Decimals".to_string()],
            created_at: primitive_now_utc(),
            updated_at: primitive_now_utc(),
        },
    )
    .await
    .expect("insert subject");

    let fractions = seed_exam(&ctx, "Class 5", "Math", "Fractions").await;
    let decimals = seed_exam(&ctx, "Class 5", "Math", "Decimals").await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::DELETE,
            "/api/deleteChapter",
            Some(&token),
            Some(json!({
                "schoolCode": "SCH203",
                "className": "Class 5",
                "subject": "Math",
                "chapter": "Fractions"
            })),
        ))
        .await
        .expect("delete chapter");
    assert_eq!(response.status(), StatusCode::OK);

    let subject =
        repositories::subjects::find_by_key(ctx.state.db(), "SCH203", "Class 5", "Math")
            .await
            .expect("find subject")
            .expect("subject exists");
    assert_eq!(subject.chapters.0, vec!["Decimals".to_string()]);

    let gone =
        repositories::exams::find_by_id(ctx.state.db(), &fractions.id).await.expect("find exam");
    assert!(gone.is_none());
    let kept =
        repositories::exams::find_by_id(ctx.state.db(), &decimals.id).await.expect("find exam");
    assert!(kept.is_some());
}
