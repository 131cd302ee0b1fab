use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::core::security::Role;
use crate::test_support::{self, TestContext};

async fn staff_token(ctx: &TestContext, school_code: &str) -> String {
    let teacher =
        test_support::insert_teacher(ctx.state.db(), school_code, "T-1", "teacher-pass-1").await;
    test_support::bearer_token(&teacher.id, Role::Teacher, school_code, ctx.state.settings())
}

fn notice_body(school_code: &str, title: &str) -> serde_json::Value {
    json!({
        "schoolCode": school_code,
        "className": "Class 5",
        "title": title,
        "message": "Bring your lab notebooks tomorrow.",
        "noticeDate": "2026-03-14",
        "noticeTime": "09:30"
    })
}

#[tokio::test]
async fn add_notice_then_list_newest_first() {
    let ctx = test_support::setup_test_context().await;
    let token = staff_token(&ctx, "SCH500").await;

    for title in ["First notice", "Second notice"] {
        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/addNotice",
                Some(&token),
                Some(notice_body("SCH500", title)),
            ))
            .await
            .expect("add notice");
        assert_eq!(response.status(), StatusCode::CREATED);
        // Keep created_at strictly increasing so the ordering check is stable.
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, "/api/notices/SCH500", None, None))
        .await
        .expect("list notices");
    assert_eq!(response.status(), StatusCode::OK);
    let notices = test_support::read_json(response).await;
    let notices = notices.as_array().expect("array");
    assert_eq!(notices.len(), 2);
    assert_eq!(notices[0]["title"], "Second notice");
    assert_eq!(notices[1]["title"], "First notice");
    assert_eq!(notices[0]["notice_date"], "2026-03-14");
}

#[tokio::test]
async fn add_notice_requires_staff() {
    let ctx = test_support::setup_test_context().await;
    test_support::insert_student(ctx.state.db(), "SCH501", "S-1", "Class 5", "student-pass-1")
        .await;
    let token = test_support::bearer_token("S-1", Role::Student, "SCH501", ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/addNotice",
            Some(&token),
            Some(notice_body("SCH501", "Student notice")),
        ))
        .await
        .expect("student add notice");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/addNotice",
            None,
            Some(notice_body("SCH501", "Anonymous notice")),
        ))
        .await
        .expect("anonymous add notice");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn delete_notice_removes_it() {
    let ctx = test_support::setup_test_context().await;
    let token = staff_token(&ctx, "SCH502").await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/addNotice",
            Some(&token),
            Some(notice_body("SCH502", "Holiday notice")),
        ))
        .await
        .expect("add notice");
    let created = test_support::read_json(response).await;
    let id = created["id"].as_str().expect("notice id").to_string();

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::DELETE,
            &format!("/api/deleteNotice/{id}"),
            Some(&token),
            None,
        ))
        .await
        .expect("delete notice");
    assert_eq!(response.status(), StatusCode::OK);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::DELETE,
            &format!("/api/deleteNotice/{id}"),
            Some(&token),
            None,
        ))
        .await
        .expect("delete notice again");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, "/api/notices/SCH502", None, None))
        .await
        .expect("list notices");
    let notices = test_support::read_json(response).await;
    assert_eq!(notices.as_array().expect("array").len(), 0);
}
