mod common;

use axum::http::StatusCode;
use common::{build_test_app, send_json, token_for};
use meritbook_models::{ActivityId, ClassId, UserId};
use serde_json::json;

fn registration_body(activity_id: ActivityId) -> serde_json::Value {
    json!({
        "activity_id": activity_id,
        "hoc_ky": "hoc_ky_1",
        "nam_hoc": "2025",
    })
}

#[tokio::test]
async fn test_student_registers_into_open_period() {
    let app = build_test_app();
    let class_id = ClassId::new();
    let token = token_for(
        &app,
        UserId::new(),
        "SINH_VIEN",
        app.seeded.student,
        Some(class_id),
    );

    let (status, body) = send_json(
        &app.router,
        "POST",
        "/api/registrations",
        Some(&token),
        Some(registration_body(ActivityId::new())),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["registration"]["status"], "cho_duyet");
    assert_eq!(body["registration"]["class_id"], json!(class_id));
    assert_eq!(body["registration"]["nam_hoc"], "2025");
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    let app = build_test_app();
    let user_id = UserId::new();
    let token = token_for(
        &app,
        user_id,
        "SINH_VIEN",
        app.seeded.student,
        Some(ClassId::new()),
    );
    let activity_id = ActivityId::new();

    let (status, _) = send_json(
        &app.router,
        "POST",
        "/api/registrations",
        Some(&token),
        Some(registration_body(activity_id)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send_json(
        &app.router,
        "POST",
        "/api/registrations",
        Some(&token),
        Some(registration_body(activity_id)),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "ALREADY_REGISTERED");
}

#[tokio::test]
async fn test_registration_blocked_by_class_lock() {
    let app = build_test_app();
    let class_id = ClassId::new();

    let admin = token_for(&app, UserId::new(), "ADMIN", app.seeded.admin, None);
    let path = format!("/api/semesters/classes/{class_id}/hard-lock");
    let (status, _) = send_json(
        &app.router,
        "POST",
        &path,
        Some(&admin),
        Some(json!({"semester": "hoc_ky_1_2025"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let student = token_for(
        &app,
        UserId::new(),
        "SINH_VIEN",
        app.seeded.student,
        Some(class_id),
    );
    let (status, body) = send_json(
        &app.router,
        "POST",
        "/api/registrations",
        Some(&student),
        Some(registration_body(ActivityId::new())),
    )
    .await;

    assert_eq!(status, StatusCode::LOCKED);
    assert_eq!(body["code"], "PERIOD_LOCKED");
    assert_eq!(body["details"]["scope"]["kind"], "class");
    assert_eq!(body["details"]["scope"]["class_id"], json!(class_id));
    assert_eq!(body["details"]["state"], "LOCKED_HARD");

    // students in other classes are untouched by the class lock
    let other = token_for(
        &app,
        UserId::new(),
        "SINH_VIEN",
        app.seeded.student,
        Some(ClassId::new()),
    );
    let (status, _) = send_json(
        &app.router,
        "POST",
        "/api/registrations",
        Some(&other),
        Some(registration_body(ActivityId::new())),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_override_role_writes_into_locked_period() {
    let app = build_test_app();
    let class_id = ClassId::new();
    let admin = token_for(&app, UserId::new(), "ADMIN", app.seeded.admin, None);

    let path = format!("/api/semesters/classes/{class_id}/hard-lock");
    send_json(
        &app.router,
        "POST",
        &path,
        Some(&admin),
        Some(json!({"semester": "hoc_ky_1_2025"})),
    )
    .await;

    let mut body = registration_body(ActivityId::new());
    body["class_id"] = json!(class_id);
    let (status, _) = send_json(
        &app.router,
        "POST",
        "/api/registrations",
        Some(&admin),
        Some(body),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_teacher_lacks_registrations_write() {
    let app = build_test_app();
    let teacher = token_for(
        &app,
        UserId::new(),
        "GIANG_VIEN",
        app.seeded.teacher,
        None,
    );

    let (status, body) = send_json(
        &app.router,
        "POST",
        "/api/registrations",
        Some(&teacher),
        Some(registration_body(ActivityId::new())),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["details"]["required"], "registrations.write");
}

#[tokio::test]
async fn test_registration_rejects_range_year() {
    let app = build_test_app();
    let token = token_for(
        &app,
        UserId::new(),
        "SINH_VIEN",
        app.seeded.student,
        Some(ClassId::new()),
    );

    let (status, body) = send_json(
        &app.router,
        "POST",
        "/api/registrations",
        Some(&token),
        Some(json!({
            "activity_id": ActivityId::new(),
            "hoc_ky": "hoc_ky_1",
            "nam_hoc": "2024-2025",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_PERIOD_FORMAT");
}

#[tokio::test]
async fn test_cancel_own_registration_only() {
    let app = build_test_app();
    let class_id = ClassId::new();
    let owner_id = UserId::new();
    let owner = token_for(&app, owner_id, "SINH_VIEN", app.seeded.student, Some(class_id));

    let (status, created) = send_json(
        &app.router,
        "POST",
        "/api/registrations",
        Some(&owner),
        Some(registration_body(ActivityId::new())),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let registration_id = created["registration"]["id"].as_str().unwrap().to_string();

    // someone else cannot cancel it
    let stranger = token_for(
        &app,
        UserId::new(),
        "SINH_VIEN",
        app.seeded.student,
        Some(class_id),
    );
    let path = format!("/api/registrations/{registration_id}");
    let (status, _) = send_json(&app.router, "DELETE", &path, Some(&stranger), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // the owner can
    let (status, body) = send_json(&app.router, "DELETE", &path, Some(&owner), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["registration"]["status"], "da_huy");

    // and it shows up in their own listing
    let (status, mine) = send_json(
        &app.router,
        "GET",
        "/api/registrations/mine",
        Some(&owner),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine.as_array().unwrap().len(), 1);
    assert_eq!(mine[0]["status"], "da_huy");
}

#[tokio::test]
async fn test_cancellation_is_also_period_gated() {
    let app = build_test_app();
    let class_id = ClassId::new();
    let owner = token_for(
        &app,
        UserId::new(),
        "SINH_VIEN",
        app.seeded.student,
        Some(class_id),
    );

    let (_, created) = send_json(
        &app.router,
        "POST",
        "/api/registrations",
        Some(&owner),
        Some(registration_body(ActivityId::new())),
    )
    .await;
    let registration_id = created["registration"]["id"].as_str().unwrap().to_string();

    // lock the period after the registration was made
    let admin = token_for(&app, UserId::new(), "ADMIN", app.seeded.admin, None);
    let path = format!("/api/semesters/classes/{class_id}/hard-lock");
    send_json(
        &app.router,
        "POST",
        &path,
        Some(&admin),
        Some(json!({"semester": "hoc_ky_1_2025"})),
    )
    .await;

    let path = format!("/api/registrations/{registration_id}");
    let (status, body) = send_json(&app.router, "DELETE", &path, Some(&owner), None).await;
    assert_eq!(status, StatusCode::LOCKED);
    assert_eq!(body["code"], "PERIOD_LOCKED");
}
