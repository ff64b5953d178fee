mod common;

use axum::http::StatusCode;
use chrono::Utc;
use common::{build_test_app, send_json, token_for};
use meritbook_models::{
    AcademicPeriod, ActivityId, ClassId, Registration, RegistrationId, RegistrationStatus,
    StudentId, UserId,
};
use serde_json::json;

fn pending_registration(class_id: ClassId, period: &AcademicPeriod) -> Registration {
    Registration {
        id: RegistrationId::new(),
        student_id: StudentId::new(),
        activity_id: ActivityId::new(),
        class_id,
        hoc_ky: period.hoc_ky,
        nam_hoc: period.nam_hoc.clone(),
        status: RegistrationStatus::ChoDuyet,
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn test_current_period_matches_todays_date() {
    let app = build_test_app();
    let token = token_for(&app, UserId::new(), "SINH_VIEN", app.seeded.student, None);

    let (status, body) =
        send_json(&app.router, "GET", "/api/semesters/current", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    let expected = AcademicPeriod::from_date(Utc::now().date_naive());
    assert_eq!(body["value"], expected.to_string());
    assert_eq!(body["semester_key"], expected.storage_key());
}

#[tokio::test]
async fn test_status_defaults_to_open() {
    let app = build_test_app();
    let token = token_for(&app, UserId::new(), "SINH_VIEN", app.seeded.student, None);
    let class_id = ClassId::new();

    let path = format!("/api/semesters/classes/{class_id}/status?semester=hoc_ky_1_2025");
    let (status, body) = send_json(&app.router, "GET", &path, Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "ACTIVE");
    assert_eq!(body["version"], 1);
}

#[tokio::test]
async fn test_closure_lifecycle_through_the_api() {
    let app = build_test_app();
    let admin = token_for(&app, UserId::new(), "ADMIN", app.seeded.admin, None);
    let class_id = ClassId::new();
    let body = json!({"semester": "hoc_ky_1_2025"});

    let path = format!("/api/semesters/classes/{class_id}/propose-close");
    let (status, proposed) =
        send_json(&app.router, "POST", &path, Some(&admin), Some(body.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(proposed["state"], "CLOSING");
    assert_eq!(proposed["version"], 2);

    let path = format!("/api/semesters/classes/{class_id}/soft-lock");
    let (status, soft) =
        send_json(&app.router, "POST", &path, Some(&admin), Some(body.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(soft["state"], "LOCKED_SOFT");
    assert!(soft["grace_until"].is_string());
    assert_eq!(soft["version"], 3);

    let path = format!("/api/semesters/classes/{class_id}/rollback");
    let (status, reopened) =
        send_json(&app.router, "POST", &path, Some(&admin), Some(body.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reopened["state"], "ACTIVE");

    let path = format!("/api/semesters/classes/{class_id}/hard-lock");
    let (status, hard) =
        send_json(&app.router, "POST", &path, Some(&admin), Some(body.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(hard["state"], "LOCKED_HARD");

    // hard locks are terminal
    let path = format!("/api/semesters/classes/{class_id}/propose-close");
    let (status, conflict) =
        send_json(&app.router, "POST", &path, Some(&admin), Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(conflict["code"], "ALREADY_LOCKED");
}

#[tokio::test]
async fn test_closure_requires_system_manage() {
    let app = build_test_app();
    let teacher = token_for(&app, UserId::new(), "GIANG_VIEN", app.seeded.teacher, None);
    let class_id = ClassId::new();

    let path = format!("/api/semesters/classes/{class_id}/propose-close");
    let (status, body) = send_json(
        &app.router,
        "POST",
        &path,
        Some(&teacher),
        Some(json!({"semester": "hoc_ky_1_2025"})),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["details"]["required"], "system.manage");
}

#[tokio::test]
async fn test_soft_lock_blocked_by_pending_registrations() {
    let app = build_test_app();
    let admin = token_for(&app, UserId::new(), "ADMIN", app.seeded.admin, None);
    let class_id = ClassId::new();
    let period = AcademicPeriod::parse("hoc_ky_1_2025").unwrap();

    use meritbook::modules::registrations::store::RegistrationStore;
    app.registrations
        .create(pending_registration(class_id, &period))
        .await
        .unwrap();

    let path = format!("/api/semesters/classes/{class_id}/soft-lock");
    let (status, body) = send_json(
        &app.router,
        "POST",
        &path,
        Some(&admin),
        Some(json!({"semester": "hoc_ky_1_2025"})),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CHECKLIST_PENDING_REGISTRATIONS");
}

#[tokio::test]
async fn test_check_writable_reports_block_details() {
    let app = build_test_app();
    let admin = token_for(&app, UserId::new(), "ADMIN", app.seeded.admin, None);
    let class_id = ClassId::new();

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

    // a student in the locked class sees the block with its exact reason
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
        "/api/semesters/check-writable",
        Some(&student),
        Some(json!({"hoc_ky": "hoc_ky_1", "nam_hoc": "2025"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["decision"], "BLOCK");
    assert_eq!(body["scope"]["kind"], "class");
    assert_eq!(body["state"], "LOCKED_HARD");
    assert_eq!(body["semester_key"], "HK1_2025");

    // a different period is untouched
    let (_, body) = send_json(
        &app.router,
        "POST",
        "/api/semesters/check-writable",
        Some(&student),
        Some(json!({"hoc_ky": "hoc_ky_2", "nam_hoc": "2025"})),
    )
    .await;
    assert_eq!(body["decision"], "ALLOW");

    // the override role sails through
    let (_, body) = send_json(
        &app.router,
        "POST",
        "/api/semesters/check-writable",
        Some(&admin),
        Some(json!({"class_id": class_id, "hoc_ky": "hoc_ky_1", "nam_hoc": "2025"})),
    )
    .await;
    assert_eq!(body["decision"], "ALLOW");
}

#[tokio::test]
async fn test_check_writable_rejects_range_year() {
    let app = build_test_app();
    let student = token_for(&app, UserId::new(), "SINH_VIEN", app.seeded.student, None);

    let (status, body) = send_json(
        &app.router,
        "POST",
        "/api/semesters/check-writable",
        Some(&student),
        Some(json!({"hoc_ky": "hoc_ky_1", "nam_hoc": "2024-2025"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_PERIOD_FORMAT");
}
