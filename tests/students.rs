mod common;

use axum::http::StatusCode;
use common::spawn_app;
use serde_json::json;

#[tokio::test]
async fn profile_is_empty_until_saved() {
    let app = spawn_app().await;
    let (ada_id, ada) = app.student("ada@example.com", "Ada").await;

    let (status, profile) = app.get("/api/students/profile", Some(&ada)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["student_id"], ada_id);
    assert!(profile["bio"].is_null());
    assert!(profile["updated_at"].is_null());

    let (status, saved) = app
        .put(
            "/api/students/profile",
            Some(&ada),
            json!({ "bio": "Analytical engines", "skills": "rust, math" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["skills"], "rust, math");
    assert!(saved["updated_at"].is_string());

    let (_, saved) = app
        .put(
            "/api/students/profile",
            Some(&ada),
            json!({ "githubUrl": "https://github.com/ada" }),
        )
        .await;
    assert_eq!(saved["github_url"], "https://github.com/ada");

    let (_, profile) = app.get("/api/students/profile", Some(&ada)).await;
    assert_eq!(profile["github_url"], "https://github.com/ada");

    let company = app.company("hr@acme.io", "Acme").await;
    let (status, _) = app.put("/api/students/profile", Some(&company), json!({})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn companies_browse_students_with_certificates() {
    let app = spawn_app().await;
    let institute = app.institute("dean@ferris.edu", "Ferris Academy").await;
    let (ada_id, ada) = app.student("ada@example.com", "Ada Lovelace").await;
    let (alan_id, _) = app.student("alan@example.com", "Alan Turing").await;
    app.issue(&institute, "Ada Lovelace", "ada@example.com").await;

    let (status, mine) = app.get("/api/students/certificates", Some(&ada)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine.as_array().unwrap().len(), 1);

    let company = app.company("hr@acme.io", "Acme").await;
    let (status, students) = app.get("/api/students", Some(&company)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(students.as_array().unwrap().len(), 2);

    let (_, students) = app.get("/api/students?search=lovelace", Some(&company)).await;
    assert_eq!(students.as_array().unwrap().len(), 1);
    assert_eq!(students[0]["user"]["user_id"], ada_id);

    let (status, detail) = app
        .get(&format!("/api/students/{ada_id}"), Some(&company))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["certificates"].as_array().unwrap().len(), 1);

    let (status, _) = app.get("/api/students", Some(&ada)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app
        .get(&format!("/api/students/{alan_id}"), Some(&ada))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.get(&format!("/api/students/{ada_id}"), Some(&ada)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .get("/api/students/6f1c1d5e-8a7b-4c2d-9e0f-112233445566", Some(&company))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn course_lifecycle() {
    let app = spawn_app().await;
    let ferris = app.institute("dean@ferris.edu", "Ferris Academy").await;
    let crab = app.institute("dean@crab.edu", "Crab College").await;

    let (status, course) = app
        .post(
            "/api/courses",
            Some(&ferris),
            json!({ "name": "Async Rust", "duration": "6 weeks" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let uri = format!("/api/courses/{}", course["course_id"].as_str().unwrap());

    let (status, _) = app.post("/api/courses", Some(&ferris), json!({ "name": "  " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, listed) = app.get("/api/courses", None).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    let (_, listed) = app
        .get(
            &format!("/api/courses?instituteId={}", course["institute_id"].as_str().unwrap()),
            None,
        )
        .await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, _) = app.put(&uri, Some(&crab), json!({ "name": "Stolen" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, updated) = app
        .put(&uri, Some(&ferris), json!({ "name": "Async Rust II" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Async Rust II");
    assert_eq!(updated["duration"], "6 weeks");

    let (status, _) = app.delete(&uri, Some(&crab)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.delete(&uri, Some(&ferris)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get(&uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn statistics() {
    let app = spawn_app().await;
    let admin = app.admin().await;
    let institute = app.institute("dean@ferris.edu", "Ferris Academy").await;
    app.student("ada@example.com", "Ada").await;
    app.company("hr@acme.io", "Acme").await;
    app.issue(&institute, "Ada", "ada@example.com").await;
    app.issue(&institute, "Alan", "alan@example.com").await;
    app.post("/api/courses", Some(&institute), json!({ "name": "Async Rust" }))
        .await;

    let (status, stats) = app.get("/api/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["users"]["total"], 4);
    assert_eq!(stats["users"]["institutes"], 1);
    assert_eq!(stats["certificates"]["total"], 2);
    assert_eq!(stats["certificates"]["notarized"], 0);
    assert_eq!(stats["courses"], 1);

    let (status, mine) = app.get("/api/stats/institute", Some(&institute)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine["certificates_issued"], 2);
    assert_eq!(mine["courses"], 1);

    let today = chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string();
    let (status, per_day) = app
        .get(
            &format!("/api/stats/certificates?startDate=2000-01-01&endDate={today}"),
            Some(&admin),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(per_day["total"], 2);
    assert_eq!(per_day["certificates_per_day"][0]["date"], today);
    assert_eq!(per_day["certificates_per_day"][0]["count"], 2);

    let (status, _) = app
        .get(
            "/api/stats/certificates?startDate=2024-02-01&endDate=2024-01-01",
            Some(&admin),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .get(
            "/api/stats/certificates?startDate=2024-01-01&endDate=2024-02-01",
            Some(&institute),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
