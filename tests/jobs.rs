mod common;

use axum::http::StatusCode;
use common::{TestApp, spawn_app};
use serde_json::{Value, json};

async fn post_job(app: &TestApp, company: &str, title: &str) -> Value {
    let (status, body) = app
        .post(
            "/api/jobs",
            Some(company),
            json!({
                "title": title,
                "description": "Build verification pipelines",
                "location": "Remote",
                "employmentType": "full-time",
                "requiredSkills": "rust, tokio",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

#[tokio::test]
async fn companies_post_and_students_browse() {
    let app = spawn_app().await;
    let company = app.company("hr@acme.io", "Acme").await;
    let job = post_job(&app, &company, "Backend Engineer").await;
    assert_eq!(job["company_name"], "Acme");
    assert_eq!(job["status"], "open");

    let (_, student) = app.student("ada@example.com", "Ada").await;
    let (status, _) = app
        .post(
            "/api/jobs",
            Some(&student),
            json!({ "title": "Nope", "description": "Nope" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, jobs) = app.get("/api/jobs", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(jobs.as_array().unwrap().len(), 1);

    let (_, jobs) = app.get("/api/jobs?search=backend", None).await;
    assert_eq!(jobs.as_array().unwrap().len(), 1);
    let (_, jobs) = app.get("/api/jobs?search=frontend", None).await;
    assert!(jobs.as_array().unwrap().is_empty());

    let (status, mine) = app.get("/api/jobs/mine", Some(&company)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine.as_array().unwrap().len(), 1);

    let id = job["job_id"].as_str().unwrap();
    let (status, body) = app.get(&format!("/api/jobs/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Backend Engineer");
}

#[tokio::test]
async fn only_owner_edits_posting() {
    let app = spawn_app().await;
    let acme = app.company("hr@acme.io", "Acme").await;
    let globex = app.company("hr@globex.io", "Globex").await;
    let job = post_job(&app, &acme, "Backend Engineer").await;
    let uri = format!("/api/jobs/{}", job["job_id"].as_str().unwrap());

    let (status, _) = app.put(&uri, Some(&globex), json!({ "title": "Mine now" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .put(&uri, Some(&acme), json!({ "title": "Senior Backend Engineer", "status": "closed" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Senior Backend Engineer");
    assert_eq!(body["status"], "closed");

    let (_, open) = app.get("/api/jobs", None).await;
    assert!(open.as_array().unwrap().is_empty());
    let (_, closed) = app.get("/api/jobs?status=closed", None).await;
    assert_eq!(closed.as_array().unwrap().len(), 1);

    let (status, _) = app.delete(&uri, Some(&globex)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.delete(&uri, Some(&acme)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get(&uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn application_rules() {
    let app = spawn_app().await;
    let company = app.company("hr@acme.io", "Acme").await;
    let institute = app.institute("dean@ferris.edu", "Ferris Academy").await;
    let (_, ada) = app.student("ada@example.com", "Ada").await;
    let (_, alan) = app.student("alan@example.com", "Alan").await;

    let ada_cert = app.issue(&institute, "Ada", "ada@example.com").await;
    let alan_cert = app.issue(&institute, "Alan", "alan@example.com").await;

    let job = post_job(&app, &company, "Backend Engineer").await;
    let apply_uri = format!("/api/jobs/{}/apply", job["job_id"].as_str().unwrap());

    let (status, _) = app
        .post(&apply_uri, Some(&ada), json!({ "certificateIds": [alan_cert["certificate_id"]] }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, application) = app
        .post(
            &apply_uri,
            Some(&ada),
            json!({ "coverLetter": "Hire me", "certificateIds": [ada_cert["certificate_id"]] }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(application["status"], "pending");
    assert_eq!(application["job_title"], "Backend Engineer");

    let (status, _) = app.post(&apply_uri, Some(&ada), json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app.post(&apply_uri, Some(&company), json!({})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, received) = app
        .get(
            &format!("/api/jobs/{}/applications", job["job_id"].as_str().unwrap()),
            Some(&company),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let received = received.as_array().unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0]["student"]["email"], "ada@example.com");
    assert_eq!(
        received[0]["certificates"][0]["certificate_hash"],
        ada_cert["certificate_hash"]
    );

    app.put(
        &format!("/api/jobs/{}", job["job_id"].as_str().unwrap()),
        Some(&company),
        json!({ "status": "closed" }),
    )
    .await;
    let (status, _) = app.post(&apply_uri, Some(&alan), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn review_pipeline_and_offer() {
    let app = spawn_app().await;
    let company = app.company("hr@acme.io", "Acme").await;
    let (_, ada) = app.student("ada@example.com", "Ada").await;
    let job = post_job(&app, &company, "Backend Engineer").await;

    let (_, application) = app
        .post(
            &format!("/api/jobs/{}/apply", job["job_id"].as_str().unwrap()),
            Some(&ada),
            json!({}),
        )
        .await;
    let application_id = application["application_id"].as_str().unwrap();
    let status_uri = format!("/api/jobs/applications/{application_id}/status");
    let offer_uri = format!("/api/jobs/applications/{application_id}/offer");
    let offer = json!({ "salary": "120000 USD", "startDate": "2025-01-06", "message": "Welcome" });

    let (status, _) = app.post(&offer_uri, Some(&company), offer.clone()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .put(&status_uri, Some(&company), json!({ "status": "accepted" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .put(&status_uri, Some(&company), json!({ "status": "shortlisted" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "shortlisted");

    let (status, _) = app
        .delete(&format!("/api/jobs/applications/{application_id}"), Some(&ada))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, created) = app.post(&offer_uri, Some(&company), offer.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "pending");
    let (status, _) = app.post(&offer_uri, Some(&company), offer).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, offers) = app.get("/api/jobs/offers/mine", Some(&ada)).await;
    assert_eq!(offers.as_array().unwrap().len(), 1);
    assert_eq!(offers[0]["job_title"], "Backend Engineer");

    let respond_uri = format!(
        "/api/jobs/offers/{}/respond",
        created["offer_id"].as_str().unwrap()
    );
    let (status, _) = app.put(&respond_uri, Some(&company), json!({ "accept": true })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, answered) = app.put(&respond_uri, Some(&ada), json!({ "accept": true })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(answered["status"], "accepted");

    let (status, _) = app.put(&respond_uri, Some(&ada), json!({ "accept": false })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, mine) = app.get("/api/jobs/applications/mine", Some(&ada)).await;
    assert_eq!(mine[0]["status"], "accepted");

    let (_, sent) = app.get("/api/jobs/offers/mine", Some(&company)).await;
    assert_eq!(sent[0]["status"], "accepted");
}

#[tokio::test]
async fn offer_cannot_revive_rejected_application() {
    let app = spawn_app().await;
    let company = app.company("hr@acme.io", "Acme").await;
    let (_, ada) = app.student("ada@example.com", "Ada").await;
    let job = post_job(&app, &company, "Backend Engineer").await;

    let (_, application) = app
        .post(
            &format!("/api/jobs/{}/apply", job["job_id"].as_str().unwrap()),
            Some(&ada),
            json!({}),
        )
        .await;
    let application_id = application["application_id"].as_str().unwrap();
    let status_uri = format!("/api/jobs/applications/{application_id}/status");

    app.put(&status_uri, Some(&company), json!({ "status": "shortlisted" }))
        .await;
    let (status, offer) = app
        .post(
            &format!("/api/jobs/applications/{application_id}/offer"),
            Some(&company),
            json!({ "salary": "120000 USD" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .put(&status_uri, Some(&company), json!({ "status": "rejected" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "rejected");

    let respond_uri = format!(
        "/api/jobs/offers/{}/respond",
        offer["offer_id"].as_str().unwrap()
    );
    let (status, _) = app.put(&respond_uri, Some(&ada), json!({ "accept": true })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, mine) = app.get("/api/jobs/applications/mine", Some(&ada)).await;
    assert_eq!(mine[0]["status"], "rejected");

    let (status, declined) = app.put(&respond_uri, Some(&ada), json!({ "accept": false })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(declined["status"], "declined");
}

#[tokio::test]
async fn pending_application_can_be_withdrawn() {
    let app = spawn_app().await;
    let company = app.company("hr@acme.io", "Acme").await;
    let (_, ada) = app.student("ada@example.com", "Ada").await;
    let (_, alan) = app.student("alan@example.com", "Alan").await;
    let job = post_job(&app, &company, "Backend Engineer").await;

    let (_, application) = app
        .post(
            &format!("/api/jobs/{}/apply", job["job_id"].as_str().unwrap()),
            Some(&ada),
            json!({}),
        )
        .await;
    let uri = format!(
        "/api/jobs/applications/{}",
        application["application_id"].as_str().unwrap()
    );

    let (status, _) = app.delete(&uri, Some(&alan)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.delete(&uri, Some(&ada)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, mine) = app.get("/api/jobs/applications/mine", Some(&ada)).await;
    assert!(mine.as_array().unwrap().is_empty());
}
