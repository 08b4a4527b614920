use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use uuid::Uuid;

use super::dto::{
    ApplicationResponse, ApplyRequest, CreateJobRequest, CreateOfferRequest, JobListQuery,
    JobResponse, OfferResponse, RespondOfferRequest, UpdateApplicationStatusRequest,
    UpdateJobRequest,
};
use crate::entities::sea_orm_active_enums::{ApplicationStatus, JobStatus, OfferStatus, RoleEnum};
use crate::entities::{job_application, job_offer, job_posting};
use crate::error::{ApiError, ApiResult};
use crate::extractor::AuthClaims;
use crate::middleware::permission;
use crate::repositories::{
    ApplicationRepository, CertificateRepository, JobRepository, JobUpdate, NewJobPosting,
    NewOffer, OfferRepository, UserRepository,
};
use crate::routes::auth::dto::MessageResponse;
use crate::routes::{non_empty, parse_id};
use crate::state::AppState;

pub fn create_route() -> Router<AppState> {
    Router::new()
        .route("/api/jobs", get(list_jobs).post(create_job))
        .route("/api/jobs/mine", get(list_my_jobs))
        .route(
            "/api/jobs/{id}",
            get(get_job).put(update_job).delete(delete_job),
        )
        .route("/api/jobs/{id}/apply", post(apply))
        .route("/api/jobs/{id}/applications", get(list_job_applications))
        .route("/api/jobs/applications/mine", get(list_my_applications))
        .route(
            "/api/jobs/applications/{id}/status",
            put(update_application_status),
        )
        .route("/api/jobs/applications/{id}", delete(withdraw_application))
        .route("/api/jobs/applications/{id}/offer", post(create_offer))
        .route("/api/jobs/offers/mine", get(list_my_offers))
        .route("/api/jobs/offers/{id}/respond", put(respond_to_offer))
}

async fn find_job(state: &AppState, id: &str) -> ApiResult<job_posting::Model> {
    let job_id = parse_id(id, "Job")?;
    JobRepository::new(&state.db)
        .find_by_id(job_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Job not found".to_string()))
}

async fn find_application(state: &AppState, id: &str) -> ApiResult<job_application::Model> {
    let application_id = parse_id(id, "Application")?;
    ApplicationRepository::new(&state.db)
        .find_by_id(application_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Application not found".to_string()))
}

/// Loads the posting and checks that the caller is the company that owns it.
async fn owned_job(state: &AppState, company_id: Uuid, job_id: Uuid) -> ApiResult<job_posting::Model> {
    let job = JobRepository::new(&state.db)
        .find_by_id(job_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Job not found".to_string()))?;
    if job.company_id != company_id {
        return Err(ApiError::forbidden());
    }
    Ok(job)
}

async fn company_names(state: &AppState, jobs: &[job_posting::Model]) -> ApiResult<HashMap<Uuid, String>> {
    let ids = jobs.iter().map(|j| j.company_id).collect();
    let names = UserRepository::new(&state.db)
        .find_by_ids(ids)
        .await?
        .into_iter()
        .map(|u| (u.user_id, u.display_organization().to_string()))
        .collect();
    Ok(names)
}

async fn with_company_names(state: &AppState, jobs: Vec<job_posting::Model>) -> ApiResult<Vec<JobResponse>> {
    let names = company_names(state, &jobs).await?;
    Ok(jobs
        .into_iter()
        .map(|job| {
            let name = names.get(&job.company_id).cloned();
            JobResponse::new(job, name)
        })
        .collect())
}

async fn job_titles(state: &AppState, job_ids: Vec<Uuid>) -> ApiResult<HashMap<Uuid, String>> {
    let titles = JobRepository::new(&state.db)
        .find_by_ids(job_ids)
        .await?
        .into_iter()
        .map(|j| (j.job_id, j.title))
        .collect();
    Ok(titles)
}

/// Browse postings
#[utoipa::path(
    get,
    path = "/api/jobs",
    params(JobListQuery),
    responses((status = 200, description = "Job postings", body = Vec<JobResponse>)),
    tag = "Jobs"
)]
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobListQuery>,
) -> ApiResult<Json<Vec<JobResponse>>> {
    let jobs = JobRepository::new(&state.db)
        .find_all(
            Some(query.status.unwrap_or(JobStatus::Open)),
            query.search.as_deref(),
        )
        .await?;
    Ok(Json(with_company_names(&state, jobs).await?))
}

#[utoipa::path(
    get,
    path = "/api/jobs/{id}",
    params(("id" = String, Path, description = "Job id")),
    responses(
        (status = 200, description = "Job posting", body = JobResponse),
        (status = 404, description = "Job not found")
    ),
    tag = "Jobs"
)]
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<JobResponse>> {
    let job = find_job(&state, &id).await?;
    let mut jobs = with_company_names(&state, vec![job]).await?;
    jobs.pop()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Job not found".to_string()))
}

/// Postings owned by the calling company
#[utoipa::path(
    get,
    path = "/api/jobs/mine",
    responses(
        (status = 200, description = "Own postings", body = Vec<JobResponse>),
        (status = 403, description = "Companies only")
    ),
    security(("bearer_auth" = [])),
    tag = "Jobs"
)]
pub async fn list_my_jobs(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
) -> ApiResult<Json<Vec<JobResponse>>> {
    permission::require_role(&claims, &[RoleEnum::Company])?;
    let company_id = permission::caller_id(&claims)?;
    let jobs = JobRepository::new(&state.db)
        .find_by_company(company_id)
        .await?;
    Ok(Json(with_company_names(&state, jobs).await?))
}

#[utoipa::path(
    post,
    path = "/api/jobs",
    request_body = CreateJobRequest,
    responses(
        (status = 201, description = "Posting created", body = JobResponse),
        (status = 400, description = "Title or description missing"),
        (status = 403, description = "Caller is not an approved company")
    ),
    security(("bearer_auth" = [])),
    tag = "Jobs"
)]
pub async fn create_job(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Json(payload): Json<CreateJobRequest>,
) -> ApiResult<(StatusCode, Json<JobResponse>)> {
    let company = permission::verified_user(&state, &claims, &[RoleEnum::Company]).await?;

    let title = payload.title.trim().to_string();
    let description = payload.description.trim().to_string();
    if title.is_empty() || description.is_empty() {
        return Err(ApiError::BadRequest(
            "Title and description are required".to_string(),
        ));
    }

    let job = JobRepository::new(&state.db)
        .create(NewJobPosting {
            company_id: company.user_id,
            title,
            description,
            location: non_empty(payload.location),
            employment_type: non_empty(payload.employment_type),
            salary_range: non_empty(payload.salary_range),
            required_skills: non_empty(payload.required_skills),
        })
        .await?;

    tracing::info!(job_id = %job.job_id, company_id = %company.user_id, "Job posted");
    let company_name = Some(company.display_organization().to_string());
    Ok((StatusCode::CREATED, Json(JobResponse::new(job, company_name))))
}

#[utoipa::path(
    put,
    path = "/api/jobs/{id}",
    params(("id" = String, Path, description = "Job id")),
    request_body = UpdateJobRequest,
    responses(
        (status = 200, description = "Posting updated", body = JobResponse),
        (status = 403, description = "Not the owning company"),
        (status = 404, description = "Job not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Jobs"
)]
pub async fn update_job(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path(id): Path<String>,
    Json(payload): Json<UpdateJobRequest>,
) -> ApiResult<Json<JobResponse>> {
    let company = permission::verified_user(&state, &claims, &[RoleEnum::Company]).await?;
    let job_id = parse_id(&id, "Job")?;
    let job = owned_job(&state, company.user_id, job_id).await?;

    let updated = JobRepository::new(&state.db)
        .update(
            job,
            JobUpdate {
                title: non_empty(payload.title),
                description: non_empty(payload.description),
                location: non_empty(payload.location),
                employment_type: non_empty(payload.employment_type),
                salary_range: non_empty(payload.salary_range),
                required_skills: non_empty(payload.required_skills),
                status: payload.status,
            },
        )
        .await?;

    let company_name = Some(company.display_organization().to_string());
    Ok(Json(JobResponse::new(updated, company_name)))
}

#[utoipa::path(
    delete,
    path = "/api/jobs/{id}",
    params(("id" = String, Path, description = "Job id")),
    responses(
        (status = 200, description = "Posting deleted", body = MessageResponse),
        (status = 403, description = "Not the owning company or an admin"),
        (status = 404, description = "Job not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Jobs"
)]
pub async fn delete_job(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    permission::require_role(&claims, &[RoleEnum::Company, RoleEnum::Admin])?;
    let job = find_job(&state, &id).await?;

    if claims.role != RoleEnum::Admin && job.company_id != permission::caller_id(&claims)? {
        return Err(ApiError::forbidden());
    }

    JobRepository::new(&state.db).delete(job.job_id).await?;
    Ok(Json(MessageResponse::new("Job deleted successfully")))
}

/// Apply to an open posting
#[utoipa::path(
    post,
    path = "/api/jobs/{id}/apply",
    params(("id" = String, Path, description = "Job id")),
    request_body = ApplyRequest,
    responses(
        (status = 201, description = "Application submitted", body = ApplicationResponse),
        (status = 400, description = "Posting closed or certificate not owned"),
        (status = 403, description = "Students only"),
        (status = 404, description = "Job not found"),
        (status = 409, description = "Already applied")
    ),
    security(("bearer_auth" = [])),
    tag = "Applications"
)]
pub async fn apply(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path(id): Path<String>,
    Json(payload): Json<ApplyRequest>,
) -> ApiResult<(StatusCode, Json<ApplicationResponse>)> {
    let student = permission::verified_user(&state, &claims, &[RoleEnum::Student]).await?;
    let job = find_job(&state, &id).await?;

    if job.status != JobStatus::Open {
        return Err(ApiError::BadRequest(
            "This job is no longer accepting applications".to_string(),
        ));
    }

    let application_repo = ApplicationRepository::new(&state.db);
    if application_repo
        .find_by_job_and_student(job.job_id, student.user_id)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict(
            "You have already applied to this job".to_string(),
        ));
    }

    let mut certificate_ids = payload.certificate_ids;
    certificate_ids.sort();
    certificate_ids.dedup();

    let attached = CertificateRepository::new(&state.db)
        .find_by_ids(certificate_ids.clone())
        .await?;
    let owns_all = attached.len() == certificate_ids.len()
        && attached.iter().all(|c| {
            c.student_id == Some(student.user_id)
                || c.learner_email.eq_ignore_ascii_case(&student.email)
        });
    if !owns_all {
        return Err(ApiError::BadRequest(
            "Attached certificates must be your own".to_string(),
        ));
    }

    let application = application_repo
        .create(
            job.job_id,
            student.user_id,
            non_empty(payload.cover_letter),
            &certificate_ids,
        )
        .await
        .map_err(|e| ApiError::conflict_on_duplicate(e, "You have already applied to this job"))?;

    tracing::info!(
        application_id = %application.application_id,
        job_id = %job.job_id,
        student_id = %student.user_id,
        "Application submitted"
    );

    let mut response = ApplicationResponse::from(application);
    response.job_title = Some(job.title);
    Ok((StatusCode::CREATED, Json(response)))
}

/// Applications received for one posting
#[utoipa::path(
    get,
    path = "/api/jobs/{id}/applications",
    params(("id" = String, Path, description = "Job id")),
    responses(
        (status = 200, description = "Applications with applicant and certificates", body = Vec<ApplicationResponse>),
        (status = 403, description = "Not the owning company"),
        (status = 404, description = "Job not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Applications"
)]
pub async fn list_job_applications(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<ApplicationResponse>>> {
    permission::require_role(&claims, &[RoleEnum::Company])?;
    let job_id = parse_id(&id, "Job")?;
    let job = owned_job(&state, permission::caller_id(&claims)?, job_id).await?;

    let applications = ApplicationRepository::new(&state.db)
        .find_by_job(job.job_id)
        .await?;

    let students: HashMap<Uuid, _> = UserRepository::new(&state.db)
        .find_by_ids(applications.iter().map(|a| a.student_id).collect())
        .await?
        .into_iter()
        .map(|u| (u.user_id, u))
        .collect();

    let certificate_ids = applications
        .iter()
        .flat_map(|a| a.attached_certificates())
        .collect();
    let certificates: HashMap<Uuid, _> = CertificateRepository::new(&state.db)
        .find_by_ids(certificate_ids)
        .await?
        .into_iter()
        .map(|c| (c.certificate_id, c))
        .collect();

    let responses = applications
        .into_iter()
        .map(|application| {
            let mut response = ApplicationResponse::from(application);
            response.job_title = Some(job.title.clone());
            response.student = students.get(&response.student_id).cloned().map(Into::into);
            response.certificates = response
                .certificate_ids
                .iter()
                .filter_map(|id| certificates.get(id).cloned().map(Into::into))
                .collect();
            response
        })
        .collect();

    Ok(Json(responses))
}

/// The calling student's applications
#[utoipa::path(
    get,
    path = "/api/jobs/applications/mine",
    responses(
        (status = 200, description = "Own applications", body = Vec<ApplicationResponse>),
        (status = 403, description = "Students only")
    ),
    security(("bearer_auth" = [])),
    tag = "Applications"
)]
pub async fn list_my_applications(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
) -> ApiResult<Json<Vec<ApplicationResponse>>> {
    permission::require_role(&claims, &[RoleEnum::Student])?;
    let student_id = permission::caller_id(&claims)?;

    let applications = ApplicationRepository::new(&state.db)
        .find_by_student(student_id)
        .await?;
    let titles = job_titles(&state, applications.iter().map(|a| a.job_id).collect()).await?;

    Ok(Json(
        applications
            .into_iter()
            .map(|application| {
                let mut response = ApplicationResponse::from(application);
                response.job_title = titles.get(&response.job_id).cloned();
                response
            })
            .collect(),
    ))
}

/// Move an application along its review pipeline
///
/// Allowed: pending to shortlisted or rejected, shortlisted to accepted or
/// rejected.
#[utoipa::path(
    put,
    path = "/api/jobs/applications/{id}/status",
    params(("id" = String, Path, description = "Application id")),
    request_body = UpdateApplicationStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ApplicationResponse),
        (status = 400, description = "Transition not allowed"),
        (status = 403, description = "Not the owning company"),
        (status = 404, description = "Application not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Applications"
)]
pub async fn update_application_status(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path(id): Path<String>,
    Json(payload): Json<UpdateApplicationStatusRequest>,
) -> ApiResult<Json<ApplicationResponse>> {
    let company = permission::verified_user(&state, &claims, &[RoleEnum::Company]).await?;
    let application = find_application(&state, &id).await?;
    let job = owned_job(&state, company.user_id, application.job_id).await?;

    if !application.status.can_transition_to(payload.status) {
        return Err(ApiError::BadRequest(format!(
            "Cannot move an application from {:?} to {:?}",
            application.status, payload.status
        )));
    }

    let updated = ApplicationRepository::new(&state.db)
        .update_status(application, payload.status)
        .await?;

    let mut response = ApplicationResponse::from(updated);
    response.job_title = Some(job.title);
    Ok(Json(response))
}

/// Withdraw a pending application
#[utoipa::path(
    delete,
    path = "/api/jobs/applications/{id}",
    params(("id" = String, Path, description = "Application id")),
    responses(
        (status = 200, description = "Application withdrawn", body = MessageResponse),
        (status = 400, description = "Application already reviewed"),
        (status = 403, description = "Not the applicant"),
        (status = 404, description = "Application not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Applications"
)]
pub async fn withdraw_application(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    permission::require_role(&claims, &[RoleEnum::Student])?;
    let application = find_application(&state, &id).await?;

    if application.student_id != permission::caller_id(&claims)? {
        return Err(ApiError::forbidden());
    }
    if application.status != ApplicationStatus::Pending {
        return Err(ApiError::BadRequest(
            "Only pending applications can be withdrawn".to_string(),
        ));
    }

    ApplicationRepository::new(&state.db)
        .delete(application.application_id)
        .await?;
    Ok(Json(MessageResponse::new("Application withdrawn")))
}

/// Extend an offer on a shortlisted or accepted application
#[utoipa::path(
    post,
    path = "/api/jobs/applications/{id}/offer",
    params(("id" = String, Path, description = "Application id")),
    request_body = CreateOfferRequest,
    responses(
        (status = 201, description = "Offer created", body = OfferResponse),
        (status = 400, description = "Application not shortlisted or salary missing"),
        (status = 403, description = "Not the owning company"),
        (status = 404, description = "Application not found"),
        (status = 409, description = "Offer already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "Offers"
)]
pub async fn create_offer(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path(id): Path<String>,
    Json(payload): Json<CreateOfferRequest>,
) -> ApiResult<(StatusCode, Json<OfferResponse>)> {
    let company = permission::verified_user(&state, &claims, &[RoleEnum::Company]).await?;
    let application = find_application(&state, &id).await?;
    let job = owned_job(&state, company.user_id, application.job_id).await?;

    if !application.status.accepts_offer() {
        return Err(ApiError::BadRequest(
            "Only shortlisted or accepted applications can receive an offer".to_string(),
        ));
    }

    let salary = payload.salary.trim().to_string();
    if salary.is_empty() {
        return Err(ApiError::BadRequest("Salary is required".to_string()));
    }

    let offer_repo = OfferRepository::new(&state.db);
    if offer_repo
        .find_by_application(application.application_id)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict(
            "An offer already exists for this application".to_string(),
        ));
    }

    let offer = offer_repo
        .create(NewOffer {
            application_id: application.application_id,
            job_id: job.job_id,
            company_id: company.user_id,
            student_id: application.student_id,
            salary,
            start_date: payload.start_date,
            message: non_empty(payload.message),
        })
        .await
        .map_err(|e| {
            ApiError::conflict_on_duplicate(e, "An offer already exists for this application")
        })?;

    tracing::info!(offer_id = %offer.offer_id, application_id = %application.application_id, "Offer extended");

    let mut response = OfferResponse::from(offer);
    response.job_title = Some(job.title);
    Ok((StatusCode::CREATED, Json(response)))
}

/// Offers received (students) or sent (companies)
#[utoipa::path(
    get,
    path = "/api/jobs/offers/mine",
    responses(
        (status = 200, description = "Offers", body = Vec<OfferResponse>),
        (status = 403, description = "Students and companies only")
    ),
    security(("bearer_auth" = [])),
    tag = "Offers"
)]
pub async fn list_my_offers(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
) -> ApiResult<Json<Vec<OfferResponse>>> {
    let caller = permission::caller_id(&claims)?;
    let repo = OfferRepository::new(&state.db);

    let offers: Vec<job_offer::Model> = match claims.role {
        RoleEnum::Student => repo.find_by_student(caller).await?,
        RoleEnum::Company => repo.find_by_company(caller).await?,
        _ => return Err(ApiError::forbidden()),
    };
    let titles = job_titles(&state, offers.iter().map(|o| o.job_id).collect()).await?;

    Ok(Json(
        offers
            .into_iter()
            .map(|offer| {
                let mut response = OfferResponse::from(offer);
                response.job_title = titles.get(&response.job_id).cloned();
                response
            })
            .collect(),
    ))
}

/// Accept or decline an offer
///
/// Accepting also marks the application as accepted.
#[utoipa::path(
    put,
    path = "/api/jobs/offers/{id}/respond",
    params(("id" = String, Path, description = "Offer id")),
    request_body = RespondOfferRequest,
    responses(
        (status = 200, description = "Offer answered", body = OfferResponse),
        (status = 400, description = "Offer already answered or application closed"),
        (status = 403, description = "Not the recipient"),
        (status = 404, description = "Offer not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Offers"
)]
pub async fn respond_to_offer(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path(id): Path<String>,
    Json(payload): Json<RespondOfferRequest>,
) -> ApiResult<Json<OfferResponse>> {
    permission::require_role(&claims, &[RoleEnum::Student])?;
    let offer_id = parse_id(&id, "Offer")?;

    let repo = OfferRepository::new(&state.db);
    let offer = repo
        .find_by_id(offer_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Offer not found".to_string()))?;

    if offer.student_id != permission::caller_id(&claims)? {
        return Err(ApiError::forbidden());
    }
    if offer.status != OfferStatus::Pending {
        return Err(ApiError::BadRequest(
            "This offer has already been answered".to_string(),
        ));
    }

    if payload.accept {
        let application = ApplicationRepository::new(&state.db)
            .find_by_id(offer.application_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Application not found".to_string()))?;
        if !application.status.accepts_offer() {
            return Err(ApiError::BadRequest(
                "The application was closed; this offer can no longer be accepted".to_string(),
            ));
        }
    }

    let status = if payload.accept {
        OfferStatus::Accepted
    } else {
        OfferStatus::Declined
    };
    let updated = repo.respond(offer, status).await?;
    tracing::info!(offer_id = %offer_id, ?status, "Offer answered");

    Ok(Json(updated.into()))
}
