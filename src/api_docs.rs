use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::blockchain::OnChainRecord;
use crate::entities::sea_orm_active_enums::{
    ApplicationStatus, ChainStatus, JobStatus, OfferStatus, RoleEnum,
};
use crate::routes;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Certify API",
        description = "Certificate issuance, verification and blockchain notarization"
    ),
    paths(
        routes::health::route::health,
        routes::auth::route::register,
        routes::auth::route::login,
        routes::auth::route::me,
        routes::auth::route::change_password,
        routes::certificates::route::issue_certificate,
        routes::certificates::route::list_certificates,
        routes::certificates::route::get_certificate,
        routes::certificates::route::update_artifacts,
        routes::verify::route::verify_by_id,
        routes::verify::route::verify_by_hash,
        routes::admin::route::list_users,
        routes::admin::route::list_pending,
        routes::admin::route::approve_user,
        routes::admin::route::reject_user,
        routes::admin::route::delete_user,
        routes::admin::route::list_all_certificates,
        routes::blockchain::route::chain_status,
        routes::blockchain::route::verify_on_chain,
        routes::blockchain::route::reconcile,
        routes::courses::route::list_courses,
        routes::courses::route::get_course,
        routes::courses::route::create_course,
        routes::courses::route::update_course,
        routes::courses::route::delete_course,
        routes::jobs::route::list_jobs,
        routes::jobs::route::get_job,
        routes::jobs::route::list_my_jobs,
        routes::jobs::route::create_job,
        routes::jobs::route::update_job,
        routes::jobs::route::delete_job,
        routes::jobs::route::apply,
        routes::jobs::route::list_job_applications,
        routes::jobs::route::list_my_applications,
        routes::jobs::route::update_application_status,
        routes::jobs::route::withdraw_application,
        routes::jobs::route::create_offer,
        routes::jobs::route::list_my_offers,
        routes::jobs::route::respond_to_offer,
        routes::students::route::get_profile,
        routes::students::route::update_profile,
        routes::students::route::my_certificates,
        routes::students::route::list_students,
        routes::students::route::get_student,
        routes::stats::route::platform_stats,
        routes::stats::route::institute_stats,
        routes::stats::route::certificate_stats,
    ),
    components(schemas(
        RoleEnum,
        ChainStatus,
        JobStatus,
        ApplicationStatus,
        OfferStatus,
        OnChainRecord,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health"),
        (name = "Authentication", description = "Registration, login and passwords"),
        (name = "Certificates", description = "Issuing and reading certificates"),
        (name = "Verification", description = "Public certificate verification"),
        (name = "Admin", description = "Account moderation"),
        (name = "Blockchain", description = "Notarization status and on-chain checks"),
        (name = "Courses"),
        (name = "Jobs"),
        (name = "Applications"),
        (name = "Offers"),
        (name = "Students"),
        (name = "Statistics"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
