pub mod certificate;
pub mod course;
pub mod job_application;
pub mod job_offer;
pub mod job_posting;
pub mod sea_orm_active_enums;
pub mod student_profile;
pub mod user;
