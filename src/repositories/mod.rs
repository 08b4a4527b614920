pub mod application_repository;
pub mod certificate_repository;
pub mod course_repository;
pub mod job_repository;
pub mod offer_repository;
pub mod student_profile_repository;
pub mod user_repository;

pub use application_repository::ApplicationRepository;
pub use certificate_repository::{ArtifactUpdate, CertificateRepository, NewCertificate};
pub use course_repository::{CourseRepository, CourseUpdate};
pub use job_repository::{JobRepository, JobUpdate, NewJobPosting};
pub use offer_repository::{NewOffer, OfferRepository};
pub use student_profile_repository::{ProfileUpdate, StudentProfileRepository};
pub use user_repository::{NewUser, UserFilter, UserRepository};
