pub mod certificate_hash;
pub mod jwt;
pub mod random;
pub mod tracing;
