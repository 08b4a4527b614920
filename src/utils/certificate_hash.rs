//! Content fingerprint of a certificate.
//!
//! The hash is SHA-256 over a compact JSON object whose keys appear in a fixed
//! order: `learnerName`, `courseName`, `instituteName`, `issueDate`. Field
//! order is part of the format; anything that verifies a certificate must
//! serialize it the same way.

use chrono::NaiveDate;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::entities::certificate;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateFingerprint<'a> {
    pub learner_name: &'a str,
    pub course_name: &'a str,
    pub institute_name: &'a str,
    #[serde(serialize_with = "serialize_issue_date")]
    pub issue_date: NaiveDate,
}

fn serialize_issue_date<S: serde::Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&date.format("%Y-%m-%d").to_string())
}

impl<'a> CertificateFingerprint<'a> {
    pub fn canonical_json(&self) -> String {
        // Serializing a struct of strings cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn digest(&self) -> String {
        hex::encode(Sha256::digest(self.canonical_json().as_bytes()))
    }
}

impl<'a> From<&'a certificate::Model> for CertificateFingerprint<'a> {
    fn from(model: &'a certificate::Model) -> Self {
        Self {
            learner_name: &model.learner_name,
            course_name: &model.course_name,
            institute_name: &model.institute_name,
            issue_date: model.issue_date,
        }
    }
}

/// True when the stored hash still matches the stored fields.
pub fn hash_matches(model: &certificate::Model) -> bool {
    CertificateFingerprint::from(model).digest() == model.certificate_hash
}
