//! `SeaORM` active enums shared by the entities

use sea_orm::entity::prelude::*;
use sea_orm::sea_query::StringLen;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum RoleEnum {
    #[sea_orm(string_value = "Admin")]
    #[serde(alias = "admin", alias = "ADMIN")]
    Admin,
    #[sea_orm(string_value = "Institute")]
    #[serde(alias = "institute", alias = "INSTITUTE")]
    Institute,
    #[sea_orm(string_value = "Student")]
    #[serde(alias = "student", alias = "STUDENT")]
    Student,
    #[sea_orm(string_value = "Company")]
    #[serde(alias = "company", alias = "COMPANY")]
    Company,
}

impl RoleEnum {
    /// Institutes and companies wait for an admin before they can sign in.
    pub fn requires_approval(self) -> bool {
        matches!(self, RoleEnum::Institute | RoleEnum::Company)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RoleEnum::Admin => "Admin",
            RoleEnum::Institute => "Institute",
            RoleEnum::Student => "Student",
            RoleEnum::Company => "Company",
        }
    }
}

/// Where a certificate's hash stands with respect to the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "lowercase")]
pub enum ChainStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    #[sea_orm(string_value = "failed")]
    Failed,
    #[sea_orm(string_value = "disabled")]
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[sea_orm(string_value = "open")]
    Open,
    #[sea_orm(string_value = "closed")]
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "shortlisted")]
    Shortlisted,
    #[sea_orm(string_value = "accepted")]
    Accepted,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl ApplicationStatus {
    pub fn can_transition_to(self, next: ApplicationStatus) -> bool {
        use ApplicationStatus::*;
        matches!(
            (self, next),
            (Pending, Shortlisted) | (Pending, Rejected) | (Shortlisted, Accepted) | (Shortlisted, Rejected)
        )
    }

    /// An offer can only be extended once the company has shown interest.
    pub fn accepts_offer(self) -> bool {
        matches!(self, ApplicationStatus::Shortlisted | ApplicationStatus::Accepted)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "lowercase")]
pub enum OfferStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "accepted")]
    Accepted,
    #[sea_orm(string_value = "declined")]
    Declined,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn application_transitions_follow_the_graph() {
        use ApplicationStatus::*;
        assert!(Pending.can_transition_to(Shortlisted));
        assert!(Pending.can_transition_to(Rejected));
        assert!(Shortlisted.can_transition_to(Accepted));
        assert!(Shortlisted.can_transition_to(Rejected));

        assert!(!Pending.can_transition_to(Accepted));
        assert!(!Pending.can_transition_to(Pending));
        assert!(!Accepted.can_transition_to(Rejected));
        assert!(!Rejected.can_transition_to(Shortlisted));
    }

    #[test]
    fn only_institutes_and_companies_need_approval() {
        assert!(RoleEnum::Institute.requires_approval());
        assert!(RoleEnum::Company.requires_approval());
        assert!(!RoleEnum::Student.requires_approval());
        assert!(!RoleEnum::Admin.requires_approval());
    }

    #[test]
    fn role_accepts_lowercase_names() {
        let role: RoleEnum = serde_json::from_str("\"company\"").unwrap();
        assert_eq!(role, RoleEnum::Company);
        assert_eq!(serde_json::to_string(&RoleEnum::Institute).unwrap(), "\"Institute\"");
    }
}
