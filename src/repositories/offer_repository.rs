use crate::entities::sea_orm_active_enums::{ApplicationStatus, OfferStatus};
use crate::entities::{job_application, job_offer};
use anyhow::Result;
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

pub struct OfferRepository {
    db: DatabaseConnection,
}

pub struct NewOffer {
    pub application_id: Uuid,
    pub job_id: Uuid,
    pub company_id: Uuid,
    pub student_id: Uuid,
    pub salary: String,
    pub start_date: Option<NaiveDate>,
    pub message: Option<String>,
}

impl OfferRepository {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    pub async fn create(&self, new_offer: NewOffer) -> Result<job_offer::Model> {
        let now = Utc::now().naive_utc();
        let model = job_offer::ActiveModel {
            offer_id: Set(Uuid::new_v4()),
            application_id: Set(new_offer.application_id),
            job_id: Set(new_offer.job_id),
            company_id: Set(new_offer.company_id),
            student_id: Set(new_offer.student_id),
            salary: Set(new_offer.salary),
            start_date: Set(new_offer.start_date),
            message: Set(new_offer.message),
            status: Set(OfferStatus::Pending),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model.insert(&self.db).await?;
        Ok(result)
    }

    pub async fn find_by_id(&self, offer_id: Uuid) -> Result<Option<job_offer::Model>> {
        let offer = job_offer::Entity::find_by_id(offer_id).one(&self.db).await?;
        Ok(offer)
    }

    pub async fn find_by_application(&self, application_id: Uuid) -> Result<Option<job_offer::Model>> {
        let offer = job_offer::Entity::find()
            .filter(job_offer::Column::ApplicationId.eq(application_id))
            .one(&self.db)
            .await?;
        Ok(offer)
    }

    pub async fn find_by_student(&self, student_id: Uuid) -> Result<Vec<job_offer::Model>> {
        let offers = job_offer::Entity::find()
            .filter(job_offer::Column::StudentId.eq(student_id))
            .order_by_desc(job_offer::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(offers)
    }

    pub async fn find_by_company(&self, company_id: Uuid) -> Result<Vec<job_offer::Model>> {
        let offers = job_offer::Entity::find()
            .filter(job_offer::Column::CompanyId.eq(company_id))
            .order_by_desc(job_offer::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(offers)
    }

    /// Records the student's answer. Accepting also moves a shortlisted
    /// application to `accepted`; both writes commit together.
    pub async fn respond(&self, offer: job_offer::Model, status: OfferStatus) -> Result<job_offer::Model> {
        let txn = self.db.begin().await?;
        let now = Utc::now().naive_utc();
        let application_id = offer.application_id;

        let mut active_offer: job_offer::ActiveModel = offer.into();
        active_offer.status = Set(status);
        active_offer.updated_at = Set(now);
        let updated = active_offer.update(&txn).await?;

        if status == OfferStatus::Accepted {
            if let Some(application) = job_application::Entity::find_by_id(application_id)
                .one(&txn)
                .await?
                .filter(|application| application.status.accepts_offer())
            {
                let mut active_application: job_application::ActiveModel = application.into();
                active_application.status = Set(ApplicationStatus::Accepted);
                active_application.updated_at = Set(now);
                active_application.update(&txn).await?;
            }
        }

        txn.commit().await?;
        Ok(updated)
    }

    pub async fn count(&self, status: Option<OfferStatus>) -> Result<u64> {
        let mut query = job_offer::Entity::find();
        if let Some(status) = status {
            query = query.filter(job_offer::Column::Status.eq(status));
        }
        Ok(query.count(&self.db).await?)
    }
}
