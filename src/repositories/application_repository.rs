use crate::entities::job_application;
use crate::entities::sea_orm_active_enums::ApplicationStatus;
use anyhow::Result;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DeleteResult, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

pub struct ApplicationRepository {
    db: DatabaseConnection,
}

impl ApplicationRepository {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    pub async fn create(
        &self,
        job_id: Uuid,
        student_id: Uuid,
        cover_letter: Option<String>,
        certificate_ids: &[Uuid],
    ) -> Result<job_application::Model> {
        let now = Utc::now().naive_utc();
        let model = job_application::ActiveModel {
            application_id: Set(Uuid::new_v4()),
            job_id: Set(job_id),
            student_id: Set(student_id),
            cover_letter: Set(cover_letter),
            certificate_ids: Set(serde_json::to_value(certificate_ids)?),
            status: Set(ApplicationStatus::Pending),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model.insert(&self.db).await?;
        Ok(result)
    }

    pub async fn find_by_id(&self, application_id: Uuid) -> Result<Option<job_application::Model>> {
        let application = job_application::Entity::find_by_id(application_id)
            .one(&self.db)
            .await?;
        Ok(application)
    }

    pub async fn find_by_job_and_student(
        &self,
        job_id: Uuid,
        student_id: Uuid,
    ) -> Result<Option<job_application::Model>> {
        let application = job_application::Entity::find()
            .filter(job_application::Column::JobId.eq(job_id))
            .filter(job_application::Column::StudentId.eq(student_id))
            .one(&self.db)
            .await?;
        Ok(application)
    }

    pub async fn find_by_job(&self, job_id: Uuid) -> Result<Vec<job_application::Model>> {
        let applications = job_application::Entity::find()
            .filter(job_application::Column::JobId.eq(job_id))
            .order_by_desc(job_application::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(applications)
    }

    pub async fn find_by_student(&self, student_id: Uuid) -> Result<Vec<job_application::Model>> {
        let applications = job_application::Entity::find()
            .filter(job_application::Column::StudentId.eq(student_id))
            .order_by_desc(job_application::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(applications)
    }

    pub async fn update_status(
        &self,
        application: job_application::Model,
        status: ApplicationStatus,
    ) -> Result<job_application::Model> {
        let mut active_model: job_application::ActiveModel = application.into();
        active_model.status = Set(status);
        active_model.updated_at = Set(Utc::now().naive_utc());

        let result = active_model.update(&self.db).await?;
        Ok(result)
    }

    pub async fn delete(&self, application_id: Uuid) -> Result<DeleteResult> {
        let result = job_application::Entity::delete_by_id(application_id)
            .exec(&self.db)
            .await?;
        Ok(result)
    }

    pub async fn count(&self, status: Option<ApplicationStatus>) -> Result<u64> {
        let mut query = job_application::Entity::find();
        if let Some(status) = status {
            query = query.filter(job_application::Column::Status.eq(status));
        }
        Ok(query.count(&self.db).await?)
    }
}
