use crate::entities::job_posting;
use crate::entities::sea_orm_active_enums::JobStatus;
use anyhow::Result;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DeleteResult, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

pub struct JobRepository {
    db: DatabaseConnection,
}

pub struct NewJobPosting {
    pub company_id: Uuid,
    pub title: String,
    pub description: String,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub salary_range: Option<String>,
    pub required_skills: Option<String>,
}

#[derive(Default)]
pub struct JobUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub salary_range: Option<String>,
    pub required_skills: Option<String>,
    pub status: Option<JobStatus>,
}

impl JobRepository {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    pub async fn create(&self, new_job: NewJobPosting) -> Result<job_posting::Model> {
        let now = Utc::now().naive_utc();
        let model = job_posting::ActiveModel {
            job_id: Set(Uuid::new_v4()),
            company_id: Set(new_job.company_id),
            title: Set(new_job.title),
            description: Set(new_job.description),
            location: Set(new_job.location),
            employment_type: Set(new_job.employment_type),
            salary_range: Set(new_job.salary_range),
            required_skills: Set(new_job.required_skills),
            status: Set(JobStatus::Open),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model.insert(&self.db).await?;
        Ok(result)
    }

    pub async fn find_by_id(&self, job_id: Uuid) -> Result<Option<job_posting::Model>> {
        let job = job_posting::Entity::find_by_id(job_id).one(&self.db).await?;
        Ok(job)
    }

    pub async fn find_by_ids(&self, job_ids: Vec<Uuid>) -> Result<Vec<job_posting::Model>> {
        if job_ids.is_empty() {
            return Ok(Vec::new());
        }

        let jobs = job_posting::Entity::find()
            .filter(job_posting::Column::JobId.is_in(job_ids))
            .all(&self.db)
            .await?;
        Ok(jobs)
    }

    pub async fn find_all(
        &self,
        status: Option<JobStatus>,
        search: Option<&str>,
    ) -> Result<Vec<job_posting::Model>> {
        let mut query = job_posting::Entity::find();

        if let Some(status) = status {
            query = query.filter(job_posting::Column::Status.eq(status));
        }

        if let Some(term) = search.map(str::trim).filter(|s| !s.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(job_posting::Column::Title.contains(term))
                    .add(job_posting::Column::Description.contains(term))
                    .add(job_posting::Column::RequiredSkills.contains(term))
                    .add(job_posting::Column::Location.contains(term)),
            );
        }

        let jobs = query
            .order_by_desc(job_posting::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(jobs)
    }

    pub async fn find_by_company(&self, company_id: Uuid) -> Result<Vec<job_posting::Model>> {
        let jobs = job_posting::Entity::find()
            .filter(job_posting::Column::CompanyId.eq(company_id))
            .order_by_desc(job_posting::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(jobs)
    }

    pub async fn update(&self, job: job_posting::Model, updates: JobUpdate) -> Result<job_posting::Model> {
        let mut active_model: job_posting::ActiveModel = job.into();

        if let Some(title) = updates.title {
            active_model.title = Set(title);
        }
        if let Some(description) = updates.description {
            active_model.description = Set(description);
        }
        if let Some(location) = updates.location {
            active_model.location = Set(Some(location));
        }
        if let Some(employment_type) = updates.employment_type {
            active_model.employment_type = Set(Some(employment_type));
        }
        if let Some(salary_range) = updates.salary_range {
            active_model.salary_range = Set(Some(salary_range));
        }
        if let Some(required_skills) = updates.required_skills {
            active_model.required_skills = Set(Some(required_skills));
        }
        if let Some(status) = updates.status {
            active_model.status = Set(status);
        }

        active_model.updated_at = Set(Utc::now().naive_utc());

        let result = active_model.update(&self.db).await?;
        Ok(result)
    }

    pub async fn delete(&self, job_id: Uuid) -> Result<DeleteResult> {
        let result = job_posting::Entity::delete_by_id(job_id).exec(&self.db).await?;
        Ok(result)
    }

    pub async fn count(&self, status: Option<JobStatus>) -> Result<u64> {
        let mut query = job_posting::Entity::find();
        if let Some(status) = status {
            query = query.filter(job_posting::Column::Status.eq(status));
        }
        Ok(query.count(&self.db).await?)
    }
}
