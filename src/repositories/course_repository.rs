use crate::entities::course;
use anyhow::Result;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DeleteResult, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

pub struct CourseRepository {
    db: DatabaseConnection,
}

impl CourseRepository {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    pub async fn find_all(&self, institute_id: Option<Uuid>) -> Result<Vec<course::Model>> {
        let mut query = course::Entity::find();
        if let Some(institute_id) = institute_id {
            query = query.filter(course::Column::InstituteId.eq(institute_id));
        }
        let courses = query
            .order_by_desc(course::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(courses)
    }

    pub async fn find_by_id(&self, course_id: Uuid) -> Result<Option<course::Model>> {
        let course = course::Entity::find_by_id(course_id).one(&self.db).await?;
        Ok(course)
    }

    pub async fn create(
        &self,
        institute_id: Uuid,
        name: String,
        description: String,
        duration: Option<String>,
    ) -> Result<course::Model> {
        let now = Utc::now().naive_utc();
        let course_model = course::ActiveModel {
            course_id: Set(Uuid::new_v4()),
            institute_id: Set(institute_id),
            name: Set(name),
            description: Set(description),
            duration: Set(duration),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = course_model.insert(&self.db).await?;
        Ok(result)
    }

    pub async fn update(&self, course: course::Model, updates: CourseUpdate) -> Result<course::Model> {
        let mut active_model: course::ActiveModel = course.into();

        if let Some(name) = updates.name {
            active_model.name = Set(name);
        }
        if let Some(description) = updates.description {
            active_model.description = Set(description);
        }
        if let Some(duration) = updates.duration {
            active_model.duration = Set(Some(duration));
        }

        active_model.updated_at = Set(Utc::now().naive_utc());

        let result = active_model.update(&self.db).await?;
        Ok(result)
    }

    pub async fn delete(&self, course_id: Uuid) -> Result<DeleteResult> {
        let result = course::Entity::delete_by_id(course_id).exec(&self.db).await?;
        Ok(result)
    }

    pub async fn count(&self, institute_id: Option<Uuid>) -> Result<u64> {
        let mut query = course::Entity::find();
        if let Some(institute_id) = institute_id {
            query = query.filter(course::Column::InstituteId.eq(institute_id));
        }
        Ok(query.count(&self.db).await?)
    }
}

#[derive(Default)]
pub struct CourseUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub duration: Option<String>,
}
