use crate::entities::student_profile;
use anyhow::Result;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

pub struct StudentProfileRepository {
    db: DatabaseConnection,
}

#[derive(Default)]
pub struct ProfileUpdate {
    pub bio: Option<String>,
    pub skills: Option<String>,
    pub education: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub resume_url: Option<String>,
}

impl StudentProfileRepository {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    pub async fn find_by_student(&self, student_id: Uuid) -> Result<Option<student_profile::Model>> {
        let profile = student_profile::Entity::find_by_id(student_id)
            .one(&self.db)
            .await?;
        Ok(profile)
    }

    /// Creates the profile on first write, otherwise overwrites only the
    /// provided fields.
    pub async fn upsert(&self, student_id: Uuid, updates: ProfileUpdate) -> Result<student_profile::Model> {
        let now = Utc::now().naive_utc();

        let Some(existing) = self.find_by_student(student_id).await? else {
            let model = student_profile::ActiveModel {
                student_id: Set(student_id),
                bio: Set(updates.bio),
                skills: Set(updates.skills),
                education: Set(updates.education),
                linkedin_url: Set(updates.linkedin_url),
                github_url: Set(updates.github_url),
                resume_url: Set(updates.resume_url),
                updated_at: Set(now),
            };
            return Ok(model.insert(&self.db).await?);
        };

        let mut active_model: student_profile::ActiveModel = existing.into();
        if let Some(bio) = updates.bio {
            active_model.bio = Set(Some(bio));
        }
        if let Some(skills) = updates.skills {
            active_model.skills = Set(Some(skills));
        }
        if let Some(education) = updates.education {
            active_model.education = Set(Some(education));
        }
        if let Some(linkedin_url) = updates.linkedin_url {
            active_model.linkedin_url = Set(Some(linkedin_url));
        }
        if let Some(github_url) = updates.github_url {
            active_model.github_url = Set(Some(github_url));
        }
        if let Some(resume_url) = updates.resume_url {
            active_model.resume_url = Set(Some(resume_url));
        }
        active_model.updated_at = Set(now);

        let result = active_model.update(&self.db).await?;
        Ok(result)
    }
}
