use crate::entities::sea_orm_active_enums::RoleEnum;
use crate::entities::user;
use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DeleteResult, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

pub struct UserRepository {
    db: DatabaseConnection,
}

pub struct NewUser {
    pub email: String,
    pub password: String,
    pub role: RoleEnum,
    pub full_name: String,
    pub organization: Option<String>,
    pub phone: Option<String>,
    pub verified: bool,
}

#[derive(Default)]
pub struct UserFilter {
    pub role: Option<RoleEnum>,
    pub verified: Option<bool>,
    pub search: Option<String>,
}

impl UserRepository {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    pub async fn find_by_id(&self, user_id: Uuid) -> Result<Option<user::Model>> {
        let user = user::Entity::find_by_id(user_id).one(&self.db).await?;
        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>> {
        let user = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;
        Ok(user)
    }

    pub async fn find_by_ids(&self, user_ids: Vec<Uuid>) -> Result<Vec<user::Model>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let users = user::Entity::find()
            .filter(user::Column::UserId.is_in(user_ids))
            .all(&self.db)
            .await?;
        Ok(users)
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let count = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    pub async fn create(&self, new_user: NewUser) -> Result<user::Model> {
        let now = chrono::Utc::now().naive_utc();
        let user_model = user::ActiveModel {
            user_id: Set(Uuid::new_v4()),
            email: Set(new_user.email),
            password: Set(new_user.password),
            role: Set(new_user.role),
            full_name: Set(new_user.full_name),
            organization: Set(new_user.organization),
            phone: Set(new_user.phone),
            verified: Set(new_user.verified),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = user_model.insert(&self.db).await?;
        Ok(result)
    }

    pub async fn find_all_with_pagination(
        &self,
        page: u64,
        page_size: u64,
        filter: UserFilter,
    ) -> Result<(Vec<user::Model>, u64)> {
        let mut query = user::Entity::find();

        if let Some(role) = filter.role {
            query = query.filter(user::Column::Role.eq(role));
        }

        if let Some(verified) = filter.verified {
            query = query.filter(user::Column::Verified.eq(verified));
        }

        // Search by name, email or organization
        if let Some(search_term) = filter.search.filter(|s| !s.trim().is_empty()) {
            let term = search_term.trim();
            query = query.filter(
                Condition::any()
                    .add(user::Column::FullName.contains(term))
                    .add(user::Column::Email.contains(term))
                    .add(user::Column::Organization.contains(term)),
            );
        }

        let total = query.clone().count(&self.db).await?;

        let offset = page.saturating_sub(1) * page_size;
        let users = query
            .order_by_desc(user::Column::CreatedAt)
            .limit(page_size)
            .offset(offset)
            .all(&self.db)
            .await?;

        Ok((users, total))
    }

    /// Institutes and companies still waiting for an admin decision.
    pub async fn find_pending(&self) -> Result<Vec<user::Model>> {
        let users = user::Entity::find()
            .filter(user::Column::Verified.eq(false))
            .filter(user::Column::Role.is_in([RoleEnum::Institute, RoleEnum::Company]))
            .order_by_asc(user::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(users)
    }

    pub async fn find_students(&self, search: Option<&str>) -> Result<Vec<user::Model>> {
        let mut query = user::Entity::find().filter(user::Column::Role.eq(RoleEnum::Student));

        if let Some(term) = search.map(str::trim).filter(|s| !s.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(user::Column::FullName.contains(term))
                    .add(user::Column::Email.contains(term)),
            );
        }

        let students = query
            .order_by_asc(user::Column::FullName)
            .all(&self.db)
            .await?;
        Ok(students)
    }

    pub async fn set_verified(&self, user_id: Uuid, verified: bool) -> Result<user::Model> {
        let user = self
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("User not found"))?;

        let mut active_user: user::ActiveModel = user.into();
        active_user.verified = Set(verified);
        active_user.updated_at = Set(chrono::Utc::now().naive_utc());

        let result = active_user.update(&self.db).await?;
        Ok(result)
    }

    pub async fn update_password(&self, user_id: Uuid, password: String) -> Result<user::Model> {
        let user = self
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("User not found"))?;

        let mut active_user: user::ActiveModel = user.into();
        active_user.password = Set(password);
        active_user.updated_at = Set(chrono::Utc::now().naive_utc());

        let result = active_user.update(&self.db).await?;
        Ok(result)
    }

    pub async fn delete(&self, user_id: Uuid) -> Result<DeleteResult> {
        let result = user::Entity::delete_by_id(user_id).exec(&self.db).await?;
        Ok(result)
    }

    pub async fn count_by_role(&self, role: Option<RoleEnum>) -> Result<u64> {
        let mut query = user::Entity::find();
        if let Some(role) = role {
            query = query.filter(user::Column::Role.eq(role));
        }
        Ok(query.count(&self.db).await?)
    }
}
