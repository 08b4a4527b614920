use crate::entities::certificate;
use crate::entities::sea_orm_active_enums::ChainStatus;
use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

pub struct CertificateRepository {
    db: DatabaseConnection,
}

pub struct NewCertificate {
    pub certificate_id: Uuid,
    pub learner_name: String,
    pub learner_email: String,
    pub student_id: Option<Uuid>,
    pub course_name: String,
    pub course_id: Option<Uuid>,
    pub institute_name: String,
    pub institute_id: Option<Uuid>,
    pub issue_date: NaiveDate,
    pub certificate_hash: String,
    pub chain_status: ChainStatus,
    pub qr_payload: String,
}

#[derive(Default)]
pub struct ArtifactUpdate {
    pub pdf_path: Option<String>,
    pub ipfs_hash: Option<String>,
    pub ipfs_url: Option<String>,
}

impl CertificateRepository {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    pub async fn create(&self, new_certificate: NewCertificate) -> Result<certificate::Model> {
        let model = certificate::ActiveModel {
            certificate_id: Set(new_certificate.certificate_id),
            learner_name: Set(new_certificate.learner_name),
            learner_email: Set(new_certificate.learner_email),
            student_id: Set(new_certificate.student_id),
            course_name: Set(new_certificate.course_name),
            course_id: Set(new_certificate.course_id),
            institute_name: Set(new_certificate.institute_name),
            institute_id: Set(new_certificate.institute_id),
            issue_date: Set(new_certificate.issue_date),
            certificate_hash: Set(new_certificate.certificate_hash),
            blockchain_tx_hash: Set(None),
            chain_status: Set(new_certificate.chain_status),
            chain_error: Set(None),
            notarized_at: Set(None),
            qr_payload: Set(new_certificate.qr_payload),
            pdf_path: Set(None),
            ipfs_hash: Set(None),
            ipfs_url: Set(None),
            created_at: Set(Utc::now().naive_utc()),
        };

        let result = model.insert(&self.db).await?;
        Ok(result)
    }

    pub async fn find_by_id(&self, certificate_id: Uuid) -> Result<Option<certificate::Model>> {
        let certificate = certificate::Entity::find_by_id(certificate_id)
            .one(&self.db)
            .await?;
        Ok(certificate)
    }

    pub async fn find_by_hash(&self, certificate_hash: &str) -> Result<Option<certificate::Model>> {
        let certificate = certificate::Entity::find()
            .filter(certificate::Column::CertificateHash.eq(certificate_hash.to_lowercase()))
            .order_by_asc(certificate::Column::CreatedAt)
            .one(&self.db)
            .await?;
        Ok(certificate)
    }

    pub async fn find_all(&self) -> Result<Vec<certificate::Model>> {
        let certificates = certificate::Entity::find()
            .order_by_desc(certificate::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(certificates)
    }

    pub async fn find_by_ids(&self, ids: Vec<Uuid>) -> Result<Vec<certificate::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let certificates = certificate::Entity::find()
            .filter(certificate::Column::CertificateId.is_in(ids))
            .all(&self.db)
            .await?;
        Ok(certificates)
    }

    pub async fn find_by_institute(&self, institute_id: Uuid) -> Result<Vec<certificate::Model>> {
        let certificates = certificate::Entity::find()
            .filter(certificate::Column::InstituteId.eq(institute_id))
            .order_by_desc(certificate::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(certificates)
    }

    /// Certificates linked to the student, or issued to their email before
    /// the account existed.
    pub async fn find_for_student(
        &self,
        student_id: Uuid,
        email: &str,
    ) -> Result<Vec<certificate::Model>> {
        let certificates = certificate::Entity::find()
            .filter(
                Condition::any()
                    .add(certificate::Column::StudentId.eq(student_id))
                    .add(certificate::Column::LearnerEmail.eq(email)),
            )
            .order_by_desc(certificate::Column::IssueDate)
            .all(&self.db)
            .await?;
        Ok(certificates)
    }

    pub async fn find_by_chain_statuses(
        &self,
        statuses: &[ChainStatus],
    ) -> Result<Vec<certificate::Model>> {
        let certificates = certificate::Entity::find()
            .filter(certificate::Column::ChainStatus.is_in(statuses.iter().copied()))
            .order_by_asc(certificate::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(certificates)
    }

    /// Certificates created in `[start, end)`.
    pub async fn find_created_between(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<certificate::Model>> {
        let certificates = certificate::Entity::find()
            .filter(certificate::Column::CreatedAt.gte(start))
            .filter(certificate::Column::CreatedAt.lt(end))
            .order_by_asc(certificate::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(certificates)
    }

    /// Attach certificates issued to `email` to a newly registered student.
    pub async fn link_student_by_email(&self, email: &str, student_id: Uuid) -> Result<u64> {
        let result = certificate::Entity::update_many()
            .col_expr(
                certificate::Column::StudentId,
                sea_orm::sea_query::Expr::value(student_id),
            )
            .filter(certificate::Column::LearnerEmail.eq(email))
            .filter(certificate::Column::StudentId.is_null())
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn mark_notarized(&self, certificate_id: Uuid, tx_hash: String) -> Result<certificate::Model> {
        let certificate = self
            .find_by_id(certificate_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Certificate {} not found", certificate_id))?;

        let mut active: certificate::ActiveModel = certificate.into();
        active.blockchain_tx_hash = Set(Some(tx_hash));
        active.chain_status = Set(ChainStatus::Confirmed);
        active.chain_error = Set(None);
        active.notarized_at = Set(Some(Utc::now().naive_utc()));

        let result = active.update(&self.db).await?;
        Ok(result)
    }

    pub async fn mark_notarization_failed(
        &self,
        certificate_id: Uuid,
        error: String,
    ) -> Result<certificate::Model> {
        let certificate = self
            .find_by_id(certificate_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Certificate {} not found", certificate_id))?;

        // A confirmed anchor is final.
        if certificate.chain_status == ChainStatus::Confirmed {
            return Ok(certificate);
        }

        let mut active: certificate::ActiveModel = certificate.into();
        active.chain_status = Set(ChainStatus::Failed);
        active.chain_error = Set(Some(error));

        let result = active.update(&self.db).await?;
        Ok(result)
    }

    pub async fn mark_pending(&self, certificate_id: Uuid) -> Result<()> {
        certificate::Entity::update_many()
            .col_expr(
                certificate::Column::ChainStatus,
                sea_orm::sea_query::Expr::value(ChainStatus::Pending),
            )
            .filter(certificate::Column::CertificateId.eq(certificate_id))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    pub async fn update_artifacts(
        &self,
        certificate: certificate::Model,
        update: ArtifactUpdate,
    ) -> Result<certificate::Model> {
        if update.pdf_path.is_none() && update.ipfs_hash.is_none() && update.ipfs_url.is_none() {
            return Ok(certificate);
        }

        let mut active: certificate::ActiveModel = certificate.into();

        if let Some(pdf_path) = update.pdf_path {
            active.pdf_path = Set(Some(pdf_path));
        }
        if let Some(ipfs_hash) = update.ipfs_hash {
            active.ipfs_hash = Set(Some(ipfs_hash));
        }
        if let Some(ipfs_url) = update.ipfs_url {
            active.ipfs_url = Set(Some(ipfs_url));
        }

        let result = active.update(&self.db).await?;
        Ok(result)
    }

    pub async fn count(
        &self,
        institute_id: Option<Uuid>,
        chain_status: Option<ChainStatus>,
    ) -> Result<u64> {
        let mut query = certificate::Entity::find();
        if let Some(institute_id) = institute_id {
            query = query.filter(certificate::Column::InstituteId.eq(institute_id));
        }
        if let Some(status) = chain_status {
            query = query.filter(certificate::Column::ChainStatus.eq(status));
        }
        Ok(query.count(&self.db).await?)
    }
}
