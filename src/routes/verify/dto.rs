use chrono::NaiveDateTime;
use serde::Serialize;
use utoipa::ToSchema;

use crate::entities::certificate;
use crate::entities::sea_orm_active_enums::ChainStatus;
use crate::routes::certificates::dto::CertificateResponse;
use crate::utils::certificate_hash::hash_matches;

#[derive(Debug, Serialize, ToSchema)]
pub struct BlockchainProof {
    pub status: ChainStatus,
    pub tx_hash: Option<String>,
    pub notarized_at: Option<NaiveDateTime>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VerificationResponse {
    pub valid: bool,
    /// False when the stored fields no longer hash to the stored hash.
    pub hash_matches: bool,
    pub certificate: CertificateResponse,
    pub blockchain: BlockchainProof,
}

impl From<certificate::Model> for VerificationResponse {
    fn from(model: certificate::Model) -> Self {
        let hash_matches = hash_matches(&model);
        let blockchain = BlockchainProof {
            status: model.chain_status,
            tx_hash: model.blockchain_tx_hash.clone(),
            notarized_at: model.notarized_at,
        };
        Self {
            valid: true,
            hash_matches,
            certificate: model.into(),
            blockchain,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VerificationFailure {
    pub valid: bool,
    pub error: String,
}
