use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct ChainStatusResponse {
    pub enabled: bool,
    pub chain_id: Option<u64>,
    pub contract_address: Option<String>,
    pub pending: u64,
    pub confirmed: u64,
    pub failed: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OnChainVerificationResponse {
    pub certificate_id: Uuid,
    /// Empty when the contract has no record of the id.
    pub on_chain_hash: String,
    pub stored_hash: String,
    pub matches: bool,
    /// Block timestamp of the storing transaction.
    pub timestamp: u64,
    pub issuer: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReconcileResponse {
    pub requeued: usize,
}
