use futures::future::BoxFuture;
use serde::Serialize;
use utoipa::ToSchema;

/// What the registry contract returns for a certificate id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct OnChainRecord {
    pub certificate_hash: String,
    /// Block timestamp of the storing transaction, seconds since epoch.
    pub timestamp: u64,
    pub issuer: String,
}

impl OnChainRecord {
    /// The contract answers with an empty hash for ids it has never seen.
    pub fn exists(&self) -> bool {
        !self.certificate_hash.is_empty()
    }
}

/// Client side of the certificate registry contract.
pub trait Notary: Send + Sync {
    /// Sends `storeCertificate` and waits for the receipt. Returns the
    /// transaction hash.
    fn store_certificate<'a>(
        &'a self,
        certificate_id: &'a str,
        certificate_hash: &'a str,
    ) -> BoxFuture<'a, anyhow::Result<String>>;

    /// Calls `verifyCertificate`.
    fn verify_certificate<'a>(
        &'a self,
        certificate_id: &'a str,
    ) -> BoxFuture<'a, anyhow::Result<OnChainRecord>>;

    fn contract_address(&self) -> String;

    fn chain_id(&self) -> u64;
}
