use std::sync::Arc;

use anyhow::{Context, Result};

use super::notary::Notary;
use super::service::BlockchainService;
use crate::config::Config;

/// Builds the notary from configuration. `None` means notarization is
/// disabled and new certificates are stored with `chain_status = disabled`.
pub fn build_notary(config: &Config) -> Result<Option<Arc<dyn Notary>>> {
    let Some(chain) = config.blockchain() else {
        tracing::warn!(
            "Blockchain settings incomplete, certificates will not be notarized \
             (set BLOCKCHAIN_RPC_URL, CERTIFICATE_CONTRACT_ADDRESS and NOTARY_PRIVATE_KEY)"
        );
        return Ok(None);
    };

    let service = BlockchainService::new(&chain).context("Failed to initialize blockchain service")?;
    tracing::info!(
        rpc_url = %chain.rpc_url,
        contract = %service.contract_address(),
        chain_id = chain.chain_id,
        "Blockchain notarization enabled"
    );
    Ok(Some(Arc::new(service)))
}
