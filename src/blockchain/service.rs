use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use ethers::{
    contract::abigen,
    middleware::SignerMiddleware,
    providers::{Http, Provider},
    signers::{LocalWallet, Signer},
    types::Address,
};
use futures::future::BoxFuture;

use super::notary::{Notary, OnChainRecord};
use crate::config::BlockchainConfig;

abigen!(
    CertificateRegistry,
    r#"[
        function storeCertificate(string certificateId, string certificateHash) external
        function verifyCertificate(string certificateId) external view returns (string, uint256, address)
    ]"#
);

type SignerClient = SignerMiddleware<Provider<Http>, LocalWallet>;

/// Signs registry transactions with the configured notary key.
pub struct BlockchainService {
    contract: CertificateRegistry<SignerClient>,
    contract_address: Address,
    chain_id: u64,
}

impl BlockchainService {
    pub fn new(config: &BlockchainConfig) -> Result<Self> {
        let provider = Provider::<Http>::try_from(config.rpc_url.as_str())
            .context("Invalid blockchain RPC url")?;

        let wallet: LocalWallet = config
            .private_key
            .trim_start_matches("0x")
            .parse()
            .context("Failed to parse notary private key")?;
        let wallet = wallet.with_chain_id(config.chain_id);

        let contract_address: Address = config
            .contract_address
            .parse()
            .context("Invalid certificate contract address")?;

        let client = Arc::new(SignerMiddleware::new(provider, wallet));
        let contract = CertificateRegistry::new(contract_address, client);

        Ok(Self {
            contract,
            contract_address,
            chain_id: config.chain_id,
        })
    }

    async fn send_store(&self, certificate_id: &str, certificate_hash: &str) -> Result<String> {
        let call = self
            .contract
            .store_certificate(certificate_id.to_string(), certificate_hash.to_string());

        let pending = call
            .send()
            .await
            .context("Failed to send storeCertificate transaction")?;
        let tx_hash = pending.tx_hash();

        let receipt = pending
            .await
            .context("Failed while waiting for storeCertificate receipt")?
            .ok_or_else(|| anyhow!("Transaction {:?} was dropped from the mempool", tx_hash))?;

        if receipt.status.map(|s| s.as_u64()) == Some(0) {
            return Err(anyhow!("Transaction {:?} reverted", receipt.transaction_hash));
        }

        Ok(format!("{:?}", receipt.transaction_hash))
    }

    async fn call_verify(&self, certificate_id: &str) -> Result<OnChainRecord> {
        let (certificate_hash, timestamp, issuer) = self
            .contract
            .verify_certificate(certificate_id.to_string())
            .call()
            .await
            .context("verifyCertificate call failed")?;

        Ok(OnChainRecord {
            certificate_hash,
            timestamp: timestamp.low_u64(),
            issuer: format!("{:?}", issuer),
        })
    }
}

impl Notary for BlockchainService {
    fn store_certificate<'a>(
        &'a self,
        certificate_id: &'a str,
        certificate_hash: &'a str,
    ) -> BoxFuture<'a, Result<String>> {
        Box::pin(self.send_store(certificate_id, certificate_hash))
    }

    fn verify_certificate<'a>(&'a self, certificate_id: &'a str) -> BoxFuture<'a, Result<OnChainRecord>> {
        Box::pin(self.call_verify(certificate_id))
    }

    fn contract_address(&self) -> String {
        format!("{:?}", self.contract_address)
    }

    fn chain_id(&self) -> u64 {
        self.chain_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_config() -> BlockchainConfig {
        BlockchainConfig {
            rpc_url: "http://127.0.0.1:8545".to_string(),
            contract_address: "0x5FbDB2315678afecb367f032d93F642f64180aa3".to_string(),
            private_key: "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"
                .to_string(),
            chain_id: 31337,
        }
    }

    #[test]
    fn builds_from_config_without_network_access() {
        let service = BlockchainService::new(&local_config()).unwrap();
        assert_eq!(service.chain_id(), 31337);
        assert_eq!(
            service.contract_address().to_lowercase(),
            "0x5fbdb2315678afecb367f032d93f642f64180aa3"
        );
    }

    #[test]
    fn rejects_malformed_contract_address() {
        let mut config = local_config();
        config.contract_address = "not-an-address".to_string();
        assert!(BlockchainService::new(&config).is_err());
    }
}
