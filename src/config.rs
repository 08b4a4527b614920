use clap::Parser;

pub const JWT_EXPIRED_TIME: i64 = 86400i64;
pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 100;
pub const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Parser, Clone)]
#[command(author, version, about = "Certify certificate issuance and verification API")]
pub struct Config {
    #[clap(long, env, default_value_t = 8080)]
    pub port: u16,

    #[clap(long, env, default_value_t = true)]
    pub swagger_enabled: bool,

    #[clap(long, env, default_value = "info")]
    pub log_level: String,

    /// `postgres://...` or `sqlite://...`
    #[clap(long, env, default_value = "sqlite://certify.db?mode=rwc")]
    pub database_url: String,

    /// HS256 signing secret. A random one is generated when unset.
    #[clap(long, env)]
    pub jwt_secret: Option<String>,

    #[clap(long, env, default_value_t = JWT_EXPIRED_TIME)]
    pub jwt_expires_in: i64,

    #[clap(long, env, default_value = "*")]
    pub cors_allowed_origins: String,

    /// Base URL of the frontend, used for the verification link in QR payloads.
    #[clap(long, env, default_value = "http://localhost:3000")]
    pub public_base_url: String,

    #[clap(long, env)]
    pub blockchain_rpc_url: Option<String>,

    #[clap(long, env)]
    pub certificate_contract_address: Option<String>,

    #[clap(long, env)]
    pub notary_private_key: Option<String>,

    #[clap(long, env, default_value_t = 31337)]
    pub chain_id: u64,

    #[clap(long, env)]
    pub admin_email: Option<String>,

    #[clap(long, env)]
    pub admin_password: Option<String>,

    #[clap(long, env, default_value_t = false)]
    pub allow_admin_signup: bool,

    #[clap(long, env, default_value_t = bcrypt::DEFAULT_COST)]
    pub bcrypt_cost: u32,

    #[clap(long, env, default_value = "local")]
    pub app_env: String,
}

impl Config {
    /// The chain settings, when all three are present.
    pub fn blockchain(&self) -> Option<BlockchainConfig> {
        match (
            &self.blockchain_rpc_url,
            &self.certificate_contract_address,
            &self.notary_private_key,
        ) {
            (Some(rpc_url), Some(contract_address), Some(private_key)) => Some(BlockchainConfig {
                rpc_url: rpc_url.clone(),
                contract_address: contract_address.clone(),
                private_key: private_key.clone(),
                chain_id: self.chain_id,
            }),
            _ => None,
        }
    }

    pub fn verification_url(&self, certificate_id: &uuid::Uuid) -> String {
        format!(
            "{}/verify/{}",
            self.public_base_url.trim_end_matches('/'),
            certificate_id
        )
    }
}

#[derive(Debug, Clone)]
pub struct BlockchainConfig {
    pub rpc_url: String,
    pub contract_address: String,
    pub private_key: String,
    pub chain_id: u64,
}
