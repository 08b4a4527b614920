pub mod helpers;
pub mod notarizer;
pub mod notary;
pub mod service;

pub use helpers::build_notary;
pub use notarizer::{NotarizationJob, Notarizer};
pub use notary::{Notary, OnChainRecord};
pub use service::BlockchainService;
