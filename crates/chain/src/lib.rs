//! Access to the chain a contract gets deployed on.
//!
//! [`ChainClient`] is the boundary the deployer talks to. [`rpc::Client`]
//! implements it on top of a node's JSON-RPC API.

pub mod rpc;
mod transaction;

pub use transaction::{
    ContractAddress,
    DeployRequest,
    Receipt,
    TransactionHash,
    TransactionStatus,
};

/// Deployment and receipt polling operations of a chain node.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
#[async_trait::async_trait]
pub trait ChainClient: Send + Sync {
    /// Submits a contract deployment.
    ///
    /// Resolves as soon as the node accepted the submission, long before the
    /// deployment is finalized.
    async fn deploy_contract(&self, request: DeployRequest) -> Result<TransactionHash, Error>;

    /// Waits until the transaction identified by `hash` reaches `status` and
    /// returns its receipt.
    async fn wait_for_transaction_receipt(
        &self,
        hash: &TransactionHash,
        status: TransactionStatus,
    ) -> Result<Receipt, Error>;
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("HTTP error {0}")]
    Http(reqwest::StatusCode),
    #[error("invalid response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("node returned error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("transaction {hash} was {status}")]
    Rejected {
        hash: TransactionHash,
        status: TransactionStatus,
    },
    #[error(
        "transaction {hash} did not reach {status} after {attempts} attempts, last seen as \
         {last:?}"
    )]
    Timeout {
        hash: TransactionHash,
        status: TransactionStatus,
        last: Option<TransactionStatus>,
        attempts: u32,
    },
}
