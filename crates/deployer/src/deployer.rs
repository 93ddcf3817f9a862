use {
    chain::{
        ChainClient,
        ContractAddress,
        DeployRequest,
        TransactionHash,
        TransactionStatus,
    },
    serde_json::Value,
    std::path::PathBuf,
};

/// Location of the contract source, relative to the working directory.
pub const CONTRACT_PATH: &str = "contracts/dispute_resolution.py";

/// Deploys one contract and waits until the deployment is finalized.
#[derive(Debug, Clone, PartialEq)]
pub struct Deployer {
    pub contract_path: PathBuf,
    pub args: Vec<Value>,
}

impl Default for Deployer {
    fn default() -> Self {
        Self {
            contract_path: CONTRACT_PATH.into(),
            args: Vec::new(),
        }
    }
}

impl Deployer {
    /// Reads the contract source, submits it and returns the address of the
    /// contract once its deployment is finalized.
    ///
    /// Nothing is retried: every failure of the file system or the client is
    /// returned as is. Calling this twice deploys the contract twice.
    pub async fn deploy(&self, client: &impl ChainClient) -> Result<ContractAddress, Error> {
        tracing::info!("Deploying contract...");
        let code = tokio::fs::read_to_string(&self.contract_path)
            .await
            .map_err(|source| Error::FileRead {
                path: self.contract_path.clone(),
                source,
            })?;

        let hash = client
            .deploy_contract(DeployRequest {
                code,
                args: self.args.clone(),
            })
            .await
            .map_err(Error::Submission)?;

        tracing::info!(%hash, "Waiting for deployment...");
        let receipt = client
            .wait_for_transaction_receipt(&hash, TransactionStatus::Finalized)
            .await
            .map_err(|source| Error::Finalization {
                hash: hash.clone(),
                source,
            })?;

        let address = receipt
            .contract_address
            .ok_or(Error::MissingContractAddress(hash))?;
        tracing::info!("Contract deployed at: {address}");
        Ok(address)
    }
}

/// Deploys the contract at [`CONTRACT_PATH`] without constructor arguments.
pub async fn deploy(client: &impl ChainClient) -> Result<ContractAddress, Error> {
    Deployer::default().deploy(client).await
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read contract source {path:?}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to submit deployment: {0}")]
    Submission(#[source] chain::Error),
    #[error("deployment {hash} was not finalized: {source}")]
    Finalization {
        hash: TransactionHash,
        source: chain::Error,
    },
    #[error("finalized transaction {0} did not deploy a contract")]
    MissingContractAddress(TransactionHash),
}
