pub mod arguments;
pub mod deployer;

pub use deployer::{CONTRACT_PATH, Deployer, Error, deploy};
use {anyhow::Context, chain::ContractAddress};

/// Deploys the configured contract through the node at `args.node_url`.
pub async fn run(args: arguments::Arguments) -> anyhow::Result<ContractAddress> {
    let client = chain::rpc::Client::new(args.rpc_config()).context("create node client")?;
    let deployer = Deployer {
        contract_path: args.contract_path,
        args: args.deploy_args.0,
    };
    let address = deployer.deploy(&client).await?;
    Ok(address)
}
