use {
    crate::deployer::CONTRACT_PATH,
    chain::rpc,
    clap::Parser,
    serde_json::Value,
    std::{
        fmt::{self, Display, Formatter},
        path::PathBuf,
        time::Duration,
    },
    tracing::level_filters::LevelFilter,
    url::Url,
};

#[derive(Debug, Parser)]
pub struct Arguments {
    #[clap(flatten)]
    pub logging: LoggingArguments,

    /// The node RPC API endpoint.
    #[clap(long, env, default_value = "http://localhost:4000/api")]
    pub node_url: Url,

    /// RPC method used to submit the deployment. It receives the sender, the
    /// contract source and the constructor arguments as positional params.
    #[clap(long, env, default_value = rpc::DEPLOY_INTELLIGENT_CONTRACT)]
    pub deploy_method: String,

    /// Path of the contract source file to deploy.
    #[clap(long, env, default_value = CONTRACT_PATH)]
    pub contract_path: PathBuf,

    /// Constructor arguments of the contract, as a JSON array.
    #[clap(long, env, default_value = "[]", value_parser = parse_deploy_args)]
    pub deploy_args: DeployArgs,

    /// Account to deploy from. Uses the node's default account if not set.
    #[clap(long, env)]
    pub sender: Option<String>,

    /// Time to wait between two lookups of the deployment transaction.
    #[clap(long, env, default_value = "3s", value_parser = humantime::parse_duration)]
    pub poll_interval: Duration,

    /// How often the deployment transaction is looked up before giving up on
    /// it being finalized.
    #[clap(
        long,
        env,
        default_value = "10",
        value_parser = clap::value_parser!(u32).range(1..),
    )]
    pub poll_retries: u32,

    /// Timeout of a single request to the node.
    #[clap(long, env, default_value = "30s", value_parser = humantime::parse_duration)]
    pub request_timeout: Duration,
}

#[derive(Debug, Parser)]
pub struct LoggingArguments {
    #[clap(long, env, default_value = "warn,deployer=debug,chain=debug")]
    pub log_filter: String,

    #[clap(long, env, default_value = "error")]
    pub log_stderr_threshold: LevelFilter,

    /// Output log events as JSON.
    #[clap(long, env)]
    pub use_json_logs: bool,
}

impl LoggingArguments {
    pub fn observe_config(&self) -> observe::Config {
        observe::Config::new(
            &self.log_filter,
            self.log_stderr_threshold.into_level(),
            self.use_json_logs,
        )
    }
}

/// Ordered constructor arguments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeployArgs(pub Vec<Value>);

fn parse_deploy_args(s: &str) -> Result<DeployArgs, String> {
    match serde_json::from_str(s) {
        Ok(Value::Array(args)) => Ok(DeployArgs(args)),
        Ok(other) => Err(format!("expected a JSON array, got {other}")),
        Err(err) => Err(format!("invalid JSON: {err}")),
    }
}

impl Arguments {
    pub fn rpc_config(&self) -> rpc::Config {
        rpc::Config {
            url: self.node_url.clone(),
            deploy_method: self.deploy_method.clone(),
            sender: self.sender.clone(),
            request_timeout: self.request_timeout,
            polling: rpc::Polling {
                interval: self.poll_interval,
                retries: self.poll_retries,
            },
        }
    }
}

impl Display for Arguments {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Self {
            logging,
            node_url,
            deploy_method,
            contract_path,
            deploy_args,
            sender,
            poll_interval,
            poll_retries,
            request_timeout,
        } = self;

        write!(f, "{logging}")?;
        writeln!(f, "node_url: {node_url}")?;
        writeln!(f, "deploy_method: {deploy_method}")?;
        writeln!(f, "contract_path: {}", contract_path.display())?;
        writeln!(f, "deploy_args: {}", Value::Array(deploy_args.0.clone()))?;
        display_option(f, "sender", sender)?;
        writeln!(f, "poll_interval: {poll_interval:?}")?;
        writeln!(f, "poll_retries: {poll_retries}")?;
        writeln!(f, "request_timeout: {request_timeout:?}")?;
        Ok(())
    }
}

impl Display for LoggingArguments {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Self {
            log_filter,
            log_stderr_threshold,
            use_json_logs,
        } = self;

        writeln!(f, "log_filter: {log_filter}")?;
        writeln!(f, "log_stderr_threshold: {log_stderr_threshold}")?;
        writeln!(f, "use_json_logs: {use_json_logs}")?;
        Ok(())
    }
}

fn display_option(f: &mut Formatter<'_>, name: &str, option: &Option<impl Display>) -> fmt::Result {
    write!(f, "{name}: ")?;
    match option {
        Some(display) => writeln!(f, "{display}"),
        None => writeln!(f, "None"),
    }
}
