use clap::Parser;

#[tokio::main]
async fn main() {
    let args = deployer::arguments::Arguments::parse();
    observe::tracing::initialize(&args.logging.observe_config());
    tracing::info!("running deployer with validated arguments:\n{}", args);
    match deployer::run(args).await {
        Ok(address) => println!("{address}"),
        Err(err) => {
            tracing::error!(?err, "deployment failed");
            std::process::exit(1);
        }
    }
}
