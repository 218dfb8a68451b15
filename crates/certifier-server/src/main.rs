use clap::Parser;

use certifier_server::{init_tracing, run, Cli, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let config = ServerConfig::from_cli(cli)?;
    run(config).await
}
