use clap::Parser;
use gitss_cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    gitss_cli::init_tracing();
    gitss_cli::run(cli).await
}
