use clap::Parser;

mod bootstrap;
mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    bootstrap::run(cli).await
}
