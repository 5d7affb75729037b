//! CLI entrypoint for `onion-dump`.

use clap::Parser;
use onion_dump::cli::Args;
use onion_dump::error::DumpError;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), DumpError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();
    let stdout = std::io::stdout();
    onion_dump::run(&args, stdout.lock()).await
}
