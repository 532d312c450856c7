use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use promptrelay::adapters::{create_adapter, CompletionRequest};
use promptrelay::config::Config;

#[derive(Parser)]
#[command(name = "promptrelay")]
#[command(about = "Send one completion request to a remote text-generation endpoint", long_about = None)]
#[command(version)]
struct Cli {
    /// The prompt to complete
    prompt: String,

    #[arg(long)]
    endpoint: Option<String>,

    #[arg(long)]
    model: Option<String>,

    #[arg(long)]
    user: Option<String>,

    #[arg(long)]
    system: Option<String>,

    #[arg(long)]
    temperature: Option<f32>,

    #[arg(long)]
    top_p: Option<f32>,

    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = Config::load().unwrap_or_default();
    config.merge_overrides(
        cli.endpoint,
        cli.model,
        cli.user,
        cli.system,
        cli.temperature,
        cli.top_p,
    );

    let adapter = create_adapter(config.to_adapter_config()?)?;
    info!(model = adapter.model_name(), "requesting completion");

    let result = adapter.complete(CompletionRequest::new(cli.prompt)).await?;
    println!("{}", result.text);

    Ok(())
}
