//! TruthGuard CLI binary entry point.

use clap::Parser;
use tracing_subscriber::EnvFilter;
use truthguard::cli::{self, Cli, Commands};
use truthguard::generation::Analyzer;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("truthguard=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = cli.resolve_config()?;

    match cli.command {
        Commands::Serve(_) => truthguard::server::run_server(config).await?,
        Commands::Text(args) => {
            let analyzer = Analyzer::from_config(config)?;
            let text = cli::read_text_arg(&args.text)?;
            let result = analyzer.analyze_text(&text).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Image(args) => {
            let analyzer = Analyzer::from_config(config)?;
            let mime_type = args
                .mime_type
                .clone()
                .or_else(|| cli::guess_mime_type(&args.path).map(ToOwned::to_owned));
            let data = cli::read_image(&args.path).await?;
            let result = analyzer.analyze_image(&data, mime_type.as_deref()).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}
