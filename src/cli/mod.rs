//! CLI entry point for TruthGuard.

use std::io::Read;
use std::path::{Path, PathBuf};

use base64::Engine;
use clap::{Parser, Subcommand};

use crate::config::GuardConfig;
use crate::error::{Result, TruthGuardError};

/// TruthGuard fraud and deepfake screening
#[derive(Parser, Debug)]
#[command(name = "truthguard", version, about = "TruthGuard: scam and deepfake risk assessment")]
pub struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Skip model discovery when every priority model fails
    #[arg(long, global = true)]
    pub no_discovery: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server
    Serve(ServeArgs),
    /// Screen a chat transcript
    Text(TextArgs),
    /// Check an image for AI generation
    Image(ImageArgs),
}

/// Arguments for `truthguard serve`.
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Bind host (overrides config)
    #[arg(long)]
    pub host: Option<String>,

    /// Bind port (overrides config)
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Arguments for `truthguard text`.
#[derive(Parser, Debug)]
pub struct TextArgs {
    /// Transcript to analyze, or `-` to read stdin
    pub text: String,
}

/// Arguments for `truthguard image`.
#[derive(Parser, Debug)]
pub struct ImageArgs {
    /// Image file to analyze
    pub path: PathBuf,

    /// MIME type (guessed from the extension when omitted)
    #[arg(short, long)]
    pub mime_type: Option<String>,
}

impl Cli {
    /// Resolve configuration: explicit file or default location, then env, then flags.
    pub fn resolve_config(&self) -> Result<GuardConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let _ = dotenvy::dotenv();
                let mut config = GuardConfig::from_file(path)?;
                config.apply_env(|name| std::env::var(name).ok())?;
                config
            }
            None => GuardConfig::load()?,
        };
        if self.no_discovery {
            config.discovery = false;
        }
        if let Commands::Serve(args) = &self.command {
            if let Some(host) = &args.host {
                config.host = host.clone();
            }
            if let Some(port) = args.port {
                config.port = port;
            }
        }
        Ok(config)
    }
}

/// The literal argument, or all of stdin for `-`.
pub fn read_text_arg(arg: &str) -> Result<String> {
    if arg != "-" {
        return Ok(arg.to_string());
    }
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .map_err(|err| TruthGuardError::validation(format!("cannot read stdin: {err}")))?;
    Ok(text)
}

/// Read an image file and base64-encode it.
pub async fn read_image(path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path).await.map_err(|err| {
        TruthGuardError::validation(format!("cannot read {}: {err}", path.display()))
    })?;
    Ok(base64::engine::general_purpose::STANDARD.encode(bytes))
}

/// MIME type from a file extension, for the formats Gemini accepts.
pub fn guess_mime_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "heic" => Some("image/heic"),
        "heif" => Some("image/heif"),
        _ => None,
    }
}
