//! Glossa - Chunked LLM Translation Service
//!
//! Entry point for the HTTP server and the command line helpers around it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use glossa::chunker::chunk_text;
use glossa::cli::{Args, Commands, TextSource};
use glossa::config::Config;
use glossa::server::run_server;
use glossa::translate::{
    ChatCompletionClient, ChunkedTranslator, TranslationRequest, check_model_availability,
};

const DEFAULT_CONFIG_FILE: &str = "glossa.toml";

#[actix_web::main]
async fn main() -> Result<()> {
    // Secrets such as GROQ_API_KEY may live in a local .env file
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let _log_guard = setup_logging(args.verbose)?;

    let config = load_config(args.config.as_deref())?;

    match args.command {
        Commands::Serve { host, port } => {
            let mut config = config;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }

            let translator = build_translator(&config)?;
            info!(
                model = %config.translate.model,
                max_chunk_chars = config.translate.max_chunk_chars,
                "Translator initialized"
            );

            run_server(&config, translator).await?;
        }
        Commands::Translate { source, target_lang, pretty } => {
            let text = read_text(&source)?;
            let translator = build_translator(&config)?;

            let result = translator
                .translate(&TranslationRequest { text, target_lang })
                .await?;

            let output = if pretty {
                serde_json::to_string_pretty(&result)?
            } else {
                serde_json::to_string(&result)?
            };
            println!("{}", output);
        }
        Commands::Request { text, target_lang, url } => {
            let base_url = url.unwrap_or_else(|| format!("http://{}", config.bind_addr()));
            let endpoint = format!("{}/translate", base_url.trim_end_matches('/'));

            info!("Sending translation request to {}", endpoint);
            let response = reqwest::Client::new()
                .post(&endpoint)
                .json(&TranslationRequest { text, target_lang })
                .send()
                .await
                .with_context(|| format!("Failed to reach {}", endpoint))?;

            let status = response.status();
            let body: serde_json::Value = response
                .json()
                .await
                .context("Server returned a non-JSON response")?;

            println!("Status: {}", status.as_u16());
            println!("Response: {}", serde_json::to_string_pretty(&body)?);
        }
        Commands::Chunk { source, max_chars } => {
            let text = read_text(&source)?;
            let max_chars = max_chars.unwrap_or(config.translate.max_chunk_chars);
            if max_chars == 0 {
                anyhow::bail!("--max-chars must be greater than 0");
            }

            let chunks = chunk_text(&text, max_chars);
            println!("{} chunk(s), budget {} characters", chunks.len(), max_chars);
            println!("{}", "-".repeat(65));
            for (idx, chunk) in chunks.iter().enumerate() {
                let len = chunk.chars().count();
                let marker = if len > max_chars { " (oversized sentence)" } else { "" };
                println!("#{} [{} chars]{}", idx + 1, len, marker);
                println!("{}", chunk);
                println!();
            }
        }
        Commands::Check => {
            info!(
                "Checking model '{}' at {}",
                config.translate.model, config.translate.endpoint
            );
            check_model_availability(&config.translate).await?;
            println!("Model '{}' is available", config.translate.model);
        }
        Commands::InitConfig { output, force } => {
            if output.exists() && !force {
                anyhow::bail!(
                    "{} already exists (use --force to overwrite)",
                    output.display()
                );
            }
            Config::default().save_to_file(&output)?;
            println!("Wrote default configuration to {}", output.display());
        }
    }

    Ok(())
}

/// Explicit path, then ./glossa.toml, then defaults; environment overrides apply last
fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            if Path::new(DEFAULT_CONFIG_FILE).exists() {
                info!("Found {} in current directory, loading...", DEFAULT_CONFIG_FILE);
                Config::from_file(DEFAULT_CONFIG_FILE)?
            } else {
                Config::default()
            }
        }
    };

    let config = config.with_env_overrides()?;
    config.validate()?;
    Ok(config)
}

/// Build the long-lived completion client and wrap it in a translator
fn build_translator(config: &Config) -> Result<ChunkedTranslator> {
    let client = ChatCompletionClient::new(config.translate.clone())
        .context("Failed to initialize completion client")?;
    Ok(ChunkedTranslator::new(
        Arc::new(client),
        config.translate.max_chunk_chars,
    ))
}

fn read_text(source: &TextSource) -> Result<String> {
    match (&source.text, &source.input) {
        (Some(text), _) => Ok(text.clone()),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        (None, None) => anyhow::bail!("Either --text or --input is required"),
    }
}

fn setup_logging(verbose: bool) -> Result<WorkerGuard> {
    // Create log directory
    let log_dir: PathBuf = std::env::current_dir()?.join(".glossa").join("log");
    std::fs::create_dir_all(&log_dir)?;

    // Set up file appender with daily rotation
    let file_appender = rolling::daily(&log_dir, "glossa.log");
    let (non_blocking_file, guard) = non_blocking(file_appender);

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    // Console logs go to stderr so command output on stdout stays machine-readable
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false); // No ANSI colors in file

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!(
        "Logging initialized - console: {}, file: {}",
        log_level,
        log_dir.join("glossa.log").display()
    );

    Ok(guard)
}
