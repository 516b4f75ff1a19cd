use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Source text given inline or read from a file
#[derive(ClapArgs, Debug)]
#[group(required = true, multiple = false)]
pub struct TextSource {
    /// Text to process
    #[arg(short, long)]
    pub text: Option<String>,

    /// File containing the text to process
    #[arg(short, long)]
    pub input: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the translation HTTP server
    Serve {
        /// Address to bind (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Translate text directly, without starting the server
    Translate {
        #[command(flatten)]
        source: TextSource,

        /// Target language name (e.g. "French")
        #[arg(short = 'l', long)]
        target_lang: String,

        /// Pretty-print the JSON result
        #[arg(long)]
        pretty: bool,
    },

    /// Send a translation request to a running server and print the response
    Request {
        /// Text to translate
        #[arg(short, long, default_value = "Hello world")]
        text: String,

        /// Target language name
        #[arg(short = 'l', long, default_value = "French")]
        target_lang: String,

        /// Server URL (defaults to the configured bind address)
        #[arg(long)]
        url: Option<String>,
    },

    /// Show how text would be split into chunks
    Chunk {
        #[command(flatten)]
        source: TextSource,

        /// Character budget per chunk (overrides config)
        #[arg(short, long)]
        max_chars: Option<usize>,
    },

    /// Check that the API key is set and the model is reachable
    Check,

    /// Write the default configuration file
    InitConfig {
        /// Output path
        #[arg(short, long, default_value = "glossa.toml")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
