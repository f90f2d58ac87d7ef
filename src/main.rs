//! docsite - Headless documentation-site widget engine
//!
//! This is the binary entry point. All logic lives in the library.

use std::path::PathBuf;

use clap::Parser;
use docsite::HeadlessOptions;
use docsite_app::config::init_config_dir;
use docsite_core::prelude::*;

/// docsite - Drive documentation-site widgets from the command line
#[derive(Parser, Debug)]
#[command(name = "docsite")]
#[command(about = "Headless engine for documentation-site widgets", long_about = None)]
struct Args {
    /// Page to open first, e.g. /en/get-started
    #[arg(value_name = "START_PATH")]
    start_path: Option<String>,

    /// Run in headless mode (NDJSON events on stdout, commands on stdin)
    #[arg(long)]
    headless: bool,

    /// Override `[site] base_url` from config.toml
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Directory containing `.docsite/` (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    /// Write a default `.docsite/config.toml` and exit
    #[arg(long)]
    init: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    color_eyre::install().map_err(|e| Error::config(e.to_string()))?;
    docsite_core::logging::init()?;

    let config_root = args
        .config_dir
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    if args.init {
        init_config_dir(&config_root)?;
        eprintln!("Wrote {}", config_root.join(".docsite").display());
        return Ok(());
    }

    if !args.headless {
        eprintln!("docsite only runs headless for now.");
        eprintln!("Hint: docsite --headless /en/get-started");
        eprintln!(
            "Logs: {} (filter with {})",
            docsite_core::logging::log_file().display(),
            docsite_core::logging::LOG_ENV
        );
        std::process::exit(2);
    }

    docsite::run_headless(HeadlessOptions {
        config_root,
        base_url: args.base_url,
        start_path: args.start_path,
    })
    .await
}
