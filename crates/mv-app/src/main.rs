//! Terminal front end for browsing meteorite strikes

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use mv_data::ExplorerConfig;

mod app;
mod commands;
mod render;

use app::{ExplorerApp, Flow};

/// Browse NASA meteorite landings from the terminal
#[derive(Debug, Parser)]
#[command(name = "meteorite-explorer", version, about)]
struct Cli {
    /// JSON configuration file; environment variables override it
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ExplorerConfig::load(cli.config.as_deref())
        .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;

    info!("Starting meteorite explorer");

    let mut app = ExplorerApp::new(config)?;
    let state = app.load()?;
    info!(?state, "initial load finished");

    println!("{}", app.show_page());
    println!("Type help for commands.");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();

    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;

        match commands::parse_line(&line) {
            Ok(command) => {
                let (flow, output) = app.execute(command);
                if !output.is_empty() {
                    println!("{}", output);
                }
                if flow == Flow::Quit {
                    break;
                }
            }
            Err(e) => e.print()?,
        }
    }

    info!("Shutting down");
    Ok(())
}
