// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use edge_viewer::app::AppModel;
use edge_viewer::i18n;
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "edge-viewer")]
#[command(about = "Live edge-detection camera viewer for the COSMIC desktop")]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run in terminal mode (renders the edge view to the terminal)
    Terminal,

    /// List available cameras
    List,

    /// Capture a single processed frame and save it as PNG
    Snapshot {
        /// Camera index to use (from 'edge-viewer list')
        #[arg(short, long, default_value = "0")]
        camera: usize,

        /// Edge sensitivity threshold (0-100)
        #[arg(short, long)]
        threshold: Option<f32>,

        /// Save the unprocessed camera frame instead of the edge view
        #[arg(long)]
        original: bool,

        /// Output file path (default: ~/Pictures/edge-viewer/edge_TIMESTAMP.png)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=edge_viewer=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Terminal) => edge_viewer::terminal::run(),
        Some(Commands::List) => Ok(cli::list_cameras()?),
        Some(Commands::Snapshot {
            camera,
            threshold,
            original,
            output,
        }) => Ok(cli::take_snapshot(camera, threshold, original, output)?),
        None => run_gui(),
    }
}

fn run_gui() -> Result<(), Box<dyn std::error::Error>> {
    // Get the system's preferred languages.
    let requested_languages = i18n_embed::DesktopLanguageRequester::requested_languages();

    // Enable localizations to be applied.
    i18n::init(&requested_languages);

    // Settings for configuring the application window and iced runtime.
    let settings = cosmic::app::Settings::default().size_limits(
        cosmic::iced::Limits::NONE
            .min_width(360.0)
            .min_height(180.0),
    );

    // Starts the application's event loop with `()` as the application's flags.
    cosmic::app::run::<AppModel>(settings, ())?;

    Ok(())
}
