mod capture;
mod constants;
mod preview;
mod shell;
mod snap;
mod store;
mod tui;
mod viewer;

use anyhow::{Context, Result};
use capture::WebcamProvider;
use clap::{Parser, Subcommand};
use shell::{Shell, ShellOptions};
use std::path::PathBuf;
use std::time::Duration;
use store::CaptureStore;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Webcam device index
    #[arg(short, long, default_value_t = 0, global = true)]
    device: u32,

    /// Directory that receives the timestamped photo folders
    #[arg(short, long, default_value = constants::PHOTO_ROOT, global = true)]
    output_dir: PathBuf,

    /// Ask for a name after each capture and save an annotated copy
    #[arg(long)]
    annotate: bool,

    /// Show a live camera feed next to the captured photos
    #[arg(long)]
    live: bool,

    /// Delay between live preview frames in milliseconds
    #[arg(long, default_value_t = constants::PREVIEW_INTERVAL.as_millis() as u64)]
    preview_interval_ms: u64,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Mode>,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Capture one photo without opening the viewer
    Snap {
        /// Prompt for a name and save an annotated copy
        #[arg(long)]
        annotate: bool,

        /// Name to overlay instead of prompting (implies --annotate)
        #[arg(long)]
        name: Option<String>,
    },

    /// List available cameras
    List,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(log_level(args.debug, args.command.as_ref()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let provider = WebcamProvider::new(args.device);
    let mut store = CaptureStore::new(&args.output_dir);
    tracing::debug!("Saving photos under {}", store.root().display());

    match args.command {
        Some(Mode::List) => {
            let cameras = capture::list_cameras().context("Failed to enumerate cameras")?;
            if cameras.is_empty() {
                println!("No cameras found.");
            }
            for (index, name) in cameras {
                println!("  [{}] {}", index, name);
            }
        }
        Some(Mode::Snap { annotate, name }) => {
            let request = snap::SnapRequest {
                annotate: annotate || name.is_some(),
                name,
            };
            let stdin = std::io::stdin();
            snap::run(
                &provider,
                &mut store,
                request,
                &mut stdin.lock(),
                &mut std::io::stdout(),
            )?;
        }
        None => {
            tracing::info!("Photobooth starting");
            tracing::info!("Camera: {}", args.device);
            tracing::info!("Annotate: {}, live preview: {}", args.annotate, args.live);

            let options = ShellOptions {
                annotate: args.annotate,
                live: args.live,
                preview_interval: Duration::from_millis(args.preview_interval_ms.max(1)),
            };
            let mut shell = Shell::new(options, Box::new(provider), store);
            tui::run(&mut shell)?;

            tracing::info!(
                "Captured {} photo(s) this session",
                shell.store().history().len()
            );
        }
    }

    Ok(())
}

/// The terminal UI shares stderr's tty, so it only logs warnings unless
/// debugging was asked for.
fn log_level(debug: bool, command: Option<&Mode>) -> tracing::Level {
    match (debug, command) {
        (true, _) => tracing::Level::DEBUG,
        (false, None) => tracing::Level::WARN,
        (false, Some(_)) => tracing::Level::INFO,
    }
}
