//! # Web Media Converter - Main Entry Point
//!
//! Punto di ingresso dell'applicazione.
//!
//! ## Flusso di esecuzione:
//! 1. Parsa gli argomenti CLI (directory, mode, width, quality, etc.)
//! 2. Configura il logging su stderr (INFO, o DEBUG con --verbose)
//! 3. Valida la directory di input e crea quella di output se manca
//! 4. Crea la configurazione e avvia il converter
//!
//! ## Esempio di utilizzo:
//! ```bash
//! web-media-converter /path/to/media -o /path/to/deploy --width 1920
//! web-media-converter /path/to/media -o /path/to/deploy --mode custom
//! ```

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use web_media_converter::platform::PlatformCommands;
use web_media_converter::{Config, MediaConverter, Mode};

#[derive(Parser)]
#[command(name = "web-media-converter")]
#[command(about = "Convert image and video trees into web-friendly WebP / H.264 MP4")]
struct Args {
    /// Directory containing media files to convert
    media_directory: PathBuf,

    /// Output directory mirroring the input tree
    #[arg(short, long)]
    output: PathBuf,

    /// Orchestration mode: fast (global width) or custom (per-file prompts)
    #[arg(short, long, value_enum, default_value_t = Mode::Fast)]
    mode: Mode,

    /// Global target width in pixels for fast mode (media is never upscaled)
    #[arg(short = 'w', long)]
    width: Option<u32>,

    /// WebP quality (1-100)
    #[arg(long, default_value = "80")]
    webp_quality: u8,

    /// x264 CRF value (0-51, lower = better quality)
    #[arg(short, long, default_value = "26")]
    crf: u8,

    /// AAC audio bitrate
    #[arg(short, long, default_value = "128k")]
    audio_bitrate: String,

    /// Skip files whose output already exists
    #[arg(long)]
    keep_existing: bool,

    /// Dry run - report what would be converted without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Emit the final report as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so the --json report owns stdout
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if args.verbose { "debug" } else { "info" }));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    debug!("Platform: {}", PlatformCommands::system_info());

    // Validate arguments
    if !args.media_directory.exists() {
        return Err(anyhow::anyhow!(
            "Media directory does not exist: {}",
            args.media_directory.display()
        ));
    }
    if !args.media_directory.is_dir() {
        return Err(anyhow::anyhow!(
            "Media path is not a directory: {}",
            args.media_directory.display()
        ));
    }

    // Create the output directory if needed
    if !args.output.exists() {
        std::fs::create_dir_all(&args.output)?;
        info!("Created output directory: {}", args.output.display());
    }
    if !args.output.is_dir() {
        return Err(anyhow::anyhow!(
            "Output path is not a directory: {}",
            args.output.display()
        ));
    }

    let config = Config {
        output_dir: args.output,
        mode: args.mode,
        target_width: args.width,
        webp_quality: args.webp_quality,
        video_crf: args.crf,
        audio_bitrate: args.audio_bitrate,
        keep_existing: args.keep_existing,
        dry_run: args.dry_run,
        json_report: args.json,
    };

    let converter = MediaConverter::new(config)?;
    converter.run(&args.media_directory).await?;

    Ok(())
}
