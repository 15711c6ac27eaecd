//! # Main Converter Orchestrator Module
//!
//! Questo è il modulo che orchestra l'intero processo di conversione.
//!
//! ## Flusso di esecuzione:
//! 1. **Discovery**: trova tutti i file media nell'albero di input
//! 2. **Dependency check**: verifica cwebp/ffmpeg/ffprobe, solo per i
//!    tipi di media effettivamente trovati
//! 3. **Loop sequenziale**: un file alla volta, in ordine di discovery
//! 4. **Statistics**: raccoglie i risultati e calcola i risparmi
//! 5. **Reporting**: riepilogo finale, opzionalmente in JSON
//!
//! ## Pipeline per file:
//! 1. Calcolo path di output (struttura relativa preservata)
//! 2. Skip se l'output esiste già (`--keep-existing`) o in dry run
//! 3. Larghezza target: globale (fast) o chiesta all'operatore (custom)
//! 4. Dispatch al processor giusto (immagine vs video)
//!
//! ## Error handling:
//! - Gli errori sui singoli file non bloccano l'operazione
//! - Le statistiche tracciano il numero di errori
//!
//! Il loop è volutamente sequenziale: i prompt del custom mode non si
//! possono sovrapporre e l'ordine dei file deve restare stabile.

use crate::{
    config::{Config, Mode},
    error::ConvertError,
    file_manager::FileManager,
    image_processor::ImageProcessor,
    paths::PathResolver,
    progress::{ConversionStats, ProgressManager},
    prompt,
    report::{ConversionReport, FileReport},
    video_processor::VideoProcessor,
};
use anyhow::Result;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info};

/// Main media converter orchestrator
pub struct MediaConverter {
    config: Config,
    image_processor: ImageProcessor,
    video_processor: VideoProcessor,
}

/// Result of processing one file
enum Outcome {
    Converted {
        output: PathBuf,
        original_size: u64,
        output_size: u64,
    },
    Skipped {
        output: Option<PathBuf>,
        original_size: u64,
        reason: &'static str,
    },
}

impl MediaConverter {
    /// Create a new media converter instance
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            image_processor: ImageProcessor::new(config.clone()),
            video_processor: VideoProcessor::new(config.clone()),
            config,
        })
    }

    /// Run the conversion over a whole media directory
    pub async fn run(&self, media_dir: &Path) -> Result<ConversionStats> {
        info!("Starting web media conversion in: {}", media_dir.display());
        self.log_configuration();

        // Canonicalize once so strip_prefix in path mirroring always works
        let media_dir = media_dir.canonicalize().map_err(|e| {
            anyhow::anyhow!("Failed to canonicalize {}: {}", media_dir.display(), e)
        })?;

        let files = FileManager::find_media_files(&media_dir)?;
        info!("Found {} media files to convert", files.len());

        if files.is_empty() {
            info!("No media files found to convert");
            return Ok(ConversionStats::new());
        }

        if !self.config.dry_run {
            self.check_dependencies(&files).await?;
        }

        let progress = ProgressManager::new(files.len() as u64);
        let mut stats = ConversionStats::new();
        let mut reports = Vec::with_capacity(files.len());
        let started = Instant::now();

        for file_path in &files {
            let kind = if FileManager::is_image(file_path) {
                "image"
            } else {
                "video"
            };
            let file_name = file_path
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string();

            match self.process_file(file_path, &media_dir, &progress).await {
                Ok(Outcome::Converted {
                    output,
                    original_size,
                    output_size,
                }) => {
                    let reduction = FileManager::calculate_reduction(original_size, output_size);
                    stats.add_converted(original_size, output_size);
                    reports.push(FileReport::converted(
                        file_path.clone(),
                        kind,
                        output,
                        original_size,
                        output_size,
                    ));
                    progress.update(&format!("✅ {}: {:.1}% saved", file_name, reduction));
                }
                Ok(Outcome::Skipped {
                    output,
                    original_size,
                    reason,
                }) => {
                    debug!("Skipped {} ({})", file_path.display(), reason);
                    stats.add_skipped();
                    reports.push(FileReport::skipped(
                        file_path.clone(),
                        kind,
                        output,
                        original_size,
                        reason,
                    ));
                    progress.update(&format!("⏩ {}: skipped", file_name));
                }
                Err(e) => {
                    error!("Failed to convert {}: {:#}", file_path.display(), e);
                    stats.add_error();
                    let original_size = FileManager::get_file_size(file_path).await.unwrap_or(0);
                    reports.push(FileReport::error(
                        file_path.clone(),
                        kind,
                        original_size,
                        &format!("{:#}", e),
                    ));
                    progress.update(&format!("❌ {}: error", file_name));
                }
            }
        }

        progress.finish(&stats.format_summary());
        self.log_final_stats(&stats);

        if self.config.json_report {
            let report = ConversionReport::new(
                &media_dir,
                &self.config,
                &stats,
                reports,
                started.elapsed().as_secs_f64(),
            );
            report.emit()?;
        }

        Ok(stats)
    }

    async fn process_file(
        &self,
        input_path: &Path,
        media_dir: &Path,
        progress: &ProgressManager,
    ) -> Result<Outcome> {
        let original_size = FileManager::get_file_size(input_path).await?;
        let output_path =
            PathResolver::output_path(input_path, media_dir, &self.config.output_dir)?;

        if self.config.keep_existing && output_path.exists() {
            return Ok(Outcome::Skipped {
                output: Some(output_path),
                original_size,
                reason: "output already exists",
            });
        }

        if self.config.dry_run {
            debug!(
                "Dry run: would convert {} -> {}",
                input_path.display(),
                output_path.display()
            );
            return Ok(Outcome::Skipped {
                output: Some(output_path),
                original_size,
                reason: "dry run",
            });
        }

        let target_width = self
            .target_width_for(input_path, original_size, progress)
            .await?;

        let converted = if FileManager::is_image(input_path) {
            self.image_processor
                .convert(input_path, &output_path, target_width)
                .await?
        } else if FileManager::is_video(input_path) {
            self.video_processor
                .convert(input_path, &output_path, target_width)
                .await?
        } else {
            return Err(ConvertError::UnsupportedFormat(format!(
                "Unsupported file type: {}",
                input_path.display()
            ))
            .into());
        };

        let output_size = FileManager::get_file_size(&converted).await?;
        debug!(
            "Converted {} -> {} ({} -> {})",
            input_path.display(),
            converted.display(),
            FileManager::format_size(original_size),
            FileManager::format_size(output_size)
        );

        Ok(Outcome::Converted {
            output: converted,
            original_size,
            output_size,
        })
    }

    /// Target width for one file, depending on the orchestration mode
    async fn target_width_for(
        &self,
        input_path: &Path,
        original_size: u64,
        progress: &ProgressManager,
    ) -> Result<Option<u32>> {
        match self.config.mode {
            Mode::Fast => Ok(self.config.target_width),
            Mode::Custom => {
                let details = self.describe_source(input_path, original_size).await;
                let file_name = input_path
                    .file_name()
                    .unwrap_or_default()
                    .to_string_lossy()
                    .to_string();

                let reply = progress.suspend(|| prompt::ask_target_width(&file_name, &details));
                Ok(reply?)
            }
        }
    }

    /// Short source description shown in the custom mode prompt
    async fn describe_source(&self, input_path: &Path, original_size: u64) -> String {
        let size = FileManager::format_size(original_size);

        if FileManager::is_image(input_path) {
            match ImageProcessor::dimensions(input_path) {
                Ok((w, h)) => format!("{}x{}, {}", w, h, size),
                Err(e) => {
                    debug!("Could not probe {}: {:#}", input_path.display(), e);
                    size
                }
            }
        } else {
            match self.video_processor.probe(input_path).await {
                Ok(info) => format!(
                    "{}x{} {}, {:.1}s, {}",
                    info.width, info.height, info.codec, info.duration, size
                ),
                Err(e) => {
                    debug!("Could not probe {}: {:#}", input_path.display(), e);
                    size
                }
            }
        }
    }

    /// Verify external tools, but only for the media types actually found
    async fn check_dependencies(&self, files: &[PathBuf]) -> Result<()> {
        if files.iter().any(|f| FileManager::is_image(f)) {
            ImageProcessor::check_dependencies().await?;
        }
        if files.iter().any(|f| FileManager::is_video(f)) {
            VideoProcessor::check_dependencies().await?;
        }
        Ok(())
    }

    fn log_configuration(&self) {
        match self.config.mode {
            Mode::Fast => match self.config.target_width {
                Some(width) => info!("🎯 Mode: fast (global target width: {}px)", width),
                None => info!("🎯 Mode: fast (no resizing)"),
            },
            Mode::Custom => info!("🎯 Mode: custom (per-file width prompts)"),
        }

        info!("📁 Output directory: {}", self.config.output_dir.display());
        info!("🖼️ Images: WebP quality {}", self.config.webp_quality);
        info!(
            "🎬 Videos: H.264 CRF {}, AAC {}",
            self.config.video_crf, self.config.audio_bitrate
        );

        if self.config.keep_existing {
            info!("⏩ Skip mode: existing outputs are kept");
        }

        if self.config.dry_run {
            info!("🧪 Dry run mode: no files will be written");
        }
    }

    fn log_final_stats(&self, stats: &ConversionStats) {
        info!("=== Conversion Complete ===");
        info!("Files processed: {}", stats.files_processed);
        info!("Files converted: {}", stats.files_converted);
        info!("Files skipped: {}", stats.files_skipped);
        info!("Errors: {}", stats.errors);
        info!(
            "Total input size: {}",
            FileManager::format_size(stats.total_original_size)
        );
        info!(
            "Total output size: {}",
            FileManager::format_size(stats.total_output_size)
        );
        info!("Bytes saved: {}", FileManager::format_size(stats.bytes_saved()));
        info!("Overall reduction: {:.2}%", stats.overall_reduction_percent());
    }
}
