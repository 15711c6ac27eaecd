//! # JSON Report Module
//!
//! Questo modulo produce il report finale in JSON per uso programmatico
//! (flag `--json`): un documento unico a fine run con una entry per file
//! e i totali aggregati, stampato su stdout. I log vanno su stderr, così
//! stdout contiene solo il report.

use crate::config::{Config, Mode};
use crate::file_manager::FileManager;
use crate::progress::ConversionStats;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// What happened to a single file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileOutcome {
    Converted,
    Skipped,
    Error,
}

/// Per-file entry of the final report
#[derive(Debug, Serialize, Deserialize)]
pub struct FileReport {
    pub input: PathBuf,
    /// "image" or "video"
    pub kind: String,
    pub outcome: FileOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    pub original_size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reduction_percent: Option<f64>,
    /// Skip reason or error message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl FileReport {
    pub fn converted(
        input: PathBuf,
        kind: &str,
        output: PathBuf,
        original_size: u64,
        output_size: u64,
    ) -> Self {
        Self {
            input,
            kind: kind.to_string(),
            outcome: FileOutcome::Converted,
            output: Some(output),
            original_size,
            output_size: Some(output_size),
            reduction_percent: Some(FileManager::calculate_reduction(original_size, output_size)),
            detail: None,
        }
    }

    pub fn skipped(
        input: PathBuf,
        kind: &str,
        output: Option<PathBuf>,
        original_size: u64,
        reason: &str,
    ) -> Self {
        Self {
            input,
            kind: kind.to_string(),
            outcome: FileOutcome::Skipped,
            output,
            original_size,
            output_size: None,
            reduction_percent: None,
            detail: Some(reason.to_string()),
        }
    }

    pub fn error(input: PathBuf, kind: &str, original_size: u64, message: &str) -> Self {
        Self {
            input,
            kind: kind.to_string(),
            outcome: FileOutcome::Error,
            output: None,
            original_size,
            output_size: None,
            reduction_percent: None,
            detail: Some(message.to_string()),
        }
    }
}

/// Final report for a whole conversion run
#[derive(Debug, Serialize, Deserialize)]
pub struct ConversionReport {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub mode: Mode,
    pub dry_run: bool,
    pub files_processed: usize,
    pub files_converted: usize,
    pub files_skipped: usize,
    pub errors: usize,
    pub total_original_bytes: u64,
    pub total_output_bytes: u64,
    pub total_bytes_saved: u64,
    pub overall_reduction_percent: f64,
    pub duration_seconds: f64,
    pub files: Vec<FileReport>,
}

impl ConversionReport {
    pub fn new(
        input_dir: &Path,
        config: &Config,
        stats: &ConversionStats,
        files: Vec<FileReport>,
        duration_seconds: f64,
    ) -> Self {
        Self {
            input_dir: input_dir.to_path_buf(),
            output_dir: config.output_dir.clone(),
            mode: config.mode,
            dry_run: config.dry_run,
            files_processed: stats.files_processed,
            files_converted: stats.files_converted,
            files_skipped: stats.files_skipped,
            errors: stats.errors,
            total_original_bytes: stats.total_original_size,
            total_output_bytes: stats.total_output_size,
            total_bytes_saved: stats.bytes_saved(),
            overall_reduction_percent: stats.overall_reduction_percent(),
            duration_seconds,
            files,
        }
    }

    /// Print the report as pretty JSON on stdout
    pub fn emit(&self) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(self)?);
        Ok(())
    }
}
