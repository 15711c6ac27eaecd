//! # Progress Tracking and Statistics Module
//!
//! Questo modulo gestisce il progress tracking e le statistiche della
//! conversione.
//!
//! ## Componenti principali:
//! - `ProgressManager`: progress bar `indicatif` con messaggi per file
//! - `ConversionStats`: contatori cumulativi della run
//!
//! Il custom mode pone domande su stdin mentre la barra è attiva: per
//! questo `ProgressManager` espone `suspend`, che nasconde la barra per
//! la durata del prompt e la ridisegna subito dopo.
//!
//! ## Visual feedback:
//! ```text
//! ⠋ [00:02:15] [====================>-------------------] 75/150 (50%) ✅ photo.jpg: 45.2% saved
//! ```

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Manages progress reporting for media conversion
#[derive(Clone)]
pub struct ProgressManager {
    bar: ProgressBar,
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new(total_files: u64) -> Self {
        let bar = ProgressBar::new(total_files);

        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
                .unwrap()
                .progress_chars("=>-"),
        );

        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Update progress with a message
    pub fn update(&self, message: &str) {
        self.bar.inc(1);
        self.bar.set_message(message.to_string());
    }

    /// Set a custom message without incrementing
    pub fn set_message(&self, message: &str) {
        self.bar.set_message(message.to_string());
    }

    /// Hide the bar while `f` runs, so interactive prompts don't interleave
    pub fn suspend<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        self.bar.suspend(f)
    }

    /// Finish with a final message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }
}

/// Statistics tracker for conversion results
#[derive(Debug, Default)]
pub struct ConversionStats {
    pub files_processed: usize,
    pub files_converted: usize,
    pub files_skipped: usize,
    pub errors: usize,
    pub total_original_size: u64,
    pub total_output_size: u64,
}

impl ConversionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_converted(&mut self, original_size: u64, output_size: u64) {
        self.files_processed += 1;
        self.files_converted += 1;
        self.total_original_size += original_size;
        self.total_output_size += output_size;
    }

    pub fn add_skipped(&mut self) {
        self.files_processed += 1;
        self.files_skipped += 1;
    }

    pub fn add_error(&mut self) {
        self.files_processed += 1;
        self.errors += 1;
    }

    /// Bytes saved across converted files (0 when outputs grew)
    pub fn bytes_saved(&self) -> u64 {
        self.total_original_size.saturating_sub(self.total_output_size)
    }

    /// Overall reduction across converted files; negative when outputs grew
    pub fn overall_reduction_percent(&self) -> f64 {
        if self.total_original_size > 0 {
            ((self.total_original_size as f64 - self.total_output_size as f64)
                / self.total_original_size as f64)
                * 100.0
        } else {
            0.0
        }
    }

    pub fn format_summary(&self) -> String {
        format!(
            "Processed: {} files | Converted: {} | Skipped: {} | Errors: {} | Saved: {} ({:.2}%)",
            self.files_processed,
            self.files_converted,
            self.files_skipped,
            self.errors,
            crate::file_manager::FileManager::format_size(self.bytes_saved()),
            self.overall_reduction_percent()
        )
    }
}
