//! # Configuration Management Module
//!
//! Questo modulo gestisce tutta la configurazione dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce la struct `Config` con tutti i parametri di conversione
//! - Definisce l'enum `Mode` (fast / custom) che guida l'orchestrazione
//! - Fornisce validazione dei parametri di input
//! - Supporta caricamento/salvataggio configurazione da/verso file JSON
//!
//! ## Parametri di configurazione:
//! - `output_dir`: Directory di output che rispecchia l'albero di input
//! - `mode`: `fast` (larghezza globale opzionale) o `custom` (prompt per file)
//! - `target_width`: Larghezza massima in pixel per il fast mode (None = nessun resize)
//! - `webp_quality`: Qualità WebP (1-100, default: 80)
//! - `video_crf`: CRF x264 (0-51, default: 26, più basso = migliore qualità)
//! - `audio_bitrate`: Bitrate audio AAC (default: "128k")
//! - `keep_existing`: Salta i file il cui output esiste già
//! - `dry_run`: Simula senza invocare gli encoder
//! - `json_report`: Emette il report finale in JSON su stdout

use anyhow::Result;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Orchestration mode for the conversion loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// One optional global target width, no interaction
    Fast,
    /// Ask the operator for a target width for every file
    Custom,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Fast
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Fast => write!(f, "fast"),
            Mode::Custom => write!(f, "custom"),
        }
    }
}

/// Configuration for media conversion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Output directory mirroring the input tree
    pub output_dir: PathBuf,
    /// Orchestration mode (fast = global width, custom = per-file prompt)
    pub mode: Mode,
    /// Global target width in pixels for fast mode (None = keep original size)
    pub target_width: Option<u32>,
    /// WebP quality (1-100)
    pub webp_quality: u8,
    /// x264 CRF value (0-51, lower = better quality)
    pub video_crf: u8,
    /// AAC audio bitrate
    pub audio_bitrate: String,
    /// Skip files whose output already exists
    pub keep_existing: bool,
    /// Dry run - report without writing anything
    pub dry_run: bool,
    /// Emit the final report as JSON on stdout
    pub json_report: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::new(),
            mode: Mode::Fast,
            target_width: None,
            webp_quality: 80,
            video_crf: 26,
            audio_bitrate: "128k".to_string(),
            keep_existing: false,
            dry_run: false,
            json_report: false,
        }
    }
}

impl Config {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.webp_quality == 0 || self.webp_quality > 100 {
            return Err(anyhow::anyhow!("WebP quality must be between 1 and 100"));
        }

        if self.video_crf > 51 {
            return Err(anyhow::anyhow!("Video CRF must be between 0 and 51"));
        }

        if self.target_width == Some(0) {
            return Err(anyhow::anyhow!("Target width must be greater than 0"));
        }

        if self.audio_bitrate.is_empty() {
            return Err(anyhow::anyhow!("Audio bitrate must not be empty"));
        }

        if self.output_dir.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("Output directory must be specified"));
        }
        if !self.output_dir.exists() {
            return Err(anyhow::anyhow!(
                "Output directory does not exist: {}",
                self.output_dir.display()
            ));
        }
        if !self.output_dir.is_dir() {
            return Err(anyhow::anyhow!(
                "Output path is not a directory: {}",
                self.output_dir.display()
            ));
        }

        Ok(())
    }

    /// Load configuration from file
    pub async fn from_file(path: &PathBuf) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save_to_file(&self, path: &PathBuf) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn valid_config(output_dir: &TempDir) -> Config {
        Config {
            output_dir: output_dir.path().to_path_buf(),
            ..Default::default()
        }
    }

    #[test]
    fn test_config_validation() {
        let out = TempDir::new().unwrap();
        let mut config = valid_config(&out);
        assert!(config.validate().is_ok());

        config.webp_quality = 0;
        assert!(config.validate().is_err());

        config.webp_quality = 80;
        config.video_crf = 52;
        assert!(config.validate().is_err());

        config.video_crf = 26;
        config.target_width = Some(0);
        assert!(config.validate().is_err());

        config.target_width = Some(1280);
        config.audio_bitrate = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_rejects_missing_output_dir() {
        let config = Config::default();
        assert!(config.validate().is_err());

        let config = Config {
            output_dir: PathBuf::from("/definitely/not/a/real/directory"),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.mode, Mode::Fast);
        assert_eq!(config.target_width, None);
        assert_eq!(config.webp_quality, 80);
        assert_eq!(config.video_crf, 26);
        assert_eq!(config.audio_bitrate, "128k");
        assert!(!config.keep_existing);
        assert!(!config.dry_run);
        assert!(!config.json_report);
    }

    #[tokio::test]
    async fn test_config_save_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");

        let original_config = Config {
            output_dir: temp_dir.path().to_path_buf(),
            mode: Mode::Custom,
            target_width: Some(1920),
            webp_quality: 85,
            video_crf: 24,
            audio_bitrate: "192k".to_string(),
            keep_existing: true,
            dry_run: false,
            json_report: true,
        };

        original_config.save_to_file(&config_path).await.unwrap();
        let loaded_config = Config::from_file(&config_path).await.unwrap();

        assert_eq!(loaded_config.mode, Mode::Custom);
        assert_eq!(loaded_config.target_width, Some(1920));
        assert_eq!(loaded_config.webp_quality, 85);
        assert_eq!(loaded_config.video_crf, 24);
        assert_eq!(loaded_config.audio_bitrate, "192k");
        assert!(loaded_config.keep_existing);
        assert!(loaded_config.json_report);
    }

    #[tokio::test]
    async fn test_config_from_missing_file_is_default() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nope.json");

        let config = Config::from_file(&config_path).await.unwrap();
        assert_eq!(config.webp_quality, 80);
        assert_eq!(config.mode, Mode::Fast);
    }
}
