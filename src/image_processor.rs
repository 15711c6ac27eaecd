//! # Image Processing Module
//!
//! Questo modulo converte le immagini in WebP delegando la codifica al
//! tool esterno `cwebp`.
//!
//! ## Pipeline di conversione:
//! 1. Lettura dimensioni sorgente dall'header (libreria `image`, nessun
//!    decode completo)
//! 2. Decisione resize: solo downscale, mai upscale
//! 3. Creazione directory di output
//! 4. Invocazione `cwebp` con qualità configurata e resize opzionale
//!
//! ## Parametri cwebp:
//! - `-q <quality>`: qualità configurata (1-100)
//! - `-m 4`: metodo di encoding bilanciato
//! - `-mt`: multithreading interno dell'encoder
//! - `-resize <w> 0`: downscale alla larghezza richiesta, altezza
//!   calcolata per preservare l'aspect ratio
//!
//! `cwebp` è un requisito hard: se manca la conversione fallisce subito,
//! nessuna copia silenziosa del file originale.

use crate::config::Config;
use crate::error::ConvertError;
use crate::paths::PathResolver;
use crate::platform::PlatformCommands;
use crate::utils::to_string_vec;
use anyhow::Result;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, warn};

/// Handles image to WebP conversion
pub struct ImageProcessor {
    config: Config,
}

impl ImageProcessor {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Read the pixel dimensions of an image from its header.
    ///
    /// Only the header is parsed, so this is cheap even for large files.
    pub fn dimensions(path: &Path) -> Result<(u32, u32)> {
        let dims = image::image_dimensions(path).map_err(ConvertError::Image)?;
        Ok(dims)
    }

    /// Convert a single image to WebP at `output_path`.
    ///
    /// `target_width` requests a downscale; it is ignored when it does not
    /// shrink the image.
    pub async fn convert(
        &self,
        input_path: &Path,
        output_path: &Path,
        target_width: Option<u32>,
    ) -> Result<PathBuf> {
        let input_str = input_path
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("Invalid input path: {:?}", input_path))?;
        let output_str = output_path
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("Invalid output path: {:?}", output_path))?;

        PathResolver::ensure_parent_dirs(output_path).await?;

        let resize_width = self.effective_resize_width(input_path, target_width)?;
        let args =
            Self::build_cwebp_args(input_str, output_str, self.config.webp_quality, resize_width);

        let platform = PlatformCommands::instance();
        let cwebp = platform.get_command("cwebp");
        debug!("Running {} {:?}", cwebp, args);

        let start_time = std::time::Instant::now();
        let output = Command::new(cwebp).args(&args).output().await?;
        let elapsed = start_time.elapsed();

        if !output.status.success() {
            return Err(anyhow::anyhow!(
                "cwebp failed for {}: {}",
                input_path.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }

        debug!(
            "Image converted to WebP in {:?}: {}",
            elapsed,
            output_path.display()
        );

        Ok(output_path.to_path_buf())
    }

    /// Decide the actual resize width, refusing to upscale
    fn effective_resize_width(
        &self,
        input_path: &Path,
        target_width: Option<u32>,
    ) -> Result<Option<u32>> {
        let Some(target) = target_width else {
            return Ok(None);
        };

        let (width, height) = Self::dimensions(input_path)?;
        if target < width {
            debug!(
                "Downscaling {} from {}x{} to width {}",
                input_path.display(),
                width,
                height,
                target
            );
            Ok(Some(target))
        } else {
            warn!(
                "Requested width {} does not shrink {} ({}x{}), keeping original size",
                target,
                input_path.display(),
                width,
                height
            );
            Ok(None)
        }
    }

    /// Build the cwebp argument list
    fn build_cwebp_args(
        input: &str,
        output: &str,
        quality: u8,
        resize_width: Option<u32>,
    ) -> Vec<String> {
        let mut args = to_string_vec(["-q", &quality.to_string(), "-m", "4", "-mt"]);

        if let Some(width) = resize_width {
            // Height 0 preserves the aspect ratio
            args.extend(to_string_vec(["-resize", &width.to_string(), "0"]));
        }

        args.extend(to_string_vec([input, "-o", output]));
        args
    }

    /// Check that the WebP encoder is available
    pub async fn check_dependencies() -> Result<()> {
        let platform = PlatformCommands::instance();

        if !platform.is_command_available("cwebp").await {
            return Err(ConvertError::MissingDependency(
                "cwebp is required for image conversion (install the webp package)".to_string(),
            )
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // Canonical 1x1 RGBA PNG
    const TINY_PNG: &[u8] = &[
        0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1f,
        0x15, 0xc4, 0x89, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x44, 0x41, 0x54, 0x78, 0xda, 0x63, 0xfc,
        0xcf, 0xc0, 0x50, 0x0f, 0x00, 0x04, 0x85, 0x01, 0x80, 0x84, 0xa9, 0x8c, 0x21, 0x00, 0x00,
        0x00, 0x00, 0x49, 0x45, 0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
    ];

    #[test]
    fn test_build_cwebp_args_without_resize() {
        let args = ImageProcessor::build_cwebp_args("in.jpg", "out.webp", 80, None);
        assert_eq!(args, vec!["-q", "80", "-m", "4", "-mt", "in.jpg", "-o", "out.webp"]);
    }

    #[test]
    fn test_build_cwebp_args_with_resize() {
        let args = ImageProcessor::build_cwebp_args("in.jpg", "out.webp", 75, Some(1280));
        assert_eq!(
            args,
            vec![
                "-q", "75", "-m", "4", "-mt", "-resize", "1280", "0", "in.jpg", "-o", "out.webp"
            ]
        );
    }

    #[test]
    fn test_dimensions_reads_png_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tiny.png");
        std::fs::write(&path, TINY_PNG).unwrap();

        let (w, h) = ImageProcessor::dimensions(&path).unwrap();
        assert_eq!((w, h), (1, 1));
    }

    #[test]
    fn test_dimensions_fails_on_garbage() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("garbage.png");
        std::fs::write(&path, b"not a png").unwrap();

        assert!(ImageProcessor::dimensions(&path).is_err());
    }

    #[test]
    fn test_effective_resize_width_never_upscales() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tiny.png");
        std::fs::write(&path, TINY_PNG).unwrap();

        let processor = ImageProcessor::new(Config::default());

        // 1x1 source: any requested width is an upscale and gets dropped
        let resize = processor.effective_resize_width(&path, Some(100)).unwrap();
        assert_eq!(resize, None);

        // No request at all skips the probe entirely
        let resize = processor.effective_resize_width(&path, None).unwrap();
        assert_eq!(resize, None);
    }
}
