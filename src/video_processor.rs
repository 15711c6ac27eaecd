//! # Video Processing Module
//!
//! Questo modulo converte i video in MP4 web-friendly (H.264 + AAC)
//! delegando la codifica a FFmpeg.
//!
//! ## Formati supportati:
//! - **Input**: MP4, MOV, AVI, MKV, WebM
//! - **Output**: MP4 (H.264 + AAC) per massima compatibilità browser
//!
//! ## Pipeline di conversione:
//! 1. Probe con ffprobe (dimensioni, durata, bitrate, codec)
//! 2. Decisione resize: filtro `scale=<w>:-2` solo in downscale
//! 3. Codifica su file temporaneo, poi copia nella posizione finale
//!    (un encode fallito non lascia mai output parziali)
//!
//! ## Parametri FFmpeg:
//! - Codec video: libx264, preset medium, CRF configurabile
//! - Codec audio: AAC con bitrate configurabile
//! - `-pix_fmt yuv420p` e `-movflags +faststart` per la riproduzione web
//! - `-map_metadata 0` per portare i metadata del sorgente
//!
//! ## Controllo qualità (CRF):
//! - 18-23: alta qualità (file grandi)
//! - 24-28: buona qualità (default 26, bilanciato)
//! - 29-35: qualità accettabile (file piccoli)

use crate::config::Config;
use crate::error::ConvertError;
use crate::paths::PathResolver;
use crate::platform::PlatformCommands;
use crate::utils::to_string_vec;
use anyhow::Result;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Per-file guard so one pathological video cannot hang the whole run
const VIDEO_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(600);

/// Handles video to MP4 conversion
pub struct VideoProcessor {
    config: Config,
}

impl VideoProcessor {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Convert a single video to H.264/AAC MP4 at `output_path`.
    ///
    /// `target_width` requests a downscale; it is ignored when it does not
    /// shrink the video.
    pub async fn convert(
        &self,
        input_path: &Path,
        output_path: &Path,
        target_width: Option<u32>,
    ) -> Result<PathBuf> {
        tokio::time::timeout(
            VIDEO_TIMEOUT,
            self.convert_internal(input_path, output_path, target_width),
        )
        .await
        .map_err(|_| {
            anyhow::anyhow!("Video conversion timed out for: {}", input_path.display())
        })?
    }

    async fn convert_internal(
        &self,
        input_path: &Path,
        output_path: &Path,
        target_width: Option<u32>,
    ) -> Result<PathBuf> {
        PathResolver::ensure_parent_dirs(output_path).await?;

        let scale_width = self.effective_scale_width(input_path, target_width).await?;

        let temp_file = NamedTempFile::with_suffix(".mp4")?;
        let temp_path = temp_file.path().to_path_buf();

        self.encode(input_path, &temp_path, scale_width).await?;

        debug!("Saving converted video to: {}", output_path.display());
        tokio::fs::copy(&temp_path, output_path).await?;

        // The NamedTempFile is deleted when temp_file goes out of scope
        Ok(output_path.to_path_buf())
    }

    /// Decide the actual scale width, refusing to upscale
    async fn effective_scale_width(
        &self,
        input_path: &Path,
        target_width: Option<u32>,
    ) -> Result<Option<u32>> {
        let Some(target) = target_width else {
            return Ok(None);
        };

        let info = self.probe(input_path).await?;
        if target < info.width {
            debug!(
                "Downscaling {} from {}x{} to width {}",
                input_path.display(),
                info.width,
                info.height,
                target
            );
            Ok(Some(target))
        } else {
            warn!(
                "Requested width {} does not shrink {} ({}x{}), keeping original size",
                target,
                input_path.display(),
                info.width,
                info.height
            );
            Ok(None)
        }
    }

    async fn encode(
        &self,
        input_path: &Path,
        output_path: &Path,
        scale_width: Option<u32>,
    ) -> Result<()> {
        let input_str = input_path
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("Invalid input path: {:?}", input_path))?;
        let output_str = output_path
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("Invalid output path: {:?}", output_path))?;

        let mut args = Self::build_encode_args(
            input_str,
            output_str,
            self.config.video_crf,
            &self.config.audio_bitrate,
            scale_width,
        );

        // Keep FFmpeg quiet unless we are debugging
        if !tracing::enabled!(tracing::Level::DEBUG) {
            args.extend(to_string_vec(["-loglevel", "warning"]));
        }

        let platform = PlatformCommands::instance();
        let ffmpeg = platform.get_command("ffmpeg");

        debug!(
            "Encoding video: {} (CRF: {}, audio: {})",
            input_path.display(),
            self.config.video_crf,
            self.config.audio_bitrate
        );

        let start_time = std::time::Instant::now();
        let output = tokio::process::Command::new(ffmpeg)
            .args(&args)
            .output()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to execute {}: {}", ffmpeg, e))?;
        let elapsed = start_time.elapsed();

        if !output.status.success() {
            return Err(ConvertError::FFmpeg(
                String::from_utf8_lossy(&output.stderr).to_string(),
            )
            .into());
        }

        debug!("Video encoding completed in {:.1}s", elapsed.as_secs_f64());

        Ok(())
    }

    /// Build the FFmpeg argument list for a web-friendly H.264/AAC encode
    fn build_encode_args(
        input: &str,
        output: &str,
        crf: u8,
        audio_bitrate: &str,
        scale_width: Option<u32>,
    ) -> Vec<String> {
        let mut args = to_string_vec([
            "-i",
            input,
            "-c:v",
            "libx264",
            "-preset",
            "medium",
            "-crf",
            &crf.to_string(),
        ]);

        if let Some(width) = scale_width {
            // -2 keeps the height even, as libx264 requires
            args.extend(to_string_vec(["-vf", &format!("scale={}:-2", width)]));
        }

        args.extend(to_string_vec([
            "-c:a",
            "aac",
            "-b:a",
            audio_bitrate,
            "-map_metadata",
            "0",
            "-movflags",
            "+faststart",
            "-pix_fmt",
            "yuv420p",
            "-y",
            output,
        ]));

        args
    }

    /// Get video information using ffprobe
    pub async fn probe(&self, video_path: &Path) -> Result<VideoInfo> {
        let video_str = video_path
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("Invalid video path: {:?}", video_path))?;

        let platform = PlatformCommands::instance();
        let ffprobe = platform.get_command("ffprobe");

        let output = tokio::process::Command::new(ffprobe)
            .args([
                "-v",
                "quiet",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
                video_str,
            ])
            .output()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to execute ffprobe: {}", e))?;

        if !output.status.success() {
            return Err(ConvertError::FFmpeg(
                String::from_utf8_lossy(&output.stderr).to_string(),
            )
            .into());
        }

        let info_str = String::from_utf8_lossy(&output.stdout);
        let info: serde_json::Value = serde_json::from_str(&info_str)?;

        Ok(Self::parse_video_info(&info))
    }

    /// Extract the fields we care about from ffprobe JSON output
    fn parse_video_info(info: &serde_json::Value) -> VideoInfo {
        let format = &info["format"];
        let duration = format["duration"]
            .as_str()
            .and_then(|d| d.parse::<f64>().ok())
            .unwrap_or(0.0);

        let bitrate = format["bit_rate"]
            .as_str()
            .and_then(|b| b.parse::<u64>().ok())
            .unwrap_or(0);

        let empty_vec = vec![];
        let streams = info["streams"].as_array().unwrap_or(&empty_vec);
        let video_stream = streams
            .iter()
            .find(|s| s["codec_type"] == "video")
            .unwrap_or(&serde_json::Value::Null);

        let width = video_stream["width"].as_u64().unwrap_or(0) as u32;
        let height = video_stream["height"].as_u64().unwrap_or(0) as u32;
        let codec = video_stream["codec_name"]
            .as_str()
            .unwrap_or("unknown")
            .to_string();

        VideoInfo {
            duration,
            bitrate,
            width,
            height,
            codec,
        }
    }

    /// Check if required tools are available
    pub async fn check_dependencies() -> Result<()> {
        let platform = PlatformCommands::instance();
        let tools = ["ffmpeg", "ffprobe"];

        for tool in &tools {
            if !platform.is_command_available(tool).await {
                return Err(ConvertError::MissingDependency(format!(
                    "{} is required for video conversion",
                    tool
                ))
                .into());
            }
        }

        Ok(())
    }
}

/// Video file information
#[derive(Debug, Clone)]
pub struct VideoInfo {
    pub duration: f64,
    pub bitrate: u64,
    pub width: u32,
    pub height: u32,
    pub codec: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_encode_args_without_scale() {
        let args = VideoProcessor::build_encode_args("in.mov", "out.mp4", 26, "128k", None);
        assert_eq!(
            args,
            vec![
                "-i", "in.mov", "-c:v", "libx264", "-preset", "medium", "-crf", "26", "-c:a",
                "aac", "-b:a", "128k", "-map_metadata", "0", "-movflags", "+faststart",
                "-pix_fmt", "yuv420p", "-y", "out.mp4"
            ]
        );
    }

    #[test]
    fn test_build_encode_args_with_scale() {
        let args = VideoProcessor::build_encode_args("in.avi", "out.mp4", 24, "192k", Some(1280));
        let joined = args.join(" ");
        assert!(joined.contains("-vf scale=1280:-2"));
        assert!(joined.contains("-crf 24"));
        assert!(joined.contains("-b:a 192k"));
        // The scale filter sits between the video and audio codec options
        let vf_pos = args.iter().position(|a| a == "-vf").unwrap();
        let aac_pos = args.iter().position(|a| a == "aac").unwrap();
        assert!(vf_pos < aac_pos);
    }

    #[test]
    fn test_parse_video_info() {
        let probe = json!({
            "format": {
                "duration": "12.480000",
                "bit_rate": "1205000"
            },
            "streams": [
                { "codec_type": "audio", "codec_name": "aac" },
                {
                    "codec_type": "video",
                    "codec_name": "h264",
                    "width": 1920,
                    "height": 1080
                }
            ]
        });

        let info = VideoProcessor::parse_video_info(&probe);
        assert_eq!(info.width, 1920);
        assert_eq!(info.height, 1080);
        assert_eq!(info.codec, "h264");
        assert_eq!(info.bitrate, 1_205_000);
        assert!((info.duration - 12.48).abs() < 1e-9);
    }

    #[test]
    fn test_parse_video_info_handles_missing_fields() {
        let info = VideoProcessor::parse_video_info(&json!({}));
        assert_eq!(info.width, 0);
        assert_eq!(info.height, 0);
        assert_eq!(info.codec, "unknown");
        assert_eq!(info.duration, 0.0);
    }
}
