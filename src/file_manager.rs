//! # File Management Module
//!
//! Questo modulo gestisce la discovery dei file media e le utilità sui file.
//!
//! ## Responsabilità:
//! - Discovery ricorsiva di file media nell'albero di input
//! - Classificazione dei file (immagine vs video) in base all'estensione
//! - Dimensioni file e formattazione human-readable
//!
//! ## Formati supportati:
//! - **Immagini**: JPG, JPEG, PNG, WebP, TIFF
//! - **Video**: MP4, MOV, AVI, MKV, WebM
//!
//! La discovery ritorna i file in ordine deterministico (ordinamento
//! lessicografico dei path) perché il loop di conversione è sequenziale e
//! i prompt del custom mode devono presentarsi sempre nello stesso ordine.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tokio::fs;
use walkdir::WalkDir;

/// Manages file discovery and classification
pub struct FileManager;

impl FileManager {
    /// Get the size in bytes of a file
    pub async fn get_file_size(path: &Path) -> Result<u64> {
        let metadata = fs::metadata(path).await?;
        Ok(metadata.len())
    }

    /// Find all supported media files in a directory, in deterministic order
    pub fn find_media_files(media_dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(media_dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let path = entry.path();
            if Self::is_supported_format(path) {
                files.push(path.to_path_buf());
            }
        }

        files.sort();

        Ok(files)
    }

    /// Check if a file format is supported
    pub fn is_supported_format(path: &Path) -> bool {
        Self::is_image(path) || Self::is_video(path)
    }

    /// Check if a file is an image
    pub fn is_image(path: &Path) -> bool {
        if let Some(ext) = path.extension() {
            let ext_lower = ext.to_string_lossy().to_lowercase();
            matches!(
                ext_lower.as_str(),
                "jpg" | "jpeg" | "png" | "webp" | "tiff" | "tif"
            )
        } else {
            false
        }
    }

    /// Check if a file is a video
    pub fn is_video(path: &Path) -> bool {
        if let Some(ext) = path.extension() {
            let ext_lower = ext.to_string_lossy().to_lowercase();
            matches!(ext_lower.as_str(), "mp4" | "mov" | "avi" | "mkv" | "webm")
        } else {
            false
        }
    }

    /// Get human-readable file size
    pub fn format_size(size: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", size as u64, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }

    /// Calculate percentage reduction
    pub fn calculate_reduction(original_size: u64, new_size: u64) -> f64 {
        if original_size == 0 {
            0.0
        } else {
            ((original_size as f64 - new_size as f64) / original_size as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_classification() {
        assert!(FileManager::is_image(Path::new("photo.jpg")));
        assert!(FileManager::is_image(Path::new("photo.JPEG")));
        assert!(FileManager::is_image(Path::new("scan.tiff")));
        assert!(!FileManager::is_image(Path::new("clip.mp4")));

        assert!(FileManager::is_video(Path::new("clip.mp4")));
        assert!(FileManager::is_video(Path::new("clip.MOV")));
        assert!(!FileManager::is_video(Path::new("photo.png")));

        assert!(!FileManager::is_supported_format(Path::new("notes.txt")));
        assert!(!FileManager::is_supported_format(Path::new("no_extension")));
    }

    #[test]
    fn test_find_media_files_recurses_and_sorts() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("2023").join("vacation");
        std::fs::create_dir_all(&nested).unwrap();

        std::fs::write(dir.path().join("b.jpg"), b"x").unwrap();
        std::fs::write(dir.path().join("a.mp4"), b"x").unwrap();
        std::fs::write(nested.join("c.png"), b"x").unwrap();
        std::fs::write(dir.path().join("ignore.txt"), b"x").unwrap();

        let files = FileManager::find_media_files(dir.path()).unwrap();
        assert_eq!(files.len(), 3);

        let mut sorted = files.clone();
        sorted.sort();
        assert_eq!(files, sorted);
        assert!(files.iter().any(|f| f.ends_with("2023/vacation/c.png")));
    }

    #[test]
    fn test_format_size() {
        assert_eq!(FileManager::format_size(512), "512 B");
        assert_eq!(FileManager::format_size(1024), "1.00 KB");
        assert_eq!(FileManager::format_size(1536), "1.50 KB");
        assert_eq!(FileManager::format_size(1024 * 1024), "1.00 MB");
    }

    #[test]
    fn test_calculate_reduction() {
        assert_eq!(FileManager::calculate_reduction(100, 25), 75.0);
        assert_eq!(FileManager::calculate_reduction(0, 25), 0.0);
        assert!(FileManager::calculate_reduction(100, 150) < 0.0);
    }

    #[tokio::test]
    async fn test_get_file_size() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("file.bin");
        std::fs::write(&path, vec![0u8; 2048]).unwrap();

        let size = FileManager::get_file_size(&path).await.unwrap();
        assert_eq!(size, 2048);
    }
}
