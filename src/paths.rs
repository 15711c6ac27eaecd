//! # Path Resolution Module
//!
//! Centralizza la logica di calcolo dei path di output.
//!
//! L'albero di output rispecchia la struttura relativa dell'albero di input:
//! il prefisso della directory base viene rimosso, la directory relativa
//! viene preservata e il nome file cambia estensione in base al tipo di
//! media (`.webp` per le immagini, `.mp4` per i video).

use crate::file_manager::FileManager;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Utility for computing mirrored output paths
pub struct PathResolver;

impl PathResolver {
    /// Compute the output path for a media file.
    ///
    /// The relative directory of `input_path` under `input_base_dir` is
    /// preserved below `output_dir`. When the prefix does not strip (the
    /// file lives outside the base) the file lands in the output root;
    /// joining the file's absolute parent would escape the output tree.
    pub fn output_path(
        input_path: &Path,
        input_base_dir: &Path,
        output_dir: &Path,
    ) -> Result<PathBuf> {
        let file_stem = input_path
            .file_stem()
            .ok_or_else(|| anyhow::anyhow!("Invalid file name: {}", input_path.display()))?
            .to_string_lossy();

        let extension = Self::output_extension(input_path);
        let filename = format!("{}.{}", file_stem, extension);

        let relative_path = match input_path.strip_prefix(input_base_dir) {
            Ok(rel) => rel.parent().unwrap_or(Path::new("")),
            Err(_) => Path::new(""),
        };

        Ok(output_dir.join(relative_path).join(filename))
    }

    /// The web-friendly extension for a given input file
    fn output_extension(input_path: &Path) -> &'static str {
        if FileManager::is_video(input_path) {
            "mp4"
        } else {
            "webp"
        }
    }

    /// Create the parent directories of an output file if needed
    pub async fn ensure_parent_dirs(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                anyhow::anyhow!(
                    "Failed to create parent directories for {}: {}",
                    path.display(),
                    e
                )
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_path_is_mirrored_as_webp() {
        let out = PathResolver::output_path(
            Path::new("/media/photos/2023/vacation/IMG_001.jpg"),
            Path::new("/media/photos"),
            Path::new("/deploy"),
        )
        .unwrap();

        assert_eq!(out, Path::new("/deploy/2023/vacation/IMG_001.webp"));
    }

    #[test]
    fn test_video_path_is_mirrored_as_mp4() {
        let out = PathResolver::output_path(
            Path::new("/media/clips/intro.mov"),
            Path::new("/media/clips"),
            Path::new("/deploy"),
        )
        .unwrap();

        assert_eq!(out, Path::new("/deploy/intro.mp4"));
    }

    #[test]
    fn test_top_level_file_lands_in_output_root() {
        let out = PathResolver::output_path(
            Path::new("/media/banner.png"),
            Path::new("/media"),
            Path::new("/deploy"),
        )
        .unwrap();

        assert_eq!(out, Path::new("/deploy/banner.webp"));
    }

    #[test]
    fn test_fallback_when_prefix_does_not_strip() {
        let out = PathResolver::output_path(
            Path::new("/elsewhere/pics/shot.jpeg"),
            Path::new("/media"),
            Path::new("/deploy"),
        )
        .unwrap();

        assert_eq!(out, Path::new("/deploy/shot.webp"));
    }

    #[test]
    fn test_invalid_file_name_is_an_error() {
        let result = PathResolver::output_path(
            Path::new("/media/.."),
            Path::new("/media"),
            Path::new("/deploy"),
        );
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_ensure_parent_dirs() {
        let dir = tempfile::TempDir::new().unwrap();
        let target = dir.path().join("a").join("b").join("file.webp");

        PathResolver::ensure_parent_dirs(&target).await.unwrap();
        assert!(target.parent().unwrap().is_dir());
    }
}
