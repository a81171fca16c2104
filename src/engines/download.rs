//! Engine asset cache shared by the ocrs and tesseract backends

use crate::error::OcrError;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Resolve (and create) the cache directory for downloaded engine assets
pub fn cache_dir(custom: Option<&Path>, subdir: &str) -> Result<PathBuf, OcrError> {
    let base = match custom {
        Some(dir) => dir.to_path_buf(),
        None => dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("skincare-analyzer"),
    };
    let dir = if subdir.is_empty() { base } else { base.join(subdir) };

    std::fs::create_dir_all(&dir).map_err(|e| {
        OcrError::InitializationError(format!(
            "Failed to create cache directory {}: {}",
            dir.display(),
            e
        ))
    })?;

    Ok(dir)
}

/// Ensure `filename` exists in `dir`, downloading it from `url` if needed
pub fn ensure_downloaded(url: &str, dir: &Path, filename: &str) -> Result<PathBuf, OcrError> {
    let path = dir.join(filename);

    if path.exists() {
        tracing::info!("Using cached {} from {:?}", filename, path);
        return Ok(path);
    }

    tracing::info!("Downloading {} (this may take a moment)...", filename);
    download_file(url, dir, &path)?;
    tracing::info!("Downloaded {} to {:?}", filename, path);

    Ok(path)
}

/// Download into a temp file next to `path`, then move it into place
fn download_file(url: &str, dir: &Path, path: &Path) -> Result<(), OcrError> {
    let response = ureq::get(url)
        .call()
        .map_err(|e| OcrError::InitializationError(format!("Failed to download {}: {}", url, e)))?;

    let buffer = response.into_body().read_to_vec().map_err(|e| {
        OcrError::InitializationError(format!("Failed to read response body: {}", e))
    })?;

    let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(|e| {
        OcrError::InitializationError(format!("Failed to create download file: {}", e))
    })?;

    temp.write_all(&buffer)
        .map_err(|e| OcrError::InitializationError(format!("Failed to write download: {}", e)))?;

    temp.persist(path).map_err(|e| {
        OcrError::InitializationError(format!("Failed to store {}: {}", path.display(), e))
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_dir_uses_custom_root() {
        let root = tempfile::tempdir().unwrap();
        let dir = cache_dir(Some(root.path()), "tessdata").unwrap();
        assert_eq!(dir, root.path().join("tessdata"));
        assert!(dir.is_dir());
    }

    #[test]
    fn test_cached_file_is_not_downloaded() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join("model.rten"), b"cached").unwrap();

        // An unroutable URL proves no request is made for cached files
        let path = ensure_downloaded("http://invalid.invalid/model.rten", root.path(), "model.rten")
            .unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"cached");
    }
}
