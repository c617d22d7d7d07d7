/// Custom eyewear uploads
///
/// The user picks one image file; it is read and decoded off the UI thread
/// and handed back as a `LocalImage` that the catalog takes ownership of.

use rfd::AsyncFileDialog;
use std::path::PathBuf;
use tracing::info;

use crate::errors::UploadError;
use crate::state::data::{DecodedImage, LocalImage};

/// Extensions offered by the file picker
const IMAGE_EXTENSIONS: [&str; 7] = ["png", "jpg", "jpeg", "webp", "gif", "bmp", "tiff"];

/// A decoded upload ready to be added to the catalog
#[derive(Debug, Clone)]
pub struct Upload {
    /// File name without its extension
    pub display_name: String,
    pub image: LocalImage,
}

/// Show the native picker and load the chosen file.
/// Returns `None` when the dialog is cancelled.
pub async fn pick_upload() -> Option<Result<Upload, UploadError>> {
    let file = AsyncFileDialog::new()
        .set_title("Choose an eyewear image")
        .add_filter("Images", &IMAGE_EXTENSIONS[..])
        .pick_file()
        .await?;

    Some(load_upload(file.path().to_path_buf()).await)
}

/// Read and decode an image file
pub async fn load_upload(path: PathBuf) -> Result<Upload, UploadError> {
    let bytes = tokio::fs::read(&path).await.map_err(|e| UploadError::Io {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    tokio::task::spawn_blocking(move || {
        let image = DecodedImage::from_bytes(&bytes).map_err(|e| UploadError::Decode {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        info!(path = %path.display(), width = image.width, height = image.height, "decoded upload");

        Ok(Upload {
            display_name: display_name_from_file_name(&file_name),
            image: LocalImage { file_name, image },
        })
    })
    .await
    .map_err(|e| UploadError::Task(e.to_string()))?
}

/// Strip one trailing extension: "aviator.png" -> "aviator".
/// Falls back to the full name when nothing would be left.
pub fn display_name_from_file_name(file_name: &str) -> String {
    let stem = match file_name.rfind('.') {
        Some(dot) if dot + 1 < file_name.len() && !file_name[dot + 1..].contains('/') => {
            &file_name[..dot]
        }
        _ => file_name,
    };

    if stem.is_empty() {
        file_name.to_string()
    } else {
        stem.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_single_extension() {
        assert_eq!(display_name_from_file_name("aviator.png"), "aviator");
        assert_eq!(display_name_from_file_name("cat.eye.jpeg"), "cat.eye");
    }

    #[test]
    fn test_keeps_names_without_extension() {
        assert_eq!(display_name_from_file_name("round"), "round");
        assert_eq!(display_name_from_file_name("trailing."), "trailing.");
    }

    #[test]
    fn test_dotfile_keeps_full_name() {
        assert_eq!(display_name_from_file_name(".png"), ".png");
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let path = std::env::temp_dir().join("glasses-try-on-no-such-upload.png");
        let result = runtime.block_on(load_upload(path));
        assert!(matches!(result, Err(UploadError::Io { .. })));
    }
}
