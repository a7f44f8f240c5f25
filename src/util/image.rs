//! Image file selection rules shared by the post and profile editors.
//!
//! A selection is validated before any preview is produced; a rejected file
//! never replaces what the slot already shows.

use std::path::Path;

/// Largest accepted upload, 5 MiB.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

pub const ALLOWED_IMAGE_TYPES: [&str; 5] = ["image/jpeg", "image/jpg", "image/png", "image/gif", "image/webp"];

pub const INVALID_TYPE_MESSAGE: &str = "Please select a valid image file (JPEG, PNG, GIF, or WebP)";
pub const TOO_LARGE_MESSAGE: &str = "Image must be smaller than 5MB";

/// A file picked by the user, held in memory until submission.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageFile")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl ImageFile {
    #[must_use]
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { file_name: file_name.into(), mime_type: mime_type.into(), bytes }
    }

    /// Read a file from disk, inferring its MIME type from the extension.
    ///
    /// # Errors
    ///
    /// Returns the underlying IO error if the file cannot be read.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map_or_else(|| "upload".to_owned(), |name| name.to_string_lossy().into_owned());
        Ok(Self { mime_type: mime_from_path(path).to_owned(), file_name, bytes })
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

#[must_use]
pub fn mime_from_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Check type first, then size. Returns the user-facing rejection message.
///
/// # Errors
///
/// Returns [`INVALID_TYPE_MESSAGE`] or [`TOO_LARGE_MESSAGE`].
pub fn validate_image(file: &ImageFile) -> Result<(), &'static str> {
    let mime = file.mime_type.to_ascii_lowercase();
    if !ALLOWED_IMAGE_TYPES.contains(&mime.as_str()) {
        return Err(INVALID_TYPE_MESSAGE);
    }
    if file.size() > MAX_IMAGE_BYTES {
        return Err(TOO_LARGE_MESSAGE);
    }
    Ok(())
}

/// What an image slot currently displays.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImagePreview {
    /// An image already stored by the backend.
    Remote(String),
    /// A newly selected local file, not yet uploaded.
    Local { file_name: String, mime_type: String, size: usize },
}

impl ImagePreview {
    fn of(file: &ImageFile) -> Self {
        Self::Local { file_name: file.file_name.clone(), mime_type: file.mime_type.clone(), size: file.size() }
    }
}

/// Pending-image state for a form: the selected file plus its preview.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImageSlot {
    pending: Option<ImageFile>,
    preview: Option<ImagePreview>,
}

impl ImageSlot {
    /// Slot showing an image the backend already has, if any.
    #[must_use]
    pub fn with_remote(url: Option<&str>) -> Self {
        Self { pending: None, preview: url.map(|url| ImagePreview::Remote(url.to_owned())) }
    }

    /// Validate and accept `file`. On rejection the slot is left untouched.
    ///
    /// # Errors
    ///
    /// Returns the rejection message from [`validate_image`].
    pub fn select(&mut self, file: ImageFile) -> Result<(), &'static str> {
        validate_image(&file)?;
        self.preview = Some(ImagePreview::of(&file));
        self.pending = Some(file);
        Ok(())
    }

    /// Drop a pending selection, restoring `fallback` as the preview.
    pub fn clear(&mut self, fallback: Option<&str>) {
        self.pending = None;
        self.preview = fallback.map(|url| ImagePreview::Remote(url.to_owned()));
    }

    #[must_use]
    pub fn pending(&self) -> Option<&ImageFile> {
        self.pending.as_ref()
    }

    #[must_use]
    pub fn preview(&self) -> Option<&ImagePreview> {
        self.preview.as_ref()
    }
}

#[cfg(test)]
#[path = "image_test.rs"]
mod tests;
