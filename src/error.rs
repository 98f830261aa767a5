//! Error type shared by the renderer and the viewer

use thiserror::Error;

/// Errors that can occur while rendering or viewing a document.
#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to initialize PDFium: {0}")]
    InitError(String),

    #[error("Failed to load PDF: {0}")]
    LoadError(String),

    #[error("Rendering failed on page {page}: {reason}")]
    RenderError { page: usize, reason: String },

    #[error("Image encoding failed: {0}")]
    ImageError(String),

    #[error("Document has no pages in the requested range")]
    EmptyDocument,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<image::ImageError> for ViewerError {
    fn from(err: image::ImageError) -> Self {
        ViewerError::ImageError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ViewerError>;
