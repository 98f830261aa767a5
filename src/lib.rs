//! pdfwidget - a PDF page viewer
//!
//! Renders a document's pages to encoded images once, then pages through them
//! with clicks or arrow keys. Rasterization is delegated to PDFium and display
//! to an `iced` window.

pub mod engine;
pub mod error;
pub mod input;
pub mod options;
pub mod pdf;
pub mod ui;
pub mod viewer;

pub use error::{Result, ViewerError};
pub use input::{InputEvent, KeyMap, NavigationAction, NavigationMode};
pub use options::{JpegOptions, OutputFormat, RenderOptions};
pub use pdf::{load_pdf, load_pdf_any, load_pdf_with, DocumentSource, PageSequence, PdfiumRasterizer, Rasterizer};
pub use ui::{ViewerApp, ViewerConfig};
pub use viewer::{DisplaySurface, PdfViewer};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::input::{InputEvent, NavigationMode};
    pub use crate::options::{OutputFormat, RenderOptions};
    pub use crate::pdf::{load_pdf, DocumentSource, Rasterizer};
    pub use crate::ui::{ViewerApp, ViewerConfig};
    pub use crate::viewer::{DisplaySurface, PdfViewer};
}
