//! Rendering options passed through to the rasterizer

use clap::ValueEnum;
use image::ImageFormat;
use std::path::PathBuf;

/// Resolution used when none is given.
pub const DEFAULT_DPI: f32 = 200.0;

/// PDF user space units per inch.
pub const POINTS_PER_INCH: f32 = 72.0;

/// Encoding of the page buffers handed to the display surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Bmp,
    Png,
    Jpeg,
    Tiff,
    Ppm,
    Gif,
    Webp,
}

impl OutputFormat {
    pub fn image_format(self) -> ImageFormat {
        match self {
            OutputFormat::Bmp => ImageFormat::Bmp,
            OutputFormat::Png => ImageFormat::Png,
            OutputFormat::Jpeg => ImageFormat::Jpeg,
            OutputFormat::Tiff => ImageFormat::Tiff,
            OutputFormat::Ppm => ImageFormat::Pnm,
            OutputFormat::Gif => ImageFormat::Gif,
            OutputFormat::Webp => ImageFormat::WebP,
        }
    }

    /// Whether an alpha channel survives encoding in this format
    pub fn supports_alpha(self) -> bool {
        matches!(
            self,
            OutputFormat::Png | OutputFormat::Tiff | OutputFormat::Gif | OutputFormat::Webp
        )
    }
}

/// JPEG-only encoder settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JpegOptions {
    /// 1-100
    pub quality: u8,
    pub progressive: bool,
    pub optimize: bool,
}

impl Default for JpegOptions {
    fn default() -> Self {
        Self {
            quality: 75,
            progressive: false,
            optimize: false,
        }
    }
}

/// Configuration for a single render of a document.
///
/// Page bounds are 1-based and inclusive. Nothing here is validated up front;
/// out-of-range bounds are clamped to the document when it is rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub dpi: Option<f32>,
    pub format: OutputFormat,
    pub jpeg: JpegOptions,
    pub first_page: Option<usize>,
    pub last_page: Option<usize>,
    /// Upper bound on encoding workers
    pub thread_count: usize,
    pub password: Option<String>,
    /// Render the crop box instead of the media box
    pub use_cropbox: bool,
    pub transparent: bool,
    /// Directory searched first for the PDFium shared library
    pub pdfium_path: Option<PathBuf>,
    pub grayscale: bool,
    pub hide_annotations: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            dpi: None,
            format: OutputFormat::default(),
            jpeg: JpegOptions::default(),
            first_page: None,
            last_page: None,
            thread_count: 1,
            password: None,
            use_cropbox: false,
            transparent: false,
            pdfium_path: None,
            grayscale: false,
            hide_annotations: false,
        }
    }
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dpi(mut self, dpi: f32) -> Self {
        self.dpi = Some(dpi);
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_jpeg(mut self, jpeg: JpegOptions) -> Self {
        self.jpeg = jpeg;
        self
    }

    pub fn with_page_range(mut self, first: Option<usize>, last: Option<usize>) -> Self {
        self.first_page = first;
        self.last_page = last;
        self
    }

    pub fn with_thread_count(mut self, thread_count: usize) -> Self {
        self.thread_count = thread_count;
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn with_cropbox(mut self, use_cropbox: bool) -> Self {
        self.use_cropbox = use_cropbox;
        self
    }

    pub fn with_transparent(mut self, transparent: bool) -> Self {
        self.transparent = transparent;
        self
    }

    pub fn with_pdfium_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.pdfium_path = Some(path.into());
        self
    }

    pub fn with_grayscale(mut self, grayscale: bool) -> Self {
        self.grayscale = grayscale;
        self
    }

    pub fn with_hide_annotations(mut self, hide: bool) -> Self {
        self.hide_annotations = hide;
        self
    }

    /// Scale factor from PDF points to output pixels
    pub fn scale(&self) -> f32 {
        self.dpi.unwrap_or(DEFAULT_DPI) / POINTS_PER_INCH
    }

    /// Zero-based, half-open range of pages to render out of `page_count`
    pub fn page_range(&self, page_count: usize) -> std::ops::Range<usize> {
        let first = self.first_page.unwrap_or(1).max(1) - 1;
        let last = self.last_page.unwrap_or(page_count).min(page_count);
        if first >= last { first.min(page_count)..first.min(page_count) } else { first..last }
    }
}
