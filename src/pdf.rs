//! PDF rendering: turns a document into an ordered sequence of encoded page images

use crate::engine::init_pdfium;
use crate::error::{Result, ViewerError};
use crate::options::{OutputFormat, RenderOptions};
use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use log::{debug, info, warn};
use pdfium_render::prelude::*;
use std::any::Any;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::thread;

/// Where the PDF comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

impl DocumentSource {
    /// Build a source from a dynamically typed value.
    ///
    /// Accepts `String`, `&'static str`, `PathBuf`, `&'static Path` and
    /// `Box<Path>` as paths, and `Vec<u8>`, `&'static [u8]` and `Box<[u8]>` as an
    /// in-memory document. Anything else is rejected.
    pub fn from_any(value: &dyn Any) -> Result<Self> {
        if let Some(path) = value.downcast_ref::<String>() {
            Ok(Self::Path(PathBuf::from(path)))
        } else if let Some(path) = value.downcast_ref::<&str>() {
            Ok(Self::Path(PathBuf::from(path)))
        } else if let Some(path) = value.downcast_ref::<PathBuf>() {
            Ok(Self::Path(path.clone()))
        } else if let Some(path) = value.downcast_ref::<&Path>() {
            Ok(Self::Path(path.to_path_buf()))
        } else if let Some(path) = value.downcast_ref::<Box<Path>>() {
            Ok(Self::Path(path.to_path_buf()))
        } else if let Some(bytes) = value.downcast_ref::<Vec<u8>>() {
            Ok(Self::Bytes(bytes.clone()))
        } else if let Some(bytes) = value.downcast_ref::<&[u8]>() {
            Ok(Self::Bytes(bytes.to_vec()))
        } else if let Some(bytes) = value.downcast_ref::<Box<[u8]>>() {
            Ok(Self::Bytes(bytes.to_vec()))
        } else {
            Err(ViewerError::InvalidArgument(
                "document source must be a path or a byte buffer".to_string(),
            ))
        }
    }

    /// Read a whole document into memory, e.g. from stdin
    pub fn from_reader(mut reader: impl Read) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(Self::Bytes(bytes))
    }
}

impl From<&str> for DocumentSource {
    fn from(path: &str) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

impl From<String> for DocumentSource {
    fn from(path: String) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

impl From<&Path> for DocumentSource {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<PathBuf> for DocumentSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<Vec<u8>> for DocumentSource {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<&[u8]> for DocumentSource {
    fn from(bytes: &[u8]) -> Self {
        Self::Bytes(bytes.to_vec())
    }
}

/// Rendered pages of one document.
///
/// `pages[i]` is the encoded form of `images[i]`.
#[derive(Debug, Clone, Default)]
pub struct PageSequence {
    pages: Vec<Vec<u8>>,
    images: Vec<DynamicImage>,
}

impl PageSequence {
    pub fn new(pages: Vec<Vec<u8>>, images: Vec<DynamicImage>) -> Self {
        debug_assert_eq!(pages.len(), images.len());
        Self { pages, images }
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Encoded bytes of page `index`
    pub fn page(&self, index: usize) -> Option<&[u8]> {
        self.pages.get(index).map(Vec::as_slice)
    }

    pub fn image(&self, index: usize) -> Option<&DynamicImage> {
        self.images.get(index)
    }

    pub fn pages(&self) -> &[Vec<u8>] {
        &self.pages
    }

    pub fn images(&self) -> &[DynamicImage] {
        &self.images
    }

}

/// Something that turns a PDF into decoded page images
pub trait Rasterizer {
    fn rasterize(
        &self,
        source: &DocumentSource,
        options: &RenderOptions,
    ) -> Result<Vec<DynamicImage>>;
}

/// Rasterizer backed by PDFium.
///
/// Pdfium is not Send+Sync, so the library is bound on every call instead of
/// being kept around.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfiumRasterizer;

impl Rasterizer for PdfiumRasterizer {
    fn rasterize(
        &self,
        source: &DocumentSource,
        options: &RenderOptions,
    ) -> Result<Vec<DynamicImage>> {
        let pdfium = init_pdfium(options.pdfium_path.as_deref())?;
        let password = options.password.as_deref();

        let document = match source {
            DocumentSource::Path(path) => pdfium.load_pdf_from_file(path, password),
            DocumentSource::Bytes(bytes) => pdfium.load_pdf_from_byte_slice(bytes, password),
        }
        .map_err(|e| ViewerError::LoadError(e.to_string()))?;

        let page_count = document.pages().len() as usize;
        let range = options.page_range(page_count);
        debug!("Document has {} pages, rendering {:?}", page_count, range);

        let mut render_config = PdfRenderConfig::new()
            .scale_page_by_factor(options.scale())
            .render_annotations(!options.hide_annotations)
            .render_form_data(!options.hide_annotations)
            .use_grayscale_rendering(options.grayscale);
        if options.transparent {
            render_config = render_config.set_clear_color(PdfColor::new(255, 255, 255, 0));
        }

        let mut images = Vec::with_capacity(range.len());
        for index in range {
            let render_error = |e: PdfiumError| ViewerError::RenderError {
                page: index,
                reason: e.to_string(),
            };

            let mut page = document.pages().get(index as u16).map_err(render_error)?;

            // PDFium draws the crop box; widen it to the media box unless asked not to.
            if !options.use_cropbox {
                let media = page.boundaries().media().map_err(render_error)?;
                page.boundaries_mut()
                    .set_crop(media.bounds)
                    .map_err(render_error)?;
            }

            let bitmap = page.render_with_config(&render_config).map_err(render_error)?;
            images.push(bitmap.as_image());
        }

        Ok(images)
    }
}

/// Render `source` with PDFium
pub fn load_pdf(source: impl Into<DocumentSource>, options: &RenderOptions) -> Result<PageSequence> {
    load_pdf_with(&PdfiumRasterizer, &source.into(), options)
}

/// Render a dynamically typed source, rejecting anything that is not a path or bytes
pub fn load_pdf_any(value: &dyn Any, options: &RenderOptions) -> Result<PageSequence> {
    let source = DocumentSource::from_any(value)?;
    load_pdf_with(&PdfiumRasterizer, &source, options)
}

/// Render `source` with any rasterizer and encode every page
pub fn load_pdf_with<R: Rasterizer + ?Sized>(
    rasterizer: &R,
    source: &DocumentSource,
    options: &RenderOptions,
) -> Result<PageSequence> {
    if options.format == OutputFormat::Jpeg && (options.jpeg.progressive || options.jpeg.optimize) {
        warn!("JPEG progressive/optimize are not supported by the encoder, ignoring");
    }

    let images: Vec<DynamicImage> = rasterizer
        .rasterize(source, options)?
        .into_iter()
        .map(|image| prepare_image(image, options))
        .collect();

    let pages = encode_pages(&images, options)?;
    info!("Rendered {} pages as {:?}", pages.len(), options.format);

    Ok(PageSequence::new(pages, images))
}

/// Normalise the pixel layout to what the output format can carry
fn prepare_image(image: DynamicImage, options: &RenderOptions) -> DynamicImage {
    let keep_alpha = options.transparent && options.format.supports_alpha();

    match (options.grayscale, keep_alpha) {
        (true, true) if options.format == OutputFormat::Png => {
            DynamicImage::ImageLumaA8(image.to_luma_alpha8())
        }
        (true, true) => DynamicImage::ImageRgba8(image.grayscale().to_rgba8()),
        (true, false) if options.format == OutputFormat::Gif => {
            DynamicImage::ImageRgb8(image.grayscale().to_rgb8())
        }
        (true, false) => DynamicImage::ImageLuma8(image.to_luma8()),
        (false, true) => DynamicImage::ImageRgba8(image.to_rgba8()),
        (false, false) => DynamicImage::ImageRgb8(image.to_rgb8()),
    }
}

/// Encode one page image in the configured format
pub fn encode_page(image: &DynamicImage, options: &RenderOptions) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();

    match options.format {
        OutputFormat::Jpeg => {
            let encoder = JpegEncoder::new_with_quality(&mut bytes, options.jpeg.quality.clamp(1, 100));
            image.write_with_encoder(encoder)?;
        }
        format => image.write_to(&mut Cursor::new(&mut bytes), format.image_format())?,
    }

    Ok(bytes)
}

/// Encode all pages, split across up to `thread_count` workers, keeping page order
fn encode_pages(images: &[DynamicImage], options: &RenderOptions) -> Result<Vec<Vec<u8>>> {
    let workers = options.thread_count.clamp(1, images.len().max(1));
    if workers == 1 {
        return images.iter().map(|image| encode_page(image, options)).collect();
    }

    let chunk_size = images.len().div_ceil(workers);
    debug!("Encoding {} pages on {} workers", images.len(), workers);

    thread::scope(|scope| {
        let handles: Vec<_> = images
            .chunks(chunk_size)
            .map(|chunk| {
                scope.spawn(move || {
                    chunk
                        .iter()
                        .map(|image| encode_page(image, options))
                        .collect::<Result<Vec<_>>>()
                })
            })
            .collect();

        let mut pages = Vec::with_capacity(images.len());
        for handle in handles {
            let chunk = handle
                .join()
                .map_err(|_| ViewerError::ImageError("encoding worker panicked".to_string()))??;
            pages.extend(chunk);
        }
        Ok(pages)
    })
}
