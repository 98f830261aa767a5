//! Rendering against the real PDFium library.
//!
//! Run with `cargo test -- --ignored` on a machine with libpdfium installed.

use pdfwidget::error::ViewerError;
use pdfwidget::options::{OutputFormat, RenderOptions};
use pdfwidget::pdf::{load_pdf, DocumentSource};
use std::io::Write;

/// Serialise numbered objects (1-based, object 1 is the catalog) into a PDF file
fn build_pdf(objects: &[String], trailer_extra: &str) -> Vec<u8> {
    let mut pdf = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::new();
    for (i, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
    }

    let xref = pdf.len();
    pdf.extend_from_slice(format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1).as_bytes());
    for offset in offsets {
        pdf.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
    }
    pdf.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R {} >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            trailer_extra,
            xref
        )
        .as_bytes(),
    );
    pdf
}

/// Catalog and page tree for `pages` page objects numbered from 3
fn page_tree(pages: usize) -> Vec<String> {
    vec![
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            (0..pages).map(|i| format!("{} 0 R", i + 3)).collect::<Vec<_>>().join(" "),
            pages
        ),
    ]
}

/// Minimal PDF with `pages` blank pages of 144x72 points
fn blank_pdf(pages: usize) -> Vec<u8> {
    let mut objects = page_tree(pages);
    for _ in 0..pages {
        objects.push("<< /Type /Page /Parent 2 0 R /MediaBox [0 0 144 72] >>".to_string());
    }
    build_pdf(&objects, "")
}

/// One 144x72 page whose crop box is its left half
fn cropped_pdf() -> Vec<u8> {
    let mut objects = page_tree(1);
    objects.push("<< /Type /Page /Parent 2 0 R /MediaBox [0 0 144 72] /CropBox [0 0 72 72] >>".to_string());
    build_pdf(&objects, "")
}

/// One 144x72 page with a square annotation painting its left half black
fn annotated_pdf() -> Vec<u8> {
    let paint = "0 0 0 rg 0 0 72 72 re f";
    let mut objects = page_tree(1);
    objects.push("<< /Type /Page /Parent 2 0 R /MediaBox [0 0 144 72] /Annots [4 0 R] >>".to_string());
    objects.push("<< /Type /Annot /Subtype /Square /Rect [0 0 72 72] /F 4 /AP << /N 5 0 R >> >>".to_string());
    objects.push(format!(
        "<< /Type /XObject /Subtype /Form /BBox [0 0 72 72] /Length {} >>\nstream\n{}\nendstream",
        paint.len(),
        paint
    ));
    build_pdf(&objects, "")
}

/// One page behind the standard security handler with a user password set
fn encrypted_pdf() -> Vec<u8> {
    let mut objects = page_tree(1);
    objects.push("<< /Type /Page /Parent 2 0 R /MediaBox [0 0 144 72] >>".to_string());
    objects.push(format!(
        "<< /Filter /Standard /V 1 /R 2 /O <{}> /U <{}> /P -44 >>",
        "6a".repeat(32),
        "c4".repeat(32)
    ));
    build_pdf(
        &objects,
        "/Encrypt 4 0 R /ID [<0123456789abcdef0123456789abcdef> <0123456789abcdef0123456789abcdef>]",
    )
}

#[test]
#[ignore = "requires libpdfium"]
fn test_pages_scale_with_dpi() {
    let options = RenderOptions::new().with_dpi(144.0).with_format(OutputFormat::Png);
    let seq = load_pdf(blank_pdf(2), &options).unwrap();

    assert_eq!(seq.len(), 2);
    assert_eq!(seq.image(0).unwrap().width(), 288);
    assert_eq!(seq.image(0).unwrap().height(), 144);
}

#[test]
#[ignore = "requires libpdfium"]
fn test_path_and_bytes_give_same_pages() {
    let pdf = blank_pdf(3);
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&pdf).unwrap();
    file.flush().unwrap();

    let options = RenderOptions::new();
    let from_path = load_pdf(DocumentSource::from(file.path()), &options).unwrap();
    let from_bytes = load_pdf(pdf, &options).unwrap();

    assert_eq!(from_path.len(), 3);
    assert_eq!(from_path.len(), from_bytes.len());
    for (a, b) in from_path.pages().iter().zip(from_bytes.pages()) {
        assert_eq!(a.len(), b.len());
    }
}

#[test]
#[ignore = "requires libpdfium"]
fn test_page_bounds_select_pages() {
    let options = RenderOptions::new().with_page_range(Some(2), Some(3));
    let seq = load_pdf(blank_pdf(5), &options).unwrap();
    assert_eq!(seq.len(), 2);
}

#[test]
#[ignore = "requires libpdfium"]
fn test_garbage_fails_to_load() {
    let result = load_pdf(b"not a pdf".to_vec(), &RenderOptions::new());
    assert!(result.is_err());
}

#[test]
#[ignore = "requires libpdfium"]
fn test_media_box_is_rendered_unless_crop_box_requested() {
    let media = load_pdf(cropped_pdf(), &RenderOptions::new().with_dpi(72.0)).unwrap();
    assert_eq!(media.image(0).unwrap().width(), 144);

    let crop = load_pdf(cropped_pdf(), &RenderOptions::new().with_dpi(72.0).with_cropbox(true)).unwrap();
    assert_eq!(crop.image(0).unwrap().width(), 72);
    assert_eq!(crop.image(0).unwrap().height(), 72);
}

#[test]
#[ignore = "requires libpdfium"]
fn test_transparent_png_has_clear_background() {
    let options = RenderOptions::new()
        .with_dpi(72.0)
        .with_format(OutputFormat::Png)
        .with_transparent(true);
    let seq = load_pdf(blank_pdf(1), &options).unwrap();

    let rgba = seq.image(0).unwrap().to_rgba8();
    assert_eq!(rgba.get_pixel(10, 10)[3], 0);

    let decoded = image::load_from_memory(seq.page(0).unwrap()).unwrap().to_rgba8();
    assert_eq!(decoded.get_pixel(10, 10)[3], 0);
}

#[test]
#[ignore = "requires libpdfium"]
fn test_opaque_render_has_white_background() {
    let seq = load_pdf(blank_pdf(1), &RenderOptions::new().with_dpi(72.0)).unwrap();
    let rgba = seq.image(0).unwrap().to_rgba8();
    assert_eq!(rgba.get_pixel(10, 10).0, [255, 255, 255, 255]);
}

#[test]
#[ignore = "requires libpdfium"]
fn test_hide_annotations_skips_annotation_appearance() {
    let shown = load_pdf(annotated_pdf(), &RenderOptions::new().with_dpi(72.0)).unwrap();
    let shown = shown.image(0).unwrap().to_rgb8();
    assert_eq!(shown.get_pixel(36, 36).0, [0, 0, 0]);

    let hidden = load_pdf(
        annotated_pdf(),
        &RenderOptions::new().with_dpi(72.0).with_hide_annotations(true),
    )
    .unwrap();
    let hidden = hidden.image(0).unwrap().to_rgb8();
    assert_eq!(hidden.get_pixel(36, 36).0, [255, 255, 255]);
}

#[test]
#[ignore = "requires libpdfium"]
fn test_encrypted_document_needs_its_password() {
    let result = load_pdf(encrypted_pdf(), &RenderOptions::new());
    assert!(matches!(result, Err(ViewerError::LoadError(_))));

    let result = load_pdf(encrypted_pdf(), &RenderOptions::new().with_password("wrong"));
    assert!(matches!(result, Err(ViewerError::LoadError(_))));
}
