use crate::error::{Result, ViewerError};
use log::{debug, info};
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};

/// Bind to the PDFium library.
///
/// `search_path` is tried first, then the working directory, `/usr/lib`,
/// and finally whatever the system loader finds.
pub fn init_pdfium(search_path: Option<&Path>) -> Result<Pdfium> {
    let lib_name = if cfg!(target_os = "windows") {
        "pdfium.dll"
    } else {
        "libpdfium.so"
    };

    let mut candidates: Vec<PathBuf> = Vec::new();
    if let Some(dir) = search_path {
        candidates.push(PathBuf::from(Pdfium::pdfium_platform_library_name_at_path(dir)));
    }
    candidates.push(format!("./{}", lib_name).into());
    candidates.push(format!("/usr/lib/{}", lib_name).into());

    for candidate in &candidates {
        match Pdfium::bind_to_library(candidate) {
            Ok(bindings) => {
                info!("Loaded PDFium from {}", candidate.display());
                return Ok(Pdfium::new(bindings));
            }
            Err(e) => debug!("PDFium not usable at {}: {}", candidate.display(), e),
        }
    }

    let bindings =
        Pdfium::bind_to_system_library().map_err(|e| ViewerError::InitError(e.to_string()))?;
    info!("Loaded system PDFium library");
    Ok(Pdfium::new(bindings))
}
