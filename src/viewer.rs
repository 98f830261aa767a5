//! Page cursor and navigation over a rendered document

use crate::error::{Result, ViewerError};
use crate::input::{InputEvent, KeyMap, NavigationAction, NavigationMode};
use crate::options::RenderOptions;
use crate::pdf::{load_pdf_with, DocumentSource, PageSequence, PdfiumRasterizer, Rasterizer};
use image::GenericImageView;
use log::{debug, info};

/// Where the current page's encoded bytes are shown
pub trait DisplaySurface {
    fn set_value(&mut self, bytes: &[u8]);
}

/// A document viewer over a display surface.
///
/// Unloaded until the first successful [`PdfViewer::load`]; from then on the
/// cursor always points at a valid page and the surface shows that page.
pub struct PdfViewer<S: DisplaySurface> {
    surface: S,
    sequence: PageSequence,
    cursor: Option<usize>,
    mode: NavigationMode,
    keymap: KeyMap,
}

impl<S: DisplaySurface> PdfViewer<S> {
    /// Create an unloaded viewer with `mode` as its only input binding
    pub fn new(surface: S, mode: NavigationMode) -> Self {
        Self {
            surface,
            sequence: PageSequence::default(),
            cursor: None,
            mode,
            keymap: KeyMap::new(),
        }
    }

    /// Render `source` with PDFium and show its first page
    pub fn load(
        &mut self,
        source: impl Into<DocumentSource>,
        options: &RenderOptions,
    ) -> Result<()> {
        self.load_with(&PdfiumRasterizer, source, options)
    }

    /// Render `source` with `rasterizer` and show its first page.
    ///
    /// State is only replaced once rendering succeeded; a failed load leaves
    /// whatever was loaded before on display.
    pub fn load_with<R: Rasterizer + ?Sized>(
        &mut self,
        rasterizer: &R,
        source: impl Into<DocumentSource>,
        options: &RenderOptions,
    ) -> Result<()> {
        let sequence = load_pdf_with(rasterizer, &source.into(), options)?;
        if sequence.is_empty() {
            return Err(ViewerError::EmptyDocument);
        }

        self.sequence = sequence;
        self.cursor = Some(0);
        self.keymap = KeyMap::arrows();
        self.show_current();
        info!("Loaded {} pages", self.sequence.len());
        Ok(())
    }

    /// Go back one page, stopping at the first
    pub fn previous_page(&mut self) -> bool {
        match self.cursor {
            Some(index) if index > 0 => {
                self.cursor = Some(index - 1);
                self.show_current();
                true
            }
            _ => false,
        }
    }

    /// Go forward one page, stopping at the last
    pub fn next_page(&mut self) -> bool {
        match self.cursor {
            Some(index) if index + 1 < self.sequence.len() => {
                self.cursor = Some(index + 1);
                self.show_current();
                true
            }
            _ => false,
        }
    }

    pub fn apply(&mut self, action: NavigationAction) -> bool {
        match action {
            NavigationAction::PrevPage => self.previous_page(),
            NavigationAction::NextPage => self.next_page(),
        }
    }

    /// Feed an event through the installed binding; returns the action that fired
    pub fn handle_event(&mut self, event: &InputEvent) -> Option<NavigationAction> {
        if !self.mode.watched_events().contains(&event.kind()) {
            return None;
        }

        let page_width = self.current_page_size().map(|(width, _)| width);
        let action = self.mode.resolve(event, &self.keymap, page_width);

        match action {
            Some(action) => {
                self.apply(action);
            }
            None => debug!("No action for {:?}", event),
        }
        action
    }

    pub fn mode(&self) -> NavigationMode {
        self.mode
    }

    pub fn is_loaded(&self) -> bool {
        self.cursor.is_some()
    }

    /// Index of the page on display
    pub fn current_page(&self) -> Option<usize> {
        self.cursor
    }

    pub fn page_count(&self) -> usize {
        self.sequence.len()
    }

    /// Pixel size of the page on display
    pub fn current_page_size(&self) -> Option<(u32, u32)> {
        self.cursor
            .and_then(|index| self.sequence.image(index))
            .map(|image| image.dimensions())
    }

    pub fn current_value(&self) -> Option<&[u8]> {
        self.cursor.and_then(|index| self.sequence.page(index))
    }

    pub fn pages(&self) -> &PageSequence {
        &self.sequence
    }

    pub fn keymap(&self) -> &KeyMap {
        &self.keymap
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    fn show_current(&mut self) {
        if let Some(bytes) = self.cursor.and_then(|index| self.sequence.page(index)) {
            self.surface.set_value(bytes);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};

    #[derive(Default)]
    struct RecordingSurface {
        writes: Vec<Vec<u8>>,
    }

    impl DisplaySurface for RecordingSurface {
        fn set_value(&mut self, bytes: &[u8]) {
            self.writes.push(bytes.to_vec());
        }
    }

    struct BlankPages(usize);

    impl Rasterizer for BlankPages {
        fn rasterize(&self, _: &DocumentSource, _: &RenderOptions) -> Result<Vec<DynamicImage>> {
            Ok((0..self.0)
                .map(|i| DynamicImage::ImageRgb8(RgbImage::new(100 + i as u32, 50)))
                .collect())
        }
    }

    struct Broken;

    impl Rasterizer for Broken {
        fn rasterize(&self, _: &DocumentSource, _: &RenderOptions) -> Result<Vec<DynamicImage>> {
            Err(ViewerError::LoadError("corrupt".to_string()))
        }
    }

    fn loaded(pages: usize, mode: NavigationMode) -> PdfViewer<RecordingSurface> {
        let mut viewer = PdfViewer::new(RecordingSurface::default(), mode);
        viewer
            .load_with(&BlankPages(pages), Vec::<u8>::new(), &RenderOptions::new())
            .unwrap();
        viewer
    }

    #[test]
    fn test_new_viewer_is_unloaded() {
        let mut viewer = PdfViewer::new(RecordingSurface::default(), NavigationMode::Arrow);
        assert!(!viewer.is_loaded());
        assert_eq!(viewer.current_page(), None);
        assert!(!viewer.next_page());
        assert!(!viewer.previous_page());
        assert!(viewer.surface().writes.is_empty());
        assert!(viewer.keymap().is_empty());
    }

    #[test]
    fn test_load_shows_first_page() {
        let viewer = loaded(3, NavigationMode::Arrow);
        assert_eq!(viewer.current_page(), Some(0));
        assert_eq!(viewer.page_count(), 3);
        assert_eq!(viewer.surface().writes.len(), 1);
        assert_eq!(viewer.surface().writes[0], viewer.pages().page(0).unwrap());
        assert_eq!(viewer.keymap(), &KeyMap::arrows());
    }

    #[test]
    fn test_cursor_saturates_at_both_ends() {
        let mut viewer = loaded(3, NavigationMode::Arrow);

        assert!(!viewer.previous_page());
        assert_eq!(viewer.current_page(), Some(0));

        assert!(viewer.next_page());
        assert!(viewer.next_page());
        assert!(!viewer.next_page());
        assert_eq!(viewer.current_page(), Some(2));
        assert_eq!(viewer.current_value(), viewer.pages().page(2));
    }

    #[test]
    fn test_noop_navigation_leaves_surface_alone() {
        let mut viewer = loaded(1, NavigationMode::Arrow);
        viewer.previous_page();
        viewer.next_page();
        assert_eq!(viewer.surface().writes.len(), 1);
    }

    #[test]
    fn test_reload_resets_cursor() {
        let mut viewer = loaded(4, NavigationMode::Arrow);
        viewer.next_page();
        viewer.next_page();

        viewer
            .load_with(&BlankPages(2), Vec::<u8>::new(), &RenderOptions::new())
            .unwrap();
        assert_eq!(viewer.current_page(), Some(0));
        assert_eq!(viewer.page_count(), 2);
        assert_eq!(viewer.surface().writes.last().map(Vec::as_slice), viewer.pages().page(0));
    }

    #[test]
    fn test_failed_load_keeps_previous_document() {
        let mut viewer = loaded(3, NavigationMode::Arrow);
        viewer.next_page();

        assert!(viewer.load_with(&Broken, Vec::<u8>::new(), &RenderOptions::new()).is_err());
        assert_eq!(viewer.current_page(), Some(1));
        assert_eq!(viewer.page_count(), 3);
    }

    #[test]
    fn test_empty_document_is_rejected() {
        let mut viewer = PdfViewer::new(RecordingSurface::default(), NavigationMode::Arrow);
        let err = viewer
            .load_with(&BlankPages(0), Vec::<u8>::new(), &RenderOptions::new())
            .unwrap_err();
        assert!(matches!(err, ViewerError::EmptyDocument));
        assert!(!viewer.is_loaded());
    }

    #[test]
    fn test_click_uses_current_page_width() {
        let mut viewer = loaded(3, NavigationMode::Click);
        assert_eq!(viewer.current_page_size(), Some((100, 50)));

        assert_eq!(
            viewer.handle_event(&InputEvent::Click { x: 80.0 }),
            Some(NavigationAction::NextPage)
        );
        // page 1 is 101 pixels wide
        assert_eq!(viewer.handle_event(&InputEvent::Click { x: 50.5 }), None);
        assert_eq!(viewer.current_page(), Some(1));
        assert_eq!(
            viewer.handle_event(&InputEvent::Click { x: 3.0 }),
            Some(NavigationAction::PrevPage)
        );
        assert_eq!(viewer.current_page(), Some(0));
    }

    #[test]
    fn test_arrow_mode_ignores_clicks_and_unknown_keys() {
        let mut viewer = loaded(3, NavigationMode::Arrow);
        assert_eq!(viewer.handle_event(&InputEvent::Click { x: 99.0 }), None);
        assert_eq!(viewer.handle_event(&InputEvent::key("Enter")), None);
        assert_eq!(viewer.current_page(), Some(0));

        viewer.handle_event(&InputEvent::key("ArrowRight"));
        assert_eq!(viewer.current_page(), Some(1));
        viewer.handle_event(&InputEvent::key("ArrowLeft"));
        assert_eq!(viewer.current_page(), Some(0));
    }
}
