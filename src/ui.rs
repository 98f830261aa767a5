//! UI components and viewer application

use crate::input::{key_name, InputEvent, NavigationMode};
use crate::options::RenderOptions;
use crate::pdf::DocumentSource;
use crate::viewer::{DisplaySurface, PdfViewer};
use iced::widget::{column, container, image, text};
use iced::{event, keyboard, mouse, window, Element, Event, Length, Point, Size, Subscription, Task};
use log::{error, info};

/// Height of the status bar under the page
pub const STATUS_BAR_HEIGHT: f32 = 44.0;

/// Configuration for the viewer window
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub initial_window_width: f32,
    pub initial_window_height: f32,
    pub navigation: NavigationMode,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            initial_window_width: 800.0,
            initial_window_height: 600.0,
            navigation: NavigationMode::default(),
        }
    }
}

/// Display surface backed by an `iced` image handle
#[derive(Debug, Clone, Default)]
pub struct ImageSurface {
    handle: Option<image::Handle>,
}

impl ImageSurface {
    pub fn handle(&self) -> Option<&image::Handle> {
        self.handle.as_ref()
    }
}

impl DisplaySurface for ImageSurface {
    fn set_value(&mut self, bytes: &[u8]) {
        self.handle = Some(image::Handle::from_bytes(bytes.to_vec()));
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    EventOccurred(Event),
}

/// Main viewer application
pub struct ViewerApp {
    viewer: PdfViewer<ImageSurface>,
    window_size: Size,
    cursor_position: Option<Point>,
}

impl ViewerApp {
    /// Render `source` and open it; a failed load leaves an empty viewer
    pub fn new(
        source: DocumentSource,
        options: &RenderOptions,
        config: &ViewerConfig,
    ) -> (Self, Task<Message>) {
        let mut viewer = PdfViewer::new(ImageSurface::default(), config.navigation);

        if let Err(e) = viewer.load(source, options) {
            error!("Could not open document: {}", e);
        }

        (Self::with_viewer(viewer, config), Task::none())
    }

    /// Wrap a viewer that has already been set up
    pub fn with_viewer(viewer: PdfViewer<ImageSurface>, config: &ViewerConfig) -> Self {
        Self {
            viewer,
            window_size: Size::new(config.initial_window_width, config.initial_window_height),
            cursor_position: None,
        }
    }

    pub fn viewer(&self) -> &PdfViewer<ImageSurface> {
        &self.viewer
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        let Message::EventOccurred(event) = message;

        match event {
            Event::Keyboard(keyboard::Event::KeyPressed { key, .. }) => {
                if let Some(name) = key_name(&key) {
                    self.viewer.handle_event(&InputEvent::KeyDown { key: name });
                }
            }
            Event::Mouse(mouse::Event::CursorMoved { position }) => {
                self.cursor_position = Some(position);
            }
            Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                let click = self
                    .cursor_position
                    .zip(self.viewer.current_page_size())
                    .and_then(|(position, page)| window_to_image_x(position, self.window_size, page));

                if let Some(x) = click {
                    self.viewer.handle_event(&InputEvent::Click { x });
                }
            }
            Event::Window(window::Event::Resized(size)) => {
                self.window_size = size;
            }
            _ => {}
        }

        Task::none()
    }

    pub fn view(&self) -> Element<'_, Message> {
        let image_area: Element<'_, Message> = if let Some(handle) = self.viewer.surface().handle() {
            container(
                image(handle.clone())
                    .width(Length::Fill)
                    .height(Length::Fill)
                    .content_fit(iced::ContentFit::Contain),
            )
            .width(Length::Fill)
            .height(Length::Fill)
            .style(|_theme| container::Style {
                background: Some(iced::Color::BLACK.into()),
                ..container::Style::default()
            })
            .into()
        } else {
            container(text("Could not load PDF. Check logs.").size(20).color(iced::Color::WHITE))
                .width(Length::Fill)
                .height(Length::Fill)
                .center_x(Length::Fill)
                .center_y(Length::Fill)
                .style(|_theme| container::Style {
                    background: Some(iced::Color::BLACK.into()),
                    ..container::Style::default()
                })
                .into()
        };

        let status_text = match self.viewer.current_page() {
            Some(index) => format!("Page {} / {}", index + 1, self.viewer.page_count()),
            None => "No document".to_string(),
        };
        let mode_indicator = format!("-- {} --", self.viewer.mode().label());

        let status_bar = container(column![
            text(mode_indicator).size(12).color(iced::Color::from_rgb8(100, 200, 100)),
            text(status_text).size(14).color(iced::Color::WHITE),
        ])
        .width(Length::Fill)
        .height(Length::Fixed(STATUS_BAR_HEIGHT))
        .padding(5)
        .style(|_theme| container::Style {
            background: Some(iced::Color::from_rgb8(30, 30, 30).into()),
            ..container::Style::default()
        });

        column![image_area, status_bar].into()
    }

    pub fn subscription(&self) -> Subscription<Message> {
        event::listen().map(Message::EventOccurred)
    }
}

/// Map a window position to a horizontal page image coordinate.
///
/// The page is drawn with `ContentFit::Contain`, centred in the window area
/// above the status bar. Positions outside the drawn page map to `None`.
pub fn window_to_image_x(position: Point, window: Size, page: (u32, u32)) -> Option<f32> {
    let area_width = window.width;
    let area_height = window.height - STATUS_BAR_HEIGHT;
    let (page_width, page_height) = (page.0 as f32, page.1 as f32);

    if area_width <= 0.0 || area_height <= 0.0 || page_width <= 0.0 || page_height <= 0.0 {
        return None;
    }

    let scale = (area_width / page_width).min(area_height / page_height);
    let offset_x = (area_width - page_width * scale) / 2.0;
    let offset_y = (area_height - page_height * scale) / 2.0;

    let x = (position.x - offset_x) / scale;
    let y = (position.y - offset_y) / scale;

    if (0.0..=page_width).contains(&x) && (0.0..=page_height).contains(&y) {
        Some(x)
    } else {
        None
    }
}

/// Open a viewer window for `source`
pub fn run(source: DocumentSource, options: RenderOptions, config: ViewerConfig) -> iced::Result {
    info!("Opening viewer with {:?} navigation", config.navigation);
    let window_size = Size::new(config.initial_window_width, config.initial_window_height);

    iced::application(
        move || ViewerApp::new(source.clone(), &options, &config),
        ViewerApp::update,
        ViewerApp::view,
    )
    .title("pdfwidget")
    .window_size(window_size)
    .subscription(ViewerApp::subscription)
    .run()
}
