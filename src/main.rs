use clap::Parser;
use log::{error, info};
use pdfwidget::input::NavigationMode;
use pdfwidget::options::{JpegOptions, OutputFormat, RenderOptions};
use pdfwidget::pdf::DocumentSource;
use pdfwidget::ui::{self, ViewerConfig};
use simplelog::{Config, LevelFilter, WriteLogger};
use std::error::Error;
use std::fs::File;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// PDF to open, or `-` to read it from stdin
    file_name: String,

    /// Rendering resolution in dots per inch
    #[arg(long)]
    dpi: Option<f32>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Bmp)]
    fmt: OutputFormat,

    /// JPEG quality, 1-100
    #[arg(long, default_value_t = 75)]
    jpeg_quality: u8,

    #[arg(long)]
    jpeg_progressive: bool,

    #[arg(long)]
    jpeg_optimize: bool,

    /// First page to render (1-based)
    #[arg(long)]
    first_page: Option<usize>,

    /// Last page to render (1-based, inclusive)
    #[arg(long)]
    last_page: Option<usize>,

    #[arg(long, default_value_t = 1)]
    thread_count: usize,

    #[arg(long)]
    password: Option<String>,

    /// Render the crop box instead of the media box
    #[arg(long)]
    use_cropbox: bool,

    #[arg(long)]
    transparent: bool,

    #[arg(long)]
    grayscale: bool,

    #[arg(long)]
    hide_annotations: bool,

    /// Directory to look in for the PDFium library
    #[arg(long)]
    pdfium_path: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = NavigationMode::Arrow)]
    nav: NavigationMode,

    #[arg(long, default_value_t = 800.0)]
    width: f32,

    #[arg(long, default_value_t = 600.0)]
    height: f32,

    #[arg(long, default_value = "pdfwidget.log")]
    log_file: PathBuf,

    #[arg(long, default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,
}

impl Args {
    fn render_options(&self) -> RenderOptions {
        RenderOptions {
            dpi: self.dpi,
            format: self.fmt,
            jpeg: JpegOptions {
                quality: self.jpeg_quality,
                progressive: self.jpeg_progressive,
                optimize: self.jpeg_optimize,
            },
            first_page: self.first_page,
            last_page: self.last_page,
            thread_count: self.thread_count,
            password: self.password.clone(),
            use_cropbox: self.use_cropbox,
            transparent: self.transparent,
            pdfium_path: self.pdfium_path.clone(),
            grayscale: self.grayscale,
            hide_annotations: self.hide_annotations,
        }
    }

    fn viewer_config(&self) -> ViewerConfig {
        ViewerConfig {
            initial_window_width: self.width,
            initial_window_height: self.height,
            navigation: self.nav,
        }
    }

    fn source(&self) -> pdfwidget::Result<DocumentSource> {
        if self.file_name == "-" {
            DocumentSource::from_reader(std::io::stdin().lock())
        } else {
            Ok(DocumentSource::from(self.file_name.as_str()))
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    WriteLogger::init(args.log_level, Config::default(), File::create(&args.log_file)?)?;
    info!("Starting pdfwidget on {}", args.file_name);

    let source = args.source()?;
    if let Err(e) = ui::run(source, args.render_options(), args.viewer_config()) {
        error!("Viewer error: {}", e);
        return Err(e.into());
    }

    info!("Shutting down pdfwidget");
    Ok(())
}
