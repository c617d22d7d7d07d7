use iced::widget::{canvas, column, container, row, stack, text};
use iced::{Element, Length, Task, Theme};
use tracing::{info, warn};

mod assets;
mod config;
mod errors;
mod state;
mod ui;
mod video;

use assets::upload::Upload;
use config::{AppConfig, ControlSteps};
use errors::{FetchError, UploadError};
use state::data::{EntryId, EyewearEntry, StyleImage};
use state::session::{CatalogSource, Session};
use state::transform::Axis;
use ui::controls;
use ui::{ImageCache, OverlayView};
use video::{PreviewSurface, VideoSurface};

/// Main application state
struct TryOn {
    /// Catalog, selection and overlay placement
    session: Session,
    /// Frame the overlay is composited on
    surface: PreviewSurface,
    /// Downloaded style images
    images: ImageCache,
    /// Button increments
    steps: ControlSteps,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// Remote catalog fetch finished
    CatalogLoaded(Result<Vec<EyewearEntry>, FetchError>),
    /// A style image download finished
    OverlayImageLoaded(String, Result<StyleImage, FetchError>),
    NextStyle,
    PreviousStyle,
    SelectStyle(EntryId),
    /// User clicked "Upload Custom Glasses"
    UploadRequested,
    /// File picker closed (None = cancelled)
    UploadLoaded(Option<Result<Upload, UploadError>>),
    Scale(f32),
    Rotate(f32),
    Move(Axis, f32),
}

impl TryOn {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let config = AppConfig::load().unwrap_or_else(|err| {
            warn!(error = %err, "falling back to default configuration");
            AppConfig::default()
        });

        let source = CatalogSource::for_build(&config);
        let session = Session::start(&source);
        info!(?source, "try-on session started");

        let surface = PreviewSurface::from_config(&config.preview);
        info!(
            size = ?surface.frame_size(),
            mirrored = surface.is_mirrored(),
            "preview surface ready"
        );

        let mut app = TryOn {
            session,
            surface,
            images: ImageCache::new(),
            steps: config.controls,
            status: String::new(),
        };

        let endpoint = app.session.remote_endpoint().map(str::to_string);
        let task = match endpoint {
            Some(endpoint) => {
                app.status = "Loading catalog...".to_string();
                Task::perform(
                    assets::remote::fetch_catalog(endpoint),
                    Message::CatalogLoaded,
                )
            }
            None => {
                app.refresh_status();
                app.load_selected_image()
            }
        };

        (app, task)
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::CatalogLoaded(result) => {
                self.session.catalog.complete_remote_load(result);
                self.refresh_status();
                self.load_selected_image()
            }
            Message::OverlayImageLoaded(url, result) => {
                self.images.complete(url, result);
                Task::none()
            }
            Message::NextStyle => {
                self.session.catalog.select_next();
                self.load_selected_image()
            }
            Message::PreviousStyle => {
                self.session.catalog.select_previous();
                self.load_selected_image()
            }
            Message::SelectStyle(id) => {
                self.session.catalog.select_by_id(id.as_str());
                self.load_selected_image()
            }
            Message::UploadRequested => {
                Task::perform(assets::upload::pick_upload(), Message::UploadLoaded)
            }
            Message::UploadLoaded(None) => Task::none(),
            Message::UploadLoaded(Some(Ok(upload))) => {
                let Upload { display_name, image } = upload;
                match self.session.catalog.add_uploaded(display_name, image) {
                    Some(entry) => self.status = format!("Added \"{}\" to your styles.", entry.name),
                    None => self.status = "Please wait for the catalog to finish loading.".to_string(),
                }
                Task::none()
            }
            Message::UploadLoaded(Some(Err(err))) => {
                warn!(error = %err, "upload failed");
                self.status = format!("Upload failed: {}", err);
                Task::none()
            }
            Message::Scale(delta) => {
                self.session.transform.adjust_scale(delta);
                Task::none()
            }
            Message::Rotate(delta) => {
                self.session.transform.adjust_rotation(delta);
                Task::none()
            }
            Message::Move(axis, delta) => {
                self.session.transform.adjust_position(axis, delta);
                Task::none()
            }
        }
    }

    /// Start downloading the selected style's image if it is not cached yet
    fn load_selected_image(&mut self) -> Task<Message> {
        let Some(url) = self
            .session
            .catalog
            .selected()
            .and_then(|entry| entry.image_url())
            .map(str::to_string)
        else {
            return Task::none();
        };

        if !self.images.request(&url) {
            return Task::none();
        }

        Task::perform(assets::remote::fetch_image(url.clone()), move |result| {
            Message::OverlayImageLoaded(url.clone(), result)
        })
    }

    fn refresh_status(&mut self) {
        let catalog = &self.session.catalog;
        self.status = if catalog.is_empty() {
            "No styles available. Upload your own glasses design.".to_string()
        } else if catalog.len() == 1 {
            "Ready. 1 style in catalog.".to_string()
        } else {
            format!("Ready. {} styles in catalog.", catalog.len())
        };
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        let catalog = &self.session.catalog;

        let overlay = OverlayView {
            surface: &self.surface,
            transform: self.session.transform.current(),
            overlay: self.images.overlay_for(catalog.selected()),
        };

        let mut video = stack![canvas(overlay).width(Length::Fill).height(Length::Fill)]
            .width(Length::Fill)
            .height(Length::Fill);
        if !catalog.is_loading() {
            video = video
                .push(
                    container(controls::position_pad(self.steps.position_step))
                        .center_x(Length::Fill)
                        .align_bottom(Length::Fill)
                        .padding(24),
                )
                .push(
                    container(controls::zoom_controls(self.steps.scale_step))
                        .align_right(Length::Fill)
                        .center_y(Length::Fill)
                        .padding(24),
                )
                .push(
                    container(controls::rotation_controls(self.steps.rotation_step))
                        .align_left(Length::Fill)
                        .center_y(Length::Fill)
                        .padding(24),
                );
        }

        let side = column![
            controls::style_panel(catalog, &self.status),
            controls::quick_tips(),
        ]
        .spacing(32)
        .width(Length::Fixed(360.0));

        let header = column![
            text("Virtual Glasses Try-On").size(36),
            text("Try on different glasses styles using your camera!").size(18),
        ]
        .spacing(8)
        .align_x(iced::Alignment::Center)
        .width(Length::Fill);

        container(column![header, row![video, side].spacing(32)].spacing(24))
            .width(Length::Fill)
            .height(Length::Fill)
            .padding(32)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Light
    }
}

fn main() -> iced::Result {
    // Set RUST_LOG to control verbosity, e.g. RUST_LOG=glasses_try_on=debug
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("glasses_try_on=info,warn")),
        )
        .with_target(true)
        .init();

    iced::application("Virtual Glasses Try-On", TryOn::update, TryOn::view)
        .theme(TryOn::theme)
        .centered()
        .run_with(TryOn::new)
}
