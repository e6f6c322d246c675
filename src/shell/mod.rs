//! Command layer shared by every front end.
//!
//! The shell owns the capture store, the optional live preview and all UI
//! state. Front ends translate input into [`Command`]s and draw [`UiState`].

mod state;

pub use state::{NamePrompt, Notice, NoticeLevel, UiState};

use crate::capture::{CameraProvider, CaptureError, Frame};
use crate::preview::LivePreview;
use crate::store::{CaptureStore, CapturedPhoto};
use crate::viewer::{self, DisplayState, ViewError};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Capture,
    ShowRecent,
    ShowPrevious,
    PromptInput(char),
    PromptBackspace,
    SubmitName,
    CancelName,
    DismissNotice,
}

/// Which optional behaviours are switched on
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellOptions {
    /// Ask for a name after each capture and save an annotated copy
    pub annotate: bool,
    /// Keep a session open and stream frames into the live pane
    pub live: bool,
    pub preview_interval: Duration,
}

pub struct Shell {
    options: ShellOptions,
    provider: Box<dyn CameraProvider>,
    store: CaptureStore,
    preview: Option<LivePreview>,
    ui: UiState,
}

impl Shell {
    pub fn new(options: ShellOptions, provider: Box<dyn CameraProvider>, store: CaptureStore) -> Self {
        Self {
            options,
            provider,
            store,
            preview: None,
            ui: UiState::default(),
        }
    }

    pub fn options(&self) -> ShellOptions {
        self.options
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn store(&self) -> &CaptureStore {
        &self.store
    }

    pub fn preview_running(&self) -> bool {
        self.preview.is_some()
    }

    /// Open the live preview session when `live` is enabled.
    ///
    /// A camera that will not open is reported and leaves the shell usable.
    pub fn start(&mut self, now: Instant) {
        if !self.options.live || self.preview.is_some() {
            return;
        }
        match self.provider.open() {
            Ok(session) => {
                self.preview = Some(LivePreview::start(
                    session,
                    self.options.preview_interval,
                    now,
                ));
            }
            Err(e) => {
                tracing::error!("Live preview unavailable: {}", e);
                self.ui.notify(NoticeLevel::Error, "Error: Could not open webcam.");
            }
        }
    }

    /// Run the preview task if it is due
    pub fn tick(&mut self, now: Instant) {
        if let Some(preview) = self.preview.as_mut() {
            if let Some(frame) = preview.tick(now) {
                self.ui.live_frame = Some(frame);
            }
        }
    }

    /// When the loop next has scheduled work, if ever
    pub fn next_deadline(&self) -> Option<Instant> {
        self.preview.as_ref().map(LivePreview::next_due)
    }

    pub fn dispatch(&mut self, command: Command) {
        tracing::debug!("Dispatching {:?}", command);
        match command {
            Command::Capture => self.capture(),
            Command::ShowRecent => self.show_recent(),
            Command::ShowPrevious => self.show_previous(),
            Command::PromptInput(c) => {
                if let Some(prompt) = self.ui.prompt.as_mut() {
                    prompt.input.push(c);
                }
            }
            Command::PromptBackspace => {
                if let Some(prompt) = self.ui.prompt.as_mut() {
                    prompt.input.pop();
                }
            }
            Command::SubmitName => self.submit_name(),
            Command::CancelName => {
                if self.ui.prompt.take().is_some() {
                    self.ui.notify(NoticeLevel::Info, "Name entry cancelled");
                }
            }
            Command::DismissNotice => self.ui.notice = None,
        }
    }

    fn capture(&mut self) {
        if self.ui.prompt.is_some() {
            return;
        }

        let frame = match self.grab_frame() {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!("{}", e);
                let message = match e {
                    CaptureError::DeviceUnavailable { .. } => {
                        "Error: Could not open webcam.".to_string()
                    }
                    CaptureError::ReadError(_) => "Failed to capture frame".to_string(),
                };
                self.ui.notify(NoticeLevel::Error, message);
                return;
            }
        };

        let photo = match self.store.save(frame) {
            Ok(photo) => photo,
            Err(e) => {
                tracing::error!("{}", e);
                self.ui.notify(NoticeLevel::Error, format!("Error: {}", e));
                return;
            }
        };

        self.ui
            .notify(NoticeLevel::Info, format!("Photo saved as {}", photo.path.display()));
        self.show_recent();

        if self.options.annotate {
            self.ui.prompt = Some(NamePrompt {
                photo,
                input: String::new(),
            });
        }
    }

    /// Read one frame, reusing the preview's session when there is one so
    /// the device is never opened twice.
    fn grab_frame(&mut self) -> Result<Frame, CaptureError> {
        if let Some(preview) = self.preview.as_mut() {
            return preview.grab();
        }
        let mut session = self.provider.open()?;
        session.read_frame()
    }

    fn submit_name(&mut self) {
        let Some(prompt) = self.ui.prompt.take() else {
            return;
        };

        match self.store.annotate(&prompt.photo, &prompt.input) {
            Ok(annotated) => {
                let message = match &annotated.annotated {
                    Some(path) => format!("Image with name saved as {}", path.display()),
                    None => "Image with name saved".to_string(),
                };
                self.show_photo(&annotated);
                self.ui.notify(NoticeLevel::Info, message);
            }
            Err(e) => {
                tracing::warn!("Annotation failed: {}", e);
                self.ui.notify(NoticeLevel::Error, format!("Error: {}", e));
                // Keep asking until a usable name is entered or the prompt is cancelled
                self.ui.prompt = Some(prompt);
            }
        }
    }

    fn show_recent(&mut self) {
        let result = viewer::render_most_recent(self.store.history());
        self.apply_render(result);
    }

    fn show_previous(&mut self) {
        let result = viewer::render_previous(self.store.history());
        self.apply_render(result);
    }

    fn show_photo(&mut self, photo: &CapturedPhoto) {
        let result = viewer::render_photo(photo);
        self.apply_render(result);
    }

    fn apply_render(&mut self, result: Result<DisplayState, ViewError>) {
        match result {
            Ok(display) => {
                self.ui.status = display.caption();
                self.ui.display = Some(display);
            }
            Err(e) if e.is_informational() => {
                self.ui.notify(NoticeLevel::Info, e.to_string());
            }
            Err(e) => {
                tracing::warn!("{}", e);
                self.ui.notify(NoticeLevel::Error, e.to_string());
            }
        }
    }
}
