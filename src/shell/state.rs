use crate::store::CapturedPhoto;
use crate::viewer::DisplayState;
use image::RgbImage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Name entry for the photo that was just captured
#[derive(Debug, Clone)]
pub struct NamePrompt {
    pub photo: CapturedPhoto,
    pub input: String,
}

/// Everything a front end needs to draw
#[derive(Debug)]
pub struct UiState {
    pub display: Option<DisplayState>,
    pub live_frame: Option<RgbImage>,
    pub status: String,
    pub notice: Option<Notice>,
    pub prompt: Option<NamePrompt>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            display: None,
            live_frame: None,
            status: "No photos to display.".to_string(),
            notice: None,
            prompt: None,
        }
    }
}

impl UiState {
    pub fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notice = Some(Notice {
            level,
            message: message.into(),
        });
    }
}
