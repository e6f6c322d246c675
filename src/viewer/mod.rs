//! Loads stored photos and scales them for display

use crate::constants::DISPLAY_SIZE;
use crate::store::{CapturedPhoto, History};
use image::{imageops, RgbImage};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("No photos captured yet!")]
    EmptyHistory,

    #[error("No previous images to show!")]
    InsufficientHistory,

    #[error("Failed to open {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        source: image::ImageError,
    },
}

impl ViewError {
    /// Navigation hints that should not be shown as failures
    pub fn is_informational(&self) -> bool {
        matches!(self, ViewError::InsufficientHistory)
    }
}

/// A photo scaled for display.
///
/// Owns its bitmap, so whoever holds the state keeps the picture alive.
#[derive(Debug, Clone)]
pub struct DisplayState {
    pub path: PathBuf,
    pub image: RgbImage,
}

impl DisplayState {
    pub fn caption(&self) -> String {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!("Displaying: {}", name)
    }
}

pub fn render_most_recent(history: &History) -> Result<DisplayState, ViewError> {
    let photo = history.most_recent().ok_or(ViewError::EmptyHistory)?;
    render_path(&photo.path)
}

pub fn render_previous(history: &History) -> Result<DisplayState, ViewError> {
    let photo = history.previous().ok_or(ViewError::InsufficientHistory)?;
    render_path(&photo.path)
}

/// Render the annotated variant of `photo` when it has one
pub fn render_photo(photo: &CapturedPhoto) -> Result<DisplayState, ViewError> {
    render_path(photo.display_path())
}

fn render_path(path: &Path) -> Result<DisplayState, ViewError> {
    let loaded = image::open(path)
        .map_err(|source| ViewError::Load {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgb8();

    tracing::debug!(
        "Rendering {} ({}x{})",
        path.display(),
        loaded.width(),
        loaded.height()
    );

    Ok(DisplayState {
        path: path.to_path_buf(),
        image: fit_display(&loaded),
    })
}

/// Scale to the fixed display size, ignoring aspect ratio
pub fn fit_display(image: &RgbImage) -> RgbImage {
    if image.dimensions() == (DISPLAY_SIZE, DISPLAY_SIZE) {
        return image.clone();
    }
    imageops::resize(
        image,
        DISPLAY_SIZE,
        DISPLAY_SIZE,
        imageops::FilterType::Triangle,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::Frame;
    use crate::store::CaptureStore;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn save(store: &mut CaptureStore, second: u32) -> CapturedPhoto {
        let time = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(8, 0, second)
            .unwrap();
        let image = RgbImage::from_pixel(80, 60, image::Rgb([120, 60, 30]));
        store.save_at(Frame::from_rgb(image), time).unwrap()
    }

    #[test]
    fn test_empty_history() {
        let history = History::new();
        assert!(matches!(
            render_most_recent(&history),
            Err(ViewError::EmptyHistory)
        ));
        assert!(matches!(
            render_previous(&history),
            Err(ViewError::InsufficientHistory)
        ));
    }

    #[test]
    fn test_most_recent_is_just_saved() {
        let dir = tempdir().unwrap();
        let mut store = CaptureStore::new(dir.path());
        save(&mut store, 1);
        let latest = save(&mut store, 2);

        let state = render_most_recent(store.history()).unwrap();
        assert_eq!(state.path, latest.path);
        assert_eq!(state.image.dimensions(), (DISPLAY_SIZE, DISPLAY_SIZE));
        assert_eq!(state.caption(), "Displaying: photo_2024-01-02_08-00-02.jpg");
    }

    #[test]
    fn test_previous_needs_two_photos() {
        let dir = tempdir().unwrap();
        let mut store = CaptureStore::new(dir.path());
        let first = save(&mut store, 1);

        let err = render_previous(store.history()).unwrap_err();
        assert!(err.is_informational());

        save(&mut store, 2);
        let state = render_previous(store.history()).unwrap();
        assert_eq!(state.path, first.path);
    }

    #[test]
    fn test_render_photo_prefers_annotation() {
        let dir = tempdir().unwrap();
        let mut store = CaptureStore::new(dir.path());
        let photo = save(&mut store, 3);
        let annotated = store.annotate(&photo, "Grace").unwrap();

        let state = render_photo(&annotated).unwrap();
        assert_eq!(Some(state.path), annotated.annotated);

        let plain = render_photo(&photo).unwrap();
        assert_eq!(plain.path, photo.path);
    }

    #[test]
    fn test_missing_file_is_load_error() {
        let dir = tempdir().unwrap();
        let photo = CapturedPhoto {
            path: dir.path().join("gone.jpg"),
            timestamp: String::new(),
            annotated: None,
        };
        let err = render_photo(&photo).unwrap_err();
        assert!(matches!(err, ViewError::Load { .. }));
        assert!(!err.is_informational());
    }
}
