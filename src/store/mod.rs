mod annotate;
mod history;

pub use history::History;

use crate::capture::Frame;
use crate::constants::{ANNOTATION_PREFIX, TIMESTAMP_FORMAT};
use chrono::{Local, NaiveDateTime};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to create {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to load {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Frame buffer does not match {width}x{height}")]
    MalformedFrame { width: u32, height: u32 },

    #[error("Name cannot be empty")]
    EmptyAnnotation,
}

/// A photo written by the store. Never modified after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedPhoto {
    pub path: PathBuf,
    pub timestamp: String,
    pub annotated: Option<PathBuf>,
}

impl CapturedPhoto {
    /// The annotated variant if there is one, otherwise the original
    pub fn display_path(&self) -> &Path {
        self.annotated.as_deref().unwrap_or(&self.path)
    }
}

/// Writes frames under `<root>/<timestamp>/` and remembers them in capture order
pub struct CaptureStore {
    root: PathBuf,
    history: History,
}

impl CaptureStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            history: History::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Save a frame stamped with the current local time
    pub fn save(&mut self, frame: Frame) -> Result<CapturedPhoto, StoreError> {
        self.save_at(frame, Local::now().naive_local())
    }

    /// Save a frame stamped with `time`.
    ///
    /// Two saves within the same second share a folder and file name, so the
    /// second overwrites the first on disk. Both are still recorded in history.
    pub fn save_at(
        &mut self,
        frame: Frame,
        time: NaiveDateTime,
    ) -> Result<CapturedPhoto, StoreError> {
        let (width, height) = (frame.width, frame.height);
        let image = frame
            .into_rgb()
            .ok_or(StoreError::MalformedFrame { width, height })?;

        let timestamp = time.format(TIMESTAMP_FORMAT).to_string();
        let folder = self.root.join(&timestamp);
        fs::create_dir_all(&folder).map_err(|source| StoreError::CreateDir {
            path: folder.clone(),
            source,
        })?;

        let path = folder.join(format!("photo_{}.jpg", timestamp));
        image.save(&path).map_err(|source| StoreError::Encode {
            path: path.clone(),
            source,
        })?;

        tracing::info!("Photo saved as {}", path.display());

        let photo = CapturedPhoto {
            path,
            timestamp,
            annotated: None,
        };
        self.history.push(photo.clone());
        Ok(photo)
    }

    /// Write a copy of `photo` with the name drawn on it.
    ///
    /// The result lives next to the original as `photo_<timestamp>_<name>.jpg`.
    /// History and the original file are left alone.
    pub fn annotate(&self, photo: &CapturedPhoto, name: &str) -> Result<CapturedPhoto, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyAnnotation);
        }

        let mut image = image::open(&photo.path)
            .map_err(|source| StoreError::Load {
                path: photo.path.clone(),
                source,
            })?
            .to_rgb8();

        annotate::draw_label(&mut image, &format!("{}{}", ANNOTATION_PREFIX, name));

        let annotated = annotated_path(&photo.path, name);
        image.save(&annotated).map_err(|source| StoreError::Encode {
            path: annotated.clone(),
            source,
        })?;

        tracing::info!("Image with name saved as {}", annotated.display());

        Ok(CapturedPhoto {
            path: photo.path.clone(),
            timestamp: photo.timestamp.clone(),
            annotated: Some(annotated),
        })
    }
}

fn annotated_path(original: &Path, name: &str) -> PathBuf {
    let stem = original
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "photo".to_string());
    original.with_file_name(format!("{}_{}.jpg", stem, file_safe(name)))
}

fn file_safe(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::PixelOrder;
    use chrono::NaiveDate;
    use image::RgbImage;
    use tempfile::tempdir;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn frame(value: u8) -> Frame {
        Frame::from_rgb(RgbImage::from_pixel(64, 48, image::Rgb([value, value, value])))
    }

    #[test]
    fn test_save_layout() {
        let dir = tempdir().unwrap();
        let mut store = CaptureStore::new(dir.path());

        let photo = store.save_at(frame(10), at(13, 4, 5)).unwrap();

        assert_eq!(photo.timestamp, "2024-05-01_13-04-05");
        assert_eq!(
            photo.path,
            dir.path()
                .join("2024-05-01_13-04-05")
                .join("photo_2024-05-01_13-04-05.jpg")
        );
        assert!(photo.path.is_file());
        assert!(photo.annotated.is_none());

        let saved = image::open(&photo.path).unwrap();
        assert_eq!((saved.width(), saved.height()), (64, 48));
    }

    #[test]
    fn test_history_tracks_every_save() {
        let dir = tempdir().unwrap();
        let mut store = CaptureStore::new(dir.path());

        let mut last = None;
        for s in 0..5 {
            last = Some(store.save_at(frame(s as u8 * 40), at(9, 0, s)).unwrap());
        }

        assert_eq!(store.history().len(), 5);
        assert_eq!(store.history().most_recent(), last.as_ref());
    }

    #[test]
    fn test_distinct_seconds_get_distinct_folders() {
        let dir = tempdir().unwrap();
        let mut store = CaptureStore::new(dir.path());

        let first = store.save_at(frame(0), at(10, 0, 0)).unwrap();
        let second = store.save_at(frame(0), at(10, 0, 1)).unwrap();

        assert_ne!(first.path.parent(), second.path.parent());
        assert!(first.path.is_file());
        assert!(second.path.is_file());
        assert_eq!(store.history().len(), 2);
    }

    #[test]
    fn test_same_second_reuses_folder() {
        let dir = tempdir().unwrap();
        let mut store = CaptureStore::new(dir.path());

        let first = store.save_at(frame(0), at(10, 0, 0)).unwrap();
        let second = store.save_at(frame(255), at(10, 0, 0)).unwrap();

        assert_eq!(first.path, second.path);
        assert_eq!(store.history().len(), 2);
    }

    #[test]
    fn test_bgr_frames_are_saved_as_rgb() {
        let dir = tempdir().unwrap();
        let mut store = CaptureStore::new(dir.path());

        let mut data = Vec::new();
        for _ in 0..(32 * 32) {
            // Pure blue in BGR order
            data.extend_from_slice(&[255, 0, 0]);
        }
        let frame = Frame {
            width: 32,
            height: 32,
            order: PixelOrder::Bgr,
            data,
        };

        let photo = store.save_at(frame, at(11, 0, 0)).unwrap();
        let saved = image::open(&photo.path).unwrap().to_rgb8();
        let [r, _, b] = saved.get_pixel(16, 16).0;
        assert!(b > 200 && r < 50, "expected blue, got r={} b={}", r, b);
    }

    #[test]
    fn test_malformed_frame_is_not_recorded() {
        let dir = tempdir().unwrap();
        let mut store = CaptureStore::new(dir.path());

        let frame = Frame {
            width: 10,
            height: 10,
            order: PixelOrder::Rgb,
            data: vec![0; 3],
        };
        let result = store.save_at(frame, at(12, 0, 0));

        assert!(matches!(result, Err(StoreError::MalformedFrame { .. })));
        assert!(store.history().is_empty());
    }

    #[test]
    fn test_annotate_keeps_original() {
        let dir = tempdir().unwrap();
        let mut store = CaptureStore::new(dir.path());
        let photo = store.save_at(frame(0), at(14, 30, 0)).unwrap();
        let original_bytes = fs::read(&photo.path).unwrap();

        let annotated = store.annotate(&photo, "Ada").unwrap();
        let annotated_path = annotated.annotated.clone().unwrap();

        assert_eq!(
            annotated_path,
            photo.path.with_file_name("photo_2024-05-01_14-30-00_Ada.jpg")
        );
        assert_ne!(annotated_path, photo.path);
        assert!(annotated_path.is_file());
        assert_eq!(annotated.path, photo.path);
        assert_eq!(annotated.display_path(), annotated_path.as_path());
        assert_eq!(fs::read(&photo.path).unwrap(), original_bytes);

        assert_eq!(store.history().len(), 1);
        assert_eq!(store.history().most_recent(), Some(&photo));
    }

    #[test]
    fn test_annotation_is_visible() {
        let dir = tempdir().unwrap();
        let mut store = CaptureStore::new(dir.path());
        let photo = store.save_at(frame(0), at(15, 0, 0)).unwrap();

        let annotated = store.annotate(&photo, "Ada").unwrap();
        let image = image::open(annotated.display_path()).unwrap().to_rgb8();

        let brightest = image
            .enumerate_pixels()
            .filter(|(_, y, _)| *y < 50)
            .map(|(_, _, p)| p.0[0])
            .max()
            .unwrap();
        assert!(brightest > 200);
    }

    #[test]
    fn test_annotate_rejects_blank_name() {
        let dir = tempdir().unwrap();
        let mut store = CaptureStore::new(dir.path());
        let photo = store.save_at(frame(0), at(16, 0, 0)).unwrap();

        assert!(matches!(
            store.annotate(&photo, "   "),
            Err(StoreError::EmptyAnnotation)
        ));
    }

    #[test]
    fn test_annotated_name_is_file_safe() {
        let path = annotated_path(Path::new("out/photo_ts.jpg"), "a/b:c");
        assert_eq!(path, Path::new("out/photo_ts_a_b_c.jpg"));
    }

    #[test]
    fn test_annotate_missing_file() {
        let dir = tempdir().unwrap();
        let store = CaptureStore::new(dir.path());
        let photo = CapturedPhoto {
            path: dir.path().join("missing.jpg"),
            timestamp: "x".to_string(),
            annotated: None,
        };

        assert!(matches!(
            store.annotate(&photo, "Ada"),
            Err(StoreError::Load { .. })
        ));
    }
}
