use super::CapturedPhoto;

/// Photos saved during this run, in capture order. Append-only.
#[derive(Debug, Default)]
pub struct History {
    photos: Vec<CapturedPhoto>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub(super) fn push(&mut self, photo: CapturedPhoto) {
        self.photos.push(photo);
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    pub fn most_recent(&self) -> Option<&CapturedPhoto> {
        self.photos.last()
    }

    pub fn previous(&self) -> Option<&CapturedPhoto> {
        self.photos.len().checked_sub(2).map(|i| &self.photos[i])
    }
}
