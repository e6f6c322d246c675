use crate::capture::{CaptureError, CaptureSource, Frame};
use crate::viewer::fit_display;
use image::RgbImage;
use std::time::{Duration, Instant};

/// Polls a camera session on a fixed interval.
///
/// Owns the session for as long as it runs; dropping the preview releases
/// the device.
pub struct LivePreview {
    session: Box<dyn CaptureSource>,
    interval: Duration,
    next_due: Instant,
    frames: u64,
}

impl LivePreview {
    pub fn start(session: Box<dyn CaptureSource>, interval: Duration, now: Instant) -> Self {
        tracing::info!("Live preview started ({} ms interval)", interval.as_millis());
        Self {
            session,
            interval,
            next_due: now,
            frames: 0,
        }
    }

    pub fn next_due(&self) -> Instant {
        self.next_due
    }

    /// Read, convert and scale one frame if the preview is due.
    ///
    /// Always reschedules, whether or not the read succeeded.
    pub fn tick(&mut self, now: Instant) -> Option<RgbImage> {
        if now < self.next_due {
            return None;
        }
        self.next_due = now + self.interval;

        let frame = match self.session.read_frame() {
            Ok(frame) => frame,
            Err(e) => {
                tracing::debug!("Preview frame skipped: {}", e);
                return None;
            }
        };

        let rgb = frame.into_rgb()?;
        self.frames += 1;
        if self.frames % 300 == 0 {
            tracing::debug!("Preview frame {}", self.frames);
        }
        Some(fit_display(&rgb))
    }

    /// Read a full resolution frame from the preview's session
    pub fn grab(&mut self) -> Result<Frame, CaptureError> {
        self.session.read_frame()
    }
}
