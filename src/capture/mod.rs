mod frame;
mod webcam;

pub use frame::{Frame, PixelOrder};
pub use webcam::{list_cameras, WebcamProvider};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Could not open webcam {index}: {reason}")]
    DeviceUnavailable { index: u32, reason: String },

    #[error("Failed to capture frame: {0}")]
    ReadError(String),
}

/// An open, exclusively held camera.
///
/// The device is released when the session is dropped.
pub trait CaptureSource {
    /// Read a single frame
    fn read_frame(&mut self) -> Result<Frame, CaptureError>;
}

/// Hands out camera sessions on demand
pub trait CameraProvider {
    fn open(&self) -> Result<Box<dyn CaptureSource>, CaptureError>;
}
