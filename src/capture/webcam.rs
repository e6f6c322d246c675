use super::{CameraProvider, CaptureError, CaptureSource, Frame};
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{ApiBackend, CameraIndex, RequestedFormat, RequestedFormatType};
use nokhwa::Camera;

/// A nokhwa camera with an open stream
pub struct WebcamSession {
    camera: Camera,
    index: u32,
}

impl WebcamSession {
    pub fn open(device_index: u32) -> Result<Self, CaptureError> {
        tracing::info!("Opening webcam {}", device_index);

        let unavailable = |e: nokhwa::NokhwaError| CaptureError::DeviceUnavailable {
            index: device_index,
            reason: e.to_string(),
        };

        let index = CameraIndex::Index(device_index);
        let requested =
            RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestResolution);

        let mut camera = Camera::new(index, requested).map_err(unavailable)?;
        camera.open_stream().map_err(unavailable)?;

        tracing::debug!("Webcam {} streaming", device_index);

        Ok(Self {
            camera,
            index: device_index,
        })
    }
}

impl CaptureSource for WebcamSession {
    fn read_frame(&mut self) -> Result<Frame, CaptureError> {
        let buffer = self
            .camera
            .frame()
            .map_err(|e| CaptureError::ReadError(e.to_string()))?;

        let decoded = buffer
            .decode_image::<RgbFormat>()
            .map_err(|e| CaptureError::ReadError(format!("decode failed: {}", e)))?;

        Ok(Frame::from_rgb(decoded))
    }
}

impl Drop for WebcamSession {
    fn drop(&mut self) {
        if let Err(e) = self.camera.stop_stream() {
            tracing::warn!("Failed to stop webcam {}: {}", self.index, e);
        } else {
            tracing::debug!("Webcam {} released", self.index);
        }
    }
}

/// Opens sessions on a fixed device index
pub struct WebcamProvider {
    device_index: u32,
}

impl WebcamProvider {
    pub fn new(device_index: u32) -> Self {
        Self { device_index }
    }
}

impl CameraProvider for WebcamProvider {
    fn open(&self) -> Result<Box<dyn CaptureSource>, CaptureError> {
        let session = WebcamSession::open(self.device_index)?;
        Ok(Box::new(session))
    }
}

/// Enumerate cameras as `(index, name)` pairs
pub fn list_cameras() -> anyhow::Result<Vec<(String, String)>> {
    let cameras = nokhwa::query(ApiBackend::Auto)?;
    Ok(cameras
        .into_iter()
        .map(|info| (info.index().to_string(), info.human_name()))
        .collect())
}
