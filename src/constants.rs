use std::time::Duration;

/// Default root directory for captured photos, relative to the working directory
pub const PHOTO_ROOT: &str = "Captured_Photos";

/// Timestamp used for both the capture folder and the photo file name.
///
/// Second granularity, sortable and safe in file names.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Width and height every rendered bitmap is scaled to
pub const DISPLAY_SIZE: u32 = 400;

/// Default delay between live preview frames
pub const PREVIEW_INTERVAL: Duration = Duration::from_millis(10);

/// Longest the event loop waits for input before checking the preview again
pub const INPUT_POLL_LIMIT: Duration = Duration::from_millis(16);

/// Left edge of the name overlay, in pixels
pub const ANNOTATION_X: u32 = 10;

/// Baseline of the name overlay, in pixels from the top
pub const ANNOTATION_BASELINE: u32 = 50;

/// Each font8x8 glyph pixel becomes a square of this many image pixels
pub const ANNOTATION_SCALE: u32 = 3;

/// Text drawn in front of the name on annotated photos
pub const ANNOTATION_PREFIX: &str = "Name: ";
