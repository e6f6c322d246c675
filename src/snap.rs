//! One-shot capture from the command line

use crate::capture::{CameraProvider, CaptureError};
use crate::store::{CaptureStore, CapturedPhoto, StoreError};
use anyhow::{Context, Result};
use std::io::{BufRead, Write};

pub struct SnapRequest {
    pub annotate: bool,
    pub name: Option<String>,
}

/// Capture a single photo, optionally asking for a name to overlay.
///
/// Returns `Ok(None)` when the camera could not be used; the reason has
/// already been printed.
pub fn run<R, W>(
    provider: &dyn CameraProvider,
    store: &mut CaptureStore,
    request: SnapRequest,
    input: &mut R,
    output: &mut W,
) -> Result<Option<CapturedPhoto>>
where
    R: BufRead,
    W: Write,
{
    let frame = {
        // The session is dropped as soon as the frame is read
        let grabbed = provider.open().and_then(|mut session| session.read_frame());
        match grabbed {
            Ok(frame) => frame,
            Err(CaptureError::DeviceUnavailable { .. }) => {
                writeln!(output, "Error: Could not open webcam.")?;
                return Ok(None);
            }
            Err(e @ CaptureError::ReadError(_)) => {
                tracing::debug!("{}", e);
                writeln!(output, "Failed to capture frame")?;
                return Ok(None);
            }
        }
    };

    let photo = store.save(frame).context("Failed to save photo")?;
    writeln!(output, "Photo saved as {}", photo.path.display())?;

    if !request.annotate {
        return Ok(Some(photo));
    }

    let name = match request.name {
        Some(name) => name,
        None => match prompt_name(input, output)? {
            Some(name) => name,
            None => {
                writeln!(output, "No name entered, keeping {}", photo.path.display())?;
                return Ok(Some(photo));
            }
        },
    };

    let annotated = match store.annotate(&photo, &name) {
        Ok(annotated) => annotated,
        Err(StoreError::EmptyAnnotation) => {
            writeln!(output, "Name cannot be empty, keeping {}", photo.path.display())?;
            return Ok(Some(photo));
        }
        Err(e) => return Err(e).context("Failed to annotate photo"),
    };
    if let Some(path) = &annotated.annotated {
        writeln!(output, "Image with name saved as {}", path.display())?;
    }
    Ok(Some(annotated))
}

/// Ask until a non-blank line arrives. `None` once input is exhausted.
fn prompt_name<R, W>(input: &mut R, output: &mut W) -> Result<Option<String>>
where
    R: BufRead,
    W: Write,
{
    loop {
        write!(output, "Enter the person's name: ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line).context("Failed to read name")? == 0 {
            writeln!(output)?;
            return Ok(None);
        }
        if !line.trim().is_empty() {
            return Ok(Some(line));
        }
        writeln!(output, "Name cannot be empty")?;
    }
}
