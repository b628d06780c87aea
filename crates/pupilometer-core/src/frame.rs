use image::GrayImage;

/// Smallest frame side that still has a non-empty ray-casting interior.
const MIN_FRAME_SIDE: u32 = 3;

/// Errors raised for frames the locator cannot process.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("frame is empty")]
    Empty,

    #[error("invalid frame dimensions (width={width}, height={height})")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("invalid grayscale buffer length (expected {expected} bytes, got {got})")]
    InvalidBuffer { expected: usize, got: usize },
}

/// Reject frames that are empty or too small to hold an interior pixel.
pub fn check_frame(frame: &GrayImage) -> Result<(), FrameError> {
    let (width, height) = frame.dimensions();
    if width == 0 || height == 0 || frame.as_raw().is_empty() {
        return Err(FrameError::Empty);
    }
    if width < MIN_FRAME_SIDE || height < MIN_FRAME_SIDE {
        return Err(FrameError::InvalidDimensions { width, height });
    }
    Ok(())
}

/// Build a frame from a raw row-major grayscale buffer.
pub fn gray_image_from_slice(
    width: u32,
    height: u32,
    pixels: &[u8],
) -> Result<GrayImage, FrameError> {
    if width == 0 || height == 0 {
        return Err(FrameError::Empty);
    }
    let w = usize::try_from(width).ok();
    let h = usize::try_from(height).ok();
    let Some(expected) = w.zip(h).and_then(|(w, h)| w.checked_mul(h)) else {
        return Err(FrameError::InvalidDimensions { width, height });
    };
    if pixels.len() != expected {
        return Err(FrameError::InvalidBuffer {
            expected,
            got: pixels.len(),
        });
    }
    GrayImage::from_raw(width, height, pixels.to_vec())
        .ok_or(FrameError::InvalidDimensions { width, height })
}
