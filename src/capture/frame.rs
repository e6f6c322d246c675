use image::RgbImage;

/// Channel order of a raw frame buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelOrder {
    Rgb,
    Bgr,
}

/// One packed 8-bit, 3-channel pixel buffer read from a camera
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub order: PixelOrder,
    pub data: Vec<u8>,
}

impl Frame {
    pub fn from_rgb(image: RgbImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            order: PixelOrder::Rgb,
            data: image.into_raw(),
        }
    }

    /// Normalize to RGB.
    ///
    /// Returns `None` if the buffer is shorter than `width * height * 3`.
    pub fn into_rgb(self) -> Option<RgbImage> {
        let Frame {
            width,
            height,
            order,
            mut data,
        } = self;

        let expected = (width as usize) * (height as usize) * 3;
        if data.len() < expected {
            return None;
        }
        data.truncate(expected);

        if order == PixelOrder::Bgr {
            for pixel in data.chunks_exact_mut(3) {
                pixel.swap(0, 2);
            }
        }

        RgbImage::from_raw(width, height, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bgr_is_swapped() {
        let frame = Frame {
            width: 2,
            height: 1,
            order: PixelOrder::Bgr,
            data: vec![1, 2, 3, 10, 20, 30],
        };

        let rgb = frame.into_rgb().unwrap();
        assert_eq!(rgb.get_pixel(0, 0).0, [3, 2, 1]);
        assert_eq!(rgb.get_pixel(1, 0).0, [30, 20, 10]);
    }

    #[test]
    fn test_rgb_passes_through() {
        let image = RgbImage::from_pixel(3, 2, image::Rgb([9, 8, 7]));
        let rgb = Frame::from_rgb(image.clone()).into_rgb().unwrap();
        assert_eq!(rgb, image);
    }

    #[test]
    fn test_short_buffer_is_rejected() {
        let frame = Frame {
            width: 4,
            height: 4,
            order: PixelOrder::Rgb,
            data: vec![0; 10],
        };
        assert!(frame.into_rgb().is_none());
    }
}
