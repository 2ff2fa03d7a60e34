use crate::Pixel;
use crate::host::{BitmapLayout, DecodedImage, FromBitmap, RenderError, ScratchRegion};

/// Everything that can go wrong when constructing an [`ImageBuffer`] from raw parts
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("width * height overflows usize")]
    DimensionsOverflow,

    #[error(transparent)]
    PixelCount(#[from] DimensionMismatch),
}

/// Element count disagrees with the pixel count of the image it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("dimension mismatch, expected {expected} elements but got {got}")]
pub struct DimensionMismatch {
    pub expected: usize,
    pub got: usize,
}

/// Access to a pixel or plane index outside of the image
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IndexOutOfBounds {
    #[error("pixel (row {row}, col {col}) is outside of the {width}x{height} image")]
    Pixel {
        row: usize,
        col: usize,
        width: usize,
        height: usize,
    },

    #[error("index {index} is out of bounds for length {len}")]
    Index { index: usize, len: usize },
}

/// Everything that can go wrong when calling [`ImageBuffer::from_image`]
#[derive(Debug, thiserror::Error)]
pub enum ConstructionError {
    #[error("cannot create a rendering context for a {width}x{height} image")]
    InvalidDimensions { width: usize, height: usize },

    #[error("failed to render the source image: {0}")]
    Render(#[from] RenderError),
}

/// Everything that can go wrong when calling [`ImageBuffer::to_image`]
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("cannot create a rendering context for a {width}x{height} image")]
    InvalidDimensions { width: usize, height: usize },

    #[error("failed to materialize the bitmap: {0}")]
    Render(#[from] RenderError),
}

/// Rectangular grid of [`Pixel`]s, stored row-major from top to bottom without padding
///
/// The number of pixels is always `width * height`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    pixels: Vec<Pixel>,
    width: usize,
    height: usize,
}

impl ImageBuffer {
    /// Create an image where every pixel is zero (transparent black)
    ///
    /// # Panics
    ///
    /// If `width * height` overflows `usize`
    pub fn blank(width: usize, height: usize) -> Self {
        let len = width
            .checked_mul(height)
            .expect("image dimensions overflow usize");

        Self {
            pixels: vec![Pixel::default(); len],
            width,
            height,
        }
    }

    pub fn from_pixels(
        width: usize,
        height: usize,
        pixels: Vec<Pixel>,
    ) -> Result<Self, ImageError> {
        let expected = width
            .checked_mul(height)
            .ok_or(ImageError::DimensionsOverflow)?;

        if pixels.len() != expected {
            return Err(DimensionMismatch {
                expected,
                got: pixels.len(),
            }
            .into());
        }

        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    /// Read interleaved `[r, g, b, a]` bytes, row-major without padding
    pub fn from_rgba_bytes(width: usize, height: usize, bytes: &[u8]) -> Result<Self, ImageError> {
        let expected = width
            .checked_mul(height)
            .and_then(|len| len.checked_mul(BitmapLayout::BYTES_PER_PIXEL))
            .ok_or(ImageError::DimensionsOverflow)?;

        if bytes.len() != expected {
            return Err(DimensionMismatch {
                expected,
                got: bytes.len(),
            }
            .into());
        }

        Self::from_pixels(width, height, read_pixels(bytes))
    }

    /// Interleaved `[r, g, b, a]` bytes of all pixels, row-major without padding
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![0u8; self.pixels.len() * BitmapLayout::BYTES_PER_PIXEL];
        write_pixels(&self.pixels, &mut bytes);
        bytes
    }

    /// Construct an image by letting `image` render itself into a scratch region
    /// using [`BitmapLayout::rgba8`]
    ///
    /// Either the whole image is read or an error is returned.
    pub fn from_image<I>(image: &I) -> Result<Self, ConstructionError>
    where
        I: DecodedImage + ?Sized,
    {
        let width = image.width();
        let height = image.height();

        let layout = match BitmapLayout::rgba8(width, height) {
            Some(layout) if width != 0 && height != 0 => layout,
            _ => {
                log::warn!("refusing to create a rendering context for a {width}x{height} image");
                return Err(ConstructionError::InvalidDimensions { width, height });
            }
        };

        let mut region = ScratchRegion::acquire(&layout);

        if let Err(e) = image.render_into(region.as_mut_slice(), &layout) {
            log::warn!("host failed to render a {width}x{height} image: {e}");
            return Err(e.into());
        }

        let pixels = read_pixels(region.as_slice());

        log::debug!("constructed {width}x{height} image buffer from host image");

        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    /// Hand the pixels to the host to materialize a bitmap of type `T`
    pub fn to_image<T: FromBitmap>(&self) -> Result<T, ExportError> {
        let (width, height) = (self.width, self.height);

        let layout = match BitmapLayout::rgba8(width, height) {
            Some(layout)
                if width != 0
                    && height != 0
                    && layout.region_len() / BitmapLayout::BYTES_PER_PIXEL == self.pixels.len() =>
            {
                layout
            }
            _ => {
                log::warn!("refusing to export a {width}x{height} image");
                return Err(ExportError::InvalidDimensions { width, height });
            }
        };

        let mut region = ScratchRegion::acquire(&layout);
        write_pixels(&self.pixels, region.as_mut_slice());

        let image = T::from_bitmap(region.as_slice(), &layout).inspect_err(|e| {
            log::warn!("host failed to materialize a {width}x{height} bitmap: {e}");
        })?;

        log::debug!("exported {width}x{height} image buffer to host bitmap");

        Ok(image)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of pixels, `width * height`
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Pixel] {
        &mut self.pixels
    }

    pub fn into_pixels(self) -> Vec<Pixel> {
        self.pixels
    }

    /// Iterate over all rows from top to bottom. Images with zero width yield no rows.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[Pixel]> + '_ {
        self.pixels.chunks_exact(self.width.max(1))
    }

    /// Iterate mutably over all rows from top to bottom. Images with zero width yield no rows.
    pub fn rows_mut(&mut self) -> impl ExactSizeIterator<Item = &mut [Pixel]> + '_ {
        self.pixels.chunks_exact_mut(self.width.max(1))
    }

    pub fn pixel_at(&self, row: usize, col: usize) -> Result<Pixel, IndexOutOfBounds> {
        let index = self.index_of(row, col)?;
        Ok(self.pixels[index])
    }

    pub fn set_pixel_at(
        &mut self,
        row: usize,
        col: usize,
        pixel: Pixel,
    ) -> Result<(), IndexOutOfBounds> {
        let index = self.index_of(row, col)?;
        self.pixels[index] = pixel;
        Ok(())
    }

    fn index_of(&self, row: usize, col: usize) -> Result<usize, IndexOutOfBounds> {
        if row >= self.height || col >= self.width {
            return Err(IndexOutOfBounds::Pixel {
                row,
                col,
                width: self.width,
                height: self.height,
            });
        }

        Ok(row * self.width + col)
    }
}

fn read_pixels(bytes: &[u8]) -> Vec<Pixel> {
    bytes
        .chunks_exact(BitmapLayout::BYTES_PER_PIXEL)
        .map(|px| Pixel::from_bytes([px[0], px[1], px[2], px[3]]))
        .collect()
}

fn write_pixels(pixels: &[Pixel], bytes: &mut [u8]) {
    for (pixel, dst) in pixels
        .iter()
        .zip(bytes.chunks_exact_mut(BitmapLayout::BYTES_PER_PIXEL))
    {
        dst.copy_from_slice(&pixel.to_bytes());
    }
}
