//! Boundary to the host platform's image objects
//!
//! The host hands over decoded 8 bit RGBA data by rendering itself into a byte
//! region described by a [`BitmapLayout`], and accepts the same layout back to
//! materialize a displayable bitmap. Colour management and gamma are the host's
//! business, this crate only moves bytes.

/// Colour space of the rendered region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    /// Device dependent RGB, no colour management applied
    DeviceRgb,
}

/// Order of the bytes of each 32 bit pixel value in memory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Most significant component first, `[r, g, b, a]` for alpha-last layouts
    Big,
    Little,
}

/// Position and interpretation of the alpha component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlphaInfo {
    /// Alpha is the last component, colour components are premultiplied with it
    PremultipliedLast,
    /// Alpha is the last component, colour components are straight
    Last,
}

/// Geometry and pixel format of a byte region exchanged with the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapLayout {
    pub width: usize,
    pub height: usize,
    pub bits_per_component: usize,
    pub bytes_per_row: usize,
    pub color_space: ColorSpace,
    pub byte_order: ByteOrder,
    pub alpha: AlphaInfo,
}

impl BitmapLayout {
    pub const BYTES_PER_PIXEL: usize = 4;

    /// The layout every [`ImageBuffer`](crate::ImageBuffer) uses: 8 bits per
    /// component, device RGB, byte order big, premultiplied alpha last and
    /// rows without padding.
    ///
    /// Returns `None` if the row or region size would overflow `usize`.
    pub fn rgba8(width: usize, height: usize) -> Option<Self> {
        let bytes_per_row = width.checked_mul(Self::BYTES_PER_PIXEL)?;
        bytes_per_row.checked_mul(height)?;

        Some(Self {
            width,
            height,
            bits_per_component: 8,
            bytes_per_row,
            color_space: ColorSpace::DeviceRgb,
            byte_order: ByteOrder::Big,
            alpha: AlphaInfo::PremultipliedLast,
        })
    }

    /// Number of bytes a region with this layout occupies
    pub fn region_len(&self) -> usize {
        self.bytes_per_row * self.height
    }

    /// Whether this is the packed 8 bit RGBA layout produced by [`BitmapLayout::rgba8`],
    /// ignoring the alpha interpretation
    pub fn is_packed_rgba8(&self) -> bool {
        self.bits_per_component == 8
            && self.color_space == ColorSpace::DeviceRgb
            && self.byte_order == ByteOrder::Big
            && Some(self.bytes_per_row) == self.width.checked_mul(Self::BYTES_PER_PIXEL)
    }
}

/// Everything that can go wrong inside a host render or export call
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("the image has no bitmap representation")]
    NoBitmap,

    #[error("unsupported bitmap layout: {0}")]
    UnsupportedLayout(&'static str),

    #[error("bitmap region has the wrong size, expected {expected} bytes but got {got}")]
    RegionSize { expected: usize, got: usize },
}

/// A decoded host image that can render itself into a caller supplied region
pub trait DecodedImage {
    /// Width in pixels
    fn width(&self) -> usize;

    /// Height in pixels
    fn height(&self) -> usize;

    /// Render the whole image into `region`, which is exactly `layout.region_len()` bytes
    fn render_into(&self, region: &mut [u8], layout: &BitmapLayout) -> Result<(), RenderError>;
}

/// A host bitmap type that can be materialized from a byte region
pub trait FromBitmap: Sized {
    fn from_bitmap(region: &[u8], layout: &BitmapLayout) -> Result<Self, RenderError>;
}

impl<T: DecodedImage + ?Sized> DecodedImage for &T {
    fn width(&self) -> usize {
        <T as DecodedImage>::width(self)
    }

    fn height(&self) -> usize {
        <T as DecodedImage>::height(self)
    }

    fn render_into(&self, region: &mut [u8], layout: &BitmapLayout) -> Result<(), RenderError> {
        <T as DecodedImage>::render_into(self, region, layout)
    }
}

/// Scratch memory bridging an [`ImageBuffer`](crate::ImageBuffer) and the host
///
/// Acquired right before the host call and released when dropped, which covers
/// early returns and unwinding alike. The host only ever sees borrowed views.
pub(crate) struct ScratchRegion {
    bytes: Vec<u8>,
}

impl ScratchRegion {
    pub(crate) fn acquire(layout: &BitmapLayout) -> Self {
        let len = layout.region_len();
        log::trace!("acquire {len} byte scratch region");

        Self {
            bytes: vec![0u8; len],
        }
    }

    pub(crate) fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}

impl Drop for ScratchRegion {
    fn drop(&mut self) {
        log::trace!("release {} byte scratch region", self.bytes.len());
    }
}
