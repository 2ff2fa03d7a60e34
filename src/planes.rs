use crate::{Channel, DimensionMismatch, ImageBuffer, IndexOutOfBounds, Pixel};

/// The four channels of an image, each stored as its own contiguous plane
///
/// Index `row * width + col` of every plane belongs to the pixel at the same
/// index in the [`ImageBuffer`] the planes were created from. All planes always
/// have the same length. There is no link to the source image after creation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelPlanes {
    red: Vec<u8>,
    green: Vec<u8>,
    blue: Vec<u8>,
    alpha: Vec<u8>,
}

impl ChannelPlanes {
    /// Create planes from existing channel data, all planes must have the same length
    pub fn new(
        red: Vec<u8>,
        green: Vec<u8>,
        blue: Vec<u8>,
        alpha: Vec<u8>,
    ) -> Result<Self, DimensionMismatch> {
        let expected = red.len();

        for got in [green.len(), blue.len(), alpha.len()] {
            if got != expected {
                return Err(DimensionMismatch { expected, got });
            }
        }

        Ok(Self {
            red,
            green,
            blue,
            alpha,
        })
    }

    /// Split every pixel of `image` into its channels, row by row
    pub fn from_image_buffer(image: &ImageBuffer) -> Self {
        let len = image.len();

        let mut this = Self {
            red: Vec::with_capacity(len),
            green: Vec::with_capacity(len),
            blue: Vec::with_capacity(len),
            alpha: Vec::with_capacity(len),
        };

        for row in image.rows() {
            for pixel in row {
                this.red.push(pixel.red());
                this.green.push(pixel.green());
                this.blue.push(pixel.blue());
                this.alpha.push(pixel.alpha());
            }
        }

        this
    }

    /// Overwrite every pixel of `image` with the pixel recombined from these planes
    ///
    /// `image` must have exactly [`len`](Self::len) pixels, otherwise nothing is
    /// written and an error is returned.
    pub fn write_into(&self, image: &mut ImageBuffer) -> Result<(), DimensionMismatch> {
        if image.len() != self.len() {
            return Err(DimensionMismatch {
                expected: image.len(),
                got: self.len(),
            });
        }

        merge_rows(
            [
                self.red.as_slice(),
                self.green.as_slice(),
                self.blue.as_slice(),
                self.alpha.as_slice(),
            ],
            image.pixels_mut(),
        );

        Ok(())
    }

    /// Recombine the planes into a new image of the given dimensions
    ///
    /// If `width * height` overflows `usize` the expected count in the error is
    /// saturated to `usize::MAX`, which no plane length can reach.
    pub fn into_image_buffer(
        self,
        width: usize,
        height: usize,
    ) -> Result<ImageBuffer, DimensionMismatch> {
        let expected = width.saturating_mul(height);

        if expected != self.len() {
            return Err(DimensionMismatch {
                expected,
                got: self.len(),
            });
        }

        let mut image = ImageBuffer::blank(width, height);
        self.write_into(&mut image)?;
        Ok(image)
    }

    /// Number of pixels, which is the length of every plane
    pub fn len(&self) -> usize {
        self.red.len()
    }

    pub fn is_empty(&self) -> bool {
        self.red.is_empty()
    }

    pub fn red(&self) -> &[u8] {
        &self.red
    }

    pub fn green(&self) -> &[u8] {
        &self.green
    }

    pub fn blue(&self) -> &[u8] {
        &self.blue
    }

    pub fn alpha(&self) -> &[u8] {
        &self.alpha
    }

    pub fn red_mut(&mut self) -> &mut [u8] {
        &mut self.red
    }

    pub fn green_mut(&mut self) -> &mut [u8] {
        &mut self.green
    }

    pub fn blue_mut(&mut self) -> &mut [u8] {
        &mut self.blue
    }

    pub fn alpha_mut(&mut self) -> &mut [u8] {
        &mut self.alpha
    }

    pub fn plane(&self, channel: Channel) -> &[u8] {
        match channel {
            Channel::Red => &self.red,
            Channel::Green => &self.green,
            Channel::Blue => &self.blue,
            Channel::Alpha => &self.alpha,
        }
    }

    pub fn plane_mut(&mut self, channel: Channel) -> &mut [u8] {
        match channel {
            Channel::Red => &mut self.red,
            Channel::Green => &mut self.green,
            Channel::Blue => &mut self.blue,
            Channel::Alpha => &mut self.alpha,
        }
    }

    /// Recombine the pixel at `index`
    pub fn pixel_at(&self, index: usize) -> Result<Pixel, IndexOutOfBounds> {
        if index >= self.len() {
            return Err(IndexOutOfBounds::Index {
                index,
                len: self.len(),
            });
        }

        Ok(Pixel::from_rgba(
            self.red[index],
            self.green[index],
            self.blue[index],
            self.alpha[index],
        ))
    }

    /// Returns the planes in the order red, green, blue, alpha
    pub fn into_inner(self) -> [Vec<u8>; 4] {
        [self.red, self.green, self.blue, self.alpha]
    }

    /// Planes of length `len` filled with zeroes
    #[cfg(feature = "multi-thread")]
    pub(crate) fn zeroed(len: usize) -> Self {
        Self {
            red: vec![0u8; len],
            green: vec![0u8; len],
            blue: vec![0u8; len],
            alpha: vec![0u8; len],
        }
    }

    /// Mutable views of all four planes at once, in the order red, green, blue, alpha
    #[cfg(feature = "multi-thread")]
    pub(crate) fn planes_mut(&mut self) -> [&mut [u8]; 4] {
        [
            &mut self.red,
            &mut self.green,
            &mut self.blue,
            &mut self.alpha,
        ]
    }
}

/// Write the channels of `src` pixels into the equally long `dst` planes
#[cfg(feature = "multi-thread")]
pub(crate) fn split_rows(src: &[Pixel], dst: [&mut [u8]; 4]) {
    let [red, green, blue, alpha] = dst;

    for (i, pixel) in src.iter().enumerate() {
        red[i] = pixel.red();
        green[i] = pixel.green();
        blue[i] = pixel.blue();
        alpha[i] = pixel.alpha();
    }
}

/// Rebuild every `dst` pixel from scratch out of the equally long `src` planes
pub(crate) fn merge_rows(src: [&[u8]; 4], dst: &mut [Pixel]) {
    let [red, green, blue, alpha] = src;

    for (i, out) in dst.iter_mut().enumerate() {
        let mut pixel = Pixel::default();
        pixel.set_red(red[i]);
        pixel.set_green(green[i]);
        pixel.set_blue(blue[i]);
        pixel.set_alpha(alpha[i]);

        *out = pixel;
    }
}
