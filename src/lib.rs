//! Packed RGBA pixel buffers and their planar (per channel) form
//!
//! ```
//! use rgba_planes::{ChannelPlanes, ImageBuffer, Pixel};
//!
//! let image = ImageBuffer::from_pixels(1, 1, vec![Pixel::new(0xAABBCCDD)]).unwrap();
//!
//! let mut planes = ChannelPlanes::from_image_buffer(&image);
//! assert_eq!(planes.red(), [0xDD]);
//! assert_eq!(planes.alpha(), [0xAA]);
//!
//! planes.alpha_mut().fill(0xFF);
//!
//! let mut out = ImageBuffer::blank(1, 1);
//! planes.write_into(&mut out).unwrap();
//! assert_eq!(out.pixels(), [Pixel::new(0xFFBBCCDD)]);
//! ```

pub use buffer::{
    ConstructionError, DimensionMismatch, ExportError, ImageBuffer, ImageError, IndexOutOfBounds,
};
pub use host::{
    AlphaInfo, BitmapLayout, ByteOrder, ColorSpace, DecodedImage, FromBitmap, RenderError,
};
#[cfg(feature = "multi-thread")]
pub use multi_thread::{merge_channels_multi_thread, split_channels_multi_thread};
pub use pixel::{Channel, Pixel};
pub use planes::ChannelPlanes;

mod buffer;
mod host;
#[cfg(feature = "multi-thread")]
mod multi_thread;
mod pixel;
mod planes;
#[cfg(feature = "image")]
mod rgba_image;
