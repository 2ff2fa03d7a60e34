use image::{ImageFormat, Rgba, RgbaImage};
use rgba_planes::{
    AlphaInfo, BitmapLayout, Channel, ChannelPlanes, ConstructionError, DecodedImage,
    DimensionMismatch, ExportError, FromBitmap, ImageBuffer, IndexOutOfBounds, Pixel, RenderError,
};
use std::io::Cursor;

/// Decoded PNG acting as the host image, only accepts opaque pixels so no
/// premultiplication is needed
struct PngImage(RgbaImage);

impl PngImage {
    fn decode(bytes: &[u8]) -> Self {
        let image = image::load_from_memory_with_format(bytes, ImageFormat::Png).unwrap();
        Self(image.to_rgba8())
    }

    fn encode(&self) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        self.0.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }
}

impl DecodedImage for PngImage {
    fn width(&self) -> usize {
        self.0.width() as usize
    }

    fn height(&self) -> usize {
        self.0.height() as usize
    }

    fn render_into(&self, region: &mut [u8], layout: &BitmapLayout) -> Result<(), RenderError> {
        if !layout.is_packed_rgba8() || layout.alpha != AlphaInfo::PremultipliedLast {
            return Err(RenderError::UnsupportedLayout("test host only renders rgba8"));
        }

        if self.0.pixels().any(|p| p.0[3] != 255) {
            return Err(RenderError::UnsupportedLayout("test host only renders opaque images"));
        }

        region.copy_from_slice(&self.0.as_raw()[..region.len()]);
        Ok(())
    }
}

impl FromBitmap for PngImage {
    fn from_bitmap(region: &[u8], layout: &BitmapLayout) -> Result<Self, RenderError> {
        let width = u32::try_from(layout.width)
            .map_err(|_| RenderError::UnsupportedLayout("width exceeds u32"))?;
        let height = u32::try_from(layout.height)
            .map_err(|_| RenderError::UnsupportedLayout("height exceeds u32"))?;

        RgbaImage::from_raw(width, height, region.to_vec())
            .map(PngImage)
            .ok_or(RenderError::NoBitmap)
    }
}

fn gradient_png(width: u32, height: u32) -> Vec<u8> {
    let image = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x * 255 / width) as u8, (y * 255 / height) as u8, 128, 255])
    });

    PngImage(image).encode()
}

#[test]
fn png_through_planes_and_back() {
    let png = gradient_png(64, 48);
    let source = PngImage::decode(&png);

    let buffer = ImageBuffer::from_image(&source).unwrap();
    assert_eq!(buffer.width(), 64);
    assert_eq!(buffer.height(), 48);

    let planes = ChannelPlanes::from_image_buffer(&buffer);
    assert_eq!(planes.len(), 64 * 48);
    assert!(planes.blue().iter().all(|b| *b == 128));
    assert!(planes.alpha().iter().all(|a| *a == 255));

    let mut rebuilt = ImageBuffer::blank(64, 48);
    planes.write_into(&mut rebuilt).unwrap();
    assert_eq!(rebuilt, buffer);

    let out: PngImage = rebuilt.to_image().unwrap();
    assert_eq!(out.0, source.0);
    assert_eq!(PngImage::decode(&out.encode()).0, source.0);
}

#[test]
fn swap_red_and_blue_planes() {
    let source = PngImage::decode(&gradient_png(8, 8));
    let buffer = ImageBuffer::from_image(&source).unwrap();

    let [red, green, blue, alpha] = ChannelPlanes::from_image_buffer(&buffer).into_inner();
    let swapped = ChannelPlanes::new(blue, green, red, alpha).unwrap();

    let out = swapped.into_image_buffer(8, 8).unwrap();

    for (before, after) in buffer.pixels().iter().zip(out.pixels()) {
        assert_eq!(after.red(), before.blue());
        assert_eq!(after.blue(), before.red());
        assert_eq!(after.channel(Channel::Green), before.channel(Channel::Green));
    }
}

#[test]
fn translucent_source_is_rejected() {
    let source = PngImage(RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 10])));

    let err = ImageBuffer::from_image(&source).unwrap_err();

    assert!(matches!(
        err,
        ConstructionError::Render(RenderError::UnsupportedLayout(_))
    ));
}

#[test]
fn export_of_empty_buffer_fails() {
    let err = ImageBuffer::blank(0, 0).to_image::<PngImage>().err().unwrap();

    assert!(matches!(err, ExportError::InvalidDimensions { width: 0, height: 0 }));
}

#[test]
fn row_major_order_of_planes() {
    let pixels = [0x10, 0x20, 0x30, 0x40, 0x50, 0x60]
        .map(|v: u32| Pixel::new(v * 0x0101_0101))
        .to_vec();
    let buffer = ImageBuffer::from_pixels(3, 2, pixels).unwrap();

    let planes = ChannelPlanes::from_image_buffer(&buffer);

    let expected = [(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]
        .map(|(row, col)| buffer.pixel_at(row, col).unwrap().red());
    assert_eq!(planes.red(), expected);
    assert_eq!(planes.red(), [0x10, 0x20, 0x30, 0x40, 0x50, 0x60]);
}

#[test]
fn errors_are_explicit() {
    let buffer = ImageBuffer::blank(3, 3);

    assert!(matches!(
        buffer.pixel_at(3, 0),
        Err(IndexOutOfBounds::Pixel { row: 3, .. })
    ));
    assert!(matches!(
        buffer.pixel_at(0, 3),
        Err(IndexOutOfBounds::Pixel { col: 3, .. })
    ));

    let planes = ChannelPlanes::new(vec![0; 12], vec![0; 12], vec![0; 12], vec![0; 12]).unwrap();
    let mut target = ImageBuffer::from_pixels(3, 3, vec![Pixel::new(1); 9]).unwrap();

    assert_eq!(
        planes.write_into(&mut target),
        Err(DimensionMismatch {
            expected: 9,
            got: 12
        })
    );
    assert!(target.pixels().iter().all(|p| *p == Pixel::new(1)));
}

#[test]
fn error_messages() {
    let err = DimensionMismatch {
        expected: 9,
        got: 12,
    };
    assert_eq!(
        err.to_string(),
        "dimension mismatch, expected 9 elements but got 12"
    );

    let err = IndexOutOfBounds::Pixel {
        row: 2,
        col: 0,
        width: 3,
        height: 2,
    };
    assert_eq!(
        err.to_string(),
        "pixel (row 2, col 0) is outside of the 3x2 image"
    );
}

#[cfg(feature = "multi-thread")]
#[test]
fn multi_threaded_png_round_trip() {
    use rgba_planes::{merge_channels_multi_thread, split_channels_multi_thread};

    let source = PngImage::decode(&gradient_png(333, 127));
    let buffer = ImageBuffer::from_image(&source).unwrap();

    let planes = split_channels_multi_thread(&buffer);
    assert_eq!(planes, ChannelPlanes::from_image_buffer(&buffer));

    let mut rebuilt = ImageBuffer::blank(333, 127);
    merge_channels_multi_thread(&planes, &mut rebuilt).unwrap();
    assert_eq!(rebuilt, buffer);
}
