//! Host boundary for the [`image`] crate
//!
//! `image` stores straight (non premultiplied) alpha, so colour components are
//! premultiplied when rendering into a [`AlphaInfo::PremultipliedLast`] region
//! and divided back out when materializing an [`image::RgbaImage`].

use crate::host::{AlphaInfo, BitmapLayout, DecodedImage, FromBitmap, RenderError};

fn premultiply(c: u8, a: u8) -> u8 {
    ((c as u16 * a as u16 + 127) / 255) as u8
}

fn unpremultiply(c: u8, a: u8) -> u8 {
    if a == 0 {
        return 0;
    }

    let a = a as u32;
    ((c as u32 * 255 + a / 2) / a).min(255) as u8
}

fn check_layout(
    region_len: usize,
    layout: &BitmapLayout,
    width: usize,
    height: usize,
) -> Result<(), RenderError> {
    if !layout.is_packed_rgba8() {
        return Err(RenderError::UnsupportedLayout(
            "expected packed 8 bit device RGB, byte order big",
        ));
    }

    if layout.width != width || layout.height != height {
        return Err(RenderError::UnsupportedLayout(
            "layout dimensions differ from the image",
        ));
    }

    if region_len != layout.region_len() {
        return Err(RenderError::RegionSize {
            expected: layout.region_len(),
            got: region_len,
        });
    }

    Ok(())
}

fn render_rgba8(src: &[u8], region: &mut [u8], alpha: AlphaInfo) {
    match alpha {
        AlphaInfo::Last => region.copy_from_slice(src),
        AlphaInfo::PremultipliedLast => {
            for (s, d) in src.chunks_exact(4).zip(region.chunks_exact_mut(4)) {
                let a = s[3];
                d[0] = premultiply(s[0], a);
                d[1] = premultiply(s[1], a);
                d[2] = premultiply(s[2], a);
                d[3] = a;
            }
        }
    }
}

impl DecodedImage for image::RgbaImage {
    fn width(&self) -> usize {
        image::ImageBuffer::width(self) as usize
    }

    fn height(&self) -> usize {
        image::ImageBuffer::height(self) as usize
    }

    fn render_into(&self, region: &mut [u8], layout: &BitmapLayout) -> Result<(), RenderError> {
        check_layout(
            region.len(),
            layout,
            DecodedImage::width(self),
            DecodedImage::height(self),
        )?;

        // The container may be longer than the image itself
        render_rgba8(&self.as_raw()[..layout.region_len()], region, layout.alpha);

        Ok(())
    }
}

impl DecodedImage for image::DynamicImage {
    fn width(&self) -> usize {
        image::GenericImageView::width(self) as usize
    }

    fn height(&self) -> usize {
        image::GenericImageView::height(self) as usize
    }

    fn render_into(&self, region: &mut [u8], layout: &BitmapLayout) -> Result<(), RenderError> {
        match self {
            image::DynamicImage::ImageRgba8(rgba) => rgba.render_into(region, layout),
            other => other.to_rgba8().render_into(region, layout),
        }
    }
}

impl FromBitmap for image::RgbaImage {
    fn from_bitmap(region: &[u8], layout: &BitmapLayout) -> Result<Self, RenderError> {
        check_layout(region.len(), layout, layout.width, layout.height)?;

        let width = u32::try_from(layout.width)
            .map_err(|_| RenderError::UnsupportedLayout("width exceeds u32"))?;
        let height = u32::try_from(layout.height)
            .map_err(|_| RenderError::UnsupportedLayout("height exceeds u32"))?;

        let mut buf = region.to_vec();

        if layout.alpha == AlphaInfo::PremultipliedLast {
            for px in buf.chunks_exact_mut(4) {
                let a = px[3];
                px[0] = unpremultiply(px[0], a);
                px[1] = unpremultiply(px[1], a);
                px[2] = unpremultiply(px[2], a);
            }
        }

        image::RgbaImage::from_raw(width, height, buf).ok_or(RenderError::RegionSize {
            expected: layout.region_len(),
            got: region.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ChannelPlanes, ImageBuffer, Pixel};
    use image::{DynamicImage, Rgba, RgbaImage};

    #[test]
    fn premultiply_rounding() {
        assert_eq!(premultiply(255, 255), 255);
        assert_eq!(premultiply(255, 0), 0);
        assert_eq!(premultiply(255, 128), 128);
        assert_eq!(premultiply(100, 51), 20);
    }

    #[test]
    fn unpremultiply_rounding() {
        assert_eq!(unpremultiply(0, 0), 0);
        assert_eq!(unpremultiply(128, 128), 255);
        assert_eq!(unpremultiply(20, 51), 100);
        assert_eq!(unpremultiply(200, 100), 255);
    }

    #[test]
    fn opaque_round_trip() {
        let src = RgbaImage::from_fn(5, 3, |x, y| Rgba([x as u8 * 40, y as u8 * 80, 7, 255]));

        let buffer = ImageBuffer::from_image(&src).unwrap();
        assert_eq!(buffer.width(), 5);
        assert_eq!(buffer.height(), 3);
        assert_eq!(buffer.pixel_at(2, 4).unwrap(), Pixel::from_rgba(160, 160, 7, 255));

        let out: RgbaImage = buffer.to_image().unwrap();
        assert_eq!(out, src);
    }

    #[test]
    fn renders_premultiplied() {
        let src = RgbaImage::from_pixel(1, 1, Rgba([255, 100, 0, 51]));

        let buffer = ImageBuffer::from_image(&src).unwrap();

        assert_eq!(buffer.pixels(), [Pixel::from_rgba(51, 20, 0, 51)]);
    }

    #[test]
    fn dynamic_image() {
        let src = DynamicImage::ImageRgb8(image::RgbImage::from_pixel(2, 2, image::Rgb([1, 2, 3])));

        let buffer = ImageBuffer::from_image(&src).unwrap();

        assert!(buffer.pixels().iter().all(|p| *p == Pixel::from_rgba(1, 2, 3, 255)));
    }

    #[test]
    fn empty_image_fails() {
        let src = RgbaImage::new(0, 0);

        assert!(ImageBuffer::from_image(&src).is_err());
    }

    #[test]
    fn wrong_region_size() {
        let src = RgbaImage::new(2, 2);
        let layout = BitmapLayout::rgba8(2, 2).unwrap();
        let mut region = vec![0u8; 15];

        assert!(matches!(
            src.render_into(&mut region, &layout),
            Err(RenderError::RegionSize {
                expected: 16,
                got: 15
            })
        ));
    }

    fn straight_alpha_layout(width: usize, height: usize) -> BitmapLayout {
        let mut layout = BitmapLayout::rgba8(width, height).unwrap();
        layout.alpha = AlphaInfo::Last;
        layout
    }

    #[test]
    fn straight_alpha_oversized_container() {
        let src = RgbaImage::from_raw(1, 1, vec![1, 2, 3, 4, 9, 9, 9, 9]).unwrap();
        let mut region = [0u8; 4];

        src.render_into(&mut region, &straight_alpha_layout(1, 1)).unwrap();

        assert_eq!(region, [1, 2, 3, 4]);
    }

    #[test]
    fn premultiplied_oversized_container() {
        let src = RgbaImage::from_raw(1, 1, vec![255, 255, 255, 51, 9, 9, 9, 9]).unwrap();
        let layout = BitmapLayout::rgba8(1, 1).unwrap();
        let mut region = [0u8; 4];

        src.render_into(&mut region, &layout).unwrap();

        assert_eq!(region, [51, 51, 51, 51]);
    }

    #[test]
    fn straight_alpha_render_passes_translucent_bytes() {
        let src = RgbaImage::from_raw(2, 1, vec![200, 100, 50, 10, 1, 2, 3, 0]).unwrap();
        let mut region = [0u8; 8];

        src.render_into(&mut region, &straight_alpha_layout(2, 1)).unwrap();

        assert_eq!(region, [200, 100, 50, 10, 1, 2, 3, 0]);
    }

    #[test]
    fn straight_alpha_from_bitmap_passes_translucent_bytes() {
        let region = [200, 100, 50, 10, 1, 2, 3, 0];

        let out = RgbaImage::from_bitmap(&region, &straight_alpha_layout(2, 1)).unwrap();

        assert_eq!(out.as_raw().as_slice(), region);
    }

    #[test]
    fn edit_alpha_plane() {
        let src = RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 255]));
        let buffer = ImageBuffer::from_image(&src).unwrap();

        let mut planes = ChannelPlanes::from_image_buffer(&buffer);
        planes.alpha_mut().fill(0);

        let out: RgbaImage = planes.into_image_buffer(4, 4).unwrap().to_image().unwrap();

        assert!(out.pixels().all(|p| *p == Rgba([0, 0, 0, 0])));
    }
}
