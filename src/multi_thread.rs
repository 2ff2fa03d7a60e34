use crate::planes::{merge_rows, split_rows};
use crate::{ChannelPlanes, DimensionMismatch, ImageBuffer};
use rayon::iter::{IntoParallelIterator, ParallelIterator};

/// Number of pixels in each row range so that every thread gets one range
fn row_range_len(width: usize, height: usize, threads: usize) -> usize {
    height.div_ceil(threads) * width
}

/// Same as [`ChannelPlanes::from_image_buffer`], but every thread handles its own range of rows
#[inline(never)]
pub fn split_channels_multi_thread(image: &ImageBuffer) -> ChannelPlanes {
    let threads = num_cpus::get();

    if threads == 1 || image.is_empty() {
        return ChannelPlanes::from_image_buffer(image);
    }

    let chunk_len = row_range_len(image.width(), image.height(), threads);

    let mut planes = ChannelPlanes::zeroed(image.len());
    let [red, green, blue, alpha] = planes.planes_mut();

    let dst = red
        .chunks_mut(chunk_len)
        .zip(green.chunks_mut(chunk_len))
        .zip(blue.chunks_mut(chunk_len))
        .zip(alpha.chunks_mut(chunk_len))
        .map(|(((red, green), blue), alpha)| [red, green, blue, alpha]);

    let ranges: Vec<_> = image.pixels().chunks(chunk_len).zip(dst).collect();

    ranges
        .into_par_iter()
        .for_each(|(src, dst)| split_rows(src, dst));

    planes
}

/// Same as [`ChannelPlanes::write_into`], but every thread handles its own range of rows
#[inline(never)]
pub fn merge_channels_multi_thread(
    planes: &ChannelPlanes,
    image: &mut ImageBuffer,
) -> Result<(), DimensionMismatch> {
    let threads = num_cpus::get();

    if threads == 1 || image.is_empty() {
        return planes.write_into(image);
    }

    if image.len() != planes.len() {
        return Err(DimensionMismatch {
            expected: image.len(),
            got: planes.len(),
        });
    }

    let chunk_len = row_range_len(image.width(), image.height(), threads);

    let src = planes
        .red()
        .chunks(chunk_len)
        .zip(planes.green().chunks(chunk_len))
        .zip(planes.blue().chunks(chunk_len))
        .zip(planes.alpha().chunks(chunk_len))
        .map(|(((red, green), blue), alpha)| [red, green, blue, alpha]);

    let ranges: Vec<_> = src.zip(image.pixels_mut().chunks_mut(chunk_len)).collect();

    ranges
        .into_par_iter()
        .for_each(|(src, dst)| merge_rows(src, dst));

    Ok(())
}
