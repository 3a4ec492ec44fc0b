//! Row-parallel buffer maps.
//!
//! Every helper here allocates a fresh output buffer and fills disjoint row
//! ranges from a read-only source. Each output pixel depends only on the
//! source, so the parallel result is bit-identical to a sequential pass.

use rayon::prelude::*;

use crate::image::{PixelBuffer, Rgba8};

/// Below this many pixels the rayon dispatch costs more than it saves.
pub const PARALLEL_THRESHOLD: usize = 64 * 1024;

/// Apply `f` to every pixel of `src`, producing a new buffer.
pub fn map_pixels<F>(src: &PixelBuffer, f: F) -> PixelBuffer
where
    F: Fn(Rgba8) -> Rgba8 + Sync,
{
    map_rows(src, |y, out| {
        for (dst, &px) in out.iter_mut().zip(src.row(y)) {
            *dst = f(px);
        }
    })
}

/// Fill each output row through `fill(y, row)`.
///
/// `fill` may read anything from captured read-only state (e.g. a halo of
/// neighbouring source rows) but can only write its own row.
pub fn map_rows<F>(src: &PixelBuffer, fill: F) -> PixelBuffer
where
    F: Fn(u32, &mut [Rgba8]) + Sync,
{
    let (width, height) = src.dimensions();
    let mut out = PixelBuffer::filled(width, height, [0; 4]);
    if out.is_empty() {
        return out;
    }

    let row_len = width as usize;
    let rows = out.pixels_mut();
    if rows.len() >= PARALLEL_THRESHOLD {
        rows.par_chunks_exact_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| fill(y as u32, row));
    } else {
        for (y, row) in rows.chunks_exact_mut(row_len).enumerate() {
            fill(y as u32, row);
        }
    }
    out
}
