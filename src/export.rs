// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Writing the finished histograms out as a PNG.

use std::fs::File;
use std::path::Path;

use failure::{Error, ResultExt};
use image::png::PNGEncoder;
use image::ColorType;
use itertools::izip;
use log::info;

use crate::compute::Accelerator;
use crate::histogram::{Histogram, HostHistogram};
use crate::reduce::{channel_byte, max_of};

/// Pack three host histograms into 8-bit BGRA, each channel scaled
/// against its own maximum.  Alpha is always opaque.
pub fn bgra_bytes(channels: &[HostHistogram; 3], maxima: [u32; 3]) -> Vec<u8> {
    let [red, green, blue] = channels;
    let mut buffer = Vec::with_capacity(red.cells().len() * 4);
    for (&r, &g, &b) in izip!(red.cells(), green.cells(), blue.cells()) {
        buffer.extend_from_slice(&[
            channel_byte(b, maxima[2]),
            channel_byte(g, maxima[1]),
            channel_byte(r, maxima[0]),
            255,
        ]);
    }
    buffer
}

/// Write host histograms to `path`.  The maxima are found with the
/// same reduction the presenter uses.
pub fn write_png_from_host(
    accel: &Accelerator,
    path: &Path,
    channels: &[HostHistogram; 3],
) -> Result<(), Error> {
    let [red, green, blue] = channels;
    for other in &[green, blue] {
        if (other.height(), other.width()) != (red.height(), red.width()) {
            return Err(crate::errors::Error::DimensionMismatch {
                height: red.height(),
                width: red.width(),
                found_height: other.height(),
                found_width: other.width(),
            }
            .into());
        }
    }
    let maxima = [
        max_of(accel, red.cells())?,
        max_of(accel, green.cells())?,
        max_of(accel, blue.cells())?,
    ];
    let mut pixels = bgra_bytes(channels, maxima);
    // PNG stores RGBA; swap blue and red back on the way out.
    for pixel in pixels.chunks_mut(4) {
        pixel.swap(0, 2);
    }

    let output = File::create(path).context(format!("creating {}", path.display()))?;
    let encoder = PNGEncoder::new(output);
    encoder
        .encode(
            &pixels,
            red.width() as u32,
            red.height() as u32,
            ColorType::RGBA(8),
        )
        .context(format!("encoding {}", path.display()))?;
    info!(
        "wrote {}x{} image to {}, maxima r/g/b {:?}",
        red.width(),
        red.height(),
        path.display(),
        maxima
    );
    Ok(())
}

/// Read the device histograms back and write them to `path`.
pub fn write_png(accel: &Accelerator, path: &Path, histograms: &[Histogram; 3]) -> Result<(), Error> {
    let [red, green, blue] = histograms;
    let host = [red.readback(), green.readback(), blue.readback()];
    write_png_from_host(accel, path, &host)
}
