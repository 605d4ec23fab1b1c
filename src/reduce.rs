// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Finding the brightest cell, and scaling everything else against it.

use std::sync::atomic::{AtomicU32, Ordering};

use log::trace;

use crate::compute::Accelerator;
use crate::errors::Result;
use crate::histogram::Histogram;

/// Maximum of `cells` by repeated halving: each pass folds the upper
/// half of the active range onto the lower half with an atomic max,
/// until one cell is left.  Passes are separate dispatches, so each
/// one sees every write of the one before.  `cells` is used as
/// scratch space and is left in an unspecified state.
pub fn tree_max(accel: &Accelerator, cells: &[AtomicU32]) -> Result<u32> {
    if cells.is_empty() {
        return Ok(0);
    }
    let mut active = cells.len();
    while active > 1 {
        let upper = (active + 1) / 2;
        trace!("fold {} cells onto {}", active - upper, upper);
        accel.parallel_for("reduce_max", active - upper, |i| {
            let v = cells[i + upper].load(Ordering::Relaxed);
            cells[i].fetch_max(v, Ordering::Relaxed);
        })?;
        active = upper;
    }
    Ok(cells[0].load(Ordering::Relaxed))
}

/// Maximum of a device histogram.  Works on a scratch copy; the
/// histogram itself is untouched.
pub fn max_element(accel: &Accelerator, histogram: &Histogram) -> Result<u32> {
    let scratch: Vec<AtomicU32> = histogram
        .cells()
        .iter()
        .map(|c| AtomicU32::new(c.load(Ordering::Relaxed)))
        .collect();
    tree_max(accel, &scratch)
}

/// Maximum of host values, by the same reduction.
pub fn max_of(accel: &Accelerator, values: &[u32]) -> Result<u32> {
    let scratch: Vec<AtomicU32> = values.iter().map(|&v| AtomicU32::new(v)).collect();
    tree_max(accel, &scratch)
}

/// Brightness of a cell in `[0, 1]`.  The square root lifts the faint
/// regions relative to the few very dense ones.  An empty histogram
/// (`max == 0`) is black rather than a division by zero.
#[inline]
pub fn intensity(count: u32, max: u32) -> f32 {
    if max == 0 {
        return 0.0;
    }
    (count as f32 / max as f32).sqrt().min(1.0)
}

/// `intensity` as an 8-bit channel value.
#[inline]
pub fn channel_byte(count: u32, max: u32) -> u8 {
    (255.0 * intensity(count, max)) as u8
}
