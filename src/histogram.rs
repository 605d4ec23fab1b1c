// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Counter grids.  A `Histogram` lives on the device and is only
//! ever incremented; reading it means an explicit, blocking
//! `readback()` into a `HostHistogram`.

use std::sync::atomic::{AtomicU32, Ordering};

use crate::compute::Location;
use crate::errors::{Error, Result};

/// A `height x width` grid of atomic counters, stored row-major.
#[derive(Debug)]
pub struct Histogram {
    height: usize,
    width: usize,
    cells: Vec<AtomicU32>,
}

impl Histogram {
    /// A zeroed grid.  Rejects grids with no cells.
    pub fn new(height: usize, width: usize) -> Result<Self> {
        if height == 0 || width == 0 {
            return Err(Error::EmptyCanvas { height, width });
        }
        Ok(Histogram {
            height,
            width,
            cells: (0..height * width).map(|_| AtomicU32::new(0)).collect(),
        })
    }

    /// Rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Never true for a constructed histogram.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Always `Location::Device`.
    pub fn location(&self) -> Location {
        Location::Device
    }

    /// Atomically add one to cell `(y, x)`.  Safe to call from any
    /// number of lanes at once; increments commute, so relaxed
    /// ordering is enough.
    #[inline]
    pub fn increment(&self, y: usize, x: usize) {
        self.cells[y * self.width + x].fetch_add(1, Ordering::Relaxed);
    }

    /// Increment `(y, x)` and its mirror `(y, width - 1 - x)`.  The
    /// set is symmetric about the real axis, which runs down the
    /// middle column of the canvas.
    #[inline]
    pub fn increment_mirrored(&self, y: usize, x: usize) {
        self.increment(y, x);
        self.increment(y, self.width - 1 - x);
    }

    /// Current value of one cell.  Only meaningful between passes.
    pub fn get(&self, y: usize, x: usize) -> u32 {
        self.cells[y * self.width + x].load(Ordering::Relaxed)
    }

    /// The raw counters, for kernels that work on flat indices.
    pub fn cells(&self) -> &[AtomicU32] {
        &self.cells
    }

    /// Copy the counters to host memory.  The caller must not have a
    /// pass in flight; every dispatch in this crate blocks until it
    /// completes, so holding `&self` is enough to guarantee that.
    pub fn readback(&self) -> HostHistogram {
        HostHistogram {
            height: self.height,
            width: self.width,
            cells: self.cells.iter().map(|c| c.load(Ordering::Relaxed)).collect(),
        }
    }

    /// Fail unless `other` has the same shape as this grid.
    pub fn check_shape(&self, other: &Histogram) -> Result<()> {
        if self.height != other.height || self.width != other.width {
            return Err(Error::DimensionMismatch {
                height: self.height,
                width: self.width,
                found_height: other.height,
                found_width: other.width,
            });
        }
        Ok(())
    }
}

/// A plain copy of a histogram in caller-owned memory.
#[derive(Clone, Debug, PartialEq)]
pub struct HostHistogram {
    height: usize,
    width: usize,
    cells: Vec<u32>,
}

impl HostHistogram {
    /// Wrap an existing row-major buffer.
    pub fn from_vec(height: usize, width: usize, cells: Vec<u32>) -> Result<Self> {
        if cells.len() != height * width {
            return Err(Error::DimensionMismatch {
                height,
                width,
                found_height: cells.len() / width.max(1),
                found_width: width,
            });
        }
        Ok(HostHistogram {
            height,
            width,
            cells,
        })
    }

    /// Rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Always `Location::Host`.
    pub fn location(&self) -> Location {
        Location::Host
    }

    /// Value at `(y, x)`.
    pub fn get(&self, y: usize, x: usize) -> u32 {
        self.cells[y * self.width + x]
    }

    /// The counters, row-major.
    pub fn cells(&self) -> &[u32] {
        &self.cells
    }

    /// Sum of every cell.
    pub fn total(&self) -> u64 {
        self.cells.iter().map(|&c| u64::from(c)).sum()
    }
}
