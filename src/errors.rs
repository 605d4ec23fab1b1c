// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors raised while configuring or driving the renderer.  Numeric
//! corner cases (an all-zero histogram, a point orbiting off the
//! canvas) are not errors; they are handled where they occur.

use failure::Fail;

/// Everything that can go wrong inside the library proper.
#[derive(Debug, Fail, PartialEq)]
pub enum Error {
    /// The sample grid is `sqrt(n)` streams of `sqrt(n)` samples, so
    /// anything else would leave part of the batch unwritten.
    #[fail(display = "points per iteration ({}) must be a perfect square", points)]
    NotPerfectSquare {
        /// The rejected count.
        points: usize,
    },

    /// Zero points per iteration would make every pass a no-op.
    #[fail(display = "points per iteration must be greater than zero")]
    NoSamples,

    /// The canvas must have at least one row and one column.
    #[fail(display = "canvas of {}x{} has no cells", height, width)]
    EmptyCanvas {
        /// Rows requested.
        height: usize,
        /// Columns requested.
        width: usize,
    },

    /// The sampling square must have a positive, finite half-width.
    #[fail(display = "sampling extent {} is not a positive finite number", extent)]
    BadExtent {
        /// The rejected half-width.
        extent: f64,
    },

    /// A lane of the accelerator panicked part-way through a kernel.
    /// Whatever the kernel was writing is in an unknown state.
    #[fail(display = "a compute lane failed while running {}", kernel)]
    LaneFailure {
        /// Name of the kernel that was dispatched.
        kernel: &'static str,
    },

    /// Channels handed to a consumer together must share a shape.
    #[fail(
        display = "histogram is {}x{}, expected {}x{}",
        found_height, found_width, height, width
    )]
    DimensionMismatch {
        /// Expected rows.
        height: usize,
        /// Expected columns.
        width: usize,
        /// Rows found.
        found_height: usize,
        /// Columns found.
        found_width: usize,
    },
}

/// Library-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
