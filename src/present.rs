// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turning the histograms into something to look at.  A `Frame` is
//! the composed RGBA picture; a `Presenter` is wherever it is shown.

use log::{debug, info};

use crate::compute::Accelerator;
use crate::errors::Result;
use crate::histogram::Histogram;
use crate::reduce::{intensity, max_element};

/// A composed picture: one `[r, g, b, a]` per cell, row-major, each
/// component in `[0, 1]` and alpha always 1.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    height: usize,
    width: usize,
    maxima: [u32; 3],
    pixels: Vec<[f32; 4]>,
}

impl Frame {
    /// Normalize each histogram against its own maximum and combine
    /// them into one picture.  All three must share a shape.
    pub fn compose(accel: &Accelerator, histograms: &[Histogram; 3]) -> Result<Frame> {
        let [red, green, blue] = histograms;
        red.check_shape(green)?;
        red.check_shape(blue)?;

        let maxima = [
            max_element(accel, red)?,
            max_element(accel, green)?,
            max_element(accel, blue)?,
        ];
        let (height, width) = (red.height(), red.width());
        let mut pixels = vec![[0.0, 0.0, 0.0, 1.0]; height * width];
        accel.parallel_chunks("compose", &mut pixels, width, |y, row| {
            for (x, pixel) in row.iter_mut().enumerate() {
                *pixel = [
                    intensity(red.get(y, x), maxima[0]),
                    intensity(green.get(y, x), maxima[1]),
                    intensity(blue.get(y, x), maxima[2]),
                    1.0,
                ];
            }
        })?;
        Ok(Frame {
            height,
            width,
            maxima,
            pixels,
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

    /// The per-channel maxima the frame was normalized against.
    pub fn maxima(&self) -> [u32; 3] {
        self.maxima
    }

    /// Colour at `(y, x)`.
    pub fn pixel(&self, y: usize, x: usize) -> [f32; 4] {
        self.pixels[y * self.width + x]
    }

    /// Every pixel, row-major.
    pub fn pixels(&self) -> &[[f32; 4]] {
        &self.pixels
    }

    /// Shape and maxima, without the pixels.
    pub fn summary(&self) -> FrameSummary {
        FrameSummary {
            height: self.height,
            width: self.width,
            maxima: self.maxima,
        }
    }
}

/// The shape and normalization of a frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FrameSummary {
    /// Rows.
    pub height: usize,
    /// Columns.
    pub width: usize,
    /// Per-channel maxima, red first.
    pub maxima: [u32; 3],
}

/// Somewhere frames can be shown.
pub trait Presenter {
    /// Show `frame`, replacing whatever was shown before.
    fn present(&mut self, frame: &Frame) -> Result<()>;

    /// The surface frames are shown on changed size.  The canvas the
    /// histograms cover is unaffected.
    fn resize(&mut self, width: usize, height: usize);
}

/// A presenter with no window: it logs what it was given and
/// remembers the summary of the latest frame.
#[derive(Debug, Default)]
pub struct HeadlessPresenter {
    surface: (usize, usize),
    presented: u64,
    last: Option<FrameSummary>,
}

impl HeadlessPresenter {
    /// A presenter for a surface of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        HeadlessPresenter {
            surface: (width, height),
            ..HeadlessPresenter::default()
        }
    }

    /// Frames presented so far.
    pub fn presented(&self) -> u64 {
        self.presented
    }

    /// Summary of the most recent frame.
    pub fn last_shown(&self) -> Option<FrameSummary> {
        self.last
    }

    /// Current surface size, as (width, height).
    pub fn surface(&self) -> (usize, usize) {
        self.surface
    }
}

impl Presenter for HeadlessPresenter {
    fn present(&mut self, frame: &Frame) -> Result<()> {
        self.presented += 1;
        debug!(
            "present {}: {}x{} frame onto {}x{} surface, maxima r/g/b {:?}",
            self.presented,
            frame.height(),
            frame.width(),
            self.surface.0,
            self.surface.1,
            frame.maxima()
        );
        self.last = Some(frame.summary());
        Ok(())
    }

    fn resize(&mut self, width: usize, height: usize) {
        info!("surface resized to {}x{}", width, height);
        self.surface = (width, height);
    }
}
