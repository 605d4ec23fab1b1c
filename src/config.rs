// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The knobs of a render.  Once a generator has been built from a
//! `RenderConfig` the configuration does not change, except for the
//! canvas size on resize.

use crate::errors::{Error, Result};
use crate::escape::{overall_max, IterationRange};
use crate::sampler::exact_sqrt;

/// Default canvas side, in pixels.
pub const DEFAULT_DIMENSION: usize = 4096;

/// Default samples per pass.
pub const DEFAULT_POINTS: usize = 2048 * 2048;

/// Default number of orbit steps skipped before plotting begins.
pub const DEFAULT_WARMUP: usize = 400;

/// Default half-width of the sampling square.
pub const DEFAULT_EXTENT: f64 = 1.8;

/// Default red, green and blue bands.
pub const DEFAULT_RANGES: [IterationRange; 3] = [
    IterationRange { min: 0, max: 1024 },
    IterationRange {
        min: 1024,
        max: 2048,
    },
    IterationRange {
        min: 2048,
        max: 4096,
    },
];

/// Everything the generator needs to know.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderConfig {
    /// Canvas rows.
    pub height: usize,
    /// Canvas columns.
    pub width: usize,
    /// Samples drawn per pass; a positive perfect square.
    pub points_per_iteration: usize,
    /// Red, green and blue bands, tested in that order.
    pub ranges: [IterationRange; 3],
    /// Orbit steps skipped before plotting begins.  These early steps
    /// are shared by nearly every orbit and would swamp the picture.
    pub warmup: usize,
    /// Samples are drawn from, and orbits plotted over, the square
    /// `[-extent, extent)^2`.
    pub extent: f64,
    /// Base seed for the sample streams.  `None` reseeds from the
    /// clock on every pass.
    pub seed: Option<u32>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            height: DEFAULT_DIMENSION,
            width: DEFAULT_DIMENSION,
            points_per_iteration: DEFAULT_POINTS,
            ranges: DEFAULT_RANGES,
            warmup: DEFAULT_WARMUP,
            extent: DEFAULT_EXTENT,
            seed: None,
        }
    }
}

impl RenderConfig {
    /// A square canvas of side `dimension`.
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.height = dimension;
        self.width = dimension;
        self
    }

    /// Samples per pass.
    pub fn with_points(mut self, points_per_iteration: usize) -> Self {
        self.points_per_iteration = points_per_iteration;
        self
    }

    /// Red, green and blue bands.
    pub fn with_ranges(mut self, ranges: [IterationRange; 3]) -> Self {
        self.ranges = ranges;
        self
    }

    /// Steps skipped before plotting.
    pub fn with_warmup(mut self, warmup: usize) -> Self {
        self.warmup = warmup;
        self
    }

    /// Half-width of the sampling square.
    pub fn with_extent(mut self, extent: f64) -> Self {
        self.extent = extent;
        self
    }

    /// Fixed base seed.
    pub fn with_seed(mut self, seed: Option<u32>) -> Self {
        self.seed = seed;
        self
    }

    /// Iteration limit for the escape test.
    pub fn max_iterations(&self) -> usize {
        overall_max(&self.ranges)
    }

    /// Reject configurations that cannot produce a well-defined pass.
    pub fn validate(&self) -> Result<()> {
        if self.height == 0 || self.width == 0 {
            return Err(Error::EmptyCanvas {
                height: self.height,
                width: self.width,
            });
        }
        if self.points_per_iteration == 0 {
            return Err(Error::NoSamples);
        }
        if exact_sqrt(self.points_per_iteration).is_none() {
            return Err(Error::NotPerfectSquare {
                points: self.points_per_iteration,
            });
        }
        if !(self.extent.is_finite() && self.extent > 0.0) {
            return Err(Error::BadExtent {
                extent: self.extent,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = RenderConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_iterations(), 4096);
        assert_eq!(config.points_per_iteration, 2048 * 2048);
        assert_eq!(config.warmup, 400);
    }

    #[test]
    fn non_square_points_are_rejected() {
        let config = RenderConfig::default().with_points(2048 * 2047);
        assert_eq!(
            config.validate(),
            Err(Error::NotPerfectSquare {
                points: 2048 * 2047
            })
        );
    }

    #[test]
    fn empty_canvas_is_rejected() {
        let config = RenderConfig::default().with_dimension(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn bands_need_not_be_ordered() {
        let config = RenderConfig::default().with_ranges([
            IterationRange::new(500, 600),
            IterationRange::new(0, 50),
            IterationRange::new(10, 10),
        ]);
        assert!(config.validate().is_ok());
        assert_eq!(config.max_iterations(), 600);
    }

    #[test]
    fn bad_extent_is_rejected() {
        let config = RenderConfig::default().with_extent(-1.0);
        assert_eq!(config.validate(), Err(Error::BadExtent { extent: -1.0 }));
    }
}
