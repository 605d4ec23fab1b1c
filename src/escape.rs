// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Escape testing.  A sample is iterated until it leaves the circle
//! of radius 2 or runs out of iterations, and the iteration at which
//! it left decides which exposure band, if any, it belongs to.

use std::fmt;
use std::ops::Range;

use num::Complex;

/// One of the three exposure bands.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    /// First band tested.
    Red,
    /// Second band tested.
    Green,
    /// Third band tested.
    Blue,
}

impl Channel {
    /// All channels, in matching order.
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];

    /// Position of this channel in `ALL`.
    pub fn index(self) -> usize {
        match self {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Channel::Red => "red",
            Channel::Green => "green",
            Channel::Blue => "blue",
        };
        f.write_str(name)
    }
}

/// A half-open band `[min, max)` of escape iterations.  Nothing stops
/// a band from being empty or overlapping another; an empty band
/// simply never matches.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct IterationRange {
    /// Smallest escape iteration in the band.
    pub min: usize,
    /// One past the largest escape iteration in the band.
    pub max: usize,
}

impl IterationRange {
    /// The band `[min, max)`.
    pub fn new(min: usize, max: usize) -> Self {
        IterationRange { min, max }
    }

    /// Whether escape iteration `i` falls in the band.
    #[inline]
    pub fn contains(&self, i: usize) -> bool {
        i >= self.min && i < self.max
    }
}

impl From<Range<usize>> for IterationRange {
    fn from(r: Range<usize>) -> Self {
        IterationRange::new(r.start, r.end)
    }
}

impl fmt::Display for IterationRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}, {})", self.min, self.max)
    }
}

/// What happened to one sample.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum EscapeOutcome {
    /// Left the circle of radius 2 at `iteration`.  `channel` is the
    /// first band containing that iteration, if any.
    Escaped {
        /// Zero-based iteration at which `|z|^2` first reached 4.
        iteration: usize,
        /// Band the orbit is plotted into.
        channel: Option<Channel>,
    },
    /// Still bounded after the iteration limit.
    Bounded,
}

impl EscapeOutcome {
    /// The band and escape iteration, if this sample is to be plotted.
    pub fn target(&self) -> Option<(Channel, usize)> {
        match *self {
            EscapeOutcome::Escaped {
                iteration,
                channel: Some(channel),
            } => Some((channel, iteration)),
            _ => None,
        }
    }
}

/// This is our classic iterator function, which either returns the
/// zero-based iteration at which the point escaped the circle of
/// radius 2, or nothing at all if it was still inside after
/// `max_iterations` steps.
#[inline]
pub fn iterate_sample(c: &Complex<f32>, max_iterations: usize) -> Option<usize> {
    let mut z = Complex::new(0.0_f32, 0.0_f32);
    for i in 0..max_iterations {
        z = *c + z * z;
        if z.norm_sqr() >= 4.0 {
            return Some(i);
        }
    }
    None
}

/// The first band, tested red, green, blue, that contains `i`.
pub fn pick_channel(ranges: &[IterationRange; 3], i: usize) -> Option<Channel> {
    Channel::ALL
        .iter()
        .zip(ranges.iter())
        .find(|(_, range)| range.contains(i))
        .map(|(&channel, _)| channel)
}

/// The largest upper bound across all bands; no sample is iterated
/// further than this.
pub fn overall_max(ranges: &[IterationRange; 3]) -> usize {
    ranges.iter().map(|r| r.max).max().unwrap_or(0)
}

/// Classify one sample against the three bands.
pub fn classify(c: &Complex<f32>, ranges: &[IterationRange; 3]) -> EscapeOutcome {
    match iterate_sample(c, overall_max(ranges)) {
        Some(iteration) => EscapeOutcome::Escaped {
            iteration,
            channel: pick_channel(ranges, iteration),
        },
        None => EscapeOutcome::Bounded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::distributions::{Distribution, Uniform};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn bands(a: Range<usize>, b: Range<usize>, c: Range<usize>) -> [IterationRange; 3] {
        [a.into(), b.into(), c.into()]
    }

    #[test]
    fn points_outside_radius_two_escape_immediately() {
        assert_eq!(iterate_sample(&Complex::new(1.5, 1.5), 10), Some(0));
    }

    #[test]
    fn known_escape_iterations() {
        assert_eq!(iterate_sample(&Complex::new(1.0, 0.0), 10), Some(1));
        assert_eq!(iterate_sample(&Complex::new(0.6, 0.0), 10), Some(3));
        assert_eq!(iterate_sample(&Complex::new(0.5, 0.0), 10), Some(4));
    }

    #[test]
    fn interior_points_never_escape() {
        assert_eq!(iterate_sample(&Complex::new(0.0, 0.0), 1000), None);
        assert_eq!(iterate_sample(&Complex::new(-1.0, 0.0), 1000), None);
        assert_eq!(iterate_sample(&Complex::new(0.0, 1.0), 1000), None);
    }

    #[test]
    fn escape_is_never_reported_past_the_limit() {
        let mut rng = StdRng::seed_from_u64(7);
        let u = Uniform::new(-2.0_f32, 2.0_f32);
        for limit in &[0usize, 1, 5, 50, 500] {
            for _ in 0..2_000 {
                let c = Complex::new(u.sample(&mut rng), u.sample(&mut rng));
                if c.norm_sqr() > 4.0 {
                    continue;
                }
                if let Some(i) = iterate_sample(&c, *limit) {
                    assert!(i < *limit, "{} escaped at {} with limit {}", c, i, limit);
                }
            }
        }
    }

    #[test]
    fn first_matching_band_wins() {
        let overlapping = bands(0..10, 5..20, 0..100);
        assert_eq!(pick_channel(&overlapping, 7), Some(Channel::Red));
        assert_eq!(pick_channel(&overlapping, 12), Some(Channel::Green));
        assert_eq!(pick_channel(&overlapping, 50), Some(Channel::Blue));
        assert_eq!(pick_channel(&overlapping, 100), None);
    }

    #[test]
    fn gaps_and_empty_bands_match_nothing() {
        let gappy = bands(0..2, 5..5, 8..10);
        assert_eq!(pick_channel(&gappy, 3), None);
        assert_eq!(pick_channel(&gappy, 5), None);
        assert_eq!(pick_channel(&gappy, 9), Some(Channel::Blue));
    }

    #[test]
    fn classify_respects_band_bounds() {
        let ranges = bands(0..2, 2..4, 4..6);
        let mut rng = StdRng::seed_from_u64(11);
        let u = Uniform::new(-1.8_f32, 1.8_f32);
        for _ in 0..5_000 {
            let c = Complex::new(u.sample(&mut rng), u.sample(&mut rng));
            if let Some((channel, i)) = classify(&c, &ranges).target() {
                assert!(ranges[channel.index()].contains(i));
            }
        }
    }

    #[test]
    fn classify_reports_unmatched_escapes() {
        let ranges = bands(2..3, 3..4, 4..5);
        assert_eq!(
            classify(&Complex::new(1.5, 1.5), &ranges),
            EscapeOutcome::Escaped {
                iteration: 0,
                channel: None
            }
        );
        assert_eq!(classify(&Complex::new(0.0, 0.0), &ranges), EscapeOutcome::Bounded);
    }

    #[test]
    fn overall_max_is_largest_upper_bound() {
        assert_eq!(overall_max(&bands(0..1024, 1024..2048, 2048..4096)), 4096);
        assert_eq!(overall_max(&bands(0..90, 0..10, 0..30)), 90);
    }
}
