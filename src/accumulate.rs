// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Plotting orbits.
//!
//! Rather than remember each orbit while testing it for escape, the
//! orbit is computed a second time once we know it escapes and which
//! band it belongs to.  Every step past the warm-up is mapped onto
//! the canvas and counted, together with its mirror image.

use std::sync::atomic::{AtomicUsize, Ordering};

use num::Complex;

use crate::compute::Accelerator;
use crate::errors::Result;
use crate::escape::{classify, EscapeOutcome, IterationRange};
use crate::histogram::Histogram;
use crate::planes::PlaneMapper;
use crate::sampler::ComplexSample;

/// Counts of what happened to the samples of one batch.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    /// Samples that left the circle of radius 2.
    pub escaped: usize,
    /// Escaped samples whose orbit was plotted, per channel.
    pub plotted: [usize; 3],
}

/// Replay the orbit of `c` for its first `escape_iteration` steps and
/// count every step from `warmup` on, in the cell it lands in and in
/// that cell's mirror.  Steps that land off the canvas are dropped,
/// mirror included, so the two halves always receive the same counts.
pub fn plot(
    plane: &PlaneMapper,
    histogram: &Histogram,
    c: &ComplexSample,
    escape_iteration: usize,
    warmup: usize,
) {
    let mut z = Complex::new(0.0_f32, 0.0_f32);
    for j in 0..escape_iteration {
        z = *c + z * z;
        if j < warmup {
            continue;
        }
        if let Some(pixel) = plane.point_to_pixel(&z) {
            histogram.increment_mirrored(pixel.0, pixel.1);
        }
    }
}

/// Classify every sample of a batch and plot the ones that land in a
/// band into that band's histogram.  Lanes share nothing but the
/// histograms, which only see atomic increments.
pub fn accumulate(
    accel: &Accelerator,
    plane: &PlaneMapper,
    histograms: &[Histogram; 3],
    ranges: &[IterationRange; 3],
    warmup: usize,
    samples: &[ComplexSample],
) -> Result<Tally> {
    let escaped = AtomicUsize::new(0);
    let plotted = [
        AtomicUsize::new(0),
        AtomicUsize::new(0),
        AtomicUsize::new(0),
    ];

    accel.parallel_for("accumulate", samples.len(), |i| {
        let c = &samples[i];
        let outcome = classify(c, ranges);
        if let Some((channel, iteration)) = outcome.target() {
            debug_assert!(ranges[channel.index()].contains(iteration));
            plot(plane, &histograms[channel.index()], c, iteration, warmup);
            plotted[channel.index()].fetch_add(1, Ordering::Relaxed);
        }
        if outcome != EscapeOutcome::Bounded {
            escaped.fetch_add(1, Ordering::Relaxed);
        }
    })?;

    let count = |k: usize| plotted[k].load(Ordering::Relaxed);
    Ok(Tally {
        escaped: escaped.into_inner(),
        plotted: [count(0), count(1), count(2)],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planes::Pixel;

    fn grid(h: &Histogram) -> Vec<Vec<u32>> {
        (0..h.height())
            .map(|y| (0..h.width()).map(|x| h.get(y, x)).collect())
            .collect()
    }

    #[test]
    fn plot_counts_each_step_and_its_mirror() {
        let plane = PlaneMapper::new(4, 4, 1.8).unwrap();
        let h = Histogram::new(4, 4).unwrap();
        // 0.6 escapes at iteration 3 after visiting 0.6, 0.96, 1.5216.
        plot(&plane, &h, &Complex::new(0.6, 0.0), 3, 0);
        assert_eq!(
            grid(&h),
            vec![
                vec![0, 0, 0, 0],
                vec![0, 0, 0, 0],
                vec![0, 1, 1, 0],
                vec![0, 2, 2, 0],
            ]
        );
    }

    #[test]
    fn warmup_steps_are_not_counted() {
        let plane = PlaneMapper::new(4, 4, 1.8).unwrap();
        let h = Histogram::new(4, 4).unwrap();
        plot(&plane, &h, &Complex::new(0.6, 0.0), 3, 1);
        assert_eq!(h.get(2, 1), 0);
        assert_eq!(h.get(3, 1), 2);
        plot(&plane, &h, &Complex::new(0.6, 0.0), 3, 3);
        assert_eq!(h.readback().total(), 4);
    }

    #[test]
    fn off_canvas_steps_are_dropped_in_pairs() {
        let plane = PlaneMapper::new(8, 8, 1.8).unwrap();
        let h = Histogram::new(8, 8).unwrap();
        // Starts outside the square, and never comes back before escape.
        plot(&plane, &h, &Complex::new(1.9, 0.0), 5, 0);
        assert_eq!(h.readback().total(), 0);
    }

    #[test]
    fn accumulation_is_mirror_symmetric() {
        let plane = PlaneMapper::new(33, 32, 1.8).unwrap();
        let hs = [
            Histogram::new(33, 32).unwrap(),
            Histogram::new(33, 32).unwrap(),
            Histogram::new(33, 32).unwrap(),
        ];
        let ranges = [
            IterationRange::new(0, 20),
            IterationRange::new(20, 100),
            IterationRange::new(100, 1000),
        ];
        let field = crate::sampler::RandomField::new(64 * 64, 1.8).unwrap();
        let accel = Accelerator::new(4);
        let batch = field.generate(&accel, 77).unwrap();
        let tally = accumulate(&accel, &plane, &hs, &ranges, 2, batch.samples()).unwrap();
        assert!(tally.escaped > 0);
        assert!(tally.plotted.iter().sum::<usize>() <= tally.escaped);

        for h in hs.iter() {
            for y in 0..h.height() {
                for x in 0..h.width() {
                    let mirror = plane.mirror(Pixel(y, x));
                    assert_eq!(h.get(y, x), h.get(mirror.0, mirror.1));
                }
            }
        }
    }
}
