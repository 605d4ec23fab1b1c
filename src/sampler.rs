// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Random sample batches.
//!
//! A batch of `n` samples is laid out as `sqrt(n)` streams of
//! `sqrt(n)` samples each.  Every stream has its own generator,
//! seeded with `base_seed * stream`, and fills its run of the batch
//! front to back, so a given seed always yields the same batch no
//! matter how the streams are scheduled.  Streams sharing a
//! multiplicative seed relationship are weakly correlated, which is
//! fine for a picture.

use std::time::{SystemTime, UNIX_EPOCH};

use log::debug;
use num::Complex;
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::compute::{Accelerator, Location};
use crate::errors::{Error, Result};

/// A candidate point of the complex plane.
pub type ComplexSample = Complex<f32>;

/// `Some(r)` if `n == r * r`.
pub fn exact_sqrt(n: usize) -> Option<usize> {
    let guess = (n as f64).sqrt() as usize;
    // The float root can be off by one for large n.
    (guess.saturating_sub(1)..=guess + 1).find(|r| r.checked_mul(*r) == Some(n))
}

/// A seed taken from the wall clock, as the low bits of the
/// nanoseconds since the epoch.
pub fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u32)
        .unwrap_or(0)
}

/// A uniform draw from the sampling square, one stream's worth.
struct StreamPoint(Uniform<f32>, StdRng);

impl StreamPoint {
    pub fn new(extent: f32, seed: u32) -> Self {
        StreamPoint(
            Uniform::new(-extent, extent),
            StdRng::seed_from_u64(u64::from(seed)),
        )
    }

    pub fn get(&mut self) -> ComplexSample {
        let re = self.0.sample(&mut self.1);
        let im = self.0.sample(&mut self.1);
        Complex::new(re, im)
    }
}

/// A device-resident batch of samples.
#[derive(Debug)]
pub struct SampleBatch {
    samples: Vec<ComplexSample>,
}

impl SampleBatch {
    /// Always `Location::Device`.
    pub fn location(&self) -> Location {
        Location::Device
    }

    /// The samples, for kernels.
    pub fn samples(&self) -> &[ComplexSample] {
        &self.samples
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True for a batch with no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Copy the samples to caller-owned memory.
    pub fn readback(&self) -> Vec<ComplexSample> {
        self.samples.clone()
    }
}

/// Produces batches of uniformly distributed samples.
#[derive(Clone, Debug)]
pub struct RandomField {
    points: usize,
    streams: usize,
    extent: f32,
}

impl RandomField {
    /// A field of `points` samples per batch over `[-extent, extent)^2`.
    /// `points` must be a positive perfect square.
    pub fn new(points: usize, extent: f64) -> Result<Self> {
        if points == 0 {
            return Err(Error::NoSamples);
        }
        if !(extent.is_finite() && extent > 0.0) {
            return Err(Error::BadExtent { extent });
        }
        let streams = exact_sqrt(points).ok_or(Error::NotPerfectSquare { points })?;
        Ok(RandomField {
            points,
            streams,
            extent: extent as f32,
        })
    }

    /// Samples per batch.
    pub fn points(&self) -> usize {
        self.points
    }

    /// Independent streams per batch; also the length of each stream.
    pub fn streams(&self) -> usize {
        self.streams
    }

    /// Fill a fresh batch, one lane per stream.
    pub fn generate(&self, accel: &Accelerator, base_seed: u32) -> Result<SampleBatch> {
        debug!(
            "generating {} samples in {} streams, seed {}",
            self.points, self.streams, base_seed
        );
        let mut samples = vec![Complex::new(0.0, 0.0); self.points];
        let extent = self.extent;
        accel.parallel_chunks("generate", &mut samples, self.streams, |stream, run| {
            let mut rng = StreamPoint::new(extent, base_seed.wrapping_mul(stream as u32));
            for sample in run.iter_mut() {
                *sample = rng.get();
            }
        })?;
        Ok(SampleBatch { samples })
    }
}
