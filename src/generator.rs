// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The BuddhabrotGenerator owns the three exposure histograms and
//! drives passes over them.  Each call to `iterate()` draws a fresh
//! batch of samples and adds their orbits to the histograms, so the
//! picture only ever gets denser; the counts go back to zero only
//! when the canvas is resized.

use log::{debug, info};

use crate::accumulate::{accumulate, Tally};
use crate::compute::Accelerator;
use crate::config::RenderConfig;
use crate::errors::Result;
use crate::escape::Channel;
use crate::histogram::Histogram;
use crate::planes::PlaneMapper;
use crate::sampler::{clock_seed, ComplexSample, RandomField};

fn channel_histograms(height: usize, width: usize) -> Result<[Histogram; 3]> {
    Ok([
        Histogram::new(height, width)?,
        Histogram::new(height, width)?,
        Histogram::new(height, width)?,
    ])
}

/// Accumulates a three-channel Buddhabrot.
#[derive(Debug)]
pub struct BuddhabrotGenerator {
    accel: Accelerator,
    config: RenderConfig,
    plane: PlaneMapper,
    field: RandomField,
    histograms: [Histogram; 3],
    passes: u64,
}

impl BuddhabrotGenerator {
    /// Validates the configuration and allocates zeroed histograms.
    pub fn new(accel: Accelerator, config: RenderConfig) -> Result<Self> {
        config.validate()?;
        let plane = PlaneMapper::new(config.height, config.width, config.extent)?;
        let field = RandomField::new(config.points_per_iteration, config.extent)?;
        let histograms = channel_histograms(config.height, config.width)?;
        info!(
            "canvas {}x{}, {} points per pass in {} streams, {} lanes",
            config.height,
            config.width,
            field.points(),
            field.streams(),
            accel.lanes()
        );
        for channel in Channel::ALL.iter() {
            info!("{} band {}", channel, config.ranges[channel.index()]);
        }
        Ok(BuddhabrotGenerator {
            accel,
            config,
            plane,
            field,
            histograms,
            passes: 0,
        })
    }

    /// Base seed for the next pass.  A fixed seed is offset by the
    /// pass number so each pass draws a new batch while a whole run
    /// stays reproducible.
    fn pass_seed(&self) -> u32 {
        match self.config.seed {
            Some(seed) => seed.wrapping_add(self.passes as u32),
            None => clock_seed(),
        }
    }

    /// One full pass: draw a batch, test it, plot the orbits.
    pub fn iterate(&mut self) -> Result<Tally> {
        let seed = self.pass_seed();
        let batch = self.field.generate(&self.accel, seed)?;
        let tally = self.accumulate(batch.samples())?;
        self.passes += 1;
        debug!(
            "pass {}: {} escaped, plotted r/g/b {:?}",
            self.passes, tally.escaped, tally.plotted
        );
        Ok(tally)
    }

    /// Test and plot an explicit batch of samples.
    pub fn accumulate(&self, samples: &[ComplexSample]) -> Result<Tally> {
        accumulate(
            &self.accel,
            &self.plane,
            &self.histograms,
            &self.config.ranges,
            self.config.warmup,
            samples,
        )
    }

    /// Throw away every count and start over on a canvas of the new
    /// size.
    pub fn resize(&mut self, height: usize, width: usize) -> Result<()> {
        let plane = PlaneMapper::new(height, width, self.config.extent)?;
        let histograms = channel_histograms(height, width)?;
        info!(
            "canvas resized from {}x{} to {}x{}; discarding {} passes",
            self.config.height, self.config.width, height, width, self.passes
        );
        self.plane = plane;
        self.histograms = histograms;
        self.config.height = height;
        self.config.width = width;
        self.passes = 0;
        Ok(())
    }

    /// The histogram for one band.
    pub fn histogram(&self, channel: Channel) -> &Histogram {
        &self.histograms[channel.index()]
    }

    /// All three histograms, red first.
    pub fn histograms(&self) -> &[Histogram; 3] {
        &self.histograms
    }

    /// Passes completed since creation or the last resize.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// The configuration in force, including the current canvas size.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// The accelerator passes are dispatched on.
    pub fn accelerator(&self) -> &Accelerator {
        &self.accel
    }
}
