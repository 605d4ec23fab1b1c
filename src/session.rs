// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The idle loop.  Whatever owns the window hands us events; every
//! time it has nothing to say we run one pass and present the result.

use std::time::Instant;

use log::{debug, info};

use crate::errors::Result;
use crate::generator::BuddhabrotGenerator;
use crate::present::{Frame, Presenter};

/// Something the windowing layer wants us to know.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// The presentation surface changed size.
    Resize {
        /// New surface width.
        width: usize,
        /// New surface height.
        height: usize,
    },
    /// The canvas itself changed size.  All accumulated counts are
    /// lost.
    Canvas {
        /// New canvas rows.
        height: usize,
        /// New canvas columns.
        width: usize,
    },
    /// Stop after the current tick.
    Quit,
}

/// A source of window events.  `None` means the loop is idle.
pub trait EventSource {
    /// The next pending event, if any.
    fn poll(&mut self) -> Option<Event>;
}

/// Quits after a fixed number of idle ticks.  Stands in for a window
/// when running headless.
#[derive(Debug)]
pub struct FrameBudget {
    remaining: u64,
}

impl FrameBudget {
    /// Allow `frames` idle ticks.
    pub fn new(frames: u64) -> Self {
        FrameBudget { remaining: frames }
    }
}

impl EventSource for FrameBudget {
    fn poll(&mut self) -> Option<Event> {
        if self.remaining == 0 {
            return Some(Event::Quit);
        }
        self.remaining -= 1;
        None
    }
}

/// Run until the event source says to quit.  Returns the number of
/// passes run.
pub fn run<E, P>(generator: &mut BuddhabrotGenerator, presenter: &mut P, events: &mut E) -> Result<u64>
where
    E: EventSource,
    P: Presenter,
{
    let started = Instant::now();
    let mut ticks = 0;
    loop {
        match events.poll() {
            Some(Event::Quit) => break,
            Some(Event::Resize { width, height }) => presenter.resize(width, height),
            Some(Event::Canvas { height, width }) => generator.resize(height, width)?,
            None => {
                let pass = Instant::now();
                generator.iterate()?;
                let frame = Frame::compose(generator.accelerator(), generator.histograms())?;
                presenter.present(&frame)?;
                ticks += 1;
                debug!("tick {} took {:?}", ticks, pass.elapsed());
            }
        }
    }
    info!("{} passes in {:?}", ticks, started.elapsed());
    Ok(ticks)
}
