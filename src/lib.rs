#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Buddhabrot accumulator
//!
//! The Buddhabrot is a variant of the Mandelbrot set that plots not
//! how fast a point escapes, but where it goes on the way out.  A
//! point of the complex plane is repeatedly squared and added to
//! itself; if the result eventually leaves the circle of radius 2,
//! every intermediate value it passed through is itself a point on
//! the plane, and we add one to the pixel under each of them.  Do
//! that for millions of randomly chosen points and the counts form
//! the picture.
//!
//! This crate keeps three such pictures at once, one per exposure
//! band: orbits that escape quickly go to red, slower ones to green,
//! the slowest to blue (a "Nebulabrot").  The `generator` drives the
//! passes; `present` and `export` turn the counts into pixels.
//!
//! All heavy work runs as data-parallel kernels on an `Accelerator`,
//! and the only state shared between lanes is the histograms, which
//! are updated with atomic increments.

pub mod accumulate;
pub mod compute;
pub mod config;
pub mod errors;
pub mod escape;
pub mod export;
pub mod generator;
pub mod histogram;
pub mod planes;
pub mod present;
pub mod reduce;
pub mod sampler;
pub mod session;

pub use crate::compute::Accelerator;
pub use crate::config::RenderConfig;
pub use crate::errors::{Error, Result};
pub use crate::escape::{Channel, IterationRange};
pub use crate::generator::BuddhabrotGenerator;
