// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::io;
use std::path::Path;
use std::process;
use std::str::FromStr;

use buddhabrot::config::{DEFAULT_RANGES, DEFAULT_WARMUP};
use buddhabrot::export::write_png;
use buddhabrot::present::HeadlessPresenter;
use buddhabrot::sampler::exact_sqrt;
use buddhabrot::session::{run, FrameBudget};
use buddhabrot::{Accelerator, BuddhabrotGenerator, IterationRange, RenderConfig};
use clap::{App, Arg, ArgMatches, ErrorKind};
use log::info;

/// Given a string and a separator, returns the two values
/// separated by the separator.
fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn parse_range(s: &str) -> Option<IterationRange> {
    parse_pair(s, ',').map(|(min, max)| IterationRange::new(min, max))
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + Ord>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

fn validate_points(s: &str) -> Result<(), String> {
    match usize::from_str(s) {
        Ok(0) => Err("Point count must be greater than zero".to_string()),
        Ok(n) => match exact_sqrt(n) {
            Some(_) => Ok(()),
            None => Err(format!("Point count {} is not a perfect square", n)),
        },
        Err(_) => Err("Could not parse point count".to_string()),
    }
}

const DIMENSION: &str = "dimension";
const POINTS: &str = "points";
const FILE: &str = "file";
const FRAMES: &str = "frames";
const THREADS: &str = "threads";
const WARMUP: &str = "warmup";
const SEED: &str = "seed";
const RED: &str = "red";
const GREEN: &str = "green";
const BLUE: &str = "blue";

fn band_arg<'a>(name: &'a str, default: &'a str, help: &'a str) -> Arg<'a, 'a> {
    Arg::with_name(name)
        .long(name)
        .takes_value(true)
        .value_name("MIN,MAX")
        .default_value(default)
        .validator(|s| validate_pair::<usize>(&s, ',', "Could not parse iteration band"))
        .help(help)
}

/// What the command line asked for.
struct Options {
    config: RenderConfig,
    threads: usize,
    frames: u64,
    output: String,
}

// Every value read below has already been through its validator.
fn value<T: FromStr>(matches: &ArgMatches, name: &str) -> T {
    match matches.value_of(name).map(T::from_str) {
        Some(Ok(v)) => v,
        _ => unreachable!("{} was validated", name),
    }
}

fn band(matches: &ArgMatches, name: &str) -> IterationRange {
    match matches.value_of(name).and_then(parse_range) {
        Some(range) => range,
        None => unreachable!("{} was validated", name),
    }
}

fn options() -> Options {
    let max_threads = num_cpus::get();
    let default_threads = max_threads.to_string();
    let default_warmup = DEFAULT_WARMUP.to_string();
    let default_ranges: Vec<String> = DEFAULT_RANGES
        .iter()
        .map(|r| format!("{},{}", r.min, r.max))
        .collect();

    let app = App::new("buddhabrot-amp")
        .version("0.3.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Three-channel Buddhabrot renderer")
        .arg(
            Arg::with_name(DIMENSION)
                .long(DIMENSION)
                .short("d")
                .takes_value(true)
                .default_value("4096")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        65_536,
                        "Could not parse dimension",
                        "Dimension must be between 1 and 65536",
                    )
                })
                .help("Dimension in pixels of the buddhabrot generated"),
        )
        .arg(
            Arg::with_name(POINTS)
                .long(POINTS)
                .short("p")
                .takes_value(true)
                .default_value("4194304")
                .validator(|s| validate_points(&s))
                .help("Number of points iterated on each frame; must be a perfect square"),
        )
        .arg(
            Arg::with_name(FILE)
                .long(FILE)
                .short("f")
                .takes_value(true)
                .default_value("buddhabrot-amp.png")
                .help("Path of output PNG file"),
        )
        .arg(
            Arg::with_name(FRAMES)
                .long(FRAMES)
                .short("n")
                .takes_value(true)
                .default_value("64")
                .validator(|s| {
                    validate_range(
                        &s,
                        0,
                        std::u64::MAX,
                        "Could not parse frame count",
                        "Frame count out of range",
                    )
                })
                .help("Number of frames to accumulate before writing the image"),
        )
        .arg(
            Arg::with_name(THREADS)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .default_value(&default_threads)
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of threads to use in solver"),
        )
        .arg(
            Arg::with_name(WARMUP)
                .long(WARMUP)
                .short("w")
                .takes_value(true)
                .default_value(&default_warmup)
                .validator(|s| {
                    validate_range(
                        &s,
                        0,
                        std::usize::MAX,
                        "Could not parse warm-up count",
                        "Warm-up count out of range",
                    )
                })
                .help("Orbit steps skipped before plotting begins"),
        )
        .arg(
            Arg::with_name(SEED)
                .long(SEED)
                .short("s")
                .takes_value(true)
                .validator(|s| {
                    validate_range(
                        &s,
                        0,
                        std::u32::MAX,
                        "Could not parse seed",
                        "Seed out of range",
                    )
                })
                .help("Fixed random seed; defaults to the clock"),
        )
        .arg(band_arg(RED, &default_ranges[0], "Escape iterations plotted in red"))
        .arg(band_arg(GREEN, &default_ranges[1], "Escape iterations plotted in green"))
        .arg(band_arg(BLUE, &default_ranges[2], "Escape iterations plotted in blue"));

    let matches = match app.clone().get_matches_safe() {
        Ok(matches) => matches,
        Err(e) => match e.kind {
            ErrorKind::HelpDisplayed | ErrorKind::VersionDisplayed => e.exit(),
            _ => {
                eprintln!("{}", e.message);
                eprintln!();
                let _ = app.write_help(&mut io::stderr());
                eprintln!();
                process::exit(1);
            }
        },
    };

    let config = RenderConfig::default()
        .with_dimension(value(&matches, DIMENSION))
        .with_points(value(&matches, POINTS))
        .with_ranges([
            band(&matches, RED),
            band(&matches, GREEN),
            band(&matches, BLUE),
        ])
        .with_warmup(value(&matches, WARMUP))
        .with_seed(matches.value_of(SEED).and_then(|s| u32::from_str(s).ok()));

    Options {
        config,
        threads: value(&matches, THREADS),
        frames: value(&matches, FRAMES),
        output: value(&matches, FILE),
    }
}

fn render(options: Options) -> Result<(), failure::Error> {
    let accel = Accelerator::new(options.threads);
    let mut generator = BuddhabrotGenerator::new(accel, options.config)?;
    let mut presenter = HeadlessPresenter::new(800, 800);
    run(
        &mut generator,
        &mut presenter,
        &mut FrameBudget::new(options.frames),
    )?;

    info!("writing {}", options.output);
    write_png(
        generator.accelerator(),
        Path::new(&options.output),
        generator.histograms(),
    )
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(e) = render(options()) {
        eprintln!("Render failure: {}", e);
        for cause in e.iter_causes() {
            eprintln!("  caused by: {}", cause);
        }
        process::exit(1);
    }
}
