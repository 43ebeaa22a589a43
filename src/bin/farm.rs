extern crate clap;
extern crate image;
extern crate mandelfarm;
extern crate num;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use image::pnm::PNMEncoder;
use image::pnm::{PNMSubtype, SampleEncoding};
use image::ColorType;
use num::{clamp, Complex};
use std::fs::File;
use std::path::Path;
use std::str::FromStr;

use mandelfarm::{Coordinator, Grid, RunReport};

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

fn parse_complex(s: &str) -> Option<Complex<f64>> {
    match parse_pair(s, ',') {
        Some((re, im)) => Some(Complex { re, im }),
        None => None,
    }
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

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const LEFTLOWER: &str = "leftlower";
const RIGHTUPPER: &str = "rightupper";
const ITERATIONS: &str = "iterations";
const CHUNKSIZE: &str = "chunk-size";
const THREADS: &str = "threads";
const WORKERS: &str = "workers";
const TIMINGS: &str = "timings";

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("farm")
        .version("0.1.0")
        .about("Master-worker Mandelbrot renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output file"),
        )
        .arg(
            Arg::with_name(SIZE)
                .required(false)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("800x600")
                .validator(|s| validate_pair::<usize>(&s, 'x', "Could not parse output image size"))
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(LEFTLOWER)
                .required(false)
                .long(LEFTLOWER)
                .short("l")
                .takes_value(true)
                .default_value("-2.0,-1.5")
                .allow_hyphen_values(true)
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse left lower corner"))
                .help("Left lower corner of the complex plane"),
        )
        .arg(
            Arg::with_name(RIGHTUPPER)
                .required(false)
                .long(RIGHTUPPER)
                .short("r")
                .takes_value(true)
                .default_value("1.0,1.5")
                .allow_hyphen_values(true)
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse right upper corner"))
                .help("Right upper corner of the complex plane"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .required(false)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("1000")
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        1_000_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 1000000",
                    )
                })
                .help("Escape-iteration cap per pixel"),
        )
        .arg(
            Arg::with_name(CHUNKSIZE)
                .required(false)
                .long(CHUNKSIZE)
                .short("c")
                .takes_value(true)
                .default_value("200")
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        100_000,
                        "Could not parse chunk size",
                        "Chunk size must be between 1 and 100000",
                    )
                })
                .help("Rows per chunk handed to a worker"),
        )
        .arg(
            Arg::with_name(THREADS)
                .required(false)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Threads per worker (defaults to the CPU count)"),
        )
        .arg(
            Arg::with_name(WORKERS)
                .required(false)
                .long(WORKERS)
                .short("w")
                .takes_value(true)
                .default_value("1")
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        256,
                        "Could not parse worker count",
                        "Worker count must be between 1 and 256",
                    )
                })
                .help("Number of workers in the farm"),
        )
        .arg(
            Arg::with_name(TIMINGS)
                .required(false)
                .long(TIMINGS)
                .help("Print per-worker and per-thread elapsed times to stderr"),
        )
        .get_matches()
}

/// Maps a count to a grayscale sample: in-set cells render black, and
/// the rest ramp monotonically toward white as they escape faster.
fn shade(count: u32, max_iter: u32) -> u8 {
    if count >= max_iter {
        return 0;
    }
    let ramp = (u64::from(count) * 255) / u64::from(max_iter);
    255 - clamp(ramp, 0, 255) as u8
}

fn write_image(outfile: &str, pixels: &[u8], bounds: (usize, usize)) -> Result<(), std::io::Error> {
    let path = Path::new(outfile);
    let output = File::create(&path)?;
    let mut encoder =
        PNMEncoder::new(output).with_subtype(PNMSubtype::Graymap(SampleEncoding::Binary));
    encoder.encode(pixels, bounds.0 as u32, bounds.1 as u32, ColorType::Gray(8))?;
    Ok(())
}

fn print_timings(report: &RunReport) {
    let mut workers: Vec<(usize, f64)> = report
        .timings
        .per_worker
        .iter()
        .map(|(&id, &s)| (id, s))
        .collect();
    workers.sort_by_key(|&(id, _)| id);
    for (id, seconds) in workers {
        eprintln!("worker {}: {:.4}s", id, seconds);
    }

    let mut threads: Vec<((usize, usize), f64)> = report
        .timings
        .per_thread
        .iter()
        .map(|(&key, &s)| (key, s))
        .collect();
    threads.sort_by_key(|&(key, _)| key);
    for ((worker, thread), seconds) in threads {
        eprintln!("worker {} thread {}: {:.4}s", worker, thread, seconds);
    }
}

fn main() {
    let matches = args();
    let image_size: (usize, usize) =
        parse_pair(matches.value_of(SIZE).unwrap(), 'x').expect("Error parsing image dimensions");
    let leftlower = parse_complex(matches.value_of(LEFTLOWER).unwrap())
        .expect("Error parsing left lower point");
    let rightupper = parse_complex(matches.value_of(RIGHTUPPER).unwrap())
        .expect("Error parsing right upper point");
    let max_iter =
        u32::from_str(matches.value_of(ITERATIONS).unwrap()).expect("Could not parse iteration count");
    let chunk_size =
        usize::from_str(matches.value_of(CHUNKSIZE).unwrap()).expect("Could not parse chunk size");
    let threads = match matches.value_of(THREADS) {
        Some(s) => usize::from_str(s).expect("Could not parse thread count"),
        None => num_cpus::get(),
    };
    let workers =
        usize::from_str(matches.value_of(WORKERS).unwrap()).expect("Could not parse worker count");

    let grid = match Grid::new(image_size.0, image_size.1, leftlower, rightupper, max_iter) {
        Ok(grid) => grid,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let coordinator = match Coordinator::new(grid, chunk_size, workers, threads) {
        Ok(coordinator) => coordinator,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let report = coordinator.run();
    if matches.is_present(TIMINGS) {
        print_timings(&report);
    }

    let pixels: Vec<u8> = report
        .matrix
        .as_slice()
        .iter()
        .map(|&count| shade(count, max_iter))
        .collect();
    if let Err(e) = write_image(matches.value_of(OUTPUT).unwrap(), &pixels, image_size) {
        eprintln!("Could not write image: {}", e);
        std::process::exit(1);
    }
}
