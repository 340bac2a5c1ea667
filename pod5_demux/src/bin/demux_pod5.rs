extern crate clap;
extern crate env_logger;
#[macro_use]
extern crate log;
extern crate pod5_demux;
extern crate read_container;
use clap::{App, Arg};
use pod5_demux::Config;
use read_container::FramedContainer;
fn main() {
    let matches = App::new("demux_pod5")
        .version("0.1")
        .author("Bansho Masutani")
        .about("Split POD5 files into one POD5 file per FASTQ file, by read ID.")
        .arg(
            Arg::with_name("fastq")
                .required(true)
                .short("f")
                .long("fastq")
                .value_name("FASTQ_DIR")
                .help("Directory of FASTQ files<*.fastq>")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("pod5")
                .required(true)
                .short("p")
                .long("pod5")
                .value_name("POD5_DIR")
                .help("Directory of POD5 files<*.pod5>")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("matches")
                .required(true)
                .short("m")
                .long("matches")
                .value_name("MATCH_CSV")
                .help("Output CSV of matched read IDs (POD5 File, FASTQ File, ID)")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("output")
                .required(true)
                .short("o")
                .long("output")
                .value_name("OUTPUT_DIRECTORY")
                .help("Output directory of the filtered POD5 files")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("threads")
                .short("t")
                .long("threads")
                .required(false)
                .value_name("THREADS")
                .help("Number of POD5 files written in parallel")
                .default_value(&"4")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("scratch")
                .long("scratch")
                .required(false)
                .value_name("DIR")
                .help("Keep per-file ID dumps in DIR instead of a temporary directory")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("report")
                .long("report")
                .required(false)
                .value_name("JSON")
                .help("Write the outcome of every output file as JSON")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("from_matches")
                .long("from-matches")
                .help("Skip ID extraction and read the existing MATCH_CSV instead"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("Output debug to the standard error."),
        )
        .get_matches();
    let level = match matches.occurrences_of("verbose") {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    let threads: usize = match matches.value_of("threads").map(|num| num.parse()) {
        Some(Ok(res)) => res,
        _ => {
            error!("THREADS should be a positive integer.");
            std::process::exit(1);
        }
    };
    // The four paths are required, so clap guarantees them.
    let path = |name: &str| matches.value_of(name).unwrap_or_default();
    let mut config = Config::new(path("fastq"), path("pod5"), path("matches"), path("output"))
        .workers(threads);
    config.scratch_dir = matches.value_of("scratch").map(|dir| dir.into());
    config.report = matches.value_of("report").map(|file| file.into());
    let result = if matches.is_present("from_matches") {
        pod5_demux::run_from_matches(&config, &FramedContainer)
    } else {
        pod5_demux::run(&config, &FramedContainer)
    };
    match result {
        Ok(report) if report.failed() == 0 => {
            debug!("All {} POD5 files were created.", report.succeeded());
        }
        Ok(report) => {
            error!(
                "{} of {} POD5 files could not be created.",
                report.failed(),
                report.outcomes.len()
            );
            std::process::exit(1);
        }
        Err(why) => {
            error!("{}", why);
            error!("This program did not work successfully.");
            error!("Shutting down...");
            std::process::exit(1);
        }
    }
}
