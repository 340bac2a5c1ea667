//! This is a library to demultiplex read containers by FASTQ files.
//!
//! For each FASTQ file, the reads it shares with a directory of containers
//! are collected into a new container named after the FASTQ file.
//! See [pipeline::run] for the whole procedure.
#[macro_use]
extern crate log;
extern crate bio;
extern crate crossbeam_channel;
extern crate csv;
extern crate rayon;
extern crate read_container;
#[macro_use]
extern crate serde;
extern crate serde_json;
extern crate tempfile;
extern crate thiserror;
pub mod config;
pub mod error;
pub mod fastq;
pub mod filter;
pub mod index;
pub mod matching;
pub mod pipeline;
pub mod plan;
pub mod scheduler;
pub mod scratch;
pub use config::Config;
pub use error::DemuxError;
pub use matching::MatchTriple;
pub use pipeline::{run, run_from_matches};
pub use plan::OutputGroup;
pub use scheduler::{GroupOutcome, RunReport};
