//! Read ids from FASTQ files.
//!
//! Records are parsed by `bio::io::fastq`. Only the id, the first field of
//! the header, is kept; it must be a 128-bit read id.
use crate::DemuxError;
use bio::io::fastq;
use read_container::ReadId;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Open `path` and lazily iterate over its read ids. Calling this again
/// restarts from the first record.
pub fn read_ids<P: AsRef<Path>>(path: P) -> Result<FastqIds<BufReader<File>>, DemuxError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|why| DemuxError::io(path, why))?;
    Ok(FastqIds::new(BufReader::new(file), path))
}

/// Parse a record id. Anything after the first whitespace is a comment.
pub fn parse_id(id: &str) -> Result<ReadId, String> {
    let id = match id.split_ascii_whitespace().next() {
        Some(res) if !id.starts_with(char::is_whitespace) => res,
        _ => return Err("empty read id".to_string()),
    };
    id.parse().map_err(|_| format!("{} is not a read id", id))
}

/// Iterator over the read ids of a FASTQ stream. It stops after the first
/// error.
pub struct FastqIds<B: BufRead> {
    records: fastq::Records<B>,
    path: PathBuf,
    // 1-based index of the last record pulled from `records`.
    record: usize,
    failed: bool,
}

impl<B: BufRead> FastqIds<B> {
    pub fn new<P: Into<PathBuf>>(reader: B, path: P) -> Self {
        Self {
            records: fastq::Reader::from_bufread(reader).records(),
            path: path.into(),
            record: 0,
            failed: false,
        }
    }
    fn parse_error(&self, reason: String) -> DemuxError {
        DemuxError::Parse {
            path: self.path.clone(),
            record: self.record,
            reason,
        }
    }
}

impl<B: BufRead> Iterator for FastqIds<B> {
    type Item = Result<ReadId, DemuxError>;
    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let next = self.records.next()?;
        self.record += 1;
        let next = match next {
            Ok(record) => parse_id(record.id()).map_err(|reason| self.parse_error(reason)),
            Err(why) => Err(self.parse_error(why.to_string())),
        };
        self.failed = next.is_err();
        Some(next)
    }
}
