//! Errors raised while reading or writing a container.
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContainerError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("not a read container (magic {found:?})")]
    BadMagic { found: [u8; 8] },
    #[error("unsupported container version {0}")]
    UnsupportedVersion(u16),
    #[error("container ends after {records} records without a trailer")]
    Truncated { records: u64 },
    #[error("record {record} declares a {len} byte payload, past the end of the container")]
    BadLength { record: u64, len: u64 },
    #[error("unknown record tag {tag:#04x} after {records} records")]
    UnknownTag { tag: u8, records: u64 },
    #[error("trailer declares {declared} records, but {seen} were read")]
    CountMismatch { declared: u64, seen: u64 },
    #[error("take_record called without a pending record")]
    NoCurrentRecord,
    #[error("container writer is already finished")]
    Finished,
}

impl ContainerError {
    // EOF in the middle of the stream means the writer never closed the file.
    pub(crate) fn from_read(why: io::Error, records: u64) -> Self {
        if why.kind() == io::ErrorKind::UnexpectedEof {
            ContainerError::Truncated { records }
        } else {
            ContainerError::Io(why)
        }
    }
}
