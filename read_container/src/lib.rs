//! This is a library to read and write binary read containers:
//! files holding many reads, each keyed by a 128-bit read id.
//!
//! The rest of the workspace only talks to containers through the
//! [`Container`], [`RecordCursor`] and [`RecordSink`] traits.
//! [`FramedContainer`] is the on-disk implementation, see [format].
#[allow(unused_imports)]
#[macro_use]
extern crate log;
extern crate byteorder;
#[macro_use]
extern crate serde;
extern crate thiserror;
extern crate uuid;
pub mod error;
pub mod format;
pub mod reader;
pub mod writer;
pub use error::ContainerError;
pub use reader::FramedReader;
pub use writer::FramedWriter;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use uuid::Uuid;

/// The identifier of a read. The same value names the read in FASTQ headers
/// and in containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReadId(Uuid);

impl ReadId {
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl From<Uuid> for ReadId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::str::FromStr for ReadId {
    type Err = uuid::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(ReadId)
    }
}

/// Lowercase hyphenated form, e.g. `0a1b2c3d-0000-4000-8000-00000000abcd`.
impl std::fmt::Display for ReadId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// A read stored in a container. The payload (signal, calibration, run
/// information, ...) is opaque to this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadRecord {
    pub id: ReadId,
    pub payload: Vec<u8>,
}

impl ReadRecord {
    pub fn new(id: ReadId, payload: Vec<u8>) -> Self {
        Self { id, payload }
    }
}

/// Streaming access to the records of an opened container.
pub trait RecordCursor {
    /// Move to the next record and return its id. The payload of the
    /// previous record is skipped if it was not taken.
    fn next_id(&mut self) -> Result<Option<ReadId>, ContainerError>;
    /// Load the record whose id was returned by the last `next_id`.
    fn take_record(&mut self) -> Result<ReadRecord, ContainerError>;
}

/// A container opened for writing.
pub trait RecordSink {
    fn add_read(&mut self, record: &ReadRecord) -> Result<(), ContainerError>;
    /// Close the container. Dropping a sink without calling this still
    /// closes it, but errors are only logged.
    fn finish(&mut self) -> Result<(), ContainerError>;
}

/// Open-for-read and open-for-write on a container format.
pub trait Container {
    type Reader: RecordCursor;
    type Writer: RecordSink;
    fn open_read(&self, path: &Path) -> Result<Self::Reader, ContainerError>;
    /// Create a new container at `path`, replacing any existing file.
    fn create(&self, path: &Path) -> Result<Self::Writer, ContainerError>;
}

/// Files in the framed layout of [format].
#[derive(Debug, Clone, Copy, Default)]
pub struct FramedContainer;

impl Container for FramedContainer {
    type Reader = FramedReader<File>;
    type Writer = FramedWriter<BufWriter<File>>;
    fn open_read(&self, path: &Path) -> Result<Self::Reader, ContainerError> {
        FramedReader::new(File::open(path)?)
    }
    fn create(&self, path: &Path) -> Result<Self::Writer, ContainerError> {
        let file = BufWriter::new(File::create(path)?);
        Ok(FramedWriter::new(file)?)
    }
}

/// Lazily yields the ids of every remaining record, never loading payloads.
pub fn read_ids<C: RecordCursor>(
    mut cursor: C,
) -> impl Iterator<Item = Result<ReadId, ContainerError>> {
    let mut done = false;
    std::iter::from_fn(move || {
        if done {
            return None;
        }
        match cursor.next_id() {
            Ok(Some(id)) => Some(Ok(id)),
            Ok(None) => {
                done = true;
                None
            }
            Err(why) => {
                done = true;
                Some(Err(why))
            }
        }
    })
}

/// Write every record to a new container at `path`.
pub fn write_container<C: Container>(
    backend: &C,
    path: &Path,
    records: &[ReadRecord],
) -> Result<(), ContainerError> {
    let mut wtr = backend.create(path)?;
    for record in records {
        wtr.add_read(record)?;
    }
    wtr.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn read_id_display_and_parse() {
        let text = "0a1b2c3d-0000-4000-8000-00000000abcd";
        let id: ReadId = text.parse().unwrap();
        assert_eq!(id.to_string(), text);
        let upper: ReadId = text.to_uppercase().parse().unwrap();
        assert_eq!(id, upper);
        assert_eq!(ReadId::from_bytes(*id.as_bytes()), id);
        assert!("read_1".parse::<ReadId>().is_err());
    }
    #[test]
    fn file_container() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reads.pod5");
        let records: Vec<_> = (0..5u8)
            .map(|i| ReadRecord::new(Uuid::new_v4().into(), vec![i; i as usize * 3]))
            .collect();
        write_container(&FramedContainer, &path, &records).unwrap();
        let ids: Vec<_> = read_ids(FramedContainer.open_read(&path).unwrap())
            .collect::<Result<_, _>>()
            .unwrap();
        let expected: Vec<_> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, expected);
        let mut rdr = FramedContainer.open_read(&path).unwrap();
        let mut loaded = vec![];
        while rdr.next_id().unwrap().is_some() {
            loaded.push(rdr.take_record().unwrap());
        }
        assert_eq!(loaded, records);
    }
    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        match FramedContainer.open_read(&dir.path().join("none.pod5")) {
            Err(ContainerError::Io(_)) => {}
            Err(x) => panic!("{:?}", x),
            Ok(_) => panic!("opened a missing file"),
        }
    }
}
