//! Append-only writer of the framed layout.
use crate::error::ContainerError;
use crate::format::{write_header, write_trailer, RECORD_TAG};
use crate::{ReadRecord, RecordSink};
use byteorder::{LittleEndian, WriteBytesExt};
use std::io::Write;

/// Writes a new container. The header goes out on construction and the
/// trailer on [`finish`](RecordSink::finish) or, failing that, on drop,
/// so the container is closed on every exit path.
#[derive(Debug)]
pub struct FramedWriter<W: Write> {
    // None once finished.
    inner: Option<W>,
    records: u64,
}

impl<W: Write> FramedWriter<W> {
    pub fn new(mut inner: W) -> std::io::Result<Self> {
        write_header(&mut inner)?;
        Ok(Self {
            inner: Some(inner),
            records: 0,
        })
    }
    /// The number of records written so far.
    pub fn records(&self) -> u64 {
        self.records
    }
    /// Finish the container and hand back the underlying writer.
    pub fn into_inner(mut self) -> Result<W, ContainerError> {
        let closed = self.close();
        let inner = self.inner.take();
        closed?;
        inner.ok_or(ContainerError::Finished)
    }
    fn close(&mut self) -> Result<(), ContainerError> {
        let inner = self.inner.as_mut().ok_or(ContainerError::Finished)?;
        write_trailer(inner, self.records)?;
        inner.flush()?;
        Ok(())
    }
}

impl<W: Write> RecordSink for FramedWriter<W> {
    fn add_read(&mut self, record: &ReadRecord) -> Result<(), ContainerError> {
        let inner = self.inner.as_mut().ok_or(ContainerError::Finished)?;
        inner.write_u8(RECORD_TAG)?;
        inner.write_all(record.id.as_bytes())?;
        inner.write_u64::<LittleEndian>(record.payload.len() as u64)?;
        inner.write_all(&record.payload)?;
        self.records += 1;
        Ok(())
    }
    fn finish(&mut self) -> Result<(), ContainerError> {
        let result = self.close();
        // Drop the handle even when closing failed; a second trailer would
        // corrupt the file.
        self.inner = None;
        result
    }
}

impl<W: Write> Drop for FramedWriter<W> {
    fn drop(&mut self) {
        if self.inner.is_some() {
            debug!("Closing a container writer after {} records", self.records);
            if let Err(why) = self.close() {
                error!("Failed to close a container:{}", why);
            }
        }
    }
}
