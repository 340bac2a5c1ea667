//! Sequential reader of the framed layout.
use crate::error::ContainerError;
use crate::format::{read_header, RECORD_TAG, TRAILER_TAG};
use crate::{ReadId, ReadRecord, RecordCursor};
use byteorder::{LittleEndian, ReadBytesExt};
use std::convert::TryFrom;
use std::io::{BufReader, Read, Seek, SeekFrom};

// Tag, id and payload length.
const RECORD_HEAD: u64 = 1 + 16 + 8;
// Tag and record count.
const TRAILER_LEN: u64 = 1 + 8;

/// Reads records in the order they were written, starting at the current
/// position of the stream.
/// The header is validated when the reader is constructed.
#[derive(Debug)]
pub struct FramedReader<R: Read + Seek> {
    inner: BufReader<R>,
    // Offset of the cursor and of the end of the stream. Every declared
    // payload length is checked against them before it is skipped or read.
    position: u64,
    end: u64,
    // Id and payload length of the record under the cursor, while its
    // payload is still unread.
    pending: Option<(ReadId, u64)>,
    records: u64,
    finished: bool,
}

impl<R: Read + Seek> FramedReader<R> {
    pub fn new(mut inner: R) -> Result<Self, ContainerError> {
        let start = inner.stream_position()?;
        let end = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(start))?;
        let mut inner = BufReader::new(inner);
        read_header(&mut inner)?;
        let position = inner.stream_position()?;
        Ok(Self {
            inner,
            position,
            end,
            pending: None,
            records: 0,
            finished: false,
        })
    }
    /// The number of records visited so far.
    pub fn records(&self) -> u64 {
        self.records
    }
    fn skip_pending(&mut self) -> Result<(), ContainerError> {
        if let Some((_, len)) = self.pending.take() {
            // Lengths were bounded by the stream end in `next_id`.
            let offset = i64::try_from(len).map_err(|_| ContainerError::BadLength {
                record: self.records,
                len,
            })?;
            // Relative seeks inside the buffer keep it.
            self.inner.seek_relative(offset)?;
            self.position += len;
        }
        Ok(())
    }
    fn read_err(&self, why: std::io::Error) -> ContainerError {
        ContainerError::from_read(why, self.records)
    }
}

impl<R: Read + Seek> RecordCursor for FramedReader<R> {
    fn next_id(&mut self) -> Result<Option<ReadId>, ContainerError> {
        if self.finished {
            return Ok(None);
        }
        self.skip_pending()?;
        let tag = self.inner.read_u8().map_err(|e| self.read_err(e))?;
        match tag {
            RECORD_TAG => {
                let mut id = [0u8; 16];
                self.inner
                    .read_exact(&mut id)
                    .map_err(|e| self.read_err(e))?;
                let len = self
                    .inner
                    .read_u64::<LittleEndian>()
                    .map_err(|e| self.read_err(e))?;
                self.position += RECORD_HEAD;
                match self.position.checked_add(len) {
                    Some(end) if end <= self.end => {}
                    _ => {
                        self.finished = true;
                        return Err(ContainerError::BadLength {
                            record: self.records + 1,
                            len,
                        });
                    }
                }
                let id = ReadId::from_bytes(id);
                self.records += 1;
                self.pending = Some((id, len));
                Ok(Some(id))
            }
            TRAILER_TAG => {
                let declared = self
                    .inner
                    .read_u64::<LittleEndian>()
                    .map_err(|e| self.read_err(e))?;
                self.position += TRAILER_LEN;
                self.finished = true;
                if declared != self.records {
                    return Err(ContainerError::CountMismatch {
                        declared,
                        seen: self.records,
                    });
                }
                Ok(None)
            }
            tag => Err(ContainerError::UnknownTag {
                tag,
                records: self.records,
            }),
        }
    }
    fn take_record(&mut self) -> Result<ReadRecord, ContainerError> {
        let (id, len) = self.pending.take().ok_or(ContainerError::NoCurrentRecord)?;
        let mut payload = vec![];
        (&mut self.inner)
            .take(len)
            .read_to_end(&mut payload)?;
        self.position += payload.len() as u64;
        if (payload.len() as u64) < len {
            return Err(ContainerError::Truncated {
                records: self.records - 1,
            });
        }
        Ok(ReadRecord { id, payload })
    }
}
