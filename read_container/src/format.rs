//! Byte layout of a framed read container.
//!
//! ```text
//! [HEADER]  magic: "RDCONTv1" (8 bytes) | version: u16 LE
//! [RECORD]* tag: u8 = 0x01 | read_id: 16 bytes | payload_len: u64 LE | payload
//! [TRAILER] tag: u8 = 0x00 | record_count: u64 LE
//! ```
//!
//! Records are stored back to back so that a reader can step over a payload
//! with a single relative seek.
use crate::error::ContainerError;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

pub const MAGIC: [u8; 8] = *b"RDCONTv1";
pub const VERSION: u16 = 1;
pub const RECORD_TAG: u8 = 0x01;
pub const TRAILER_TAG: u8 = 0x00;

pub fn write_header<W: Write>(w: &mut W) -> std::io::Result<()> {
    w.write_all(&MAGIC)?;
    w.write_u16::<LittleEndian>(VERSION)?;
    Ok(())
}

pub fn read_header<R: Read>(r: &mut R) -> Result<(), ContainerError> {
    let mut found = [0u8; 8];
    r.read_exact(&mut found)
        .map_err(|why| ContainerError::from_read(why, 0))?;
    if found != MAGIC {
        return Err(ContainerError::BadMagic { found });
    }
    let version = r
        .read_u16::<LittleEndian>()
        .map_err(|why| ContainerError::from_read(why, 0))?;
    if version != VERSION {
        return Err(ContainerError::UnsupportedVersion(version));
    }
    Ok(())
}

pub fn write_trailer<W: Write>(w: &mut W, records: u64) -> std::io::Result<()> {
    w.write_u8(TRAILER_TAG)?;
    w.write_u64::<LittleEndian>(records)?;
    Ok(())
}
