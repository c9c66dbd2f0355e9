//! Bit-field reader for packed EDID fields.
//!
//! EDID packs several values below byte granularity (manufacturer letters,
//! data block headers, audio descriptor format codes). This wraps a
//! big-endian [`BitReader`] over a byte slice so those fields can be read
//! MSB-first in declaration order.

use std::io;

use bitstream_io::{BigEndian, BitRead, BitReader, UnsignedInteger};

#[derive(Debug)]
pub struct BitstreamIoReader<R: io::Read + io::Seek> {
    bs: BitReader<R, BigEndian>,
    len: u64,
}

pub type BsIoSliceReader<'a> = BitstreamIoReader<io::Cursor<&'a [u8]>>;

impl<R> BitstreamIoReader<R>
where
    R: io::Read + io::Seek,
{
    pub fn new(read: R, len_bytes: u64) -> Self {
        Self {
            bs: BitReader::new(read),
            len: len_bytes << 3,
        }
    }

    #[inline(always)]
    pub fn get(&mut self) -> io::Result<bool> {
        self.bs.read_bit()
    }

    #[inline(always)]
    pub fn get_n<I: UnsignedInteger>(&mut self, n: u32) -> io::Result<I> {
        if n as u64 > self.available()? {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("get_n({}): out of bounds bits at {}", n, self.position()?),
            ));
        }

        self.bs.read_unsigned_var(n)
    }

    #[inline(always)]
    pub fn skip_n(&mut self, n: u32) -> io::Result<()> {
        if n as u64 > self.available()? {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "skip_n: out of bounds bits",
            ));
        }

        self.bs.skip(n)
    }

    #[inline(always)]
    pub fn available(&mut self) -> io::Result<u64> {
        self.bs
            .position_in_bits()
            .map(|pos| self.len.saturating_sub(pos))
    }

    #[inline(always)]
    pub fn position(&mut self) -> io::Result<u64> {
        self.bs.position_in_bits()
    }
}

impl<'a> BsIoSliceReader<'a> {
    pub fn from_slice(buf: &'a [u8]) -> Self {
        let len = buf.len() as u64;
        let read = io::Cursor::new(buf);

        Self::new(read, len)
    }
}

impl Default for BsIoSliceReader<'_> {
    fn default() -> Self {
        Self::from_slice(&[])
    }
}

#[test]
fn read_packed_fields() -> io::Result<()> {
    // 0 10011 00001 01101
    let reader = &mut BsIoSliceReader::from_slice(&[0x4C, 0x2D]);

    assert!(!reader.get()?);
    assert_eq!(reader.get_n::<u8>(5)?, 19);
    assert_eq!(reader.get_n::<u8>(5)?, 1);
    assert_eq!(reader.get_n::<u8>(5)?, 13);
    assert_eq!(reader.available()?, 0);

    Ok(())
}

#[test]
fn out_of_bounds_read() {
    let reader = &mut BsIoSliceReader::from_slice(&[0xFF]);

    assert!(reader.skip_n(4).is_ok());
    let err = reader.get_n::<u8>(5).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
}
