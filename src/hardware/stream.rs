//! Length-prefixed chunk framing.
//!
//! Every chunk is a 4-byte little-endian signed length followed by the
//! payload. Weight payloads hold little-endian 16-bit codes, so their
//! prefix is twice the element count; byte payloads carry the element
//! count, which equals the byte length. The encoding is little-endian on
//! every host because the hardware contract fixes the endianness.

pub use super::Error;

use std::io::{Read, Write};

/// Writer for the hardware parameter stream.
#[derive(Debug)]
pub struct ChunkWriter<W: Write> {
    writer: W,
}

impl<W: Write> ChunkWriter<W> {
    /// Wrap a writer.
    #[inline]
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Write one chunk of 16-bit codes.
    pub fn write_codes(
        &mut self,
        codes: &[i16],
    ) -> Result<(), Error> {
        self.write_length(codes.len() * 2)?;

        let mut payload = Vec::with_capacity(codes.len() * 2);
        for code in codes {
            payload.extend_from_slice(&code.to_le_bytes());
        }
        self.writer.write_all(&payload)?;

        Ok(())
    }

    /// Write one chunk of bytes. The prefix holds the element count.
    pub fn write_bytes(
        &mut self,
        bytes: &[u8],
    ) -> Result<(), Error> {
        self.write_length(bytes.len())?;
        self.writer.write_all(bytes)?;

        Ok(())
    }

    /// Flush the underlying writer.
    #[inline]
    pub fn flush(&mut self) -> Result<(), Error> {
        Ok(self.writer.flush()?)
    }

    /// Unwrap the underlying writer.
    #[inline]
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_length(
        &mut self,
        length: usize,
    ) -> Result<(), Error> {
        let length = i32::try_from(length).map_err(|_| Error::OversizedChunk(length))?;
        self.writer.write_all(&length.to_le_bytes())?;

        Ok(())
    }
}

/// Reader for the hardware parameter stream.
#[derive(Debug)]
pub struct ChunkReader<R: Read> {
    reader: R,
}

impl<R: Read> ChunkReader<R> {
    /// Wrap a reader.
    #[inline]
    pub const fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Read one length-prefixed chunk payload.
    pub fn read_chunk(&mut self) -> Result<Vec<u8>, Error> {
        let mut length = [0_u8; 4];
        self.reader.read_exact(&mut length)?;

        let length = i32::from_le_bytes(length);
        let length = usize::try_from(length)
            .map_err(|_| Error::InvalidChunkLength(length))?;

        let mut payload = vec![0_u8; length];
        self.reader.read_exact(&mut payload)?;

        Ok(payload)
    }
}
