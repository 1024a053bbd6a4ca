//! Block I/O for raw headerless PCM streams.
//!
//! The canceller CLI consumes and produces 16-bit little-endian PCM with
//! no container; the analysis harness additionally dumps raw 32-bit float
//! streams for offline inspection.

use std::io::{self, Read, Write};

use crate::constants::DEFAULT_BLOCK_SIZE;

/// Reads fixed-size blocks of little-endian i16 samples from a byte stream.
pub struct PcmReader<R: Read> {
    inner: R,
    block_size: usize,
}

impl<R: Read> PcmReader<R> {
    pub fn new(inner: R) -> Self {
        Self::with_block_size(inner, DEFAULT_BLOCK_SIZE)
    }

    pub fn with_block_size(inner: R, block_size: usize) -> Self {
        Self { inner, block_size }
    }

    /// Read the next block of samples.
    ///
    /// Returns `None` at end of stream. The final block may be shorter
    /// than the configured block size. A stream that ends mid-sample
    /// (odd byte count) is an error.
    pub fn next_block(&mut self) -> io::Result<Option<Vec<i16>>> {
        let mut bytes = vec![0u8; self.block_size * 2];
        let mut filled = 0;

        while filled < bytes.len() {
            match self.inner.read(&mut bytes[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }

        if filled == 0 {
            return Ok(None);
        }
        if filled % 2 != 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "PCM stream ends mid-sample",
            ));
        }

        let samples = bytes[..filled]
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        Ok(Some(samples))
    }
}

/// Writes little-endian i16 sample blocks to a byte stream.
pub struct PcmWriter<W: Write> {
    inner: W,
}

impl<W: Write> PcmWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn write_block(&mut self, samples: &[i16]) -> io::Result<()> {
        let mut bytes = Vec::with_capacity(samples.len() * 2);
        for &sample in samples {
            bytes.extend_from_slice(&sample.to_le_bytes());
        }
        self.inner.write_all(&bytes)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Writes raw little-endian f32 samples, the format of the analysis dumps.
pub struct FloatWriter<W: Write> {
    inner: W,
}

impl<W: Write> FloatWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn write_sample(&mut self, sample: f32) -> io::Result<()> {
        self.inner.write_all(&sample.to_le_bytes())
    }

    pub fn write_samples(&mut self, samples: &[f32]) -> io::Result<()> {
        for &sample in samples {
            self.write_sample(sample)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_round_trip_in_blocks() {
        let samples: Vec<i16> = (-50..50).map(|i| i * 300).collect();

        let mut bytes = Vec::new();
        PcmWriter::new(&mut bytes).write_block(&samples).unwrap();

        let mut reader = PcmReader::with_block_size(Cursor::new(bytes), 30);
        let mut decoded = Vec::new();
        while let Some(block) = reader.next_block().unwrap() {
            decoded.extend(block);
        }

        assert_eq!(decoded, samples);
    }

    #[test]
    fn test_short_final_block() {
        let samples = vec![1i16, 2, 3, 4, 5];
        let mut bytes = Vec::new();
        PcmWriter::new(&mut bytes).write_block(&samples).unwrap();

        let mut reader = PcmReader::with_block_size(Cursor::new(bytes), 4);
        assert_eq!(reader.next_block().unwrap().unwrap(), vec![1, 2, 3, 4]);
        assert_eq!(reader.next_block().unwrap().unwrap(), vec![5]);
        assert!(reader.next_block().unwrap().is_none());
    }

    #[test]
    fn test_empty_stream() {
        let mut reader = PcmReader::new(Cursor::new(Vec::new()));
        assert!(reader.next_block().unwrap().is_none());
    }

    #[test]
    fn test_truncated_sample_is_error() {
        let bytes = vec![0x01u8, 0x02, 0x03];
        let mut reader = PcmReader::with_block_size(Cursor::new(bytes), 8);
        assert!(reader.next_block().is_err());
    }

    #[test]
    fn test_float_writer_format() {
        let mut bytes = Vec::new();
        FloatWriter::new(&mut bytes)
            .write_samples(&[1.0, -0.5])
            .unwrap();

        assert_eq!(bytes.len(), 8);
        assert_eq!(&bytes[0..4], &1.0f32.to_le_bytes());
        assert_eq!(&bytes[4..8], &(-0.5f32).to_le_bytes());
    }
}
