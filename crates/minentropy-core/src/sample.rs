//! Sample model: the byte and bit views of a noise-source capture.
//!
//! A [`Sample`] keeps both granularities side by side. Bytes are unpacked
//! MSB-first into the bit view, so `bits()[8*i..8*i+8]` is `bytes()[i]`.
//! Estimators never see a `Sample` directly; they borrow the symbol slice for
//! the chosen [`Alphabet`].

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Symbol alphabet of a sample: one bit or one byte per symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alphabet {
    Binary,
    Byte,
}

impl Alphabet {
    /// Number of distinct symbols (2 or 256).
    pub fn size(self) -> usize {
        match self {
            Self::Binary => 2,
            Self::Byte => 256,
        }
    }

    /// `log2(size)`, the largest min-entropy a symbol can carry.
    pub fn max_entropy(self) -> f64 {
        match self {
            Self::Binary => 1.0,
            Self::Byte => 8.0,
        }
    }
}

impl TryFrom<usize> for Alphabet {
    type Error = Error;

    fn try_from(size: usize) -> Result<Self> {
        match size {
            2 => Ok(Self::Binary),
            256 => Ok(Self::Byte),
            other => Err(Error::InvalidArgument(format!(
                "alphabet size must be 2 or 256, got {other}"
            ))),
        }
    }
}

impl std::fmt::Display for Alphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Binary => write!(f, "binary"),
            Self::Byte => write!(f, "byte"),
        }
    }
}

/// Check that every symbol is inside the alphabet.
///
/// Bytes always fit [`Alphabet::Byte`]; for [`Alphabet::Binary`] each element
/// must be 0 or 1.
pub fn validate_symbols(data: &[u8], alphabet: Alphabet) -> Result<()> {
    if alphabet == Alphabet::Byte {
        return Ok(());
    }
    match data.iter().position(|&s| s > 1) {
        Some(idx) => Err(Error::InvalidArgument(format!(
            "symbol {} at index {idx} is outside the binary alphabet",
            data[idx]
        ))),
        None => Ok(()),
    }
}

/// A captured sample with both its byte and bit views.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sample {
    bits: Vec<u8>,
    bytes: Vec<u8>,
}

impl Sample {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bytes(data: &[u8]) -> Self {
        let mut sample = Self {
            bits: Vec::with_capacity(data.len() * 8),
            bytes: Vec::with_capacity(data.len()),
        };
        sample.append_bytes(data);
        sample
    }

    /// Append a single bit to the bit view only. Non-zero values count as 1.
    pub fn append_bit(&mut self, bit: u8) {
        self.bits.push(u8::from(bit != 0));
    }

    /// Append a byte to the byte view and its eight bits, MSB first.
    pub fn append_byte(&mut self, byte: u8) {
        self.bytes.push(byte);
        self.append_bits_of(byte, 8);
    }

    pub fn append_bytes(&mut self, data: &[u8]) {
        for &byte in data {
            self.append_byte(byte);
        }
    }

    /// Append the leading `count` bits of `byte` to the bit view only.
    pub fn append_bits_of(&mut self, byte: u8, count: usize) {
        for shift in (8 - count.min(8)..8).rev() {
            self.bits.push((byte >> shift) & 1);
        }
    }

    pub fn bits(&self) -> &[u8] {
        &self.bits
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Symbol view for the given alphabet.
    pub fn symbols(&self, alphabet: Alphabet) -> &[u8] {
        match alphabet {
            Alphabet::Binary => &self.bits,
            Alphabet::Byte => &self.bytes,
        }
    }
}

const CHUNK_SIZE: usize = 4096;

/// Sequential reader that turns a file into [`Sample`]s.
pub struct SampleReader {
    reader: BufReader<File>,
    length: u64,
}

impl SampleReader {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let length = file.metadata()?.len();
        Ok(Self {
            reader: BufReader::new(file),
            length,
        })
    }

    /// File length in bytes.
    pub fn len(&self) -> u64 {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Read up to `count` bytes. Stops early at end of file.
    pub fn read_bytes(&mut self, count: usize) -> Result<Sample> {
        let mut sample = Sample::new();
        self.fill(&mut sample, count)?;
        Ok(sample)
    }

    /// Read up to `count` bits. A trailing partial byte contributes only its
    /// leading bits, and only to the bit view.
    pub fn read_bits(&mut self, count: usize) -> Result<Sample> {
        let mut sample = Sample::new();
        let whole = count / 8;
        let partial = count % 8;
        if self.fill(&mut sample, whole)? == whole && partial > 0 {
            let mut buf = [0u8; 1];
            if self.reader.read(&mut buf)? == 1 {
                sample.append_bits_of(buf[0], partial);
            }
        }
        Ok(sample)
    }

    fn fill(&mut self, sample: &mut Sample, mut remaining: usize) -> Result<usize> {
        let mut buf = [0u8; CHUNK_SIZE];
        let mut total = 0;
        while remaining > 0 {
            let want = remaining.min(CHUNK_SIZE);
            let read = self.reader.read(&mut buf[..want])?;
            if read == 0 {
                break;
            }
            sample.append_bytes(&buf[..read]);
            remaining -= read;
            total += read;
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_bytes_unpack_msb_first() {
        let sample = Sample::from_bytes(&[0b1011_0001]);
        assert_eq!(sample.bits(), &[1, 0, 1, 1, 0, 0, 0, 1]);
        assert_eq!(sample.bytes(), &[0b1011_0001]);
        assert_eq!(sample.symbols(Alphabet::Byte).len(), 1);
        assert_eq!(sample.symbols(Alphabet::Binary).len(), 8);
    }

    #[test]
    fn test_partial_bits_only_touch_bit_view() {
        let mut sample = Sample::new();
        sample.append_bits_of(0b1100_0000, 3);
        sample.append_bit(7);
        assert_eq!(sample.bits(), &[1, 1, 0, 1]);
        assert!(sample.bytes().is_empty());
    }

    #[test]
    fn test_alphabet_from_size() {
        assert_eq!(Alphabet::try_from(2).unwrap(), Alphabet::Binary);
        assert_eq!(Alphabet::try_from(256).unwrap(), Alphabet::Byte);
        assert!(Alphabet::try_from(16).is_err());
        assert_eq!(Alphabet::Byte.max_entropy(), 8.0);
    }

    #[test]
    fn test_validate_rejects_non_binary_symbols() {
        assert!(validate_symbols(&[0, 1, 1, 0], Alphabet::Binary).is_ok());
        assert!(validate_symbols(&[0, 2], Alphabet::Binary).is_err());
        assert!(validate_symbols(&[0, 255], Alphabet::Byte).is_ok());
    }

    #[test]
    fn test_reader_reads_bytes_and_bits() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0xAB, 0xCD, 0xF0]).unwrap();
        file.flush().unwrap();

        let mut reader = SampleReader::open(file.path()).unwrap();
        assert_eq!(reader.len(), 3);
        let sample = reader.read_bytes(10).unwrap();
        assert_eq!(sample.bytes(), &[0xAB, 0xCD, 0xF0]);

        let mut reader = SampleReader::open(file.path()).unwrap();
        let sample = reader.read_bits(12).unwrap();
        assert_eq!(sample.bytes(), &[0xAB]);
        assert_eq!(sample.bits().len(), 12);
        assert_eq!(&sample.bits()[8..], &[1, 1, 0, 0]);
    }
}
