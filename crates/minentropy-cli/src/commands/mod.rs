pub mod estimate;
pub mod sts;

use minentropy_core::{Alphabet, Result, Sample, SampleReader};
use std::path::Path;

/// Read `path` into a sample holding at most `limit` symbols of `alphabet`
/// (the whole file when `limit` is `None`).
pub fn read_sample(path: &Path, alphabet: Alphabet, limit: Option<usize>) -> Result<Sample> {
    let mut reader = SampleReader::open(path)?;
    let available = usize::try_from(reader.len()).unwrap_or(usize::MAX);
    match alphabet {
        Alphabet::Binary => {
            let bits = available.saturating_mul(8);
            reader.read_bits(limit.map_or(bits, |n| n.min(bits)))
        }
        Alphabet::Byte => reader.read_bytes(limit.map_or(available, |n| n.min(available))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_sample_limits() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0xF0, 0x0F, 0xAA]).unwrap();

        let bits = read_sample(file.path(), Alphabet::Binary, Some(12)).unwrap();
        assert_eq!(bits.bits(), &[1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0]);

        let bytes = read_sample(file.path(), Alphabet::Byte, None).unwrap();
        assert_eq!(bytes.bytes(), &[0xF0, 0x0F, 0xAA]);
        assert_eq!(bytes.bits().len(), 24);
    }
}
