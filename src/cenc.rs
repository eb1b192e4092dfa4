//! Per-sample Common Encryption parameters.
//!
//! Packed sample auxiliary information carries, for each sample, an
//! initialization vector and an optional subsample map partitioning the
//! sample into clear and encrypted byte ranges.

use crate::error::{Error, Result};
use crate::reader::Reader;

/// Entry describing a subsample's clear and encrypted portions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubsampleEntry {
    /// Number of clear bytes at the start of the subsample.
    pub bytes_of_clear_data: u16,
    /// Number of encrypted bytes following the clear bytes.
    pub bytes_of_encrypted_data: u32,
}

/// Encryption parameters of one sample, parsed from its auxiliary
/// information chunk.
#[derive(Debug, Clone, Default)]
pub struct FrameCencInfo {
    iv: Vec<u8>,
    subsamples: Vec<SubsampleEntry>,
}

impl FrameCencInfo {
    /// Parse one sample's auxiliary information chunk.
    ///
    /// The chunk is `iv_size` bytes of initialization vector and, iff bytes
    /// remain, a big-endian subsample count followed by that many 6-byte
    /// (clear count, encrypted count) records. Trailing bytes are an error.
    pub fn parse(reader: &mut Reader<'_>, iv_size: u8) -> Result<Self> {
        if !matches!(iv_size, 0 | 8 | 16) {
            return Err(Error::AuxInfo(format!(
                "initialization vector size {iv_size} is not 0, 8 or 16"
            )));
        }

        let iv = reader.read_bytes(usize::from(iv_size)).map_err(|_| {
            Error::AuxInfo(format!("truncated {iv_size} byte initialization vector"))
        })?;

        let mut subsamples = Vec::new();
        if reader.has_more_data() {
            let subsample_count = reader
                .read_u16()
                .map_err(|_| Error::AuxInfo("truncated subsample count".to_owned()))?;

            for i in 0..subsample_count {
                let bytes_of_clear_data = reader
                    .read_u16()
                    .map_err(|_| Error::AuxInfo(format!("truncated subsample record {i}")))?;
                let bytes_of_encrypted_data = reader
                    .read_u32()
                    .map_err(|_| Error::AuxInfo(format!("truncated subsample record {i}")))?;

                subsamples.push(SubsampleEntry {
                    bytes_of_clear_data,
                    bytes_of_encrypted_data,
                });
            }
        }

        if reader.has_more_data() {
            return Err(Error::AuxInfo(format!(
                "{} trailing bytes after the subsample records",
                reader.get_length() - reader.get_position()
            )));
        }

        Ok(Self { iv, subsamples })
    }

    /// The sample's initialization vector.
    pub fn iv(&self) -> &[u8] {
        &self.iv
    }

    /// The sample's subsample map; empty for whole-sample encryption.
    pub fn subsamples(&self) -> &[SubsampleEntry] {
        &self.subsamples
    }

    /// Sum of clear and encrypted byte counts over all subsamples. A
    /// non-empty map must cover the whole sample.
    pub fn total_size_of_subsamples(&self) -> u64 {
        self.subsamples
            .iter()
            .map(|s| u64::from(s.bytes_of_clear_data) + u64::from(s.bytes_of_encrypted_data))
            .sum()
    }
}

/// Everything a decryptor needs for one sample. Freshly allocated per
/// sample; nothing borrows from the iterator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecryptConfig {
    /// Default key identifier from the track's encryption parameters.
    pub key_id: [u8; 16],
    /// The sample's initialization vector.
    pub iv: Vec<u8>,
    /// Clear/encrypted partition of the sample; empty means the whole
    /// sample is encrypted.
    pub subsamples: Vec<SubsampleEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_iv_only() {
        let chunk = [1u8, 2, 3, 4, 5, 6, 7, 8];
        let mut reader = Reader::new(&chunk);
        let info = FrameCencInfo::parse(&mut reader, 8).unwrap();

        assert_eq!(info.iv(), &chunk);
        assert!(info.subsamples().is_empty());
        assert_eq!(info.total_size_of_subsamples(), 0);
    }

    #[test]
    fn test_parse_with_subsamples() {
        let mut chunk = vec![0u8; 8];
        chunk.extend_from_slice(&2u16.to_be_bytes());
        chunk.extend_from_slice(&10u16.to_be_bytes());
        chunk.extend_from_slice(&90u32.to_be_bytes());
        chunk.extend_from_slice(&5u16.to_be_bytes());
        chunk.extend_from_slice(&45u32.to_be_bytes());

        let mut reader = Reader::new(&chunk);
        let info = FrameCencInfo::parse(&mut reader, 8).unwrap();

        assert_eq!(
            info.subsamples(),
            [
                SubsampleEntry {
                    bytes_of_clear_data: 10,
                    bytes_of_encrypted_data: 90,
                },
                SubsampleEntry {
                    bytes_of_clear_data: 5,
                    bytes_of_encrypted_data: 45,
                },
            ]
        );
        assert_eq!(info.total_size_of_subsamples(), 150);
    }

    #[test]
    fn test_truncated_iv() {
        let chunk = [0u8; 7];
        let mut reader = Reader::new(&chunk);
        assert!(FrameCencInfo::parse(&mut reader, 8).is_err());
    }

    #[test]
    fn test_truncated_subsample_records() {
        let mut chunk = vec![0u8; 8];
        chunk.extend_from_slice(&2u16.to_be_bytes());
        chunk.extend_from_slice(&[0u8; 6]);

        let mut reader = Reader::new(&chunk);
        assert!(FrameCencInfo::parse(&mut reader, 8).is_err());
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut chunk = vec![0u8; 8];
        chunk.extend_from_slice(&1u16.to_be_bytes());
        chunk.extend_from_slice(&[0u8; 6]);
        chunk.push(0xff);

        let mut reader = Reader::new(&chunk);
        assert!(FrameCencInfo::parse(&mut reader, 8).is_err());
    }

    #[test]
    fn test_unsupported_iv_size() {
        let chunk = [0u8; 4];
        let mut reader = Reader::new(&chunk);
        assert!(FrameCencInfo::parse(&mut reader, 4).is_err());
    }
}
