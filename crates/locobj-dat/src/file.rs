//! Object file (`.dat`) handling.

use std::fs;
use std::io::Write;
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};
use locobj_common::{IntoBytes, ObjectHeader, Span};
use tracing::{debug, trace};

use crate::encoding::{decode_chunk, ChunkEncoding};
use crate::{Error, Result};

/// Bytes before the payload: header, encoding byte and payload length.
pub const PREAMBLE_SIZE: usize = ObjectHeader::SIZE + 1 + 4;

/// A Locomotion object file.
///
/// The file holds an [`ObjectHeader`] followed by one encoded chunk with the
/// object payload. The payload is decoded on read.
#[derive(Debug, Clone)]
pub struct ObjectFile {
    header: ObjectHeader,
    encoding: ChunkEncoding,
    /// Decoded payload.
    data: Vec<u8>,
}

impl ObjectFile {
    /// Create an object file from a header and an already decoded payload.
    pub fn new(header: ObjectHeader, data: Vec<u8>) -> Self {
        Self {
            header,
            encoding: ChunkEncoding::Uncompressed,
            data,
        }
    }

    /// Get the object header.
    pub fn header(&self) -> &ObjectHeader {
        &self.header
    }

    /// Encoding the payload was stored with.
    pub fn encoding(&self) -> ChunkEncoding {
        self.encoding
    }

    /// Get the decoded payload.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Read an object file from disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = fs::read(path)?;
        Self::parse(&bytes)
    }

    /// Read only the header of an object file.
    pub fn read_header(bytes: &[u8]) -> Result<ObjectHeader> {
        let mut span = Span::new(bytes);
        Ok(span.read_struct()?)
    }

    /// Parse an object file from bytes.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut span = Span::new(bytes);

        let header: ObjectHeader = span.read_struct()?;
        let encoding_byte = span.read_u8()?;
        let encoding = ChunkEncoding::try_from(encoding_byte).map_err(Error::InvalidEncoding)?;
        let length = span.read_u32()? as usize;
        if length > span.remaining() {
            return Err(Error::PayloadLength {
                declared: length,
                available: span.remaining(),
            });
        }
        let payload = span.read_bytes(length)?;

        if !span.is_empty() {
            trace!(trailing = span.remaining(), "ignoring bytes after object chunk");
        }

        let data = decode_chunk(encoding, payload)?;
        debug!(%header, ?encoding, stored = length, decoded = data.len(), "parsed object file");

        Ok(Self {
            header,
            encoding,
            data,
        })
    }

    /// Checksum computed from the header and decoded payload.
    pub fn computed_checksum(&self) -> u32 {
        self.header.compute_checksum(&self.data)
    }

    /// Check the stored checksum against the contents.
    pub fn verify_checksum(&self) -> Result<()> {
        let actual = self.computed_checksum();
        if actual != self.header.checksum() {
            return Err(Error::ChecksumMismatch {
                expected: self.header.checksum(),
                actual,
            });
        }
        Ok(())
    }

    /// Serialize with an uncompressed payload.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut output = Vec::with_capacity(PREAMBLE_SIZE + self.data.len());
        output.write_all(self.header.as_bytes())?;
        output.write_u8(ChunkEncoding::Uncompressed as u8)?;
        output.write_u32::<LittleEndian>(self.data.len() as u32)?;
        output.write_all(&self.data)?;
        Ok(output)
    }

    /// Write to a file with an uncompressed payload.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_bytes()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use locobj_common::ObjectType;

    fn header_for(data: &[u8]) -> ObjectHeader {
        let unsigned = ObjectHeader::new(ObjectType::Industry, "COALMINE", 0);
        let checksum = unsigned.compute_checksum(data);
        ObjectHeader::new(ObjectType::Industry, "COALMINE", checksum)
    }

    #[test]
    fn test_uncompressed_roundtrip() {
        let data = vec![1, 2, 3, 4, 5];
        let file = ObjectFile::new(header_for(&data), data.clone());

        let bytes = file.to_bytes().unwrap();
        assert_eq!(bytes.len(), PREAMBLE_SIZE + 5);

        let parsed = ObjectFile::parse(&bytes).unwrap();
        assert_eq!(parsed.header(), file.header());
        assert_eq!(parsed.encoding(), ChunkEncoding::Uncompressed);
        assert_eq!(parsed.data(), &data[..]);
        parsed.verify_checksum().unwrap();
    }

    #[test]
    fn test_run_length_payload() {
        let decoded = b"AAAAB".to_vec();
        let header = header_for(&decoded);

        let mut bytes = header.as_bytes().to_vec();
        bytes.push(1);
        let payload = [0xFD, b'A', 0x00, b'B'];
        bytes.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&payload);

        let file = ObjectFile::parse(&bytes).unwrap();
        assert_eq!(file.encoding(), ChunkEncoding::RunLengthSingle);
        assert_eq!(file.data(), b"AAAAB");
        file.verify_checksum().unwrap();
    }

    #[test]
    fn test_checksum_mismatch() {
        let header = ObjectHeader::new(ObjectType::Industry, "COALMINE", 0x1234_5678);
        let file = ObjectFile::new(header, vec![9, 9, 9]);

        assert!(matches!(
            file.verify_checksum(),
            Err(Error::ChecksumMismatch { expected: 0x1234_5678, .. })
        ));
    }

    #[test]
    fn test_invalid_encoding() {
        let mut bytes = ObjectFile::new(header_for(&[]), Vec::new()).to_bytes().unwrap();
        bytes[ObjectHeader::SIZE] = 7;

        assert!(matches!(ObjectFile::parse(&bytes), Err(Error::InvalidEncoding(7))));
    }

    #[test]
    fn test_truncated_payload() {
        let mut bytes = ObjectFile::new(header_for(&[1, 2, 3]), vec![1, 2, 3])
            .to_bytes()
            .unwrap();
        bytes.pop();

        assert!(matches!(
            ObjectFile::parse(&bytes),
            Err(Error::PayloadLength { declared: 3, available: 2 })
        ));
    }

    #[test]
    fn test_read_header_only() {
        let file = ObjectFile::new(header_for(&[1]), vec![1]);
        let bytes = file.to_bytes().unwrap();

        let header = ObjectFile::read_header(&bytes).unwrap();
        assert_eq!(header.object_type(), Some(ObjectType::Industry));
        assert_eq!(header.name(), "COALMINE");
    }
}
