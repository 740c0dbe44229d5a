use crate::endian::{Endian, PointerWidth, read_up_to};
use crate::error::{BlendError, Result};
use std::io::Read;

pub const BLEND_MAGIC: &[u8; 7] = b"BLENDER";

/// Decoded 12-byte file header: `BLENDER` + pointer flag + endian flag + 3 version digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FileHeader {
    pub pointer_width: PointerWidth,
    pub endian: Endian,
    /// Raw version digits, e.g. `*b"279"`. Not interpreted.
    pub version: [u8; 3],
}

impl FileHeader {
    pub const SIZE: usize = 12;

    /// Read the header from the start of a decompressed stream.
    ///
    /// Returns `Ok(None)` when the magic does not match; that is an expected
    /// outcome for non-blend inputs, not an error.
    pub fn read<R: Read>(reader: &mut R) -> Result<Option<Self>> {
        let mut magic = [0u8; 7];
        let filled = read_up_to(reader, &mut magic)?;
        if &magic[..filled] != BLEND_MAGIC {
            return Ok(None);
        }

        let mut flags = [0u8; 5];
        reader
            .read_exact(&mut flags)
            .map_err(|e| BlendError::eof_as_truncated(e, "file header"))?;

        Ok(Some(Self::from_flags(flags)))
    }

    fn from_flags(flags: [u8; 5]) -> Self {
        let pointer_width = if flags[0] == b'-' {
            PointerWidth::Bits64
        } else {
            PointerWidth::Bits32
        };
        // 'V' marks big-endian (PPC and friends), anything else is little.
        let endian = if flags[1] == b'V' {
            Endian::Big
        } else {
            Endian::Little
        };
        FileHeader {
            pointer_width,
            endian,
            version: [flags[2], flags[3], flags[4]],
        }
    }

    /// Size of one bhead record for this file.
    pub fn bhead_size(&self) -> usize {
        match self.pointer_width {
            PointerWidth::Bits32 => 20,
            PointerWidth::Bits64 => 24,
        }
    }

    pub fn version_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.version).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn decode(bytes: &[u8]) -> Result<Option<FileHeader>> {
        FileHeader::read(&mut Cursor::new(bytes))
    }

    #[test]
    fn decode_legacy_header_le_64() {
        let hdr = decode(b"BLENDER-v405").unwrap().unwrap();
        assert_eq!(hdr.pointer_width, PointerWidth::Bits64);
        assert_eq!(hdr.endian, Endian::Little);
        assert_eq!(hdr.version_str(), Some("405"));
        assert_eq!(hdr.bhead_size(), 24);

        let hdr = decode(b"BLENDER_v280").unwrap().unwrap();
        assert_eq!(hdr.pointer_width, PointerWidth::Bits32);
        assert_eq!(hdr.endian, Endian::Little);
        assert_eq!(hdr.bhead_size(), 20);
    }

    #[test]
    fn decode_big_endian_header() {
        let hdr = decode(b"BLENDER_V249").unwrap().unwrap();
        assert_eq!(hdr.pointer_width, PointerWidth::Bits32);
        assert_eq!(hdr.endian, Endian::Big);
    }

    #[test]
    fn unknown_flags_fall_back_to_32_bit_little() {
        let hdr = decode(b"BLENDERxy123").unwrap().unwrap();
        assert_eq!(hdr.pointer_width, PointerWidth::Bits32);
        assert_eq!(hdr.endian, Endian::Little);
    }

    #[test]
    fn header_consumes_exactly_twelve_bytes() {
        let mut cursor = Cursor::new(b"BLENDER-v405REND".to_vec());
        FileHeader::read(&mut cursor).unwrap().unwrap();
        assert_eq!(cursor.position(), FileHeader::SIZE as u64);
    }

    #[test]
    fn wrong_magic_is_not_an_error() {
        assert_eq!(decode(b"NOTBLEND-v405").unwrap(), None);
        assert_eq!(decode(b"BLEN").unwrap(), None);
        assert_eq!(decode(b"").unwrap(), None);
    }

    #[test]
    fn truncated_flags_are_an_error() {
        let err = decode(b"BLENDER-v").unwrap_err();
        assert!(matches!(
            err,
            BlendError::Truncated {
                context: "file header"
            }
        ));
    }
}
