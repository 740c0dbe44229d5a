use std::io::Read;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Endian {
    Little,
    Big,
}

impl Endian {
    pub fn is_little(self) -> bool {
        matches!(self, Endian::Little)
    }

    pub fn is_big(self) -> bool {
        matches!(self, Endian::Big)
    }

    pub fn i32_from(self, buf: [u8; 4]) -> i32 {
        match self {
            Endian::Little => i32::from_le_bytes(buf),
            Endian::Big => i32::from_be_bytes(buf),
        }
    }

    pub fn u32_from(self, buf: [u8; 4]) -> u32 {
        match self {
            Endian::Little => u32::from_le_bytes(buf),
            Endian::Big => u32::from_be_bytes(buf),
        }
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum PointerWidth {
    Bits32,
    Bits64,
}

impl PointerWidth {
    pub fn bytes(self) -> usize {
        match self {
            PointerWidth::Bits32 => 4,
            PointerWidth::Bits64 => 8,
        }
    }
}

pub(crate) fn read_u32<R: Read>(reader: &mut R, endian: Endian) -> std::io::Result<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(endian.u32_from(buf))
}

/// Fill `buf` until it is full or the stream ends; returns the number of bytes read.
pub(crate) fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Discard exactly `len` bytes, failing with `UnexpectedEof` if the stream is shorter.
pub(crate) fn skip_bytes<R: Read>(reader: &mut R, len: u64) -> std::io::Result<()> {
    let skipped = std::io::copy(&mut reader.by_ref().take(len), &mut std::io::sink())?;
    if skipped < len {
        return Err(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            format!("expected to skip {len} bytes, stream ended after {skipped}"),
        ));
    }
    Ok(())
}
