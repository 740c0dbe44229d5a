use crate::endian::{read_u32, read_up_to, skip_bytes};
use crate::error::{BlendError, Result};
use crate::header::FileHeader;
use crate::scene::{SCENE_RECORD_LEN, SceneRecord};
use std::fmt;
use std::io::Read;

/// FourCC-like block code of a bhead.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct BlockCode(pub [u8; 4]);

impl BlockCode {
    pub const REND: BlockCode = BlockCode(*b"REND");
    pub const TEST: BlockCode = BlockCode(*b"TEST");
    pub const GLOB: BlockCode = BlockCode(*b"GLOB");
    pub const DNA1: BlockCode = BlockCode(*b"DNA1");
    pub const ENDB: BlockCode = BlockCode(*b"ENDB");

    pub fn is_rend(&self) -> bool {
        *self == Self::REND
    }

    pub fn is_end(&self) -> bool {
        *self == Self::ENDB
    }
}

impl fmt::Display for BlockCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Two-letter ID codes are padded with nulls on disk.
        for &b in self.0.iter().take_while(|&&b| b != 0) {
            if b.is_ascii_graphic() {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{b:02x}")?;
            }
        }
        Ok(())
    }
}

/// How far the scanner walks the record stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScanMode {
    /// Read `REND` records only while they lead the stream; stop at the first other code.
    #[default]
    LeadingRend,
    /// Walk every bhead until `ENDB`, skipping non-`REND` bodies by their declared size.
    AllBlocks,
}

/// The part of a bhead the scanner needs. Old pointer, SDNA index and count are skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    pub code: BlockCode,
    pub size: u32,
}

impl RecordHeader {
    /// Read a full bhead, or `None` at a clean end of stream.
    pub fn read<R: Read>(reader: &mut R, header: &FileHeader) -> Result<Option<Self>> {
        match read_code(reader)? {
            Some(code) => Self::read_after_code(reader, header, code).map(Some),
            None => Ok(None),
        }
    }

    /// Read the rest of a bhead whose code has already been consumed.
    pub fn read_after_code<R: Read>(
        reader: &mut R,
        header: &FileHeader,
        code: BlockCode,
    ) -> Result<Self> {
        let size = read_u32(reader, header.endian)
            .map_err(|e| BlendError::eof_as_truncated(e, "record header"))?;
        skip_bytes(reader, (header.bhead_size() - 8) as u64)
            .map_err(|e| BlendError::eof_as_truncated(e, "record header"))?;
        Ok(RecordHeader { code, size })
    }
}

/// Read a block code; `None` when the stream is exhausted exactly at a record boundary.
fn read_code<R: Read>(reader: &mut R) -> Result<Option<BlockCode>> {
    let mut code = [0u8; 4];
    match read_up_to(reader, &mut code)? {
        0 => Ok(None),
        4 => Ok(Some(BlockCode(code))),
        _ => Err(BlendError::Truncated {
            context: "block code",
        }),
    }
}

/// Walk the record stream that follows `header` and decode every reachable scene record.
pub fn scan_scenes<R: Read>(
    reader: &mut R,
    header: &FileHeader,
    mode: ScanMode,
) -> Result<Vec<SceneRecord>> {
    match mode {
        ScanMode::LeadingRend => scan_leading(reader, header),
        ScanMode::AllBlocks => scan_all(reader, header),
    }
}

fn scan_leading<R: Read>(reader: &mut R, header: &FileHeader) -> Result<Vec<SceneRecord>> {
    let mut scenes = Vec::new();
    loop {
        let mut tag = [0u8; 4];
        let filled = read_up_to(reader, &mut tag)?;
        if filled < tag.len() {
            if filled > 0 {
                log::debug!("Stopping scan at {filled} trailing byte(s)");
            }
            break;
        }
        let code = BlockCode(tag);
        if !code.is_rend() {
            log::debug!("Stopping scan at block code '{code}'");
            break;
        }
        // The declared size is not used to bound the body here.
        let bhead = RecordHeader::read_after_code(reader, header, code)?;
        let scene = SceneRecord::read(reader, header.endian)?;
        log::debug!(
            "REND record ({} bytes): '{}' frames {}..={}",
            bhead.size,
            scene.name,
            scene.start_frame,
            scene.end_frame
        );
        scenes.push(scene);
    }
    Ok(scenes)
}

fn scan_all<R: Read>(reader: &mut R, header: &FileHeader) -> Result<Vec<SceneRecord>> {
    let mut scenes = Vec::new();
    while let Some(bhead) = RecordHeader::read(reader, header)? {
        if bhead.code.is_end() {
            break;
        }
        let size = bhead.size as usize;
        if bhead.code.is_rend() {
            if size < SCENE_RECORD_LEN {
                return Err(BlendError::Truncated {
                    context: "REND record body",
                });
            }
            let scene = SceneRecord::read(reader, header.endian)?;
            log::debug!(
                "REND record: '{}' frames {}..={}",
                scene.name,
                scene.start_frame,
                scene.end_frame
            );
            scenes.push(scene);
            skip_bytes(reader, (size - SCENE_RECORD_LEN) as u64)
                .map_err(|e| BlendError::eof_as_truncated(e, "REND record body"))?;
        } else {
            log::trace!("Skipping '{}' block of {} bytes", bhead.code, bhead.size);
            skip_bytes(reader, u64::from(bhead.size))
                .map_err(|e| BlendError::eof_as_truncated(e, "block body"))?;
        }
    }
    Ok(scenes)
}
