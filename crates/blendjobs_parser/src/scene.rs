//! Decoding of the payload carried by a `REND` record.
//!
//! Blender writes one `RenderInfo` per scene right after the file header:
//! start frame, end frame and a fixed 64-byte scene name.

use crate::endian::Endian;
use crate::error::{BlendError, Result};
use std::fmt;
use std::io::Read;

/// Width of the fixed scene name field.
pub const SCENE_NAME_LEN: usize = 64;
/// Bytes consumed by [`SceneRecord::read`].
pub const SCENE_RECORD_LEN: usize = 8 + SCENE_NAME_LEN;

/// Scene name as stored in the file.
///
/// Names are decoded as UTF-8 when possible. Anything else is kept verbatim
/// so callers can tell a clean decode from a fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum SceneName {
    Text(String),
    Raw(Vec<u8>),
}

impl SceneName {
    /// Truncate `field` at its first null byte and decode it.
    pub fn from_field(field: &[u8]) -> Result<Self> {
        let end = field
            .iter()
            .position(|&b| b == 0)
            .ok_or(BlendError::UnterminatedName {
                window: field.len(),
            })?;
        let bytes = &field[..end];
        match std::str::from_utf8(bytes) {
            Ok(text) => Ok(SceneName::Text(text.to_owned())),
            Err(e) => {
                log::debug!("Scene name is not valid UTF-8 ({e}), keeping raw bytes");
                Ok(SceneName::Raw(bytes.to_vec()))
            }
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            SceneName::Text(s) => Some(s),
            SceneName::Raw(_) => None,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            SceneName::Text(s) => s.as_bytes(),
            SceneName::Raw(b) => b,
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, SceneName::Raw(_))
    }
}

impl fmt::Display for SceneName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneName::Text(s) => f.write_str(s),
            SceneName::Raw(b) => f.write_str(&String::from_utf8_lossy(b)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SceneRecord {
    pub start_frame: i32,
    pub end_frame: i32,
    pub name: SceneName,
}

impl SceneRecord {
    /// Read one 72-byte scene payload.
    pub fn read<R: Read>(reader: &mut R, endian: Endian) -> Result<Self> {
        let mut frames = [0u8; 8];
        reader
            .read_exact(&mut frames)
            .map_err(|e| BlendError::eof_as_truncated(e, "scene frame range"))?;
        let start_frame = endian.i32_from([frames[0], frames[1], frames[2], frames[3]]);
        let end_frame = endian.i32_from([frames[4], frames[5], frames[6], frames[7]]);

        let mut name = [0u8; SCENE_NAME_LEN];
        reader
            .read_exact(&mut name)
            .map_err(|e| BlendError::eof_as_truncated(e, "scene name"))?;

        Ok(SceneRecord {
            start_frame,
            end_frame,
            name: SceneName::from_field(&name)?,
        })
    }

    /// `end - start + 1`, widened so extreme ranges cannot overflow.
    pub fn frame_count(&self) -> i64 {
        i64::from(self.end_frame) - i64::from(self.start_frame) + 1
    }
}
