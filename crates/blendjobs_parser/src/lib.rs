// blendjobs_parser/src/lib.rs

//! # blendjobs_parser
//!
//! Header scanner for Blender .blend files.
//!
//! Recovers the per-scene frame ranges Blender stores in `REND` records right
//! after the file header, without reading the rest of the file, and sizes a
//! render batch from the first scene.
//!
//! ## Pipeline
//!
//! 1. **Source**: open the file and strip a gzip or zstd wrapper if present
//! 2. **Header**: check the `BLENDER` magic, read pointer width and endianness
//! 3. **Blocks**: walk the bhead stream and hand `REND` payloads to the decoder
//! 4. **Scenes**: decode start/end frame and the fixed-width scene name
//! 5. **Jobs**: derive frame count and job count from the first scene
//!
//! A file without the `BLENDER` magic is not an error: it scans to an empty
//! report. Truncated or malformed records are.

pub mod block;
pub mod compression;
pub mod endian;
pub mod error;
pub mod header;
pub mod jobs;
pub mod scene;

pub use block::{BlockCode, RecordHeader, ScanMode, scan_scenes};
pub use compression::{BlendSource, Compression, detect_compression, from_reader, open_source};
pub use endian::{Endian, PointerWidth};
pub use error::{BlendError, ErrorClass, Result};
pub use header::FileHeader;
pub use jobs::{JobPlan, frame_count, plan_jobs};
pub use scene::{SceneName, SceneRecord};

use std::io::{Read, Seek};
use std::path::Path;

/// Options for scanning operations
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanOptions {
    pub mode: ScanMode,
}

/// Everything one scan learned about a file.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScanReport {
    pub compression: Compression,
    /// `None` when the stream does not start with the `BLENDER` magic.
    pub header: Option<FileHeader>,
    pub scenes: Vec<SceneRecord>,
}

impl ScanReport {
    pub fn is_blend_file(&self) -> bool {
        self.header.is_some()
    }
}

/// Scan an already decompressed source.
pub fn scan_source<R: Read>(mut source: BlendSource<R>, options: &ScanOptions) -> Result<ScanReport> {
    let compression = source.compression();
    let Some(header) = FileHeader::read(&mut source)? else {
        log::debug!("Magic mismatch, skipping block scan");
        return Ok(ScanReport {
            compression,
            header: None,
            scenes: Vec::new(),
        });
    };
    log::debug!(
        "Blend header: {:?} pointers, {:?} endian, version {:?}",
        header.pointer_width,
        header.endian,
        header.version_str()
    );

    let scenes = scan_scenes(&mut source, &header, options.mode)?;
    Ok(ScanReport {
        compression,
        header: Some(header),
        scenes,
    })
}

/// Scan any seekable reader, detecting compression first.
pub fn scan_reader<R: Read + Seek>(reader: R, options: &ScanOptions) -> Result<ScanReport> {
    scan_source(from_reader(reader)?, options)
}

/// Scan a file on disk. The file is closed before this returns, whatever the outcome.
pub fn scan_path<P: AsRef<Path>>(path: P, options: &ScanOptions) -> Result<ScanReport> {
    let path = path.as_ref();
    log::debug!("Scanning {}", path.display());
    let report = scan_source(open_source(path)?, options)?;
    if !report.is_blend_file() {
        log::warn!("not a blend file: {}", path.display());
    }
    Ok(report)
}

/// Scene records of a file using the default leading-`REND` scan.
pub fn read_rend_chunks<P: AsRef<Path>>(path: P) -> Result<Vec<SceneRecord>> {
    scan_path(path, &ScanOptions::default()).map(|report| report.scenes)
}

/// Frame count of the first scene in a file.
pub fn frame_count_of<P: AsRef<Path>>(path: P) -> Result<i64> {
    frame_count(&read_rend_chunks(path)?)
}

/// Scan a file and plan render jobs for its first scene.
pub fn plan_jobs_for_path<P: AsRef<Path>>(
    path: P,
    frames_per_job: u32,
    options: &ScanOptions,
) -> Result<JobPlan> {
    let report = scan_path(path, options)?;
    plan_jobs(&report.scenes, frames_per_job)
}
