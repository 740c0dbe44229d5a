use crate::endian::read_up_to;
use crate::error::{BlendError, Result};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

/// Gzip magic number, written by Blender's "Compress" save option before 3.0.
pub const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];
/// Zstandard magic number (little endian: FD 2F B5 28), used by Blender 3.0+.
pub const ZSTD_MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];

/// Detected outer wrapper of a blend file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Compression {
    Plain,
    Gzip,
    Zstd,
}

impl Compression {
    /// Classify a stream from its leading bytes. Fewer than four bytes is fine.
    pub fn from_magic(magic: &[u8]) -> Self {
        if magic.starts_with(&ZSTD_MAGIC) {
            Compression::Zstd
        } else if magic.starts_with(&GZIP_MAGIC) {
            Compression::Gzip
        } else {
            Compression::Plain
        }
    }

    pub fn is_compressed(self) -> bool {
        !matches!(self, Compression::Plain)
    }
}

/// Peek the magic bytes of `reader` and rewind it to offset 0.
pub fn detect_compression<R: Read + Seek>(reader: &mut R) -> Result<Compression> {
    let mut magic = [0u8; 4];
    let filled = read_up_to(reader, &mut magic)?;
    reader.seek(SeekFrom::Start(0))?;
    Ok(Compression::from_magic(&magic[..filled]))
}

enum SourceReader<R: Read> {
    Plain(BufReader<R>),
    Gzip(GzDecoder<BufReader<R>>),
    #[cfg(feature = "zstd")]
    Zstd(zstd::stream::read::Decoder<'static, BufReader<R>>),
}

/// Sequential view of a blend file with any outer compression removed.
///
/// The underlying handle is owned here, so dropping the source closes the
/// file whichever way the scan ends.
pub struct BlendSource<R: Read = File> {
    compression: Compression,
    inner: SourceReader<R>,
}

impl<R: Read> BlendSource<R> {
    pub fn compression(&self) -> Compression {
        self.compression
    }
}

impl<R: Read> Read for BlendSource<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match &mut self.inner {
            SourceReader::Plain(r) => r.read(buf),
            SourceReader::Gzip(r) => r.read(buf),
            #[cfg(feature = "zstd")]
            SourceReader::Zstd(r) => r.read(buf),
        }
    }
}

/// Wrap an already-open reader, detecting and stripping compression.
pub fn from_reader<R: Read + Seek>(mut reader: R) -> Result<BlendSource<R>> {
    let compression = detect_compression(&mut reader)?;
    log::debug!("Detected {compression:?} blend source");

    let inner = match compression {
        Compression::Plain => SourceReader::Plain(BufReader::new(reader)),
        Compression::Gzip => SourceReader::Gzip(GzDecoder::new(BufReader::new(reader))),
        #[cfg(feature = "zstd")]
        Compression::Zstd => SourceReader::Zstd(
            zstd::stream::read::Decoder::with_buffer(BufReader::new(reader))
                .map_err(|e| BlendError::DecompressionFailed(format!("zstd init: {e}")))?,
        ),
        #[cfg(not(feature = "zstd"))]
        Compression::Zstd => {
            return Err(BlendError::UnsupportedCompression(
                "Zstd support not compiled in".to_string(),
            ));
        }
    };

    Ok(BlendSource { compression, inner })
}

/// Open a blend file from disk with transparent decompression.
pub fn open_source<P: AsRef<Path>>(path: P) -> Result<BlendSource<File>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => BlendError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => BlendError::Io(e),
    })?;
    from_reader(file)
}
