//! Retrieval of input objects into a local directory.

use crate::config::HandlerConfig;
use crate::error::{HandlerError, Result};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use url::Url;

/// Location of an object the handler needs locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectUri {
    /// `s3://bucket/key`
    S3 { bucket: String, key: String },
    /// Plain `http(s)://` URL
    Http(Url),
    /// `file://` URL or bare filesystem path
    Local(PathBuf),
}

impl ObjectUri {
    pub fn parse(uri: &str) -> Result<Self> {
        let uri = uri.trim();
        if let Some(rest) = uri.strip_prefix("s3://") {
            return match rest.split_once('/') {
                Some((bucket, key)) if !bucket.is_empty() && !key.is_empty() => {
                    Ok(ObjectUri::S3 {
                        bucket: bucket.to_string(),
                        key: key.to_string(),
                    })
                }
                _ => Err(HandlerError::InvalidUri(uri.to_string())),
            };
        }
        if !uri.contains("://") {
            if uri.is_empty() {
                return Err(HandlerError::InvalidUri(uri.to_string()));
            }
            return Ok(ObjectUri::Local(PathBuf::from(uri)));
        }

        let url = Url::parse(uri).map_err(|_| HandlerError::InvalidUri(uri.to_string()))?;
        match url.scheme() {
            "http" | "https" => Ok(ObjectUri::Http(url)),
            "file" => url
                .to_file_path()
                .map(ObjectUri::Local)
                .map_err(|_| HandlerError::InvalidUri(uri.to_string())),
            _ => Err(HandlerError::InvalidUri(uri.to_string())),
        }
    }

    /// Last path component, used as the local file name.
    pub fn file_name(&self) -> Option<String> {
        match self {
            ObjectUri::S3 { key, .. } => key
                .rsplit('/')
                .next()
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            ObjectUri::Http(url) => url
                .path_segments()?
                .next_back()
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            ObjectUri::Local(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned()),
        }
    }

    /// Another object stored alongside this one.
    ///
    /// For S3 that is `key` at the root of the same bucket; for URLs and paths
    /// it is resolved relative to this object's directory.
    pub fn sibling(&self, key: &str) -> Result<Self> {
        match self {
            ObjectUri::S3 { bucket, .. } => Ok(ObjectUri::S3 {
                bucket: bucket.clone(),
                key: key.to_string(),
            }),
            ObjectUri::Http(url) => url
                .join(key)
                .map(ObjectUri::Http)
                .map_err(|_| HandlerError::InvalidUri(key.to_string())),
            ObjectUri::Local(path) => Ok(ObjectUri::Local(
                path.parent().unwrap_or(Path::new("")).join(key),
            )),
        }
    }
}

impl fmt::Display for ObjectUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectUri::S3 { bucket, key } => write!(f, "s3://{bucket}/{key}"),
            ObjectUri::Http(url) => write!(f, "{url}"),
            ObjectUri::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Makes an object available as a local file.
pub trait Fetcher {
    fn fetch(&self, uri: &ObjectUri) -> Result<PathBuf>;
}

/// Downloads S3 and HTTP objects with a blocking client; local paths are used in place.
///
/// S3 objects are read through their public HTTPS endpoint, so the bucket
/// must allow anonymous reads or sit behind a configured endpoint.
pub struct HttpFetcher {
    client: Client,
    download_dir: PathBuf,
    s3_region: Option<String>,
    s3_endpoint: Option<String>,
}

impl HttpFetcher {
    pub fn new(config: &HandlerConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("blendjobs/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| HandlerError::fetch("client", e))?;
        Ok(Self {
            client,
            download_dir: config.download_dir.clone(),
            s3_region: config.s3_region.clone(),
            s3_endpoint: config.s3_endpoint.clone(),
        })
    }

    /// HTTP location an object is downloaded from.
    pub fn object_url(&self, uri: &ObjectUri) -> Result<Url> {
        match uri {
            ObjectUri::S3 { bucket, key } => {
                let (base, path_style) = match (&self.s3_endpoint, &self.s3_region) {
                    (Some(endpoint), _) => (endpoint.clone(), true),
                    (None, Some(region)) => {
                        (format!("https://{bucket}.s3.{region}.amazonaws.com/"), false)
                    }
                    (None, None) => (format!("https://{bucket}.s3.amazonaws.com/"), false),
                };
                let mut url =
                    Url::parse(&base).map_err(|_| HandlerError::InvalidUri(base.clone()))?;
                {
                    let mut segments = url
                        .path_segments_mut()
                        .map_err(|_| HandlerError::InvalidUri(base.clone()))?;
                    segments.pop_if_empty();
                    if path_style {
                        segments.push(bucket);
                    }
                    segments.extend(key.split('/'));
                }
                Ok(url)
            }
            ObjectUri::Http(url) => Ok(url.clone()),
            ObjectUri::Local(path) => Err(HandlerError::InvalidUri(path.display().to_string())),
        }
    }

    fn download(&self, uri: &ObjectUri) -> Result<PathBuf> {
        let url = self.object_url(uri)?;
        let name = uri
            .file_name()
            .ok_or_else(|| HandlerError::InvalidUri(uri.to_string()))?;
        let dest = self.download_dir.join(name);

        log::info!("Downloading {uri} to {}", dest.display());
        let resp = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| HandlerError::fetch(uri, e))?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Err(HandlerError::NotFound(uri.to_string()));
        }
        let mut resp = resp
            .error_for_status()
            .map_err(|e| HandlerError::fetch(uri, e))?;

        let bytes = save_to(&self.download_dir, &dest, |file| {
            resp.copy_to(file).map_err(|e| HandlerError::fetch(uri, e))
        })?;
        log::debug!("Fetched {bytes} bytes from {url}");
        Ok(dest)
    }
}

/// Write through a temporary file in `dir` and move it to `dest` once `write` succeeds.
/// On failure the temporary file is removed and `dest` is left untouched.
fn save_to<F>(dir: &Path, dest: &Path, write: F) -> Result<u64>
where
    F: FnOnce(&mut File) -> Result<u64>,
{
    std::fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    let bytes = write(tmp.as_file_mut())?;
    tmp.persist(dest).map_err(|e| HandlerError::Io(e.error))?;
    Ok(bytes)
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, uri: &ObjectUri) -> Result<PathBuf> {
        match uri {
            ObjectUri::Local(path) => {
                if path.exists() {
                    Ok(path.clone())
                } else {
                    Err(HandlerError::NotFound(uri.to_string()))
                }
            }
            _ => self.download(uri),
        }
    }
}
