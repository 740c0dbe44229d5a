use blendjobs_parser::{ScanMode, ScanOptions};
use std::path::PathBuf;

/// Texture the render template expects next to every input file.
pub const DEFAULT_TEXTURE_KEY: &str = "Place_designs_here_Tshirt.psd";
pub const DEFAULT_DOWNLOAD_DIR: &str = "/tmp";

pub const ENV_DOWNLOAD_DIR: &str = "BLENDJOBS_DOWNLOAD_DIR";
pub const ENV_TEXTURE_KEY: &str = "BLENDJOBS_TEXTURE_KEY";
pub const ENV_S3_ENDPOINT: &str = "BLENDJOBS_S3_ENDPOINT";
pub const ENV_REGION: &str = "AWS_REGION";

#[derive(Debug, Clone)]
pub struct HandlerConfig {
    /// Where fetched objects are written (default: /tmp)
    pub download_dir: PathBuf,
    /// Key of the texture fetched from the input's bucket
    pub texture_key: String,
    /// Region used to build virtual-hosted S3 URLs; `None` uses the global endpoint
    pub s3_region: Option<String>,
    /// Path-style endpoint (e.g. a MinIO or LocalStack URL) overriding AWS hosts
    pub s3_endpoint: Option<String>,
    pub scan_mode: ScanMode,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            download_dir: PathBuf::from(DEFAULT_DOWNLOAD_DIR),
            texture_key: DEFAULT_TEXTURE_KEY.to_string(),
            s3_region: None,
            s3_endpoint: None,
            scan_mode: ScanMode::default(),
        }
    }
}

impl HandlerConfig {
    /// Defaults overridden by `BLENDJOBS_*` and `AWS_REGION` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();
        if let Some(dir) = non_empty(ENV_DOWNLOAD_DIR) {
            config.download_dir = PathBuf::from(dir);
        }
        if let Some(key) = non_empty(ENV_TEXTURE_KEY) {
            config.texture_key = key;
        }
        config.s3_region = non_empty(ENV_REGION);
        config.s3_endpoint = non_empty(ENV_S3_ENDPOINT);
        config
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            mode: self.scan_mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = HandlerConfig::default();
        assert_eq!(config.download_dir, PathBuf::from("/tmp"));
        assert_eq!(config.texture_key, "Place_designs_here_Tshirt.psd");
        assert_eq!(config.scan_options().mode, ScanMode::LeadingRend);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_DOWNLOAD_DIR, "/var/cache/render"),
            (ENV_TEXTURE_KEY, "textures/front.psd"),
            (ENV_REGION, "eu-west-1"),
            (ENV_S3_ENDPOINT, "   "),
        ]);
        let config = HandlerConfig::from_lookup(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.download_dir, PathBuf::from("/var/cache/render"));
        assert_eq!(config.texture_key, "textures/front.psd");
        assert_eq!(config.s3_region.as_deref(), Some("eu-west-1"));
        assert_eq!(config.s3_endpoint, None);
    }
}
