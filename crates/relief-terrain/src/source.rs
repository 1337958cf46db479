//! Resource sources: where descriptor, elevation, and shader bytes come from
//!
//! Paths are application-relative (`./terrainInfo.json`, `shaders/terrain.vert.wgsl`)
//! and resolve against either a local directory or an HTTP(S) base URL.

use relief_core::{ReliefError, Result};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Something that can hand out the bytes of an application-relative resource.
///
/// Every failure is reported as `ReliefError::ResourceLoad` naming the
/// requested path. Implementations never retry.
pub trait ResourceSource {
    /// Fetch the raw bytes of `path`
    fn fetch(&self, path: &str) -> Result<Vec<u8>>;

    /// Full location of `path`, for diagnostics
    fn describe(&self, path: &str) -> String;

    /// Fetch `path` and decode it as UTF-8 text
    fn fetch_text(&self, path: &str) -> Result<String> {
        let bytes = self.fetch(path)?;
        String::from_utf8(bytes)
            .map_err(|e| ReliefError::Parse(format!("'{}' is not valid UTF-8: {}", path, e)))
    }
}

impl<S: ResourceSource + ?Sized> ResourceSource for Box<S> {
    fn fetch(&self, path: &str) -> Result<Vec<u8>> {
        (**self).fetch(path)
    }

    fn describe(&self, path: &str) -> String {
        (**self).describe(path)
    }
}

impl<S: ResourceSource + ?Sized> ResourceSource for &S {
    fn fetch(&self, path: &str) -> Result<Vec<u8>> {
        (**self).fetch(path)
    }

    fn describe(&self, path: &str) -> String {
        (**self).describe(path)
    }
}

/// Strip the `./` and `/` prefixes an application-relative path may carry
pub fn normalize_path(path: &str) -> &str {
    let mut rest = path;
    loop {
        if let Some(stripped) = rest.strip_prefix("./") {
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix('/') {
            rest = stripped;
        } else {
            return rest;
        }
    }
}

/// Serves resources from a directory on disk
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(normalize_path(path))
    }
}

impl ResourceSource for DirectorySource {
    fn fetch(&self, path: &str) -> Result<Vec<u8>> {
        let full = self.resolve(path);
        debug!(path = %full.display(), "reading resource");
        std::fs::read(&full).map_err(|e| ReliefError::resource_load(path, e))
    }

    fn describe(&self, path: &str) -> String {
        self.resolve(path).display().to_string()
    }
}

/// Serves resources over HTTP(S) relative to a base URL
pub struct HttpSource {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpSource {
    /// `timeout` of `None` leaves the transport defaults in place.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            agent: build_agent(timeout),
        }
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, normalize_path(path))
    }
}

impl ResourceSource for HttpSource {
    fn fetch(&self, path: &str) -> Result<Vec<u8>> {
        let url = self.url_for(path);
        debug!(url = %url, "fetching resource");

        let response = self.agent.get(&url).call().map_err(|e| match e {
            ureq::Error::StatusCode(code) => {
                ReliefError::resource_load(path, format!("HTTP status {}", code))
            }
            other => ReliefError::resource_load(path, other),
        })?;

        let mut reader = response.into_body().into_reader();
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(|e| ReliefError::resource_load(path, format!("failed to read body: {}", e)))?;
        Ok(bytes)
    }

    fn describe(&self, path: &str) -> String {
        self.url_for(path)
    }
}

fn build_agent(timeout: Option<Duration>) -> ureq::Agent {
    let config = ureq::Agent::config_builder()
        .timeout_global(timeout)
        .build();
    config.into()
}

/// True when `root` names an HTTP(S) location rather than a directory
pub fn is_remote_root(root: &str) -> bool {
    root.starts_with("http://") || root.starts_with("https://")
}

/// Pick a source for an asset root: URLs go over HTTP, anything else is a directory
pub fn source_for_root(root: &str, timeout: Option<Duration>) -> Box<dyn ResourceSource> {
    if is_remote_root(root) {
        Box::new(HttpSource::new(root, timeout))
    } else {
        Box::new(DirectorySource::new(root))
    }
}
