//! Descriptor discovery
//!
//! One cluster environment per YAML file in a flat directory. Files with other
//! extensions are ignored; discovered files are returned in path order.

pub mod error;

pub use error::*;

use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Extensions recognised as descriptor files
pub const DESCRIPTOR_EXTENSIONS: [&str; 2] = ["yaml", "yml"];

/// A descriptor file found in the descriptor directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorFile {
    pub path: PathBuf,
}

impl DescriptorFile {
    /// File name for reporting
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn load(&self) -> Result<Mapping> {
        load_descriptor(&self.path)
    }
}

/// List descriptor files directly inside `dir`
#[tracing::instrument(skip(dir), fields(dir = %dir.display()))]
pub fn discover_descriptors(dir: &Path) -> Result<Vec<DescriptorFile>> {
    if !dir.exists() {
        return Err(ConfigError::DirectoryNotFound(dir.to_path_buf()));
    }
    if !dir.is_dir() {
        return Err(ConfigError::NotADirectory(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_descriptor(&path) {
            debug!(file = %path.display(), "Found descriptor");
            files.push(DescriptorFile { path });
        } else {
            debug!(file = %path.display(), "Skipping non-descriptor entry");
        }
    }
    files.sort_by(|a, b| a.path.cmp(&b.path));

    info!(count = files.len(), "Discovered descriptor files");
    Ok(files)
}

fn is_descriptor(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| DESCRIPTOR_EXTENSIONS.contains(&ext))
}

/// Parse one descriptor file into its raw key/value mapping
#[tracing::instrument(skip(path), fields(path = %path.display()))]
pub fn load_descriptor(path: &Path) -> Result<Mapping> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_descriptor(&content, path)
}

fn parse_descriptor(content: &str, path: &Path) -> Result<Mapping> {
    if content.trim().is_empty() {
        return Err(ConfigError::NotAMapping {
            path: path.to_path_buf(),
        });
    }

    let value: Value = serde_yaml::from_str(content).map_err(|source| ConfigError::Yaml {
        path: path.to_path_buf(),
        source,
    })?;

    match value {
        Value::Mapping(mapping) => {
            debug!(keys = mapping.len(), "Descriptor parsed");
            Ok(mapping)
        }
        _ => Err(ConfigError::NotAMapping {
            path: path.to_path_buf(),
        }),
    }
}
