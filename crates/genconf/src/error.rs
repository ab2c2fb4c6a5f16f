// crates/genconf/src/error.rs

use genconf_xml::XmlError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading the metadata descriptor.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// The descriptor file could not be read.
    #[error("failed to read metadata file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The descriptor is not valid JSON, or its top level has the wrong shape.
    #[error("malformed metadata document: {0}")]
    Json(#[from] serde_json::Error),

    /// A resource entry has no `type` tag.
    #[error("resource '{resource}' has no 'type' field")]
    MissingResourceType { resource: String },

    /// A resource entry is missing required fields for its declared type.
    #[error("resource '{resource}' is not a valid {kind} declaration: {source}")]
    InvalidResource {
        resource: String,
        kind: &'static str,
        source: serde_json::Error,
    },
}

/// Errors raised while building the configuration files.
///
/// All of these are fatal; there is no retry and no rollback across the
/// two documents.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The given base directory does not exist.
    #[error("given base directory {} does not exist", .0.display())]
    MissingBaseDir(PathBuf),

    /// The given base directory path is not a directory.
    #[error("given base directory {} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    /// One of the two expected configuration files is missing.
    #[error("configuration file {} does not exist", .0.display())]
    MissingConfigFile(PathBuf),

    /// The context document does not start with the expected root tag.
    #[error("expected root element <{expected}>, found <{found}>")]
    UnexpectedRootElement {
        expected: &'static str,
        found: String,
    },

    /// A runtime-property section is present but misses a required key.
    /// Presence of the section signals operator intent, so this aborts the
    /// build rather than silently disabling the feature.
    #[error("invalid '{section}' configuration, '{section}.{key}' is missing")]
    MissingRuntimeProperty {
        section: &'static str,
        key: &'static str,
    },

    /// An XML load, lookup, or save failure (including a missing or
    /// ambiguous valve anchor).
    #[error(transparent)]
    Xml(#[from] XmlError),
}
