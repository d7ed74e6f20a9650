// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Scale Invariant

/// Layout Loading Errors
///
/// Fatal conditions abort the current load and surface to the caller with the
/// offending document path. Soft misses (keys without geometry, template
/// misses, symbolic keysyms) never become errors; they are logged where found.

use std::path::{Path, PathBuf};

/// All fatal errors produced while loading or rewriting layouts.
#[derive(thiserror::Error, Debug)]
pub enum LayoutError {
    /// Malformed content: missing required attribute, unknown token,
    /// bad number, unsupported format version
    #[error("{message} in layout '{}'", path.display())]
    Format { path: PathBuf, message: String },

    /// Document or geometry file unusable, include target unresolvable
    #[error("error loading '{}': {reason}", path.display())]
    Resource { path: PathBuf, reason: String },

    #[error("IO error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("XML error in '{}': {source}", path.display())]
    Xml {
        path: PathBuf,
        #[source]
        source: quick_xml::Error,
    },
}

impl LayoutError {
    pub(crate) fn format(path: &Path, message: impl Into<String>) -> Self {
        LayoutError::Format { path: path.to_path_buf(), message: message.into() }
    }

    pub(crate) fn resource(path: &Path, reason: impl Into<String>) -> Self {
        LayoutError::Resource { path: path.to_path_buf(), reason: reason.into() }
    }

    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        LayoutError::Io { path: path.to_path_buf(), source }
    }

    pub(crate) fn xml(path: &Path, source: quick_xml::Error) -> Self {
        LayoutError::Xml { path: path.to_path_buf(), source }
    }

    /// Path of the document the error was raised for
    pub fn path(&self) -> &Path {
        match self {
            LayoutError::Format { path, .. }
            | LayoutError::Resource { path, .. }
            | LayoutError::Io { path, .. }
            | LayoutError::Xml { path, .. } => path,
        }
    }

    pub fn is_format_error(&self) -> bool {
        matches!(self, LayoutError::Format { .. })
    }
}

/// Keyboard driver query failure; always absorbed by the key resolver
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("keyboard driver error: {0}")]
pub struct DriverError(pub String);
