// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::io;
use std::path::PathBuf;

/// Error which can occur when loading a [Graph](crate::Graph).
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// None of the accepted variants of a graph file exist. The path names the
    /// uncompressed file, unless the compression was forced.
    #[error("{}: graph file not found", .0.display())]
    Missing(PathBuf),

    #[error("{file}: {reason}")]
    Malformed { file: &'static str, reason: String },
}

impl LoadError {
    pub(crate) fn malformed<R: Into<String>>(file: &'static str, reason: R) -> Self {
        Self::Malformed {
            file,
            reason: reason.into(),
        }
    }
}
