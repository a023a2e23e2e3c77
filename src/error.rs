//! Error taxonomy for the sampling engine.
//!
//! Two classes exist: fatal errors abort the program (the system cannot
//! describe itself), per-process errors only drop one row from one refresh.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::system::Pid;

#[derive(Error, Debug)]
pub enum SampleError {
    #[error("failed to list process directory {}: {source}", path.display())]
    Enumeration {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// System-wide record is malformed.
    #[error("malformed {resource}: {detail}")]
    Parse { resource: String, detail: String },

    /// A single process record is malformed, usually a kernel-side race.
    #[error("process {pid}: malformed stat record: {detail}")]
    ProcessParse { pid: Pid, detail: String },

    #[error("process {pid}: {what} not found")]
    NotFound { pid: Pid, what: &'static str },

    #[error("unsupported host platform: {0}")]
    UnsupportedPlatform(String),
}

impl SampleError {
    /// Fatal errors end the program; the rest skip a single process.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            SampleError::NotFound { .. } | SampleError::ProcessParse { .. }
        )
    }
}
