use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong between a job request and a submitted job
///
/// Nothing is retried: each variant carries enough detail for the caller to decide.
#[derive(Error, Debug)]
pub enum JobError {
    /// Required job fields missing from the request, in declaration order
    #[error("Missing required job field(s): {}", .fields.join(", "))]
    Validation { fields: Vec<&'static str> },
    /// `path` couldn't be expanded or resolved, `source` is the filesystem error
    #[error("Can't resolve job path {}: {source}", .path.display())]
    InvalidPath {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Writing the description file, or starting the submit command, failed
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// condor_submit ran but exited non-zero
    #[error("condor_submit exited with status {}: {stderr}", display_status(.status))]
    Submission {
        /// None when the process was terminated by a signal
        status: Option<i32>,
        stdout: String,
        stderr: String,
    },
}

fn display_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => code.to_string(),
        None => "signal".to_string(),
    }
}
