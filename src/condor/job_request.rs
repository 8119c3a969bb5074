use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Named parameters used to construct an [HTCondorJob](crate::condor::job::HTCondorJob)
///
/// Every field is optional here so that construction can report all missing required fields at
/// once. Required: `path`, `proc_user`, `docker_image`, `executable`, `arguments`.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct JobParams {
    pub path: Option<PathBuf>,
    pub proc_user: Option<String>,
    pub stdout: Option<bool>,
    pub stderr: Option<bool>,
    pub docker_image: Option<String>,
    pub executable: Option<String>,
    pub arguments: Option<String>,
    pub log_prefix: Option<PathBuf>,
    pub memory: Option<String>,
    pub input_files: Option<String>,
    pub queue: Option<QueueCount>,
}

/// condor_submit accepts a number or an expression after `queue`, so keep both as text
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum QueueCount {
    Count(u64),
    Expression(String),
}

impl fmt::Display for QueueCount {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            QueueCount::Count(n) => write!(f, "{n}"),
            QueueCount::Expression(expr) => write!(f, "{expr}"),
        }
    }
}

impl From<u64> for QueueCount {
    fn from(n: u64) -> Self {
        QueueCount::Count(n)
    }
}

impl From<&str> for QueueCount {
    fn from(expr: &str) -> Self {
        QueueCount::Expression(expr.to_string())
    }
}
