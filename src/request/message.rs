use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use thiserror::Error;

use crate::condor::job_request::JobParams;

#[derive(Error, Debug)]
pub enum MessageError {
    #[error("Can't read job request {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Can't decode job request {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A JSON job request on disk
pub struct Message {
    pub path: PathBuf,
}

impl Message {
    pub fn read(&self) -> Result<JobParams, MessageError> {
        let json_string = self.read_file()?;
        self.parse_json(&json_string)
    }

    fn read_file(&self) -> Result<String, MessageError> {
        let path: &Path = self.path.as_path();
        info!("Reading job request at {}", path.display());
        fs::read_to_string(path).map_err(|source| {
            warn!("Can't read job request at path {}: {}", path.display(), source);
            MessageError::Read { path: path.to_path_buf(), source }
        })
    }

    fn parse_json(&self, json_string: &str) -> Result<JobParams, MessageError> {
        info!("Deserialising JSON into job parameters");
        serde_json::from_str::<JobParams>(json_string).map_err(|source| {
            warn!("Job request fails deserialisation");
            MessageError::Decode { path: self.path.clone(), source }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_message() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("request.json");
        fs::write(&path, r#"{
            "path": "/tmp/htclib.job",
            "proc_user": "htclibproc",
            "docker_image": "htclib:latest",
            "executable": "/usr/bin/cat",
            "arguments": "/etc/fstab",
            "stderr": false,
            "queue": 2
        }"#).unwrap();

        let params = Message { path }.read().unwrap();
        assert_eq!(params.proc_user.as_deref(), Some("htclibproc"));
        assert_eq!(params.stderr, Some(false));
        assert!(params.log_prefix.is_none());
    }

    #[test]
    fn test_missing_message() {
        let temp = TempDir::new().unwrap();
        let message = Message { path: temp.path().join("absent.json") };
        assert!(matches!(message.read(), Err(MessageError::Read { .. })));
    }

    #[test]
    fn test_wrong_field_type() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("request.json");
        fs::write(&path, r#"{"stdout": "yes"}"#).unwrap();
        assert!(matches!(Message { path }.read(), Err(MessageError::Decode { .. })));
    }
}
