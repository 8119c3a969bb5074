use std::fs;
use std::process::Command;

use log::{info, warn};

use crate::condor::error::JobError;
use crate::condor::job::HTCondorJob;

/// Write the job description file to disk
///
/// Missing parent directories are created. An existing file at the job path is overwritten.
pub fn save_job(job: &HTCondorJob) -> Result<(), JobError> {
    let path = job.path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| JobError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    info!("Writing job description to {}", path.display());
    fs::write(path, job.render()).map_err(|source| JobError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Submit the job description to the HTCondor scheduler with the default tools
pub fn submit_job(job: &HTCondorJob) -> Result<SubmitOutput, JobError> {
    Submitter::default().submit(job)
}

/// Captured output of a successful condor_submit run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Runs `<sudo> -u <proc_user> <condor_submit> <path>`
#[derive(Debug, Clone)]
pub struct Submitter {
    /// impersonation tool, must accept `-u <user>`
    pub sudo: String,
    pub condor_submit: String,
}

impl Default for Submitter {
    fn default() -> Self {
        Submitter {
            sudo: "sudo".to_string(),
            condor_submit: "condor_submit".to_string(),
        }
    }
}

impl Submitter {
    pub fn command(&self, job: &HTCondorJob) -> Command {
        let mut cmd = Command::new(&self.sudo);
        cmd.arg("-u")
            .arg(job.proc_user())
            .arg(&self.condor_submit)
            .arg(job.path());
        cmd
    }

    /// Run the submission and wait for it to exit. There's no timeout and no retry.
    pub fn submit(&self, job: &HTCondorJob) -> Result<SubmitOutput, JobError> {
        if !job.path().exists() {
            warn!("Job description {} doesn't exist, was it saved?", job.path().display());
        }

        let mut cmd = self.command(job);
        info!("Running condor_submit process as {}", job.proc_user());
        info!("{:?}", &cmd);
        let output = cmd.output().map_err(|source| JobError::Io {
            path: self.sudo.clone().into(),
            source,
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            warn!("condor_submit failed ({}): {}", output.status, stderr.trim());
            return Err(JobError::Submission { status: output.status.code(), stdout, stderr });
        }

        info!("Submitted {}", job.path().display());
        Ok(SubmitOutput { stdout, stderr })
    }
}
