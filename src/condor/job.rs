use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::{env, fs, io};

use log::info;

use crate::condor::error::JobError;
use crate::condor::job_request::JobParams;

/// Requested memory when the job request doesn't set one
pub const DEFAULT_MEMORY: &str = "2G";
/// Number of job instances queued when the job request doesn't set one
pub const DEFAULT_QUEUE: &str = "1";

/// A validated HTCondor job description
///
/// Construction normalises `path` and fills in defaults, so an `HTCondorJob` is always complete.
/// Fields can't be changed afterwards: `log_prefix` is derived from `path` exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HTCondorJob {
    // submitting the job
    path: PathBuf,
    proc_user: String,
    stdout: bool,
    stderr: bool,

    // description file contents
    docker_image: String,
    executable: String,
    arguments: String,
    log_prefix: PathBuf,
    memory: String,
    input_files: Option<String>,
    queue: String,
}

impl HTCondorJob {
    pub fn new(params: JobParams) -> Result<HTCondorJob, JobError> {
        let JobParams {
            path,
            proc_user,
            stdout,
            stderr,
            docker_image,
            executable,
            arguments,
            log_prefix,
            memory,
            input_files,
            queue,
        } = params;

        let missing: Vec<&'static str> = [
            ("path", path.is_none()),
            ("proc_user", proc_user.is_none()),
            ("docker_image", docker_image.is_none()),
            ("executable", executable.is_none()),
            ("arguments", arguments.is_none()),
        ]
        .into_iter()
        .filter_map(|(field, is_missing)| is_missing.then_some(field))
        .collect();

        // all five are present past this point
        let (Some(path), Some(proc_user), Some(docker_image), Some(executable), Some(arguments)) =
            (path, proc_user, docker_image, executable, arguments)
        else {
            return Err(JobError::Validation { fields: missing });
        };

        let path = resolve_path(&path).map_err(|source| JobError::InvalidPath { path, source })?;
        let log_prefix = log_prefix.unwrap_or_else(|| default_log_prefix(&path));
        info!("Job description {} logs to {}.*", path.display(), log_prefix.display());

        Ok(HTCondorJob {
            path,
            proc_user,
            stdout: stdout.unwrap_or(true),
            stderr: stderr.unwrap_or(true),
            docker_image,
            executable,
            arguments,
            log_prefix,
            memory: memory.unwrap_or_else(|| DEFAULT_MEMORY.to_string()),
            input_files,
            queue: queue.map_or_else(|| DEFAULT_QUEUE.to_string(), |q| q.to_string()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn proc_user(&self) -> &str {
        &self.proc_user
    }

    pub fn log_prefix(&self) -> &Path {
        &self.log_prefix
    }

    pub fn memory(&self) -> &str {
        &self.memory
    }

    pub fn queue(&self) -> &str {
        &self.queue
    }

    /// Render the condor_submit description file
    ///
    /// condor_submit reads this format line by line, so line order and which optional lines are
    /// present are fixed. `$(ClusterId)` and `$(Process)` are expanded by condor_submit, not here.
    pub fn render(&self) -> String {
        let prefix = self.log_prefix.display();
        let mut lines = vec![
            line("universe", "docker"),
            line("docker_image", &self.docker_image),
            line("executable", &self.executable),
            line("arguments", &self.arguments),
        ];
        if self.stdout {
            lines.push(line("output", &format!("{prefix}.$(ClusterId).$(Process).out")));
        }
        if self.stderr {
            lines.push(line("error", &format!("{prefix}.$(ClusterId).$(Process).err")));
        }
        lines.push(line("log", &format!("{prefix}.$(ClusterId).$(Process).log")));
        lines.push(line("request_memory", &self.memory));
        if let Some(files) = self.input_files.as_deref().filter(|f| !f.is_empty()) {
            lines.push(line("transfer_input_files", files));
        }
        lines.push(line("should_transfer_files", "YES"));
        lines.push(line("when_to_transfer_output", "ON_EXIT"));
        lines.push(format!("queue {}", self.queue));

        lines.join("\n").trim().to_string()
    }
}

/// `key` padded so that every `=` lines up in column 25
fn line(key: &str, value: &str) -> String {
    format!("{key:<24}= {value}")
}

impl fmt::Display for HTCondorJob {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// `<parent of path>/<file name without its final extension>`
fn default_log_prefix(path: &Path) -> PathBuf {
    let parent = path.parent().unwrap_or(path);
    match path.file_stem() {
        Some(stem) => parent.join(stem),
        None => parent.to_path_buf(),
    }
}

/// Symlinks followed while resolving one path before giving up, as the kernel does
const MAX_SYMLINKS: usize = 40;

/// Expand `~`, make absolute, and resolve symlinks and `.`/`..` segments
///
/// Unlike [fs::canonicalize] the path doesn't need to exist: the longest existing prefix is
/// resolved through the filesystem and the rest is appended as written. Dangling symlinks are
/// still followed to their target.
fn resolve_path(path: &Path) -> io::Result<PathBuf> {
    let expanded = expand_home(path)?;
    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        env::current_dir()?.join(expanded)
    };

    // components still to resolve, last one on top
    let mut pending: Vec<PathBuf> = owned_components(&absolute);
    let mut resolved = PathBuf::new();
    let mut exists = true;
    let mut links = 0;

    while let Some(part) = pending.pop() {
        match part.components().next() {
            Some(Component::Prefix(_)) | Some(Component::RootDir) => resolved.push(&part),
            Some(Component::CurDir) | None => {}
            Some(Component::ParentDir) => {
                resolved.pop();
            }
            Some(Component::Normal(name)) => {
                let candidate = resolved.join(name);
                if !exists {
                    resolved = candidate;
                    continue;
                }
                match fs::canonicalize(&candidate) {
                    Ok(real) => resolved = real,
                    Err(err) if err.kind() == io::ErrorKind::NotFound => {
                        match fs::read_link(&candidate) {
                            // dangling symlink, carry on from its target relative to `resolved`
                            Ok(target) => {
                                links += 1;
                                if links > MAX_SYMLINKS {
                                    return Err(io::Error::new(
                                        io::ErrorKind::Other,
                                        "too many levels of symbolic links",
                                    ));
                                }
                                pending.extend(owned_components(&target));
                            }
                            Err(_) => {
                                exists = false;
                                resolved = candidate;
                            }
                        }
                    }
                    Err(err) => return Err(err),
                }
            }
        }
    }

    Ok(resolved)
}

/// Components of `path` in reverse order, ready to be popped
fn owned_components(path: &Path) -> Vec<PathBuf> {
    path.components()
        .rev()
        .map(|component| PathBuf::from(component.as_os_str()))
        .collect()
}

/// Replace a leading `~` or `~user` component with that user's home directory
fn expand_home(path: &Path) -> io::Result<PathBuf> {
    let mut components = path.components();
    let user = match components.next() {
        Some(Component::Normal(first)) => match first.to_str().and_then(|s| s.strip_prefix('~')) {
            Some(user) => user.to_string(),
            None => return Ok(path.to_path_buf()),
        },
        _ => return Ok(path.to_path_buf()),
    };

    let home = if user.is_empty() {
        home::home_dir()
    } else {
        user_home_dir(&user)?
    };
    let home = home.ok_or_else(|| {
        let message = format!("home directory of '~{user}' is not available");
        io::Error::new(io::ErrorKind::NotFound, message)
    })?;
    Ok(home.join(components.as_path()))
}

/// Look up the home directory of `user` in the passwd database
fn user_home_dir(user: &str) -> io::Result<Option<PathBuf>> {
    let passwd = fs::read_to_string("/etc/passwd")?;
    Ok(passwd_home_dir(&passwd, user))
}

/// passwd lines are `name:password:uid:gid:gecos:home:shell`
fn passwd_home_dir(passwd: &str, user: &str) -> Option<PathBuf> {
    passwd
        .lines()
        .filter(|line| !line.starts_with('#'))
        .map(|line| line.split(':').collect::<Vec<&str>>())
        .find(|fields| fields.len() >= 6 && fields[0] == user)
        .map(|fields| PathBuf::from(fields[5]))
}
