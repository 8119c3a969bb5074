use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use htcjob::condor::job::HTCondorJob;
use htcjob::condor::submit::{save_job, Submitter};
use htcjob::request::message::Message;

#[derive(Parser, Debug)]
#[command(name = "htcjob")]
#[command(version = "0.1.0")]
#[command(about = "Write an HTCondor job description from a JSON job request and submit it")]
struct Args {
    /// Path to a JSON job request
    #[arg(short, long)]
    request: PathBuf,
    /// Write the job description but don't run condor_submit
    #[arg(long)]
    dry_run: bool,
    /// Also print the rendered job description to stdout
    #[arg(long)]
    print: bool,
    /// Impersonation tool used to run condor_submit as the job's proc_user
    #[arg(long, default_value = "sudo")]
    sudo: String,
    /// condor_submit binary
    #[arg(long, default_value = "condor_submit")]
    condor_submit: String,
}

fn main() -> Result<()> {
    env_logger::init();
    info!("terve! starting up :)");

    let args = Args::parse();

    let message = Message { path: args.request.clone() };
    let params = message.read()?;
    let job = HTCondorJob::new(params)
        .with_context(|| format!("Invalid job request {}", args.request.display()))?;

    if args.print {
        println!("{job}");
    }

    save_job(&job)?;

    if args.dry_run {
        warn!("--dry-run set, not submitting {}", job.path().display());
        return Ok(());
    }

    let submitter = Submitter { sudo: args.sudo, condor_submit: args.condor_submit };
    let output = submitter
        .submit(&job)
        .with_context(|| format!("Submitting {}", job.path().display()))?;
    print!("{}", output.stdout);

    info!("finished :D");
    Ok(())
}
