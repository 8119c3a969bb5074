//! Build HTCondor job descriptions, write them to disk, and submit them

/// Named parameters a job is constructed from, deserialised from job request messages
pub mod job_request;

/// Validated job description and its condor_submit rendering
pub mod job;

/// Save job descriptions and run condor_submit
pub mod submit;

/// Errors raised while building, saving or submitting a job
pub mod error;
