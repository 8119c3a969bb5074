//! Write HTCondor job description files and submit them with condor_submit
//!
//! A [JobParams](condor::job_request::JobParams), usually read from a JSON
//! [Message](request::message::Message), becomes a validated
//! [HTCondorJob](condor::job::HTCondorJob). It is written with
//! [save_job](condor::submit::save_job) and submitted with
//! [submit_job](condor::submit::submit_job).

/// Job descriptions: validation, rendering, saving and submission
pub mod condor;
/// Read and deserialise job request messages
pub mod request;
