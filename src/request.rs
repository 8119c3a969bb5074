//! Job requests arrive as JSON files

pub mod message;
