//! Utility functions for the Antennas service
//!
//! - `utils::url` for URL joining and credential obfuscation

pub mod url;
