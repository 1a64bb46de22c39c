//! HTTP request handlers organized by concern

pub mod discovery;
pub mod guide;
pub mod status;
